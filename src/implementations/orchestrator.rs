use std::sync::Arc;

use chrono::Utc;
use log::{ error, info, warn };

use crate::config::MigrationOptions;
use crate::errors::MigrationResult;
use crate::implementations::gateway::OracleGateway;
use crate::implementations::migrators::{ bootstrap, hardening, ui, MigrationContext, MigratorSummary };
use crate::implementations::test_gate::TestGate;
use crate::models::phase::{ MigrationReport, PhaseId, PhaseResult };
use crate::models::rule::ArtifactRule;
use crate::traits::file_tree::FileTree;
use crate::traits::operator::OperatorPrompt;
use crate::traits::oracle::TextOracle;
use crate::traits::test_runner::TestRunner;
use crate::traits::version_control::VersionControl;

/// Runs the five migration phases in order, each gated on a passing test suite.
///
/// Failure is fail-stop: a halted gate ends the run and committed phases stay committed.
pub struct PhaseOrchestrator {
    gateway: OracleGateway,
    files: Arc<dyn FileTree>,
    vcs: Arc<dyn VersionControl>,
    runner: Arc<dyn TestRunner>,
    operator: Arc<dyn OperatorPrompt>,
    options: MigrationOptions,
}

impl PhaseOrchestrator {
    pub fn new(
        oracle: Arc<dyn TextOracle>,
        files: Arc<dyn FileTree>,
        vcs: Arc<dyn VersionControl>,
        runner: Arc<dyn TestRunner>,
        operator: Arc<dyn OperatorPrompt>,
        options: MigrationOptions
    ) -> Self {
        Self {
            gateway: OracleGateway::new(oracle, &options),
            files,
            vcs,
            runner,
            operator,
            options,
        }
    }

    pub fn options(&self) -> &MigrationOptions {
        &self.options
    }

    /// Run every phase until one halts
    pub async fn run(&self) -> MigrationResult<MigrationReport> {
        info!(
            "Starting migration from {} to {} using {}",
            self.options.source_root.display(),
            self.options.target_root.display(),
            self.gateway.model()
        );
        self.files.create_dir_all(&self.options.target_root)?;

        if let Err(e) = self.vcs.init_repository().await {
            warn!("Could not initialize repository: {}", e);
        }

        let mut report = MigrationReport::default();
        for phase in PhaseId::ALL {
            let result = self.run_phase(phase).await?;
            let succeeded = result.succeeded;
            report.phases.push(result);

            if !succeeded {
                error!("{} failed; stopping migration", phase);
                return Ok(report);
            }
        }

        report.completed = true;
        info!("Migration completed successfully");
        Ok(report)
    }

    /// Checkpoint, migrate, gate, then commit
    pub async fn run_phase(&self, phase: PhaseId) -> MigrationResult<PhaseResult> {
        info!("Starting {}", phase);
        let started_at = Utc::now();

        if let Err(e) = self.vcs.create_checkpoint(phase.branch_name()).await {
            warn!("Could not create checkpoint {}: {}", phase.branch_name(), e);
        }

        let summary = self.migrate_phase(phase).await?;
        if summary.stubbed > 0 {
            warn!("{} artifact(s) in {} are stubs that need manual completion", summary.stubbed, phase);
        }

        let gate = TestGate::new(
            &self.gateway,
            self.files.as_ref(),
            self.runner.as_ref(),
            self.operator.as_ref(),
            &self.options
        );
        let outcome = gate.run().await?;

        if outcome.passed {
            if let Err(e) = self.vcs.commit(&phase.commit_message()).await {
                warn!("Could not commit {}: {}", phase, e);
            }
            info!("{} completed", phase);
        }

        Ok(PhaseResult {
            phase_id: phase,
            succeeded: outcome.passed,
            migrated_artifacts: summary.migrated,
            failed_artifacts: summary.failed,
            gate: Some(outcome),
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn migrate_phase(&self, phase: PhaseId) -> MigrationResult<MigratorSummary> {
        let ctx = MigrationContext::new(&self.gateway, self.files.as_ref(), &self.options);
        let mut summary = MigratorSummary::default();

        match phase {
            PhaseId::DataLayer => {
                summary.merge(bootstrap::setup_project(&ctx).await?);
                summary.merge(ctx.migrate_all(ArtifactRule::Entity).await?);
                summary.merge(ctx.migrate_all(ArtifactRule::Repository).await?);
                summary.merge(bootstrap::configure_database(&ctx).await?);
            }
            PhaseId::ServiceLayer => {
                summary.merge(ctx.migrate_all(ArtifactRule::Service).await?);
                summary.merge(bootstrap::implement_transaction_management(&ctx).await?);
            }
            PhaseId::RestLayer => {
                summary.merge(ctx.migrate_all(ArtifactRule::RestEndpoint).await?);
            }
            PhaseId::UiLayer => {
                summary.merge(ui::migrate_ui_layer(&ctx).await?);
            }
            PhaseId::ValidationHardening => {
                summary.merge(hardening::harden_validation(&ctx).await?);
            }
        }

        info!(
            "{}: {} artifact(s) migrated, {} failed",
            phase,
            summary.migrated,
            summary.failed
        );
        Ok(summary)
    }
}
