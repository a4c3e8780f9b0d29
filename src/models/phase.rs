use std::fmt;

use chrono::{ DateTime, Utc };

/// The fixed, linear sequence of migration phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseId {
    DataLayer,
    ServiceLayer,
    RestLayer,
    UiLayer,
    ValidationHardening,
}

impl PhaseId {
    pub const ALL: [PhaseId; 5] = [
        PhaseId::DataLayer,
        PhaseId::ServiceLayer,
        PhaseId::RestLayer,
        PhaseId::UiLayer,
        PhaseId::ValidationHardening,
    ];

    pub fn number(&self) -> usize {
        match self {
            PhaseId::DataLayer => 1,
            PhaseId::ServiceLayer => 2,
            PhaseId::RestLayer => 3,
            PhaseId::UiLayer => 4,
            PhaseId::ValidationHardening => 5,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PhaseId::DataLayer => "Data Layer Migration",
            PhaseId::ServiceLayer => "Service Layer Migration",
            PhaseId::RestLayer => "REST API Migration",
            PhaseId::UiLayer => "UI Layer Migration",
            PhaseId::ValidationHardening => "Validation Implementation",
        }
    }

    /// Name of the checkpoint branch opened at phase start
    pub fn branch_name(&self) -> &'static str {
        match self {
            PhaseId::DataLayer => "phase1-data-layer",
            PhaseId::ServiceLayer => "phase2-service-layer",
            PhaseId::RestLayer => "phase3-rest-api",
            PhaseId::UiLayer => "phase4-ui-layer",
            PhaseId::ValidationHardening => "phase5-validation",
        }
    }

    pub fn commit_message(&self) -> String {
        format!("Phase {}: {} completed", self.number(), self.title())
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase {} ({})", self.number(), self.title())
    }
}

/// States of the per-phase test gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Running,
    Passed,
    FailedRetrying { stdout: String, stderr: String },
    Halted,
}

/// What the test gate reports back to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    pub passed: bool,
    /// Test runs performed, including the final one
    pub test_runs: usize,
    /// Repair cycles entered
    pub repair_cycles: usize,
    pub halted: bool,
}

/// Outcome of one phase
#[derive(Debug, Clone)]
pub struct PhaseResult {
    pub phase_id: PhaseId,
    pub succeeded: bool,
    pub migrated_artifacts: usize,
    pub failed_artifacts: usize,
    pub gate: Option<GateOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Summary of a whole pipeline run
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    pub phases: Vec<PhaseResult>,
    pub completed: bool,
}

impl MigrationReport {
    pub fn halted_at(&self) -> Option<PhaseId> {
        self.phases
            .iter()
            .find(|p| !p.succeeded)
            .map(|p| p.phase_id)
    }
}
