use std::collections::BTreeMap;

use log::{ error, info, warn };

use crate::config::MigrationOptions;
use crate::errors::MigrationResult;
use crate::implementations::applicator::SolutionApplicator;
use crate::implementations::gateway::OracleGateway;
use crate::implementations::java_syntax;
use crate::implementations::normalizer::normalize_tree;
use crate::models::conversation::ExpectedOutput;
use crate::models::phase::{ GateOutcome, GateState };
use crate::traits::file_tree::FileTree;
use crate::traits::operator::OperatorPrompt;
use crate::traits::test_runner::TestRunner;

const REPAIR_SYSTEM_INSTRUCTIONS: &str =
    r#"You are an expert Java developer assistant specializing in Spring Boot migration.
You will analyze test failures, identify root causes, and provide solutions.
Follow this problem-solving process:
1. Analyze the error logs to identify the specific problem
2. Determine which files need to be modified
3. Provide the exact code changes needed
4. Explain your reasoning briefly

IMPORTANT JAVA REQUIREMENTS:
- Each public class MUST be in a file with the same name (e.g., Member.java must contain public class Member)
- Avoid duplicate class declarations
- Method signatures in child interfaces must match parent interface signatures (including return types)
- Test classes belong under src/test/java
- Do not include any explanatory text in the Java files, only valid code

Your response must be a single JSON object with the following format:
{
  "analysis": "Brief analysis of the error",
  "files_to_modify": [
    { "file_path": "Relative path to the file from project root", "code": "Complete content of the fixed file" }
  ],
  "explanation": "Brief explanation of your fix",
  "additional_files": [
    { "file_path": "Path to any new file needed", "code": "Complete content of the new file" }
  ]
}"#;

const MANUAL_FIX_QUESTION: &str = "Tests are still failing. Fix them manually and continue?";

/// Runs tests, asks the oracle for repairs on failure and decides whether a phase may advance
pub struct TestGate<'a> {
    gateway: &'a OracleGateway,
    files: &'a dyn FileTree,
    runner: &'a dyn TestRunner,
    operator: &'a dyn OperatorPrompt,
    options: &'a MigrationOptions,
}

impl<'a> TestGate<'a> {
    pub fn new(
        gateway: &'a OracleGateway,
        files: &'a dyn FileTree,
        runner: &'a dyn TestRunner,
        operator: &'a dyn OperatorPrompt,
        options: &'a MigrationOptions
    ) -> Self {
        Self { gateway, files, runner, operator, options }
    }

    /// Drive the gate to `Passed` or `Halted`
    pub async fn run(&self) -> MigrationResult<GateOutcome> {
        normalize_tree(self.files, self.options)?;

        let max_attempts = self.options.test_attempts;
        let mut outcome = GateOutcome {
            passed: false,
            test_runs: 0,
            repair_cycles: 0,
            halted: false,
        };
        let mut state = GateState::Running;

        loop {
            state = match state {
                GateState::Running => {
                    outcome.test_runs += 1;
                    info!("Test attempt {}/{}", outcome.test_runs, max_attempts);
                    let run = self.runner.run_tests().await;
                    if run.passed {
                        info!("Tests passed");
                        GateState::Passed
                    } else if outcome.repair_cycles >= max_attempts {
                        self.after_exhaustion(&mut outcome).await
                    } else {
                        warn!("Test failures detected on attempt {}", outcome.test_runs);
                        GateState::FailedRetrying { stdout: run.stdout, stderr: run.stderr }
                    }
                }
                GateState::FailedRetrying { stdout, stderr } => {
                    let attempt = outcome.repair_cycles;
                    outcome.repair_cycles += 1;
                    let applied = self.repair(attempt, &stdout, &stderr).await;

                    // an applied repair is always tested before the operator is asked
                    if !applied && outcome.repair_cycles >= max_attempts {
                        self.after_exhaustion(&mut outcome).await
                    } else {
                        GateState::Running
                    }
                }
                GateState::Passed => {
                    outcome.passed = true;
                    return Ok(outcome);
                }
                GateState::Halted => {
                    outcome.halted = true;
                    return Ok(outcome);
                }
            };
        }
    }

    /// Budget spent: a confirmed operator gets one final run, anything else halts
    async fn after_exhaustion(&self, outcome: &mut GateOutcome) -> GateState {
        if !self.operator.confirm(MANUAL_FIX_QUESTION) {
            error!("Tests still failing after {} repair attempt(s); halting", outcome.repair_cycles);
            return GateState::Halted;
        }

        outcome.test_runs += 1;
        info!("Final test run after manual intervention");
        if self.runner.run_tests().await.passed {
            GateState::Passed
        } else {
            error!("Tests still failing after manual intervention; halting");
            GateState::Halted
        }
    }

    /// One repair cycle; returns whether any fix was applied
    async fn repair(&self, attempt: usize, stdout: &str, stderr: &str) -> bool {
        info!("Requesting repair for test failures (attempt {})", attempt + 1);
        let limit = self.options.test_output_chars;
        let prompt = format!(
            "I'm migrating a JBoss application to Spring Boot and encountered test failures.\n\n\
             Here's the test output:\n{}\n\n\
             Here's the error message:\n{}\n\n\
             Please analyze what's wrong and provide a fix in the required JSON format.",
            java_syntax::truncate_text(stdout, limit),
            java_syntax::truncate_text(stderr, limit)
        );

        if self.request_and_apply(&prompt).await {
            return true;
        }
        warn!("Failed to fix issues automatically");

        if attempt < self.options.comprehensive_after {
            return false;
        }
        info!("Attempting a more comprehensive analysis");
        match self.comprehensive_prompt(stdout, stderr) {
            Ok(prompt) => self.request_and_apply(&prompt).await,
            Err(e) => {
                error!("Could not gather project files for comprehensive repair: {}", e);
                false
            }
        }
    }

    async fn request_and_apply(&self, prompt: &str) -> bool {
        let Some(reply) = self.gateway.query(prompt, REPAIR_SYSTEM_INSTRUCTIONS, &ExpectedOutput::Json).await else {
            return false;
        };
        let applicator = SolutionApplicator::new(self.files, &self.options.target_root, &self.options.base_package);
        applicator.apply(&reply)
    }

    /// Repair prompt carrying excerpts of the project's Java sources
    fn comprehensive_prompt(&self, stdout: &str, stderr: &str) -> MigrationResult<String> {
        let root = &self.options.target_root;
        let mut excerpts = BTreeMap::new();

        for path in self.files
            .list_matching(root, "**/*.java")?
            .into_iter()
            .take(self.options.comprehensive_file_limit) {
            let relative = path.strip_prefix(root).unwrap_or(&path).to_string_lossy().to_string();
            let content = self.files.read(&path)?;
            excerpts.insert(relative, java_syntax::truncate_java_file(&content, self.options.file_excerpt_chars));
        }

        let bundle = serde_json::to_string_pretty(&excerpts).unwrap_or_else(|_| "{}".to_string());
        let limit = self.options.comprehensive_output_chars;

        Ok(
            format!(
                "I'm debugging Spring Boot test failures and need a comprehensive solution.\n\n\
                 Test output (truncated):\n{}\n\n\
                 Error message (truncated):\n{}\n\n\
                 Here are the key project files (some truncated for brevity):\n\n{}\n\n\
                 Please analyze what's wrong and provide fixes for ALL relevant files in the required JSON format.",
                java_syntax::truncate_text(stdout, limit),
                java_syntax::truncate_text(stderr, limit),
                bundle
            )
        )
    }
}
