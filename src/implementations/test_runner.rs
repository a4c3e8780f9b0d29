use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use log::{ debug, error, info };
use tokio::process::Command;

use crate::traits::test_runner::{ TestRun, TestRunner };

/// Runs the build tool's test goal in the target project (`mvn test` by default)
pub struct CommandTestRunner {
    working_dir: PathBuf,
    command: Vec<String>,
}

impl CommandTestRunner {
    pub fn new(working_dir: impl Into<PathBuf>, command: Vec<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            command,
        }
    }
}

#[async_trait]
impl TestRunner for CommandTestRunner {
    async fn run_tests(&self) -> TestRun {
        let Some((exe, args)) = self.command.split_first() else {
            error!("Test command is empty");
            return TestRun::failed("", "test command is empty");
        };

        info!("Running {} in {}", self.command.join(" "), self.working_dir.display());
        let output = Command::new(exe)
            .args(args)
            .current_dir(&self.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output().await;

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                debug!("Test command exited with {:?}", output.status.code());
                TestRun {
                    passed: output.status.success(),
                    stdout,
                    stderr,
                }
            }
            Err(e) => {
                error!("Failed to run {}: {}", exe, e);
                TestRun::failed("", format!("failed to run {}: {}", exe, e))
            }
        }
    }
}
