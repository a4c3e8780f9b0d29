use async_trait::async_trait;

/// Captured result of one external build/test invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRun {
    pub passed: bool,
    pub stdout: String,
    pub stderr: String,
}

impl TestRun {
    pub fn passed(stdout: impl Into<String>) -> Self {
        Self { passed: true, stdout: stdout.into(), stderr: String::new() }
    }

    pub fn failed(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self { passed: false, stdout: stdout.into(), stderr: stderr.into() }
    }
}

/// Runs the target project's test suite
#[async_trait]
pub trait TestRunner: Send + Sync {
    /// Failures to launch the tool are reported as a failed run, not an error
    async fn run_tests(&self) -> TestRun;
}
