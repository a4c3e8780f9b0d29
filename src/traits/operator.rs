/// The human operator consulted when the test gate runs out of attempts
pub trait OperatorPrompt: Send + Sync {
    /// Returns true only on an explicit affirmative answer
    fn confirm(&self, question: &str) -> bool;
}

/// Operator that always answers with a fixed decision (non-interactive runs)
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl OperatorPrompt for FixedAnswer {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}
