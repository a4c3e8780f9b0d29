pub mod common;
pub mod artifact;
pub mod conversation;
pub mod repair;
pub mod phase;
pub mod rule;

// Re-export common model types
pub use common::{ DeclKind, RootTree };
pub use artifact::{ CodeArtifact, TargetLocation };
pub use conversation::{ ChatMessage, ExpectedOutput, GenerationRequest, Role };
pub use repair::{ FileChange, RepairBatch };
pub use phase::{ GateOutcome, GateState, MigrationReport, PhaseId, PhaseResult };
pub use rule::ArtifactRule;
