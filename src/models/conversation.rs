use serde::{ Deserialize, Serialize };

/// Role of a turn in an oracle conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// OpenAI-style chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// One request to the gateway. Created per call and not retained.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub primary_instruction: String,
    pub system_instructions: String,
    pub attempt_index: usize,
}

/// What shape of reply a gateway query expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedOutput {
    /// Source text in the named language (`java`, `xml`, `html`, `properties`)
    Code(String),
    /// A single JSON document
    Json,
}

impl ExpectedOutput {
    pub fn java() -> Self {
        ExpectedOutput::Code("java".to_string())
    }

    pub fn describe(&self) -> String {
        match self {
            ExpectedOutput::Code(lang) => format!("valid {} code", lang),
            ExpectedOutput::Json => "a single valid JSON object".to_string(),
        }
    }
}
