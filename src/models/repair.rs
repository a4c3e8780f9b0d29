use serde::{ Deserialize, Serialize };

/// One file entry of a repair batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Path relative to the target project root
    pub file_path: String,
    /// Complete new content of the file
    pub code: String,
}

/// Structured multi-file patch proposed by the oracle after a test failure.
///
/// Every entry must parse for the batch to be usable; a malformed entry
/// rejects the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairBatch {
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub files_to_modify: Vec<FileChange>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub additional_files: Vec<FileChange>,
}

impl RepairBatch {
    pub fn is_empty(&self) -> bool {
        self.files_to_modify.is_empty() && self.additional_files.is_empty()
    }
}
