//! Runtime configuration for the assistant core.

pub mod api_keys;
pub mod constants;

use std::path::PathBuf;

use constants::models;

/// Everything the core needs to serve one chat panel: where the workspace
/// lives, which credential to use, and which model tiers to call.
#[derive(Debug, Clone)]
pub struct SidekickConfig {
    /// Root directory that context collection and candidate listing walk.
    pub workspace_root: PathBuf,
    /// Gemini API key; `None` means every gateway call degrades per policy.
    pub api_key: Option<String>,
    /// Capable tier used for answer generation.
    pub answer_model: String,
    /// Fast tier used for classification and file selection.
    pub classifier_model: String,
}

impl SidekickConfig {
    /// Build a configuration from the environment with default model tiers.
    pub fn from_env(workspace_root: PathBuf) -> Self {
        Self {
            workspace_root,
            api_key: api_keys::resolve_api_key(),
            answer_model: models::google::GEMINI_FLASH.to_string(),
            classifier_model: models::google::GEMINI_FLASH_8B.to_string(),
        }
    }
}
