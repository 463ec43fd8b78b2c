//! Engine configuration
//!
//! The engine never reads the environment itself; the caller resolves env
//! vars and flags once at startup and hands the engine a `GateConfig`.

use serde::{Deserialize, Serialize};

/// Default directory checked for new changelog entries.
pub const DEFAULT_CHANGELOG_DIR: &str = ".changelog";

/// Configuration for a single validation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Directory that must contain at least one changed file
    pub changelog_dir: String,

    /// Whether to reconcile the status comment on the pull request
    ///
    /// Outputs and exit status are identical either way; this only controls
    /// the human-readable reporting side effect.
    pub post_comment: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            changelog_dir: DEFAULT_CHANGELOG_DIR.to_string(),
            post_comment: true,
        }
    }
}

impl GateConfig {
    /// Create a config with a custom changelog directory.
    pub fn new(changelog_dir: &str) -> Self {
        GateConfig {
            changelog_dir: changelog_dir.to_string(),
            post_comment: true,
        }
    }

    /// Disable comment reconciliation.
    pub fn without_comment(mut self) -> Self {
        self.post_comment = false;
        self
    }
}
