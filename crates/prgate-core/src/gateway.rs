//! Host API gateway trait and wire types
//!
//! The engine talks to the VCS host through `HostGateway`, a narrow async
//! interface covering exactly the calls a validation run needs. Every call is
//! single-attempt: no retry layer, any failure surfaces to the caller.
//! An in-memory fake is provided for testing via the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::event::PullRequestRef;

/// Result type for gateway operations
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// One file touched by the pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Repository-relative path
    #[serde(rename = "filename")]
    pub path: String,
}

/// One commit in the pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Full raw commit message (subject and body)
    pub message: String,
}

/// An issue-style comment on the pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueComment {
    /// Host-assigned comment id, opaque to the engine
    pub id: u64,

    /// Markdown body
    pub body: String,

    /// When the host recorded the comment
    pub created_at: DateTime<Utc>,
}

/// Narrow interface over the VCS hosting API.
///
/// Guarantees expected of implementations:
/// - Listing calls return items in the host's natural listing order; the
///   reconciler relies on that order to pick the earliest marked comment.
/// - Calls are synchronous from the engine's perspective and attempted
///   exactly once.
#[async_trait]
pub trait HostGateway: Send + Sync {
    /// List the files changed by the pull request.
    async fn list_changed_files(&self, pr: &PullRequestRef) -> GatewayResult<Vec<ChangedFile>>;

    /// List the commits contained in the pull request.
    async fn list_commits(&self, pr: &PullRequestRef) -> GatewayResult<Vec<Commit>>;

    /// List all issue comments on the pull request, in listing order.
    async fn list_comments(&self, pr: &PullRequestRef) -> GatewayResult<Vec<IssueComment>>;

    /// Create a new comment and return it as recorded by the host.
    async fn create_comment(&self, pr: &PullRequestRef, body: &str)
        -> GatewayResult<IssueComment>;

    /// Replace the body of an existing comment on the pull request.
    async fn update_comment(
        &self,
        pr: &PullRequestRef,
        comment_id: u64,
        body: &str,
    ) -> GatewayResult<IssueComment>;
}
