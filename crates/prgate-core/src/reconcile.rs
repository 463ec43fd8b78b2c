//! Status comment reconciliation
//!
//! Guarantees at most one live status comment per pull request: search the
//! comment list for the marker token, update the earliest match in place, or
//! create a fresh comment when none exists.
//!
//! The read-then-write protocol is not safe against two runs for the same PR
//! racing each other. CI triggers serialize per PR, so that race is accepted
//! rather than locked around.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::event::PullRequestRef;
use crate::gateway::{GatewayResult, HostGateway};
use crate::report::COMMENT_MARKER;

/// What the reconciler did with the status comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// No prior marked comment existed; a new one was created
    Created { comment_id: u64 },

    /// A prior marked comment was updated in place
    Updated { comment_id: u64 },
}

/// Reconciles the single marked status comment on a pull request.
pub struct CommentReconciler {
    gateway: Arc<dyn HostGateway>,
}

impl CommentReconciler {
    pub fn new(gateway: Arc<dyn HostGateway>) -> Self {
        CommentReconciler { gateway }
    }

    /// Upsert the status comment to the given body.
    ///
    /// Idempotent: a second call with the same body performs an update (not
    /// a create) and succeeds even when the update is byte-identical.
    pub async fn reconcile(
        &self,
        pr: &PullRequestRef,
        body: &str,
    ) -> GatewayResult<ReconcileAction> {
        let comments = self.gateway.list_comments(pr).await?;

        let mut marked = comments.iter().filter(|c| c.body.contains(COMMENT_MARKER));
        let existing = marked.next();
        if marked.next().is_some() {
            // Should never happen under the at-most-one invariant; keep the
            // earliest and leave the stragglers alone rather than create more.
            warn!(pr = %pr, "Multiple marked status comments found, updating the earliest");
        }

        match existing {
            Some(comment) => {
                debug!(pr = %pr, comment_id = comment.id, "Updating existing status comment");
                let updated = self.gateway.update_comment(pr, comment.id, body).await?;
                Ok(ReconcileAction::Updated {
                    comment_id: updated.id,
                })
            }
            None => {
                debug!(pr = %pr, "Creating status comment");
                let created = self.gateway.create_comment(pr, body).await?;
                Ok(ReconcileAction::Created {
                    comment_id: created.id,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryHostGateway;

    fn pr() -> PullRequestRef {
        PullRequestRef {
            repository: "stevedores-org/prgate".to_string(),
            number: 12,
        }
    }

    fn body(text: &str) -> String {
        format!("{COMMENT_MARKER}\n{text}")
    }

    #[tokio::test]
    async fn test_creates_when_no_marked_comment() {
        let gateway = Arc::new(MemoryHostGateway::new());
        let reconciler = CommentReconciler::new(gateway.clone());

        let action = reconciler.reconcile(&pr(), &body("first")).await.unwrap();
        assert!(matches!(action, ReconcileAction::Created { .. }));
        assert_eq!(gateway.comment_bodies(&pr()).len(), 1);
    }

    #[tokio::test]
    async fn test_second_run_updates_not_creates() {
        let gateway = Arc::new(MemoryHostGateway::new());
        let reconciler = CommentReconciler::new(gateway.clone());

        reconciler.reconcile(&pr(), &body("first")).await.unwrap();
        let action = reconciler.reconcile(&pr(), &body("second")).await.unwrap();

        assert!(matches!(action, ReconcileAction::Updated { .. }));
        let bodies = gateway.comment_bodies(&pr());
        assert_eq!(bodies.len(), 1, "content is replaced, never appended");
        assert!(bodies[0].contains("second"));
    }

    #[tokio::test]
    async fn test_byte_identical_update_succeeds() {
        let gateway = Arc::new(MemoryHostGateway::new());
        let reconciler = CommentReconciler::new(gateway.clone());

        let text = body("same");
        reconciler.reconcile(&pr(), &text).await.unwrap();
        let action = reconciler.reconcile(&pr(), &text).await.unwrap();
        assert!(matches!(action, ReconcileAction::Updated { .. }));
        assert_eq!(gateway.comment_bodies(&pr()).len(), 1);
    }

    #[tokio::test]
    async fn test_unmarked_comments_ignored() {
        let gateway = Arc::new(MemoryHostGateway::new());
        gateway.seed_comment(&pr(), "a human comment without the token");
        let reconciler = CommentReconciler::new(gateway.clone());

        let action = reconciler.reconcile(&pr(), &body("status")).await.unwrap();
        assert!(matches!(action, ReconcileAction::Created { .. }));
        assert_eq!(gateway.comment_bodies(&pr()).len(), 2);
    }

    #[tokio::test]
    async fn test_earliest_of_multiple_marked_comments_wins() {
        let gateway = Arc::new(MemoryHostGateway::new());
        let first_id = gateway.seed_comment(&pr(), &body("stale one"));
        gateway.seed_comment(&pr(), &body("stale two"));
        let reconciler = CommentReconciler::new(gateway.clone());

        let action = reconciler.reconcile(&pr(), &body("fresh")).await.unwrap();
        assert_eq!(
            action,
            ReconcileAction::Updated {
                comment_id: first_id
            }
        );
        // No third comment was created.
        assert_eq!(gateway.comment_bodies(&pr()).len(), 2);
    }
}
