//! In-memory fake for the host gateway (testing only)
//!
//! `MemoryHostGateway` satisfies the [`HostGateway`] contract without any
//! network, plus seeding helpers and per-call failure injection so tests can
//! exercise transport-error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::GatewayError;
use crate::event::PullRequestRef;
use crate::gateway::{ChangedFile, Commit, GatewayResult, HostGateway, IssueComment};

#[derive(Debug, Default)]
struct PrState {
    files: Vec<ChangedFile>,
    commits: Vec<Commit>,
    comments: Vec<IssueComment>,
}

/// In-memory host gateway backed by a `Mutex<HashMap<pr, state>>`.
#[derive(Debug, Default)]
pub struct MemoryHostGateway {
    prs: Mutex<HashMap<String, PrState>>,
    next_comment_id: AtomicU64,

    /// When set, the corresponding calls fail with a transport error.
    pub fail_list_changed_files: AtomicBool,
    pub fail_list_commits: AtomicBool,
    pub fail_comment_writes: AtomicBool,
}

impl MemoryHostGateway {
    pub fn new() -> Self {
        MemoryHostGateway {
            next_comment_id: AtomicU64::new(1),
            ..Self::default()
        }
    }

    fn key(pr: &PullRequestRef) -> String {
        pr.to_string()
    }

    /// Seed the changed-file list for a PR.
    pub fn seed_files(&self, pr: &PullRequestRef, paths: &[&str]) {
        let mut prs = self.prs.lock().unwrap();
        prs.entry(Self::key(pr)).or_default().files = paths
            .iter()
            .map(|p| ChangedFile {
                path: (*p).to_string(),
            })
            .collect();
    }

    /// Seed the commit list for a PR.
    pub fn seed_commits(&self, pr: &PullRequestRef, messages: &[&str]) {
        let mut prs = self.prs.lock().unwrap();
        prs.entry(Self::key(pr)).or_default().commits = messages
            .iter()
            .map(|m| Commit {
                message: (*m).to_string(),
            })
            .collect();
    }

    /// Seed an existing comment and return its id.
    pub fn seed_comment(&self, pr: &PullRequestRef, body: &str) -> u64 {
        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst);
        let mut prs = self.prs.lock().unwrap();
        prs.entry(Self::key(pr)).or_default().comments.push(IssueComment {
            id,
            body: body.to_string(),
            created_at: Utc::now(),
        });
        id
    }

    /// Bodies of all comments on a PR, in listing order.
    pub fn comment_bodies(&self, pr: &PullRequestRef) -> Vec<String> {
        let prs = self.prs.lock().unwrap();
        prs.get(&Self::key(pr))
            .map(|s| s.comments.iter().map(|c| c.body.clone()).collect())
            .unwrap_or_default()
    }

    fn transport_error(call: &str) -> GatewayError {
        GatewayError::Transport(format!("injected failure in {call}"))
    }
}

#[async_trait]
impl HostGateway for MemoryHostGateway {
    async fn list_changed_files(&self, pr: &PullRequestRef) -> GatewayResult<Vec<ChangedFile>> {
        if self.fail_list_changed_files.load(Ordering::SeqCst) {
            return Err(Self::transport_error("list_changed_files"));
        }
        let prs = self.prs.lock().unwrap();
        Ok(prs
            .get(&Self::key(pr))
            .map(|s| s.files.clone())
            .unwrap_or_default())
    }

    async fn list_commits(&self, pr: &PullRequestRef) -> GatewayResult<Vec<Commit>> {
        if self.fail_list_commits.load(Ordering::SeqCst) {
            return Err(Self::transport_error("list_commits"));
        }
        let prs = self.prs.lock().unwrap();
        Ok(prs
            .get(&Self::key(pr))
            .map(|s| s.commits.clone())
            .unwrap_or_default())
    }

    async fn list_comments(&self, pr: &PullRequestRef) -> GatewayResult<Vec<IssueComment>> {
        let prs = self.prs.lock().unwrap();
        Ok(prs
            .get(&Self::key(pr))
            .map(|s| s.comments.clone())
            .unwrap_or_default())
    }

    async fn create_comment(
        &self,
        pr: &PullRequestRef,
        body: &str,
    ) -> GatewayResult<IssueComment> {
        if self.fail_comment_writes.load(Ordering::SeqCst) {
            return Err(Self::transport_error("create_comment"));
        }
        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst);
        let comment = IssueComment {
            id,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        let mut prs = self.prs.lock().unwrap();
        prs.entry(Self::key(pr)).or_default().comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(
        &self,
        pr: &PullRequestRef,
        comment_id: u64,
        body: &str,
    ) -> GatewayResult<IssueComment> {
        if self.fail_comment_writes.load(Ordering::SeqCst) {
            return Err(Self::transport_error("update_comment"));
        }
        let mut prs = self.prs.lock().unwrap();
        let state = prs
            .get_mut(&Self::key(pr))
            .ok_or_else(|| GatewayError::NotFound(format!("pull request {pr}")))?;
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| GatewayError::NotFound(format!("comment {comment_id}")))?;
        comment.body = body.to_string();
        Ok(comment.clone())
    }
}
