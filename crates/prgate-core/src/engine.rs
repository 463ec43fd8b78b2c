//! Validation run controller
//!
//! One sequential pass per invocation: fetch changed files, evaluate the
//! changelog predicate, fetch commits, evaluate the version-bump predicate,
//! render the report, reconcile the status comment, and hand the outcome
//! back for output/exit-status mapping.

use std::sync::Arc;

use tracing::{info, warn};

use crate::checks::{ChangelogCheck, VersionBumpCheck};
use crate::config::GateConfig;
use crate::error::{GateError, GateResult};
use crate::event::PullRequestRef;
use crate::gateway::HostGateway;
use crate::outputs::GateOutputs;
use crate::reconcile::{CommentReconciler, ReconcileAction};
use crate::report::{render, Severity, ValidationResult};

/// Outcome of a validation run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The host reported no changed files. The run is neutrally successful:
    /// no predicates were evaluated and no comment was posted.
    Skipped,

    /// Predicates were evaluated and a report was produced.
    Completed {
        result: ValidationResult,

        /// What happened to the status comment; `None` when posting was
        /// disabled or failed (posting is best-effort).
        reconciled: Option<ReconcileAction>,
    },
}

impl RunOutcome {
    /// Whether the run counts as passing for exit-status purposes.
    ///
    /// Independent of whether comment posting succeeded.
    pub fn passed(&self) -> bool {
        match self {
            RunOutcome::Skipped => true,
            RunOutcome::Completed { result, .. } => result.overall,
        }
    }

    /// Machine-readable outputs for this outcome.
    pub fn outputs(&self) -> GateOutputs {
        match self {
            RunOutcome::Skipped => GateOutputs::neutral(),
            RunOutcome::Completed { result, .. } => GateOutputs::from_result(result),
        }
    }
}

/// The PR validation engine.
pub struct GateEngine {
    gateway: Arc<dyn HostGateway>,
}

impl GateEngine {
    pub fn new(gateway: Arc<dyn HostGateway>) -> Self {
        GateEngine { gateway }
    }

    /// Run the full validation sequence for one pull request.
    ///
    /// Fatal errors: gateway failure while fetching files or commits, and an
    /// empty commit list. A failure while posting the comment is logged and
    /// degraded, never fatal.
    pub async fn run(&self, config: &GateConfig, pr: &PullRequestRef) -> GateResult<RunOutcome> {
        info!(pr = %pr, changelog_dir = %config.changelog_dir, "Validating pull request");

        let files = self.gateway.list_changed_files(pr).await?;
        if files.is_empty() {
            info!(pr = %pr, "No changed files reported, skipping validation");
            return Ok(RunOutcome::Skipped);
        }

        let changelog = ChangelogCheck::evaluate(&config.changelog_dir, &files);
        info!(passed = changelog.passed, "Changelog check evaluated");

        let commits = self.gateway.list_commits(pr).await?;
        if commits.is_empty() {
            return Err(GateError::NoCommits { number: pr.number });
        }

        let version_bump = VersionBumpCheck::evaluate(&commits);
        info!(
            passed = version_bump.passed,
            bump = version_bump.bump.map(|b| b.as_str()).unwrap_or(""),
            "Version-bump check evaluated"
        );

        let result = ValidationResult::new(vec![changelog, version_bump]);
        let report = render(&result, config);

        let reconciled = if config.post_comment {
            let reconciler = CommentReconciler::new(self.gateway.clone());
            match reconciler.reconcile(pr, &report.body).await {
                Ok(action) => Some(action),
                Err(err) => {
                    warn!(pr = %pr, error = %err, "Failed to post status comment; validation result is unaffected");
                    None
                }
            }
        } else {
            None
        };

        match report.severity {
            Severity::Pass => info!(pr = %pr, "Pull request passed validation"),
            Severity::Fail => info!(pr = %pr, "Pull request failed validation"),
        }

        Ok(RunOutcome::Completed { result, reconciled })
    }
}
