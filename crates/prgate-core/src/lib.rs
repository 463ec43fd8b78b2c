//! prgate core - pull request validation engine
//!
//! Validates two independent policies on a pull request:
//! - a changelog entry was added under the configured directory
//! - some commit message carries a well-formed `Version-Bump:` trailer
//!
//! The engine fetches PR data through a narrow [`HostGateway`] interface,
//! evaluates both predicates, renders a single reconciled status comment,
//! and exposes the verdict as typed outputs for the CI boundary.

pub mod checks;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod fakes;
pub mod gateway;
pub mod github;
pub mod outputs;
pub mod reconcile;
pub mod report;

// Re-export key types
pub use checks::{BumpType, ChangelogCheck, Predicate, PredicateKind, VersionBumpCheck};
pub use config::{GateConfig, DEFAULT_CHANGELOG_DIR};
pub use engine::{GateEngine, RunOutcome};
pub use error::{GateError, GateResult, GatewayError};
pub use event::{pull_request_from_event, PullRequestRef};
pub use gateway::{ChangedFile, Commit, HostGateway, IssueComment};
pub use github::{GitHubConfig, GitHubGateway};
pub use outputs::GateOutputs;
pub use reconcile::{CommentReconciler, ReconcileAction};
pub use report::{render, Report, Severity, ValidationResult, COMMENT_MARKER};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
