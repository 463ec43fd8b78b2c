//! Trigger event parsing
//!
//! A run is started by a host CI event. Only pull request events are valid
//! triggers; anything else is a configuration error, not a policy failure.

use serde::Deserialize;

use crate::error::{GateError, GateResult};

/// Identity of the pull request under validation.
///
/// Resolved once from the trigger payload and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Repository in `owner/name` form
    pub repository: String,

    /// Pull request number
    pub number: u64,
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.repository, self.number)
    }
}

/// Subset of the pull request event payload the engine needs.
#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestField>,
    repository: Option<RepositoryField>,
}

#[derive(Debug, Deserialize)]
struct PullRequestField {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct RepositoryField {
    full_name: String,
}

/// Event names that identify a pull request trigger.
const PULL_REQUEST_EVENTS: &[&str] = &["pull_request", "pull_request_target"];

/// Resolve a [`PullRequestRef`] from a trigger event.
///
/// Fails with [`GateError::UnsupportedEvent`] for non-PR events and with
/// [`GateError::MissingPullRequest`] / [`GateError::MissingRepository`] when
/// the payload lacks the required fields.
pub fn pull_request_from_event(event_name: &str, payload: &str) -> GateResult<PullRequestRef> {
    if !PULL_REQUEST_EVENTS.contains(&event_name) {
        return Err(GateError::UnsupportedEvent(event_name.to_string()));
    }

    let payload: EventPayload = serde_json::from_str(payload)?;

    let number = payload
        .pull_request
        .map(|pr| pr.number)
        .ok_or(GateError::MissingPullRequest)?;
    let repository = payload
        .repository
        .map(|r| r.full_name)
        .ok_or(GateError::MissingRepository)?;

    Ok(PullRequestRef { repository, number })
}
