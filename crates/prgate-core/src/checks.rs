//! Predicate evaluators for pull request policy checks
//!
//! Two independent, stateless checks:
//! - changelog presence: did the PR touch a file under the changelog dir?
//! - version-bump trailer: does some commit declare a release type?
//!
//! Both are pure text matching over data fetched by the gateway; neither
//! reads configuration or the environment on its own.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::gateway::{ChangedFile, Commit};

/// Release impact declared by a `Version-Bump:` commit trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

impl BumpType {
    /// Lowercase canonical form, as emitted in outputs.
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpType::Patch => "patch",
            BumpType::Minor => "minor",
            BumpType::Major => "major",
        }
    }
}

impl std::str::FromStr for BumpType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "patch" => Ok(BumpType::Patch),
            "minor" => Ok(BumpType::Minor),
            "major" => Ok(BumpType::Major),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for BumpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which policy check a predicate outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    Changelog,
    VersionBump,
}

/// Outcome of one policy check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    /// Which check produced this outcome
    pub kind: PredicateKind,

    /// Whether the check passed
    pub passed: bool,

    /// Matched bump type, for a passing version-bump check
    pub bump: Option<BumpType>,
}

/// Changelog presence check.
pub struct ChangelogCheck;

impl ChangelogCheck {
    /// Pass iff at least one changed file lives under `changelog_dir`.
    ///
    /// The match is on path segments, not substrings: `other-.changelog/x`
    /// does not count for dir `.changelog`. The first matching file wins;
    /// an empty file list fails.
    pub fn evaluate(changelog_dir: &str, files: &[ChangedFile]) -> Predicate {
        let dir = changelog_dir.trim_end_matches('/');
        let passed = !dir.is_empty()
            && files
                .iter()
                .any(|f| Self::is_under_dir(dir, &f.path));

        Predicate {
            kind: PredicateKind::Changelog,
            passed,
            bump: None,
        }
    }

    fn is_under_dir(dir: &str, path: &str) -> bool {
        match path.strip_prefix(dir) {
            // Requires a separator and at least one character after it, so
            // the directory entry itself does not count as an entry file.
            Some(rest) => rest.len() > 1 && rest.starts_with('/'),
            None => false,
        }
    }
}

/// Version-bump trailer check.
pub struct VersionBumpCheck;

impl VersionBumpCheck {
    /// Scan commits in the given order for a `Version-Bump: <type>` trailer.
    ///
    /// The first commit carrying a trailer with an enumerated value wins and
    /// ends the scan. A trailer with any other value does not match and does
    /// not stop the scan. Matching is case-insensitive and the trailer may
    /// appear on any line of the message.
    pub fn evaluate(commits: &[Commit]) -> Predicate {
        let bump = commits.iter().find_map(|c| Self::trailer_value(&c.message));

        Predicate {
            kind: PredicateKind::VersionBump,
            passed: bump.is_some(),
            bump,
        }
    }

    fn trailer_value(message: &str) -> Option<BumpType> {
        static TRAILER_RE: OnceLock<Regex> = OnceLock::new();
        let re = TRAILER_RE.get_or_init(|| {
            Regex::new(r"(?im)^version-bump:[ \t]*(patch|minor|major)\b")
                .expect("trailer pattern is valid")
        });

        re.captures(message)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}
