//! Validation result aggregation and comment rendering
//!
//! The rendered comment is a complete status snapshot: every predicate gets
//! a block, passed or failed, so a reader never has to diff against an
//! earlier comment. A hidden marker token identifies the comment to the
//! reconciler and carries no meaning for the reader.

use serde::{Deserialize, Serialize};

use crate::checks::{Predicate, PredicateKind};
use crate::config::GateConfig;

/// Marker embedded verbatim in every status comment.
///
/// This is the sole reconciliation key. It is deliberately not configurable:
/// changing it would orphan comments posted by earlier runs.
pub const COMMENT_MARKER: &str = "<!-- prgate:status -->";

/// Aggregate outcome of a validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Predicate outcomes in evaluation order (changelog, then version bump)
    pub predicates: Vec<Predicate>,

    /// True iff every predicate passed
    pub overall: bool,
}

impl ValidationResult {
    /// Aggregate predicate outcomes. Overall is a plain conjunction.
    pub fn new(predicates: Vec<Predicate>) -> Self {
        let overall = predicates.iter().all(|p| p.passed);
        ValidationResult {
            predicates,
            overall,
        }
    }

    /// Outcome of the named predicate, if it was evaluated.
    pub fn predicate(&self, kind: PredicateKind) -> Option<&Predicate> {
        self.predicates.iter().find(|p| p.kind == kind)
    }
}

/// Severity of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Pass,
    Fail,
}

/// A rendered status comment.
#[derive(Debug, Clone)]
pub struct Report {
    /// Markdown comment body, marker included
    pub body: String,

    /// Pass iff the overall result passed
    pub severity: Severity,
}

/// Render the status comment for a validation result.
///
/// Deterministic: the same result and config always produce the same body.
pub fn render(result: &ValidationResult, config: &GateConfig) -> Report {
    let mut body = String::new();
    body.push_str(COMMENT_MARKER);
    body.push_str("\n## Pull request validation\n\n");

    if result.overall {
        body.push_str("All checks passed.\n");
    } else {
        body.push_str("Some checks failed. Each one is listed below with how to fix it.\n");
    }

    for predicate in &result.predicates {
        body.push('\n');
        match predicate.kind {
            PredicateKind::Changelog => render_changelog(&mut body, predicate, config),
            PredicateKind::VersionBump => render_version_bump(&mut body, predicate),
        }
    }

    let severity = if result.overall {
        Severity::Pass
    } else {
        Severity::Fail
    };

    Report { body, severity }
}

fn render_changelog(body: &mut String, predicate: &Predicate, config: &GateConfig) {
    let dir = config.changelog_dir.trim_end_matches('/');
    if predicate.passed {
        body.push_str(&format!(
            "### :white_check_mark: Changelog\n\nThis pull request adds a changelog entry under `{dir}/`.\n"
        ));
    } else {
        body.push_str(&format!(
            "### :x: Changelog\n\nNo changelog entry found. Add a file under `{dir}/` \
             describing this change, for example `{dir}/my-change.md`.\n"
        ));
    }
}

fn render_version_bump(body: &mut String, predicate: &Predicate) {
    if predicate.passed {
        let bump = predicate.bump.map(|b| b.as_str()).unwrap_or_default();
        body.push_str(&format!(
            "### :white_check_mark: Version bump\n\nRelease type `{bump}` declared by a commit trailer.\n"
        ));
    } else {
        body.push_str(
            "### :x: Version bump\n\nNo `Version-Bump:` trailer found in any commit message. \
             Declare the release impact with a trailer whose value is one of `patch`, `minor` \
             or `major`:\n\n\
             ```\nFix crash on empty input\n\nVersion-Bump: patch\n```\n",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::BumpType;

    fn predicate(kind: PredicateKind, passed: bool, bump: Option<BumpType>) -> Predicate {
        Predicate { kind, passed, bump }
    }

    #[test]
    fn test_overall_is_conjunction() {
        let result = ValidationResult::new(vec![
            predicate(PredicateKind::Changelog, true, None),
            predicate(PredicateKind::VersionBump, false, None),
        ]);
        assert!(!result.overall);

        let result = ValidationResult::new(vec![
            predicate(PredicateKind::Changelog, true, None),
            predicate(PredicateKind::VersionBump, true, Some(BumpType::Patch)),
        ]);
        assert!(result.overall);
    }

    #[test]
    fn test_passing_report_names_bump_type() {
        let result = ValidationResult::new(vec![
            predicate(PredicateKind::Changelog, true, None),
            predicate(PredicateKind::VersionBump, true, Some(BumpType::Minor)),
        ]);
        let report = render(&result, &GateConfig::default());
        assert_eq!(report.severity, Severity::Pass);
        assert!(report.body.contains(COMMENT_MARKER));
        assert!(report.body.contains("`minor`"));
        assert!(report.body.contains("All checks passed"));
    }

    #[test]
    fn test_failing_report_lists_every_predicate() {
        // Mixed result: the passed predicate must still get a confirmation
        // block alongside the failed one's remediation block.
        let result = ValidationResult::new(vec![
            predicate(PredicateKind::Changelog, true, None),
            predicate(PredicateKind::VersionBump, false, None),
        ]);
        let report = render(&result, &GateConfig::default());
        assert_eq!(report.severity, Severity::Fail);
        assert!(report.body.contains("adds a changelog entry"));
        assert!(report.body.contains("No `Version-Bump:` trailer"));
        assert!(report.body.contains("Version-Bump: patch"));
    }

    #[test]
    fn test_all_failed_report_has_both_remediations() {
        let result = ValidationResult::new(vec![
            predicate(PredicateKind::Changelog, false, None),
            predicate(PredicateKind::VersionBump, false, None),
        ]);
        let report = render(&result, &GateConfig::default());
        assert!(report.body.contains("No changelog entry found"));
        assert!(report.body.contains(".changelog/my-change.md"));
        assert!(report.body.contains("No `Version-Bump:` trailer"));
    }

    #[test]
    fn test_severity_tracks_overall() {
        for (changelog, bump) in [(true, true), (true, false), (false, true), (false, false)] {
            let result = ValidationResult::new(vec![
                predicate(PredicateKind::Changelog, changelog, None),
                predicate(
                    PredicateKind::VersionBump,
                    bump,
                    bump.then_some(BumpType::Patch),
                ),
            ]);
            let report = render(&result, &GateConfig::default());
            let expected = if result.overall {
                Severity::Pass
            } else {
                Severity::Fail
            };
            assert_eq!(report.severity, expected);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let result = ValidationResult::new(vec![
            predicate(PredicateKind::Changelog, false, None),
            predicate(PredicateKind::VersionBump, true, Some(BumpType::Major)),
        ]);
        let config = GateConfig::default();
        assert_eq!(render(&result, &config).body, render(&result, &config).body);
    }
}
