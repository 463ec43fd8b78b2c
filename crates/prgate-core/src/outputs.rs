//! Machine-readable outputs for downstream CI steps
//!
//! Outputs stay typed inside the engine and are serialized to `key=value`
//! text only at this boundary, in the shape the host CI's output file
//! expects.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::checks::{BumpType, PredicateKind};
use crate::report::ValidationResult;

/// The three output keys produced by every run.
pub const KEY_CHANGELOG_FOUND: &str = "changelog-found";
pub const KEY_VERSION_BUMP_FOUND: &str = "version-bump-found";
pub const KEY_VERSION_BUMP_TYPE: &str = "version-bump-type";

/// Typed run outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutputs {
    pub changelog_found: bool,
    pub version_bump_found: bool,
    pub version_bump_type: Option<BumpType>,
}

impl GateOutputs {
    /// Derive outputs from a validation result.
    pub fn from_result(result: &ValidationResult) -> Self {
        let changelog_found = result
            .predicate(PredicateKind::Changelog)
            .map(|p| p.passed)
            .unwrap_or(false);
        let version_bump = result.predicate(PredicateKind::VersionBump);

        GateOutputs {
            changelog_found,
            version_bump_found: version_bump.map(|p| p.passed).unwrap_or(false),
            version_bump_type: version_bump.and_then(|p| p.bump),
        }
    }

    /// Outputs for a run that evaluated no predicates.
    pub fn neutral() -> Self {
        GateOutputs {
            changelog_found: false,
            version_bump_found: false,
            version_bump_type: None,
        }
    }

    /// Key/value pairs in output order. The bump type serializes to the
    /// empty string when absent.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (KEY_CHANGELOG_FOUND, self.changelog_found.to_string()),
            (KEY_VERSION_BUMP_FOUND, self.version_bump_found.to_string()),
            (
                KEY_VERSION_BUMP_TYPE,
                self.version_bump_type
                    .map(|b| b.as_str().to_string())
                    .unwrap_or_default(),
            ),
        ]
    }

    /// Append the pairs to a `GITHUB_OUTPUT`-style file.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        for (key, value) in self.pairs() {
            writeln!(file, "{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Predicate;

    fn result(changelog: bool, bump: Option<BumpType>) -> ValidationResult {
        ValidationResult::new(vec![
            Predicate {
                kind: PredicateKind::Changelog,
                passed: changelog,
                bump: None,
            },
            Predicate {
                kind: PredicateKind::VersionBump,
                passed: bump.is_some(),
                bump,
            },
        ])
    }

    #[test]
    fn test_pairs_for_passing_run() {
        let outputs = GateOutputs::from_result(&result(true, Some(BumpType::Patch)));
        assert_eq!(
            outputs.pairs(),
            vec![
                ("changelog-found", "true".to_string()),
                ("version-bump-found", "true".to_string()),
                ("version-bump-type", "patch".to_string()),
            ]
        );
    }

    #[test]
    fn test_bump_type_empty_when_absent() {
        let outputs = GateOutputs::from_result(&result(false, None));
        assert_eq!(
            outputs.pairs(),
            vec![
                ("changelog-found", "false".to_string()),
                ("version-bump-found", "false".to_string()),
                ("version-bump-type", String::new()),
            ]
        );
    }

    #[test]
    fn test_write_appends_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gh_output");
        std::fs::write(&path, "previous-step=done\n").unwrap();

        let outputs = GateOutputs::from_result(&result(true, Some(BumpType::Major)));
        outputs.write_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("previous-step=done\n"));
        assert!(content.contains("changelog-found=true\n"));
        assert!(content.contains("version-bump-type=major\n"));
    }
}
