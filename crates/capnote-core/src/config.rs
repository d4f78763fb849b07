//! Engine configuration.
//!
//! ```toml
//! duplicate_links = "dedupe"   # or "append"
//! merge_outcomes = true
//! gap_marker = "practice gap"
//! skip_archived_gaps = true
//! placeholder_sections = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What to do when an issue is linked to a practice gap it is already linked to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateLinkPolicy {
    /// Skip ids and annotations that are already present.
    #[default]
    Dedupe,
    /// Push unconditionally, counting repeat observations.
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub duplicate_links: DuplicateLinkPolicy,
    /// Carry recorded outcomes over when follow-ups are rebuilt.
    pub merge_outcomes: bool,
    /// Bracket label that marks an assessment line as naming a practice gap.
    pub gap_marker: String,
    pub skip_archived_gaps: bool,
    /// Refill emptied sections with a blank block.
    pub placeholder_sections: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duplicate_links: DuplicateLinkPolicy::default(),
            merge_outcomes: true,
            gap_marker: "practice gap".to_string(),
            skip_archived_gaps: true,
            placeholder_sections: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.duplicate_links, DuplicateLinkPolicy::Dedupe);
        assert!(cfg.merge_outcomes);
    }

    #[test]
    fn partial_override() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            duplicate_links = "append"
            gap_marker = "gap"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.duplicate_links, DuplicateLinkPolicy::Append);
        assert_eq!(cfg.gap_marker, "gap");
        assert!(cfg.skip_archived_gaps);
    }

    #[test]
    fn bad_policy_is_rejected() {
        let err = EngineConfig::from_toml_str(r#"duplicate_links = "sometimes""#).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EngineConfig::load(Path::new("/nonexistent/capnote.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/capnote.toml"));
    }
}
