//! Configuration data structures for `orgchart`.
//!
//! Defines the YAML config format: database location, seed dataset,
//! target kind, traversal bounds, and storage retry. Every field has a
//! default, so an empty file is a valid config.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::hierarchy::{CancelToken, RetryPolicy, TraversalLimits};
use crate::types::NodeKind;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration.
///
/// Loaded from a YAML file, then environment variables, then CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgChartConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    /// Path of the SQLite database file.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// JSON seed dataset, loaded only into an empty table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<PathBuf>,

    /// Kind listed under the resolved root.
    #[serde(default = "default_target_kind")]
    pub target_kind: NodeKind,

    #[serde(default)]
    pub traversal: TraversalConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    /// Abort a request that runs longer than this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for OrgChartConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            database: default_database(),
            seed: None,
            target_kind: default_target_kind(),
            traversal: TraversalConfig::default(),
            retry: RetryConfig::default(),
            timeout_ms: None,
        }
    }
}

impl OrgChartConfig {
    pub fn limits(&self) -> TraversalLimits {
        TraversalLimits {
            max_depth: self.traversal.max_depth,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts.max(1),
            backoff: Duration::from_millis(self.retry.backoff_ms),
        }
    }

    /// A fresh token carrying the configured deadline, if any.
    pub fn cancel_token(&self) -> CancelToken {
        match self.timeout_ms {
            Some(ms) => CancelToken::with_timeout(Duration::from_millis(ms)),
            None => CancelToken::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Hops upward / levels downward before a walk is declared cyclic.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts per store call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff; doubled after each transient failure.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

fn default_database() -> PathBuf {
    PathBuf::from("orgchart.db")
}

fn default_target_kind() -> NodeKind {
    NodeKind::Employee
}

fn default_max_depth() -> usize {
    TraversalLimits::default().max_depth
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    25
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = OrgChartConfig::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.database, PathBuf::from("orgchart.db"));
        assert_eq!(config.seed, None);
        assert_eq!(config.target_kind, NodeKind::Employee);
        assert_eq!(config.traversal.max_depth, 4096);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.timeout_ms, None);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config: OrgChartConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, OrgChartConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
database: /var/lib/org.db
target_kind: department
traversal:
  max_depth: 16
"#;
        let config: OrgChartConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database, PathBuf::from("/var/lib/org.db"));
        assert_eq!(config.target_kind, NodeKind::Department);
        assert_eq!(config.traversal.max_depth, 16);
        assert_eq!(config.retry, RetryConfig::default());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let res: Result<OrgChartConfig, _> = serde_yaml::from_str("target_kind: manager");
        assert!(res.is_err());
    }

    #[test]
    fn test_serde_yaml_roundtrip() {
        let config = OrgChartConfig {
            seed: Some(PathBuf::from("data/seed.json")),
            timeout_ms: Some(500),
            ..OrgChartConfig::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: OrgChartConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_retry_policy_never_zero_attempts() {
        let mut config = OrgChartConfig::default();
        config.retry.max_attempts = 0;
        assert_eq!(config.retry_policy().max_attempts, 1);
    }

    #[test]
    fn test_zero_timeout_is_already_expired() {
        let config = OrgChartConfig {
            timeout_ms: Some(0),
            ..OrgChartConfig::default()
        };
        assert!(config.cancel_token().is_cancelled());
        assert!(!OrgChartConfig::default().cancel_token().is_cancelled());
    }
}
