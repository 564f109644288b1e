//! Group status snapshot and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::probe::ProbeError;

/// Value of [`GroupStatus::kind`] for URL-test groups.
pub const URL_TEST_KIND: &str = "url-test-group";

/// Point-in-time view of a group for status consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStatus {
    pub kind: String,
    /// Name of the selected candidate.
    pub current: String,
    /// All candidate names in roster order.
    pub members: Vec<String>,
}

/// Errors surfaced by group construction and probing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// Bad test URL, empty roster or zero interval. The group is never created.
    #[error("Invalid group configuration: {0}")]
    InvalidConfiguration(String),

    /// Another probe cycle is running for this group.
    #[error("A probe cycle is already in flight")]
    ProbeBusy,

    /// The prober found no usable candidate; the selection is unchanged.
    #[error("Probe failed: {0}")]
    ProbeFailed(#[from] ProbeError),
}

/// Result type for group operations.
pub type GroupResult<T> = Result<T, GroupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        let status = GroupStatus {
            kind: URL_TEST_KIND.to_string(),
            current: "hk-01".into(),
            members: vec!["hk-01".into(), "jp-01".into()],
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "url-test-group",
                "current": "hk-01",
                "members": ["hk-01", "jp-01"],
            })
        );
    }

    #[test]
    fn test_error_display() {
        let err = GroupError::from(ProbeError::NoneReachable);
        assert_eq!(err.to_string(), "Probe failed: No candidate reachable");
    }
}
