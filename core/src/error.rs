use std::fmt::Debug;

use thiserror::Error;

/// Failures raised while exploring an environment or maintaining the
/// discovered map.
///
/// Node and direction values are carried pre-formatted so the error type stays
/// independent of the node/direction types of a session.
#[derive(Error, Debug)]
pub enum ExploreError {
    /// The environment does not offer `direction` at `node`.
    #[error("invalid move: no exit {direction} from node {node}")]
    InvalidMove { node: String, direction: String },

    /// A recorded node was reported again with a different exit set.
    #[error("node {node} reported exits {reported}, but {recorded} were recorded")]
    InconsistentExitSet {
        node: String,
        recorded: String,
        reported: String,
    },

    /// A concrete edge was reported again with a different target.
    #[error("edge {node} -{direction}-> was recorded as {recorded}, but reported as {reported}")]
    InconsistentEdge {
        node: String,
        direction: String,
        recorded: String,
        reported: String,
    },

    #[error("node {node} has not been recorded")]
    UnknownNode { node: String },

    #[error("node {node} has no exit {direction}")]
    UnknownExit { node: String, direction: String },

    #[error("move budget exhausted after {moves} moves (limit {limit})")]
    BudgetExceeded { moves: usize, limit: usize },

    #[error("room map has no starting room")]
    EmptyMap,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExploreError {
    /// Short stable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMove { .. } => "INVALID_MOVE",
            Self::InconsistentExitSet { .. } => "INCONSISTENT_EXIT_SET",
            Self::InconsistentEdge { .. } => "INCONSISTENT_EDGE",
            Self::UnknownNode { .. } => "UNKNOWN_NODE",
            Self::UnknownExit { .. } => "UNKNOWN_EXIT",
            Self::BudgetExceeded { .. } => "BUDGET_EXCEEDED",
            Self::EmptyMap => "EMPTY_MAP",
            Self::Json(_) => "JSON",
        }
    }

    /// True when the discovered map no longer agrees with what the
    /// environment reports.
    pub fn is_integrity_fault(&self) -> bool {
        matches!(
            self,
            Self::InconsistentExitSet { .. }
                | Self::InconsistentEdge { .. }
                | Self::UnknownNode { .. }
                | Self::UnknownExit { .. }
        )
    }
}

/// A direction label that does not name any known direction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown direction label '{0}'")]
pub struct ParseDirectionError(pub String);

pub type Result<T> = std::result::Result<T, ExploreError>;

pub(crate) fn show<T: Debug + ?Sized>(value: &T) -> String {
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExploreError::BudgetExceeded { moves: 10, limit: 10 };
        assert_eq!(err.to_string(), "move budget exhausted after 10 moves (limit 10)");
    }

    #[test]
    fn test_error_code() {
        assert_eq!(ExploreError::EmptyMap.code(), "EMPTY_MAP");
        let err = ExploreError::InvalidMove {
            node: "3".into(),
            direction: "North".into(),
        };
        assert_eq!(err.code(), "INVALID_MOVE");
        assert!(!err.is_integrity_fault());
    }

    #[test]
    fn test_integrity_faults() {
        let err = ExploreError::InconsistentEdge {
            node: "0".into(),
            direction: "East".into(),
            recorded: "1".into(),
            reported: "2".into(),
        };
        assert!(err.is_integrity_fault());
        assert_eq!(
            err.to_string(),
            "edge 0 -East-> was recorded as 1, but reported as 2"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: ExploreError = parse.unwrap_err().into();
        assert_eq!(err.code(), "JSON");
    }
}
