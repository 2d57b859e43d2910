//! Explorer configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::PolicyKind;

/// Configuration for an exploration session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Maximum number of moves before the session is aborted (`None` =
    /// unlimited). Guards against environments that never settle.
    pub max_moves: Option<usize>,

    /// How the next unknown exit is chosen.
    pub policy: PolicyKind,
}

impl ExplorerConfig {
    pub fn with_budget(max_moves: usize) -> Self {
        Self {
            max_moves: Some(max_moves),
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}
