//! Planner configuration
use serde::{Deserialize, Serialize};
use workplan_core::Result;

/// Tunables for [`crate::ExecutionPlan`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    /// Upper bound on should-run-after edges removed while breaking cycles.
    /// `None` removes as many as needed.
    pub max_should_edge_removals: Option<usize>,
}

impl PlannerConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_max_should_edge_removals(mut self, limit: usize) -> Self {
        self.max_should_edge_removals = Some(limit);
        self
    }
}
