//! Run plan loading and configuration.
//!
//! A run plan is a small RON file describing what to do to a loaded
//! scenario: which move orders to issue and how many ticks to advance.
//! Useful for reproducing a march in CI without a UI.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use campaign_core::registry::EntityId;

/// Error type for run plan operations.
#[derive(Error, Debug)]
pub enum RunPlanError {
    /// File not found.
    #[error("Run plan file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read run plan: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse run plan: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// A move order to issue before ticking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedOrder {
    /// Troop to command.
    pub troop: EntityId,
    /// March target as (x, y).
    pub target: (i32, i32),
}

/// A complete run plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPlan {
    /// Ticks to advance after issuing orders.
    pub ticks: u32,
    /// Orders to issue before the first tick.
    #[serde(default)]
    pub orders: Vec<PlannedOrder>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            ticks: 1,
            orders: Vec::new(),
        }
    }
}

impl RunPlan {
    /// Load a run plan from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RunPlanError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RunPlanError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let plan: RunPlan = ron::from_str(&contents)?;
        Ok(plan)
    }

    /// Load from a RON string (useful for embedded plans).
    pub fn from_ron_str(ron: &str) -> Result<Self, RunPlanError> {
        let plan: RunPlan = ron::from_str(ron)?;
        Ok(plan)
    }
}
