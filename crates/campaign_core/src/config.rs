//! Game-wide tunable caps.
//!
//! These were ambient globals in older revisions. They are explicit
//! state on the scenario now, so components that clamp against them can
//! be tested in isolation with arbitrary caps.

use serde::{Deserialize, Serialize};

/// Global caps applied when mutating military morale and combativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Upper bound for military morale.
    pub max_morale: i32,
    /// Upper bound for military combativity.
    pub max_combativity: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_morale: 100,
            max_combativity: 100,
        }
    }
}
