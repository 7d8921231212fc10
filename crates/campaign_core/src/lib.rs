//! # Campaign Core
//!
//! Deterministic simulation core for the Warring Realms campaign game.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No UI or input handling
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! The world is a graph of persistent entities - architectures
//! (settlements), militaries (unit rosters), troops (marching formations)
//! and persons - connected by integer-ID cross-references. Entities are
//! loaded from flat record files, then a second `setup` pass resolves the
//! relationships that depend on every registry existing. A tick-driven
//! order engine advances marching troops along precomputed paths, paying
//! terrain adaptability costs out of a per-cycle movement budget.
//!
//! ## Crate Structure
//!
//! - [`registry`] - ordered, ID-indexed entity collections
//! - [`architecture`], [`military`], [`troop`], [`person`], [`faction`] - entities
//! - [`scenario`] - scenario context, two-phase load, order engine
//! - [`terrain`], [`pathfind`] - external collaborator boundaries
//! - [`math`] - grid points and fixed-point utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod architecture;
pub mod config;
pub mod error;
pub mod faction;
pub mod math;
pub mod military;
pub mod pathfind;
pub mod person;
pub mod records;
pub mod registry;
pub mod scenario;
pub mod terrain;
pub mod troop;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::architecture::{Architecture, ArchitectureKind};
    pub use crate::config::GameConfig;
    pub use crate::error::{GameError, Result};
    pub use crate::faction::{Faction, Section};
    pub use crate::math::{Fixed, MapPoint};
    pub use crate::military::{Location, Military, MilitaryKind};
    pub use crate::pathfind::{DirectPathFinder, PathFinder};
    pub use crate::person::{Person, PersonLocation, PersonState};
    pub use crate::registry::{EntityId, GameEntity, Registry, NO_ENTITY};
    pub use crate::scenario::{GameScenario, ScenarioSurvey};
    pub use crate::terrain::{AdaptabilityTable, TerrainId, TerrainMap};
    pub use crate::troop::{Order, StepOutcome, Troop};
}
