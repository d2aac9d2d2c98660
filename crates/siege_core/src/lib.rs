//! # Siege Core
//!
//! Deterministic base-building and raid simulation.
//!
//! This crate contains **only** game logic:
//! - No rendering
//! - No timers or threads (wall-clock time is fed in by the caller)
//! - No randomness
//! - No floating-point math in the simulation (uses fixed-point)
//!
//! Front ends (the headless driver, a renderer) own the clock and feed
//! commands, ticks and elapsed time into a [`simulation::Simulation`].
//!
//! ## Crate Structure
//!
//! - [`catalog`] - Static structure and unit stats
//! - [`components`] - Entity component definitions
//! - [`storage`] - Id-keyed entity collections
//! - [`economy`] - Player resources and the accrual schedule
//! - [`systems`] - Targeting, movement, placement and yield helpers
//! - [`commands`] - Player intents
//! - [`simulation`] - Core simulation loop
//! - [`snapshot`] - Read-only render views
//! - [`config`] - Tunables loaded from RON
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod commands;
pub mod components;
pub mod config;
pub mod economy;
pub mod error;
pub mod math;
pub mod simulation;
pub mod snapshot;
pub mod storage;
pub mod systems;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{ResourceKind, StructureKind, UnitKind};
    pub use crate::commands::{Command, CommandOutcome};
    pub use crate::components::*;
    pub use crate::config::{SimConfig, TICK_RATE};
    pub use crate::economy::{AccrualClock, AccrualReport, PlayerState};
    pub use crate::error::{GameError, Result};
    pub use crate::math::{Fixed, Vec2Fixed, WideFixed, COORDINATE_LIMIT};
    pub use crate::simulation::{AttackEvent, Simulation, TickEvents};
    pub use crate::snapshot::{Snapshot, StructureView, UnitView};
    pub use crate::storage::EntityStorage;
}
