//! Error types for the game simulation.
//!
//! Every command rejection is recoverable: the simulation is left exactly
//! as it was before the call.

use thiserror::Error;

use crate::catalog::{ResourceKind, StructureKind};
use crate::components::EntityId;
use crate::math::Vec2Fixed;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// Not enough gold or elixir for the requested action.
    #[error("Insufficient resources: need {required} {resource}, have {available}")]
    InsufficientResources {
        /// Resource type.
        resource: ResourceKind,
        /// Amount required.
        required: u32,
        /// Amount available.
        available: u32,
    },

    /// The new structure's footprint would collide with an existing one.
    #[error("Invalid placement: {kind} at {position} collides with structure {blocking}")]
    InvalidPlacement {
        /// Structure being placed.
        kind: StructureKind,
        /// Requested center.
        position: Vec2Fixed,
        /// First existing structure in the way.
        blocking: EntityId,
    },

    /// Deploy requested with zero trained troops.
    #[error("No troops available to deploy")]
    NoTroopsAvailable,

    /// The action needs a pending selection that is absent.
    #[error("Invalid selection: no {0} selected")]
    InvalidSelection(&'static str),

    /// Deploy requested outside attack mode.
    #[error("Attack mode is not enabled")]
    AttackModeDisabled,

    /// Structure id not present in the catalog.
    #[error("Unknown structure type: {0}")]
    UnknownStructureType(String),

    /// Unit id not present in the catalog.
    #[error("Unknown unit type: {0}")]
    UnknownUnitType(String),

    /// Coordinates outside the world bounds.
    #[error("Position out of range: ({x}, {y})")]
    PositionOutOfRange {
        /// Requested x.
        x: f64,
        /// Requested y.
        y: f64,
    },

    /// Config file could not be read.
    #[error("Failed to read config '{path}': {source}")]
    ConfigIo {
        /// Path to the config file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Config file parsing error.
    #[error("Failed to parse config '{path}': {message}")]
    ConfigParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Snapshot frame could not be encoded or decoded.
    #[error("Snapshot encoding failed: {0}")]
    SnapshotEncoding(String),
}

impl GameError {
    /// Stable snake_case tag for protocol error reporting.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientResources { .. } => "insufficient_resources",
            Self::InvalidPlacement { .. } => "invalid_placement",
            Self::NoTroopsAvailable => "no_troops_available",
            Self::InvalidSelection(_) => "invalid_selection",
            Self::AttackModeDisabled => "attack_mode_disabled",
            Self::UnknownStructureType(_) => "unknown_structure_type",
            Self::UnknownUnitType(_) => "unknown_unit_type",
            Self::PositionOutOfRange { .. } => "position_out_of_range",
            Self::ConfigIo { .. } => "config_io",
            Self::ConfigParseError { .. } => "config_parse",
            Self::SnapshotEncoding(_) => "snapshot_encoding",
        }
    }

    /// Whether this error is a rejected player command (as opposed to a
    /// setup or encoding failure).
    #[must_use]
    pub const fn is_command_rejection(&self) -> bool {
        matches!(
            self,
            Self::InsufficientResources { .. }
                | Self::InvalidPlacement { .. }
                | Self::NoTroopsAvailable
                | Self::InvalidSelection(_)
                | Self::AttackModeDisabled
                | Self::UnknownStructureType(_)
                | Self::UnknownUnitType(_)
                | Self::PositionOutOfRange { .. }
        )
    }
}
