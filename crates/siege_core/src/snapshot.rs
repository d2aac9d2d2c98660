//! Read-only views of the simulation for rendering.
//!
//! A [`Snapshot`] is an owned copy: holding one never blocks the simulation.

use serde::{Deserialize, Serialize};

use crate::catalog::{StructureKind, UnitKind};
use crate::components::{EntityId, Structure, Unit};
use crate::error::{GameError, Result};

/// Render data for one structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureView {
    /// Entity id.
    pub id: EntityId,
    /// Structure kind.
    pub kind: StructureKind,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Footprint size.
    pub size: f64,
    /// Display color.
    pub color: String,
    /// Current hit points.
    pub health: u32,
    /// Maximum hit points.
    pub max_health: u32,
}

impl StructureView {
    pub(crate) fn new(id: EntityId, structure: &Structure) -> Self {
        let (x, y) = structure.position.to_f64();
        Self {
            id,
            kind: structure.kind,
            x,
            y,
            size: structure.size.to_num(),
            color: structure.kind.stats().color.to_string(),
            health: structure.health.current,
            max_health: structure.health.max,
        }
    }
}

/// Render data for one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitView {
    /// Entity id.
    pub id: EntityId,
    /// Unit kind.
    pub kind: UnitKind,
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
    /// Footprint size.
    pub size: f64,
    /// Display color.
    pub color: String,
    /// Current hit points.
    pub health: u32,
    /// Maximum hit points.
    pub max_health: u32,
    /// Ticks until the unit can attack again.
    pub cooldown: u32,
}

impl UnitView {
    pub(crate) fn new(id: EntityId, unit: &Unit) -> Self {
        let (x, y) = unit.position.to_f64();
        Self {
            id,
            kind: unit.kind,
            x,
            y,
            size: unit.size.to_num(),
            color: unit.kind.stats().color.to_string(),
            health: unit.health.current,
            max_health: unit.health.max,
            cooldown: unit.cooldown.remaining,
        }
    }
}

/// Everything Presentation needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulation tick the snapshot was taken at.
    pub tick: u64,
    /// Gold stockpile.
    pub gold: u32,
    /// Elixir stockpile.
    pub elixir: u32,
    /// Deployable troops.
    pub troops: u32,
    /// Whether attack mode is on.
    pub attack_mode: bool,
    /// Armed structure kind, if any.
    pub selected_structure: Option<StructureKind>,
    /// Selected unit kind, if any.
    pub selected_unit: Option<UnitKind>,
    /// Live structures in id order.
    pub structures: Vec<StructureView>,
    /// Live units in id order.
    pub units: Vec<UnitView>,
}

impl Snapshot {
    /// Encode as a compact binary frame.
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::SnapshotEncoding(format!("Failed to encode snapshot: {e}")))
    }

    /// Decode a frame produced by [`encode`](Self::encode).
    pub fn decode(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| GameError::SnapshotEncoding(format!("Failed to decode snapshot: {e}")))
    }
}
