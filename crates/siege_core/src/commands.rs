//! Player intents accepted by the simulation.

use serde::{Deserialize, Serialize};

use crate::catalog::{StructureKind, UnitKind};
use crate::components::EntityId;
use crate::math::Vec2Fixed;

/// A player command.
///
/// Applied through [`Simulation::apply`](crate::simulation::Simulation::apply);
/// each command either fully succeeds or leaves the simulation untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Place a structure of `kind` centered at `position`.
    PlaceStructure {
        /// Structure kind.
        kind: StructureKind,
        /// Center position.
        position: Vec2Fixed,
    },
    /// Arm a structure kind for the next placement.
    SelectStructure(StructureKind),
    /// Place the armed structure kind.
    PlaceSelected(Vec2Fixed),
    /// Train one troop of the given kind.
    TrainUnit(UnitKind),
    /// Deploy one troop of the selected kind.
    DeployUnit(Vec2Fixed),
    /// Click on the battlefield: deploy in attack mode, otherwise place.
    PrimaryAction(Vec2Fixed),
    /// Flip attack mode.
    ToggleAttackMode,
    /// Restore the initial state.
    Reset,
}

impl Command {
    /// Short name for logs and protocol acks.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PlaceStructure { .. } => "place_structure",
            Self::SelectStructure(_) => "select_structure",
            Self::PlaceSelected(_) => "place_selected",
            Self::TrainUnit(_) => "train_unit",
            Self::DeployUnit(_) => "deploy_unit",
            Self::PrimaryAction(_) => "primary_action",
            Self::ToggleAttackMode => "toggle_attack_mode",
            Self::Reset => "reset",
        }
    }
}

/// What a successful command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// A structure was placed.
    Placed(EntityId),
    /// A structure kind was armed.
    Selected(StructureKind),
    /// A troop was trained; `troops` is the new available count.
    Trained {
        /// Kind now selected for deployment.
        kind: UnitKind,
        /// Troops available after training.
        troops: u32,
    },
    /// A unit was deployed.
    Deployed(EntityId),
    /// Attack mode is now the given value.
    AttackMode(bool),
    /// The simulation was reset.
    Reset,
    /// Nothing to do (a click with nothing selected).
    Ignored,
}
