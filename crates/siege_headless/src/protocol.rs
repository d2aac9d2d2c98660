//! JSON protocol for headless siege sessions.
//!
//! The runners communicate via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Requests from the controller
//! **Output (stdout):** One response per request
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","tick":0}
//! -> {"cmd":"place","structure":"goldmine","x":100,"y":100}
//! <- {"type":"placed","id":1}
//! -> {"cmd":"train","unit":"barbarian"}
//! <- {"type":"trained","unit":"barbarian","troops":11}
//! -> {"cmd":"toggle_attack"}
//! <- {"type":"attack_mode","enabled":true}
//! -> {"cmd":"deploy","x":50,"y":50}
//! <- {"type":"deployed","id":1}
//! -> {"cmd":"tick","count":60}
//! <- {"type":"ticked","tick":60,"attacks":0,"destroyed":[]}
//! -> {"cmd":"elapse","ms":6000}
//! <- {"type":"accrued","gold":15,"elixir":0}
//! -> {"cmd":"query"}
//! <- {"type":"state","tick":60,"gold":815,...}
//! ```

use serde::{Deserialize, Serialize};
use siege_core::catalog::{StructureKind, UnitKind};
use siege_core::commands::{Command, CommandOutcome};
use siege_core::components::EntityId;
use siege_core::error::GameError;
use siege_core::math::Vec2Fixed;
use siege_core::snapshot::Snapshot;

/// Protocol version reported in the ready line.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Requests (Controller -> Runner)
// ============================================================================

/// Requests that can be sent to a runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Request {
    /// Place a structure at a position.
    Place { structure: String, x: f64, y: f64 },

    /// Arm a structure kind for the next click.
    SelectStructure { structure: String },

    /// Train one troop.
    Train { unit: String },

    /// Deploy one troop of the selected kind.
    Deploy { x: f64, y: f64 },

    /// Battlefield click: deploy in attack mode, otherwise place.
    Click { x: f64, y: f64 },

    /// Flip attack mode.
    ToggleAttack,

    /// Restore the initial state.
    Reset,

    /// Advance simulation by N ticks (default: 1). Stepped mode only.
    Tick {
        #[serde(default = "default_tick_count")]
        count: u32,
    },

    /// Let wall-clock time pass for accrual. Stepped mode only.
    Elapse { ms: u64 },

    /// Query current state without advancing time.
    Query,

    /// Report the state hash (for determinism verification).
    Hash,

    /// Quit the session.
    Quit,
}

fn default_tick_count() -> u32 {
    1
}

impl Request {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get request name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Place { .. } => "place",
            Self::SelectStructure { .. } => "select_structure",
            Self::Train { .. } => "train",
            Self::Deploy { .. } => "deploy",
            Self::Click { .. } => "click",
            Self::ToggleAttack => "toggle_attack",
            Self::Reset => "reset",
            Self::Tick { .. } => "tick",
            Self::Elapse { .. } => "elapse",
            Self::Query => "query",
            Self::Hash => "hash",
            Self::Quit => "quit",
        }
    }

    /// Translate a player request into a simulation command.
    ///
    /// Returns `Ok(None)` for session-control requests (tick, elapse,
    /// query, hash, quit), which runners handle themselves.
    pub fn to_command(&self) -> Result<Option<Command>, GameError> {
        let command = match self {
            Self::Place { structure, x, y } => Command::PlaceStructure {
                kind: structure.parse::<StructureKind>()?,
                position: position(*x, *y)?,
            },
            Self::SelectStructure { structure } => Command::SelectStructure(structure.parse()?),
            Self::Train { unit } => Command::TrainUnit(unit.parse::<UnitKind>()?),
            Self::Deploy { x, y } => Command::DeployUnit(position(*x, *y)?),
            Self::Click { x, y } => Command::PrimaryAction(position(*x, *y)?),
            Self::ToggleAttack => Command::ToggleAttackMode,
            Self::Reset => Command::Reset,
            Self::Tick { .. } | Self::Elapse { .. } | Self::Query | Self::Hash | Self::Quit => {
                return Ok(None)
            }
        };
        Ok(Some(command))
    }
}

fn position(x: f64, y: f64) -> Result<Vec2Fixed, GameError> {
    Vec2Fixed::from_f64(x, y).ok_or(GameError::PositionOutOfRange { x, y })
}

// ============================================================================
// Output Responses (Runner -> Controller)
// ============================================================================

/// Responses sent by a runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept requests.
    Ready { version: String, tick: u64 },

    /// Structure placed.
    Placed { id: EntityId },

    /// Structure kind armed.
    Selected { structure: StructureKind },

    /// Troop trained.
    Trained { unit: UnitKind, troops: u32 },

    /// Unit deployed.
    Deployed { id: EntityId },

    /// Attack mode changed.
    AttackMode { enabled: bool },

    /// Simulation reset.
    Reset,

    /// Click with nothing to do.
    Ignored,

    /// Ticks ran.
    Ticked {
        tick: u64,
        attacks: usize,
        destroyed: Vec<EntityId>,
    },

    /// Accrual periods fired while time elapsed.
    Accrued { gold: u32, elixir: u32 },

    /// Current state.
    State {
        #[serde(flatten)]
        snapshot: Snapshot,
    },

    /// State hash for determinism verification.
    Hash { tick: u64, hash: u64 },

    /// Request failed.
    Error { kind: String, message: String },

    /// Goodbye message before shutdown.
    Bye,
}

// ============================================================================
// Helpers
// ============================================================================

impl Response {
    /// Create a ready response.
    pub fn ready(tick: u64) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            tick,
        }
    }

    /// Create an error response.
    pub fn error(kind: &str, message: impl Into<String>) -> Self {
        Self::Error {
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","kind":"internal","message":"Serialization failed: {e}"}}"#)
        });
        json.push('\n');
        json
    }
}

impl From<CommandOutcome> for Response {
    fn from(outcome: CommandOutcome) -> Self {
        match outcome {
            CommandOutcome::Placed(id) => Self::Placed { id },
            CommandOutcome::Selected(structure) => Self::Selected { structure },
            CommandOutcome::Trained { kind, troops } => Self::Trained { unit: kind, troops },
            CommandOutcome::Deployed(id) => Self::Deployed { id },
            CommandOutcome::AttackMode(enabled) => Self::AttackMode { enabled },
            CommandOutcome::Reset => Self::Reset,
            CommandOutcome::Ignored => Self::Ignored,
        }
    }
}
