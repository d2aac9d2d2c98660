//! Static structure and unit catalogs.
//!
//! Every placeable structure and trainable unit is a variant of a closed
//! enum; stats are looked up with exhaustive matches over `&'static` tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::math::Fixed;

/// A resource the player spends and producer structures generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Spent on structures.
    Gold,
    /// Spent on training units.
    Elixir,
}

impl ResourceKind {
    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Elixir => "elixir",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Offensive stats carried by defensive structures.
///
/// Nothing in the simulation step reads these yet; structures never fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefenseStats {
    /// Damage per shot.
    pub damage: u32,
    /// Reach in world units.
    pub range: Fixed,
}

/// Catalog entry for a structure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureStats {
    /// Gold cost to place.
    pub cost: u32,
    /// Maximum hit points.
    pub max_health: u32,
    /// Footprint size used for placement spacing and attack range.
    pub size: Fixed,
    /// Defensive stats, if the structure is a defense.
    pub defense: Option<DefenseStats>,
    /// Resource generated each accrual period.
    pub produces: Option<ResourceKind>,
    /// Display color (hex).
    pub color: &'static str,
}

/// Catalog entry for a unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    /// Elixir cost to train.
    pub cost: u32,
    /// Maximum hit points.
    pub max_health: u32,
    /// Damage dealt per attack.
    pub damage: u32,
    /// Distance covered per tick.
    pub speed: Fixed,
    /// Footprint size (render radius).
    pub size: Fixed,
    /// Display color (hex).
    pub color: &'static str,
}

const TOWN_HALL: StructureStats = StructureStats {
    cost: 500,
    max_health: 1000,
    size: Fixed::const_from_int(60),
    defense: None,
    produces: None,
    color: "#FFD700",
};

const CANNON: StructureStats = StructureStats {
    cost: 300,
    max_health: 500,
    size: Fixed::const_from_int(40),
    defense: Some(DefenseStats {
        damage: 20,
        range: Fixed::const_from_int(150),
    }),
    produces: None,
    color: "#8B4513",
};

const ARCHER_TOWER: StructureStats = StructureStats {
    cost: 400,
    max_health: 600,
    size: Fixed::const_from_int(45),
    defense: Some(DefenseStats {
        damage: 15,
        range: Fixed::const_from_int(180),
    }),
    produces: None,
    color: "#696969",
};

const GOLD_MINE: StructureStats = StructureStats {
    cost: 200,
    max_health: 300,
    size: Fixed::const_from_int(35),
    defense: None,
    produces: Some(ResourceKind::Gold),
    color: "#DAA520",
};

const ELIXIR_COLLECTOR: StructureStats = StructureStats {
    cost: 250,
    max_health: 350,
    size: Fixed::const_from_int(35),
    defense: None,
    produces: Some(ResourceKind::Elixir),
    color: "#9370DB",
};

const BARBARIAN: UnitStats = UnitStats {
    cost: 50,
    max_health: 100,
    damage: 15,
    speed: Fixed::const_from_int(2),
    size: Fixed::const_from_int(15),
    color: "#FF6347",
};

const ARCHER: UnitStats = UnitStats {
    cost: 75,
    max_health: 80,
    damage: 20,
    speed: Fixed::from_bits(0x1_8000_0000),
    size: Fixed::const_from_int(12),
    color: "#4169E1",
};

/// Every structure the player can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    /// Town hall.
    #[serde(rename = "townhall")]
    TownHall,
    /// Cannon.
    Cannon,
    /// Archer tower.
    #[serde(rename = "archertower")]
    ArcherTower,
    /// Gold mine; produces gold.
    #[serde(rename = "goldmine")]
    GoldMine,
    /// Elixir collector; produces elixir.
    #[serde(rename = "elixircollector")]
    ElixirCollector,
}

impl StructureKind {
    /// All structure kinds in catalog order.
    pub const ALL: [Self; 5] = [
        Self::TownHall,
        Self::Cannon,
        Self::ArcherTower,
        Self::GoldMine,
        Self::ElixirCollector,
    ];

    /// Catalog stats for this kind.
    #[must_use]
    pub const fn stats(self) -> &'static StructureStats {
        match self {
            Self::TownHall => &TOWN_HALL,
            Self::Cannon => &CANNON,
            Self::ArcherTower => &ARCHER_TOWER,
            Self::GoldMine => &GOLD_MINE,
            Self::ElixirCollector => &ELIXIR_COLLECTOR,
        }
    }

    /// Stable string id.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::TownHall => "townhall",
            Self::Cannon => "cannon",
            Self::ArcherTower => "archertower",
            Self::GoldMine => "goldmine",
            Self::ElixirCollector => "elixircollector",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StructureKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| GameError::UnknownStructureType(s.to_string()))
    }
}

/// Every unit the player can train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Fast melee unit.
    Barbarian,
    /// Slower, harder-hitting unit.
    Archer,
}

impl UnitKind {
    /// All unit kinds in catalog order.
    pub const ALL: [Self; 2] = [Self::Barbarian, Self::Archer];

    /// Catalog stats for this kind.
    #[must_use]
    pub const fn stats(self) -> &'static UnitStats {
        match self {
            Self::Barbarian => &BARBARIAN,
            Self::Archer => &ARCHER,
        }
    }

    /// Stable string id.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Barbarian => "barbarian",
            Self::Archer => "archer",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for UnitKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| GameError::UnknownUnitType(s.to_string()))
    }
}
