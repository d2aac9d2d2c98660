//! Entity component definitions.
//!
//! Components are pure data with no behavior beyond small invariant-keeping
//! helpers. Structures and units are composed of these.

use serde::{Deserialize, Serialize};

use crate::catalog::{ResourceKind, StructureKind, UnitKind};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// Unique identifier for entities within one collection.
pub type EntityId = u64;

/// Health for damageable entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Health {
    /// Current health points.
    pub current: u32,
    /// Maximum health points.
    pub max: u32,
}

impl Health {
    /// Create new health component at full health.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Check if entity is dead (health == 0).
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Apply damage, returning actual damage dealt.
    /// Uses saturating subtraction to prevent underflow.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }
}

/// Attack readiness for units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AttackCooldown {
    /// Ticks until the unit can attack again.
    pub remaining: u32,
}

impl AttackCooldown {
    /// Check if ready to attack.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    /// Start a new cooldown after an attack.
    pub fn trigger(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    /// Tick down the cooldown.
    pub fn tick(&mut self) {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
    }
}

/// A placed structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    /// Catalog kind.
    pub kind: StructureKind,
    /// Center position; fixed for the structure's lifetime.
    pub position: Vec2Fixed,
    /// Hit points.
    pub health: Health,
    /// Footprint size.
    #[serde(with = "fixed_serde")]
    pub size: Fixed,
    /// Damage per shot (0 for non-defenses).
    pub attack_damage: u32,
    /// Reach in world units (0 for non-defenses).
    #[serde(with = "fixed_serde")]
    pub attack_range: Fixed,
    /// Resource generated each accrual period.
    pub produces: Option<ResourceKind>,
}

impl Structure {
    /// Create a full-health structure of `kind` centered at `position`.
    #[must_use]
    pub fn new(kind: StructureKind, position: Vec2Fixed) -> Self {
        let stats = kind.stats();
        let (attack_damage, attack_range) = stats
            .defense
            .map_or((0, Fixed::ZERO), |defense| (defense.damage, defense.range));

        Self {
            kind,
            position,
            health: Health::new(stats.max_health),
            size: stats.size,
            attack_damage,
            attack_range,
            produces: stats.produces,
        }
    }

    /// Whether the structure still stands.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.health.is_dead()
    }
}

/// A deployed attacking unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Catalog kind.
    pub kind: UnitKind,
    /// Current position.
    pub position: Vec2Fixed,
    /// Hit points.
    pub health: Health,
    /// Damage per attack.
    pub attack_damage: u32,
    /// Distance per tick.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Footprint size.
    #[serde(with = "fixed_serde")]
    pub size: Fixed,
    /// Attack cooldown.
    pub cooldown: AttackCooldown,
}

impl Unit {
    /// Create a full-health, ready unit of `kind` at `position`.
    #[must_use]
    pub fn new(kind: UnitKind, position: Vec2Fixed) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            position,
            health: Health::new(stats.max_health),
            attack_damage: stats.damage,
            speed: stats.speed,
            size: stats.size,
            cooldown: AttackCooldown::default(),
        }
    }
}
