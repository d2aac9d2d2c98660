//! Core simulation loop.
//!
//! [`Simulation`] owns the whole game state: player counters, placed
//! structures and deployed units. Player commands, ticks and accrual
//! periods are each applied as one atomic step against it.
//!
//! # Determinism
//!
//! - No floating-point math (uses fixed-point via [`Fixed`])
//! - No randomness
//! - Consistent iteration order (ascending entity ids)
//! - Same inputs always produce same outputs
//!
//! # Example
//!
//! ```
//! use siege_core::catalog::{StructureKind, UnitKind};
//! use siege_core::math::Vec2Fixed;
//! use siege_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new();
//! sim.place_structure(StructureKind::Cannon, Vec2Fixed::from_int(200, 200)).unwrap();
//! sim.train_unit(UnitKind::Barbarian).unwrap();
//! sim.toggle_attack_mode();
//! sim.deploy_unit(Vec2Fixed::from_int(20, 20)).unwrap();
//!
//! let events = sim.tick();
//! assert!(events.attacks.is_empty());
//! assert_eq!(sim.get_tick(), 1);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use crate::catalog::{ResourceKind, StructureKind, UnitKind};
use crate::commands::{Command, CommandOutcome};
use crate::components::{EntityId, Structure, Unit};
use crate::config::SimConfig;
use crate::economy::{AccrualClock, AccrualReport, PlayerState};
use crate::error::{GameError, Result};
use crate::math::{Fixed, Vec2Fixed};
use crate::snapshot::{Snapshot, StructureView, UnitView};
use crate::storage::EntityStorage;
use crate::systems::{
    attack_threshold, footprints_overlap, in_attack_range, nearest_structure, resource_yield,
    step_toward,
};

/// One unit hitting one structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackEvent {
    /// Attacking unit.
    pub unit: EntityId,
    /// Structure hit.
    pub structure: EntityId,
    /// Damage actually dealt.
    pub damage: u32,
    /// Structure hit points after the hit.
    pub remaining: u32,
}

/// Events generated during a simulation tick.
///
/// These can be used by the presentation layer to trigger effects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Attacks landed this tick, in unit order.
    pub attacks: Vec<AttackEvent>,
    /// Structures destroyed this tick.
    pub destroyed_structures: Vec<EntityId>,
    /// Units removed this tick.
    pub removed_units: Vec<EntityId>,
}

/// The core game simulation.
///
/// # Tick Order
///
/// Units act one at a time in ascending id order. For each unit:
/// 1. **Liveness** - dead units do nothing and are removed
/// 2. **Targeting** - pick the nearest standing structure
/// 3. **Movement** - approach until inside the attack threshold
/// 4. **Attack** - hit the target when the cooldown is ready
/// 5. **Cooldown** - count down one tick
///
/// Structures destroyed mid-tick stop being targetable immediately; both
/// collections are compacted once every unit has acted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    /// Current simulation tick.
    tick: u64,
    /// Tunables.
    config: SimConfig,
    /// Player counters and selections.
    player: PlayerState,
    /// Placed structures.
    structures: EntityStorage<Structure>,
    /// Deployed units.
    units: EntityStorage<Unit>,
    /// Wall-clock accrual schedule.
    clock: AccrualClock,
}

impl Simulation {
    /// Create a simulation with the reference config.
    ///
    /// # Example
    ///
    /// ```
    /// use siege_core::simulation::Simulation;
    ///
    /// let sim = Simulation::new();
    /// assert_eq!(sim.get_tick(), 0);
    /// assert_eq!(sim.player().gold, 1000);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create a simulation with custom tunables.
    #[must_use]
    pub fn with_config(config: SimConfig) -> Self {
        Self {
            tick: 0,
            player: PlayerState::initial(&config),
            structures: EntityStorage::new(),
            units: EntityStorage::new(),
            clock: AccrualClock::new(config.accrual_period()),
            config,
        }
    }

    /// Get the current tick number.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// Active tunables.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Player counters and selections.
    #[must_use]
    pub const fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Placed structures.
    #[must_use]
    pub const fn structures(&self) -> &EntityStorage<Structure> {
        &self.structures
    }

    /// Deployed units.
    #[must_use]
    pub const fn units(&self) -> &EntityStorage<Unit> {
        &self.units
    }

    /// Accrual schedule state.
    #[must_use]
    pub const fn clock(&self) -> &AccrualClock {
        &self.clock
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Apply a player command.
    ///
    /// # Errors
    ///
    /// Returns the command's rejection reason; the simulation is unchanged.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        let name = command.name();
        let result = match command {
            Command::PlaceStructure { kind, position } => self
                .place_structure(kind, position)
                .map(CommandOutcome::Placed),
            Command::SelectStructure(kind) => self
                .select_structure(kind)
                .map(|()| CommandOutcome::Selected(kind)),
            Command::PlaceSelected(position) => {
                self.place_selected(position).map(CommandOutcome::Placed)
            }
            Command::TrainUnit(kind) => self
                .train_unit(kind)
                .map(|troops| CommandOutcome::Trained { kind, troops }),
            Command::DeployUnit(position) => {
                self.deploy_unit(position).map(CommandOutcome::Deployed)
            }
            Command::PrimaryAction(position) => self.primary_action(position),
            Command::ToggleAttackMode => Ok(CommandOutcome::AttackMode(self.toggle_attack_mode())),
            Command::Reset => {
                self.reset();
                Ok(CommandOutcome::Reset)
            }
        };

        if let Err(ref err) = result {
            tracing::debug!(command = name, error = %err, "Command rejected");
        }
        result
    }

    /// Place a structure, paying its gold cost.
    ///
    /// Clears the pending structure selection on success.
    ///
    /// # Errors
    ///
    /// - [`GameError::InsufficientResources`] if gold is below the cost
    /// - [`GameError::PositionOutOfRange`] if `position` is outside the world
    /// - [`GameError::InvalidPlacement`] if the footprint collides with an
    ///   existing structure plus clearance
    pub fn place_structure(&mut self, kind: StructureKind, position: Vec2Fixed) -> Result<EntityId> {
        let stats = kind.stats();
        self.player.ensure_affordable(ResourceKind::Gold, stats.cost)?;
        ensure_in_bounds(position)?;

        let clearance = Fixed::from_num(self.config.placement_clearance);
        let blocking = self.structures.iter_sorted().find(|(_, existing)| {
            footprints_overlap(
                position,
                stats.size,
                existing.position,
                existing.size,
                clearance,
            )
        });
        if let Some((blocking, _)) = blocking {
            return Err(GameError::InvalidPlacement {
                kind,
                position,
                blocking,
            });
        }

        self.player.spend(ResourceKind::Gold, stats.cost)?;
        self.player.selected_structure = None;
        let id = self.structures.insert(Structure::new(kind, position));

        tracing::debug!(id, %kind, %position, gold = self.player.gold, "Structure placed");
        Ok(id)
    }

    /// Arm `kind` for the next placement.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InsufficientResources`] if the structure is not
    /// currently affordable.
    pub fn select_structure(&mut self, kind: StructureKind) -> Result<()> {
        self.player
            .ensure_affordable(ResourceKind::Gold, kind.stats().cost)?;
        self.player.selected_structure = Some(kind);
        Ok(())
    }

    /// Place the armed structure kind.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidSelection`] when nothing is armed, otherwise as
    /// [`place_structure`](Self::place_structure).
    pub fn place_selected(&mut self, position: Vec2Fixed) -> Result<EntityId> {
        let kind = self
            .player
            .selected_structure
            .ok_or(GameError::InvalidSelection("structure"))?;
        self.place_structure(kind, position)
    }

    /// Train one troop, paying its elixir cost.
    ///
    /// Training only grants a deployable troop and selects `kind` for
    /// deployment; no unit appears on the field. Returns the new troop count.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InsufficientResources`] if elixir is below the cost.
    pub fn train_unit(&mut self, kind: UnitKind) -> Result<u32> {
        self.player.spend(ResourceKind::Elixir, kind.stats().cost)?;
        self.player.troops = self.player.troops.saturating_add(1);
        self.player.selected_unit = Some(kind);

        tracing::debug!(%kind, troops = self.player.troops, elixir = self.player.elixir, "Unit trained");
        Ok(self.player.troops)
    }

    /// Deploy one troop of the selected kind at `position`.
    ///
    /// # Errors
    ///
    /// - [`GameError::AttackModeDisabled`] outside attack mode
    /// - [`GameError::InvalidSelection`] when no unit kind is selected
    /// - [`GameError::NoTroopsAvailable`] when the troop count is zero
    /// - [`GameError::PositionOutOfRange`] if `position` is outside the world
    pub fn deploy_unit(&mut self, position: Vec2Fixed) -> Result<EntityId> {
        if !self.player.attack_mode {
            return Err(GameError::AttackModeDisabled);
        }
        let kind = self
            .player
            .selected_unit
            .ok_or(GameError::InvalidSelection("unit"))?;
        if self.player.troops == 0 {
            return Err(GameError::NoTroopsAvailable);
        }
        ensure_in_bounds(position)?;

        self.player.troops -= 1;
        let id = self.units.insert(Unit::new(kind, position));

        tracing::debug!(id, %kind, %position, troops = self.player.troops, "Unit deployed");
        Ok(id)
    }

    /// Battlefield click.
    ///
    /// In attack mode with a unit selected, deploys; otherwise places the
    /// armed structure; with neither, does nothing.
    ///
    /// # Errors
    ///
    /// Whatever the dispatched deploy or placement returns.
    pub fn primary_action(&mut self, position: Vec2Fixed) -> Result<CommandOutcome> {
        if self.player.attack_mode && self.player.selected_unit.is_some() {
            self.deploy_unit(position).map(CommandOutcome::Deployed)
        } else if self.player.selected_structure.is_some() {
            self.place_selected(position).map(CommandOutcome::Placed)
        } else {
            Ok(CommandOutcome::Ignored)
        }
    }

    /// Flip attack mode, returning the new value.
    pub fn toggle_attack_mode(&mut self) -> bool {
        self.player.attack_mode = !self.player.attack_mode;
        tracing::debug!(attack_mode = self.player.attack_mode, "Attack mode toggled");
        self.player.attack_mode
    }

    /// Restore initial player state and clear the battlefield.
    ///
    /// The tick counter keeps running; entity ids restart from 1.
    pub fn reset(&mut self) {
        self.player = PlayerState::initial(&self.config);
        self.structures = EntityStorage::new();
        self.units = EntityStorage::new();
        self.clock.reset();
        tracing::info!(tick = self.tick, "Simulation reset");
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance the simulation by one tick.
    ///
    /// # Example
    ///
    /// ```
    /// use siege_core::simulation::Simulation;
    ///
    /// let mut sim = Simulation::new();
    /// let events = sim.tick();
    /// assert!(events.attacks.is_empty());
    /// assert_eq!(sim.get_tick(), 1);
    /// ```
    pub fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents::default();
        let padding = Fixed::from_num(self.config.attack_range_padding);
        let cooldown_ticks = self.config.attack_cooldown_ticks;

        for unit_id in self.units.sorted_ids() {
            let Some(unit) = self.units.get_mut(unit_id) else {
                continue;
            };
            if unit.health.is_dead() {
                continue;
            }

            let target = nearest_structure(unit.position, self.structures.iter_sorted())
                .and_then(|(id, dist_sq)| Some((id, dist_sq, self.structures.get_mut(id)?)));
            let Some((target_id, distance_sq, structure)) = target else {
                // Idle: nothing left to attack.
                unit.cooldown.tick();
                continue;
            };

            let threshold = attack_threshold(structure.size, padding);
            if !in_attack_range(distance_sq, threshold) {
                unit.position = step_toward(unit.position, structure.position, unit.speed);
            } else if unit.cooldown.is_ready() {
                let damage = structure.health.apply_damage(unit.attack_damage);
                unit.cooldown.trigger(cooldown_ticks);
                events.attacks.push(AttackEvent {
                    unit: unit_id,
                    structure: target_id,
                    damage,
                    remaining: structure.health.current,
                });
                tracing::trace!(
                    unit = unit_id,
                    structure = target_id,
                    damage,
                    remaining = structure.health.current,
                    "Attack"
                );
            }

            unit.cooldown.tick();
        }

        events.destroyed_structures = self.structures.remove_where(|s| !s.is_alive());
        events.removed_units = self.units.remove_where(|u| u.health.is_dead());
        for id in &events.destroyed_structures {
            tracing::debug!(tick = self.tick, structure = id, "Structure destroyed");
        }

        self.tick += 1;

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "Simulation state hash");
        }

        events
    }

    // ------------------------------------------------------------------
    // Accrual
    // ------------------------------------------------------------------

    /// Credit one accrual period from every standing producer.
    pub fn accrue_resources(&mut self) -> AccrualReport {
        let report = resource_yield(self.structures.iter().map(|(_, s)| s), &self.config);
        self.player.credit(ResourceKind::Gold, report.gold);
        self.player.credit(ResourceKind::Elixir, report.elixir);

        if !report.is_empty() {
            tracing::debug!(
                gold = report.gold,
                elixir = report.elixir,
                total_gold = self.player.gold,
                total_elixir = self.player.elixir,
                "Resources accrued"
            );
        }
        report
    }

    /// Feed elapsed wall-clock time into the accrual schedule.
    ///
    /// Fires one accrual per completed period; partial periods carry over.
    pub fn advance_clock(&mut self, elapsed: Duration) -> AccrualReport {
        let periods = self.clock.advance(elapsed);
        let mut total = AccrualReport::default();
        for _ in 0..periods {
            total += self.accrue_resources();
        }
        total
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Owned copy of everything needed to render the current frame.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            gold: self.player.gold,
            elixir: self.player.elixir,
            troops: self.player.troops,
            attack_mode: self.player.attack_mode,
            selected_structure: self.player.selected_structure,
            selected_unit: self.player.selected_unit,
            structures: self
                .structures
                .iter_sorted()
                .map(|(id, s)| StructureView::new(id, s))
                .collect(),
            units: self
                .units
                .iter_sorted()
                .map(|(id, u)| UnitView::new(id, u))
                .collect(),
        }
    }

    /// Calculate a hash of the current simulation state.
    ///
    /// Two simulations with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tick.hash(&mut hasher);
        self.player.hash(&mut hasher);

        self.structures.len().hash(&mut hasher);
        for (id, structure) in self.structures.iter_sorted() {
            id.hash(&mut hasher);
            structure.kind.hash(&mut hasher);
            structure.position.hash(&mut hasher);
            structure.health.hash(&mut hasher);
        }

        self.units.len().hash(&mut hasher);
        for (id, unit) in self.units.iter_sorted() {
            id.hash(&mut hasher);
            unit.kind.hash(&mut hasher);
            unit.position.hash(&mut hasher);
            unit.health.hash(&mut hasher);
            unit.cooldown.hash(&mut hasher);
        }

        hasher.finish()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_in_bounds(position: Vec2Fixed) -> Result<()> {
    if position.in_bounds() {
        return Ok(());
    }
    let (x, y) = position.to_f64();
    Err(GameError::PositionOutOfRange { x, y })
}
