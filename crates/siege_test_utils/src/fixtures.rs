//! Test fixtures and helpers.
//!
//! Pre-built simulations for consistent testing. Builders panic on
//! setup failures; they are only meant for tests and benches.

use siege_core::catalog::{StructureKind, UnitKind};
use siege_core::config::SimConfig;
use siege_core::math::{Fixed, Vec2Fixed};
use siege_core::simulation::Simulation;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> Fixed {
    Fixed::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> Fixed {
    Fixed::from_num(n)
}

/// Position from integer coordinates.
#[must_use]
pub fn pos(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::from_int(x, y)
}

/// Config with effectively unlimited resources and troops.
#[must_use]
pub fn rich_config() -> SimConfig {
    SimConfig {
        initial_gold: 1_000_000,
        initial_elixir: 1_000_000,
        initial_troops: 1_000,
        ..SimConfig::default()
    }
}

/// Put the simulation in attack mode with `kind` selected for deployment.
///
/// Trains one troop of `kind` to make the selection.
///
/// # Panics
///
/// Panics if the troop cannot be afforded.
pub fn arm_attack(sim: &mut Simulation, kind: UnitKind) {
    sim.train_unit(kind).expect("train for attack setup");
    if !sim.player().attack_mode {
        sim.toggle_attack_mode();
    }
}

/// One cannon at (100, 0) and one barbarian at the origin, attack mode on.
///
/// The barbarian reaches attack range after 30 ticks.
#[must_use]
pub fn duel_scenario() -> Simulation {
    let mut sim = Simulation::new();
    sim.place_structure(StructureKind::Cannon, pos(100, 0))
        .expect("place cannon");
    arm_attack(&mut sim, UnitKind::Barbarian);
    sim.deploy_unit(pos(0, 0)).expect("deploy barbarian");
    sim
}

/// A small base with one of each producer.
#[must_use]
pub fn economy_scenario() -> Simulation {
    let mut sim = Simulation::new();
    sim.place_structure(StructureKind::GoldMine, pos(100, 100))
        .expect("place gold mine");
    sim.place_structure(StructureKind::ElixirCollector, pos(200, 100))
        .expect("place elixir collector");
    sim
}

/// A grid of structures raided by a ring of units.
///
/// Structures sit on a 100-unit grid; units are deployed on a circle
/// around the base, alternating barbarians and archers.
///
/// # Panics
///
/// Panics if the requested layout does not fit the resources of
/// [`rich_config`].
#[must_use]
pub fn raid_scenario(structures: usize, units: usize) -> Simulation {
    let mut sim = Simulation::with_config(rich_config());

    let mut columns = 1;
    while columns * columns < structures {
        columns += 1;
    }
    for i in 0..structures {
        let kind = StructureKind::ALL[i % StructureKind::ALL.len()];
        let x = (i % columns) as i32 * 100;
        let y = (i / columns) as i32 * 100;
        sim.place_structure(kind, pos(x, y))
            .expect("grid spacing keeps footprints apart");
    }

    let center = (columns as i32 - 1) * 50;
    let radius = f64::from(center) + 400.0;
    sim.toggle_attack_mode();
    for i in 0..units {
        let kind = if i % 2 == 0 {
            UnitKind::Barbarian
        } else {
            UnitKind::Archer
        };
        sim.train_unit(kind).expect("train raider");
        let angle = std::f64::consts::TAU * i as f64 / units.max(1) as f64;
        let at = Vec2Fixed::from_f64(
            f64::from(center) + radius * angle.cos(),
            f64::from(center) + radius * angle.sin(),
        )
        .expect("ring fits inside the world");
        sim.deploy_unit(at).expect("deploy raider");
    }

    tracing::debug!(structures, units, "Raid scenario ready");
    sim
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duel_scenario_layout() {
        let sim = duel_scenario();
        assert_eq!(sim.structures().len(), 1);
        assert_eq!(sim.units().len(), 1);
        assert!(sim.player().attack_mode);
    }

    #[test]
    fn test_raid_scenario_counts() {
        let sim = raid_scenario(9, 12);
        assert_eq!(sim.structures().len(), 9);
        assert_eq!(sim.units().len(), 12);
        assert_eq!(sim.player().troops, 1_000);
    }

    #[test]
    fn test_fixed_helpers() {
        assert_eq!(fixed(3), Fixed::from_num(3));
        assert_eq!(fixed_f(1.5), Fixed::from_num(1.5));
        assert_eq!(pos(1, 2), Vec2Fixed::new(fixed(1), fixed(2)));
    }
}
