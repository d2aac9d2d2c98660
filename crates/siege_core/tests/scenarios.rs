//! End-to-end scenarios for siege_core.
//!
//! These drive a full `Simulation` through build, train, raid and accrual
//! sequences and check the observable counters and entities.

use std::time::Duration;

use siege_core::prelude::*;
use siege_test_utils::fixtures::{arm_attack, duel_scenario, pos, rich_config};

// =============================================================================
// Economy
// =============================================================================

mod economy {
    use super::*;

    #[test]
    fn test_goldmine_then_three_periods() {
        let mut sim = Simulation::new();
        sim.place_structure(StructureKind::GoldMine, pos(100, 100))
            .unwrap();
        assert_eq!(sim.player().gold, 800);

        for _ in 0..3 {
            sim.accrue_resources();
        }
        assert_eq!(sim.player().gold, 815);
        assert_eq!(sim.player().elixir, 1000);
    }

    #[test]
    fn test_accrual_counts_producers_at_each_boundary() {
        let mut sim = Simulation::new();
        sim.place_structure(StructureKind::ElixirCollector, pos(100, 100))
            .unwrap();
        sim.advance_clock(Duration::from_millis(2000));
        assert_eq!(sim.player().elixir, 1003);

        sim.place_structure(StructureKind::ElixirCollector, pos(300, 100))
            .unwrap();
        sim.advance_clock(Duration::from_millis(2000));
        assert_eq!(sim.player().elixir, 1009);
    }

    #[test]
    fn test_destroyed_producer_stops_accruing() {
        let mut sim = Simulation::new();
        let mine = sim
            .place_structure(StructureKind::GoldMine, pos(30, 0))
            .unwrap();
        arm_attack(&mut sim, UnitKind::Archer);
        sim.deploy_unit(pos(0, 0)).unwrap();

        // 300 hp / 20 damage = 15 hits, one every 30 ticks.
        let mut destroyed = false;
        for _ in 0..(15 * 30) {
            if sim.tick().destroyed_structures.contains(&mine) {
                destroyed = true;
                break;
            }
        }
        assert!(destroyed);

        let gold = sim.player().gold;
        assert!(sim.accrue_resources().is_empty());
        assert_eq!(sim.player().gold, gold);
    }
}

// =============================================================================
// Training and deployment
// =============================================================================

mod training {
    use super::*;

    #[test]
    fn test_train_then_deploy_barbarian() {
        let mut sim = Simulation::new();
        sim.train_unit(UnitKind::Barbarian).unwrap();
        assert_eq!(sim.player().elixir, 950);
        assert_eq!(sim.player().troops, 11);
        assert_eq!(sim.player().selected_unit, Some(UnitKind::Barbarian));

        sim.toggle_attack_mode();
        let id = sim.deploy_unit(pos(50, 50)).unwrap();
        assert_eq!(sim.player().troops, 10);
        assert_eq!(sim.units().len(), 1);
        let unit = sim.units().get(id).unwrap();
        assert_eq!(unit.position, pos(50, 50));
        assert_eq!(unit.health.current, 100);
    }

    #[test]
    fn test_initial_troops_deploy_without_training_more() {
        let mut sim = Simulation::with_config(SimConfig {
            initial_troops: 2,
            ..SimConfig::default()
        });
        arm_attack(&mut sim, UnitKind::Barbarian);
        for i in 0..3 {
            sim.deploy_unit(pos(i * 10, 0)).unwrap();
        }
        assert!(matches!(
            sim.deploy_unit(pos(50, 0)),
            Err(GameError::NoTroopsAvailable)
        ));
        assert_eq!(sim.units().len(), 3);
    }
}

// =============================================================================
// Combat
// =============================================================================

mod combat {
    use super::*;

    #[test]
    fn test_duel_until_cannon_falls() {
        let mut sim = duel_scenario();
        let cannon = *sim.structures().sorted_ids().first().unwrap();

        let mut hits = Vec::new();
        let mut destroyed_at = None;
        for _ in 0..2000 {
            let events = sim.tick();
            for attack in &events.attacks {
                hits.push((sim.get_tick(), attack.remaining));
            }
            if events.destroyed_structures.contains(&cannon) {
                destroyed_at = Some(sim.get_tick());
                break;
            }
        }

        // 500 hp at 15 per hit takes 34 hits.
        assert_eq!(hits.len(), 34);
        assert_eq!(hits[0], (31, 485));
        assert!(hits.windows(2).all(|w| w[1].0 - w[0].0 == 30));
        assert_eq!(hits.last().unwrap().1, 0);
        assert_eq!(destroyed_at, Some(31 + 33 * 30));
        assert!(sim.structures().is_empty());
    }

    #[test]
    fn test_unit_retargets_next_tick() {
        let mut sim = Simulation::with_config(rich_config());
        let near = sim
            .place_structure(StructureKind::GoldMine, pos(30, 0))
            .unwrap();
        sim.place_structure(StructureKind::TownHall, pos(0, 300))
            .unwrap();
        arm_attack(&mut sim, UnitKind::Barbarian);
        let unit = sim.deploy_unit(pos(0, 0)).unwrap();

        let mut ticks = 0;
        while sim.structures().contains(near) {
            sim.tick();
            ticks += 1;
            assert!(ticks < 1000, "gold mine never fell");
        }

        let before = sim.units().get(unit).unwrap().position;
        sim.tick();
        let after = sim.units().get(unit).unwrap().position;
        assert!(after.y > before.y, "unit should walk toward the town hall");
    }

    #[test]
    fn test_cooldown_stays_within_bounds() {
        let mut sim = duel_scenario();
        for _ in 0..600 {
            sim.tick();
            for (_, unit) in sim.units().iter_sorted() {
                assert!(unit.cooldown.remaining <= 30);
            }
        }
    }

    #[test]
    fn test_structures_never_attack() {
        let mut sim = Simulation::with_config(rich_config());
        sim.place_structure(StructureKind::ArcherTower, pos(0, 0))
            .unwrap();
        sim.place_structure(StructureKind::Cannon, pos(100, 0))
            .unwrap();
        arm_attack(&mut sim, UnitKind::Archer);
        let unit = sim.deploy_unit(pos(50, 60)).unwrap();

        for _ in 0..300 {
            sim.tick();
        }
        let archer = sim.units().get(unit).unwrap();
        assert_eq!(archer.health.current, archer.health.max);
    }
}

// =============================================================================
// Reset
// =============================================================================

mod reset {
    use super::*;

    #[test]
    fn test_reset_mid_battle() {
        let mut sim = duel_scenario();
        for _ in 0..100 {
            sim.tick();
        }
        let tick = sim.get_tick();

        sim.apply(Command::Reset).unwrap();
        let snapshot = sim.snapshot();
        assert_eq!((snapshot.gold, snapshot.elixir, snapshot.troops), (1000, 1000, 10));
        assert!(snapshot.structures.is_empty());
        assert!(snapshot.units.is_empty());
        assert!(!snapshot.attack_mode);
        assert_eq!(snapshot.tick, tick);

        let id = sim
            .place_structure(StructureKind::Cannon, pos(100, 0))
            .unwrap();
        assert_eq!(id, 1);
    }
}
