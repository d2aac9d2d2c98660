//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Sources of non-determinism the simulation guards against:
//!
//! - **Floating-point math**: positions and speeds use fixed-point
//!   arithmetic via [`siege_core::math::Fixed`].
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Entity storage is always walked in sorted id order.
//!
//! - **Wall-clock time**: accrual only advances by explicit durations.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual helpers (targeting, movement, accrual)
//! 2. **Property tests**: Random command sequences still replay identically
//! 3. **Integration tests**: Full raid scenarios are reproducible
//! 4. **Parallel tests**: Running N simulations on threads all match

use std::thread;

use siege_core::simulation::Simulation;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Run a [`Simulation`] twice with identical setup and compare final hashes.
///
/// # Example
///
/// ```
/// use siege_test_utils::determinism::verify_simulation_determinism;
/// use siege_test_utils::fixtures::duel_scenario;
///
/// assert!(verify_simulation_determinism(duel_scenario, 200));
/// ```
pub fn verify_simulation_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let result = verify_determinism(
        2,
        num_ticks,
        &setup_fn,
        |sim| {
            sim.tick();
        },
        Simulation::state_hash,
    );
    result.is_deterministic
}

/// Result of parallel simulation runs.
#[derive(Debug, Clone)]
pub struct ParallelSimResult {
    /// Final state hash from each simulation.
    pub hashes: Vec<u64>,
    /// Number of ticks each simulation ran.
    pub ticks: u64,
    /// Number of simulations run.
    pub num_sims: usize,
}

impl ParallelSimResult {
    /// Check if all simulations produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all simulations matched.
    ///
    /// # Panics
    ///
    /// Panics if simulations produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel simulations diverged!\n\
                 Simulations: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_sims,
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run N simulations on scoped threads and collect final hashes.
///
/// # Panics
///
/// Panics if a simulation thread panics.
pub fn run_parallel_simulations<F>(
    setup_fn: F,
    num_sims: usize,
    num_ticks: u64,
) -> ParallelSimResult
where
    F: Fn() -> Simulation + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    for _ in 0..num_ticks {
                        sim.tick();
                    }
                    sim.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("simulation thread panicked"))
            .collect()
    });

    ParallelSimResult {
        hashes,
        ticks: num_ticks,
        num_sims,
    }
}

/// Compare two simulation runs tick-by-tick, finding first divergence.
///
/// # Returns
///
/// `None` if simulations are deterministic, `Some(tick)` if they diverge
/// at that tick.
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        sim1.tick();
        sim2.tick();

        if sim1.state_hash() != sim2.state_hash() {
            tracing::warn!(tick, "Simulations diverged");
            return Some(tick);
        }
    }

    None
}

/// Proptest strategies for simulation inputs.
pub mod strategies {
    use proptest::prelude::*;
    use siege_core::catalog::{StructureKind, UnitKind};
    use siege_core::commands::Command;
    use siege_core::math::{Fixed, Vec2Fixed, COORDINATE_LIMIT};

    /// Fractional coordinate, weighted toward the visible play area.
    ///
    /// Also covers the whole accepted range on both sides of zero and a
    /// band just past [`COORDINATE_LIMIT`] that commands must reject.
    pub fn arb_coordinate() -> impl Strategy<Value = Fixed> {
        let limit = COORDINATE_LIMIT.to_bits();
        prop_oneof![
            4 => (0..Fixed::from_num(1000).to_bits()).prop_map(Fixed::from_bits),
            2 => (-limit..=limit).prop_map(Fixed::from_bits),
            1 => ((limit + 1)..=(limit << 1)).prop_map(Fixed::from_bits),
        ]
    }

    /// Any position a caller might send, in or out of bounds.
    pub fn arb_position() -> impl Strategy<Value = Vec2Fixed> {
        (arb_coordinate(), arb_coordinate()).prop_map(|(x, y)| Vec2Fixed::new(x, y))
    }

    /// Any structure kind.
    pub fn arb_structure_kind() -> impl Strategy<Value = StructureKind> {
        proptest::sample::select(StructureKind::ALL.to_vec())
    }

    /// Any unit kind.
    pub fn arb_unit_kind() -> impl Strategy<Value = UnitKind> {
        proptest::sample::select(UnitKind::ALL.to_vec())
    }

    /// Any player command, weighted toward building and raiding.
    pub fn arb_command() -> impl Strategy<Value = Command> {
        prop_oneof![
            4 => (arb_structure_kind(), arb_position())
                .prop_map(|(kind, position)| Command::PlaceStructure { kind, position }),
            1 => arb_structure_kind().prop_map(Command::SelectStructure),
            1 => arb_position().prop_map(Command::PlaceSelected),
            3 => arb_unit_kind().prop_map(Command::TrainUnit),
            4 => arb_position().prop_map(Command::DeployUnit),
            2 => arb_position().prop_map(Command::PrimaryAction),
            1 => Just(Command::ToggleAttackMode),
        ]
    }

    /// One step of a scripted session.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Step {
        /// Apply a command.
        Command(Command),
        /// Run this many ticks.
        Ticks(u16),
        /// Fire this many accrual periods.
        Accrue(u8),
    }

    /// Any session step.
    pub fn arb_step() -> impl Strategy<Value = Step> {
        prop_oneof![
            6 => arb_command().prop_map(Step::Command),
            3 => (1u16..60).prop_map(Step::Ticks),
            1 => (1u8..4).prop_map(Step::Accrue),
        ]
    }

    /// A sequence of session steps.
    pub fn arb_session(max_len: usize) -> impl Strategy<Value = Vec<Step>> {
        proptest::collection::vec(arb_step(), 0..max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{duel_scenario, economy_scenario, raid_scenario};

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n| *n += 1, |n| *n);

        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![100, 100, 100]);
        assert_eq!(result.unique_hashes(), vec![100]);
    }

    #[test]
    #[should_panic(expected = "non-deterministic")]
    fn test_assert_deterministic_reports_mismatch() {
        DeterminismResult {
            is_deterministic: false,
            hashes: vec![1, 2],
            ticks: 5,
        }
        .assert_deterministic();
    }

    #[test]
    fn test_empty_simulation_determinism() {
        assert!(verify_simulation_determinism(Simulation::new, 100));
    }

    #[test]
    fn test_duel_determinism() {
        assert!(verify_simulation_determinism(duel_scenario, 400));
    }

    #[test]
    fn test_find_divergence_on_deterministic_sim() {
        assert!(find_first_divergence(|| raid_scenario(9, 10), 300).is_none());
    }

    #[test]
    fn test_parallel_raids_match() {
        let result = run_parallel_simulations(|| raid_scenario(16, 24), 4, 300);
        assert_eq!(result.hashes.len(), 4);
        result.assert_deterministic();
    }

    #[test]
    fn test_accrual_determinism() {
        let result = verify_determinism(
            3,
            10,
            economy_scenario,
            |sim| {
                sim.accrue_resources();
                sim.tick();
            },
            Simulation::state_hash,
        );
        result.assert_deterministic();
    }
}
