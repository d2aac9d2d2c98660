//! Stateless helpers the simulation step is built from.
//!
//! Each function works on plain values so it can be tested in isolation;
//! [`Simulation`](crate::simulation::Simulation) wires them together.

use crate::catalog::ResourceKind;
use crate::components::{EntityId, Structure};
use crate::config::SimConfig;
use crate::economy::AccrualReport;
use crate::math::{Fixed, Vec2Fixed, WideFixed};

/// Find the live structure nearest to `position`.
///
/// Structures are expected in ascending id order; on equal distance the
/// first one seen wins. Returns the id and the squared distance.
pub fn nearest_structure<'a>(
    position: Vec2Fixed,
    structures: impl IntoIterator<Item = (EntityId, &'a Structure)>,
) -> Option<(EntityId, WideFixed)> {
    let mut best: Option<(EntityId, WideFixed)> = None;

    for (id, structure) in structures {
        if !structure.is_alive() {
            continue;
        }
        let dist_sq = position.distance_squared(structure.position);
        match best {
            Some((_, best_sq)) if dist_sq >= best_sq => {}
            _ => best = Some((id, dist_sq)),
        }
    }

    best
}

/// Distance from a target's center at which attackers stop approaching.
#[must_use]
pub fn attack_threshold(target_size: Fixed, padding: Fixed) -> Fixed {
    target_size / Fixed::from_num(2) + padding
}

/// Whether an attacker `distance_sq` away is inside `threshold`.
///
/// Equivalent to `distance - threshold <= 0` without the square root.
#[must_use]
pub fn in_attack_range(distance_sq: WideFixed, threshold: Fixed) -> bool {
    distance_sq <= squared(threshold)
}

/// Move `speed` units from `from` straight toward `to`.
///
/// May overshoot when the target is closer than `speed`.
#[must_use]
pub fn step_toward(from: Vec2Fixed, to: Vec2Fixed, speed: Fixed) -> Vec2Fixed {
    let direction = (to - from).normalize();
    if direction == Vec2Fixed::ZERO {
        return from;
    }
    from + direction.scale(speed)
}

/// Minimum center distance two footprints need, including clearance.
#[must_use]
pub fn placement_spacing(size_a: Fixed, size_b: Fixed, clearance: Fixed) -> Fixed {
    (size_a + size_b) / Fixed::from_num(2) + clearance
}

/// Whether a footprint at `position` is too close to an existing one.
#[must_use]
pub fn footprints_overlap(
    position: Vec2Fixed,
    size: Fixed,
    other_position: Vec2Fixed,
    other_size: Fixed,
    clearance: Fixed,
) -> bool {
    let spacing = placement_spacing(size, other_size, clearance);
    position.distance_squared(other_position) < squared(spacing)
}

fn squared(value: Fixed) -> WideFixed {
    let wide = WideFixed::from_num(value);
    wide * wide
}

/// Resources credited by one accrual period for the given structures.
pub fn resource_yield<'a>(
    structures: impl IntoIterator<Item = &'a Structure>,
    config: &SimConfig,
) -> AccrualReport {
    let mut report = AccrualReport::default();

    for structure in structures {
        if !structure.is_alive() {
            continue;
        }
        match structure.produces {
            Some(ResourceKind::Gold) => {
                report.gold = report.gold.saturating_add(config.gold_per_producer);
            }
            Some(ResourceKind::Elixir) => {
                report.elixir = report.elixir.saturating_add(config.elixir_per_producer);
            }
            None => {}
        }
    }

    report
}
