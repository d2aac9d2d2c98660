//! Player resources and the wall-clock accrual schedule.
//!
//! All counter math is integer and saturating.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::{ResourceKind, StructureKind, UnitKind};
use crate::config::SimConfig;
use crate::error::{GameError, Result};

/// Player resources, troops and pending selections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerState {
    /// Gold stockpile.
    pub gold: u32,
    /// Elixir stockpile.
    pub elixir: u32,
    /// Trained troops waiting to be deployed.
    pub troops: u32,
    /// Structure kind armed for the next placement.
    pub selected_structure: Option<StructureKind>,
    /// Unit kind deployed by the next deploy.
    pub selected_unit: Option<UnitKind>,
    /// Whether clicks deploy troops.
    pub attack_mode: bool,
}

impl PlayerState {
    /// Starting state from config.
    #[must_use]
    pub fn initial(config: &SimConfig) -> Self {
        Self {
            gold: config.initial_gold,
            elixir: config.initial_elixir,
            troops: config.initial_troops,
            selected_structure: None,
            selected_unit: None,
            attack_mode: false,
        }
    }

    /// Current amount of `resource`.
    #[must_use]
    pub const fn amount(&self, resource: ResourceKind) -> u32 {
        match resource {
            ResourceKind::Gold => self.gold,
            ResourceKind::Elixir => self.elixir,
        }
    }

    fn amount_mut(&mut self, resource: ResourceKind) -> &mut u32 {
        match resource {
            ResourceKind::Gold => &mut self.gold,
            ResourceKind::Elixir => &mut self.elixir,
        }
    }

    /// Check if player can afford a cost.
    #[must_use]
    pub const fn can_afford(&self, resource: ResourceKind, cost: u32) -> bool {
        self.amount(resource) >= cost
    }

    /// Fail with [`GameError::InsufficientResources`] unless `cost` is affordable.
    pub fn ensure_affordable(&self, resource: ResourceKind, cost: u32) -> Result<()> {
        if self.can_afford(resource, cost) {
            Ok(())
        } else {
            Err(GameError::InsufficientResources {
                resource,
                required: cost,
                available: self.amount(resource),
            })
        }
    }

    /// Spend `cost` of `resource`; leaves the state untouched on failure.
    pub fn spend(&mut self, resource: ResourceKind, cost: u32) -> Result<()> {
        self.ensure_affordable(resource, cost)?;
        *self.amount_mut(resource) -= cost;
        Ok(())
    }

    /// Credit `amount` of `resource`, saturating at `u32::MAX`.
    pub fn credit(&mut self, resource: ResourceKind, amount: u32) {
        let slot = self.amount_mut(resource);
        *slot = slot.saturating_add(amount);
    }
}

/// Resources credited by one or more accrual periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccrualReport {
    /// Gold credited.
    pub gold: u32,
    /// Elixir credited.
    pub elixir: u32,
}

impl AccrualReport {
    /// Whether nothing was credited.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.gold == 0 && self.elixir == 0
    }
}

impl std::ops::AddAssign for AccrualReport {
    fn add_assign(&mut self, rhs: Self) {
        self.gold = self.gold.saturating_add(rhs.gold);
        self.elixir = self.elixir.saturating_add(rhs.elixir);
    }
}

/// Converts elapsed wall-clock time into whole accrual periods.
///
/// Partial periods carry over to the next [`advance`](Self::advance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualClock {
    period: Duration,
    carried: Duration,
}

impl AccrualClock {
    /// Create a clock with the given period.
    ///
    /// A zero period is clamped to one millisecond.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            carried: Duration::ZERO,
        }
    }

    /// Length of one period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Time accumulated toward the next period.
    #[must_use]
    pub const fn carried(&self) -> Duration {
        self.carried
    }

    /// Add `elapsed` time and return how many periods completed.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let total = self.carried.saturating_add(elapsed).as_nanos();
        let period = self.period.as_nanos();
        self.carried = Duration::from_nanos(u64::try_from(total % period).unwrap_or(u64::MAX));
        u32::try_from(total / period).unwrap_or(u32::MAX)
    }

    /// Drop any partial period.
    pub fn reset(&mut self) {
        self.carried = Duration::ZERO;
    }
}
