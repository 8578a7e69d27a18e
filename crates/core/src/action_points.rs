//! Action points - the per-turn budget for submitting chains

use crate::echo::ap_cost;
use crate::types::{ChainTier, AP_PER_TURN};

/// Per-turn action point budget.
///
/// `max` is the base budget plus any bonus earned last turn; `current` never
/// exceeds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPoints {
    current: u32,
    max: u32,
    base: u32,
    bonus: u32,
}

impl ActionPoints {
    pub fn new(base: u32) -> Self {
        Self {
            current: base,
            max: base,
            base,
            bonus: 0,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn bonus(&self) -> u32 {
        self.bonus
    }

    pub fn has_ap(&self) -> bool {
        self.current > 0
    }

    /// Start a turn with `base + bonus_ap` points
    pub fn reset_for_new_turn(&mut self, bonus_ap: u32) {
        self.bonus = bonus_ap;
        self.max = self.base.saturating_add(bonus_ap);
        self.current = self.max;
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// A `None` tier is never affordable, it cannot be submitted.
    pub fn can_afford_tier(&self, tier: ChainTier) -> bool {
        tier != ChainTier::None && self.can_afford(ap_cost(tier))
    }

    /// Deduct `cost`. Leaves the budget untouched and returns false if short.
    pub fn spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current -= cost;
        true
    }

    pub fn spend_for_tier(&mut self, tier: ChainTier) -> bool {
        if tier == ChainTier::None {
            return false;
        }
        self.spend(ap_cost(tier))
    }

    /// Highest tier the remaining points can pay for
    pub fn max_affordable_tier(&self) -> ChainTier {
        [ChainTier::Ultimate, ChainTier::Enhanced, ChainTier::Basic]
            .into_iter()
            .find(|&tier| self.can_afford(ap_cost(tier)))
            .unwrap_or(ChainTier::None)
    }
}

impl Default for ActionPoints {
    fn default() -> Self {
        Self::new(AP_PER_TURN)
    }
}
