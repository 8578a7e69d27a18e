//! Combo tracking
//!
//! Every submitted chain and every cascade group adds one combo. The turn's
//! combo count sets the damage bonus; the battle-wide total feeds skill
//! cooldown acceleration.

use crate::echo::{cd_reduction_units, combo_damage_bonus};
use crate::types::{COMBO_TIER3, COMBO_TIER3_BONUS_AP};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComboTracker {
    current: u32,
    total: u32,
    bonus_ap_next_turn: bool,
    cd_units_taken: u32,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combo count this turn
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Combo count over the whole battle
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Whether this turn has reached the combo tier that grants bonus AP
    pub fn earns_bonus_ap(&self) -> bool {
        self.bonus_ap_next_turn
    }

    pub fn add_combo(&mut self, count: u32) {
        self.current = self.current.saturating_add(count);
        self.total = self.total.saturating_add(count);
        if self.current >= COMBO_TIER3 {
            self.bonus_ap_next_turn = true;
        }
    }

    /// Damage bonus fraction for the current combo (0.0 to 0.3)
    pub fn damage_bonus(&self) -> f32 {
        combo_damage_bonus(self.current)
    }

    /// Damage multiplier, `1.0 + damage_bonus()`
    pub fn damage_multiplier(&self) -> f32 {
        1.0 + self.damage_bonus()
    }

    /// Cooldown-reduction units earned over the battle so far
    pub fn cd_reductions_earned(&self) -> u32 {
        cd_reduction_units(self.total)
    }

    /// Units earned since the previous call
    pub fn take_cd_reductions(&mut self) -> u32 {
        let earned = self.cd_reductions_earned();
        let fresh = earned.saturating_sub(self.cd_units_taken);
        self.cd_units_taken = earned;
        fresh
    }

    /// Bonus AP owed to the next turn, then clear the flag
    pub fn take_bonus_ap(&mut self) -> u32 {
        if std::mem::take(&mut self.bonus_ap_next_turn) {
            COMBO_TIER3_BONUS_AP
        } else {
            0
        }
    }

    /// Clear the turn counters and the bonus flag. Take the bonus AP first.
    pub fn reset_for_new_turn(&mut self) {
        self.current = 0;
        self.bonus_ap_next_turn = false;
    }

    pub fn reset_for_new_battle(&mut self) {
        *self = Self::default();
    }
}
