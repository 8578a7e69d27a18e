//! Echo module - chain tier tables
//!
//! A submitted chain's length picks its tier; the tier sets the AP cost and
//! the divinity it charges. Combo count sets the damage bonus and the
//! skill-cooldown acceleration.
//!
//! | Length | Tier     | AP | Divinity |
//! |--------|----------|----|----------|
//! | < 3    | None     | 0  | 0        |
//! | 3-4    | Basic    | 1  | 10       |
//! | 5-6    | Enhanced | 2  | 20       |
//! | 7+     | Ultimate | 3  | 35       |

use crate::types::{
    ChainTier, AP_COST_BASIC, AP_COST_ENHANCED, AP_COST_ULTIMATE, CD_ACCEL_COMBO_THRESHOLD,
    CHAIN_BASIC, CHAIN_ENHANCED, CHAIN_ULTIMATE, COMBO_BONUS1, COMBO_BONUS2, COMBO_BONUS3,
    COMBO_TIER1, COMBO_TIER2, COMBO_TIER3, DIVINITY_PER_BASIC, DIVINITY_PER_ENHANCED,
    DIVINITY_PER_ULTIMATE,
};

/// Tier for a chain of `len` orbs. Highest threshold wins.
pub fn classify_chain(len: usize) -> ChainTier {
    if len >= CHAIN_ULTIMATE {
        ChainTier::Ultimate
    } else if len >= CHAIN_ENHANCED {
        ChainTier::Enhanced
    } else if len >= CHAIN_BASIC {
        ChainTier::Basic
    } else {
        ChainTier::None
    }
}

/// AP needed to submit a chain of `tier`
pub fn ap_cost(tier: ChainTier) -> u32 {
    match tier {
        ChainTier::None => 0,
        ChainTier::Basic => AP_COST_BASIC,
        ChainTier::Enhanced => AP_COST_ENHANCED,
        ChainTier::Ultimate => AP_COST_ULTIMATE,
    }
}

/// Divinity charged by submitting a chain of `tier`
pub fn divinity_gain(tier: ChainTier) -> f32 {
    match tier {
        ChainTier::None => 0.0,
        ChainTier::Basic => DIVINITY_PER_BASIC,
        ChainTier::Enhanced => DIVINITY_PER_ENHANCED,
        ChainTier::Ultimate => DIVINITY_PER_ULTIMATE,
    }
}

/// AP a chain would cost after growing by one more orb
pub fn next_tier_cost(current_len: usize) -> u32 {
    ap_cost(classify_chain(current_len + 1))
}

/// Damage bonus fraction for a turn's combo count
pub fn combo_damage_bonus(combo: u32) -> f32 {
    if combo >= COMBO_TIER3 {
        COMBO_BONUS3
    } else if combo >= COMBO_TIER2 {
        COMBO_BONUS2
    } else if combo >= COMBO_TIER1 {
        COMBO_BONUS1
    } else {
        0.0
    }
}

/// Cooldown-reduction units earned over a battle's total combo count
pub fn cd_reduction_units(total_combo: u32) -> u32 {
    total_combo / CD_ACCEL_COMBO_THRESHOLD
}
