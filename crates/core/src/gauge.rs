//! Divinity gauge - charges from chains, cascades and combat, spent on a burst

use crate::echo::divinity_gain;
use crate::types::{
    ChainTier, DIVINITY_DAMAGE_TAKEN_SCALE, DIVINITY_GAUGE_MAX, DIVINITY_PER_ADVANTAGE_HIT,
    DIVINITY_PER_CASCADE,
};

/// Result of charging the gauge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeUpdate {
    pub value: f32,
    /// Set only on the charge that crossed into full
    pub became_ready: bool,
}

/// Gauge value clamped to `[0, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivinityGauge {
    value: f32,
    max: f32,
}

impl DivinityGauge {
    pub fn new(max: f32) -> Self {
        Self {
            value: 0.0,
            max: max.max(0.0),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_ready(&self) -> bool {
        self.value >= self.max
    }

    /// Fill level in [0, 1]
    pub fn fill_percent(&self) -> f32 {
        if self.max <= 0.0 {
            return 1.0;
        }
        self.value / self.max
    }

    /// Charge (or drain, for negative `amount`) the gauge. Non-finite
    /// amounts leave it unchanged.
    pub fn add(&mut self, amount: f32) -> GaugeUpdate {
        let was_ready = self.is_ready();
        if amount.is_finite() {
            self.value = (self.value + amount).clamp(0.0, self.max);
        }
        GaugeUpdate {
            value: self.value,
            became_ready: !was_ready && self.is_ready(),
        }
    }

    pub fn add_from_chain(&mut self, tier: ChainTier) -> GaugeUpdate {
        self.add(divinity_gain(tier))
    }

    pub fn add_from_cascade(&mut self) -> GaugeUpdate {
        self.add(DIVINITY_PER_CASCADE)
    }

    pub fn add_from_advantage_hit(&mut self) -> GaugeUpdate {
        self.add(DIVINITY_PER_ADVANTAGE_HIT)
    }

    /// Charge by the fraction of max HP lost, scaled
    pub fn add_from_damage_taken(&mut self, damage_ratio: f32) -> GaugeUpdate {
        self.add(damage_ratio.max(0.0) * DIVINITY_DAMAGE_TAKEN_SCALE)
    }

    /// Spend `amount` if the gauge holds that much. Negative and non-finite
    /// costs are refused.
    pub fn consume(&mut self, amount: f32) -> bool {
        if !amount.is_finite() || amount < 0.0 || self.value < amount {
            return false;
        }
        self.value -= amount;
        true
    }

    /// Empty a full gauge for a burst. False if not ready.
    pub fn consume_for_burst(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.value = 0.0;
        true
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

impl Default for DivinityGauge {
    fn default() -> Self {
        Self::new(DIVINITY_GAUGE_MAX)
    }
}
