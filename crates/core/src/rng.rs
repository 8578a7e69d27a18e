//! RNG module - injectable orb sources
//!
//! Every random decision the board makes (new orbs on fill and skyfall, and
//! target selection for boss lock/convert) goes through an [`OrbSource`].
//!
//! - [`RandomOrbs`] wraps any `rand::Rng`; `RandomOrbs::seeded` uses PCG-64 so a
//!   seed reproduces a whole battle.
//! - [`ScriptedOrbs`] replays a fixed orb sequence for tests and replays.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::types::{OrbType, STANDARD_ORBS};

/// Terrain resonance: chance of the initial fill producing a given orb
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbBias {
    pub orb: OrbType,
    /// Probability in [0, 1]
    pub strength: f32,
}

impl OrbBias {
    pub fn new(orb: OrbType, strength: f32) -> Self {
        Self {
            orb,
            strength: strength.clamp(0.0, 1.0),
        }
    }
}

/// Source of randomness for the board
pub trait OrbSource {
    /// Next standard orb, uniformly distributed
    fn next_orb(&mut self) -> OrbType;

    /// Uniform value in [0, 1)
    fn roll(&mut self) -> f32;

    /// Uniform index in [0, len). `len` is never 0.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Next orb, honoring an optional bias
    fn next_orb_biased(&mut self, bias: Option<OrbBias>) -> OrbType {
        if let Some(bias) = bias {
            if bias.strength > 0.0 && self.roll() < bias.strength {
                return bias.orb;
            }
        }
        self.next_orb()
    }
}

/// `rand`-backed orb source
#[derive(Debug, Clone)]
pub struct RandomOrbs<R = Pcg64> {
    rng: R,
}

impl RandomOrbs<Pcg64> {
    /// Deterministic source: the same seed yields the same orbs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomOrbs<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RandomOrbs<Pcg64> {
    fn default() -> Self {
        Self::seeded(1)
    }
}

impl<R: Rng> OrbSource for RandomOrbs<R> {
    fn next_orb(&mut self) -> OrbType {
        STANDARD_ORBS[self.rng.gen_range(0..STANDARD_ORBS.len())]
    }

    fn roll(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed orb sequence, wrapping around at the end.
///
/// Target selection always takes the first eligible cell in row-major order
/// and biases never trigger.
#[derive(Debug, Clone)]
pub struct ScriptedOrbs {
    orbs: Vec<OrbType>,
    cursor: usize,
    drawn: usize,
}

impl ScriptedOrbs {
    /// # Panics
    ///
    /// Panics if `orbs` is empty.
    pub fn new(orbs: Vec<OrbType>) -> Self {
        assert!(!orbs.is_empty(), "scripted orb sequence must not be empty");
        Self {
            orbs,
            cursor: 0,
            drawn: 0,
        }
    }

    /// Cycle through the six standard orbs
    pub fn cycling() -> Self {
        Self::new(STANDARD_ORBS.to_vec())
    }

    /// Number of orbs handed out so far
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl OrbSource for ScriptedOrbs {
    fn next_orb(&mut self) -> OrbType {
        let orb = self.orbs[self.cursor];
        self.cursor = (self.cursor + 1) % self.orbs.len();
        self.drawn += 1;
        orb
    }

    fn roll(&mut self) -> f32 {
        1.0
    }

    fn pick_index(&mut self, _len: usize) -> usize {
        0
    }
}
