//! Runtime configuration for the autoplay binary.
//!
//! Values come from `ORB_ECHO_*` environment variables and can be overridden
//! by command-line flags.

use anyhow::{anyhow, Context, Result};

use crate::core::OrbBias;
use crate::engine::PacingConfig;
use crate::types::OrbType;

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub seed: u64,
    pub turns: u32,
    pub bias_orb: Option<OrbType>,
    pub bias_strength: f32,
    /// Invert gravity every N turns; 0 disables
    pub invert_every: u32,
    pub elimination_delay_ms: u64,
    pub cascade_delay_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            turns: 5,
            bias_orb: None,
            bias_strength: 0.0,
            invert_every: 0,
            elimination_delay_ms: 0,
            cascade_delay_ms: 0,
        }
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("invalid value for {name}: {raw:?}"))
}

fn parse_orb(name: &str, raw: &str) -> Result<Option<OrbType>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match OrbType::from_str(raw) {
        Some(orb) if orb.is_standard() => Ok(Some(orb)),
        _ => Err(anyhow!("invalid value for {name}: {raw:?} is not a standard orb")),
    }
}

fn parse_strength(name: &str, raw: &str) -> Result<f32> {
    let v: f32 = parse_value(name, raw)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(anyhow!("invalid value for {name}: {v} is outside [0, 1]"));
    }
    Ok(v)
}

impl SimConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset variables keep their
    /// defaults; set but unparsable ones are errors.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("ORB_ECHO_SEED") {
            config.seed = parse_value("ORB_ECHO_SEED", &v)?;
        }
        if let Some(v) = lookup("ORB_ECHO_TURNS") {
            config.turns = parse_value("ORB_ECHO_TURNS", &v)?;
        }
        if let Some(v) = lookup("ORB_ECHO_BIAS") {
            config.bias_orb = parse_orb("ORB_ECHO_BIAS", &v)?;
        }
        if let Some(v) = lookup("ORB_ECHO_BIAS_STRENGTH") {
            config.bias_strength = parse_strength("ORB_ECHO_BIAS_STRENGTH", &v)?;
        }
        if let Some(v) = lookup("ORB_ECHO_INVERT_EVERY") {
            config.invert_every = parse_value("ORB_ECHO_INVERT_EVERY", &v)?;
        }
        if let Some(v) = lookup("ORB_ECHO_ELIMINATION_DELAY_MS") {
            config.elimination_delay_ms = parse_value("ORB_ECHO_ELIMINATION_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("ORB_ECHO_CASCADE_DELAY_MS") {
            config.cascade_delay_ms = parse_value("ORB_ECHO_CASCADE_DELAY_MS", &v)?;
        }

        Ok(config)
    }

    /// Apply `--flag value` overrides (program name already stripped).
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = args
                .get(i + 1)
                .map(String::as_str)
                .ok_or_else(|| anyhow!("missing value for {flag}"));
            match flag {
                "--seed" => self.seed = parse_value(flag, value?)?,
                "--turns" => self.turns = parse_value(flag, value?)?,
                "--bias" => self.bias_orb = parse_orb(flag, value?)?,
                "--bias-strength" => self.bias_strength = parse_strength(flag, value?)?,
                "--invert-every" => self.invert_every = parse_value(flag, value?)?,
                "--elimination-delay-ms" => self.elimination_delay_ms = parse_value(flag, value?)?,
                "--cascade-delay-ms" => self.cascade_delay_ms = parse_value(flag, value?)?,
                other => return Err(anyhow!("unknown argument: {other}")),
            }
            i += 2;
        }
        Ok(())
    }

    pub fn bias(&self) -> Option<OrbBias> {
        match self.bias_orb {
            Some(orb) if self.bias_strength > 0.0 => Some(OrbBias::new(orb, self.bias_strength)),
            _ => None,
        }
    }

    pub fn pacing(&self) -> PacingConfig {
        PacingConfig::from_millis(self.elimination_delay_ms, self.cascade_delay_ms)
    }

    /// Whether the boss inverts gravity before `turn` (1-based)
    pub fn inverts_before(&self, turn: u32) -> bool {
        self.invert_every > 0 && turn > 1 && (turn - 1) % self.invert_every == 0
    }
}
