//! Drivers on top of the board rules: the async paced resolver and the chain
//! planner used for hints and autoplay.

pub mod pacing;
pub mod planner;

pub use pacing::{forward_events, resolve_paced, PacingConfig};
pub use planner::{affordable_prefix, apply_plan, suggest_chain, ChainPlan, PlanError};
