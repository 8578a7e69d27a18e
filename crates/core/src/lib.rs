//! Core board rules - pure, deterministic, and testable
//!
//! This crate holds every rule of the orb board: the grid, chain validation and
//! echo tiers, cascade detection, gravity, boss mutations, the three trackers
//! and the turn state machine that ties them together. It does no I/O and
//! reads no clocks:
//!
//! - **Deterministic**: all randomness comes from an injected [`OrbSource`];
//!   the same seed replays the same battle
//! - **Testable**: layouts can be built cell by cell with [`Board::from_rows`]
//!   and a [`ScriptedOrbs`] refill
//! - **Pace-agnostic**: resolution is a step function, so callers choose
//!   whether to pause between phases
//!
//! # Module Structure
//!
//! - [`cell`]: a single grid slot with lock and selection state
//! - [`board`]: the 5x6 grid, flood fill, gravity, longest-chain search
//! - [`echo`]: tier, AP cost, divinity and combo tables
//! - [`action_points`], [`combo`], [`gauge`]: the per-turn and per-battle trackers
//! - [`orchestrator`]: the state machine and event queue
//! - [`rng`]: seeded and scripted orb sources
//! - [`snapshot`]: plain-data board copies and the FNV board hash
//!
//! # Example
//!
//! ```
//! use orb_echo_core::{Board, BoardOrchestrator, ScriptedOrbs};
//! use orb_echo_core::types::{BoardState, OrbType::*};
//!
//! let rows = [
//!     [Water, Water, Water, Light, Dark, Heart],
//!     [Wood, Light, Dark, Heart, Water, Fire],
//!     [Dark, Heart, Water, Fire, Wood, Light],
//!     [Water, Fire, Wood, Light, Dark, Heart],
//!     [Wood, Light, Dark, Heart, Water, Fire],
//! ];
//! let board = Board::from_rows(rows, ScriptedOrbs::new(vec![Heart, Dark, Fire]));
//! let mut orch = BoardOrchestrator::with_board(board);
//!
//! assert!(orch.try_start_chain(0, 0));
//! assert!(orch.try_extend_chain(0, 1));
//! assert!(orch.try_extend_chain(0, 2));
//! assert!(orch.try_submit_chain());
//! orch.resolve_all();
//!
//! assert_eq!(orch.ap().current(), 2);
//! assert_eq!(orch.combo().current(), 1);
//! assert_eq!(orch.state(), BoardState::Idle);
//! ```

pub mod action_points;
pub mod board;
pub mod cell;
pub mod combo;
pub mod echo;
pub mod error;
pub mod events;
pub mod gauge;
pub mod orchestrator;
pub mod rng;
pub mod snapshot;

pub use orb_echo_types as types;

// Re-export commonly used types for convenience
pub use action_points::ActionPoints;
pub use board::{Board, CascadeGroup, ChainPath, OrbLayout, OrbMove};
pub use cell::OrbCell;
pub use combo::ComboTracker;
pub use echo::{ap_cost, classify_chain, combo_damage_bonus, divinity_gain};
pub use error::{Rejection, RejectionKind};
pub use events::{BoardEvent, CascadeResult, ChainResult};
pub use gauge::{DivinityGauge, GaugeUpdate};
pub use orchestrator::{BoardOrchestrator, Pacing, StepOutcome};
pub use rng::{OrbBias, OrbSource, RandomOrbs, ScriptedOrbs};
pub use snapshot::{BoardSnapshot, Fnv1aHasher};
