//! Orb Echo (workspace facade crate).
//!
//! Re-exports the board rules, the drivers built on them and the shared types
//! under `orb_echo::{core,engine,types}`, and adds the JSON observation records
//! and runtime configuration used by the `orb-echo` binary.

pub use orb_echo_core as core;
pub use orb_echo_engine as engine;
pub use orb_echo_types as types;

pub mod config;
pub mod observe;
