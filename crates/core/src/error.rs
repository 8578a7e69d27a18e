//! Rejections for board operations
//!
//! Every rejected operation leaves the board and trackers untouched.

use thiserror::Error;

use crate::types::{BoardState, GridPos, OrbType};

/// Broad class of a rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// Bad coordinates, wrong cell or a broken path
    InvalidInput,
    /// Not enough AP or divinity
    InsufficientResource,
    /// The operation is not legal in the current board state
    WrongState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("operation not allowed while {0}")]
    WrongState(BoardState),
    #[error("a chain resolution is still pending")]
    ResolutionPending,
    #[error("{0} is off the board")]
    OutOfBounds(GridPos),
    #[error("cell {0} cannot be chained")]
    NotChainable(GridPos),
    #[error("cell {0} is already in the chain")]
    AlreadyInChain(GridPos),
    #[error("cell {pos} holds {found}, chain is {expected}")]
    TypeMismatch {
        pos: GridPos,
        expected: OrbType,
        found: OrbType,
    },
    #[error("cell {0} is not adjacent to the chain tail")]
    NotAdjacent(GridPos),
    #[error("a chain of {0} orbs is too short")]
    TooShort(usize),
    #[error("chain path is no longer valid")]
    InvalidPath,
    #[error("chain needs {cost} AP, {available} left")]
    InsufficientAp { cost: u32, available: u32 },
    #[error("divinity gauge is not full")]
    GaugeNotReady,
    #[error("a lock must last at least one turn")]
    ZeroLockTurns,
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::WrongState(_) | Rejection::ResolutionPending => RejectionKind::WrongState,
            Rejection::InsufficientAp { .. } | Rejection::GaugeNotReady => {
                RejectionKind::InsufficientResource
            }
            Rejection::OutOfBounds(_)
            | Rejection::NotChainable(_)
            | Rejection::AlreadyInChain(_)
            | Rejection::TypeMismatch { .. }
            | Rejection::NotAdjacent(_)
            | Rejection::TooShort(_)
            | Rejection::InvalidPath
            | Rejection::ZeroLockTurns => RejectionKind::InvalidInput,
        }
    }
}
