//! Board events
//!
//! The orchestrator queues events as things happen; collaborators drain them
//! with [`BoardOrchestrator::drain_events`](crate::BoardOrchestrator::drain_events).

use crate::board::{CascadeGroup, ChainPath, OrbMove};
use crate::echo::{ap_cost, classify_chain, divinity_gain};
use crate::types::{BoardState, ChainTier, Element, GridPos, Gravity, OrbType};

/// A submitted chain and its derived stats
#[derive(Debug, Clone, PartialEq)]
pub struct ChainResult {
    pub orb: OrbType,
    pub element: Element,
    pub path: ChainPath,
    pub tier: ChainTier,
    pub ap_cost: u32,
    pub divinity: f32,
}

impl ChainResult {
    pub fn new(orb: OrbType, path: ChainPath) -> Self {
        let tier = classify_chain(path.len());
        Self {
            orb,
            element: orb.element(),
            tier,
            ap_cost: ap_cost(tier),
            divinity: divinity_gain(tier),
            path,
        }
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// A cascade group resolved during skyfall checks
pub type CascadeResult = CascadeGroup;

#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    StateChanged(BoardState),
    ChainCompleted(ChainResult),
    CascadeResolved(CascadeResult),
    /// Orbs that slid during one gravity pass
    Skyfall { moves: Vec<OrbMove> },
    ResolutionComplete,
    ApDepleted,
    ApChanged { current: u32, max: u32 },
    GaugeChanged(f32),
    GaugeReady,
    OrbsLocked(Vec<GridPos>),
    OrbsConverted { orb: OrbType, positions: Vec<GridPos> },
    OrbsUnlocked(Vec<GridPos>),
    GravityChanged(Gravity),
}

impl BoardEvent {
    /// Stable lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::StateChanged(_) => "state_changed",
            BoardEvent::ChainCompleted(_) => "chain_completed",
            BoardEvent::CascadeResolved(_) => "cascade_resolved",
            BoardEvent::Skyfall { .. } => "skyfall",
            BoardEvent::ResolutionComplete => "resolution_complete",
            BoardEvent::ApDepleted => "ap_depleted",
            BoardEvent::ApChanged { .. } => "ap_changed",
            BoardEvent::GaugeChanged(_) => "gauge_changed",
            BoardEvent::GaugeReady => "gauge_ready",
            BoardEvent::OrbsLocked(_) => "orbs_locked",
            BoardEvent::OrbsConverted { .. } => "orbs_converted",
            BoardEvent::OrbsUnlocked(_) => "orbs_unlocked",
            BoardEvent::GravityChanged(_) => "gravity_changed",
        }
    }
}
