use orb_echo_types::{BoardState, ChainTier, OrbType, CHAIN_BASIC};
use orb_echo_core::{
    ap_cost, classify_chain, ActionPoints, BoardOrchestrator, ChainPath, ChainResult, OrbSource,
    Rejection,
};
use tracing::debug;

/// A chain the planner wants to play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainPlan {
    pub orb: OrbType,
    pub path: ChainPath,
    pub tier: ChainTier,
    pub ap_cost: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    NotPlayable,
    NoChain,
    Rejected(Rejection),
}

impl PlanError {
    pub fn code(self) -> &'static str {
        match self {
            PlanError::NotPlayable => "not_playable",
            PlanError::NoChain => "no_chain",
            PlanError::Rejected(_) => "invalid_plan",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlanError::NotPlayable => "board is not waiting for a chain or AP is spent",
            PlanError::NoChain => "no affordable chain of three or more orbs",
            PlanError::Rejected(_) => "board rejected the planned chain",
        }
    }
}

/// Find the longest chain the current AP can pay for.
///
/// Every chainable cell is tried in row-major order. Its longest path is cut
/// back to the longest affordable prefix; ties keep the first cell scanned.
pub fn suggest_chain<S: OrbSource>(orch: &BoardOrchestrator<S>) -> Result<ChainPlan, PlanError> {
    if orch.state() != BoardState::Idle || !orch.ap().has_ap() {
        return Err(PlanError::NotPlayable);
    }

    let ap = orch.ap();
    let mut best: Option<ChainPlan> = None;
    for cell in orch.board().cells() {
        if !cell.can_be_chained() {
            continue;
        }
        let path = affordable_prefix(orch.longest_chain_from(cell.row(), cell.col()), ap);
        if path.len() < CHAIN_BASIC {
            continue;
        }
        if best.as_ref().is_some_and(|b| b.path.len() >= path.len()) {
            continue;
        }
        let tier = classify_chain(path.len());
        best = Some(ChainPlan {
            orb: cell.orb(),
            path,
            tier,
            ap_cost: ap_cost(tier),
        });
    }

    best.ok_or(PlanError::NoChain)
}

/// Cut `path` back to the longest prefix whose tier `ap` can pay for
pub fn affordable_prefix(mut path: ChainPath, ap: &ActionPoints) -> ChainPath {
    while path.len() >= CHAIN_BASIC && !ap.can_afford_tier(classify_chain(path.len())) {
        path.pop();
    }
    path
}

/// Drive start, extend and submit for `plan`.
///
/// Leaves the orchestrator resolving; the caller steps or resolves it. If
/// any cell is refused the chain is cancelled and the board is unchanged.
pub fn apply_plan<S: OrbSource>(
    orch: &mut BoardOrchestrator<S>,
    plan: &ChainPlan,
) -> Result<ChainResult, PlanError> {
    if orch.state() != BoardState::Idle {
        return Err(PlanError::NotPlayable);
    }
    let Some((first, rest)) = plan.path.split_first() else {
        return Err(PlanError::NoChain);
    };

    orch.start_chain(first.row, first.col).map_err(PlanError::Rejected)?;
    for pos in rest {
        if let Err(e) = orch.extend_chain(pos.row, pos.col) {
            debug!(reason = %e, "plan step rejected");
            orch.cancel_chain();
            return Err(PlanError::Rejected(e));
        }
    }
    orch.submit_chain().map_err(PlanError::Rejected)
}
