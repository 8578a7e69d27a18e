//! Board orchestrator - the turn state machine
//!
//! The orchestrator owns the board and the three trackers for one battle and
//! is the only thing that mutates them. A turn looks like:
//!
//! ```text
//! Idle -> ChainInput -> Resolving -> Eliminating -> Skyfall -> ChainCheck
//!   ^        |                                                    |  ^  |
//!   |        '-- cancel / failed submit                           |  '--' cascades
//!   '-------------------------------------------------------------' AP left
//! ```
//!
//! Resolution after a submit is driven by [`BoardOrchestrator::step`], one
//! phase per call, so a presentation layer can pause between phases. A pure
//! simulation calls [`BoardOrchestrator::resolve_all`] instead; both reach the
//! same board and the same event sequence.

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, info};

use crate::action_points::ActionPoints;
use crate::board::{Board, ChainPath};
use crate::combo::ComboTracker;
use crate::echo::{ap_cost, classify_chain, next_tier_cost};
use crate::error::Rejection;
use crate::events::{BoardEvent, ChainResult};
use crate::gauge::{DivinityGauge, GaugeUpdate};
use crate::rng::{OrbBias, OrbSource, RandomOrbs};
use crate::snapshot::BoardSnapshot;
use crate::types::{BoardState, ChainTier, GridPos, Gravity, OrbType};

/// Presentation pause requested between two resolution phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pacing {
    /// Orbs were just removed
    Elimination,
    /// Orbs just fell
    Skyfall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    Continue(Pacing),
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Eliminate,
    Skyfall,
    CascadeCheck,
    CascadeSkyfall,
}

#[derive(Debug, Clone)]
pub struct BoardOrchestrator<S = RandomOrbs> {
    board: Board<S>,
    state: BoardState,
    ap: ActionPoints,
    combo: ComboTracker,
    gauge: DivinityGauge,
    chain: ChainPath,
    chain_orb: Option<OrbType>,
    resolving: ChainPath,
    phase: Option<Phase>,
    events: VecDeque<BoardEvent>,
}

impl<S: OrbSource> BoardOrchestrator<S> {
    /// Orchestrator over an empty board. Call
    /// [`initialize_for_battle`](Self::initialize_for_battle) before play.
    pub fn new(source: S) -> Self {
        Self::with_board(Board::new(source))
    }

    /// Orchestrator over a prepared board, trackers at their defaults
    pub fn with_board(board: Board<S>) -> Self {
        Self {
            board,
            state: BoardState::Idle,
            ap: ActionPoints::default(),
            combo: ComboTracker::new(),
            gauge: DivinityGauge::default(),
            chain: ChainPath::new(),
            chain_orb: None,
            resolving: ChainPath::new(),
            phase: None,
            events: VecDeque::new(),
        }
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn board(&self) -> &Board<S> {
        &self.board
    }

    pub fn ap(&self) -> &ActionPoints {
        &self.ap
    }

    pub fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    pub fn gauge(&self) -> &DivinityGauge {
        &self.gauge
    }

    /// Positions of the chain being built, in order
    pub fn active_chain(&self) -> &[GridPos] {
        &self.chain
    }

    pub fn active_chain_orb(&self) -> Option<OrbType> {
        self.chain_orb
    }

    /// Whether a submitted chain is still being resolved
    pub fn is_resolving(&self) -> bool {
        self.phase.is_some()
    }

    /// Take every queued event, oldest first
    pub fn drain_events(&mut self) -> impl Iterator<Item = BoardEvent> + '_ {
        self.events.drain(..)
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    fn emit(&mut self, event: BoardEvent) {
        self.events.push_back(event);
    }

    fn set_state(&mut self, state: BoardState) {
        if self.state == state {
            return;
        }
        debug!(from = %self.state, to = %state, "board state");
        self.state = state;
        self.emit(BoardEvent::StateChanged(state));
    }

    fn emit_ap(&mut self) {
        let (current, max) = (self.ap.current(), self.ap.max());
        self.emit(BoardEvent::ApChanged { current, max });
    }

    fn emit_gauge(&mut self, update: GaugeUpdate) {
        self.emit(BoardEvent::GaugeChanged(update.value));
        if update.became_ready {
            info!(value = update.value, "divinity gauge ready");
            self.emit(BoardEvent::GaugeReady);
        }
    }

    fn ensure_settled(&self) -> Result<(), Rejection> {
        if self.is_resolving() {
            return Err(Rejection::ResolutionPending);
        }
        Ok(())
    }

    /// Clear selection flags and forget the chain in progress
    fn drop_chain(&mut self) {
        for &pos in &self.chain {
            self.board.set_selected(pos, false);
        }
        self.chain.clear();
        self.chain_orb = None;
    }

    /// Fill the board and reset every tracker for a new battle.
    ///
    /// With a bias, each initial cell is the bias orb with probability
    /// `bias.strength`. Skyfall refills are never biased.
    pub fn initialize_for_battle(&mut self, bias: Option<OrbBias>) {
        self.chain.clear();
        self.chain_orb = None;
        self.resolving.clear();
        self.phase = None;

        self.board.set_gravity(Gravity::Normal);
        self.board.random_fill(bias);
        self.ap.reset_for_new_turn(0);
        self.combo.reset_for_new_battle();
        self.gauge.reset();

        info!(
            bias = bias.map(|b| b.orb.as_str()),
            "battle initialized\n{}", self.board
        );
        self.emit_ap();
        self.emit(BoardEvent::GaugeChanged(self.gauge.value()));
        self.set_state(BoardState::Idle);
    }

    /// Roll over bonus AP, tick locks and reset the turn's combo.
    ///
    /// Refused while a resolution is pending. A chain in progress is
    /// cancelled.
    pub fn begin_player_turn(&mut self) -> bool {
        if self.is_resolving() {
            return false;
        }
        self.drop_chain();

        let bonus = self.combo.take_bonus_ap();
        self.combo.reset_for_new_turn();
        self.ap.reset_for_new_turn(bonus);
        self.emit_ap();

        let unlocked = self.board.tick_all_locks();
        if !unlocked.is_empty() {
            debug!(count = unlocked.len(), "orbs unlocked");
            self.emit(BoardEvent::OrbsUnlocked(unlocked));
        }

        info!(ap = self.ap.current(), bonus, "player turn begins");
        self.set_state(BoardState::Idle);
        true
    }

    /// Start a chain at (row, col). Only legal while `Idle`.
    pub fn start_chain(&mut self, row: i8, col: i8) -> Result<(), Rejection> {
        if self.state != BoardState::Idle {
            return Err(Rejection::WrongState(self.state));
        }
        let pos = GridPos::new(row, col);
        let cell = *self.board.cell(pos).ok_or(Rejection::OutOfBounds(pos))?;
        if !cell.can_be_chained() {
            return Err(Rejection::NotChainable(pos));
        }

        self.chain.clear();
        self.chain.push(pos);
        self.chain_orb = Some(cell.orb());
        self.board.set_selected(pos, true);
        self.set_state(BoardState::ChainInput);

        debug!(row, col, orb = %cell.orb(), "chain started");
        Ok(())
    }

    /// Extend the chain to (row, col).
    ///
    /// The new cell must be on the board, not yet in the chain, chainable, of
    /// the chain's orb type and adjacent to the tail. The extension is also
    /// refused when the tier it would reach costs more AP than is left.
    pub fn extend_chain(&mut self, row: i8, col: i8) -> Result<(), Rejection> {
        if self.state != BoardState::ChainInput {
            return Err(Rejection::WrongState(self.state));
        }
        let pos = GridPos::new(row, col);
        let cell = *self.board.cell(pos).ok_or(Rejection::OutOfBounds(pos))?;
        if self.chain.contains(&pos) {
            return Err(Rejection::AlreadyInChain(pos));
        }
        if !cell.can_be_chained() {
            return Err(Rejection::NotChainable(pos));
        }
        let (Some(expected), Some(&tail)) = (self.chain_orb, self.chain.last()) else {
            return Err(Rejection::WrongState(self.state));
        };
        if cell.orb() != expected {
            return Err(Rejection::TypeMismatch {
                pos,
                expected,
                found: cell.orb(),
            });
        }
        if !tail.is_adjacent(pos) {
            return Err(Rejection::NotAdjacent(pos));
        }
        let cost = next_tier_cost(self.chain.len());
        if !self.ap.can_afford(cost) {
            return Err(Rejection::InsufficientAp {
                cost,
                available: self.ap.current(),
            });
        }
        if self.chain.try_push(pos).is_err() {
            return Err(Rejection::InvalidPath);
        }
        self.board.set_selected(pos, true);

        debug!(row, col, len = self.chain.len(), "chain extended");
        Ok(())
    }

    /// Submit the chain in progress.
    ///
    /// On success AP is spent, combo and gauge are credited, a
    /// `ChainCompleted` event is queued and the state becomes `Resolving`;
    /// drive the rest with [`step`](Self::step). On failure the chain is
    /// cancelled and the state returns to `Idle`.
    pub fn submit_chain(&mut self) -> Result<ChainResult, Rejection> {
        if self.state != BoardState::ChainInput {
            return Err(Rejection::WrongState(self.state));
        }
        let result = self.try_charge_chain();
        if result.is_err() {
            self.cancel_chain();
        }
        result
    }

    fn try_charge_chain(&mut self) -> Result<ChainResult, Rejection> {
        let tier = classify_chain(self.chain.len());
        if tier == ChainTier::None {
            return Err(Rejection::TooShort(self.chain.len()));
        }

        // Selected cells are not chainable, so clear the flags before checking.
        self.board.clear_selection();
        if !self.board.validate_chain(&self.chain) {
            return Err(Rejection::InvalidPath);
        }
        let orb = self.chain_orb.ok_or(Rejection::InvalidPath)?;
        let cost = ap_cost(tier);
        if !self.ap.spend(cost) {
            return Err(Rejection::InsufficientAp {
                cost,
                available: self.ap.current(),
            });
        }
        self.emit_ap();

        let result = ChainResult::new(orb, std::mem::take(&mut self.chain));
        self.chain_orb = None;
        self.combo.add_combo(1);
        let update = self.gauge.add_from_chain(result.tier);
        self.emit_gauge(update);

        info!(
            orb = %result.orb,
            len = result.len(),
            tier = result.tier.as_str(),
            ap = self.ap.current(),
            combo = self.combo.current(),
            "chain submitted"
        );

        self.resolving.clone_from(&result.path);
        self.phase = Some(Phase::Eliminate);
        self.set_state(BoardState::Resolving);
        self.emit(BoardEvent::ChainCompleted(result.clone()));
        Ok(result)
    }

    /// Drop the chain in progress. Only legal while `ChainInput`.
    pub fn cancel_chain(&mut self) -> bool {
        if self.state != BoardState::ChainInput {
            return false;
        }
        self.drop_chain();
        self.set_state(BoardState::Idle);
        debug!("chain cancelled");
        true
    }

    pub fn try_start_chain(&mut self, row: i8, col: i8) -> bool {
        self.start_chain(row, col)
            .map_err(|e| debug!(row, col, reason = %e, "start rejected"))
            .is_ok()
    }

    pub fn try_extend_chain(&mut self, row: i8, col: i8) -> bool {
        self.extend_chain(row, col)
            .map_err(|e| debug!(row, col, reason = %e, "extend rejected"))
            .is_ok()
    }

    pub fn try_submit_chain(&mut self) -> bool {
        self.submit_chain()
            .map_err(|e| debug!(reason = %e, "submit rejected"))
            .is_ok()
    }

    /// Advance the pending resolution by one phase
    pub fn step(&mut self) -> StepOutcome {
        let Some(phase) = self.phase else {
            return StepOutcome::Finished;
        };

        match phase {
            Phase::Eliminate => {
                self.set_state(BoardState::Eliminating);
                let path = std::mem::take(&mut self.resolving);
                self.board.eliminate(&path);
                self.phase = Some(Phase::Skyfall);
                StepOutcome::Continue(Pacing::Elimination)
            }
            Phase::Skyfall => {
                self.set_state(BoardState::Skyfall);
                self.skyfall();
                self.phase = Some(Phase::CascadeCheck);
                StepOutcome::Continue(Pacing::Skyfall)
            }
            Phase::CascadeCheck => {
                self.set_state(BoardState::ChainCheck);
                let groups = self.board.find_cascade_matches();
                if groups.is_empty() {
                    self.finish_resolution();
                    return StepOutcome::Finished;
                }
                for group in groups {
                    self.combo.add_combo(1);
                    let update = self.gauge.add_from_cascade();
                    info!(
                        orb = %group.orb,
                        size = group.cells.len(),
                        combo = self.combo.current(),
                        "cascade"
                    );
                    self.emit_gauge(update);
                    self.board.eliminate(&group.cells);
                    self.emit(BoardEvent::CascadeResolved(group));
                }
                self.phase = Some(Phase::CascadeSkyfall);
                StepOutcome::Continue(Pacing::Elimination)
            }
            Phase::CascadeSkyfall => {
                self.skyfall();
                self.phase = Some(Phase::CascadeCheck);
                StepOutcome::Continue(Pacing::Skyfall)
            }
        }
    }

    /// Run the pending resolution to completion with no pauses
    pub fn resolve_all(&mut self) {
        while let StepOutcome::Continue(_) = self.step() {}
    }

    fn skyfall(&mut self) {
        let moves = self.board.apply_gravity();
        self.emit(BoardEvent::Skyfall { moves });
    }

    fn finish_resolution(&mut self) {
        self.phase = None;
        if self.ap.has_ap() {
            self.set_state(BoardState::Idle);
        } else {
            info!(combo = self.combo.current(), "AP depleted");
            self.emit(BoardEvent::ApDepleted);
        }
    }

    /// Signal collaborators that board processing for the turn is done.
    /// Refused while a resolution is pending; cancels a chain in progress.
    pub fn end_player_turn(&mut self) -> bool {
        if self.is_resolving() {
            return false;
        }
        self.cancel_chain();
        info!(combo = self.combo.current(), "player turn ends");
        self.emit(BoardEvent::ResolutionComplete);
        true
    }

    fn ensure_boss_window(&self) -> Result<(), Rejection> {
        self.ensure_settled()?;
        if self.state == BoardState::ChainInput {
            return Err(Rejection::WrongState(self.state));
        }
        Ok(())
    }

    /// Lock up to `count` random orbs for `turns` turns
    pub fn boss_lock_orbs(&mut self, count: usize, turns: u8) -> Result<Vec<GridPos>, Rejection> {
        self.ensure_boss_window()?;
        if turns == 0 {
            return Err(Rejection::ZeroLockTurns);
        }
        let locked = self.board.lock_random(count, turns);
        info!(requested = count, locked = locked.len(), turns, "boss locked orbs");
        if !locked.is_empty() {
            self.emit(BoardEvent::OrbsLocked(locked.clone()));
        }
        Ok(locked)
    }

    /// Convert up to `count` random orbs to `orb`
    pub fn boss_convert_orbs(
        &mut self,
        count: usize,
        orb: OrbType,
    ) -> Result<Vec<GridPos>, Rejection> {
        self.ensure_boss_window()?;
        let positions = self.board.convert_random(count, orb);
        info!(requested = count, converted = positions.len(), orb = %orb, "boss converted orbs");
        if !positions.is_empty() {
            self.emit(BoardEvent::OrbsConverted {
                orb,
                positions: positions.clone(),
            });
        }
        Ok(positions)
    }

    /// Flip gravity for all following skyfalls
    pub fn invert_gravity(&mut self) -> Result<Gravity, Rejection> {
        self.ensure_boss_window()?;
        let gravity = self.board.gravity().flipped();
        self.board.set_gravity(gravity);
        info!(gravity = gravity.as_str(), "gravity changed");
        self.emit(BoardEvent::GravityChanged(gravity));
        Ok(gravity)
    }

    /// A hit landed with elemental advantage
    pub fn credit_advantage_hit(&mut self) -> f32 {
        let update = self.gauge.add_from_advantage_hit();
        self.emit_gauge(update);
        update.value
    }

    /// The team took damage worth `damage_ratio` of its max HP
    pub fn credit_damage_taken(&mut self, damage_ratio: f32) -> f32 {
        let update = self.gauge.add_from_damage_taken(damage_ratio);
        self.emit_gauge(update);
        update.value
    }

    /// Spend a full gauge on the team burst
    pub fn consume_divinity_burst(&mut self) -> Result<(), Rejection> {
        if !self.gauge.consume_for_burst() {
            return Err(Rejection::GaugeNotReady);
        }
        info!("divinity burst");
        self.emit(BoardEvent::GaugeChanged(self.gauge.value()));
        Ok(())
    }

    /// Cooldown-reduction units earned since the last call
    pub fn take_cd_reductions(&mut self) -> u32 {
        self.combo.take_cd_reductions()
    }

    pub fn chainable_cells_of_type(&self, orb: OrbType) -> Vec<GridPos> {
        self.board.chainable_cells_of_type(orb)
    }

    pub fn count_orb_types(&self) -> BTreeMap<OrbType, usize> {
        self.board.count_orb_types()
    }

    pub fn longest_chain_from(&self, row: i8, col: i8) -> ChainPath {
        self.board.longest_chain_from(row, col)
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        self.board.write_u8_grid(&mut out.orbs);
        self.board.write_lock_grid(&mut out.locks);
        out.board_hash = BoardSnapshot::hash_grid(&out.orbs);
        out.gravity = self.board.gravity();
        out.state = self.state;
        out.ap = self.ap.current();
        out.ap_max = self.ap.max();
        out.combo = self.combo.current();
        out.combo_total = self.combo.total();
        out.gauge = self.gauge.value();
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for BoardOrchestrator<RandomOrbs> {
    fn default() -> Self {
        Self::new(RandomOrbs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::OrbLayout;
    use crate::rng::ScriptedOrbs;
    use crate::types::OrbType::*;
    use crate::types::STANDARD_ORBS;

    fn no_match_rows() -> OrbLayout {
        let mut rows = [[Water; 6]; 5];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, orb) in row.iter_mut().enumerate() {
                *orb = STANDARD_ORBS[(2 * r + c) % 6];
            }
        }
        rows
    }

    /// Row 2 is all Light apart from its two ends
    fn light_row() -> BoardOrchestrator<ScriptedOrbs> {
        let mut rows = no_match_rows();
        for c in 0..6 {
            rows[2][c] = Light;
        }
        rows[1][3] = Fire;
        rows[3][3] = Water;
        BoardOrchestrator::with_board(Board::from_rows(rows, ScriptedOrbs::cycling()))
    }

    #[test]
    fn start_requires_idle_and_chainable_cell() {
        let mut orch = light_row();
        assert_eq!(
            orch.start_chain(-1, 0),
            Err(Rejection::OutOfBounds(GridPos::new(-1, 0)))
        );
        assert!(orch.try_start_chain(2, 0));
        assert_eq!(orch.state(), BoardState::ChainInput);
        assert!(orch.board()[GridPos::new(2, 0)].is_selected());
        assert_eq!(
            orch.start_chain(2, 1),
            Err(Rejection::WrongState(BoardState::ChainInput))
        );
    }

    #[test]
    fn extend_checks_in_order() {
        let mut orch = light_row();
        assert!(orch.try_start_chain(2, 0));
        assert_eq!(
            orch.extend_chain(2, 0),
            Err(Rejection::AlreadyInChain(GridPos::new(2, 0)))
        );
        assert!(matches!(
            orch.extend_chain(1, 0),
            Err(Rejection::TypeMismatch { .. })
        ));
        assert_eq!(
            orch.extend_chain(2, 2),
            Err(Rejection::NotAdjacent(GridPos::new(2, 2)))
        );
        assert!(orch.try_extend_chain(2, 1));
        assert_eq!(orch.active_chain().len(), 2);
    }

    #[test]
    fn extension_refused_when_next_tier_unaffordable() {
        let mut orch = light_row();
        orch.ap.spend(2);
        assert!(orch.try_start_chain(2, 0));
        assert!(orch.try_extend_chain(2, 1));
        assert!(orch.try_extend_chain(2, 2));
        assert!(orch.try_extend_chain(2, 3));
        // A fifth orb would reach Enhanced, which costs 2 with 1 AP left.
        assert_eq!(
            orch.extend_chain(2, 4),
            Err(Rejection::InsufficientAp {
                cost: 2,
                available: 1
            })
        );
        assert_eq!(orch.active_chain().len(), 4);
    }

    #[test]
    fn short_submit_cancels_the_chain() {
        let mut orch = light_row();
        assert!(orch.try_start_chain(2, 0));
        assert!(orch.try_extend_chain(2, 1));
        assert_eq!(orch.submit_chain(), Err(Rejection::TooShort(2)));
        assert_eq!(orch.state(), BoardState::Idle);
        assert!(orch.active_chain().is_empty());
        assert!(orch.board().cells().iter().all(|c| !c.is_selected()));
        assert_eq!(orch.ap().current(), 3);
    }

    #[test]
    fn submit_then_step_through_phases() {
        let mut orch = light_row();
        assert!(orch.try_start_chain(2, 0));
        assert!(orch.try_extend_chain(2, 1));
        assert!(orch.try_extend_chain(2, 2));
        let result = orch.submit_chain().unwrap();
        assert_eq!(result.tier, ChainTier::Basic);
        assert_eq!(orch.state(), BoardState::Resolving);
        assert!(orch.is_resolving());

        assert_eq!(orch.step(), StepOutcome::Continue(Pacing::Elimination));
        assert_eq!(orch.state(), BoardState::Eliminating);
        assert!(orch.board()[GridPos::new(2, 0)].is_empty());

        assert_eq!(orch.step(), StepOutcome::Continue(Pacing::Skyfall));
        assert_eq!(orch.state(), BoardState::Skyfall);
        assert!(orch.board().cells().iter().all(|c| !c.is_empty()));

        orch.resolve_all();
        assert!(!orch.is_resolving());
        assert_eq!(orch.step(), StepOutcome::Finished);
    }

    #[test]
    fn turn_and_boss_ops_refused_mid_resolution() {
        let mut orch = light_row();
        assert!(orch.try_start_chain(2, 0));
        assert_eq!(
            orch.boss_lock_orbs(1, 1),
            Err(Rejection::WrongState(BoardState::ChainInput))
        );
        assert!(orch.try_extend_chain(2, 1));
        assert!(orch.try_extend_chain(2, 2));
        assert!(orch.try_submit_chain());

        assert!(!orch.begin_player_turn());
        assert!(!orch.end_player_turn());
        assert_eq!(orch.invert_gravity(), Err(Rejection::ResolutionPending));
        assert!(!orch.cancel_chain());
    }

    #[test]
    fn state_changed_fires_only_on_change() {
        let mut orch = light_row();
        assert!(orch.begin_player_turn());
        let events: Vec<_> = orch.drain_events().collect();
        assert!(!events
            .iter()
            .any(|e| matches!(e, BoardEvent::StateChanged(_))));
    }

    #[test]
    fn burst_needs_full_gauge() {
        let mut orch = light_row();
        assert_eq!(orch.consume_divinity_burst(), Err(Rejection::GaugeNotReady));
        orch.credit_damage_taken(10.0);
        assert!(orch.gauge().is_ready());
        assert!(orch
            .drain_events()
            .any(|e| e == BoardEvent::GaugeReady));
        assert!(orch.consume_divinity_burst().is_ok());
        assert_eq!(orch.gauge().value(), 0.0);
    }
}
