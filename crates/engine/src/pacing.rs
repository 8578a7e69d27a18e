//! Paced resolution - drives the orchestrator's step function on tokio time
//!
//! Between resolution phases the resolver forwards queued events to a channel
//! and sleeps for the configured delay so a presentation layer can animate.
//! With zero delays the result is identical to
//! [`BoardOrchestrator::resolve_all`].

use std::time::Duration;

use orb_echo_core::{BoardEvent, BoardOrchestrator, OrbSource, Pacing, StepOutcome};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Pauses between resolution phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacingConfig {
    /// After orbs are removed
    pub elimination_delay: Duration,
    /// After orbs fall
    pub cascade_delay: Duration,
}

impl PacingConfig {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_millis(elimination_ms: u64, cascade_ms: u64) -> Self {
        Self {
            elimination_delay: Duration::from_millis(elimination_ms),
            cascade_delay: Duration::from_millis(cascade_ms),
        }
    }

    pub fn delay_for(&self, pacing: Pacing) -> Duration {
        match pacing {
            Pacing::Elimination => self.elimination_delay,
            Pacing::Skyfall => self.cascade_delay,
        }
    }
}

/// Forward every queued event. Returns false once the receiver is gone.
pub fn forward_events<S: OrbSource>(
    orch: &mut BoardOrchestrator<S>,
    events: &UnboundedSender<BoardEvent>,
) -> bool {
    let mut open = true;
    for event in orch.drain_events() {
        if open && events.send(event).is_err() {
            open = false;
        }
    }
    open
}

/// Resolve the pending chain, pausing at each phase boundary.
///
/// Runs to completion even if the receiver is dropped; input is never
/// accepted mid-resolution. Returns the number of phases stepped.
pub async fn resolve_paced<S: OrbSource>(
    orch: &mut BoardOrchestrator<S>,
    pacing: &PacingConfig,
    events: &UnboundedSender<BoardEvent>,
) -> usize {
    let mut steps = 0;
    let mut open = true;
    loop {
        let outcome = orch.step();
        if open {
            open = forward_events(orch, events);
            if !open {
                warn!("event receiver dropped; resolving without output");
            }
        } else {
            orch.drain_events().for_each(drop);
        }

        let StepOutcome::Continue(pause) = outcome else {
            break;
        };
        steps += 1;

        let delay = pacing.delay_for(pause);
        if !delay.is_zero() {
            debug!(?pause, delay_ms = delay.as_millis() as u64, "pacing");
            tokio::time::sleep(delay).await;
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use orb_echo_core::{Board, OrbLayout, ScriptedOrbs};
    use orb_echo_types::{BoardState, OrbType::*, STANDARD_ORBS};
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::Instant;

    fn water_row() -> BoardOrchestrator<ScriptedOrbs> {
        let mut rows: OrbLayout = [[Water; 6]; 5];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, orb) in row.iter_mut().enumerate() {
                *orb = STANDARD_ORBS[(2 * r + c) % 6];
            }
        }
        rows[0][1] = Water;
        rows[0][2] = Water;
        let refill = ScriptedOrbs::new(vec![Heart, Dark, Fire]);
        let mut orch = BoardOrchestrator::with_board(Board::from_rows(rows, refill));
        assert!(orch.try_start_chain(0, 0));
        assert!(orch.try_extend_chain(0, 1));
        assert!(orch.try_extend_chain(0, 2));
        assert!(orch.try_submit_chain());
        orch
    }

    #[test]
    fn delay_lookup() {
        let pacing = PacingConfig::from_millis(300, 150);
        assert_eq!(pacing.delay_for(Pacing::Elimination), Duration::from_millis(300));
        assert_eq!(pacing.delay_for(Pacing::Skyfall), Duration::from_millis(150));
        assert_eq!(PacingConfig::zero().delay_for(Pacing::Skyfall), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn paced_resolution_waits_between_phases() {
        let mut orch = water_row();
        let (tx, mut rx) = unbounded_channel();
        let start = Instant::now();

        let steps = resolve_paced(&mut orch, &PacingConfig::from_millis(300, 150), &tx).await;

        // Eliminate, skyfall, then a cascade check that finds nothing.
        assert_eq!(steps, 2);
        assert_eq!(start.elapsed(), Duration::from_millis(450));
        assert_eq!(orch.state(), BoardState::Idle);

        let mut names = Vec::new();
        while let Ok(event) = rx.try_recv() {
            names.push(event.name());
        }
        assert!(names.contains(&"chain_completed"));
        assert!(names.contains(&"skyfall"));
        assert_eq!(names.last(), Some(&"state_changed"));
    }

    #[tokio::test]
    async fn dropped_receiver_still_finishes() {
        let mut orch = water_row();
        let (tx, rx) = unbounded_channel();
        drop(rx);
        resolve_paced(&mut orch, &PacingConfig::zero(), &tx).await;
        assert!(!orch.is_resolving());
        assert!(!orch.has_events());
    }
}
