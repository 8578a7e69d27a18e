//! JSON records for board events and snapshots.
//!
//! Each record serializes to one self-describing JSON object with a `"type"`
//! tag and lowercase names, suitable for line-delimited output.

use serde::Serialize;

use crate::core::{BoardEvent, BoardSnapshot, OrbMove};
use crate::types::{GridPos, ALL_ORBS};

/// `[row, col]`
pub type PosRecord = [i8; 2];

fn pos(p: GridPos) -> PosRecord {
    [p.row, p.col]
}

fn positions<'a>(ps: impl IntoIterator<Item = &'a GridPos>) -> Vec<PosRecord> {
    ps.into_iter().copied().map(pos).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub from: PosRecord,
    pub to: PosRecord,
}

impl From<OrbMove> for MoveRecord {
    fn from(value: OrbMove) -> Self {
        Self {
            from: pos(value.from),
            to: pos(value.to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventRecord {
    StateChanged {
        state: &'static str,
    },
    ChainCompleted {
        orb: &'static str,
        element: &'static str,
        tier: &'static str,
        ap_cost: u32,
        divinity: f32,
        path: Vec<PosRecord>,
    },
    CascadeResolved {
        orb: &'static str,
        cells: Vec<PosRecord>,
    },
    Skyfall {
        moves: Vec<MoveRecord>,
    },
    ResolutionComplete,
    ApDepleted,
    ApChanged {
        current: u32,
        max: u32,
    },
    GaugeChanged {
        value: f32,
    },
    GaugeReady,
    OrbsLocked {
        positions: Vec<PosRecord>,
    },
    OrbsConverted {
        orb: &'static str,
        positions: Vec<PosRecord>,
    },
    OrbsUnlocked {
        positions: Vec<PosRecord>,
    },
    GravityChanged {
        gravity: &'static str,
    },
}

impl From<&BoardEvent> for EventRecord {
    fn from(value: &BoardEvent) -> Self {
        match value {
            BoardEvent::StateChanged(state) => Self::StateChanged {
                state: state.as_str(),
            },
            BoardEvent::ChainCompleted(chain) => Self::ChainCompleted {
                orb: chain.orb.as_str(),
                element: chain.element.as_str(),
                tier: chain.tier.as_str(),
                ap_cost: chain.ap_cost,
                divinity: chain.divinity,
                path: positions(&chain.path),
            },
            BoardEvent::CascadeResolved(group) => Self::CascadeResolved {
                orb: group.orb.as_str(),
                cells: positions(&group.cells),
            },
            BoardEvent::Skyfall { moves } => Self::Skyfall {
                moves: moves.iter().copied().map(MoveRecord::from).collect(),
            },
            BoardEvent::ResolutionComplete => Self::ResolutionComplete,
            BoardEvent::ApDepleted => Self::ApDepleted,
            BoardEvent::ApChanged { current, max } => Self::ApChanged {
                current: *current,
                max: *max,
            },
            BoardEvent::GaugeChanged(value) => Self::GaugeChanged { value: *value },
            BoardEvent::GaugeReady => Self::GaugeReady,
            BoardEvent::OrbsLocked(ps) => Self::OrbsLocked {
                positions: positions(ps),
            },
            BoardEvent::OrbsConverted { orb, positions: ps } => Self::OrbsConverted {
                orb: orb.as_str(),
                positions: positions(ps),
            },
            BoardEvent::OrbsUnlocked(ps) => Self::OrbsUnlocked {
                positions: positions(ps),
            },
            BoardEvent::GravityChanged(gravity) => Self::GravityChanged {
                gravity: gravity.as_str(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SnapshotType {
    #[default]
    #[serde(rename = "snapshot")]
    Snapshot,
}

/// Final board state in the same line format as events
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRecord {
    #[serde(rename = "type")]
    pub msg_type: SnapshotType,
    /// One string per row, orb symbols with `.` for empty
    pub board: Vec<String>,
    pub locks: [[u8; 6]; 5],
    pub board_hash: String,
    pub gravity: &'static str,
    pub state: &'static str,
    pub ap: u32,
    pub ap_max: u32,
    pub combo: u32,
    pub combo_total: u32,
    pub gauge: f32,
}

impl From<&BoardSnapshot> for SnapshotRecord {
    fn from(value: &BoardSnapshot) -> Self {
        let board: Vec<String> = value
            .orbs
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&code| match code {
                        0 => '.',
                        n => ALL_ORBS
                            .get(n as usize - 1)
                            .map_or('?', |orb| orb.symbol()),
                    })
                    .collect::<String>()
            })
            .collect();

        Self {
            msg_type: SnapshotType::Snapshot,
            board,
            locks: value.locks,
            board_hash: format!("{:016x}", value.board_hash),
            gravity: value.gravity.as_str(),
            state: value.state.as_str(),
            ap: value.ap,
            ap_max: value.ap_max,
            combo: value.combo,
            combo_total: value.combo_total,
            gauge: value.gauge,
        }
    }
}

/// Serialize an event as one JSON line (no trailing newline)
pub fn event_line(event: &BoardEvent) -> serde_json::Result<String> {
    serde_json::to_string(&EventRecord::from(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChainResult;
    use crate::types::{BoardState, OrbType};

    #[test]
    fn unit_events_carry_only_the_tag() {
        let line = event_line(&BoardEvent::ApDepleted).unwrap();
        assert_eq!(line, r#"{"type":"ap_depleted"}"#);
    }

    #[test]
    fn state_changed_uses_snake_case_state() {
        let line = event_line(&BoardEvent::StateChanged(BoardState::ChainCheck)).unwrap();
        assert_eq!(line, r#"{"type":"state_changed","state":"chain_check"}"#);
    }

    #[test]
    fn chain_completed_carries_stats() {
        let path = (0..3).map(|c| GridPos::new(0, c)).collect();
        let event = BoardEvent::ChainCompleted(ChainResult::new(OrbType::Water, path));
        let v: serde_json::Value = serde_json::from_str(&event_line(&event).unwrap()).unwrap();
        assert_eq!(v["type"], "chain_completed");
        assert_eq!(v["tier"], "basic");
        assert_eq!(v["ap_cost"], 1);
        assert_eq!(v["path"][2], serde_json::json!([0, 2]));
    }

    #[test]
    fn snapshot_record_renders_rows() {
        let mut snap = BoardSnapshot::default();
        snap.orbs[0][0] = OrbType::Fire as u8 + 1;
        let record = SnapshotRecord::from(&snap);
        assert_eq!(record.board[0], "F.....");
        assert_eq!(record.board.len(), 5);
        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["type"], "snapshot");
        assert_eq!(v["state"], "idle");
    }
}
