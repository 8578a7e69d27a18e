//! Cell module - a single slot on the orb board
//!
//! A cell's position never changes after creation. Its contents (orb type and
//! status flags) are mutated in place by elimination, skyfall, locks and
//! chain selection.

use std::fmt;

use crate::types::{Element, GridPos, OrbType};

/// One cell of the board grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbCell {
    pos: GridPos,
    orb: OrbType,
    empty: bool,
    locked: bool,
    selected: bool,
    lock_turns: u8,
}

impl OrbCell {
    /// Create a filled, unlocked, unselected cell
    pub fn new(pos: GridPos, orb: OrbType) -> Self {
        Self {
            pos,
            orb,
            empty: false,
            locked: false,
            selected: false,
            lock_turns: 0,
        }
    }

    /// Create an empty cell waiting for skyfall
    pub fn empty(pos: GridPos) -> Self {
        Self {
            empty: true,
            ..Self::new(pos, OrbType::Water)
        }
    }

    pub fn pos(&self) -> GridPos {
        self.pos
    }

    pub fn row(&self) -> i8 {
        self.pos.row
    }

    pub fn col(&self) -> i8 {
        self.pos.col
    }

    /// Orb type. Meaningless while the cell is empty.
    pub fn orb(&self) -> OrbType {
        self.orb
    }

    pub fn element(&self) -> Element {
        self.orb.element()
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Turns left before the lock expires; 0 when unlocked
    pub fn lock_turns_remaining(&self) -> u8 {
        self.lock_turns
    }

    /// A cell can join a chain if it holds an orb, is not locked and is not
    /// already part of the chain being built.
    pub fn can_be_chained(&self) -> bool {
        !self.empty && !self.locked && !self.selected
    }

    pub fn is_adjacent_to(&self, other: &OrbCell) -> bool {
        self.pos.is_adjacent(other.pos)
    }

    /// Remove the orb. Lock and selection go with it.
    pub(crate) fn clear(&mut self) {
        self.empty = true;
        self.selected = false;
        self.locked = false;
        self.lock_turns = 0;
    }

    /// Drop a fresh orb into this cell
    pub(crate) fn fill(&mut self, orb: OrbType) {
        self.orb = orb;
        self.empty = false;
        self.selected = false;
        self.locked = false;
        self.lock_turns = 0;
    }

    /// Take over another cell's orb along with its lock state
    pub(crate) fn receive(&mut self, src: &OrbCell) {
        self.orb = src.orb;
        self.empty = src.empty;
        self.locked = src.locked;
        self.lock_turns = src.lock_turns;
        self.selected = false;
    }

    pub(crate) fn set_orb(&mut self, orb: OrbType) {
        self.orb = orb;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn lock(&mut self, turns: u8) {
        self.locked = true;
        self.lock_turns = turns;
    }

    /// Count down one turn of lock. Returns true if the lock just expired.
    pub(crate) fn tick_lock(&mut self) -> bool {
        if !self.locked {
            return false;
        }
        self.lock_turns = self.lock_turns.saturating_sub(1);
        if self.lock_turns == 0 {
            self.locked = false;
            return true;
        }
        false
    }
}

impl fmt::Display for OrbCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.locked {
            "#"
        } else if self.empty {
            "."
        } else if self.selected {
            "*"
        } else {
            ""
        };
        write!(f, "[{},{}:{}{}]", self.pos.row, self.pos.col, self.orb, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cell_is_chainable() {
        let cell = OrbCell::new(GridPos::new(1, 2), OrbType::Fire);
        assert!(cell.can_be_chained());
        assert_eq!(cell.row(), 1);
        assert_eq!(cell.col(), 2);
        assert_eq!(cell.element(), Element::Fire);
    }

    #[test]
    fn empty_locked_and_selected_cells_are_not_chainable() {
        let mut cell = OrbCell::new(GridPos::new(0, 0), OrbType::Water);
        cell.set_selected(true);
        assert!(!cell.can_be_chained());

        let mut cell = OrbCell::new(GridPos::new(0, 0), OrbType::Water);
        cell.lock(2);
        assert!(!cell.can_be_chained());

        assert!(!OrbCell::empty(GridPos::new(0, 0)).can_be_chained());
    }

    #[test]
    fn lock_expires_after_its_turns() {
        let mut cell = OrbCell::new(GridPos::new(0, 0), OrbType::Dark);
        cell.lock(2);
        assert!(!cell.tick_lock());
        assert!(cell.is_locked());
        assert_eq!(cell.lock_turns_remaining(), 1);
        assert!(cell.tick_lock());
        assert!(!cell.is_locked());
        assert_eq!(cell.lock_turns_remaining(), 0);
        // Unlocked cells never report an expiry.
        assert!(!cell.tick_lock());
    }

    #[test]
    fn zero_turn_lock_expires_on_first_tick() {
        let mut cell = OrbCell::new(GridPos::new(0, 0), OrbType::Dark);
        cell.lock(0);
        assert!(cell.is_locked());
        assert!(cell.tick_lock());
    }

    #[test]
    fn clear_drops_lock_and_selection() {
        let mut cell = OrbCell::new(GridPos::new(3, 3), OrbType::Heart);
        cell.lock(3);
        cell.set_selected(true);
        cell.clear();
        assert!(cell.is_empty());
        assert!(!cell.is_locked());
        assert!(!cell.is_selected());

        cell.fill(OrbType::Light);
        assert!(cell.can_be_chained());
        assert_eq!(cell.orb(), OrbType::Light);
    }

    #[test]
    fn display_marks_status() {
        let mut cell = OrbCell::new(GridPos::new(0, 1), OrbType::Wood);
        assert_eq!(cell.to_string(), "[0,1:wood]");
        cell.lock(1);
        assert_eq!(cell.to_string(), "[0,1:wood#]");
    }
}
