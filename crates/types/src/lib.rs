//! Core types module - shared data structures and balance constants
//!
//! This crate defines the vocabulary used by every other crate in the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the rules core, the drivers, and any presentation layer alike.
//!
//! # Board Dimensions
//!
//! The reference ruleset plays on a 5x6 board:
//!
//! - **Rows**: 5 (indexed 0-4, row 0 is the visual top)
//! - **Cols**: 6 (indexed 0-5, left to right)
//!
//! # Echo Tiers
//!
//! | Tier | Chain length | AP cost | Gauge gain |
//! |------|--------------|---------|------------|
//! | `None` | 0-2 | 0 | 0 |
//! | `Basic` | 3-4 | 1 | 10 |
//! | `Enhanced` | 5-6 | 2 | 20 |
//! | `Ultimate` | 7+ | 3 | 35 |
//!
//! # Combo Bonuses
//!
//! | Combos this turn | Team damage bonus |
//! |------------------|-------------------|
//! | 0-1 | 0% |
//! | 2 | 10% |
//! | 3 | 20% |
//! | 4+ | 30% (and +1 AP next turn) |
//!
//! # Examples
//!
//! ```
//! use orb_echo_types::{ChainTier, GridPos, OrbType, BOARD_COLS, BOARD_ROWS};
//!
//! let orb = OrbType::from_str("water").unwrap();
//! assert_eq!(orb, OrbType::Water);
//! assert!(orb.is_standard());
//!
//! assert!(GridPos::new(0, 0).is_adjacent(GridPos::new(0, 1)));
//! assert!(!GridPos::new(0, 0).is_adjacent(GridPos::new(1, 1)));
//!
//! assert_eq!(ChainTier::Basic.as_str(), "basic");
//! assert_eq!(BOARD_ROWS * BOARD_COLS, 30);
//! ```

use std::fmt;

/// Board height in cells (5 rows)
pub const BOARD_ROWS: u8 = 5;

/// Board width in cells (6 columns)
pub const BOARD_COLS: u8 = 6;

/// Total number of cells on the board
pub const CELL_COUNT: usize = BOARD_ROWS as usize * BOARD_COLS as usize;

/// Minimum chain length for `ChainTier::Basic`
pub const CHAIN_BASIC: usize = 3;

/// Minimum chain length for `ChainTier::Enhanced`
pub const CHAIN_ENHANCED: usize = 5;

/// Minimum chain length for `ChainTier::Ultimate`
pub const CHAIN_ULTIMATE: usize = 7;

/// Minimum connected group size that resolves as a cascade
pub const CASCADE_MIN: usize = CHAIN_BASIC;

/// Action points granted at the start of every player turn (before bonus)
pub const AP_PER_TURN: u32 = 3;

pub const AP_COST_BASIC: u32 = 1;
pub const AP_COST_ENHANCED: u32 = 2;
pub const AP_COST_ULTIMATE: u32 = 3;

/// Combos needed this turn for the first damage bonus step
pub const COMBO_TIER1: u32 = 2;
pub const COMBO_TIER2: u32 = 3;
/// Reaching this many combos also awards bonus AP for the next turn
pub const COMBO_TIER3: u32 = 4;

pub const COMBO_BONUS1: f32 = 0.10;
pub const COMBO_BONUS2: f32 = 0.20;
pub const COMBO_BONUS3: f32 = 0.30;

/// Bonus AP granted next turn once `COMBO_TIER3` is reached
pub const COMBO_TIER3_BONUS_AP: u32 = 1;

/// Every this many combos in a battle earns one skill cooldown reduction
pub const CD_ACCEL_COMBO_THRESHOLD: u32 = 10;

/// Divinity gauge capacity
pub const DIVINITY_GAUGE_MAX: f32 = 100.0;

pub const DIVINITY_PER_BASIC: f32 = 10.0;
pub const DIVINITY_PER_ENHANCED: f32 = 20.0;
pub const DIVINITY_PER_ULTIMATE: f32 = 35.0;

/// Gauge gain for each cascade group resolved after skyfall
pub const DIVINITY_PER_CASCADE: f32 = 5.0;

/// Gauge gain for each hit landed with elemental advantage
pub const DIVINITY_PER_ADVANTAGE_HIT: f32 = 3.0;

/// Gauge gain per 1.0 of max HP lost (`fraction * scale`)
pub const DIVINITY_DAMAGE_TAKEN_SCALE: f32 = 10.0;


/// Orb (token) types on the board
///
/// The first six are the standard elemental orbs that skyfall generates.
/// The rest are special variants placed by boss and environment mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrbType {
    Water,
    Fire,
    Wood,
    Light,
    Dark,
    Heart,
    Locked,
    Poison,
    Unknown,
    Bomb,
    Enhanced,
}

/// Orbs generated by skyfall and random fill
pub const STANDARD_ORBS: [OrbType; 6] = [
    OrbType::Water,
    OrbType::Fire,
    OrbType::Wood,
    OrbType::Light,
    OrbType::Dark,
    OrbType::Heart,
];

/// Every orb variant, in declaration order
pub const ALL_ORBS: [OrbType; 11] = [
    OrbType::Water,
    OrbType::Fire,
    OrbType::Wood,
    OrbType::Light,
    OrbType::Dark,
    OrbType::Heart,
    OrbType::Locked,
    OrbType::Poison,
    OrbType::Unknown,
    OrbType::Bomb,
    OrbType::Enhanced,
];

impl OrbType {
    /// Parse orb type from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use orb_echo_types::OrbType;
    ///
    /// assert_eq!(OrbType::from_str("fire"), Some(OrbType::Fire));
    /// assert_eq!(OrbType::from_str("Bomb"), Some(OrbType::Bomb));
    /// assert_eq!(OrbType::from_str("mud"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "water" => Some(OrbType::Water),
            "fire" => Some(OrbType::Fire),
            "wood" => Some(OrbType::Wood),
            "light" => Some(OrbType::Light),
            "dark" => Some(OrbType::Dark),
            "heart" => Some(OrbType::Heart),
            "locked" => Some(OrbType::Locked),
            "poison" => Some(OrbType::Poison),
            "unknown" => Some(OrbType::Unknown),
            "bomb" => Some(OrbType::Bomb),
            "enhanced" => Some(OrbType::Enhanced),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OrbType::Water => "water",
            OrbType::Fire => "fire",
            OrbType::Wood => "wood",
            OrbType::Light => "light",
            OrbType::Dark => "dark",
            OrbType::Heart => "heart",
            OrbType::Locked => "locked",
            OrbType::Poison => "poison",
            OrbType::Unknown => "unknown",
            OrbType::Bomb => "bomb",
            OrbType::Enhanced => "enhanced",
        }
    }

    /// Single-character symbol used by the board's text form
    pub fn symbol(&self) -> char {
        match self {
            OrbType::Water => 'W',
            OrbType::Fire => 'F',
            OrbType::Wood => 'G',
            OrbType::Light => 'L',
            OrbType::Dark => 'D',
            OrbType::Heart => 'H',
            OrbType::Locked => 'K',
            OrbType::Poison => 'P',
            OrbType::Unknown => '?',
            OrbType::Bomb => 'B',
            OrbType::Enhanced => 'E',
        }
    }

    pub fn is_standard(&self) -> bool {
        STANDARD_ORBS.contains(self)
    }

    /// Combat element this orb feeds into damage calculation.
    ///
    /// Special orbs carry no element of their own and map to `Heart` (neutral).
    pub fn element(&self) -> Element {
        match self {
            OrbType::Water => Element::Water,
            OrbType::Fire => Element::Fire,
            OrbType::Wood => Element::Wood,
            OrbType::Light => Element::Light,
            OrbType::Dark => Element::Dark,
            _ => Element::Heart,
        }
    }
}

impl fmt::Display for OrbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combat elements
///
/// Water > Fire > Wood > Water, Light and Dark beat each other,
/// Heart is recovery only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Water,
    Fire,
    Wood,
    Light,
    Dark,
    Heart,
}

impl Element {
    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Water => "water",
            Element::Fire => "fire",
            Element::Wood => "wood",
            Element::Light => "light",
            Element::Dark => "dark",
            Element::Heart => "heart",
        }
    }
}

/// Echo tier of a submitted chain, classified by length
///
/// Ordered so that a longer chain always compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChainTier {
    /// Fewer than 3 orbs; never submittable
    None,
    /// 3-4 orbs
    Basic,
    /// 5-6 orbs
    Enhanced,
    /// 7 or more orbs
    Ultimate,
}

impl ChainTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainTier::None => "none",
            ChainTier::Basic => "basic",
            ChainTier::Enhanced => "enhanced",
            ChainTier::Ultimate => "ultimate",
        }
    }
}

/// Board orchestrator states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardState {
    /// Waiting for the player to start a chain
    Idle,
    /// Player is connecting same-type orbs
    ChainInput,
    /// Chain accepted; resources have been charged
    Resolving,
    /// Chain orbs are being removed
    Eliminating,
    /// Orbs settle and new orbs fill the gaps
    Skyfall,
    /// Looking for cascade groups after skyfall
    ChainCheck,
}

impl BoardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardState::Idle => "idle",
            BoardState::ChainInput => "chain_input",
            BoardState::Resolving => "resolving",
            BoardState::Eliminating => "eliminating",
            BoardState::Skyfall => "skyfall",
            BoardState::ChainCheck => "chain_check",
        }
    }

    /// Whether chain-building input is accepted in this state
    pub fn accepts_input(&self) -> bool {
        matches!(self, BoardState::Idle | BoardState::ChainInput)
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction orbs settle during skyfall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gravity {
    /// Orbs settle toward the last row (visually down); new orbs enter at row 0
    #[default]
    Normal,
    /// Orbs settle toward row 0; new orbs enter at the last row
    Inverted,
}

impl Gravity {
    pub fn flipped(self) -> Self {
        match self {
            Gravity::Normal => Gravity::Inverted,
            Gravity::Inverted => Gravity::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gravity::Normal => "normal",
            Gravity::Inverted => "inverted",
        }
    }
}

/// A (row, col) board coordinate
///
/// Signed so that input layers can hand over raw, possibly out-of-range
/// coordinates; the board rejects anything outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub row: i8,
    pub col: i8,
}

impl GridPos {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row >= 0 && self.row < BOARD_ROWS as i8 && self.col >= 0 && self.col < BOARD_COLS as i8
    }

    /// Manhattan distance to another position
    pub fn distance(&self, other: GridPos) -> u32 {
        (self.row as i32 - other.row as i32).unsigned_abs()
            + (self.col as i32 - other.col as i32).unsigned_abs()
    }

    /// 4-directional adjacency (Manhattan distance exactly 1)
    pub fn is_adjacent(&self, other: GridPos) -> bool {
        self.distance(other) == 1
    }

    /// Neighbor in the given direction; may be out of bounds
    pub fn offset(&self, d_row: i8, d_col: i8) -> GridPos {
        GridPos::new(self.row.saturating_add(d_row), self.col.saturating_add(d_col))
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

/// Neighbor offsets in search order: up, down, left, right
pub const NEIGHBORS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
