//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the rune board.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, session control, JSON protocol).
//!
//! # Board Dimensions
//!
//! The board is a fixed 8x8 square addressed by `(row, col)`:
//!
//! - **Rows**: 0 (top) to 7 (bottom), gravity pulls towards row 7
//! - **Columns**: 0 (left) to 7 (right)
//!
//! # Score Balance
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TILE_SCORE` | 10 | Every destroyed tile |
//! | `POWER_UP_BONUS` | 20 | Power-up detonated or created |
//! | `STONE_HIT_SCORE` | 20 | Stone takes one point of damage |
//! | `STONE_BREAK_BONUS` | 40 | Stone reaches zero health |
//! | `OVERLAY_BREAK_SCORE` | 30 | Ice or chains overlay cleared |
//! | `MANUAL_BOMB_BONUS` | 200 | Player swaps a color bomb into a rune |
//! | `POINTS_PER_MOVE` | 150 | Unused move at the end of a won level |
//!
//! # Examples
//!
//! ```
//! use rune_cascade_types::{Pos, PowerUp, RuneType, BOARD_SIZE};
//!
//! // Parse a rune from its wire name (case-insensitive)
//! let rune = RuneType::from_str("fire").unwrap();
//! assert_eq!(rune, RuneType::Fire);
//! assert!(rune.is_color());
//! assert!(!RuneType::Potion.is_color());
//!
//! // Power-ups round-trip through their wire names
//! assert_eq!(PowerUp::from_str("color_bomb"), Some(PowerUp::ColorBomb));
//!
//! // Positions are plain (row, col) pairs
//! let pos = Pos::new(3, 4);
//! assert_eq!(pos.index(), 3 * BOARD_SIZE + 4);
//! ```

/// Board side length in cells (8x8)
pub const BOARD_SIZE: usize = 8;

/// Total number of cells on the board
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Minimum run length that counts as a match
pub const MIN_RUN: usize = 3;

/// Points for every tile in an explosion destroy-set
pub const TILE_SCORE: u32 = 10;

/// Extra points when a power-up is detonated or born
pub const POWER_UP_BONUS: u32 = 20;

/// Points for each damage event on a stone
pub const STONE_HIT_SCORE: u32 = 20;

/// Extra points when a stone breaks into a normal rune
pub const STONE_BREAK_BONUS: u32 = 40;

/// Points for clearing an ice or chains overlay
pub const OVERLAY_BREAK_SCORE: u32 = 30;

/// Flat bonus for a player-initiated color bomb
pub const MANUAL_BOMB_BONUS: u32 = 200;

/// Cascade step gain is `match score * MATCH_SCORE_FACTOR * combo factor`
pub const MATCH_SCORE_FACTOR: u32 = 2;

/// Bonus per unused move when a level is won
pub const POINTS_PER_MOVE: u32 = 150;

/// Starting health of a stone
pub const STONE_HEALTH: u8 = 2;

/// Nominal health of ice and chains overlays (one hit clears them)
pub const OVERLAY_HEALTH: u8 = 1;

/// Hard ceiling on cascade iterations for a single move
pub const MAX_CASCADE_STEPS: u32 = 15;

/// Chance (percent) that an eligible refill slot becomes a potion
pub const POTION_SPAWN_PERCENT: u32 = 25;

/// Potion levels keep this many potions in play
pub const POTIONS_ON_BOARD: usize = 2;

/// NOVA blast radius (Chebyshev distance, 5x5 block)
pub const NOVA_RADIUS: usize = 2;


/// A board coordinate: `row` grows downwards, `col` grows to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Flat row-major index (`row * BOARD_SIZE + col`)
    #[inline]
    pub const fn index(self) -> usize {
        self.row * BOARD_SIZE + self.col
    }

    /// Inverse of [`Pos::index`]
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self {
            row: index / BOARD_SIZE,
            col: index % BOARD_SIZE,
        }
    }

    /// Check if the position lies on the board
    #[inline]
    pub const fn in_bounds(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Offset by a signed delta, `None` when it leaves the board
    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let pos = Self { row, col };
        pos.in_bounds().then_some(pos)
    }

    /// Manhattan distance of exactly one
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

/// The closed set of tile kinds
///
/// Five colors plus two markers:
/// - **Wild**: a tile consumed by a match, waiting to be swept by gravity
/// - **Potion**: the collectible objective item; never matched, never blasted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuneType {
    Fire,
    Water,
    Nature,
    Light,
    Void,
    Wild,
    Potion,
}

impl RuneType {
    /// The five matchable colors, in draw order
    pub const COLORS: [RuneType; 5] = [
        RuneType::Fire,
        RuneType::Water,
        RuneType::Nature,
        RuneType::Light,
        RuneType::Void,
    ];

    pub const ALL: [RuneType; 7] = [
        RuneType::Fire,
        RuneType::Water,
        RuneType::Nature,
        RuneType::Light,
        RuneType::Void,
        RuneType::Wild,
        RuneType::Potion,
    ];

    /// True for the five colors, false for Wild and Potion
    pub fn is_color(self) -> bool {
        !matches!(self, RuneType::Wild | RuneType::Potion)
    }

    /// Parse rune from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fire" => Some(RuneType::Fire),
            "water" => Some(RuneType::Water),
            "nature" => Some(RuneType::Nature),
            "light" => Some(RuneType::Light),
            "void" => Some(RuneType::Void),
            "wild" => Some(RuneType::Wild),
            "potion" => Some(RuneType::Potion),
            _ => None,
        }
    }

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            RuneType::Fire => "fire",
            RuneType::Water => "water",
            RuneType::Nature => "nature",
            RuneType::Light => "light",
            RuneType::Void => "void",
            RuneType::Wild => "wild",
            RuneType::Potion => "potion",
        }
    }

    /// Single-letter pattern code (`F W N L V`, `*` wild, `P` potion)
    pub fn code(&self) -> char {
        match self {
            RuneType::Fire => 'F',
            RuneType::Water => 'W',
            RuneType::Nature => 'N',
            RuneType::Light => 'L',
            RuneType::Void => 'V',
            RuneType::Wild => '*',
            RuneType::Potion => 'P',
        }
    }
}

/// Per-step presentation marker, reset to `Normal` once a cascade settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileStatus {
    #[default]
    Normal,
    Matched,
    Dropping,
    New,
}

impl TileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileStatus::Normal => "normal",
            TileStatus::Matched => "matched",
            TileStatus::Dropping => "dropping",
            TileStatus::New => "new",
        }
    }
}

/// Special ability carried by a tile, detonated when the tile is destroyed
///
/// - **Horizontal**: clears the whole row
/// - **Vertical**: clears the whole column
/// - **ColorBomb**: clears every tile of one color
/// - **Nova**: clears the 5x5 block around the tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerUp {
    #[default]
    None,
    Horizontal,
    Vertical,
    ColorBomb,
    Nova,
}

impl PowerUp {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(PowerUp::None),
            "horizontal" => Some(PowerUp::Horizontal),
            "vertical" => Some(PowerUp::Vertical),
            "color_bomb" | "colorbomb" => Some(PowerUp::ColorBomb),
            "nova" => Some(PowerUp::Nova),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUp::None => "none",
            PowerUp::Horizontal => "horizontal",
            PowerUp::Vertical => "vertical",
            PowerUp::ColorBomb => "color_bomb",
            PowerUp::Nova => "nova",
        }
    }

    pub fn is_some(&self) -> bool {
        !matches!(self, PowerUp::None)
    }
}

/// Board hazards
///
/// - **Stone**: blocking, colorless, multi-hit; damaged only by adjacent clears
/// - **Ice**: overlay on a colored rune, cleared when that rune is destroyed
/// - **Chains**: overlay like ice, and the rune cannot be swapped while chained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Obstacle {
    #[default]
    None,
    Ice,
    Stone,
    Chains,
}

impl Obstacle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Obstacle::None => "none",
            Obstacle::Ice => "ice",
            Obstacle::Stone => "stone",
            Obstacle::Chains => "chains",
        }
    }

    /// Ice and chains sit on top of a normal rune
    pub fn is_overlay(&self) -> bool {
        matches!(self, Obstacle::Ice | Obstacle::Chains)
    }
}
