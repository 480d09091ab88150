//! Core board logic module - pure, deterministic, and testable
//!
//! This crate resolves a rune board: match detection, power-up creation,
//! explosions, obstacle damage, gravity with potion collection, and the
//! "is there any move left" probe. It has **no I/O and no logging**, and
//! every random draw goes through an injected `rand::Rng`, making it:
//!
//! - **Deterministic**: Same seed and same calls produce the same board
//! - **Testable**: Each step is a plain function over a [`Board`]
//! - **Interruptible**: Every public operation leaves the board consistent,
//!   so a caller may stop between any two steps
//!
//! # Module Structure
//!
//! - [`board`] / [`tile`]: 8x8 flat tile arena with stable tile ids
//! - [`layout`]: level descriptor (`# . S I C P`) and board construction
//! - [`traverse`]: shared breadth-first walk
//! - [`matcher`]: run scan, clusters, power-up classification
//! - [`explosion`]: chained power-up blast propagation
//! - [`obstacles`] / [`resolve`]: applying a match to the board
//! - [`gravity`]: compaction, potion collection and refill
//! - [`moves`] / [`shuffle`]: feasibility probe and reshuffle
//! - [`color_bomb`]: player-triggered color bomb
//! - [`scoring`]: combo multiplier, move bonus, stars
//!
//! # Example
//!
//! ```
//! use rune_cascade_core::{apply_gravity, find_matches, handle_matches, rng, Board};
//!
//! let mut board = Board::from_pattern(&[
//!     "WNWNWNWN", "NWNWNWNW", "WNWNWNWN", "NWFFFFFW",
//!     "WNWNWNWN", "NWNWNWNW", "WNWNWNWN", "NWNWNWNW",
//! ]);
//! let mut rng = rng::seeded(7);
//!
//! let outcome = find_matches(&board, &mut rng);
//! assert_eq!(outcome.score, 70); // five tiles plus a color bomb
//!
//! handle_matches(&mut board, &outcome.matches, &outcome.new_power_ups, &mut rng);
//! apply_gravity(&mut board, false, &mut rng, |_| {});
//! board.reset_status();
//! board.validate();
//! ```

pub mod board;
pub mod color_bomb;
pub mod explosion;
pub mod gravity;
pub mod layout;
pub mod matcher;
pub mod moves;
pub mod obstacles;
pub mod resolve;
pub mod rng;
pub mod scoring;
pub mod shuffle;
pub mod snapshot;
pub mod tile;
pub mod traverse;

pub use rune_cascade_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use color_bomb::{trigger_color_bomb, BombOutcome};
pub use explosion::{propagate, Explosion};
pub use gravity::{apply_gravity, GravityOutcome};
pub use layout::{create_board, Layout, LayoutError};
pub use matcher::{find_matches, Cluster, MatchOutcome, PowerUpBirth};
pub use moves::{find_move, has_possible_moves, Move};
pub use obstacles::ObstacleReport;
pub use resolve::handle_matches;
pub use shuffle::shuffle_board;
pub use snapshot::{BoardSnapshot, TileSnapshot};
pub use tile::{Tile, TileId};
