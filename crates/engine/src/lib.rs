//! Session engine - turns player commands into core board operations
//!
//! - [`swap`]: swap validation and the plain/color-bomb decision
//! - [`cascade`]: the steppable match/gravity loop of one move
//! - [`level`]: level configuration and objectives
//! - [`session`]: moves, score, win/lose, stars, boosters, auto-reshuffle

pub mod cascade;
pub mod level;
pub mod session;
pub mod swap;

pub use rune_cascade_core as core;
pub use rune_cascade_types as types;

pub use cascade::{Cascade, CascadeReport, CascadeStep, PotionPolicy};
pub use level::{LevelConfig, Objective};
pub use session::{GameSession, LevelResult, SessionEvent};
pub use swap::{plan_swap, validate_swap, SwapError, SwapPlan};
