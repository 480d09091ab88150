//! Rune Cascade (workspace facade crate).
//!
//! Re-exports `rune_cascade::{types, core, engine, adapter}`; the
//! implementation lives in the crates under `crates/`.

pub use rune_cascade_adapter as adapter;
pub use rune_cascade_core as core;
pub use rune_cascade_engine as engine;
pub use rune_cascade_types as types;
