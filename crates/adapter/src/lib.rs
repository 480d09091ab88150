//! Adapter - remote play over a line-delimited JSON TCP protocol
//!
//! # Protocol Overview
//!
//! 1. **Connection**: client connects (default `127.0.0.1:7788`)
//! 2. **Handshake**: client sends `hello`, server answers `welcome`
//! 3. **Controller**: the first client to hello controls the session; later
//!    clients observe
//! 4. **Commands**: the controller sends `command` messages (`swap`,
//!    `shuffle`, `bomb`, `hint`, `restart`); each is answered with `ack` or
//!    `error`
//! 5. **Observations**: after every applied command all streaming clients
//!    receive an `observation` with the full board and session state
//!
//! Sequence numbers must be strictly increasing per client. When the game
//! loop falls behind, commands beyond `RUNE_AI_MAX_PENDING` are refused with
//! a `backpressure` error.
//!
//! # Environment Variables
//!
//! - `RUNE_AI_HOST`: bind address (default `127.0.0.1`)
//! - `RUNE_AI_PORT`: port (default `7788`)
//! - `RUNE_AI_MAX_PENDING`: command queue depth (default `10`)
//! - `RUNE_AI_DISABLED`: `1` or `true` disables the server
//!
//! # Example
//!
//! ```text
//! -> {"type":"hello","seq":1,"ts":0,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! <- {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! <- {"type":"observation","seq":1,"ts":...,"board":["FWNL...",...],"score":0,"moves_left":20,...}
//! -> {"type":"command","seq":2,"ts":0,"action":"swap","from":{"row":3,"col":4},"to":{"row":3,"col":5}}
//! <- {"type":"ack","seq":2,"ts":...,"status":"ok"}
//! <- {"type":"observation","seq":2,...}
//! ```

pub mod level_file;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use rune_cascade_core as core;
pub use rune_cascade_engine as engine;
pub use rune_cascade_types as types;

pub use level_file::{load_level, parse_level, LevelFile, LevelFileError};
pub use protocol::*;
pub use runtime::{
    Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage, SessionHost,
};
pub use server::{build_observation, run_server, ServerConfig, PROTOCOL_VERSION};
