//! Protocol module - JSON message types for the board server
//!
//! Every message carries `type`, `seq` (sender-side sequence number) and
//! `ts` (milliseconds since the epoch). One message per line.

use serde::{Deserialize, Serialize};

use crate::engine::{LevelResult, Objective, SessionEvent, SwapError};
use crate::types::{Obstacle, Pos, PowerUp, RuneType};

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HelloType {
    #[serde(rename = "hello")]
    #[default]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommandType {
    #[serde(rename = "command")]
    #[default]
    Command,
}

/// First message on every connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    pub stream_observations: bool,
}

impl Default for RequestedCapabilities {
    fn default() -> Self {
        Self {
            stream_observations: true,
        }
    }
}

/// Board coordinate on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl From<CellRef> for Pos {
    fn from(value: CellRef) -> Self {
        Pos::new(value.row, value.col)
    }
}

impl From<Pos> for CellRef {
    fn from(value: Pos) -> Self {
        Self {
            row: value.row,
            col: value.col,
        }
    }
}

/// Command message (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub action: CommandAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<CellRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<CellRef>,
    /// Only read by `restart`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandAction {
    Swap,
    Shuffle,
    Bomb,
    Hint,
    Restart,
}

impl CommandAction {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandAction::Swap => "swap",
            CommandAction::Shuffle => "shuffle",
            CommandAction::Bomb => "bomb",
            CommandAction::Hint => "hint",
            CommandAction::Restart => "restart",
        }
    }
}

impl<'de> Deserialize<'de> for CommandAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("swap") {
            Ok(Self::Swap)
        } else if s.eq_ignore_ascii_case("shuffle") {
            Ok(Self::Shuffle)
        } else if s.eq_ignore_ascii_case("bomb") {
            Ok(Self::Bomb)
        } else if s.eq_ignore_ascii_case("hint") {
            Ok(Self::Hint)
        } else if s.eq_ignore_ascii_case("restart") {
            Ok(Self::Restart)
        } else {
            Err(serde::de::Error::custom("unknown action"))
        }
    }
}

impl Serialize for CommandAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    NotController,
    InvalidCommand,
    Backpressure,
    OutOfBounds,
    NotAdjacent,
    EmptyCell,
    Stone,
    Chained,
    NoMatch,
    NotPlayable,
}

impl From<SwapError> for ErrorCode {
    fn from(value: SwapError) -> Self {
        match value {
            SwapError::OutOfBounds => ErrorCode::OutOfBounds,
            SwapError::NotAdjacent => ErrorCode::NotAdjacent,
            SwapError::EmptyCell => ErrorCode::EmptyCell,
            SwapError::Stone => ErrorCode::Stone,
            SwapError::Chained => ErrorCode::Chained,
            SwapError::NoMatch => ErrorCode::NoMatch,
            SwapError::NotPlayable => ErrorCode::NotPlayable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignedRole {
    Controller,
    Observer,
}

/// Response to hello
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
    pub game_id: String,
    pub actions: [CommandAction; 5],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    /// Answer to a `hint` command; absent when the board has no move
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<HintMove>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintMove {
    pub from: CellRef,
    pub to: CellRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Full session state, sent after every applied command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub playable: bool,
    pub seed: u64,
    /// One code string per row, top first
    pub board: Vec<String>,
    pub tiles: Vec<TileView>,
    pub score: u32,
    pub moves_left: u32,
    pub moves_made: u32,
    pub potions_collected: u32,
    pub objective: ObjectiveView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<LastEvent>,
    pub state_hash: StateHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub id: u32,
    pub row: usize,
    pub col: usize,
    pub kind: RuneLower,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_up: Option<PowerUpLower>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obstacle: Option<ObstacleLower>,
    pub obstacle_health: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuneLower {
    Fire,
    Water,
    Nature,
    Light,
    Void,
    Wild,
    Potion,
}

impl From<RuneType> for RuneLower {
    fn from(value: RuneType) -> Self {
        match value {
            RuneType::Fire => Self::Fire,
            RuneType::Water => Self::Water,
            RuneType::Nature => Self::Nature,
            RuneType::Light => Self::Light,
            RuneType::Void => Self::Void,
            RuneType::Wild => Self::Wild,
            RuneType::Potion => Self::Potion,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpLower {
    Horizontal,
    Vertical,
    ColorBomb,
    Nova,
}

impl PowerUpLower {
    pub fn from_power_up(value: PowerUp) -> Option<Self> {
        match value {
            PowerUp::None => None,
            PowerUp::Horizontal => Some(Self::Horizontal),
            PowerUp::Vertical => Some(Self::Vertical),
            PowerUp::ColorBomb => Some(Self::ColorBomb),
            PowerUp::Nova => Some(Self::Nova),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleLower {
    Ice,
    Stone,
    Chains,
}

impl ObstacleLower {
    pub fn from_obstacle(value: Obstacle) -> Option<Self> {
        match value {
            Obstacle::None => None,
            Obstacle::Ice => Some(Self::Ice),
            Obstacle::Stone => Some(Self::Stone),
            Obstacle::Chains => Some(Self::Chains),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveView {
    pub kind: ObjectiveKind,
    pub target: u32,
    pub target_score: u32,
    pub stars: [u32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    Score,
    CollectPotions,
}

impl From<Objective> for ObjectiveView {
    fn from(value: Objective) -> Self {
        let kind = match value {
            Objective::Score { .. } => ObjectiveKind::Score,
            Objective::CollectPotions { .. } => ObjectiveKind::CollectPotions,
        };
        Self {
            kind,
            target: value.target(),
            target_score: value.target_score(),
            stars: value.star_thresholds(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultView {
    pub won: bool,
    pub score: u32,
    pub stars: u8,
}

impl From<LevelResult> for ResultView {
    fn from(value: LevelResult) -> Self {
        Self {
            won: value.won,
            score: value.score,
            stars: value.stars,
        }
    }
}

/// Summary of the last applied command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEvent {
    pub action: CommandAction,
    pub score_gained: u32,
    /// Highest combo multiplier step reached during the cascade
    pub max_combo: u32,
    pub tiles_cleared: u32,
    pub power_ups_created: u32,
    pub potions_collected: u32,
    pub reshuffled: bool,
    pub truncated: bool,
    /// Event names in the order they happened
    pub events: Vec<String>,
}

impl LastEvent {
    pub fn summarize(action: CommandAction, events: &[SessionEvent], score_gained: u32) -> Self {
        let mut out = Self {
            action,
            score_gained,
            max_combo: 0,
            tiles_cleared: 0,
            power_ups_created: 0,
            potions_collected: 0,
            reshuffled: false,
            truncated: false,
            events: Vec::with_capacity(events.len()),
        };
        for event in events {
            match event {
                SessionEvent::Matched { combo, tiles, .. } => {
                    out.max_combo = out.max_combo.max(*combo);
                    out.tiles_cleared += *tiles as u32;
                }
                SessionEvent::ColorBombFired { cleared, .. } => out.tiles_cleared += cleared,
                SessionEvent::PowerUpCreated { .. } => out.power_ups_created += 1,
                SessionEvent::PotionCollected { .. } => out.potions_collected += 1,
                SessionEvent::Reshuffled { .. } => out.reshuffled = true,
                SessionEvent::CascadeTruncated => out.truncated = true,
                _ => {}
            }
            out.events.push(event.name().to_string());
        }
        out
    }
}

/// Deterministic state hash serialized as 16 lowercase hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid hex"))
    }
}

// ============== Message Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Parse one inbound line.
///
/// A well-formed message of an unrecognised `type` is not a parse error; it
/// comes back as [`ParsedMessage::Unknown`] so the server can answer it.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Envelope<'a> {
                #[serde(rename = "type", borrow)]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            match envelope.msg_type {
                Some("hello") | Some("command") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: envelope.seq.unwrap_or(0),
                })),
            }
        }
    }
}

// ============== Utility Functions ==============

pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
        requested: RequestedCapabilities::default(),
    }
}

pub fn create_command(seq: u64, action: CommandAction) -> CommandMessage {
    CommandMessage {
        msg_type: CommandType::Command,
        seq,
        ts: current_timestamp_ms(),
        action,
        from: None,
        to: None,
        seed: None,
    }
}

pub fn create_swap(seq: u64, from: Pos, to: Pos) -> CommandMessage {
    CommandMessage {
        from: Some(from.into()),
        to: Some(to.into()),
        ..create_command(seq, CommandAction::Swap)
    }
}

pub fn create_welcome(
    seq: u64,
    protocol_version: &str,
    client_id: u64,
    role: AssignedRole,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id,
        role,
        game_id: "rune-cascade".to_string(),
        actions: [
            CommandAction::Swap,
            CommandAction::Shuffle,
            CommandAction::Bomb,
            CommandAction::Hint,
            CommandAction::Restart,
        ],
    }
}

pub fn create_ack(seq: u64, hint: Option<HintMove>) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
        hint,
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"ts":1700000000000,"client":{"name":"bot","version":"0.1.0"},"protocol_version":"1.0.0","requested":{"stream_observations":false}}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "bot");
                assert!(!msg.requested.stream_observations);
            }
            other => panic!("expected hello, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_swap_command() {
        let json = r#"{"type":"command","seq":2,"ts":0,"action":"SWAP","from":{"row":3,"col":4},"to":{"row":3,"col":5}}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Command(cmd) => {
                assert_eq!(cmd.action, CommandAction::Swap);
                assert_eq!(cmd.from.map(Pos::from), Some(Pos::new(3, 4)));
                assert_eq!(cmd.to.map(Pos::from), Some(Pos::new(3, 5)));
                assert_eq!(cmd.seed, None);
            }
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_is_not_a_parse_error() {
        let parsed = parse_message(r#"{"type":"control","seq":9,"action":"claim"}"#).unwrap();
        assert!(matches!(parsed, ParsedMessage::Unknown(UnknownMessage { seq: 9 })));

        assert!(parse_message(r#"{"type":"command","seq":3,"ts":0,"action":"jump"}"#).is_err());
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn test_error_code_wire_names() {
        let err =
            create_error(4, ErrorCode::from(SwapError::NoMatch), "swap does not create a match");
        let v: serde_json::Value = serde_json::to_value(&err).unwrap();
        assert_eq!(v["type"], "error");
        assert_eq!(v["code"], "no_match");
        assert_eq!(
            serde_json::to_value(ErrorCode::HandshakeRequired).unwrap(),
            "handshake_required"
        );
    }

    #[test]
    fn test_state_hash_hex() {
        let json = serde_json::to_string(&StateHash(0xab)).unwrap();
        assert_eq!(json, "\"00000000000000ab\"");
        let back: StateHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StateHash(0xab));
    }

    #[test]
    fn test_last_event_summary() {
        let events = [
            SessionEvent::Swapped { from: Pos::new(0, 0), to: Pos::new(0, 1) },
            SessionEvent::Matched { combo: 1, tiles: 3, gain: 60 },
            SessionEvent::PowerUpCreated { pos: Pos::new(0, 1), kind: PowerUp::Vertical },
            SessionEvent::Matched { combo: 2, tiles: 4, gain: 240 },
            SessionEvent::PotionCollected { pos: Pos::new(7, 2) },
        ];
        let ev = LastEvent::summarize(CommandAction::Swap, &events, 300);
        assert_eq!(ev.max_combo, 2);
        assert_eq!(ev.tiles_cleared, 7);
        assert_eq!(ev.power_ups_created, 1);
        assert_eq!(ev.potions_collected, 1);
        assert!(!ev.reshuffled);
        assert_eq!(ev.events[0], "swapped");
        assert_eq!(ev.events.len(), 5);
    }
}
