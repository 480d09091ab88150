//! Adapter runtime integration.
//!
//! Bridges the synchronous game loop with the async TCP server: the server
//! pushes [`InboundCommand`]s into a bounded channel, the game loop answers
//! with [`OutboundMessage`]s.

use log::{debug, info};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::engine::{GameSession, SessionEvent};
use crate::protocol::{
    create_ack, create_error, CommandAction, ErrorCode, HintMove, LastEvent,
};
use crate::server::{build_observation, run_server, ServerConfig};
use crate::types::Pos;

/// Command delivered to the game loop
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone)]
pub enum InboundPayload {
    /// A client asked for the current state after its hello
    SnapshotRequest,
    Command(ClientCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Swap { from: Pos, to: Pos },
    Shuffle,
    Bomb,
    Hint,
    /// Start the level over; without a seed the next seed in sequence is used
    Restart { seed: Option<u64> },
}

impl ClientCommand {
    pub fn action(&self) -> CommandAction {
        match self {
            ClientCommand::Swap { .. } => CommandAction::Swap,
            ClientCommand::Shuffle => CommandAction::Shuffle,
            ClientCommand::Bomb => CommandAction::Bomb,
            ClientCommand::Hint => CommandAction::Hint,
            ClientCommand::Restart { .. } => CommandAction::Restart,
        }
    }
}

/// Line to be delivered by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    /// Every handshaken client that asked for observations
    Broadcast { line: String },
}

/// Game-loop side of the protocol: applies commands to the session and
/// produces the replies.
#[derive(Debug)]
pub struct SessionHost {
    session: GameSession,
    obs_seq: u64,
    last_event: Option<LastEvent>,
}

impl SessionHost {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            obs_seq: 0,
            last_event: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Handle one inbound command.
    ///
    /// A command is answered with an ack or an error to its sender, and every
    /// command that changed the session is followed by a broadcast
    /// observation.
    pub fn handle(&mut self, inbound: InboundCommand) -> Vec<OutboundMessage> {
        let mut out = Vec::with_capacity(2);
        let client_id = inbound.client_id;

        let cmd = match inbound.payload {
            InboundPayload::SnapshotRequest => {
                if let Some(line) = self.observation_line() {
                    out.push(OutboundMessage::ToClient { client_id, line });
                }
                return out;
            }
            InboundPayload::Command(cmd) => cmd,
        };

        let action = cmd.action();
        let score_before = self.session.score();
        let applied = match cmd {
            ClientCommand::Swap { from, to } => self.session.swap(from, to).map(Some),
            ClientCommand::Shuffle => self.session.shuffle_booster().map(Some),
            ClientCommand::Bomb => self.session.bomb_booster().map(Some),
            ClientCommand::Hint => Ok(None),
            ClientCommand::Restart { seed } => {
                let seed = seed.unwrap_or_else(|| self.session.seed().wrapping_add(1));
                info!("restarting level {} with seed {seed}", self.session.level().name);
                self.session.restart(seed);
                Ok(Some(Vec::new()))
            }
        };

        match applied {
            Ok(Some(events)) => {
                let gained = self.session.score().saturating_sub(score_before);
                log_events(&events);
                self.last_event = Some(LastEvent::summarize(action, &events, gained));
                push_line(&mut out, client_id, &create_ack(inbound.seq, None));
                if let Some(line) = self.observation_line() {
                    out.push(OutboundMessage::Broadcast { line });
                }
            }
            Ok(None) => {
                let hint = self.session.hint().map(|m| HintMove {
                    from: m.from.into(),
                    to: m.to.into(),
                });
                push_line(&mut out, client_id, &create_ack(inbound.seq, hint));
            }
            Err(e) => {
                debug!("{} rejected: {e}", action.as_str());
                let err = create_error(inbound.seq, ErrorCode::from(e), &e.to_string());
                push_line(&mut out, client_id, &err);
            }
        }
        out
    }

    fn observation_line(&mut self) -> Option<String> {
        self.obs_seq += 1;
        let obs = build_observation(&self.session, self.obs_seq, self.last_event.clone());
        serde_json::to_string(&obs).ok()
    }
}

fn push_line<T: serde::Serialize>(out: &mut Vec<OutboundMessage>, client_id: usize, msg: &T) {
    if let Ok(line) = serde_json::to_string(msg) {
        out.push(OutboundMessage::ToClient { client_id, line });
    }
}

fn log_events(events: &[SessionEvent]) {
    for event in events {
        if let SessionEvent::LevelEnded(result) = event {
            info!(
                "level ended: won={} score={} stars={}",
                result.won, result.score, result.stars
            );
        }
    }
}

/// Running server with its own tokio runtime
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl Adapter {
    /// Start from environment variables; `None` when `RUNE_AI_DISABLED` is set
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        if ServerConfig::is_disabled() {
            info!("board server disabled via RUNE_AI_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let rt = Runtime::new()?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None).await {
                log::error!("board server stopped: {e:#}");
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    /// Block until the next command; `None` once the server has stopped
    pub fn recv_blocking(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.blocking_recv()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }
}
