//! TCP server for remote play
//!
//! Accepts any number of clients. The first client to complete the hello
//! handshake becomes the controller; everyone else observes. Commands go to
//! the game loop through a bounded channel so a slow game loop answers with
//! `backpressure` instead of buffering without limit.

use std::hash::Hasher;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::engine::GameSession;
use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use crate::types::BOARD_SIZE;

pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Stable 64-bit FNV-1a hasher for `state_hash`.
///
/// `DefaultHasher` output is not guaranteed stable across Rust releases.
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    rest[..end].parse::<u64>().ok()
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7788,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: 10,
        }
    }
}

impl ServerConfig {
    /// `RUNE_AI_HOST`, `RUNE_AI_PORT`, `RUNE_AI_MAX_PENDING`; unset or
    /// unparsable values fall back to the defaults
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("RUNE_AI_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("RUNE_AI_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = env::var("RUNE_AI_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            max_pending_commands,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    /// `RUNE_AI_DISABLED=1` (or `true`) turns the server off
    pub fn is_disabled() -> bool {
        std::env::var("RUNE_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// Handle to a connected client
#[derive(Debug)]
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub is_controller: bool,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<String>,
}

/// Shared server state
#[derive(Debug)]
pub struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
        }
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    async fn is_controller(&self, client_id: usize) -> bool {
        *self.controller.read().await == Some(client_id)
    }

    /// Record `seq` if it is strictly greater than the last one seen
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return false;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn deliver(&self, msg: OutboundMessage) {
        let clients = self.clients.read().await;
        match msg {
            OutboundMessage::ToClient { client_id, line } => {
                if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                    let _ = c.tx.send(line);
                }
            }
            OutboundMessage::Broadcast { line } => {
                for c in clients.iter().filter(|c| c.handshaken && c.stream_observations) {
                    let _ = c.tx.send(line.clone());
                }
            }
        }
    }
}

fn encode<T: serde::Serialize>(msg: &T) -> Option<String> {
    match serde_json::to_string(msg) {
        Ok(line) => Some(line),
        Err(e) => {
            warn!("failed to encode outbound message: {e}");
            None
        }
    }
}

fn send_error(tx: &mpsc::UnboundedSender<String>, seq: u64, code: ErrorCode, message: &str) {
    if let Some(line) = encode(&create_error(seq, code, message)) {
        let _ = tx.send(line);
    }
}

/// Start the TCP server.
///
/// `ready_tx` receives the bound address, which is how callers binding port
/// 0 learn the real port.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let bound = listener.local_addr()?;
    info!("board server listening on {bound}");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config));

    // Outbound dispatcher
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                state.deliver(msg).await;
            }
        });
    }

    let mut client_id_counter = 0usize;
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!("client {client_id} connected from {addr}");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) =
                handle_client(socket, addr, client_id, Arc::clone(&state), command_tx).await
            {
                warn!("client {client_id} error: {e:#}");
            }
            disconnect(&state, client_id).await;
            info!("client {client_id} disconnected");
        });
    }
}

async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    state.clients.write().await.push(ClientHandle {
        id: client_id,
        addr,
        is_controller: false,
        stream_observations: false,
        handshaken: false,
        last_seq: None,
        tx: tx.clone(),
    });

    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err()
                || writer.write_all(b"\n").await.is_err()
                || writer.flush().await.is_err()
            {
                break;
            }
        }
    });

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!("client {client_id} <- {trimmed}");

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, hello.seq).await
                {
                    send_error(
                        &tx,
                        hello.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }

                let major = state.config.protocol_version.split('.').next().unwrap_or("");
                if hello.protocol_version.split('.').next() != Some(major) {
                    warn!(
                        "client {client_id} speaks protocol {}, closing",
                        hello.protocol_version
                    );
                    send_error(
                        &tx,
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }

                let role = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    let became_controller = controller.is_none();
                    if became_controller {
                        *controller = Some(client_id);
                    }
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.stream_observations = hello.requested.stream_observations;
                        client.is_controller |= became_controller;
                    }
                    if *controller == Some(client_id) {
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    }
                };
                info!(
                    "client {client_id} ({}) joined as {role:?}",
                    hello.client.name
                );

                let welcome = create_welcome(
                    hello.seq,
                    &state.config.protocol_version,
                    client_id as u64,
                    role,
                );
                if let Some(line) = encode(&welcome) {
                    let _ = tx.send(line);
                }

                if hello.requested.stream_observations {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::SnapshotRequest,
                    });
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !state.is_handshaken(client_id).await {
                    send_error(
                        &tx,
                        cmd.seq,
                        ErrorCode::HandshakeRequired,
                        "send hello before command",
                    );
                    continue;
                }
                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    send_error(
                        &tx,
                        cmd.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }
                if !state.is_controller(client_id).await {
                    send_error(
                        &tx,
                        cmd.seq,
                        ErrorCode::NotController,
                        "only the controller may send commands",
                    );
                    continue;
                }

                let mapped = match map_command(&cmd) {
                    Ok(c) => c,
                    Err(message) => {
                        send_error(&tx, cmd.seq, ErrorCode::InvalidCommand, &message);
                        continue;
                    }
                };

                // The game loop acks once the command is applied
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Command(mapped),
                    })
                    .is_err()
                {
                    warn!("client {client_id} command {} dropped: queue full", cmd.seq);
                    send_error(&tx, cmd.seq, ErrorCode::Backpressure, "command queue is full");
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, unknown.seq).await
                {
                    send_error(
                        &tx,
                        unknown.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }
                send_error(&tx, unknown.seq, ErrorCode::InvalidCommand, "unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                warn!("client {client_id} sent malformed message: {e}");
                send_error(&tx, seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {e}"));
            }
        }
    }

    drop(tx);
    // The client entry still holds a sender; removing it lets the writer finish
    disconnect(&state, client_id).await;
    let _ = write_task.await;
    Ok(())
}

/// Remove a client; a departing controller hands over to the oldest
/// handshaken client.
async fn disconnect(state: &ServerState, client_id: usize) {
    let mut controller = state.controller.write().await;
    let mut clients = state.clients.write().await;
    let before = clients.len();
    clients.retain(|c| c.id != client_id);
    if clients.len() == before || *controller != Some(client_id) {
        return;
    }

    *controller = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
    match *controller {
        Some(next) => {
            if let Some(c) = clients.iter_mut().find(|c| c.id == next) {
                c.is_controller = true;
            }
            info!("client {next} promoted to controller");
        }
        None => info!("controller {client_id} released"),
    }
}

/// Map a protocol command into a game command
fn map_command(cmd: &CommandMessage) -> Result<ClientCommand, String> {
    match cmd.action {
        CommandAction::Swap => match (cmd.from, cmd.to) {
            (Some(from), Some(to)) => Ok(ClientCommand::Swap {
                from: from.into(),
                to: to.into(),
            }),
            _ => Err("swap needs both from and to".to_string()),
        },
        CommandAction::Shuffle => Ok(ClientCommand::Shuffle),
        CommandAction::Bomb => Ok(ClientCommand::Bomb),
        CommandAction::Hint => Ok(ClientCommand::Hint),
        CommandAction::Restart => Ok(ClientCommand::Restart { seed: cmd.seed }),
    }
}

/// Build the observation for the current session state
pub fn build_observation(
    session: &GameSession,
    seq: u64,
    last_event: Option<LastEvent>,
) -> ObservationMessage {
    let snapshot = session.board().snapshot();
    let board = (0..BOARD_SIZE).map(|row| snapshot.row_code(row)).collect();
    let tiles = session
        .board()
        .tiles()
        .iter()
        .filter(|t| !t.is_empty)
        .map(|t| TileView {
            id: t.id.0,
            row: t.row,
            col: t.col,
            kind: RuneLower::from(t.kind),
            power_up: PowerUpLower::from_power_up(t.power_up),
            obstacle: ObstacleLower::from_obstacle(t.obstacle),
            obstacle_health: t.obstacle_health,
        })
        .collect();

    let result = session.result();
    let mut hasher = Fnv1aHasher::new();
    hasher.write_u64(snapshot.board_hash);
    hasher.write_u64(session.seed());
    hasher.write_u32(session.score());
    hasher.write_u32(session.moves_left());
    hasher.write_u32(session.moves_made());
    hasher.write_u32(session.potions_collected());
    match result {
        Some(r) => {
            hasher.write_u8(if r.won { 2 } else { 1 });
            hasher.write_u8(r.stars);
        }
        None => hasher.write_u8(0),
    }

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        playable: session.is_playable(),
        seed: session.seed(),
        board,
        tiles,
        score: session.score(),
        moves_left: session.moves_left(),
        moves_made: session.moves_made(),
        potions_collected: session.potions_collected(),
        objective: ObjectiveView::from(session.level().objective),
        result: result.map(ResultView::from),
        last_event,
        state_hash: StateHash(hasher.finish()),
    }
}
