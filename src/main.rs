//! Rune board runner (default binary).
//!
//! Serves one game session over the line-delimited JSON protocol, or with
//! `--autoplay` plays the level locally by always taking the hinted move.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use rune_cascade::adapter::{load_level, Adapter, ServerConfig, SessionHost};
use rune_cascade::engine::{GameSession, LevelConfig, SessionEvent};

#[derive(Debug, Parser)]
#[command(name = "rune-cascade", version, about = "Match-3 rune board server")]
struct Args {
    /// Seed for board generation and refills
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// JSON level file; the open practice board when omitted
    #[arg(long)]
    level: Option<PathBuf>,

    /// Bind address (overrides RUNE_AI_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides RUNE_AI_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Play the level locally instead of serving it
    #[arg(long)]
    autoplay: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let level = match &args.level {
        Some(path) => load_level(path).with_context(|| format!("loading {}", path.display()))?,
        None => LevelConfig::default(),
    };
    info!(
        "level {:?}: {} moves, objective {} {}",
        level.name,
        level.moves,
        level.objective.as_str(),
        level.objective.target()
    );
    let session = GameSession::new(level, args.seed);

    if args.autoplay || ServerConfig::is_disabled() {
        autoplay(session);
        return Ok(());
    }

    let mut config = ServerConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    serve(session, config)
}

fn serve(session: GameSession, config: ServerConfig) -> Result<()> {
    let mut adapter = Adapter::start(config)?;
    let mut host = SessionHost::new(session);
    while let Some(inbound) = adapter.recv_blocking() {
        for msg in host.handle(inbound) {
            adapter.send(msg);
        }
    }
    warn!("board server stopped");
    Ok(())
}

/// Consecutive shuffles tried on a board without moves before giving up
const AUTOPLAY_SHUFFLES: u32 = 3;

fn autoplay(mut session: GameSession) {
    let mut shuffles = 0;
    while session.is_playable() {
        let applied = match session.hint() {
            Some(m) => {
                shuffles = 0;
                session.swap(m.from, m.to)
            }
            None if shuffles < AUTOPLAY_SHUFFLES => {
                shuffles += 1;
                session.shuffle_booster()
            }
            None => {
                warn!("no move left after {AUTOPLAY_SHUFFLES} shuffles");
                break;
            }
        };
        match applied {
            Ok(events) => {
                for event in events {
                    if let SessionEvent::LevelEnded(result) = event {
                        println!(
                            "{} with {} points, {} star(s) after {} moves",
                            if result.won { "won" } else { "lost" },
                            result.score,
                            result.stars,
                            session.moves_made()
                        );
                    }
                }
            }
            Err(e) => {
                warn!("autoplay stopped: {e}");
                break;
            }
        }
    }
}
