//! JSON level files
//!
//! ```json
//! {
//!   "name": "stone garden",
//!   "moves": 25,
//!   "objective": "collect_potions",
//!   "target": 4,
//!   "target_score": 2500,
//!   "layout": ["########", "..."]
//! }
//! ```
//!
//! `layout` uses the layout alphabet (`#` rune, `.` hole, `S` stone, `I` ice,
//! `C` chains, `P` potion) with exactly eight rows of eight cells.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Layout, LayoutError};
use crate::engine::{LevelConfig, Objective};

#[derive(Debug, Error)]
pub enum LevelFileError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("level must allow at least one move")]
    NoMoves,
    #[error("objective target must be positive")]
    ZeroTarget,
    #[error("collect_potions levels need a target_score")]
    MissingTargetScore,
}

impl LevelFileError {
    pub fn code(&self) -> &'static str {
        match self {
            LevelFileError::Io(_) => "level_io",
            LevelFileError::Json(_) => "level_json",
            LevelFileError::Layout(e) => e.code(),
            LevelFileError::NoMoves
            | LevelFileError::ZeroTarget
            | LevelFileError::MissingTargetScore => {
                "level_invalid"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveName {
    Score,
    CollectPotions,
}

/// On-disk shape of a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFile {
    pub name: String,
    pub moves: u32,
    pub objective: ObjectiveName,
    pub target: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_score: Option<u32>,
    pub layout: Vec<String>,
}

impl TryFrom<LevelFile> for LevelConfig {
    type Error = LevelFileError;

    fn try_from(file: LevelFile) -> Result<Self, Self::Error> {
        if file.moves == 0 {
            return Err(LevelFileError::NoMoves);
        }
        if file.target == 0 {
            return Err(LevelFileError::ZeroTarget);
        }
        let objective = match file.objective {
            ObjectiveName::Score => Objective::Score {
                target: file.target,
            },
            ObjectiveName::CollectPotions => Objective::CollectPotions {
                target: file.target,
                target_score: file.target_score.ok_or(LevelFileError::MissingTargetScore)?,
            },
        };
        Ok(LevelConfig {
            name: file.name,
            moves: file.moves,
            objective,
            layout: Layout::parse(&file.layout)?,
        })
    }
}

impl From<&LevelConfig> for LevelFile {
    fn from(level: &LevelConfig) -> Self {
        let (objective, target_score) = match level.objective {
            Objective::Score { .. } => (ObjectiveName::Score, None),
            Objective::CollectPotions { target_score, .. } => {
                (ObjectiveName::CollectPotions, Some(target_score))
            }
        };
        Self {
            name: level.name.clone(),
            moves: level.moves,
            objective,
            target: level.objective.target(),
            target_score,
            layout: level.layout.rows(),
        }
    }
}

pub fn parse_level(json: &str) -> Result<LevelConfig, LevelFileError> {
    let file: LevelFile = serde_json::from_str(json)?;
    LevelConfig::try_from(file)
}

pub fn load_level(path: impl AsRef<Path>) -> Result<LevelConfig, LevelFileError> {
    let text = std::fs::read_to_string(path)?;
    parse_level(&text)
}
