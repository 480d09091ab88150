use crate::board::Board;
use crate::tile::Tile;
use crate::types::{Obstacle, PowerUp, RuneType, TileStatus, BOARD_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSnapshot {
    pub id: u32,
    pub kind: RuneType,
    pub status: TileStatus,
    pub power_up: PowerUp,
    pub obstacle: Obstacle,
    pub obstacle_health: u8,
    pub is_empty: bool,
}

impl Default for TileSnapshot {
    fn default() -> Self {
        Self {
            id: 0,
            kind: RuneType::Void,
            status: TileStatus::Normal,
            power_up: PowerUp::None,
            obstacle: Obstacle::None,
            obstacle_health: 0,
            is_empty: true,
        }
    }
}

impl From<&Tile> for TileSnapshot {
    fn from(tile: &Tile) -> Self {
        Self {
            id: tile.id.0,
            kind: tile.kind,
            status: tile.status,
            power_up: tile.power_up,
            obstacle: tile.obstacle,
            obstacle_health: tile.obstacle_health,
            is_empty: tile.is_empty,
        }
    }
}

impl TileSnapshot {
    /// Same alphabet as [`Tile::code`]
    pub fn code(&self) -> char {
        if self.is_empty {
            '.'
        } else if self.obstacle == Obstacle::Stone {
            'S'
        } else {
            self.kind.code()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoardSnapshot {
    pub cells: [[TileSnapshot; BOARD_SIZE]; BOARD_SIZE],
    /// FNV-1a over cell codes, power-ups and obstacles
    pub board_hash: u64,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.cells = [[TileSnapshot::default(); BOARD_SIZE]; BOARD_SIZE];
        self.board_hash = 0;
    }

    pub fn row_code(&self, row: usize) -> String {
        self.cells[row].iter().map(TileSnapshot::code).collect()
    }

    pub fn compute_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf29ce484222325;
        for cell in self.cells.iter().flatten() {
            for b in [cell.code() as u8, cell.power_up as u8, cell.obstacle as u8] {
                h ^= b as u64;
                h = h.wrapping_mul(0x100000001b3);
            }
        }
        h
    }
}

impl Board {
    /// Fill `out` in place; no allocation
    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        for tile in self.tiles() {
            out.cells[tile.row][tile.col] = TileSnapshot::from(tile);
        }
        out.board_hash = out.compute_hash();
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}
