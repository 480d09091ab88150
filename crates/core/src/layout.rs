//! Layout descriptor - the persisted shape of a level
//!
//! A layout is `BOARD_SIZE` strings of `BOARD_SIZE` characters:
//!
//! | Char | Cell |
//! |------|------|
//! | `#` | random colored rune |
//! | `.` | permanent hole |
//! | `S` | stone (health 2) |
//! | `I` | random rune under ice |
//! | `C` | random rune under chains |
//! | `P` | potion |
//!
//! Colors are the only randomness, so `create_board(&l, rng).layout() == l`.

use std::fmt;

use rand::Rng;
use thiserror::Error;

use crate::board::Board;
use crate::rng::random_color;
use crate::tile::Tile;
use crate::types::{Obstacle, Pos, BOARD_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Rune,
    Hole,
    Stone,
    Ice,
    Chains,
    Potion,
}

impl Cell {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Cell::Rune),
            '.' => Some(Cell::Hole),
            'S' => Some(Cell::Stone),
            'I' => Some(Cell::Ice),
            'C' => Some(Cell::Chains),
            'P' => Some(Cell::Potion),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Cell::Rune => '#',
            Cell::Hole => '.',
            Cell::Stone => 'S',
            Cell::Ice => 'I',
            Cell::Chains => 'C',
            Cell::Potion => 'P',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has {0} rows, expected {BOARD_SIZE}")]
    RowCount(usize),
    #[error("layout row {row} has {len} cells, expected {BOARD_SIZE}")]
    RowWidth { row: usize, len: usize },
    #[error("unknown layout character {ch:?} at row {row}, col {col}")]
    UnknownCell { row: usize, col: usize, ch: char },
}

impl LayoutError {
    pub fn code(&self) -> &'static str {
        match self {
            LayoutError::RowCount(_) | LayoutError::RowWidth { .. } => "layout_shape",
            LayoutError::UnknownCell { .. } => "layout_cell",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            cells: [[Cell::Rune; BOARD_SIZE]; BOARD_SIZE],
        }
    }
}

impl Layout {
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        if rows.len() != BOARD_SIZE {
            return Err(LayoutError::RowCount(rows.len()));
        }
        let mut layout = Self::default();
        for (row, text) in rows.iter().enumerate() {
            let text = text.as_ref();
            let len = text.chars().count();
            if len != BOARD_SIZE {
                return Err(LayoutError::RowWidth { row, len });
            }
            for (col, ch) in text.chars().enumerate() {
                layout.cells[row][col] =
                    Cell::from_char(ch).ok_or(LayoutError::UnknownCell { row, col, ch })?;
            }
        }
        Ok(layout)
    }

    pub fn cell(&self, pos: Pos) -> Cell {
        self.cells[pos.row][pos.col]
    }

    pub fn rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.as_char()).collect())
            .collect()
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().flatten().filter(|c| **c == cell).count()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Build the starting board for `layout`
pub fn create_board<R: Rng + ?Sized>(layout: &Layout, rng: &mut R) -> Board {
    Board::from_fn(|pos| match layout.cell(pos) {
        Cell::Rune => Tile::rune(random_color(rng)),
        Cell::Hole => Tile::hole(),
        Cell::Stone => Tile::stone(),
        Cell::Ice => Tile::rune(random_color(rng)).with_overlay(Obstacle::Ice),
        Cell::Chains => Tile::rune(random_color(rng)).with_overlay(Obstacle::Chains),
        Cell::Potion => Tile::potion(),
    })
}

impl Board {
    /// Derive the layout descriptor back from the board structure
    pub fn layout(&self) -> Layout {
        let mut layout = Layout::default();
        for tile in self.tiles() {
            let cell = if tile.is_empty {
                Cell::Hole
            } else if tile.is_stone() {
                Cell::Stone
            } else if tile.obstacle == Obstacle::Ice {
                Cell::Ice
            } else if tile.obstacle == Obstacle::Chains {
                Cell::Chains
            } else if tile.is_potion() {
                Cell::Potion
            } else {
                Cell::Rune
            };
            layout.cells[tile.row][tile.col] = cell;
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::types::STONE_HEALTH;

    const MIXED: [&str; 8] = [
        "..####..", "#PP##PP#", "########", "##SSSS##", "#I####C#", "########", "#......#",
        "########",
    ];

    #[test]
    fn test_layout_round_trip() {
        let layout = Layout::parse(&MIXED).unwrap();
        let board = create_board(&layout, &mut seeded(42));
        assert_eq!(board.layout(), layout);
        assert_eq!(layout.rows(), MIXED);
        board.validate();
    }

    #[test]
    fn test_create_board_cells() {
        let layout = Layout::parse(&MIXED).unwrap();
        let board = create_board(&layout, &mut seeded(1));
        assert!(board.tile(Pos::new(0, 0)).is_empty);
        assert!(board.tile(Pos::new(1, 1)).is_potion());
        let stone = board.tile(Pos::new(3, 2));
        assert!(stone.is_stone());
        assert_eq!(stone.obstacle_health, STONE_HEALTH);
        let ice = board.tile(Pos::new(4, 1));
        assert_eq!(ice.obstacle, Obstacle::Ice);
        assert_eq!(ice.obstacle_health, 1);
        assert!(ice.kind.is_color());
        assert_eq!(board.tile(Pos::new(4, 6)).obstacle, Obstacle::Chains);
    }

    #[test]
    fn test_same_seed_same_board() {
        let layout = Layout::default();
        let a = create_board(&layout, &mut seeded(9));
        let b = create_board(&layout, &mut seeded(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Layout::parse(&["########"; 7]),
            Err(LayoutError::RowCount(7))
        );
        let mut rows = ["########"; 8];
        rows[2] = "#######";
        assert_eq!(
            Layout::parse(&rows),
            Err(LayoutError::RowWidth { row: 2, len: 7 })
        );
        rows[2] = "###X####";
        let err = Layout::parse(&rows).unwrap_err();
        assert_eq!(err, LayoutError::UnknownCell { row: 2, col: 3, ch: 'X' });
        assert_eq!(err.code(), "layout_cell");
    }
}
