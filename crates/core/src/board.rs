//! Board module - the 8x8 rune grid
//!
//! Tiles live in a flat row-major array (`row * BOARD_SIZE + col`); every
//! cell always holds exactly one tile. The board also owns the tile id
//! counter so that fresh tiles never collide with existing ones.

use std::collections::HashSet;

use crate::tile::{Tile, TileId};
use crate::types::{Pos, RuneType, TileStatus, BOARD_SIZE, CELL_COUNT};

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of tiles, row-major order
    tiles: [Tile; CELL_COUNT],
    next_id: u32,
}

impl Board {
    /// Build a board cell by cell. `make` returns the tile template for each
    /// position; ids and coordinates are assigned here.
    pub fn from_fn(mut make: impl FnMut(Pos) -> Tile) -> Self {
        let mut next_id = 1u32;
        let tiles = std::array::from_fn(|index| {
            let pos = Pos::from_index(index);
            let mut tile = make(pos);
            tile.id = TileId(next_id);
            tile.row = pos.row;
            tile.col = pos.col;
            next_id += 1;
            tile
        });
        Self { tiles, next_id }
    }

    /// Deterministic constructor from letter rows.
    ///
    /// `F W N L V` colors, `P` potion, `S` stone, `.` hole. Overlays and
    /// power-ups are added afterwards through [`Board::tile_mut`].
    ///
    /// # Panics
    ///
    /// On anything other than `BOARD_SIZE` rows of `BOARD_SIZE` known letters.
    pub fn from_pattern(rows: &[&str]) -> Self {
        assert_eq!(rows.len(), BOARD_SIZE, "pattern needs {BOARD_SIZE} rows");
        let grid: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();
        for (r, row) in grid.iter().enumerate() {
            assert_eq!(row.len(), BOARD_SIZE, "pattern row {r} has wrong width");
        }
        Self::from_fn(|pos| match grid[pos.row][pos.col] {
            'F' => Tile::rune(RuneType::Fire),
            'W' => Tile::rune(RuneType::Water),
            'N' => Tile::rune(RuneType::Nature),
            'L' => Tile::rune(RuneType::Light),
            'V' => Tile::rune(RuneType::Void),
            'P' => Tile::potion(),
            'S' => Tile::stone(),
            '.' => Tile::hole(),
            other => panic!("unknown pattern letter {other:?} at {pos:?}"),
        })
    }

    /// Letter rows in the `from_pattern` alphabet
    pub fn to_pattern(&self) -> Vec<String> {
        (0..BOARD_SIZE)
            .map(|row| self.row(row).iter().map(Tile::code).collect())
            .collect()
    }

    #[inline(always)]
    fn index(pos: Pos) -> usize {
        assert!(pos.in_bounds(), "position {pos:?} is off the board");
        pos.index()
    }

    /// Tile at `pos`, `None` when out of bounds
    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        pos.in_bounds().then(|| &self.tiles[pos.index()])
    }

    /// Tile at `pos`
    ///
    /// # Panics
    ///
    /// If `pos` is off the board.
    #[inline]
    pub fn tile(&self, pos: Pos) -> &Tile {
        &self.tiles[Self::index(pos)]
    }

    #[inline]
    pub fn tile_mut(&mut self, pos: Pos) -> &mut Tile {
        &mut self.tiles[Self::index(pos)]
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn row(&self, row: usize) -> &[Tile] {
        let start = row * BOARD_SIZE;
        &self.tiles[start..start + BOARD_SIZE]
    }

    /// Hand out the next unused tile id
    pub fn alloc_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place a brand new tile at `pos` with a fresh id and `New` status
    pub fn spawn(&mut self, pos: Pos, mut tile: Tile) {
        tile.id = self.alloc_id();
        tile.row = pos.row;
        tile.col = pos.col;
        tile.status = TileStatus::New;
        *self.tile_mut(pos) = tile;
    }

    /// Place an existing tile record at `pos`, keeping its id
    pub fn put(&mut self, pos: Pos, mut tile: Tile) {
        tile.row = pos.row;
        tile.col = pos.col;
        *self.tile_mut(pos) = tile;
    }

    /// Exchange the two tile records and fix up their coordinates
    pub fn swap(&mut self, a: Pos, b: Pos) {
        let (ia, ib) = (Self::index(a), Self::index(b));
        self.tiles.swap(ia, ib);
        self.tiles[ia].row = a.row;
        self.tiles[ia].col = a.col;
        self.tiles[ib].row = b.row;
        self.tiles[ib].col = b.col;
    }

    /// Clear every transient status back to `Normal`
    pub fn reset_status(&mut self) {
        for tile in &mut self.tiles {
            tile.status = TileStatus::Normal;
        }
    }

    pub fn count_kind(&self, kind: RuneType) -> usize {
        self.tiles
            .iter()
            .filter(|t| !t.is_empty && !t.is_stone() && t.kind == kind)
            .count()
    }

    pub fn potion_count(&self) -> usize {
        self.count_kind(RuneType::Potion)
    }

    /// Positions of tiles satisfying `pred`, row-major
    pub fn positions(&self, mut pred: impl FnMut(&Tile) -> bool) -> Vec<Pos> {
        self.tiles
            .iter()
            .filter(|t| pred(t))
            .map(Tile::pos)
            .collect()
    }

    /// Assert the structural invariants: coordinates agree with storage
    /// and ids are unique.
    ///
    /// # Panics
    ///
    /// On a corrupt board.
    pub fn validate(&self) {
        let mut seen = HashSet::with_capacity(CELL_COUNT);
        for (index, tile) in self.tiles.iter().enumerate() {
            assert_eq!(
                tile.pos(),
                Pos::from_index(index),
                "tile {:?} stored at the wrong cell",
                tile.id
            );
            assert!(seen.insert(tile.id), "duplicate tile id {:?}", tile.id);
            assert!(tile.id.0 < self.next_id, "tile id {:?} never allocated", tile.id);
        }
    }
}
