use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

use crate::bounds::Bounds;
use crate::piece::{Cell, Piece};

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Chunk {
    cells: Vec<Cell>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn insert(&mut self, cell: Cell) -> bool {
        if self.contains(cell) {
            return false;
        }
        self.cells.push(cell);
        true
    }

    pub fn absorb(&mut self, piece: &Piece) {
        for cell in piece.cells {
            self.insert(cell);
        }
    }

    /// Lowest row holding exactly `row_width` cells.
    pub fn killable_row(&self, row_width: i32) -> Option<i32> {
        let mut per_row: BTreeMap<i32, i32> = BTreeMap::new();
        for cell in &self.cells {
            *per_row.entry(cell.y).or_default() += 1;
        }
        per_row
            .into_iter()
            .find(|&(_, count)| count == row_width)
            .map(|(row, _)| row)
    }

    pub fn kill_row(&mut self, row: i32) {
        self.cells.retain(|c| c.y != row);
        for cell in self.cells.iter_mut().filter(|c| c.y > row) {
            cell.y -= 1;
        }
    }
}

impl FromIterator<Cell> for Chunk {
    fn from_iter<T: IntoIterator<Item = Cell>>(iter: T) -> Self {
        let mut chunk = Chunk::new();
        for cell in iter {
            chunk.insert(cell);
        }
        chunk
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gravity {
    Fell,
    Landed,
    Empty,
}

#[derive(Clone, Debug)]
pub struct BoardState {
    pub bounds: Bounds,
    pub chunk: Chunk,
    pub piece: Option<Piece>,
}

impl BoardState {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            chunk: Chunk::new(),
            piece: None,
        }
    }

    pub fn valid_world(&self, cell: Cell) -> bool {
        self.bounds.contains(cell)
    }

    pub fn valid_move(&self, cell: Cell) -> bool {
        self.valid_world(cell) && !self.chunk.contains(cell)
    }

    pub fn valid_piece(&self, piece: &Piece) -> bool {
        piece.cells.iter().all(|&c| self.valid_move(c))
    }

    pub fn shift_piece(&self, piece: &Piece, dx: i32, dy: i32) -> Option<Piece> {
        if piece.cells.iter().any(|c| !self.valid_move(c.offset(dx, dy))) {
            return None;
        }
        Some(piece.translated(dx, dy))
    }

    /// Quarter turn about the origin; an obstructed turn leaves the piece
    /// as it was.
    pub fn rotate_piece(&self, piece: &Piece) -> Piece {
        let rotated = piece.rotated();
        if rotated.cells[1..].iter().all(|&c| self.valid_move(c)) {
            rotated
        } else {
            *piece
        }
    }

    pub fn drop_piece(&self, piece: &Piece) -> Piece {
        let mut resting = *piece;
        while let Some(lower) = self.shift_piece(&resting, 0, -1) {
            resting = lower;
        }
        resting
    }

    pub fn spawn_piece<R: Rng + ?Sized>(&self, rng: &mut R) -> Piece {
        let at = self.bounds.spawn_point();
        Piece::random(rng, at.x, at.y)
    }

    pub fn land(&mut self) {
        if let Some(piece) = self.piece.take() {
            self.chunk.absorb(&piece);
        }
    }

    pub fn apply_gravity(&mut self) -> Gravity {
        let Some(piece) = self.piece else {
            return Gravity::Empty;
        };
        match self.shift_piece(&piece, 0, -1) {
            Some(lower) => {
                self.piece = Some(lower);
                Gravity::Fell
            }
            None => {
                self.land();
                Gravity::Landed
            }
        }
    }

    pub fn clear_row(&mut self) -> Option<i32> {
        let row = self.chunk.killable_row(self.bounds.width())?;
        self.chunk.kill_row(row);
        Some(row)
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.chunk.contains(cell) || self.piece.is_some_and(|p| p.contains(cell))
    }
}
