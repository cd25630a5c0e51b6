use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Cell {
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Quarter turn of `self` around `origin` in grid space.
    pub fn rotated_about(self, origin: Cell) -> Cell {
        Cell {
            x: self.y + origin.x - origin.y,
            y: origin.x + origin.y - self.x,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Shape {
    T,
    L,
    Z,
    J,
    S,
    I,
}

impl Shape {
    pub fn all() -> [Shape; 6] {
        [Shape::T, Shape::L, Shape::Z, Shape::J, Shape::S, Shape::I]
    }

    /// Offsets from the spawn point. The first entry is the rotation origin.
    pub fn offsets(self) -> [Cell; 4] {
        match self {
            Shape::T => [
                Cell::new(0, -1),
                Cell::new(1, -1),
                Cell::new(0, 0),
                Cell::new(-1, -1),
            ],
            Shape::L => [
                Cell::new(0, -1),
                Cell::new(1, -1),
                Cell::new(1, 0),
                Cell::new(-1, -1),
            ],
            Shape::Z => [
                Cell::new(0, -1),
                Cell::new(1, -1),
                Cell::new(0, 0),
                Cell::new(-1, 0),
            ],
            Shape::J => [
                Cell::new(0, -1),
                Cell::new(1, -1),
                Cell::new(-1, 0),
                Cell::new(-1, -1),
            ],
            Shape::S => [
                Cell::new(0, -1),
                Cell::new(-1, -1),
                Cell::new(0, 0),
                Cell::new(1, 0),
            ],
            Shape::I => [
                Cell::new(0, 0),
                Cell::new(-1, 0),
                Cell::new(-2, 0),
                Cell::new(1, 0),
            ],
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Shape {
        // all() is never empty
        *Shape::all().choose(rng).unwrap_or(&Shape::T)
    }
}

/// Four cells falling together. `cells[0]` is the rotation origin and never
/// moves when the piece turns.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Piece {
    pub shape: Shape,
    pub cells: [Cell; 4],
}

impl Piece {
    pub fn spawn(shape: Shape, mid_x: i32, max_y: i32) -> Self {
        let cells = shape.offsets().map(|c| c.offset(mid_x, max_y));
        Self { shape, cells }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, mid_x: i32, max_y: i32) -> Self {
        Self::spawn(Shape::random(rng), mid_x, max_y)
    }

    pub fn origin(&self) -> Cell {
        self.cells[0]
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Piece {
        Piece {
            shape: self.shape,
            cells: self.cells.map(|c| c.offset(dx, dy)),
        }
    }

    pub fn rotated(&self) -> Piece {
        let origin = self.origin();
        let mut cells = self.cells;
        for cell in cells.iter_mut().skip(1) {
            *cell = cell.rotated_about(origin);
        }
        Piece {
            shape: self.shape,
            cells,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }
}
