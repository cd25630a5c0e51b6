use std::collections::HashSet;

use log::info;
use serde::{Deserialize, Serialize};

use crate::piece::Cell;

/// Half-width of the square scanned for marker tiles.
pub const BOUNDS_MAX: i32 = 25;

pub trait MarkerSource {
    fn has_marker(&self, cell: Cell) -> bool;
}

impl<F> MarkerSource for F
where
    F: Fn(Cell) -> bool,
{
    fn has_marker(&self, cell: Cell) -> bool {
        self(cell)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MarkerGrid {
    cells: HashSet<Cell>,
}

impl MarkerGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        let mut grid = Self::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                grid.insert(Cell::new(x, y));
            }
        }
        grid
    }

    pub fn insert(&mut self, cell: Cell) {
        self.cells.insert(cell);
    }
}

impl FromIterator<Cell> for MarkerGrid {
    fn from_iter<T: IntoIterator<Item = Cell>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl MarkerSource for MarkerGrid {
    fn has_marker(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Scans `[-radius, radius)` on both axes and returns the smallest
    /// rectangle covering every marked tile, or `None` when nothing is
    /// marked.
    pub fn discover<M: MarkerSource + ?Sized>(markers: &M, radius: i32) -> Option<Bounds> {
        let mut found: Option<Bounds> = None;
        for y in -radius..radius {
            for x in -radius..radius {
                if !markers.has_marker(Cell::new(x, y)) {
                    continue;
                }
                found = Some(match found {
                    None => Bounds::new(x, y, x, y),
                    Some(b) => Bounds::new(b.min_x.min(x), b.min_y.min(y), b.max_x.max(x), b.max_y.max(y)),
                });
            }
        }
        if let Some(b) = found {
            info!(
                "board size = {} x {} ({},{}) -> ({},{})",
                b.width(),
                b.height(),
                b.min_x,
                b.min_y,
                b.max_x,
                b.max_y
            );
        }
        found
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.min_x && cell.x <= self.max_x && cell.y >= self.min_y && cell.y <= self.max_y
    }

    pub fn spawn_point(&self) -> Cell {
        Cell::new((self.min_x + self.max_x) / 2, self.max_y)
    }
}
