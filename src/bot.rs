use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{BoardState, Chunk};
use crate::bounds::Bounds;
use crate::piece::{Cell, Piece};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct HeuristicWeights {
    pub hole: i32,
    pub hole_stack: i32,
    pub line_clear: i32,
    pub max_chained_clears: u32,
    pub drop_candidates: bool,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            hole: 4,
            hole_stack: 2,
            line_clear: 10_000,
            max_chained_clears: 4,
            drop_candidates: true,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct BotConfig {
    pub search_shift: i32,
    pub weights: HeuristicWeights,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            search_shift: 4,
            weights: HeuristicWeights::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackProfile {
    pub height: i32,
    pub counts: Vec<i32>,
    pub tops: Vec<i32>,
}

impl StackProfile {
    pub fn of(cells: &[Cell], bounds: &Bounds) -> Self {
        let width = bounds.width().max(0) as usize;
        let mut counts = vec![0; width];
        let mut tops = vec![0; width];
        for cell in cells {
            let col = cell.x - bounds.min_x;
            if col < 0 || col as usize >= width {
                continue;
            }
            let col = col as usize;
            counts[col] += 1;
            tops[col] = tops[col].max(cell.y - bounds.min_y + 1);
        }
        let height = tops.iter().copied().max().unwrap_or(0);
        Self {
            height,
            counts,
            tops,
        }
    }

    /// A column is holed when it has fewer blocks than its top row.
    pub fn holed(&self, col: usize) -> bool {
        self.counts[col] < self.tops[col]
    }

    pub fn holes(&self) -> i32 {
        (0..self.counts.len()).filter(|&c| self.holed(c)).count() as i32
    }
}

pub fn evaluate_placement(board: &BoardState, piece: &Piece, weights: &HeuristicWeights) -> i32 {
    let before = StackProfile::of(board.chunk.cells(), &board.bounds);

    let landed = if weights.drop_candidates {
        board.drop_piece(piece)
    } else {
        *piece
    };
    let mut combined = board.chunk.clone();
    combined.absorb(&landed);
    let after = StackProfile::of(combined.cells(), &board.bounds);

    let on_top_of_hole: i32 = (0..before.counts.len())
        .filter(|&c| before.holed(c))
        .map(|c| after.tops[c] - before.tops[c])
        .sum();

    let rows_cleared = clear_chain(&mut combined, board.bounds.width(), weights.max_chained_clears);
    if rows_cleared > 0 {
        return weights.line_clear;
    }

    let mut score = 0;
    let new_holes = after.holes() - before.holes();
    if new_holes > 0 {
        score -= weights.hole * new_holes;
    }
    if on_top_of_hole > 0 {
        score -= weights.hole_stack * on_top_of_hole;
    }
    if before.height > after.height {
        score -= after.height - before.height;
    }
    score + rows_cleared
}

fn clear_chain(chunk: &mut Chunk, width: i32, limit: u32) -> i32 {
    let mut cleared = 0;
    for _ in 0..limit {
        let Some(row) = chunk.killable_row(width) else {
            break;
        };
        chunk.kill_row(row);
        cleared += 1;
    }
    cleared
}

pub fn candidate_placements(board: &BoardState, piece: &Piece, search_shift: i32) -> Vec<Piece> {
    let mut candidates = Vec::new();
    let mut oriented = *piece;
    for turn in 0..4 {
        if turn > 0 {
            oriented = board.rotate_piece(&oriented);
        }
        for dx in -search_shift..=search_shift {
            let shifted = if dx == 0 {
                Some(oriented)
            } else {
                board.shift_piece(&oriented, dx, 0)
            };
            if let Some(candidate) = shifted.filter(|p| board.valid_piece(p)) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

pub fn choose_placement<R: Rng + ?Sized>(
    board: &BoardState,
    piece: &Piece,
    config: &BotConfig,
    rng: &mut R,
) -> Piece {
    let candidates = candidate_placements(board, piece, config.search_shift);
    if candidates.is_empty() {
        debug!("[bot] no valid placement, keeping piece");
        return *piece;
    }

    let scored: Vec<(Piece, i32)> = candidates
        .into_iter()
        .map(|p| {
            let score = evaluate_placement(board, &p, &config.weights);
            (p, score)
        })
        .collect();
    let best = scored.iter().map(|&(_, s)| s).max().unwrap_or(i32::MIN);
    let ties: Vec<Piece> = scored
        .iter()
        .filter(|&&(_, s)| s == best)
        .map(|&(p, _)| p)
        .collect();
    debug!(
        "[bot] {} candidates, best score {}, {} tied",
        scored.len(),
        best,
        ties.len()
    );
    ties[rng.gen_range(0..ties.len())]
}
