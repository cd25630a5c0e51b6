use std::fmt;

use log::{debug, error, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{BoardState, Gravity};
use crate::bot::choose_placement;
use crate::bounds::{Bounds, MarkerSource};
use crate::error::DuelError;
use crate::piece::Cell;
use crate::settings::GameSettings;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Side {
    Player,
    Opponent,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Opponent => f.write_str("opponent"),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Outcome {
    Running,
    ToppedOut(Side),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Waiting,
    Advanced {
        player_cleared: Option<i32>,
        opponent_cleared: Option<i32>,
    },
    Halted,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct BoardView {
    pub bounds: Bounds,
    pub landed: Vec<Cell>,
    pub falling: Vec<Cell>,
}

impl BoardView {
    fn of(board: &BoardState) -> Self {
        Self {
            bounds: board.bounds,
            landed: board.chunk.cells().to_vec(),
            falling: board.piece.map(|p| p.cells.to_vec()).unwrap_or_default(),
        }
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (self.bounds.min_y..=self.bounds.max_y).rev() {
            for x in self.bounds.min_x..=self.bounds.max_x {
                let cell = Cell::new(x, y);
                let c = if self.falling.contains(&cell) {
                    '@'
                } else if self.landed.contains(&cell) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Frame {
    pub player: BoardView,
    pub opponent: BoardView,
    pub score: u32,
    pub difficulty: u32,
    pub streak: u32,
    pub outcome: Outcome,
}

impl Frame {
    pub fn status_line(&self) -> String {
        format!("PTS:{}  MAX:{}", self.score, self.difficulty)
    }
}

pub struct Versus<R> {
    player: BoardState,
    opponent: BoardState,
    settings: GameSettings,
    rng: R,
    score: u32,
    difficulty: u32,
    streak: u32,
    gravity_frames: u32,
    frame_count: u32,
    dirty: bool,
    autopilot: bool,
    outcome: Outcome,
}

impl<R: Rng> Versus<R> {
    pub fn new<P, O>(
        player_markers: &P,
        opponent_markers: &O,
        settings: GameSettings,
        rng: R,
    ) -> Result<Self, DuelError>
    where
        P: MarkerSource + ?Sized,
        O: MarkerSource + ?Sized,
    {
        settings.validate()?;
        let player_bounds = Bounds::discover(player_markers, settings.bounds_radius)
            .ok_or(DuelError::NoMarkers { side: Side::Player })?;
        let opponent_bounds = Bounds::discover(opponent_markers, settings.bounds_radius)
            .ok_or(DuelError::NoMarkers {
                side: Side::Opponent,
            })?;

        let gravity_frames = settings.gravity_frames;
        let mut versus = Self {
            player: BoardState::new(player_bounds),
            opponent: BoardState::new(opponent_bounds),
            settings,
            rng,
            score: 0,
            difficulty: 0,
            streak: 0,
            gravity_frames,
            frame_count: 0,
            dirty: true,
            autopilot: false,
            outcome: Outcome::Running,
        };

        let first = versus.player.spawn_piece(&mut versus.rng);
        versus.player.piece = Some(first);
        versus.opponent_action();

        if !versus.player.valid_piece(&first) {
            error!("no valid moves from start");
            return Err(DuelError::NoValidStart { side: Side::Player });
        }
        if versus.outcome == Outcome::ToppedOut(Side::Opponent) {
            return Err(DuelError::NoValidStart {
                side: Side::Opponent,
            });
        }
        Ok(versus)
    }

    /// Advances one raw frame. Gravity runs on the first frame and then once
    /// every `gravity_frames` frames.
    pub fn tick(&mut self) -> TickOutcome {
        if self.outcome != Outcome::Running {
            return TickOutcome::Halted;
        }
        if self.player.piece.is_none() {
            let piece = self.player.spawn_piece(&mut self.rng);
            self.player.piece = Some(piece);
            self.dirty = true;
            if !self.player.valid_piece(&piece) {
                error!("[player] no valid move, topping out");
                self.outcome = Outcome::ToppedOut(Side::Player);
                return TickOutcome::Halted;
            }
            if self.autopilot {
                self.autoplace_player();
            }
        }

        let due = self.frame_count % self.gravity_frames == 0;
        self.frame_count += 1;
        if !due {
            return TickOutcome::Waiting;
        }
        let advanced = self.gravity_tick();
        self.frame_count = 1;
        advanced
    }

    fn gravity_tick(&mut self) -> TickOutcome {
        self.dirty = true;
        if self.player.apply_gravity() == Gravity::Landed {
            debug!("[player] piece landed");
        }
        self.opponent_action();

        if self.streak > self.difficulty {
            self.difficulty = self.streak;
            if self.gravity_frames > 1 {
                self.gravity_frames -= 1;
            }
            info!(
                "difficulty {} reached, gravity every {} frames",
                self.difficulty, self.gravity_frames
            );
        }

        let player_cleared = self.player.clear_row();
        match player_cleared {
            Some(row) => {
                self.streak += 1;
                debug!("[player] cleared row {}, streak {}", row, self.streak);
                if self.settings.angry_chunks {
                    self.drop_angry_chunk();
                }
            }
            None => self.streak = 0,
        }

        let opponent_cleared = self.opponent.clear_row();
        if let Some(row) = opponent_cleared {
            debug!("[opponent] cleared row {}", row);
        }

        TickOutcome::Advanced {
            player_cleared,
            opponent_cleared,
        }
    }

    fn opponent_action(&mut self) {
        self.dirty = true;
        if self.opponent.piece.is_some() {
            if self.opponent.apply_gravity() == Gravity::Landed {
                debug!("[opponent] piece landed");
            }
            return;
        }

        let spawned = self.opponent.spawn_piece(&mut self.rng);
        if !self.opponent.valid_piece(&spawned) {
            warn!("[opponent] spawned into the stack, opponent dead");
        }
        let chosen = choose_placement(&self.opponent, &spawned, &self.settings.bot, &mut self.rng);
        if !self.opponent.valid_piece(&chosen) {
            error!("[opponent] no valid placement, topping out");
            self.outcome = Outcome::ToppedOut(Side::Opponent);
        }
        self.opponent.piece = Some(chosen);
    }

    fn drop_angry_chunk(&mut self) -> Option<Cell> {
        let b = self.player.bounds;
        let x = if b.max_x > b.min_x {
            self.rng.gen_range(b.min_x..b.max_x)
        } else {
            b.min_x
        };
        let mid_y = (b.min_y + b.max_y) / 2;
        let y = if mid_y > b.min_y {
            self.rng.gen_range(b.min_y..mid_y)
        } else {
            b.min_y
        };
        let cell = Cell::new(x, y);
        if self.player.is_occupied(cell) {
            return None;
        }
        self.player.chunk.insert(cell);
        debug!("[player] angry chunk at ({},{})", x, y);
        Some(cell)
    }

    fn running(&self) -> bool {
        self.outcome == Outcome::Running
    }

    fn shift_player(&mut self, dx: i32) -> bool {
        if !self.running() {
            return false;
        }
        self.dirty = true;
        let Some(piece) = self.player.piece else {
            return false;
        };
        match self.player.shift_piece(&piece, dx, 0) {
            Some(moved) => {
                self.player.piece = Some(moved);
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.shift_player(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift_player(1)
    }

    pub fn rotate(&mut self) -> bool {
        if !self.running() {
            return false;
        }
        self.dirty = true;
        let Some(piece) = self.player.piece else {
            return false;
        };
        let turned = self.player.rotate_piece(&piece);
        self.player.piece = Some(turned);
        turned != piece
    }

    pub fn hard_drop(&mut self) -> bool {
        if !self.running() {
            return false;
        }
        self.dirty = true;
        let Some(piece) = self.player.piece else {
            return false;
        };
        let dropped = self.player.drop_piece(&piece);
        self.player.piece = Some(dropped);
        dropped != piece
    }

    pub fn toggle_cell(&mut self, cell: Cell) -> bool {
        if !self.running() || !self.player.valid_world(cell) || self.player.is_occupied(cell) {
            return false;
        }
        self.player.chunk.insert(cell);
        self.dirty = true;
        true
    }

    pub fn autoplace_player(&mut self) -> bool {
        if !self.running() {
            return false;
        }
        let Some(piece) = self.player.piece else {
            return false;
        };
        let chosen = choose_placement(&self.player, &piece, &self.settings.bot, &mut self.rng);
        self.player.piece = Some(chosen);
        self.dirty = true;
        chosen != piece
    }
}

impl<R> Versus<R> {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn gravity_frames(&self) -> u32 {
        self.gravity_frames
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn player(&self) -> &BoardState {
        &self.player
    }

    pub fn opponent(&self) -> &BoardState {
        &self.opponent
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn frame(&self) -> Frame {
        Frame {
            player: BoardView::of(&self.player),
            opponent: BoardView::of(&self.opponent),
            score: self.score,
            difficulty: self.difficulty,
            streak: self.streak,
            outcome: self.outcome,
        }
    }

    /// Snapshot for the renderer, only when something changed since the
    /// last pull.
    pub fn take_frame(&mut self) -> Option<Frame> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.frame())
    }
}
