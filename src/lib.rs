//! Two-board falling-block duel: one board follows player commands, the
//! other is played by a bot that searches every rotation and nearby column
//! for its best landing spot.

pub mod board;
pub mod bot;
pub mod bounds;
pub mod client;
pub mod error;
pub mod piece;
pub mod settings;
pub mod versus;

pub use board::{BoardState, Chunk, Gravity};
pub use bot::{BotConfig, HeuristicWeights, StackProfile, candidate_placements, choose_placement, evaluate_placement};
pub use bounds::{BOUNDS_MAX, Bounds, MarkerGrid, MarkerSource};
pub use error::DuelError;
pub use piece::{Cell, Piece, Shape};
pub use settings::GameSettings;
pub use versus::{BoardView, Frame, Outcome, Side, TickOutcome, Versus};
