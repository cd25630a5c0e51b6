use thiserror::Error;

use crate::versus::Side;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DuelError {
    #[error("no marker tiles found for the {side} board")]
    NoMarkers { side: Side },
    #[error("no valid start position on the {side} board")]
    NoValidStart { side: Side },
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}
