//! Error type shared by the board, encoding and decoding layers

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodingError {
    /// A user-supplied value (endpoint square, board size) was rejected
    #[error("invalid argument for {name}: `{value}` ({reason})")]
    InvalidArgument {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{size}x{size} board is not supported by the {strategy} encoding: {reason}")]
    UnsupportedBoard {
        size: usize,
        strategy: &'static str,
        reason: String,
    },

    /// The clause body disagreed with the header written before it
    #[error("{what} mismatch: header declared {declared}, body emitted {emitted}")]
    CountMismatch {
        what: &'static str,
        declared: usize,
        emitted: usize,
    },

    #[error("invalid solver model: {0}")]
    InvalidModel(String),

    #[error("solver reported the formula as unsatisfiable")]
    Unsatisfiable,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EncodingError {
    pub(crate) fn invalid_argument(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        EncodingError::InvalidArgument {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EncodingError>;
