//! Square board geometry and tour endpoints

use crate::error::{EncodingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An n x n board; squares are numbered row-major from 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
}

impl Board {
    /// Create a board with the given side length
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 {
            return Err(EncodingError::invalid_argument(
                "board size",
                size,
                "a tour needs at least two distinct squares",
            ));
        }
        Ok(Self { size })
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of squares (n²)
    pub fn square_count(&self) -> usize {
        self.size * self.size
    }

    #[inline]
    pub fn row(&self, square: usize) -> usize {
        square / self.size
    }

    #[inline]
    pub fn col(&self, square: usize) -> usize {
        square % self.size
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    pub fn contains(&self, square: usize) -> bool {
        square < self.square_count()
    }

    /// True iff the absolute row/column deltas are a permutation of (1, 2)
    pub fn is_knight_move(&self, a: usize, b: usize) -> bool {
        let dr = self.row(a).abs_diff(self.row(b));
        let dc = self.col(a).abs_diff(self.col(b));
        matches!((dr, dc), (1, 2) | (2, 1))
    }

    /// Human-readable coordinate such as `a1` (column letter, 1-based row)
    pub fn coordinate(&self, square: usize) -> String {
        let col = self.col(square);
        let file = if col < 26 {
            char::from(b'a' + col as u8).to_string()
        } else {
            format!("c{}", col + 1)
        };
        format!("{}{}", file, self.row(square) + 1)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.size, self.size)
    }
}

/// Parse a 1-based square argument as given on the command line.
///
/// Only syntax is checked here; the range check needs the board and happens
/// in [`Endpoints::from_one_based`].
pub fn parse_square_argument(name: &'static str, raw: &str) -> Result<usize> {
    let trimmed = raw.trim();
    let value: usize = trimmed
        .parse()
        .map_err(|_| EncodingError::invalid_argument(name, raw, "expected a positive integer"))?;
    if value == 0 {
        return Err(EncodingError::invalid_argument(
            name,
            raw,
            "squares are numbered from 1",
        ));
    }
    Ok(value)
}

/// The fixed first and last squares of the tour (0-based, distinct)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub first: usize,
    pub last: usize,
}

impl Endpoints {
    /// Top-left corner to top-right corner (squares 1 and 8 on the standard board)
    pub fn default_for(board: &Board) -> Self {
        Self {
            first: 0,
            last: board.size() - 1,
        }
    }

    /// Validate 0-based endpoints against the board
    pub fn new(board: &Board, first: usize, last: usize) -> Result<Self> {
        let squares = board.square_count();
        if first >= squares {
            return Err(EncodingError::invalid_argument(
                "first square",
                first + 1,
                format!("must be between 1 and {}", squares),
            ));
        }
        if last >= squares {
            return Err(EncodingError::invalid_argument(
                "last square",
                last + 1,
                format!("must be between 1 and {}", squares),
            ));
        }
        if first == last {
            return Err(EncodingError::invalid_argument(
                "last square",
                last + 1,
                "must differ from the first square",
            ));
        }
        Ok(Self { first, last })
    }

    /// Validate 1-based endpoints as used on the command line and in config files
    pub fn from_one_based(board: &Board, first: usize, last: usize) -> Result<Self> {
        if first == 0 {
            return Err(EncodingError::invalid_argument(
                "first square",
                first,
                "squares are numbered from 1",
            ));
        }
        if last == 0 {
            return Err(EncodingError::invalid_argument(
                "last square",
                last,
                "squares are numbered from 1",
            ));
        }
        Self::new(board, first - 1, last - 1)
    }

    pub fn is_endpoint(&self, square: usize) -> bool {
        square == self.first || square == self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_mapping() {
        let board = Board::new(8).unwrap();
        assert_eq!(board.square_count(), 64);
        assert_eq!(board.row(10), 1);
        assert_eq!(board.col(10), 2);
        assert_eq!(board.index(1, 2), 10);
        assert_eq!(board.coordinate(0), "a1");
        assert_eq!(board.coordinate(63), "h8");
    }

    #[test]
    fn test_knight_move_detection() {
        let board = Board::new(8).unwrap();
        assert!(board.is_knight_move(0, 10));
        assert!(board.is_knight_move(0, 17));
        assert!(board.is_knight_move(17, 0));
        assert!(!board.is_knight_move(0, 9));
        assert!(!board.is_knight_move(0, 0));
        // (0, 6) -> (1, 0): column delta 6, not a wrap-around
        assert!(!board.is_knight_move(6, 8));
    }

    #[test]
    fn test_board_too_small() {
        assert!(Board::new(0).is_err());
        assert!(Board::new(1).is_err());
        assert!(Board::new(2).is_ok());
    }

    #[test]
    fn test_parse_square_argument() {
        assert_eq!(parse_square_argument("first square", "8").unwrap(), 8);
        assert_eq!(parse_square_argument("first square", " 13 ").unwrap(), 13);

        let err = parse_square_argument("first square", "abc").unwrap_err();
        assert!(matches!(err, EncodingError::InvalidArgument { .. }));
        assert!(parse_square_argument("first square", "0").is_err());
        assert!(parse_square_argument("first square", "-3").is_err());
        assert!(parse_square_argument("first square", "").is_err());
    }

    #[test]
    fn test_endpoint_validation() {
        let board = Board::new(8).unwrap();

        let endpoints = Endpoints::from_one_based(&board, 1, 8).unwrap();
        assert_eq!(endpoints, Endpoints::default_for(&board));
        assert!(endpoints.is_endpoint(0));
        assert!(endpoints.is_endpoint(7));
        assert!(!endpoints.is_endpoint(1));

        assert!(Endpoints::from_one_based(&board, 65, 8).is_err());
        assert!(Endpoints::from_one_based(&board, 1, 65).is_err());
        assert!(Endpoints::from_one_based(&board, 5, 5).is_err());
        assert!(Endpoints::from_one_based(&board, 0, 5).is_err());
    }
}
