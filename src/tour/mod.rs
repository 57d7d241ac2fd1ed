//! Reading knight's tours back out of satisfying assignments

pub mod decode;
pub mod model;
pub mod validator;

pub use decode::decode;
pub use model::Model;
pub use validator::{TourValidator, TourViolation, ValidationResult};

use crate::board::Board;
use serde::Serialize;

/// An ordered visit sequence over a board, squares 0-based row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tour {
    board: Board,
    squares: Vec<usize>,
}

impl Tour {
    pub fn new(board: Board, squares: Vec<usize>) -> Self {
        Self { board, squares }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn squares(&self) -> &[usize] {
        &self.squares
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn first(&self) -> Option<usize> {
        self.squares.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.squares.last().copied()
    }

    /// Consecutive square pairs
    pub fn steps(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.squares.windows(2).map(|w| (w[0], w[1]))
    }

    /// 1-based visit number of every square, `None` for squares never visited
    pub fn visit_numbers(&self) -> Vec<Option<usize>> {
        let mut numbers = vec![None; self.board.square_count()];
        for (step, &square) in self.squares.iter().enumerate() {
            if let Some(slot) = numbers.get_mut(square) {
                *slot = Some(step + 1);
            }
        }
        numbers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_numbers() {
        let board = Board::new(3).unwrap();
        let tour = Tour::new(board, vec![0, 5, 6]);
        let numbers = tour.visit_numbers();
        assert_eq!(numbers[0], Some(1));
        assert_eq!(numbers[5], Some(2));
        assert_eq!(numbers[6], Some(3));
        assert_eq!(numbers[4], None);
        assert_eq!(tour.steps().collect::<Vec<_>>(), vec![(0, 5), (5, 6)]);
        assert_eq!((tour.first(), tour.last()), (Some(0), Some(6)));
    }
}
