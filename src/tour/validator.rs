//! Independent checks on decoded tours

use super::decode::register_state;
use super::model::Model;
use super::Tour;
use crate::board::{Board, Endpoints};
use crate::sat::lfsr::{advance, SEED};
use crate::sat::{TourEncoder, TourEncoding};
use serde::Serialize;

/// Checks that a tour is an open knight's tour between fixed endpoints
pub struct TourValidator {
    board: Board,
    endpoints: Endpoints,
}

/// Result of tour validation
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub squares_visited: usize,
    pub steps_checked: usize,
    pub violations: Vec<TourViolation>,
}

/// A single way in which a tour fails; squares are 1-based
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TourViolation {
    WrongLength { expected: usize, actual: usize },
    WrongStart { expected: usize, actual: usize },
    WrongEnd { expected: usize, actual: usize },
    OffBoard { step: usize, square: usize },
    Revisited { step: usize, square: usize },
    NotAKnightMove { step: usize, from: usize, to: usize },
    /// The model does not select the move the tour takes
    MoveNotSelected { step: usize, from: usize, to: usize },
    /// The model's register at a square disagrees with the step count
    RegisterMismatch { step: usize, square: usize, expected: u8, actual: u8 },
}

impl TourValidator {
    pub fn new(board: Board, endpoints: Endpoints) -> Self {
        Self { board, endpoints }
    }

    pub fn for_encoding(encoding: &impl TourEncoding) -> Self {
        Self::new(*encoding.board(), *encoding.endpoints())
    }

    /// Validate the visit sequence on its own
    pub fn validate(&self, tour: &Tour) -> ValidationResult {
        let squares = tour.squares();
        let mut violations = Vec::new();

        let expected = self.board.square_count();
        if squares.len() != expected {
            violations.push(TourViolation::WrongLength {
                expected,
                actual: squares.len(),
            });
        }

        if let Some(first) = tour.first() {
            if first != self.endpoints.first {
                violations.push(TourViolation::WrongStart {
                    expected: self.endpoints.first + 1,
                    actual: first + 1,
                });
            }
        }
        if let Some(last) = tour.last() {
            if last != self.endpoints.last {
                violations.push(TourViolation::WrongEnd {
                    expected: self.endpoints.last + 1,
                    actual: last + 1,
                });
            }
        }

        let mut seen = vec![false; expected];
        for (step, &square) in squares.iter().enumerate() {
            if !self.board.contains(square) {
                violations.push(TourViolation::OffBoard {
                    step: step + 1,
                    square: square + 1,
                });
                continue;
            }
            if seen[square] {
                violations.push(TourViolation::Revisited {
                    step: step + 1,
                    square: square + 1,
                });
            }
            seen[square] = true;
        }

        let mut steps_checked = 0;
        for (step, (from, to)) in tour.steps().enumerate() {
            steps_checked += 1;
            let on_board = self.board.contains(from) && self.board.contains(to);
            if on_board && !self.board.is_knight_move(from, to) {
                violations.push(TourViolation::NotAKnightMove {
                    step: step + 2,
                    from: from + 1,
                    to: to + 1,
                });
            }
        }

        ValidationResult {
            is_valid: violations.is_empty(),
            squares_visited: seen.iter().filter(|&&s| s).count(),
            steps_checked,
            violations,
        }
    }

    /// Validate the tour and check it against the model it was decoded from
    pub fn validate_model(&self, tour: &Tour, encoder: &TourEncoder, model: &Model) -> ValidationResult {
        let mut result = self.validate(tour);
        let graph = encoder.graph();
        let vars = encoder.variables();

        for (step, (from, to)) in tour.steps().enumerate() {
            let selected = graph
                .find(from, to)
                .or_else(|| graph.find(to, from))
                .map(|m| model.holds(vars.move_var(m)));
            // off-board or non-knight steps are already reported
            if selected == Some(false) {
                result.violations.push(TourViolation::MoveNotSelected {
                    step: step + 2,
                    from: from + 1,
                    to: to + 1,
                });
            }
        }

        if let TourEncoder::Lfsr(encoding) = encoder {
            for (step, &square) in tour.squares().iter().enumerate() {
                if !self.board.contains(square) {
                    continue;
                }
                let expected = advance(SEED, step);
                let actual = register_state(encoding, model, square);
                if actual != expected {
                    result.violations.push(TourViolation::RegisterMismatch {
                        step: step + 1,
                        square: square + 1,
                        expected,
                        actual,
                    });
                }
            }
        }

        result.is_valid = result.violations.is_empty();
        result
    }
}

impl std::fmt::Display for TourViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TourViolation::WrongLength { expected, actual } => {
                write!(f, "tour visits {} squares, expected {}", actual, expected)
            }
            TourViolation::WrongStart { expected, actual } => {
                write!(f, "tour starts on square {}, expected {}", actual, expected)
            }
            TourViolation::WrongEnd { expected, actual } => {
                write!(f, "tour ends on square {}, expected {}", actual, expected)
            }
            TourViolation::OffBoard { step, square } => {
                write!(f, "step {}: square {} is off the board", step, square)
            }
            TourViolation::Revisited { step, square } => {
                write!(f, "step {}: square {} was already visited", step, square)
            }
            TourViolation::NotAKnightMove { step, from, to } => {
                write!(f, "step {}: {} -> {} is not a knight move", step, from, to)
            }
            TourViolation::MoveNotSelected { step, from, to } => {
                write!(f, "step {}: move {} -> {} is false in the model", step, from, to)
            }
            TourViolation::RegisterMismatch {
                step,
                square,
                expected,
                actual,
            } => write!(
                f,
                "step {}: square {} holds register {:#04x}, expected {:#04x}",
                step, square, actual, expected
            ),
        }
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Result: {}", if self.is_valid { "VALID" } else { "INVALID" })?;
        writeln!(f, "Squares visited: {}", self.squares_visited)?;
        writeln!(f, "Steps checked: {}", self.steps_checked)?;
        writeln!(f, "Violations: {}", self.violations.len())?;

        // keep the report short on badly broken input
        for violation in self.violations.iter().take(5) {
            writeln!(f, "  - {}", violation)?;
        }
        if self.violations.len() > 5 {
            writeln!(f, "  ... and {} more", self.violations.len() - 5)?;
        }

        Ok(())
    }
}
