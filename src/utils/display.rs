//! Display and output formatting utilities

use crate::config::EncodingStrategy;
use crate::tour::{Tour, ValidationResult};
use serde::Serialize;

/// Format decoded tours for display
pub struct TourFormatter;

impl TourFormatter {
    /// Grid of visit numbers, top row first, as the squares are numbered
    pub fn format_grid(tour: &Tour) -> String {
        let board = tour.board();
        let numbers = tour.visit_numbers();
        let width = board.square_count().to_string().len();

        let mut output = String::new();
        for row in 0..board.size() {
            let cells: Vec<String> = (0..board.size())
                .map(|col| match numbers[board.index(row, col)] {
                    Some(step) => format!("{:>width$}", step, width = width),
                    None => format!("{:>width$}", "·", width = width),
                })
                .collect();
            output.push_str(&cells.join(" "));
            output.push('\n');
        }
        output
    }

    /// The visit order as 1-based square numbers
    pub fn format_sequence(tour: &Tour) -> String {
        tour.squares()
            .iter()
            .map(|s| (s + 1).to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The visit order as algebraic coordinates
    pub fn format_coordinates(tour: &Tour) -> String {
        tour.squares()
            .iter()
            .map(|&s| tour.board().coordinate(s))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Machine-readable summary of a decoded tour
#[derive(Debug, Clone, Serialize)]
pub struct TourReport {
    pub board_size: usize,
    pub strategy: EncodingStrategy,
    pub first_square: usize,
    pub last_square: usize,
    /// 1-based squares in visit order
    pub squares: Vec<usize>,
    pub coordinates: Vec<String>,
    pub validation: ValidationResult,
}

impl TourReport {
    pub fn new(tour: &Tour, strategy: EncodingStrategy, validation: ValidationResult) -> Self {
        let board = tour.board();
        Self {
            board_size: board.size(),
            strategy,
            first_square: tour.first().map_or(0, |s| s + 1),
            last_square: tour.last().map_or(0, |s| s + 1),
            squares: tour.squares().iter().map(|s| s + 1).collect(),
            coordinates: tour.squares().iter().map(|&s| board.coordinate(s)).collect(),
            validation,
        }
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
