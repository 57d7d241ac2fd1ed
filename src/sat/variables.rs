//! Variable allocation for the SAT encodings

use crate::board::Move;
use crate::error::{EncodingError, Result};
use serde::Serialize;
use std::ops::RangeInclusive;

/// The second variable family allocated after the move variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryFamily {
    /// `bits` register bits per square
    StateBits { bits: usize },
    /// One variable per unordered pair of squares
    Order,
}

/// Assigns dense, 1-based DIMACS variables to every semantic variable.
///
/// Move variables come first (`1..=moves`), followed by the secondary
/// family. Nothing is stored per variable; every lookup is arithmetic.
#[derive(Debug, Clone)]
pub struct VariableAllocator {
    moves: usize,
    squares: usize,
    secondary: SecondaryFamily,
}

impl VariableAllocator {
    fn new(moves: usize, squares: usize, secondary: SecondaryFamily) -> Result<Self> {
        let allocator = Self {
            moves,
            squares,
            secondary,
        };
        if i32::try_from(allocator.total()).is_err() {
            return Err(EncodingError::UnsupportedBoard {
                size: (squares as f64).sqrt() as usize,
                strategy: match secondary {
                    SecondaryFamily::StateBits { .. } => "lfsr",
                    SecondaryFamily::Order => "order",
                },
                reason: format!("{} variables exceed the DIMACS literal range", allocator.total()),
            });
        }
        Ok(allocator)
    }

    /// Moves followed by `bits` state variables per square
    pub fn for_state_bits(moves: usize, squares: usize, bits: usize) -> Result<Self> {
        Self::new(moves, squares, SecondaryFamily::StateBits { bits })
    }

    /// Moves followed by one order variable per unordered pair of squares
    pub fn for_order(moves: usize, squares: usize) -> Result<Self> {
        Self::new(moves, squares, SecondaryFamily::Order)
    }

    pub fn secondary(&self) -> SecondaryFamily {
        self.secondary
    }

    pub fn move_count(&self) -> usize {
        self.moves
    }

    /// Register width, or 0 for an order allocator
    pub fn bits_per_square(&self) -> usize {
        match self.secondary {
            SecondaryFamily::StateBits { bits } => bits,
            SecondaryFamily::Order => 0,
        }
    }

    /// Size of the secondary family
    pub fn secondary_count(&self) -> usize {
        match self.secondary {
            SecondaryFamily::StateBits { bits } => bits * self.squares,
            SecondaryFamily::Order => self.squares * self.squares.saturating_sub(1) / 2,
        }
    }

    /// Total number of variables (the DIMACS header value)
    pub fn total(&self) -> usize {
        self.moves + self.secondary_count()
    }

    pub fn move_range(&self) -> RangeInclusive<usize> {
        1..=self.moves
    }

    pub fn secondary_range(&self) -> RangeInclusive<usize> {
        self.moves + 1..=self.total()
    }

    /// Variable of a move from the graph the allocator was sized for
    #[inline]
    pub fn move_var(&self, m: &Move) -> i32 {
        debug_assert!(m.id >= 1 && m.id <= self.moves);
        m.id as i32
    }

    /// Register bit `bit` of `square`
    #[inline]
    pub fn state_bit(&self, square: usize, bit: usize) -> i32 {
        let bits = self.bits_per_square();
        debug_assert!(square < self.squares && bit < bits);
        (self.moves + square * bits + bit + 1) as i32
    }

    /// Variable meaning "min(a, b) is visited before max(a, b)"
    pub fn order_var(&self, a: usize, b: usize) -> i32 {
        debug_assert!(self.secondary == SecondaryFamily::Order);
        debug_assert!(a != b && a < self.squares && b < self.squares);
        let (min, max) = if a < b { (a, b) } else { (b, a) };
        // pairs (m, _) for every m < min come first; each has squares - 1 - m partners
        let preceding: usize = (0..min).map(|m| self.squares - 1 - m).sum();
        (self.moves + preceding + (max - min)) as i32
    }

    /// Literal meaning "a is visited before b"
    pub fn precedes(&self, a: usize, b: usize) -> i32 {
        let var = self.order_var(a, b);
        if a < b {
            var
        } else {
            -var
        }
    }

    /// Inverse of [`order_var`](Self::order_var): the square pair behind a variable
    pub fn order_pair(&self, var: usize) -> Option<(usize, usize)> {
        if self.secondary != SecondaryFamily::Order || !self.secondary_range().contains(&var) {
            return None;
        }
        let mut offset = var - self.moves;
        for min in 0..self.squares {
            let partners = self.squares - 1 - min;
            if offset <= partners {
                return Some((min, min + offset));
            }
            offset -= partners;
        }
        None
    }

    pub fn statistics(&self) -> VariableStatistics {
        VariableStatistics {
            total_variables: self.total(),
            move_variables: self.moves,
            secondary_variables: self.secondary_count(),
            secondary_family: self.secondary,
        }
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone, Serialize)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub move_variables: usize,
    pub secondary_variables: usize,
    pub secondary_family: SecondaryFamily,
}

impl std::fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Move variables: {}", self.move_variables)?;
        match self.secondary_family {
            SecondaryFamily::StateBits { bits } => writeln!(
                f,
                "  State bits: {} ({} per square)",
                self.secondary_variables, bits
            )?,
            SecondaryFamily::Order => {
                writeln!(f, "  Order variables: {}", self.secondary_variables)?
            }
        }
        Ok(())
    }
}
