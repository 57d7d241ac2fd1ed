//! Clauses, clause sinks and the cardinality encodings shared by both strategies

use crate::error::Result;
use itertools::Itertools;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// Largest variable index mentioned by the clause
    pub fn max_variable(&self) -> usize {
        self.literals
            .iter()
            .map(|lit| lit.unsigned_abs() as usize)
            .max()
            .unwrap_or(0)
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for lit in &self.literals {
            write!(f, "{} ", lit)?;
        }
        write!(f, "0")
    }
}

/// Destination for generated clauses
pub trait ClauseSink {
    fn add_clause(&mut self, literals: &[i32]) -> Result<()>;
}

impl ClauseSink for Vec<Clause> {
    fn add_clause(&mut self, literals: &[i32]) -> Result<()> {
        self.push(Clause::new(literals.to_vec()));
        Ok(())
    }
}

/// Counts clauses without keeping them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClauseTally {
    pub clauses: usize,
    pub literals: usize,
    pub max_variable: usize,
}

impl ClauseSink for ClauseTally {
    fn add_clause(&mut self, literals: &[i32]) -> Result<()> {
        self.clauses += 1;
        self.literals += literals.len();
        for lit in literals {
            self.max_variable = self.max_variable.max(lit.unsigned_abs() as usize);
        }
        Ok(())
    }
}

/// One clause: the disjunction of all candidates
pub fn at_least_one(sink: &mut dyn ClauseSink, literals: &[i32]) -> Result<()> {
    sink.add_clause(literals)
}

/// Pairwise encoding: C(d, 2) binary clauses
pub fn at_most_one(sink: &mut dyn ClauseSink, literals: &[i32]) -> Result<()> {
    for (&a, &b) in literals.iter().tuple_combinations() {
        sink.add_clause(&[-a, -b])?;
    }
    Ok(())
}

/// d clauses, each the disjunction of all candidates but one
pub fn at_least_two(sink: &mut dyn ClauseSink, literals: &[i32]) -> Result<()> {
    for skip in 0..literals.len() {
        let rest: Vec<i32> = literals
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != skip)
            .map(|(_, &lit)| lit)
            .collect();
        sink.add_clause(&rest)?;
    }
    Ok(())
}

/// Forbids every 3-subset: C(d, 3) ternary clauses
pub fn at_most_two(sink: &mut dyn ClauseSink, literals: &[i32]) -> Result<()> {
    for (&a, &b, &c) in literals.iter().tuple_combinations() {
        sink.add_clause(&[-a, -b, -c])?;
    }
    Ok(())
}
