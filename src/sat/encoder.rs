//! Shared encoding interface and the CNF generation driver

use super::constraints::{Clause, ClauseSink};
use super::dimacs::DimacsWriter;
use super::encoder_factory::TourEncoder;
use super::variables::{SecondaryFamily, VariableAllocator, VariableStatistics};
use crate::board::{Board, Endpoints, MoveGraph};
use crate::config::{EncodingStrategy, Settings};
use crate::error::Result;
use log::{debug, info};
use serde::Serialize;
use std::io::Write;

/// A group of clauses emitted and counted as one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintFamily {
    NonTrivialState,
    ExactlyOneSuccessor,
    ExactlyOnePredecessor,
    EndpointState,
    LfsrTransition,
    MoveCardinality,
    OrderEndpoints,
    Transitivity,
}

impl ConstraintFamily {
    pub fn description(self) -> &'static str {
        match self {
            ConstraintFamily::NonTrivialState => "non-trivial register state",
            ConstraintFamily::ExactlyOneSuccessor => "exactly one successor",
            ConstraintFamily::ExactlyOnePredecessor => "exactly one predecessor",
            ConstraintFamily::EndpointState => "endpoint register pins",
            ConstraintFamily::LfsrTransition => "LFSR transition",
            ConstraintFamily::MoveCardinality => "move-count cardinality",
            ConstraintFamily::OrderEndpoints => "order fixing at endpoints",
            ConstraintFamily::Transitivity => "transitivity",
        }
    }
}

impl std::fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A complete open-tour encoding.
///
/// Each family has a closed-form count and an emission routine; the default
/// methods combine them in family order, so the header can be computed before
/// the body is streamed.
pub trait TourEncoding {
    fn strategy(&self) -> EncodingStrategy;
    fn board(&self) -> &Board;
    fn endpoints(&self) -> &Endpoints;
    fn graph(&self) -> &MoveGraph;
    fn variables(&self) -> &VariableAllocator;

    /// Families in emission order
    fn families(&self) -> &'static [ConstraintFamily];

    /// Clauses `emit_family` will produce for `family` (0 for foreign families)
    fn count_family(&self, family: ConstraintFamily) -> usize;

    fn emit_family(&self, family: ConstraintFamily, sink: &mut dyn ClauseSink) -> Result<()>;

    fn variable_count(&self) -> usize {
        self.variables().total()
    }

    fn clause_count(&self) -> usize {
        self.families().iter().map(|&f| self.count_family(f)).sum()
    }

    fn emit(&self, sink: &mut dyn ClauseSink) -> Result<()> {
        for &family in self.families() {
            debug!(
                "Emitting {} ({} clauses)",
                family,
                self.count_family(family)
            );
            self.emit_family(family, sink)?;
        }
        Ok(())
    }

    fn statistics(&self) -> EncodingStatistics {
        EncodingStatistics {
            strategy: self.strategy(),
            board_size: self.board().size(),
            first_square: self.endpoints().first + 1,
            last_square: self.endpoints().last + 1,
            moves: self.graph().len(),
            variables: self.variables().statistics(),
            total_clauses: self.clause_count(),
            families: self
                .families()
                .iter()
                .map(|&family| FamilyStatistics {
                    family,
                    clauses: self.count_family(family),
                })
                .collect(),
        }
    }
}

/// Generates the CNF for one board, endpoint pair and strategy
pub struct SatEncoder {
    encoding: TourEncoder,
    comments: bool,
}

impl SatEncoder {
    /// Build the encoder described by the settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let board = settings.board.board()?;
        let endpoints = settings.board.endpoints(&board)?;
        let mut encoder = Self::from_parts(board, endpoints, settings.encoding.strategy)?;
        encoder.comments = settings.output.comments;
        Ok(encoder)
    }

    pub fn from_parts(board: Board, endpoints: Endpoints, strategy: EncodingStrategy) -> Result<Self> {
        let encoding = TourEncoder::new(board, endpoints, strategy)?;
        info!(
            "{} encoding on a {} board from square {} to square {}",
            strategy,
            board,
            endpoints.first + 1,
            endpoints.last + 1
        );
        Ok(Self {
            encoding,
            comments: false,
        })
    }

    pub fn encoding(&self) -> &TourEncoder {
        &self.encoding
    }

    /// Stream the whole formula: header first, then every family in order
    pub fn write_cnf<W: Write>(&self, out: W) -> Result<W> {
        let variables = self.encoding.variable_count();
        let clauses = self.encoding.clause_count();

        let comments = if self.comments {
            self.header_comments()
        } else {
            Vec::new()
        };
        let mut writer = DimacsWriter::with_comments(out, variables, clauses, &comments)?;
        self.encoding.emit(&mut writer)?;

        info!(
            "Wrote {} clauses over {} variables",
            writer.emitted_clauses(),
            variables
        );
        writer.finish()
    }

    /// Collect the formula in memory (for solvers and tests)
    pub fn clauses(&self) -> Result<Vec<Clause>> {
        let mut clauses = Vec::with_capacity(self.encoding.clause_count());
        self.encoding.emit(&mut clauses)?;
        Ok(clauses)
    }

    pub fn statistics(&self) -> EncodingStatistics {
        self.encoding.statistics()
    }

    fn header_comments(&self) -> Vec<String> {
        let e = &self.encoding;
        let vars = e.variables();
        let secondary = match vars.secondary() {
            SecondaryFamily::StateBits { bits } => format!("register bits ({} per square)", bits),
            SecondaryFamily::Order => "pairwise order".to_string(),
        };
        vec![
            format!("open knight's tour on a {} board", e.board()),
            format!(
                "encoding: {}, first square {}, last square {}",
                e.strategy(),
                e.endpoints().first + 1,
                e.endpoints().last + 1
            ),
            format!("variables {}..={}: moves", 1, vars.move_count()),
            format!(
                "variables {}..={}: {}",
                vars.move_count() + 1,
                vars.total(),
                secondary
            ),
        ]
    }
}

/// Clause count of one family
#[derive(Debug, Clone, Serialize)]
pub struct FamilyStatistics {
    pub family: ConstraintFamily,
    pub clauses: usize,
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone, Serialize)]
pub struct EncodingStatistics {
    pub strategy: EncodingStrategy,
    pub board_size: usize,
    pub first_square: usize,
    pub last_square: usize,
    pub moves: usize,
    pub variables: VariableStatistics,
    pub total_clauses: usize,
    pub families: Vec<FamilyStatistics>,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Strategy: {}", self.strategy)?;
        writeln!(f, "  Board: {}x{}", self.board_size, self.board_size)?;
        writeln!(f, "  Endpoints: {} -> {}", self.first_square, self.last_square)?;
        writeln!(f, "  Knight moves: {}", self.moves)?;
        write!(f, "{}", self.variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        for family in &self.families {
            writeln!(f, "    {}: {}", family.family, family.clauses)?;
        }
        Ok(())
    }
}
