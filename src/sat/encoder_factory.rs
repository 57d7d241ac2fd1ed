//! Factory for creating tour encodings based on configuration

use super::constraints::ClauseSink;
use super::encoder::{ConstraintFamily, TourEncoding};
use super::lfsr::LfsrEncoding;
use super::order::OrderEncoding;
use super::variables::VariableAllocator;
use crate::board::{Board, Endpoints, MoveGraph};
use crate::config::EncodingStrategy;
use crate::error::Result;

/// Unified encoding interface over the available strategies
#[derive(Debug, Clone)]
pub enum TourEncoder {
    Lfsr(LfsrEncoding),
    Order(OrderEncoding),
}

impl TourEncoder {
    /// Create the encoding for the specified strategy
    pub fn new(board: Board, endpoints: Endpoints, strategy: EncodingStrategy) -> Result<Self> {
        match strategy {
            EncodingStrategy::Lfsr => Ok(TourEncoder::Lfsr(LfsrEncoding::new(board, endpoints)?)),
            EncodingStrategy::Order => Ok(TourEncoder::Order(OrderEncoding::new(board, endpoints)?)),
        }
    }

    fn inner(&self) -> &dyn TourEncoding {
        match self {
            TourEncoder::Lfsr(encoding) => encoding,
            TourEncoder::Order(encoding) => encoding,
        }
    }
}

impl TourEncoding for TourEncoder {
    fn strategy(&self) -> EncodingStrategy {
        self.inner().strategy()
    }

    fn board(&self) -> &Board {
        self.inner().board()
    }

    fn endpoints(&self) -> &Endpoints {
        self.inner().endpoints()
    }

    fn graph(&self) -> &MoveGraph {
        self.inner().graph()
    }

    fn variables(&self) -> &VariableAllocator {
        self.inner().variables()
    }

    fn families(&self) -> &'static [ConstraintFamily] {
        self.inner().families()
    }

    fn count_family(&self, family: ConstraintFamily) -> usize {
        self.inner().count_family(family)
    }

    fn emit_family(&self, family: ConstraintFamily, sink: &mut dyn ClauseSink) -> Result<()> {
        self.inner().emit_family(family, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MoveKind;

    fn build(strategy: EncodingStrategy) -> TourEncoder {
        let board = Board::new(8).unwrap();
        TourEncoder::new(board, Endpoints::default_for(&board), strategy).unwrap()
    }

    #[test]
    fn test_strategy_selection() {
        let lfsr = build(EncodingStrategy::Lfsr);
        assert!(matches!(lfsr, TourEncoder::Lfsr(_)));
        assert_eq!(lfsr.strategy(), EncodingStrategy::Lfsr);
        assert_eq!(lfsr.graph().kind(), MoveKind::Directed);
        assert_eq!(lfsr.variable_count(), 720);

        let order = build(EncodingStrategy::Order);
        assert!(matches!(order, TourEncoder::Order(_)));
        assert_eq!(order.graph().kind(), MoveKind::Undirected);
        assert_eq!(order.variable_count(), 2184);
    }

    #[test]
    fn test_delegated_counts() {
        for strategy in [EncodingStrategy::Lfsr, EncodingStrategy::Order] {
            let encoder = build(strategy);
            let mut clauses = Vec::new();
            encoder.emit(&mut clauses).unwrap();
            assert_eq!(clauses.len(), encoder.clause_count());
        }
    }

    #[test]
    fn test_unsupported_board_surfaces() {
        let board = Board::new(10).unwrap();
        let endpoints = Endpoints::default_for(&board);
        assert!(TourEncoder::new(board, endpoints, EncodingStrategy::Lfsr).is_err());
        assert!(TourEncoder::new(board, endpoints, EncodingStrategy::Order).is_ok());
    }
}
