//! Total-order encoding.
//!
//! One variable per unordered pair of squares records which of the two is
//! visited first. Interior squares use exactly two moves, endpoints exactly
//! one, and every selected move `(i, j)` forces each third square `k` onto
//! the same side of both `i` and `j`, so no square is visited between the two
//! ends of a selected move.

use super::constraints::{at_least_one, at_least_two, at_most_one, at_most_two, ClauseSink};
use super::counting;
use super::encoder::{ConstraintFamily, TourEncoding};
use super::variables::VariableAllocator;
use crate::board::{Board, Endpoints, Move, MoveGraph};
use crate::config::EncodingStrategy;
use crate::error::Result;

const FAMILIES: &[ConstraintFamily] = &[
    ConstraintFamily::MoveCardinality,
    ConstraintFamily::OrderEndpoints,
    ConstraintFamily::Transitivity,
];

#[derive(Debug, Clone)]
pub struct OrderEncoding {
    board: Board,
    endpoints: Endpoints,
    graph: MoveGraph,
    variables: VariableAllocator,
}

impl OrderEncoding {
    pub fn new(board: Board, endpoints: Endpoints) -> Result<Self> {
        let graph = MoveGraph::undirected(board);
        let variables = VariableAllocator::for_order(graph.len(), board.square_count())?;
        Ok(Self {
            board,
            endpoints,
            graph,
            variables,
        })
    }

    /// Move variables of every move touching `square`, ordered by neighbour
    pub fn incident_moves(&self, square: usize) -> Vec<i32> {
        self.graph
            .incident(square)
            .into_iter()
            .map(|m| self.variables.move_var(m))
            .collect()
    }

    fn emit_cardinality(&self, sink: &mut dyn ClauseSink) -> Result<()> {
        for square in 0..self.board.square_count() {
            let moves = self.incident_moves(square);
            if self.endpoints.is_endpoint(square) {
                at_most_one(sink, &moves)?;
                at_least_one(sink, &moves)?;
            } else {
                at_most_two(sink, &moves)?;
                at_least_two(sink, &moves)?;
            }
        }
        Ok(())
    }

    fn emit_order_endpoints(&self, sink: &mut dyn ClauseSink) -> Result<()> {
        let Endpoints { first, last } = self.endpoints;
        let squares = self.board.square_count();
        for square in (0..squares).filter(|&s| s != first) {
            sink.add_clause(&[self.variables.precedes(first, square)])?;
        }
        for square in (0..squares).filter(|&s| s != last) {
            sink.add_clause(&[self.variables.precedes(square, last)])?;
        }
        Ok(())
    }

    fn emit_move_transitivity(&self, m: &Move, sink: &mut dyn ClauseSink) -> Result<()> {
        let selected = self.variables.move_var(m);
        let (i, j) = (m.from, m.to);
        for k in 0..self.board.square_count() {
            if k == i || k == j {
                continue;
            }
            let x = self.variables.order_var(i, k);
            let y = self.variables.order_var(j, k);
            if i < k && k < j {
                // x reads "i before k", y reads "k before j": they must differ
                sink.add_clause(&[-selected, x, y])?;
                sink.add_clause(&[-selected, -x, -y])?;
            } else {
                // both variables compare k against the lower (or both against the higher) square
                sink.add_clause(&[-selected, -x, y])?;
                sink.add_clause(&[-selected, x, -y])?;
            }
        }
        Ok(())
    }

    fn emit_transitivity(&self, sink: &mut dyn ClauseSink) -> Result<()> {
        for m in self.graph.moves() {
            self.emit_move_transitivity(m, sink)?;
        }
        Ok(())
    }
}

impl TourEncoding for OrderEncoding {
    fn strategy(&self) -> EncodingStrategy {
        EncodingStrategy::Order
    }

    fn board(&self) -> &Board {
        &self.board
    }

    fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn graph(&self) -> &MoveGraph {
        &self.graph
    }

    fn variables(&self) -> &VariableAllocator {
        &self.variables
    }

    fn families(&self) -> &'static [ConstraintFamily] {
        FAMILIES
    }

    fn count_family(&self, family: ConstraintFamily) -> usize {
        let squares = self.board.square_count();
        match family {
            ConstraintFamily::MoveCardinality => {
                counting::move_cardinality(&self.graph, &self.endpoints)
            }
            ConstraintFamily::OrderEndpoints => counting::order_endpoints(squares),
            ConstraintFamily::Transitivity => counting::transitivity(self.graph.len(), squares),
            _ => 0,
        }
    }

    fn emit_family(&self, family: ConstraintFamily, sink: &mut dyn ClauseSink) -> Result<()> {
        match family {
            ConstraintFamily::MoveCardinality => self.emit_cardinality(sink),
            ConstraintFamily::OrderEndpoints => self.emit_order_endpoints(sink),
            ConstraintFamily::Transitivity => self.emit_transitivity(sink),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::constraints::{Clause, ClauseTally};
    use crate::sat::counting::binomial;

    fn encoding(n: usize, first: usize, last: usize) -> OrderEncoding {
        let board = Board::new(n).unwrap();
        let endpoints = Endpoints::from_one_based(&board, first, last).unwrap();
        OrderEncoding::new(board, endpoints).unwrap()
    }

    fn family(e: &OrderEncoding, f: ConstraintFamily) -> Vec<Clause> {
        let mut clauses = Vec::new();
        e.emit_family(f, &mut clauses).unwrap();
        clauses
    }

    #[test]
    fn test_variable_count() {
        let e = encoding(8, 1, 8);
        assert_eq!(e.variable_count(), 168 + 64 * 63 / 2);
        assert_eq!(e.variable_count(), 2184);
    }

    #[test]
    fn test_family_counts_match_emission() {
        for n in 2..=9 {
            let squares = n * n;
            for (first, last) in [(1, n), (squares, 1), (n + 2, squares - 1)] {
                if first == last {
                    continue;
                }
                let e = encoding(n, first, last);
                for &f in e.families() {
                    let mut tally = ClauseTally::default();
                    e.emit_family(f, &mut tally).unwrap();
                    assert_eq!(tally.clauses, e.count_family(f), "{} on {}x{}", f, n, n);
                }
                assert_eq!(e.count_family(ConstraintFamily::LfsrTransition), 0);
            }
        }
    }

    #[test]
    fn test_cardinality_shape_per_square() {
        let e = encoding(8, 1, 8);
        let clauses = family(&e, ConstraintFamily::MoveCardinality);
        let mut offset = 0;
        for square in 0..64 {
            let moves = e.incident_moves(square);
            let d = moves.len();
            let block = if e.endpoints().is_endpoint(square) {
                let pairs = binomial(d, 2);
                let block = &clauses[offset..offset + pairs + 1];
                assert!(block[..pairs].iter().all(|c| c.literals.len() == 2));
                assert_eq!(block[pairs].literals, moves);
                block
            } else {
                let triples = binomial(d, 3);
                let block = &clauses[offset..offset + triples + d];
                assert!(block[..triples].iter().all(|c| c.literals.len() == 3));
                assert!(block[triples..].iter().all(|c| c.literals.len() == d - 1));
                block
            };
            offset += block.len();
        }
        assert_eq!(offset, clauses.len());
    }

    #[test]
    fn test_reference_cardinality_lines() {
        let e = encoding(8, 1, 8);
        let clauses = family(&e, ConstraintFamily::MoveCardinality);
        // square 0 is the first square: pairwise, then the disjunction
        assert_eq!(clauses[0].literals, vec![-1, -2]);
        assert_eq!(clauses[1].literals, vec![1, 2]);
        // square 1 is interior with three moves
        assert_eq!(clauses[2].literals, vec![-3, -4, -5]);
        assert_eq!(clauses[3].literals, vec![4, 5]);
    }

    #[test]
    fn test_order_endpoint_units() {
        let e = encoding(8, 10, 50);
        let clauses = family(&e, ConstraintFamily::OrderEndpoints);
        assert_eq!(clauses.len(), 126);
        assert!(clauses.iter().all(|c| c.is_unit()));

        let vars = e.variables();
        // squares below the first index appear negated
        assert_eq!(clauses[0].literals[0], -vars.order_var(0, 9));
        assert_eq!(clauses[9].literals[0], vars.order_var(9, 10));
        // the last square closes the order
        assert_eq!(clauses[63].literals[0], vars.order_var(0, 49));
        assert_eq!(clauses[125].literals[0], -vars.order_var(49, 63));
    }

    #[test]
    fn test_transitivity_cases() {
        let e = encoding(8, 1, 8);
        let clauses = family(&e, ConstraintFamily::Transitivity);
        assert_eq!(clauses.len(), 2 * 168 * 62);

        // move 1 is 0 - 10; k = 1 lies between them
        let vars = e.variables();
        let x = vars.order_var(0, 1);
        let y = vars.order_var(10, 1);
        assert_eq!(clauses[0].literals, vec![-1, x, y]);
        assert_eq!(clauses[1].literals, vec![-1, -x, -y]);

        // k = 11 lies outside [0, 10]; it is the 10th third square
        let x = vars.order_var(0, 11);
        let y = vars.order_var(10, 11);
        assert_eq!(clauses[18].literals, vec![-1, -x, y]);
        assert_eq!(clauses[19].literals, vec![-1, x, -y]);

        assert_eq!(clauses.last().unwrap().literals, vec![-168, 2156, -2183]);
    }

    #[test]
    fn test_transitivity_semantics() {
        // a selected move admits exactly the orders placing k on one side of both ends
        let e = encoding(4, 1, 4);
        let m = *e.graph().moves().iter().find(|m| m.to - m.from > 2).unwrap();
        let mut clauses = Vec::new();
        e.emit_move_transitivity(&m, &mut clauses).unwrap();

        let vars = e.variables();
        for k in (0..16).filter(|&k| k != m.from && k != m.to) {
            let relevant: Vec<&Clause> = clauses
                .iter()
                .filter(|c| {
                    c.literals[1].abs() == vars.order_var(m.from, k)
                        && c.literals[2].abs() == vars.order_var(m.to, k)
                })
                .collect();
            assert_eq!(relevant.len(), 2);

            // positions of (from, to, k) in a hypothetical tour
            for (pf, pt, pk) in [(0, 1, 2), (1, 2, 0), (0, 2, 1), (1, 0, 2), (2, 1, 0), (2, 0, 1)] {
                let before = |a: usize, pa: i32, b: usize, pb: i32| {
                    // truth value of order_var(a, b) = "min(a, b) first"
                    if a < b {
                        pa < pb
                    } else {
                        pb < pa
                    }
                };
                let x = before(m.from, pf, k, pk);
                let y = before(m.to, pt, k, pk);
                let ok = relevant.iter().all(|c| {
                    let lx = if c.literals[1] > 0 { x } else { !x };
                    let ly = if c.literals[2] > 0 { y } else { !y };
                    lx || ly
                });
                let k_between = (pf < pk && pk < pt) || (pt < pk && pk < pf);
                assert_eq!(ok, !k_between, "k {} positions {:?}", k, (pf, pt, pk));
            }
        }
    }
}
