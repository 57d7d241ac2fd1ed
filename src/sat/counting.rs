//! Closed-form clause counts.
//!
//! The DIMACS header is written before the first clause, so every
//! constraint family has a counting function here that mirrors its emission
//! routine without materialising any clause.

use crate::board::{Endpoints, MoveGraph};

/// Binomial coefficient C(n, k)
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// One disjunction plus pairwise exclusions
pub fn exactly_one(degree: usize) -> usize {
    1 + binomial(degree, 2)
}

/// `degree` "at least two" clauses plus every forbidden 3-subset
pub fn exactly_two(degree: usize) -> usize {
    degree + binomial(degree, 3)
}

/// One clause per square forbidding the all-zero register
pub fn non_trivial_state(squares: usize) -> usize {
    squares
}

/// Outgoing moves of `square` that may be selected as its successor
pub fn successor_degree(graph: &MoveGraph, endpoints: &Endpoints, square: usize) -> usize {
    graph
        .outgoing(square)
        .filter(|m| m.to != endpoints.first)
        .count()
}

/// Incoming moves of `square` that may be selected as its predecessor
pub fn predecessor_degree(graph: &MoveGraph, endpoints: &Endpoints, square: usize) -> usize {
    graph
        .incoming(square)
        .filter(|m| m.from != endpoints.last)
        .count()
}

/// Exactly-one-successor for every square except the last
pub fn successor_constraints(graph: &MoveGraph, endpoints: &Endpoints) -> usize {
    (0..graph.board().square_count())
        .filter(|&s| s != endpoints.last)
        .map(|s| exactly_one(successor_degree(graph, endpoints, s)))
        .sum()
}

/// Exactly-one-predecessor for every square except the first
pub fn predecessor_constraints(graph: &MoveGraph, endpoints: &Endpoints) -> usize {
    (0..graph.board().square_count())
        .filter(|&s| s != endpoints.first)
        .map(|s| exactly_one(predecessor_degree(graph, endpoints, s)))
        .sum()
}

/// Unit clauses pinning both endpoint registers
pub fn endpoint_state(bits: usize) -> usize {
    2 * bits
}

/// Two clauses per shifted bit, four for the XOR feedback bit, per move
pub fn lfsr_transition(moves: usize, bits: usize) -> usize {
    moves * (2 * (bits - 1) + 4)
}

/// Exactly two incident moves for interior squares, exactly one for endpoints
pub fn move_cardinality(graph: &MoveGraph, endpoints: &Endpoints) -> usize {
    (0..graph.board().square_count())
        .map(|s| {
            let degree = graph.degree(s);
            if endpoints.is_endpoint(s) {
                exactly_one(degree)
            } else {
                exactly_two(degree)
            }
        })
        .sum()
}

/// First square precedes everything, everything precedes the last square
pub fn order_endpoints(squares: usize) -> usize {
    2 * (squares - 1)
}

/// Two clauses per move and per third square
pub fn transitivity(moves: usize, squares: usize) -> usize {
    2 * moves * (squares - 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(8, 2), 28);
        assert_eq!(binomial(8, 3), 56);
        assert_eq!(binomial(2, 3), 0);
        assert_eq!(binomial(0, 0), 1);
        assert_eq!(binomial(64, 2), 2016);
    }

    #[test]
    fn test_cardinality_formulas() {
        assert_eq!(exactly_one(0), 1);
        assert_eq!(exactly_one(2), 2);
        assert_eq!(exactly_one(8), 29);
        assert_eq!(exactly_two(0), 0);
        assert_eq!(exactly_two(2), 2);
        assert_eq!(exactly_two(8), 64);
    }

    #[test]
    fn test_standard_board_lfsr_totals() {
        let board = Board::new(8).unwrap();
        let graph = MoveGraph::directed(board);
        let endpoints = Endpoints::default_for(&board);

        let total = non_trivial_state(64)
            + successor_constraints(&graph, &endpoints)
            + predecessor_constraints(&graph, &endpoints)
            + endpoint_state(6)
            + lfsr_transition(graph.len(), 6);
        assert_eq!(total, 6556);
        assert_eq!(lfsr_transition(graph.len(), 6), 14 * 336);
    }

    #[test]
    fn test_standard_board_order_totals() {
        let board = Board::new(8).unwrap();
        let graph = MoveGraph::undirected(board);
        let endpoints = Endpoints::default_for(&board);

        let total = move_cardinality(&graph, &endpoints)
            + order_endpoints(64)
            + transitivity(graph.len(), 64);
        assert_eq!(total, 22598);
    }

    #[test]
    fn test_successor_degree_excludes_first_square() {
        let board = Board::new(8).unwrap();
        let graph = MoveGraph::directed(board);
        let endpoints = Endpoints::default_for(&board);
        // square 10 can jump to 0, which is the fixed first square
        assert_eq!(graph.outgoing(10).count(), 6);
        assert_eq!(successor_degree(&graph, &endpoints, 10), 5);
        // square 13 can be reached from 7, the fixed last square
        assert_eq!(graph.incoming(13).count(), 6);
        assert_eq!(predecessor_degree(&graph, &endpoints, 13), 5);
    }
}
