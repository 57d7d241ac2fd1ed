//! Sequence-position encoding based on a linear-feedback shift register.
//!
//! Every square carries a 6-bit register. A selected move `i -> j` forces
//! `j`'s register to be one LFSR step after `i`'s, with feedback polynomial
//! 1 + x^5 + x^6 (period 63). The first square starts at the seed value and
//! the last square is pinned to the value reached after n² - 1 steps, so the
//! only chain that links them has exactly n² squares, and no detached cycle
//! shorter than the period can close on itself.

use super::constraints::{at_least_one, at_most_one, ClauseSink};
use super::counting;
use super::encoder::{ConstraintFamily, TourEncoding};
use super::variables::VariableAllocator;
use crate::board::{Board, Endpoints, Move, MoveGraph};
use crate::config::EncodingStrategy;
use crate::error::{EncodingError, Result};

/// Register width
pub const STATE_BITS: usize = 6;

/// Register value of the first square
pub const SEED: u8 = 1;

/// Length of the register cycle through all non-zero states
pub const PERIOD: usize = 63;

/// Bits XOR-ed into the top bit
const FEEDBACK_TAPS: (usize, usize) = (STATE_BITS - 2, STATE_BITS - 1);

const FAMILIES: &[ConstraintFamily] = &[
    ConstraintFamily::NonTrivialState,
    ConstraintFamily::ExactlyOneSuccessor,
    ConstraintFamily::ExactlyOnePredecessor,
    ConstraintFamily::EndpointState,
    ConstraintFamily::LfsrTransition,
];

/// One register step: bit 0 takes bit 5, bits 1..=4 shift up, bit 5 takes bit 4 XOR bit 5
pub fn step(state: u8) -> u8 {
    let (tap_a, tap_b) = FEEDBACK_TAPS;
    let top = (state >> (STATE_BITS - 1)) & 1;
    let feedback = ((state >> tap_a) ^ (state >> tap_b)) & 1;
    let shifted = (state << 1) & ((1 << (STATE_BITS - 1)) - 2);
    shifted | top | (feedback << (STATE_BITS - 1))
}

/// Register value after `steps` steps from `state`
pub fn advance(state: u8, steps: usize) -> u8 {
    (0..steps % PERIOD).fold(state, |s, _| step(s))
}

#[derive(Debug, Clone)]
pub struct LfsrEncoding {
    board: Board,
    endpoints: Endpoints,
    graph: MoveGraph,
    variables: VariableAllocator,
    final_state: u8,
}

impl LfsrEncoding {
    pub fn new(board: Board, endpoints: Endpoints) -> Result<Self> {
        let squares = board.square_count();
        if squares - 1 > PERIOD {
            return Err(EncodingError::UnsupportedBoard {
                size: board.size(),
                strategy: "lfsr",
                reason: format!(
                    "a tour needs {} register steps but the {}-bit register repeats after {}",
                    squares - 1,
                    STATE_BITS,
                    PERIOD
                ),
            });
        }

        let graph = MoveGraph::directed(board);
        let variables = VariableAllocator::for_state_bits(graph.len(), squares, STATE_BITS)?;

        Ok(Self {
            board,
            endpoints,
            graph,
            variables,
            final_state: advance(SEED, squares - 1),
        })
    }

    /// Register value pinned on the last square
    pub fn final_state(&self) -> u8 {
        self.final_state
    }

    /// Move variables that may serve as the successor of `square`
    pub fn successor_candidates(&self, square: usize) -> Vec<i32> {
        self.graph
            .outgoing(square)
            .filter(|m| m.to != self.endpoints.first)
            .map(|m| self.variables.move_var(m))
            .collect()
    }

    /// Move variables that may serve as the predecessor of `square`
    pub fn predecessor_candidates(&self, square: usize) -> Vec<i32> {
        self.graph
            .incoming(square)
            .filter(|m| m.from != self.endpoints.last)
            .map(|m| self.variables.move_var(m))
            .collect()
    }

    fn state_literal(&self, square: usize, state: u8, bit: usize) -> i32 {
        let var = self.variables.state_bit(square, bit);
        if (state >> bit) & 1 == 1 {
            var
        } else {
            -var
        }
    }

    fn emit_non_trivial_state(&self, sink: &mut dyn ClauseSink) -> Result<()> {
        for square in 0..self.board.square_count() {
            let bits: Vec<i32> = (0..STATE_BITS)
                .map(|bit| self.variables.state_bit(square, bit))
                .collect();
            sink.add_clause(&bits)?;
        }
        Ok(())
    }

    fn emit_successors(&self, sink: &mut dyn ClauseSink) -> Result<()> {
        for square in 0..self.board.square_count() {
            if square == self.endpoints.last {
                continue;
            }
            let candidates = self.successor_candidates(square);
            at_least_one(sink, &candidates)?;
            at_most_one(sink, &candidates)?;
        }
        Ok(())
    }

    fn emit_predecessors(&self, sink: &mut dyn ClauseSink) -> Result<()> {
        for square in 0..self.board.square_count() {
            if square == self.endpoints.first {
                continue;
            }
            let candidates = self.predecessor_candidates(square);
            at_least_one(sink, &candidates)?;
            at_most_one(sink, &candidates)?;
        }
        Ok(())
    }

    fn emit_endpoint_state(&self, sink: &mut dyn ClauseSink) -> Result<()> {
        let Endpoints { first, last } = self.endpoints;
        for bit in 0..STATE_BITS {
            sink.add_clause(&[self.state_literal(first, SEED, bit)])?;
            sink.add_clause(&[self.state_literal(last, self.final_state, bit)])?;
        }
        Ok(())
    }

    fn emit_transition(&self, m: &Move, sink: &mut dyn ClauseSink) -> Result<()> {
        let selected = self.variables.move_var(m);
        let src = |bit| self.variables.state_bit(m.from, bit);
        let dst = |bit| self.variables.state_bit(m.to, bit);

        // shifted bits: dst[k] <-> src[k - 1], with bit 0 reading the top bit
        for bit in 0..STATE_BITS - 1 {
            let feed = if bit == 0 { STATE_BITS - 1 } else { bit - 1 };
            sink.add_clause(&[-selected, dst(bit), -src(feed)])?;
            sink.add_clause(&[-selected, -dst(bit), src(feed)])?;
        }

        // feedback bit: dst[5] <-> src[4] xor src[5]
        let out = dst(STATE_BITS - 1);
        let (a, b) = (src(FEEDBACK_TAPS.0), src(FEEDBACK_TAPS.1));
        sink.add_clause(&[-selected, -out, -a, -b])?;
        sink.add_clause(&[-selected, out, a, -b])?;
        sink.add_clause(&[-selected, out, -a, b])?;
        sink.add_clause(&[-selected, -out, a, b])?;
        Ok(())
    }

    fn emit_transitions(&self, sink: &mut dyn ClauseSink) -> Result<()> {
        for m in self.graph.moves() {
            self.emit_transition(m, sink)?;
        }
        Ok(())
    }
}

impl TourEncoding for LfsrEncoding {
    fn strategy(&self) -> EncodingStrategy {
        EncodingStrategy::Lfsr
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
        match family {
            ConstraintFamily::NonTrivialState => {
                counting::non_trivial_state(self.board.square_count())
            }
            ConstraintFamily::ExactlyOneSuccessor => {
                counting::successor_constraints(&self.graph, &self.endpoints)
            }
            ConstraintFamily::ExactlyOnePredecessor => {
                counting::predecessor_constraints(&self.graph, &self.endpoints)
            }
            ConstraintFamily::EndpointState => counting::endpoint_state(STATE_BITS),
            ConstraintFamily::LfsrTransition => {
                counting::lfsr_transition(self.graph.len(), STATE_BITS)
            }
            _ => 0,
        }
    }

    fn emit_family(&self, family: ConstraintFamily, sink: &mut dyn ClauseSink) -> Result<()> {
        match family {
            ConstraintFamily::NonTrivialState => self.emit_non_trivial_state(sink),
            ConstraintFamily::ExactlyOneSuccessor => self.emit_successors(sink),
            ConstraintFamily::ExactlyOnePredecessor => self.emit_predecessors(sink),
            ConstraintFamily::EndpointState => self.emit_endpoint_state(sink),
            ConstraintFamily::LfsrTransition => self.emit_transitions(sink),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::constraints::{Clause, ClauseTally};

    fn encoding(n: usize, first: usize, last: usize) -> LfsrEncoding {
        let board = Board::new(n).unwrap();
        let endpoints = Endpoints::from_one_based(&board, first, last).unwrap();
        LfsrEncoding::new(board, endpoints).unwrap()
    }

    fn family(e: &LfsrEncoding, f: ConstraintFamily) -> Vec<Clause> {
        let mut clauses = Vec::new();
        e.emit_family(f, &mut clauses).unwrap();
        clauses
    }

    #[test]
    fn test_register_step() {
        assert_eq!(step(0b000001), 0b000010);
        assert_eq!(step(0b010000), 0b100000);
        // top bit wraps into bit 0 and feeds back into itself
        assert_eq!(step(0b100000), 0b100001);
        assert_eq!(step(0b110000), 0b000001);
        assert_eq!(step(0), 0);
    }

    #[test]
    fn test_register_period() {
        let mut state = SEED;
        let mut seen = vec![state];
        for _ in 0..PERIOD {
            state = step(state);
            seen.push(state);
        }
        assert_eq!(state, SEED);
        let mut distinct = seen[..PERIOD].to_vec();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), PERIOD);
        assert!(!distinct.contains(&0));

        assert_eq!(advance(SEED, 63), SEED);
        assert_eq!(advance(SEED, 24), 45);
        assert_eq!(advance(SEED, 24 + 63), 45);
    }

    #[test]
    fn test_large_boards_rejected() {
        let board = Board::new(9).unwrap();
        let endpoints = Endpoints::default_for(&board);
        assert!(matches!(
            LfsrEncoding::new(board, endpoints),
            Err(EncodingError::UnsupportedBoard { size: 9, .. })
        ));
    }

    #[test]
    fn test_family_counts_match_emission() {
        for n in 2..=8 {
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
                assert_eq!(e.count_family(ConstraintFamily::Transitivity), 0);
            }
        }
    }

    #[test]
    fn test_exactly_one_successor_shape() {
        let e = encoding(8, 1, 8);
        let clauses = family(&e, ConstraintFamily::ExactlyOneSuccessor);
        // square 0: moves to 10 and 17
        assert_eq!(clauses[0].literals, vec![1, 2]);
        assert_eq!(clauses[1].literals, vec![-1, -2]);

        // every square but the last contributes 1 + d(d-1)/2 clauses
        let mut offset = 0;
        for square in 0..64 {
            if square == 7 {
                continue;
            }
            let d = e.successor_candidates(square).len();
            assert_eq!(clauses[offset].literals, e.successor_candidates(square));
            let pairs = &clauses[offset + 1..offset + 1 + d * (d - 1) / 2];
            assert!(pairs.iter().all(|c| c.literals.len() == 2 && c.literals.iter().all(|&l| l < 0)));
            offset += 1 + d * (d - 1) / 2;
        }
        assert_eq!(offset, clauses.len());
    }

    #[test]
    fn test_candidates_exclude_endpoints() {
        let e = encoding(8, 1, 8);
        let into_first = e.graph().find(10, 0).unwrap();
        assert!(!e.successor_candidates(10).contains(&e.variables().move_var(into_first)));
        let out_of_last = e.graph().find(7, 13).unwrap();
        assert!(!e.predecessor_candidates(13).contains(&e.variables().move_var(out_of_last)));
    }

    #[test]
    fn test_endpoint_pins() {
        let e = encoding(8, 1, 8);
        let clauses = family(&e, ConstraintFamily::EndpointState);
        let lits: Vec<i32> = clauses.iter().map(|c| c.literals[0]).collect();
        assert_eq!(lits, vec![337, 379, -338, -380, -339, -381, -340, -382, -341, -383, -342, -384]);

        // a 5x5 tour takes 24 steps; the last register is pinned to 45 = 0b101101
        let e = encoding(5, 1, 13);
        assert_eq!(e.final_state(), 45);
        let clauses = family(&e, ConstraintFamily::EndpointState);
        let last: Vec<i32> = clauses.iter().skip(1).step_by(2).map(|c| c.literals[0]).collect();
        let base = e.variables().state_bit(12, 0);
        assert_eq!(last, vec![base, -(base + 1), base + 2, base + 3, -(base + 4), base + 5]);
    }

    #[test]
    fn test_transition_clauses() {
        let e = encoding(8, 1, 8);
        let clauses = family(&e, ConstraintFamily::LfsrTransition);
        assert_eq!(clauses.len(), 14 * 336);
        // move 1 is 0 -> 10; bit 0 of square 10 copies bit 5 of square 0
        assert_eq!(clauses[0].literals, vec![-1, 397, -342]);
        assert_eq!(clauses[1].literals, vec![-1, -397, 342]);
        assert_eq!(clauses[10].literals, vec![-1, -402, -341, -342]);
        assert!(clauses.iter().all(|c| c.literals[0] < 0));
    }

    #[test]
    fn test_transition_semantics() {
        // with the move selected, the clauses admit exactly dst = step(src)
        let e = encoding(8, 1, 8);
        let m = e.graph().moves()[0];
        let clauses = &family(&e, ConstraintFamily::LfsrTransition)[..14];
        for src in 0u8..64 {
            for dst in 0u8..64 {
                let value = |lit: i32| {
                    let var = lit.unsigned_abs() as i32;
                    let set = if var == 1 {
                        true
                    } else {
                        let from_bit = (0..STATE_BITS).find(|&b| e.variables().state_bit(m.from, b) == var);
                        let to_bit = (0..STATE_BITS).find(|&b| e.variables().state_bit(m.to, b) == var);
                        match (from_bit, to_bit) {
                            (Some(b), _) => (src >> b) & 1 == 1,
                            (_, Some(b)) => (dst >> b) & 1 == 1,
                            _ => unreachable!(),
                        }
                    };
                    if lit > 0 {
                        set
                    } else {
                        !set
                    }
                };
                let satisfied = clauses.iter().all(|c| c.literals.iter().any(|&l| value(l)));
                assert_eq!(satisfied, dst == step(src), "src {:06b} dst {:06b}", src, dst);
            }
        }
    }
}
