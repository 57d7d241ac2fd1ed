//! Knight move enumeration

use super::Board;
use log::debug;
use serde::{Deserialize, Serialize};

/// Whether `a -> b` and `b -> a` are distinct moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Directed,
    Undirected,
}

/// A legal knight move. `id` is 1-based and follows enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub id: usize,
}

impl Move {
    /// The square at the other end of the move, seen from `square`
    pub fn other(&self, square: usize) -> usize {
        if self.from == square {
            self.to
        } else {
            self.from
        }
    }
}

/// All legal knight moves of a board plus per-square adjacency.
///
/// Moves are enumerated row-major over ordered pairs `(a, b)`. The directed
/// graph keeps every legal pair; the undirected graph keeps only `a < b`, so
/// an undirected move is both "outgoing" from its lower square and
/// "incoming" to its higher one.
#[derive(Debug, Clone)]
pub struct MoveGraph {
    board: Board,
    kind: MoveKind,
    moves: Vec<Move>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl MoveGraph {
    pub fn new(board: Board, kind: MoveKind) -> Self {
        let squares = board.square_count();
        let mut moves = Vec::new();
        let mut outgoing = vec![Vec::new(); squares];
        let mut incoming = vec![Vec::new(); squares];

        for from in 0..squares {
            for to in 0..squares {
                if kind == MoveKind::Undirected && from >= to {
                    continue;
                }
                if !board.is_knight_move(from, to) {
                    continue;
                }
                let index = moves.len();
                moves.push(Move {
                    from,
                    to,
                    id: index + 1,
                });
                outgoing[from].push(index);
                incoming[to].push(index);
            }
        }

        debug!("Enumerated {} {:?} knight moves on a {} board", moves.len(), kind, board);

        Self {
            board,
            kind,
            moves,
            outgoing,
            incoming,
        }
    }

    /// Every ordered pair is a separate move
    pub fn directed(board: Board) -> Self {
        Self::new(board, MoveKind::Directed)
    }

    /// One move per unordered pair
    pub fn undirected(board: Board) -> Self {
        Self::new(board, MoveKind::Undirected)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Moves leaving `square`, ordered by target square
    pub fn outgoing(&self, square: usize) -> impl Iterator<Item = &Move> + '_ {
        self.outgoing[square].iter().map(move |&i| &self.moves[i])
    }

    /// Moves entering `square`, ordered by source square
    pub fn incoming(&self, square: usize) -> impl Iterator<Item = &Move> + '_ {
        self.incoming[square].iter().map(move |&i| &self.moves[i])
    }

    /// Every move touching `square`, ordered by the square at the other end.
    ///
    /// In the undirected graph incoming moves come from lower squares and
    /// outgoing moves go to higher ones, so chaining them keeps the order.
    /// The directed graph lists both directions of each neighbour.
    pub fn incident(&self, square: usize) -> Vec<&Move> {
        let mut incident: Vec<&Move> = self.incoming(square).chain(self.outgoing(square)).collect();
        if self.kind == MoveKind::Directed {
            incident.sort_by_key(|m| (m.other(square), m.id));
        }
        incident
    }

    /// Number of moves touching `square`
    pub fn degree(&self, square: usize) -> usize {
        self.outgoing[square].len() + self.incoming[square].len()
    }

    /// Look up the move `from -> to` (either orientation for undirected graphs)
    pub fn find(&self, from: usize, to: usize) -> Option<&Move> {
        let (a, b) = match self.kind {
            MoveKind::Undirected if from > to => (to, from),
            _ => (from, to),
        };
        self.outgoing(a).find(|m| m.to == b)
    }
}
