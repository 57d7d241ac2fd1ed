//! Board geometry and knight move enumeration

pub mod geometry;
pub mod moves;

pub use geometry::{parse_square_argument, Board, Endpoints};
pub use moves::{Move, MoveGraph, MoveKind};
