//! Open Knight's Tour CNF Generator
//!
//! Builds DIMACS CNF formulas whose models are open knight's tours on an
//! n x n board between two fixed squares, using either an LFSR sequence
//! encoding or a pairwise total-order encoding, and decodes solver models
//! back into tours.

pub mod board;
pub mod config;
pub mod error;
pub mod sat;
pub mod tour;
pub mod utils;

pub use board::{Board, Endpoints};
pub use config::{EncodingStrategy, Settings};
pub use error::{EncodingError, Result};
pub use sat::SatEncoder;
pub use tour::{Model, Tour};

/// Write the CNF described by `settings` to `out`
pub fn generate_cnf<W: std::io::Write>(settings: &Settings, out: W) -> Result<W> {
    SatEncoder::new(settings)?.write_cnf(out)
}
