//! SAT encoding components for open knight's tours

pub mod constraints;
pub mod counting;
pub mod dimacs;
pub mod encoder;
pub mod encoder_factory;
pub mod lfsr;
pub mod order;
pub mod variables;

pub use constraints::{Clause, ClauseSink, ClauseTally};
pub use dimacs::DimacsWriter;
pub use encoder::{ConstraintFamily, EncodingStatistics, SatEncoder, TourEncoding};
pub use encoder_factory::TourEncoder;
pub use lfsr::LfsrEncoding;
pub use order::OrderEncoding;
pub use variables::VariableAllocator;
