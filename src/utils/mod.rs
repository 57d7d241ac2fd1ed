//! Shared output helpers

pub mod display;

pub use display::{Color, ColorOutput, TourFormatter, TourReport};
