//! Configuration management for the CNF generator

pub mod settings;

pub use settings::{
    BoardConfig, CliOverrides, EncodingConfig, EncodingStrategy, OutputConfig, Settings,
};
