//! Configuration settings for the CNF generator

use crate::board::{Board, Endpoints};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub board: BoardConfig,
    pub encoding: EncodingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: usize,
    /// 1-based first square
    pub first: usize,
    /// 1-based last square; the top-right corner when absent
    #[serde(default)]
    pub last: Option<usize>,
}

impl BoardConfig {
    pub fn board(&self) -> crate::error::Result<Board> {
        Board::new(self.size)
    }

    pub fn endpoints(&self, board: &Board) -> crate::error::Result<Endpoints> {
        let last = self.last.unwrap_or(board.size());
        Endpoints::from_one_based(board, self.first, last)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EncodingStrategy {
    /// Sequence positions as LFSR register states
    Lfsr,
    /// Pairwise order variables with transitivity clauses
    Order,
}

impl std::fmt::Display for EncodingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingStrategy::Lfsr => f.write_str("lfsr"),
            EncodingStrategy::Order => f.write_str("order"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub strategy: EncodingStrategy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write the CNF here instead of standard output
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Prefix the formula with `c` comment lines
    #[serde(default)]
    pub comments: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig {
                size: 8,
                first: 1,
                last: None,
            },
            encoding: EncodingConfig {
                strategy: EncodingStrategy::Lfsr,
            },
            output: OutputConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        let board = self.board.board().context("Invalid board size")?;
        self.board
            .endpoints(&board)
            .context("Invalid tour endpoints")?;

        if self.encoding.strategy == EncodingStrategy::Lfsr && board.square_count() > 64 {
            anyhow::bail!(
                "The lfsr encoding supports boards up to 8x8, got {}; use the order encoding",
                board
            );
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(size) = cli_overrides.size {
            self.board.size = size;
        }
        if let Some(first) = cli_overrides.first {
            self.board.first = first;
        }
        if let Some(last) = cli_overrides.last {
            self.board.last = Some(last);
        }
        if let Some(strategy) = cli_overrides.strategy {
            self.encoding.strategy = strategy;
        }
        if let Some(ref output) = cli_overrides.output {
            self.output.path = Some(output.clone());
        }
        if cli_overrides.comments {
            self.output.comments = true;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub size: Option<usize>,
    pub first: Option<usize>,
    pub last: Option<usize>,
    pub strategy: Option<EncodingStrategy>,
    pub output: Option<PathBuf>,
    pub comments: bool,
}
