//! Configuration for the order matching runner

use std::env;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use common::error::{Error, Result};

/// How trades and resting orders are written out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[clap(author, version, about = "Match order instructions read line by line")]
pub struct Args {
    /// Read instructions from this file instead of stdin
    #[clap(short, long)]
    pub input: Option<PathBuf>,

    /// Output format
    #[clap(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging
    #[clap(short, long)]
    pub debug: bool,
}

/// Runner configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Enable debug logging
    pub debug: bool,
    /// Instruction file; stdin when absent
    pub input: Option<PathBuf>,
    /// Output format
    pub format: OutputFormat,
}

impl EngineConfig {
    /// Create a new configuration using environment variables
    ///
    /// Reads `DEBUG`, `ORDER_INPUT` and `OUTPUT_FORMAT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match lookup("OUTPUT_FORMAT") {
            Some(value) => OutputFormat::from_str(&value, true).map_err(|_| {
                Error::Configuration(format!("unknown OUTPUT_FORMAT '{}'", value))
            })?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            debug: lookup("DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            input: lookup("ORDER_INPUT")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            format,
        })
    }

    /// Command line arguments take precedence over the environment
    pub fn merge(mut self, args: &Args) -> Self {
        self.debug |= args.debug;
        if let Some(input) = &args.input {
            self.input = Some(input.clone());
        }
        if let Some(format) = args.format {
            self.format = format;
        }
        self
    }
}
