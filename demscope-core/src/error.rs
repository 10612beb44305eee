//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Inspector
//!
//! Errors from the parser boundary and config loading.
//! Filtering never produces an `AppError`: an invalid regex is reported as a
//! [`crate::search::RegexError`] value instead.

use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Demo file could not be read. Fatal to the session.
    #[error("Failed to read demo file {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Parser could not be constructed from the file contents. Fatal to the session.
    #[error("Failed to construct parser: {0}")]
    ParserInit(String),

    #[error("Seek to tick {tick} failed: {reason}")]
    Seek { tick: i32, reason: String },

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Config file exists but could not be read.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AppError {
    pub fn file_read<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub fn parser_init<S: Into<String>>(reason: S) -> Self {
        Self::ParserInit(reason.into())
    }

    pub fn seek_failed<S: Into<String>>(tick: i32, reason: S) -> Self {
        Self::Seek {
            tick,
            reason: reason.into(),
        }
    }

    /// True for errors after which the current session cannot continue.
    #[must_use]
    pub const fn is_fatal_to_session(&self) -> bool {
        matches!(self, Self::FileRead { .. } | Self::ParserInit(_))
    }
}
