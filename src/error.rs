// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by ingestion, storage and analytics.

use std::path::PathBuf;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record in {path} (line {line}): {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Trajectory has no points: {0}")]
    EmptyTrajectory(String),

    #[error("Schema provisioning failed: {0}")]
    Schema(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Build an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a parse error for a 1-based line of the given file.
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        AppError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Returns true if the error came from malformed input data rather than
    /// the environment (filesystem, database).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AppError::Parse { .. } | AppError::EmptyTrajectory(_)
        )
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, AppError>;
