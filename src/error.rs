//! Error types for clang-vim.
//!
//! This module defines the error types used throughout the crate, organized
//! by subsystem: argument decoding, libclang, and configuration.
//!
//! None of these ever cross the C ABI. The exported entry points log the
//! error and answer with the entry's sentinel payload instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decoding the `file:flags[:line:col]` argument strings.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// The input has no `:` between the path and the flags.
    #[error("missing ':' after the file path in {0:?}")]
    MissingSeparator(String),

    /// The path segment is empty.
    #[error("no file path given")]
    MissingFile,

    /// The location string ends before a line and column could be read.
    #[error("missing line/column in {0:?}")]
    MissingPosition(String),

    /// The line or column is not an unsigned integer.
    #[error("invalid position component {0:?}")]
    InvalidPosition(String),

    /// The unsaved buffer named after `#` could not be read.
    #[error("failed to read unsaved buffer {}: {source}", .path.display())]
    UnsavedRead {
        /// The path that was read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to libclang itself.
#[derive(Debug, Error)]
pub enum ClangError {
    /// libclang could not be found or loaded.
    #[error("libclang is not available: {0}")]
    LibraryUnavailable(String),

    /// `clang_createIndex` returned a null index.
    #[error("failed to create a clang index")]
    IndexCreationFailed,

    /// `clang_parseTranslationUnit` returned no translation unit.
    #[error("failed to parse translation unit for {file}")]
    ParseFailed {
        /// The file that failed to parse.
        file: String,
    },

    /// A string handed to libclang contains an interior NUL byte.
    #[error("argument contains a NUL byte: {0:?}")]
    InteriorNul(String),
}

/// A unified error type for the entire crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Argument decoding error.
    #[error("argument error: {0}")]
    Args(#[from] ArgsError),

    /// libclang error.
    #[error("clang error: {0}")]
    Clang(#[from] ClangError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for clang-vim operations.
pub type Result<T> = std::result::Result<T, Error>;
