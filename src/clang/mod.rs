//! Safe wrappers over the libclang C API.
//!
//! This module is the only place in the crate that touches `clang-sys`
//! directly. Every opaque libclang handle is wrapped in a value that releases
//! it on `Drop`, and every value derived from a translation unit carries its
//! lifetime, so a cursor cannot outlive the unit it points into.
//!
//! # Architecture
//!
//! - `index`: [`Index`], [`ParseRequest`] and [`TranslationUnit`]
//! - `cursor`: [`Cursor`] and cursor-kind classification
//! - `types`: strings, types, files, locations and ranges
//! - `token`: whole-file tokenization
//! - `completion`: code completion results
//! - `diagnostic`: translation unit diagnostics
//! - `database`: `compile_commands.json` access
//!
//! libclang is loaded at runtime. Acquiring an [`Index`] loads it on the
//! current thread if that has not happened yet.

pub mod completion;
pub mod cursor;
pub mod database;
pub mod diagnostic;
pub mod index;
pub mod token;
pub mod types;

pub use cursor::{ChildVisit, Cursor, KindCategory};
pub use index::{Index, ParseOptions, ParseRequest, TranslationUnit};
pub use types::{File, Position, SourceLocation, SourceRange, Type};

use crate::error::ClangError;

/// Result type for libclang operations.
pub type ClangResult<T> = std::result::Result<T, ClangError>;

/// Loads libclang on the current thread unless it already is.
///
/// ## Errors
/// Returns [`ClangError::LibraryUnavailable`] when no usable libclang can be
/// found (see `LIBCLANG_PATH`).
pub fn ensure_loaded() -> ClangResult<()> {
    if clang_sys::is_loaded() {
        return Ok(());
    }
    clang_sys::load().map_err(ClangError::LibraryUnavailable)?;
    tracing::debug!("libclang loaded");
    Ok(())
}

/// Returns the libclang version string, e.g. `"clang version 17.0.6"`.
///
/// ## Errors
/// Fails when libclang cannot be loaded.
pub fn version() -> ClangResult<String> {
    ensure_loaded()?;
    // SAFETY: libclang is loaded; the returned string is owned and disposed
    // by `take_string`.
    Ok(unsafe { types::take_string(clang_sys::clang_getClangVersion()) })
}
