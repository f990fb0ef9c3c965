//! clang-vim
//!
//! A libclang binding for Vim. The library is loaded into the editor and
//! called through `libcall()`: every exported `vim_clang_*` function takes
//! one argument string, parses the named file with libclang, inspects the
//! result, and answers with a Vim dictionary or list literal.
//!
//! # Overview
//!
//! This library provides:
//! - decoding of the `file:flags` and `file:flags:line:col` argument strings
//! - filtered AST extraction and point queries (extents, related cursors,
//!   types with `auto` deduction, names, comments, includes)
//! - tokens, completion, diagnostics and compile command lookup
//! - the vimson serializer the editor evaluates
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐  libcall()   ┌──────────────────┐
//! │       Vim       │─────────────►│  vim::registry   │
//! └─────────────────┘  C string    │ vim_clang_* ABI  │
//!                                  └────────┬─────────┘
//!                                           │ Query
//!                                    ┌──────▼──────┐
//!                                    │   query::*  │──► vimson
//!                                    └──────┬──────┘
//!                                           │
//!                                    ┌──────▼──────┐
//!                                    │   clang::*  │  RAII over clang-sys
//!                                    └──────┬──────┘
//!                                           │ runtime-loaded
//!                                    ┌──────▼──────┐
//!                                    │  libclang   │
//!                                    └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`args`] - Argument string decoding
//! - [`clang`] - Safe libclang wrappers
//! - [`config`] - Runtime configuration
//! - [`error`] - Error types for the entire crate
//! - [`query`] - The queries behind the entry points
//! - [`vim`] - The exported C ABI
//! - [`vimson`] - The record serializer
//!
//! # Example
//!
//! ```no_run
//! use clang_vim::vim::registry::lookup;
//!
//! let entry = lookup("vim_clang_get_function_extent_at_specific_location").unwrap();
//! let extent = entry.call("src/main.cpp:-std=c++17:12:5");
//! println!("{extent}");
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are too strict
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]

pub mod args;
pub mod clang;
pub mod config;
pub mod error;
pub mod query;
pub mod vim;
pub mod vimson;

// Re-export commonly used types at the crate root
pub use args::{CompileArgs, LocationArgs};
pub use config::Config;
pub use error::{Error, Result};
pub use query::Query;
