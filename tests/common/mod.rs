//! Common test helpers and utilities.

#![allow(dead_code)]

pub mod temp_workspace;

// Re-export for convenience
pub use temp_workspace::TestWorkspace;

/// Flags used by every fixture; no system headers are needed.
pub const FLAGS: &str = "-std=c++14";

/// True when libclang can be loaded on this thread.
///
/// Tests that parse code return early without it, so the suite still runs
/// on machines without an LLVM installation.
pub fn libclang_available() -> bool {
    match clang_vim::clang::ensure_loaded() {
        Ok(()) => true,
        Err(e) => {
            eprintln!("skipping: {e}");
            false
        }
    }
}

