//! The C ABI surface consumed by Vim's `libcall()`.
//!
//! - `registry`: the name and [`Query`](crate::query::Query) of every entry
//!   point, and the exported `vim_clang_*` symbols themselves
//! - `exports`: the boundary machinery shared by all exports (input
//!   decoding, panic containment, result slots)
//!
//! `libcall()` gives a library no way to configure logging, so the first
//! exported call installs a stderr subscriber when `CLANG_VIM_LOG` holds a
//! filter directive (e.g. `CLANG_VIM_LOG=clang_vim=debug`). Without it the
//! library stays silent.

pub mod exports;
pub mod registry;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub use registry::{ENTRY_POINTS, EntryPoint};

/// Environment variable holding the library's log filter.
pub const LOG_ENV: &str = "CLANG_VIM_LOG";

/// Installs the library's log subscriber, once per process.
pub(crate) fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let Ok(directives) = std::env::var(LOG_ENV) else {
            return;
        };
        let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));
        // Another subscriber (e.g. the CLI's) takes precedence.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(true)
            .try_init();
    });
}
