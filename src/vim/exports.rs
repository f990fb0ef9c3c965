//! Boundary machinery shared by the exported entry points.
//!
//! Each export returns a pointer to a NUL-terminated string owned by this
//! module. The string lives in a thread-local slot keyed by the entry
//! point's name: it stays valid until the same entry point is called again
//! on the same thread. `libcall()` copies the result immediately, so this
//! is all the editor needs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};

use tracing::error;

use crate::query::Query;

thread_local! {
    static SLOTS: RefCell<HashMap<&'static str, CString>> = RefCell::new(HashMap::new());
}

/// Runs `query` for the export `name` on a C string argument.
///
/// ## Safety
/// `input` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
pub(crate) unsafe fn call(name: &'static str, query: Query, input: *const c_char) -> *const c_char {
    // SAFETY: forwarded from the caller.
    let input = unsafe { read_input(input) };
    respond(name, query, &input)
}

/// Decodes an argument pointer; null becomes the empty string and invalid
/// UTF-8 is replaced.
///
/// ## Safety
/// Same contract as [`call`].
unsafe fn read_input(input: *const c_char) -> String {
    if input.is_null() {
        return String::new();
    }
    // SAFETY: `input` is non-null and NUL-terminated per the contract.
    unsafe { CStr::from_ptr(input) }
        .to_string_lossy()
        .into_owned()
}

/// Runs `query`, turning a panic into the sentinel, and stores the result
/// in the slot for `name`.
pub(crate) fn respond(name: &'static str, query: Query, input: &str) -> *const c_char {
    super::init_logging();
    let output = panic::catch_unwind(AssertUnwindSafe(|| query.run(input))).unwrap_or_else(|_| {
        error!(entry = name, "query panicked");
        query.sentinel().to_string()
    });
    store(name, output)
}

fn store(name: &'static str, output: String) -> *const c_char {
    let value = CString::new(output).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    SLOTS.with(|slots| {
        let mut slots = slots.borrow_mut();
        let slot = slots.entry(name).or_default();
        *slot = value;
        slot.as_ptr()
    })
}
