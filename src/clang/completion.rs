//! Code completion.

use std::os::raw::c_uint;
use std::ptr;
use std::slice;

use clang_sys::{
    CXCodeCompleteResults, CXCompletionChunk_TypedText, CXCompletionResult, CXCompletionString,
    clang_codeCompleteAt, clang_defaultCodeCompleteOptions, clang_disposeCodeCompleteResults,
    clang_getCompletionChunkKind, clang_getCompletionChunkText, clang_getNumCompletionChunks,
};

use super::TranslationUnit;
use super::types::take_string;

/// Completion results owned by libclang, released on drop.
pub struct Completions<'tu> {
    raw: *mut CXCodeCompleteResults,
    _unit: &'tu TranslationUnit<'tu>,
}

impl<'tu> Completions<'tu> {
    /// Completes at a 1-based line and column of the unit's main file,
    /// forwarding the unit's unsaved buffer.
    ///
    /// Returns `None` when libclang produces no result set.
    pub fn at(unit: &'tu TranslationUnit<'tu>, line: u32, column: u32) -> Option<Self> {
        let request = unit.request();
        let mut unsaved = request.unsaved_files();
        let unsaved_count = c_uint::try_from(unsaved.len()).unwrap_or(0);
        // SAFETY: the file name and unsaved records point into `request`,
        // which outlives the call.
        let raw = unsafe {
            clang_codeCompleteAt(
                unit.as_raw(),
                request.file_ptr(),
                line,
                column,
                if unsaved.is_empty() {
                    ptr::null_mut()
                } else {
                    unsaved.as_mut_ptr()
                },
                unsaved_count,
                clang_defaultCodeCompleteOptions(),
            )
        };
        (!raw.is_null()).then_some(Self { raw, _unit: unit })
    }

    fn results(&self) -> &[CXCompletionResult] {
        // SAFETY: `raw` is non-null and owned by `self`.
        let results = unsafe { &*self.raw };
        if results.Results.is_null() {
            return &[];
        }
        // SAFETY: libclang guarantees `NumResults` entries at `Results`.
        unsafe { slice::from_raw_parts(results.Results, results.NumResults as usize) }
    }

    /// The typed text of each result: the part a user actually types.
    pub fn typed_texts(&self) -> impl Iterator<Item = String> + '_ {
        self.results()
            .iter()
            .map(|result| typed_text(result.CompletionString))
    }
}

impl Drop for Completions<'_> {
    fn drop(&mut self) {
        // SAFETY: `raw` came from `clang_codeCompleteAt`.
        unsafe { clang_disposeCodeCompleteResults(self.raw) };
    }
}

fn typed_text(completion: CXCompletionString) -> String {
    let mut text = String::new();
    // SAFETY: `completion` belongs to a live result set.
    let chunks = unsafe { clang_getNumCompletionChunks(completion) };
    for chunk in 0..chunks {
        // SAFETY: `chunk` is in bounds.
        unsafe {
            if clang_getCompletionChunkKind(completion, chunk) == CXCompletionChunk_TypedText {
                text.push_str(&take_string(clang_getCompletionChunkText(completion, chunk)));
            }
        }
    }
    text
}
