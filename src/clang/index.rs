//! Index and translation unit handles.

use std::ffi::CString;
use std::marker::PhantomData;
use std::os::raw::{c_char, c_int, c_uint, c_ulong};
use std::ptr;

use clang_sys::{
    CXFile, CXIndex, CXTranslationUnit, CXTranslationUnit_DetailedPreprocessingRecord,
    CXTranslationUnit_Flags, CXTranslationUnit_Incomplete, CXTranslationUnit_None, CXUnsavedFile,
    clang_createIndex, clang_disposeIndex, clang_disposeTranslationUnit, clang_getCursor,
    clang_getFile, clang_getLocation, clang_getLocationForOffset, clang_getRange,
    clang_getTranslationUnitCursor, clang_parseTranslationUnit,
};
use tracing::debug;

use super::types::{File, SourceLocation, SourceRange};
use super::{ClangResult, Cursor, ensure_loaded};
use crate::args::CompileArgs;
use crate::error::ClangError;

/// Parse options forwarded to `clang_parseTranslationUnit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Tolerate an incomplete unit (e.g. a header parsed on its own).
    pub incomplete: bool,
    /// Keep macro definitions, expansions and inclusion directives as cursors.
    pub detailed_preprocessing_record: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            incomplete: true,
            detailed_preprocessing_record: false,
        }
    }
}

impl ParseOptions {
    /// Default options plus a detailed preprocessing record.
    pub fn with_preprocessing_record() -> Self {
        Self {
            detailed_preprocessing_record: true,
            ..Self::default()
        }
    }

    fn bits(self) -> CXTranslationUnit_Flags {
        let mut bits = CXTranslationUnit_None;
        if self.incomplete {
            bits |= CXTranslationUnit_Incomplete;
        }
        if self.detailed_preprocessing_record {
            bits |= CXTranslationUnit_DetailedPreprocessingRecord;
        }
        bits
    }
}

/// Everything libclang needs to parse one file, as C strings.
///
/// A [`TranslationUnit`] borrows its request: libclang may keep pointers into
/// the unsaved contents for the unit's whole life.
#[derive(Debug)]
pub struct ParseRequest {
    file: CString,
    flags: Vec<CString>,
    unsaved: Option<Vec<u8>>,
    options: ParseOptions,
}

impl ParseRequest {
    /// Builds a request for `args.file`, parsed with `flags`.
    ///
    /// `flags` is passed separately from `args` so callers can substitute
    /// flags from a compilation database or the configured defaults.
    ///
    /// ## Errors
    /// Returns [`ClangError::InteriorNul`] when the path or a flag contains a
    /// NUL byte.
    pub fn new(args: &CompileArgs, flags: &[String], options: ParseOptions) -> ClangResult<Self> {
        let file = to_c_string(&args.file)?;
        let flags = flags
            .iter()
            .map(|flag| to_c_string(flag))
            .collect::<ClangResult<Vec<_>>>()?;
        Ok(Self {
            file,
            flags,
            unsaved: args.unsaved.as_ref().map(|buffer| buffer.contents.clone()),
            options,
        })
    }

    /// The logical file name.
    pub fn file_name(&self) -> String {
        self.file.to_string_lossy().into_owned()
    }

    pub(crate) fn file_ptr(&self) -> *const c_char {
        self.file.as_ptr()
    }

    /// Unsaved-file records pointing into this request.
    ///
    /// The pointers stay valid as long as `self` is alive and unmodified.
    pub(crate) fn unsaved_files(&self) -> Vec<CXUnsavedFile> {
        self.unsaved
            .iter()
            .map(|contents| CXUnsavedFile {
                Filename: self.file.as_ptr(),
                Contents: contents.as_ptr().cast::<c_char>(),
                Length: contents.len() as c_ulong,
            })
            .collect()
    }
}

fn to_c_string(value: &str) -> ClangResult<CString> {
    CString::new(value).map_err(|_| ClangError::InteriorNul(value.to_string()))
}

/// An owned `CXIndex`.
pub struct Index {
    raw: CXIndex,
}

impl Index {
    /// Creates an index that excludes declarations from precompiled headers.
    ///
    /// ## Errors
    /// Fails when libclang cannot be loaded or returns a null index.
    pub fn new(display_diagnostics: bool) -> ClangResult<Self> {
        ensure_loaded()?;
        // SAFETY: libclang is loaded.
        let raw = unsafe { clang_createIndex(1, c_int::from(display_diagnostics)) };
        if raw.is_null() {
            return Err(ClangError::IndexCreationFailed);
        }
        Ok(Self { raw })
    }

    /// Parses `request` into a translation unit bound to this index.
    ///
    /// ## Errors
    /// Returns [`ClangError::ParseFailed`] when libclang produces no unit,
    /// which is what happens for a file that does not exist.
    pub fn parse<'i>(&'i self, request: &'i ParseRequest) -> ClangResult<TranslationUnit<'i>> {
        let flag_ptrs: Vec<*const c_char> = request.flags.iter().map(|f| f.as_ptr()).collect();
        let mut unsaved = request.unsaved_files();
        debug!(
            file = %request.file_name(),
            flags = request.flags.len(),
            unsaved = !unsaved.is_empty(),
            "parsing translation unit"
        );

        let flag_count = c_int::try_from(flag_ptrs.len()).unwrap_or(c_int::MAX);
        let unsaved_count = c_uint::try_from(unsaved.len()).unwrap_or(0);
        // SAFETY: every pointer refers to data owned by `request` or the
        // locals above, all of which outlive the call.
        let raw = unsafe {
            clang_parseTranslationUnit(
                self.raw,
                request.file_ptr(),
                flag_ptrs.as_ptr(),
                flag_count,
                if unsaved.is_empty() {
                    ptr::null_mut()
                } else {
                    unsaved.as_mut_ptr()
                },
                unsaved_count,
                request.options.bits(),
            )
        };
        if raw.is_null() {
            return Err(ClangError::ParseFailed {
                file: request.file_name(),
            });
        }
        Ok(TranslationUnit {
            raw,
            request,
            _index: PhantomData,
        })
    }
}

impl Drop for Index {
    fn drop(&mut self) {
        // SAFETY: `raw` is a live index and every unit borrowing it is gone.
        unsafe { clang_disposeIndex(self.raw) };
    }
}

/// An owned `CXTranslationUnit`, borrowing its index and parse request.
pub struct TranslationUnit<'i> {
    raw: CXTranslationUnit,
    request: &'i ParseRequest,
    _index: PhantomData<&'i Index>,
}

impl<'i> TranslationUnit<'i> {
    pub(crate) fn as_raw(&self) -> CXTranslationUnit {
        self.raw
    }

    /// The request this unit was parsed from.
    pub fn request(&self) -> &'i ParseRequest {
        self.request
    }

    /// The root cursor.
    pub fn cursor(&self) -> Cursor<'_> {
        // SAFETY: `raw` is a live unit.
        Cursor::from_raw(unsafe { clang_getTranslationUnitCursor(self.raw) })
    }

    /// The main file of the unit.
    pub fn main_file(&self) -> Option<File<'_>> {
        // SAFETY: `raw` is a live unit; the name is NUL-terminated.
        File::from_raw(unsafe { clang_getFile(self.raw, self.request.file_ptr()) })
    }

    /// The location of a 1-based line and column in the main file.
    pub fn location(&self, line: u32, column: u32) -> Option<SourceLocation<'_>> {
        let file = self.main_file()?;
        // SAFETY: `file` belongs to this unit.
        let raw = unsafe { clang_getLocation(self.raw, file.as_raw(), line, column) };
        Some(SourceLocation::from_raw(raw))
    }

    /// The location of a byte offset in `file`.
    pub fn location_for_offset(&self, file: File<'_>, offset: u32) -> SourceLocation<'_> {
        let raw_file: CXFile = file.as_raw();
        // SAFETY: `file` belongs to this unit.
        SourceLocation::from_raw(unsafe { clang_getLocationForOffset(self.raw, raw_file, offset) })
    }

    /// The range between two locations of this unit.
    pub fn range(&self, start: SourceLocation<'_>, end: SourceLocation<'_>) -> SourceRange<'_> {
        // SAFETY: both locations belong to this unit.
        SourceRange::from_raw(unsafe { clang_getRange(start.as_raw(), end.as_raw()) })
    }

    /// The most specific cursor at a 1-based line and column of the main
    /// file; `None` when the main file is unknown to the unit.
    pub fn cursor_at(&self, line: u32, column: u32) -> Option<Cursor<'_>> {
        let location = self.location(line, column)?;
        // SAFETY: `location` belongs to this unit.
        Some(Cursor::from_raw(unsafe {
            clang_getCursor(self.raw, location.as_raw())
        }))
    }
}

impl Drop for TranslationUnit<'_> {
    fn drop(&mut self) {
        // SAFETY: `raw` is a live unit; no cursor can outlive `self`.
        unsafe { clang_disposeTranslationUnit(self.raw) };
    }
}
