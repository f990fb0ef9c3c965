//! Decoding of the argument strings passed through the C ABI.
//!
//! The editor encodes a request in one of two compact forms:
//!
//! - `"<path>:<flags>"` for whole-file queries ([`CompileArgs`])
//! - `"<path>:<flags>:<line>:<column>"` for position queries ([`LocationArgs`])
//!
//! `<flags>` is a whitespace separated list of compiler flags (no quoting).
//! `<path>` may be written as `"<real>#<unsaved>"`: `<real>` stays the
//! logical identity of the file while its contents are read from
//! `<unsaved>`, which lets the editor parse a modified buffer that has not
//! been written yet.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ArgsError;

/// In-memory contents substituted for a file's on-disk contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsavedBuffer {
    /// Where the contents were read from.
    pub path: PathBuf,
    /// The file contents.
    pub contents: Vec<u8>,
}

impl UnsavedBuffer {
    /// Reads the buffer eagerly from `path`.
    ///
    /// ## Errors
    /// Returns [`ArgsError::UnsavedRead`] if the file cannot be read.
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, ArgsError> {
        let path = path.into();
        match std::fs::read(&path) {
            Ok(contents) => Ok(Self { path, contents }),
            Err(source) => Err(ArgsError::UnsavedRead { path, source }),
        }
    }
}

/// A file plus the compiler flags to parse it with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileArgs {
    /// Logical path of the file; this is what libclang reports in locations.
    pub file: String,
    /// Compiler flags.
    pub flags: Vec<String>,
    /// Contents to use instead of what is on disk.
    pub unsaved: Option<UnsavedBuffer>,
}

impl CompileArgs {
    /// Decodes `"<path>:<flags>"`.
    ///
    /// ## Errors
    /// Fails when there is no `:`, when the path is empty, or when the
    /// unsaved buffer cannot be read.
    pub fn parse(input: &str) -> Result<Self, ArgsError> {
        let (path, flags) = input
            .split_once(':')
            .ok_or_else(|| ArgsError::MissingSeparator(input.to_string()))?;
        Self::from_parts(path, flags)
    }

    fn from_parts(path: &str, flags: &str) -> Result<Self, ArgsError> {
        let (file, unsaved_path) = match path.split_once('#') {
            Some((real, unsaved)) => (real, Some(unsaved)),
            None => (path, None),
        };
        if file.is_empty() {
            return Err(ArgsError::MissingFile);
        }

        let unsaved = match unsaved_path {
            Some(unsaved) if !unsaved.is_empty() => Some(UnsavedBuffer::read(unsaved)?),
            _ => None,
        };

        Ok(Self {
            file: file.to_string(),
            flags: split_flags(flags),
            unsaved,
        })
    }

    /// Returns the logical file path.
    pub fn path(&self) -> &Path {
        Path::new(&self.file)
    }

    /// True for the sentinel produced by [`CompileArgs::default`].
    pub fn is_empty(&self) -> bool {
        self.file.is_empty()
    }

    /// Size of the main file's contents, preferring the unsaved buffer.
    pub fn content_len(&self) -> Option<u64> {
        match &self.unsaved {
            Some(buffer) => u64::try_from(buffer.contents.len()).ok(),
            None => std::fs::metadata(&self.file).ok().map(|m| m.len()),
        }
    }
}

impl fmt::Display for CompileArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.flags.join(" "))
    }
}

/// A file, its flags and a 1-based position inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationArgs {
    /// The file and its flags.
    pub compile: CompileArgs,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl LocationArgs {
    /// Decodes `"<path>:<flags>:<line>:<column>"`.
    ///
    /// The path ends at the first `:`. Line and column are the last two
    /// `:`-separated fields; everything in between is the flag list, so a
    /// flag may itself contain `:`. `"<path>:<line>:<column>"` is accepted
    /// as a request without flags.
    ///
    /// ## Errors
    /// Fails on a missing separator, missing or non-numeric position, empty
    /// path, or unreadable unsaved buffer. Nothing is returned partially.
    pub fn parse(input: &str) -> Result<Self, ArgsError> {
        let (path, rest) = input
            .split_once(':')
            .ok_or_else(|| ArgsError::MissingSeparator(input.to_string()))?;
        if rest.is_empty() {
            return Err(ArgsError::MissingPosition(input.to_string()));
        }

        let mut fields = rest.rsplitn(3, ':');
        let column = fields.next();
        let line = fields.next();
        let flags = fields.next().unwrap_or("");
        let (Some(line), Some(column)) = (line, column) else {
            return Err(ArgsError::MissingPosition(input.to_string()));
        };

        let line = parse_position(line)?;
        let column = parse_position(column)?;
        let compile = CompileArgs::from_parts(path, flags)?;

        Ok(Self {
            compile,
            line,
            column,
        })
    }

    /// Decodes like [`LocationArgs::parse`] but answers any failure with the
    /// empty sentinel (empty path, line and column zero).
    pub fn parse_or_empty(input: &str) -> Self {
        Self::parse(input).unwrap_or_default()
    }

    /// True for the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.compile.is_empty()
    }
}

impl fmt::Display for LocationArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.compile, self.line, self.column)
    }
}

fn split_flags(flags: &str) -> Vec<String> {
    flags.split_whitespace().map(str::to_string).collect()
}

fn parse_position(field: &str) -> Result<u32, ArgsError> {
    field
        .trim()
        .parse()
        .map_err(|_| ArgsError::InvalidPosition(field.to_string()))
}
