//! Whole-file tokenization.

use std::fmt::Write as _;

use tracing::debug;

use super::{QueryResult, with_unit};
use crate::args::CompileArgs;
use crate::clang::ParseOptions;
use crate::clang::token::{Token, Tokens};

/// Tokenizes the whole main file named by `input` (`"<path>:<flags>"`):
/// `[{'spell':'S','kind':'K','file':'F','line':L,'column':C,'offset':O},...]`.
///
/// The file's size is taken from the unsaved buffer when there is one.
///
/// ## Errors
/// Fails on malformed arguments or when the file cannot be parsed.
pub fn tokenize(input: &str) -> QueryResult {
    let args = CompileArgs::parse(input)?;
    with_unit(&args, ParseOptions::default(), |unit| {
        let Some(file) = unit.main_file() else {
            return Ok(None);
        };
        let Some(size) = args.content_len().and_then(|len| u32::try_from(len).ok()) else {
            debug!(file = %args.file, "cannot determine file size");
            return Ok(None);
        };

        let start = unit.location_for_offset(file, 0);
        let end = unit.location_for_offset(file, size);
        if start.is_null() || end.is_null() {
            return Ok(None);
        }
        let range = unit.range(start, end);
        if range.is_null() {
            return Ok(None);
        }

        let tokens = Tokens::new(unit, range);
        debug!(count = tokens.len(), "tokenized");
        let mut out = String::from("[");
        for token in tokens.iter() {
            write_token(&mut out, &token);
        }
        out.push(']');
        Ok(Some(out))
    })
}

fn write_token(out: &mut String, token: &Token<'_>) {
    let position = token.location().file_position();
    let _ = write!(
        out,
        "{{'spell':'{}','kind':'{}','file':'{}','line':{},'column':{},'offset':{}}},",
        token.spelling(),
        token.kind().map_or("", |kind| kind.as_str()),
        position.file,
        position.line,
        position.column,
        position.offset,
    );
}
