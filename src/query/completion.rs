//! Code completion at a location.

use std::collections::BTreeSet;

use tracing::debug;

use super::{QueryResult, with_unit};
use crate::args::LocationArgs;
use crate::clang::ParseOptions;
use crate::clang::completion::Completions;

/// Completion candidates at the location named by `input`, sorted and
/// de-duplicated: `['a', 'b']`.
///
/// ## Errors
/// Fails on malformed arguments or when the file cannot be parsed.
pub fn complete(input: &str) -> QueryResult {
    let location = LocationArgs::parse(input)?;
    with_unit(&location.compile, ParseOptions::default(), |unit| {
        let Some(results) = Completions::at(unit, location.line, location.column) else {
            return Ok(None);
        };
        let candidates: BTreeSet<String> = results
            .typed_texts()
            .filter(|text| !text.is_empty())
            .collect();
        debug!(count = candidates.len(), "completion finished");
        if candidates.is_empty() {
            return Ok(None);
        }
        Ok(Some(format_candidates(&candidates)))
    })
}

fn format_candidates(candidates: &BTreeSet<String>) -> String {
    let joined = candidates
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("', '");
    format!("['{joined}']")
}
