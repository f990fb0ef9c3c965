//! Diagnostics of a file.

use super::{QueryResult, with_unit};
use crate::args::CompileArgs;
use crate::clang::ParseOptions;
use crate::clang::diagnostic::{self, Diagnostic};
use crate::vimson;

/// The diagnostics of the file named by `input` (`"<path>:<flags>"`):
/// `[{'severity': 'warning', 'line':1,'column':18,'offset':17,'file':'a.cpp',}, ]`.
///
/// Messages are not included; the editor shows the diagnostic at its
/// location.
///
/// ## Errors
/// Fails on malformed arguments or when the file cannot be parsed.
pub fn diagnostics(input: &str) -> QueryResult {
    let args = CompileArgs::parse(input)?;
    with_unit(&args, ParseOptions::default(), |unit| {
        let entries: Vec<String> = diagnostic::diagnostics(unit)
            .iter()
            .map(format_diagnostic)
            .collect();
        Ok(Some(vimson::list(entries, ", ")))
    })
}

fn format_diagnostic(diagnostic: &Diagnostic<'_>) -> String {
    tracing::trace!(message = %diagnostic.message(), "diagnostic");
    format!(
        "{{'severity': '{}', {}}}",
        diagnostic.severity().map_or("", |s| s.as_str()),
        vimson::location(&diagnostic.location())
    )
}
