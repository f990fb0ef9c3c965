//! The queries behind the exported entry points.
//!
//! Every query takes the raw argument string the editor passed, runs one
//! complete index, parse, inspect and serialize cycle, and returns
//! [`QueryResult`]:
//!
//! - `Err` when the arguments are malformed or libclang fails;
//! - `Ok(None)` when the query ran but found nothing;
//! - `Ok(Some(payload))` with the vimson payload otherwise.
//!
//! [`Query::run`] collapses the first two into the entry's sentinel.

pub mod compile_commands;
pub mod completion;
pub mod deduction;
pub mod diagnostics;
pub mod extract;
pub mod location;
pub mod navigation;
pub mod tokens;

pub use deduction::Deduction;
pub use extract::{ExtractionPolicy, NodeFilter};
pub use location::{ExtentTarget, Relation, TypeRelation};
pub use navigation::Navigation;

use tracing::{debug, debug_span, warn};

use crate::args::{CompileArgs, LocationArgs};
use crate::clang::{self, Cursor, Index, ParseOptions, ParseRequest, TranslationUnit};
use crate::config::Config;
use crate::error::Result;

/// Outcome of a query before it is collapsed for the editor.
pub type QueryResult = Result<Option<String>>;

/// Parses `args` and hands the translation unit to `f`.
///
/// Flags come from the request, else from a compilation database, else
/// from the configured defaults (see [`compile_commands::parse_flags`]).
pub(crate) fn with_unit<T, F>(args: &CompileArgs, options: ParseOptions, f: F) -> Result<T>
where
    F: FnOnce(&TranslationUnit<'_>) -> Result<T>,
{
    let config = Config::global();
    let flags = compile_commands::parse_flags(args, config);
    let index = Index::new(config.display_diagnostics)?;
    let request = ParseRequest::new(args, &flags, options)?;
    let unit = index.parse(&request)?;
    f(&unit)
}

/// Decodes a location string, parses its file and hands the cursor at the
/// location to `f`.
pub(crate) fn at_location<F>(input: &str, options: ParseOptions, f: F) -> QueryResult
where
    F: FnOnce(&TranslationUnit<'_>, Cursor<'_>) -> QueryResult,
{
    let location = LocationArgs::parse(input)?;
    with_unit(&location.compile, options, |unit| {
        match unit.cursor_at(location.line, location.column) {
            Some(cursor) => f(unit, cursor),
            None => {
                debug!(file = %location.compile.file, "file not part of the translation unit");
                Ok(None)
            }
        }
    })
}

/// Shape of the argument string a query expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// No argument.
    None,
    /// `"<path>:<flags>"`.
    File,
    /// `"<path>:<flags>:<line>:<column>"`.
    Location,
}

/// One query the editor can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// The libclang version string.
    Version,
    /// All tokens of the file.
    Tokens,
    /// Filtered AST extraction.
    Extract(ExtractionPolicy, NodeFilter),
    /// Everything known about the cursor at a location.
    LocationInformation,
    /// Extent of the cursor at a location or of an enclosing node.
    Extent(ExtentTarget),
    /// Extents of the cursor and the interesting nodes enclosing it.
    AllExtents,
    /// A cursor related to the one at a location.
    Related(Relation),
    /// A type related to the type of the cursor at a location.
    TypeOf(TypeRelation),
    /// A type with `auto` resolved.
    Deduce(Deduction),
    /// Code completion candidates.
    Completion,
    /// Compile flags from `compile_commands.json`.
    CompileCommands,
    /// Diagnostics of the file.
    Diagnostics,
    /// Names, comments and declarations around a location.
    Navigate(Navigation),
}

impl Query {
    /// What the query expects as argument.
    pub fn input_format(self) -> InputFormat {
        match self {
            Self::Version => InputFormat::None,
            Self::Tokens | Self::Extract(..) | Self::CompileCommands | Self::Diagnostics => {
                InputFormat::File
            }
            _ => InputFormat::Location,
        }
    }

    /// The payload returned when the query fails or finds nothing.
    pub fn sentinel(self) -> &'static str {
        match self {
            Self::Version => "",
            Self::Tokens | Self::AllExtents | Self::Completion | Self::Diagnostics => "[]",
            _ => "{}",
        }
    }

    /// Runs the query, keeping failures and empty results apart.
    ///
    /// ## Errors
    /// Fails on malformed arguments, when libclang is unavailable, and when
    /// the file cannot be parsed.
    pub fn execute(self, input: &str) -> QueryResult {
        match self {
            Self::Version => Ok(Some(clang::version()?)),
            Self::Tokens => tokens::tokenize(input),
            Self::Extract(policy, filter) => extract::extract_nodes(input, policy, filter),
            Self::LocationInformation => location::location_information(input),
            Self::Extent(target) => location::extent(input, target),
            Self::AllExtents => location::all_extents(input),
            Self::Related(relation) => location::related(input, relation),
            Self::TypeOf(relation) => location::related_type(input, relation),
            Self::Deduce(deduction) => deduction::deduce(input, deduction),
            Self::Completion => completion::complete(input),
            Self::CompileCommands => compile_commands::compile_commands(input),
            Self::Diagnostics => diagnostics::diagnostics(input),
            Self::Navigate(navigation) => navigation::navigate(input, navigation),
        }
    }

    /// Runs the query the way the editor sees it: any failure or empty
    /// result becomes [`Query::sentinel`].
    pub fn run(self, input: &str) -> String {
        let _span = debug_span!("query", query = ?self).entered();
        match self.execute(input) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("nothing found");
                self.sentinel().to_string()
            }
            Err(e) => {
                warn!(error = %e, input, "query failed");
                self.sentinel().to_string()
            }
        }
    }
}
