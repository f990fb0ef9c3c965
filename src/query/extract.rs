//! Filtered AST extraction.
//!
//! The walk visits the whole tree below the translation unit. An extraction
//! policy decides which cursors are looked at at all; a cursor the policy
//! rejects is skipped together with its subtree. A node filter then decides
//! which of the remaining cursors are emitted. Emitted nodes nest: each one
//! carries the emitted nodes below it in `'children'`, whether or not the
//! cursors in between matched.

use tracing::debug;

use super::{QueryResult, with_unit};
use crate::args::CompileArgs;
use crate::clang::{ChildVisit, Cursor, ParseOptions};
use crate::vimson;

/// Which cursors the walk looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPolicy {
    /// Every cursor.
    All,
    /// Cursors outside system headers.
    NonSystemHeaders,
    /// Cursors located in the main file.
    CurrentFile,
}

impl ExtractionPolicy {
    /// All policies, in entry point order.
    pub const ALL: [Self; 3] = [Self::All, Self::CurrentFile, Self::NonSystemHeaders];

    /// Suffix of the entry point names using this policy.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::All => "",
            Self::NonSystemHeaders => "_non_system_headers",
            Self::CurrentFile => "_current_file",
        }
    }

    fn admits(self, cursor: &Cursor<'_>) -> bool {
        match self {
            Self::All => true,
            Self::NonSystemHeaders => !cursor.location().is_in_system_header(),
            Self::CurrentFile => cursor.location().is_from_main_file(),
        }
    }
}

/// Which cursors are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFilter {
    All,
    Declarations,
    Attributes,
    Expressions,
    Preprocessings,
    References,
    Statements,
    TranslationUnits,
    Definitions,
    VirtualMemberFunctions,
    PureVirtualMemberFunctions,
    StaticMemberFunctions,
}

impl NodeFilter {
    /// All filters, in entry point order.
    pub const ALL: [Self; 12] = [
        Self::All,
        Self::Declarations,
        Self::Attributes,
        Self::Expressions,
        Self::Preprocessings,
        Self::References,
        Self::Statements,
        Self::TranslationUnits,
        Self::Definitions,
        Self::VirtualMemberFunctions,
        Self::PureVirtualMemberFunctions,
        Self::StaticMemberFunctions,
    ];

    /// The filter's part of the entry point names.
    pub fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Declarations => "declarations",
            Self::Attributes => "attributes",
            Self::Expressions => "expressions",
            Self::Preprocessings => "preprocessings",
            Self::References => "references",
            Self::Statements => "statements",
            Self::TranslationUnits => "translation_units",
            Self::Definitions => "definitions",
            Self::VirtualMemberFunctions => "virtual_member_functions",
            Self::PureVirtualMemberFunctions => "pure_virtual_member_functions",
            Self::StaticMemberFunctions => "static_member_functions",
        }
    }

    /// True when `cursor` should be emitted.
    pub fn matches(self, cursor: &Cursor<'_>) -> bool {
        match self {
            Self::All => true,
            Self::Declarations => cursor.is_declaration(),
            Self::Attributes => cursor.is_attribute(),
            Self::Expressions => cursor.is_expression(),
            Self::Preprocessings => cursor.is_preprocessing(),
            Self::References => cursor.is_reference(),
            Self::Statements => cursor.is_statement(),
            Self::TranslationUnits => cursor.is_translation_unit(),
            Self::Definitions => cursor.is_definition(),
            Self::VirtualMemberFunctions => cursor.is_virtual_method(),
            Self::PureVirtualMemberFunctions => cursor.is_pure_virtual_method(),
            Self::StaticMemberFunctions => cursor.is_static_method(),
        }
    }
}

/// Extracts the matching nodes of the file named by `input`
/// (`"<path>:<flags>"`) as `{'root':[...]}`.
///
/// ## Errors
/// Fails on malformed arguments or when the file cannot be parsed.
pub fn extract_nodes(input: &str, policy: ExtractionPolicy, filter: NodeFilter) -> QueryResult {
    let args = CompileArgs::parse(input)?;
    with_unit(&args, ParseOptions::default(), |unit| {
        let mut out = String::new();
        let emitted = walk(unit.cursor(), policy, filter, &mut out);
        debug!(?policy, ?filter, emitted, "extraction finished");
        Ok(Some(format!("{{'root':[{out}]}}")))
    })
}

/// Writes the matching nodes below `parent` to `out`, returning how many
/// were emitted.
fn walk(parent: Cursor<'_>, policy: ExtractionPolicy, filter: NodeFilter, out: &mut String) -> usize {
    let mut emitted = 0;
    parent.visit_children(|cursor, parent| {
        if !policy.admits(&cursor) {
            return ChildVisit::Continue;
        }

        let matched = filter.matches(&cursor);
        if matched {
            out.push('{');
            out.push_str(vimson::cursor_record(&cursor, &parent).as_str());
            out.push_str("'children':[");
            emitted += 1;
        }
        emitted += walk(cursor, policy, filter, out);
        if matched {
            out.push_str("]},");
        }
        ChildVisit::Continue
    });
    emitted
}
