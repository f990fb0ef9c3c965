//! Names, comments, includes and declarations around a location.

use super::{QueryResult, at_location, location::search_upward};
use crate::clang::{Cursor, ParseOptions};
use crate::vimson::Record;

/// What to look up at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Qualified name of the enclosing function: `{'name':'ns::C::foo'}`.
    CurrentFunction,
    /// Qualified name of the referenced symbol: `{'name':'E::foo'}`.
    FullName,
    /// Brief doc comment of the referenced symbol: `{'brief':'...'}`.
    Comment,
    /// The file an `#include` names: `{'file':'...'}`.
    Include,
    /// Where the referenced symbol, or the cursor's type, is declared:
    /// `{'file':'F','line':'L','col':'C',}`.
    DeducedDeclaration,
}

impl Navigation {
    fn parse_options(self) -> ParseOptions {
        match self {
            Self::Include => ParseOptions::with_preprocessing_record(),
            _ => ParseOptions::default(),
        }
    }
}

/// The referenced cursor when there is one, else `cursor` itself.
fn referenced_or_self<'tu>(cursor: Cursor<'tu>) -> Cursor<'tu> {
    let referenced = cursor.referenced();
    if referenced.is_invalid() {
        cursor
    } else {
        referenced
    }
}

/// `{'key':'value'}`, or nothing for an empty value.
fn single(key: &str, value: &str) -> Option<String> {
    (!value.is_empty()).then(|| format!("{{'{key}':'{value}'}}"))
}

fn lookup(cursor: Cursor<'_>, navigation: Navigation) -> Option<String> {
    match navigation {
        Navigation::CurrentFunction => {
            let function = search_upward(cursor, |c| c.is_function_decl())?;
            single("name", &function.qualified_name())
        }
        Navigation::FullName => single("name", &referenced_or_self(cursor).qualified_name()),
        Navigation::Comment => single("brief", &referenced_or_self(cursor).brief_comment()),
        Navigation::Include => single("file", &cursor.included_file()?.name()),
        Navigation::DeducedDeclaration => {
            let referenced = cursor.referenced();
            let declaration = if referenced.is_invalid() {
                cursor.cursor_type().declaration()
            } else {
                referenced
            };
            if declaration.is_invalid() {
                return None;
            }
            let position = declaration.location().spelling_position();
            let record = Record::new()
                .string("file", &position.file)
                .string("line", &position.line.to_string())
                .string("col", &position.column.to_string());
            (!record.is_empty()).then(|| record.braced())
        }
    }
}

/// Runs `navigation` at the location named by `input`.
pub fn navigate(input: &str, navigation: Navigation) -> QueryResult {
    at_location(input, navigation.parse_options(), |_, cursor| {
        Ok(lookup(cursor, navigation))
    })
}
