//! The Vim dictionary literal dialect ("vimson") returned to the editor.
//!
//! A record is a run of `'key':value,` pairs, in a fixed order, meant to be
//! wrapped in `{}` by the caller and evaluated by Vim script:
//!
//! ```text
//! 'spell':'bar','type':'void ()','line':1,'column':18,'offset':17,'file':'a.cpp',
//! ```
//!
//! Rules shared by every record:
//!
//! - strings are single-quoted and omitted when empty;
//! - numbers are bare;
//! - boolean flags are written as `1` when true and omitted when false.
//!
//! Values are not escaped. A spelling containing `'` produces a literal Vim
//! cannot evaluate; the editor side has always relied on this exact output.

use std::fmt::Write as _;

use crate::clang::{Cursor, Position, SourceLocation, SourceRange, Type};
use crate::clang::types::RefQualifier;

/// An ordered list of vimson key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    buf: String,
}

impl Record {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// `'key':'value',`, skipped for an empty value.
    #[must_use]
    pub fn string(mut self, key: &str, value: &str) -> Self {
        if !value.is_empty() {
            let _ = write!(self.buf, "'{key}':'{value}',");
        }
        self
    }

    /// `'key':value,`.
    #[must_use]
    pub fn number(mut self, key: &str, value: impl std::fmt::Display) -> Self {
        let _ = write!(self.buf, "'{key}':{value},");
        self
    }

    /// `'key':1,` when `value` is true.
    #[must_use]
    pub fn flag(mut self, key: &str, value: bool) -> Self {
        if value {
            let _ = write!(self.buf, "'{key}':1,");
        }
        self
    }

    /// `'key':{...},` holding another record.
    #[must_use]
    pub fn nested(mut self, key: &str, record: &Record) -> Self {
        let _ = write!(self.buf, "'{key}':{{{}}},", record.buf);
        self
    }

    /// Appends already formatted text.
    #[must_use]
    pub fn raw(mut self, text: &str) -> Self {
        self.buf.push_str(text);
        self
    }

    /// Appends all pairs of `other`.
    #[must_use]
    pub fn extend(self, other: &Record) -> Self {
        self.raw(&other.buf)
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// The record wrapped in braces: `{...}`.
    pub fn braced(&self) -> String {
        format!("{{{}}}", self.buf)
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.buf)
    }
}

/// `[a,b,c]` with `sep` written after every element.
pub fn list<I, S>(items: I, sep: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::from("[");
    for item in items {
        out.push_str(item.as_ref());
        out.push_str(sep);
    }
    out.push(']');
    out
}

/// `'line':L,'column':C,'offset':O,'file':'F',`.
pub fn position(position: &Position) -> Record {
    Record::new()
        .number("line", position.line)
        .number("column", position.column)
        .number("offset", position.offset)
        .string("file", &position.file)
}

/// A location, resolved to where its token was spelled.
pub fn location(location: &SourceLocation<'_>) -> Record {
    position(&location.spelling_position())
}

/// `'start':{...},'end':{...}`, without a trailing comma. Empty for a null
/// range.
pub fn extent(range: &SourceRange<'_>) -> String {
    if range.is_null() {
        return String::new();
    }
    extent_of_positions(
        &range.start().spelling_position(),
        &range.end().spelling_position(),
    )
}

/// [`extent`] for already resolved positions.
pub fn extent_of_positions(start: &Position, end: &Position) -> String {
    format!(
        "'start':{{{}}},'end':{{{}}}",
        position(start),
        position(end)
    )
}

/// A type: spelling, kind spelling and qualifier flags.
pub fn type_record(ty: &Type<'_>) -> Record {
    let ref_qualifier = ty.ref_qualifier();
    Record::new()
        .string("type", &ty.spelling())
        .string("type_kind", &ty.kind_spelling())
        .flag("is_const_qualified", ty.is_const_qualified())
        .flag("is_volatile_qualified", ty.is_volatile_qualified())
        .flag("is_restrict_qualified", ty.is_restrict_qualified())
        .flag("is_POD_type", ty.is_pod())
        .flag("is_lvalue", ref_qualifier == Some(RefQualifier::LValue))
        .flag("is_rvalue", ref_qualifier == Some(RefQualifier::RValue))
}

/// Everything the editor knows about a cursor. `parent` is the cursor the
/// traversal reached it from (or its semantic parent for point queries).
pub fn cursor_record(cursor: &Cursor<'_>, parent: &Cursor<'_>) -> Record {
    let category = cursor.category().as_str();
    let mut record = Record::new()
        .string("spell", &cursor.spelling())
        .extend(&type_record(&cursor.cursor_type()))
        .string("linkage", cursor.linkage().map_or("", |l| l.as_str()))
        .string("parent", &parent.spelling())
        .string("semantic_parent", &cursor.semantic_parent().spelling())
        .string("lexical_parent", &cursor.lexical_parent().spelling())
        .extend(&location(&cursor.location()))
        .string("kind", &cursor.kind_spelling())
        .string("kind_type", category)
        .flag("is_definition", cursor.is_definition())
        .flag("is_dynamic_call", cursor.is_dynamic_call())
        .flag("is_variadic", cursor.is_variadic())
        .flag("is_virtual_member_function", cursor.is_virtual_method())
        .flag("is_pure_virtual_member_function", cursor.is_pure_virtual_method())
        .flag("is_static_member_function", cursor.is_static_method())
        .string("access_specifier", cursor.access().map_or("", |a| a.as_str()));
    if let Some(file) = cursor.included_file() {
        record = record.raw(&format!("'included_file':'{}',", file.name()));
    }
    record
}
