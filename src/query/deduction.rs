//! Type queries that see through `auto`.
//!
//! libclang reports the declared type of a variable or function. When that
//! type is `auto` (or could not be computed), the type is taken from the
//! first descendant whose type is known instead: the initializer of a
//! variable, the operand of the first `return` of a function.

use clang_sys::{CXCursor_ReturnStmt, CXCursor_VarDecl};

use super::{QueryResult, at_location};
use crate::clang::cursor::is_function_kind;
use crate::clang::{Cursor, ParseOptions, Type};
use crate::vimson;

/// Which declaration the deduction starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deduction {
    /// The first variable declaration at or below the cursor.
    VarDecl,
    /// The return type of the first function at or below the cursor.
    FuncDecl,
    /// Whichever of the two comes first.
    FuncOrVarDecl,
    /// The type of the cursor itself, deduced where needed.
    TypeAt,
}

/// True when `spelling` contains `auto` as a whole word.
pub fn is_auto_type(spelling: &str) -> bool {
    spelling.match_indices("auto").any(|(pos, word)| {
        let before = spelling[..pos].chars().next_back();
        let after = spelling[pos + word.len()..].chars().next();
        !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
    })
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn needs_deduction(ty: &Type<'_>) -> bool {
    ty.is_invalid() || is_auto_type(&ty.spelling())
}

fn deduce_from_descendants<'tu>(cursor: &Cursor<'tu>) -> Option<Type<'tu>> {
    cursor
        .find_descendant(|c| !needs_deduction(&c.cursor_type()))
        .map(|c| c.cursor_type())
}

fn variable_type<'tu>(cursor: &Cursor<'tu>) -> Option<Type<'tu>> {
    let ty = cursor.cursor_type();
    if needs_deduction(&ty) {
        deduce_from_descendants(cursor)
    } else {
        Some(ty)
    }
}

fn return_type<'tu>(function: &Cursor<'tu>) -> Option<Type<'tu>> {
    let result = function.cursor_type().result();
    if !needs_deduction(&result) {
        return Some(result);
    }
    let return_stmt = function.find(|c| c.kind() == CXCursor_ReturnStmt)?;
    deduce_from_descendants(&return_stmt)
}

fn declared_type<'tu>(cursor: &Cursor<'tu>) -> Option<Type<'tu>> {
    if cursor.kind() == CXCursor_VarDecl {
        variable_type(cursor)
    } else if cursor.is_function_decl() {
        return_type(cursor)
    } else {
        Some(cursor.cursor_type())
    }
}

fn deduced_type<'tu>(cursor: Cursor<'tu>, deduction: Deduction) -> Option<Type<'tu>> {
    match deduction {
        Deduction::VarDecl => {
            let var = cursor.find(|c| c.kind() == CXCursor_VarDecl)?;
            variable_type(&var)
        }
        Deduction::FuncDecl => {
            let function = cursor.find(|c| is_function_kind(c.kind()))?;
            return_type(&function)
        }
        Deduction::FuncOrVarDecl => {
            let decl = cursor.find(|c| c.kind() == CXCursor_VarDecl || is_function_kind(c.kind()))?;
            declared_type(&decl)
        }
        Deduction::TypeAt => {
            let typed = if cursor.cursor_type().is_invalid() {
                cursor.find_descendant(|c| !c.cursor_type().is_invalid())?
            } else {
                cursor
            };
            declared_type(&typed)
        }
    }
}

/// `{<type record>'canonical':{<type record>},}` for the deduced type.
pub fn deduce(input: &str, deduction: Deduction) -> QueryResult {
    at_location(input, ParseOptions::default(), |_, cursor| {
        let Some(ty) = deduced_type(cursor, deduction).filter(|ty| !ty.is_invalid()) else {
            return Ok(None);
        };
        let record = vimson::type_record(&ty)
            .nested("canonical", &vimson::type_record(&ty.canonical()));
        Ok(Some(record.braced()))
    })
}
