//! Point queries: the cursor at a location, its extent, the extent of the
//! nodes enclosing it, and the cursors and types related to it.

use super::{QueryResult, at_location};
use crate::clang::{Cursor, ParseOptions, Type};
use crate::vimson;

/// A node with a semantic parent chain.
///
/// The chain ends at the first invalid node (libclang's null cursor).
pub trait SemanticNode: Copy {
    fn is_invalid(&self) -> bool;
    fn semantic_parent(&self) -> Self;
}

impl SemanticNode for Cursor<'_> {
    fn is_invalid(&self) -> bool {
        Cursor::is_invalid(self)
    }

    fn semantic_parent(&self) -> Self {
        Cursor::semantic_parent(self)
    }
}

/// Walks from `start` through its semantic parents and returns the first
/// node matching `predicate`, `start` included.
pub fn search_upward<N, P>(start: N, mut predicate: P) -> Option<N>
where
    N: SemanticNode,
    P: FnMut(&N) -> bool,
{
    let mut node = start;
    while !node.is_invalid() {
        if predicate(&node) {
            return Some(node);
        }
        node = node.semantic_parent();
    }
    None
}

/// The node whose extent an extent query reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtentTarget {
    /// The cursor at the location itself.
    Node,
    /// The innermost definition.
    InnerDefinition,
    Expression,
    Statement,
    /// Struct, class, union or class template.
    Class,
    /// Any function-like declaration.
    Function,
    /// Function or template parameter.
    Parameter,
    Namespace,
}

impl ExtentTarget {
    fn matches(self, cursor: &Cursor<'_>) -> bool {
        match self {
            Self::Node => true,
            Self::InnerDefinition => cursor.is_definition(),
            Self::Expression => cursor.is_expression(),
            Self::Statement => cursor.is_statement(),
            Self::Class => cursor.is_class_decl(),
            Self::Function => cursor.is_function_decl(),
            Self::Parameter => cursor.is_parameter(),
            Self::Namespace => cursor.is_namespace(),
        }
    }
}

/// A cursor reached from the cursor at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Definition,
    Referenced,
    /// The canonical declaration.
    Declaration,
}

/// A type derived from the type of the cursor at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRelation {
    Pointee,
    Canonical,
    /// Result type of a function type.
    Result,
    ClassOfMemberPointer,
}

impl TypeRelation {
    fn apply<'tu>(self, ty: Type<'tu>) -> Type<'tu> {
        match self {
            Self::Pointee => ty.pointee(),
            Self::Canonical => ty.canonical(),
            Self::Result => ty.result(),
            Self::ClassOfMemberPointer => ty.class_type(),
        }
    }
}

/// `{<cursor record>}` for the cursor at the location.
pub fn location_information(input: &str) -> QueryResult {
    at_location(input, ParseOptions::default(), |_, cursor| {
        Ok(Some(
            vimson::cursor_record(&cursor, &cursor.semantic_parent()).braced(),
        ))
    })
}

/// `{'start':{...},'end':{...}}` for the cursor at the location, or for the
/// closest enclosing node matching `target`.
///
/// [`ExtentTarget::Node`] never searches: the cursor's own extent is
/// reported even when it is empty.
pub fn extent(input: &str, target: ExtentTarget) -> QueryResult {
    at_location(input, ParseOptions::default(), |_, cursor| {
        let found = match target {
            ExtentTarget::Node => Some(cursor),
            _ => search_upward(cursor, |c| target.matches(c)),
        };
        Ok(found.map(|node| format!("{{{}}}", vimson::extent(&node.extent()))))
    })
}

/// The extent of the cursor at the location, followed by the extents of
/// every enclosing class, function and namespace and of the innermost
/// enclosing expression and statement: `[{...},{...},]`.
pub fn all_extents(input: &str) -> QueryResult {
    at_location(input, ParseOptions::default(), |_, cursor| {
        let mut extents = vec![format!("{{{}}}", vimson::extent(&cursor.extent()))];
        let mut passed_expression = false;
        let mut passed_statement = false;
        let mut node = cursor;
        while !node.is_invalid() {
            let innermost_expression = !passed_expression && node.is_expression();
            let innermost_statement = !passed_statement && node.is_statement();
            if node.is_class_decl()
                || node.is_function_decl()
                || node.is_namespace()
                || innermost_expression
                || innermost_statement
            {
                extents.push(format!("{{{}}}", vimson::extent(&node.extent())));
            }
            passed_expression |= node.is_expression();
            passed_statement |= node.is_statement();
            node = node.semantic_parent();
        }
        Ok(Some(vimson::list(extents, ",")))
    })
}

/// `{<cursor record>}` for the cursor `relation` leads to.
pub fn related(input: &str, relation: Relation) -> QueryResult {
    at_location(input, ParseOptions::default(), |_, cursor| {
        let target = match relation {
            Relation::Definition => cursor.definition(),
            Relation::Referenced => cursor.referenced(),
            Relation::Declaration => cursor.canonical(),
        };
        if target.is_invalid() {
            return Ok(None);
        }
        Ok(Some(
            vimson::cursor_record(&target, &target.semantic_parent()).braced(),
        ))
    })
}

/// `{<type record>}` for the type `relation` leads to.
pub fn related_type(input: &str, relation: TypeRelation) -> QueryResult {
    at_location(input, ParseOptions::default(), |_, cursor| {
        let ty = relation.apply(cursor.cursor_type());
        if ty.is_invalid() {
            return Ok(None);
        }
        Ok(Some(vimson::type_record(&ty).braced()))
    })
}
