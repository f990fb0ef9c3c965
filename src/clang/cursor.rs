//! Cursors: references to nodes of a parsed translation unit.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_void;
use std::panic::{self, AssertUnwindSafe};

use clang_sys::{
    CX_CXXAccessSpecifier, CX_CXXPrivate, CX_CXXProtected, CX_CXXPublic, CXChildVisit_Break,
    CXChildVisit_Continue, CXChildVisit_Recurse, CXChildVisitResult, CXClientData, CXCursor,
    CXCursor_ClassDecl, CXCursor_ClassTemplate, CXCursor_ClassTemplatePartialSpecialization,
    CXCursor_Constructor, CXCursor_ConversionFunction, CXCursor_CXXMethod, CXCursor_Destructor,
    CXCursor_FunctionDecl, CXCursor_FunctionTemplate, CXCursor_Namespace,
    CXCursor_NonTypeTemplateParameter, CXCursor_ObjCClassMethodDecl,
    CXCursor_ObjCInstanceMethodDecl, CXCursor_ParmDecl, CXCursor_StructDecl,
    CXCursor_TemplateTemplateParameter, CXCursor_TemplateTypeParameter, CXCursor_UnionDecl,
    CXCursorKind, CXLinkage_External, CXLinkage_Internal, CXLinkage_Invalid,
    CXLinkage_NoLinkage, CXLinkage_UniqueExternal, CXLinkageKind,
    clang_CXXMethod_isPureVirtual, clang_CXXMethod_isStatic, clang_CXXMethod_isVirtual,
    clang_Cursor_getBriefCommentText, clang_Cursor_isDynamicCall, clang_Cursor_isNull,
    clang_Cursor_isVariadic, clang_getCXXAccessSpecifier, clang_getCanonicalCursor,
    clang_getCursorDefinition, clang_getCursorExtent, clang_getCursorKind,
    clang_getCursorKindSpelling, clang_getCursorLexicalParent, clang_getCursorLinkage,
    clang_getCursorLocation, clang_getCursorReferenced, clang_getCursorSemanticParent,
    clang_getCursorSpelling, clang_getCursorType, clang_getIncludedFile, clang_getNullCursor,
    clang_isAttribute, clang_isCursorDefinition, clang_isDeclaration, clang_isExpression,
    clang_isInvalid, clang_isPreprocessing, clang_isReference, clang_isStatement,
    clang_isTranslationUnit, clang_isUnexposed, clang_visitChildren,
};

use super::types::{File, SourceLocation, SourceRange, Type, take_string};

/// What a visitor wants to happen after it has seen a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildVisit {
    /// Stop the whole traversal.
    Break,
    /// Continue with the next sibling without visiting children.
    Continue,
    /// Visit this cursor's children next.
    Recurse,
}

impl ChildVisit {
    fn into_raw(self) -> CXChildVisitResult {
        match self {
            Self::Break => CXChildVisit_Break,
            Self::Continue => CXChildVisit_Continue,
            Self::Recurse => CXChildVisit_Recurse,
        }
    }
}

/// Coarse classification of a cursor kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindCategory {
    Attribute,
    Declaration,
    Expression,
    Preprocessing,
    Reference,
    Statement,
    TranslationUnit,
    Unexposed,
    Invalid,
    Unknown,
}

impl KindCategory {
    /// Classifies a raw cursor kind, checking categories in a fixed order.
    pub fn of(kind: CXCursorKind) -> Self {
        // SAFETY: the classification functions accept any kind value.
        unsafe {
            if clang_isAttribute(kind) != 0 {
                Self::Attribute
            } else if clang_isDeclaration(kind) != 0 {
                Self::Declaration
            } else if clang_isExpression(kind) != 0 {
                Self::Expression
            } else if clang_isPreprocessing(kind) != 0 {
                Self::Preprocessing
            } else if clang_isReference(kind) != 0 {
                Self::Reference
            } else if clang_isStatement(kind) != 0 {
                Self::Statement
            } else if clang_isTranslationUnit(kind) != 0 {
                Self::TranslationUnit
            } else if clang_isUnexposed(kind) != 0 {
                Self::Unexposed
            } else if clang_isInvalid(kind) != 0 {
                Self::Invalid
            } else {
                Self::Unknown
            }
        }
    }

    /// Name used in serialized records; empty for invalid kinds.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attribute => "Attribute",
            Self::Declaration => "Declaration",
            Self::Expression => "Expression",
            Self::Preprocessing => "Preprocessing",
            Self::Reference => "Reference",
            Self::Statement => "Statement",
            Self::TranslationUnit => "TranslationUnit",
            Self::Unexposed => "Unexposed",
            Self::Invalid => "",
            Self::Unknown => "Unknown",
        }
    }
}

/// Linkage of the entity a cursor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    NoLinkage,
    Internal,
    UniqueExternal,
    External,
    Unknown,
}

impl Linkage {
    fn from_raw(raw: CXLinkageKind) -> Option<Self> {
        match raw {
            CXLinkage_Invalid => None,
            CXLinkage_NoLinkage => Some(Self::NoLinkage),
            CXLinkage_Internal => Some(Self::Internal),
            CXLinkage_UniqueExternal => Some(Self::UniqueExternal),
            CXLinkage_External => Some(Self::External),
            _ => Some(Self::Unknown),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoLinkage => "Nolinkage",
            Self::Internal => "Internal",
            Self::UniqueExternal => "UniqueExternal",
            Self::External => "External",
            Self::Unknown => "Unknown",
        }
    }
}

/// C++ access specifier of a member or base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    fn from_raw(raw: CX_CXXAccessSpecifier) -> Option<Self> {
        match raw {
            CX_CXXPublic => Some(Self::Public),
            CX_CXXProtected => Some(Self::Protected),
            CX_CXXPrivate => Some(Self::Private),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

/// A node of a translation unit. Cheap to copy; valid while the unit lives.
#[derive(Clone, Copy)]
pub struct Cursor<'tu> {
    raw: CXCursor,
    _unit: PhantomData<&'tu ()>,
}

impl<'tu> Cursor<'tu> {
    pub(crate) fn from_raw(raw: CXCursor) -> Self {
        Self {
            raw,
            _unit: PhantomData,
        }
    }

    /// The null cursor.
    pub fn null() -> Self {
        // SAFETY: no preconditions.
        Self::from_raw(unsafe { clang_getNullCursor() })
    }

    pub fn kind(&self) -> CXCursorKind {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { clang_getCursorKind(self.raw) }
    }

    pub fn category(&self) -> KindCategory {
        KindCategory::of(self.kind())
    }

    pub fn is_null(&self) -> bool {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { clang_Cursor_isNull(self.raw) != 0 }
    }

    /// True for the null cursor and every invalid kind.
    pub fn is_invalid(&self) -> bool {
        // SAFETY: any kind value is accepted.
        self.is_null() || unsafe { clang_isInvalid(self.kind()) != 0 }
    }

    pub fn is_declaration(&self) -> bool {
        // SAFETY: any kind value is accepted.
        unsafe { clang_isDeclaration(self.kind()) != 0 }
    }

    pub fn is_attribute(&self) -> bool {
        // SAFETY: any kind value is accepted.
        unsafe { clang_isAttribute(self.kind()) != 0 }
    }

    pub fn is_expression(&self) -> bool {
        // SAFETY: any kind value is accepted.
        unsafe { clang_isExpression(self.kind()) != 0 }
    }

    pub fn is_preprocessing(&self) -> bool {
        // SAFETY: any kind value is accepted.
        unsafe { clang_isPreprocessing(self.kind()) != 0 }
    }

    pub fn is_reference(&self) -> bool {
        // SAFETY: any kind value is accepted.
        unsafe { clang_isReference(self.kind()) != 0 }
    }

    pub fn is_statement(&self) -> bool {
        // SAFETY: any kind value is accepted.
        unsafe { clang_isStatement(self.kind()) != 0 }
    }

    pub fn is_translation_unit(&self) -> bool {
        // SAFETY: any kind value is accepted.
        unsafe { clang_isTranslationUnit(self.kind()) != 0 }
    }

    pub fn is_definition(&self) -> bool {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { clang_isCursorDefinition(self.raw) != 0 }
    }

    pub fn is_dynamic_call(&self) -> bool {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { clang_Cursor_isDynamicCall(self.raw) != 0 }
    }

    pub fn is_variadic(&self) -> bool {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { clang_Cursor_isVariadic(self.raw) != 0 }
    }

    pub fn is_virtual_method(&self) -> bool {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { clang_CXXMethod_isVirtual(self.raw) != 0 }
    }

    pub fn is_pure_virtual_method(&self) -> bool {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { clang_CXXMethod_isPureVirtual(self.raw) != 0 }
    }

    pub fn is_static_method(&self) -> bool {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { clang_CXXMethod_isStatic(self.raw) != 0 }
    }

    /// Struct, class, union and class template declarations.
    pub fn is_class_decl(&self) -> bool {
        matches!(
            self.kind(),
            CXCursor_StructDecl
                | CXCursor_ClassDecl
                | CXCursor_UnionDecl
                | CXCursor_ClassTemplate
                | CXCursor_ClassTemplatePartialSpecialization
        )
    }

    /// Anything with a function body: free functions, methods, templates,
    /// constructors, destructors and conversion functions.
    pub fn is_function_decl(&self) -> bool {
        is_function_kind(self.kind())
    }

    /// Function parameters and template parameters.
    pub fn is_parameter(&self) -> bool {
        matches!(
            self.kind(),
            CXCursor_ParmDecl
                | CXCursor_TemplateTypeParameter
                | CXCursor_NonTypeTemplateParameter
                | CXCursor_TemplateTemplateParameter
        )
    }

    pub fn is_namespace(&self) -> bool {
        self.kind() == CXCursor_Namespace
    }

    pub fn spelling(&self) -> String {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { take_string(clang_getCursorSpelling(self.raw)) }
    }

    pub fn kind_spelling(&self) -> String {
        // SAFETY: any kind value is accepted.
        unsafe { take_string(clang_getCursorKindSpelling(self.kind())) }
    }

    pub fn brief_comment(&self) -> String {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { take_string(clang_Cursor_getBriefCommentText(self.raw)) }
    }

    pub fn cursor_type(&self) -> Type<'tu> {
        // SAFETY: `raw` belongs to a live translation unit.
        Type::from_raw(unsafe { clang_getCursorType(self.raw) })
    }

    pub fn linkage(&self) -> Option<Linkage> {
        // SAFETY: `raw` belongs to a live translation unit.
        Linkage::from_raw(unsafe { clang_getCursorLinkage(self.raw) })
    }

    pub fn access(&self) -> Option<Access> {
        // SAFETY: `raw` belongs to a live translation unit.
        Access::from_raw(unsafe { clang_getCXXAccessSpecifier(self.raw) })
    }

    pub fn location(&self) -> SourceLocation<'tu> {
        // SAFETY: `raw` belongs to a live translation unit.
        SourceLocation::from_raw(unsafe { clang_getCursorLocation(self.raw) })
    }

    pub fn extent(&self) -> SourceRange<'tu> {
        // SAFETY: `raw` belongs to a live translation unit.
        SourceRange::from_raw(unsafe { clang_getCursorExtent(self.raw) })
    }

    /// The file an inclusion directive names.
    pub fn included_file(&self) -> Option<File<'tu>> {
        // SAFETY: `raw` belongs to a live translation unit.
        File::from_raw(unsafe { clang_getIncludedFile(self.raw) })
    }

    pub fn semantic_parent(&self) -> Cursor<'tu> {
        // SAFETY: `raw` belongs to a live translation unit.
        Self::from_raw(unsafe { clang_getCursorSemanticParent(self.raw) })
    }

    pub fn lexical_parent(&self) -> Cursor<'tu> {
        // SAFETY: `raw` belongs to a live translation unit.
        Self::from_raw(unsafe { clang_getCursorLexicalParent(self.raw) })
    }

    pub fn definition(&self) -> Cursor<'tu> {
        // SAFETY: `raw` belongs to a live translation unit.
        Self::from_raw(unsafe { clang_getCursorDefinition(self.raw) })
    }

    pub fn referenced(&self) -> Cursor<'tu> {
        // SAFETY: `raw` belongs to a live translation unit.
        Self::from_raw(unsafe { clang_getCursorReferenced(self.raw) })
    }

    pub fn canonical(&self) -> Cursor<'tu> {
        // SAFETY: `raw` belongs to a live translation unit.
        Self::from_raw(unsafe { clang_getCanonicalCursor(self.raw) })
    }

    /// `ns::Class::member`, built from the semantic parents' spellings.
    /// Anonymous scopes are skipped.
    pub fn qualified_name(&self) -> String {
        let mut parts = Vec::new();
        let mut cursor = *self;
        while !cursor.is_invalid() && !cursor.is_translation_unit() {
            let spelling = cursor.spelling();
            if !spelling.is_empty() {
                parts.push(spelling);
            }
            cursor = cursor.semantic_parent();
        }
        parts.reverse();
        parts.join("::")
    }

    /// Visits the direct children of this cursor.
    ///
    /// The visitor receives each child and its parent and decides how the
    /// traversal proceeds; returning [`ChildVisit::Recurse`] descends into
    /// the child before its next sibling.
    pub fn visit_children<F>(&self, mut visitor: F)
    where
        F: FnMut(Cursor<'tu>, Cursor<'tu>) -> ChildVisit,
    {
        visit_raw(self.raw, |child, parent| {
            visitor(Cursor::from_raw(child), Cursor::from_raw(parent)).into_raw()
        });
    }

    /// Depth-first, pre-order search of the subtree (this cursor included)
    /// for the first cursor matching `predicate`.
    pub fn find<P>(&self, predicate: P) -> Option<Cursor<'tu>>
    where
        P: Fn(&Cursor<'tu>) -> bool,
    {
        if predicate(self) {
            return Some(*self);
        }
        self.find_descendant(predicate)
    }

    /// Like [`Cursor::find`], but never returns this cursor itself.
    pub fn find_descendant<P>(&self, predicate: P) -> Option<Cursor<'tu>>
    where
        P: Fn(&Cursor<'tu>) -> bool,
    {
        let mut found = None;
        self.visit_children(|child, _| {
            if predicate(&child) {
                found = Some(child);
                ChildVisit::Break
            } else {
                ChildVisit::Recurse
            }
        });
        found
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("kind", &self.kind_spelling())
            .field("spelling", &self.spelling())
            .finish()
    }
}

/// True for the cursor kinds [`Cursor::is_function_decl`] accepts.
pub fn is_function_kind(kind: CXCursorKind) -> bool {
    matches!(
        kind,
        CXCursor_FunctionDecl
            | CXCursor_FunctionTemplate
            | CXCursor_ConversionFunction
            | CXCursor_CXXMethod
            | CXCursor_ObjCInstanceMethodDecl
            | CXCursor_ObjCClassMethodDecl
            | CXCursor_Constructor
            | CXCursor_Destructor
    )
}

struct VisitState<F> {
    visitor: F,
    panic: Option<Box<dyn Any + Send>>,
}

/// Runs `visitor` over the children of `parent`. A panic inside the visitor
/// stops the traversal and resumes once libclang has returned.
fn visit_raw<F>(parent: CXCursor, visitor: F)
where
    F: FnMut(CXCursor, CXCursor) -> CXChildVisitResult,
{
    extern "C" fn trampoline<F>(
        cursor: CXCursor,
        parent: CXCursor,
        data: CXClientData,
    ) -> CXChildVisitResult
    where
        F: FnMut(CXCursor, CXCursor) -> CXChildVisitResult,
    {
        // SAFETY: `data` is the `&mut VisitState<F>` passed below, alive for
        // the whole `clang_visitChildren` call.
        let state = unsafe { &mut *data.cast::<VisitState<F>>() };
        if state.panic.is_some() {
            return CXChildVisit_Break;
        }
        match panic::catch_unwind(AssertUnwindSafe(|| (state.visitor)(cursor, parent))) {
            Ok(result) => result,
            Err(payload) => {
                state.panic = Some(payload);
                CXChildVisit_Break
            }
        }
    }

    let mut state = VisitState {
        visitor,
        panic: None,
    };
    let data: *mut VisitState<F> = &mut state;
    // SAFETY: the trampoline matches the state type and `data` outlives
    // the call.
    unsafe {
        clang_visitChildren(parent, trampoline::<F>, data.cast::<c_void>());
    }
    if let Some(payload) = state.panic {
        panic::resume_unwind(payload);
    }
}
