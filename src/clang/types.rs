//! Value wrappers for libclang strings, types, files and source positions.

use std::ffi::CStr;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_uint;
use std::ptr;

use clang_sys::{
    CXFile, CXRefQualifier_LValue, CXRefQualifier_RValue, CXSourceLocation, CXSourceRange,
    CXString, CXType, CXTypeKind, CXType_Invalid, clang_Location_isFromMainFile,
    clang_Location_isInSystemHeader, clang_Range_isNull, clang_Type_getCXXRefQualifier,
    clang_Type_getClassType, clang_disposeString, clang_equalLocations, clang_getCString,
    clang_getCanonicalType, clang_getFileLocation, clang_getFileName, clang_getNullLocation,
    clang_getPointeeType, clang_getRangeEnd, clang_getRangeStart, clang_getResultType,
    clang_getSpellingLocation, clang_getTypeDeclaration, clang_getTypeKindSpelling,
    clang_getTypeSpelling, clang_isConstQualifiedType, clang_isPODType,
    clang_isRestrictQualifiedType, clang_isVolatileQualifiedType,
};

use super::cursor::Cursor;

/// Converts an owned `CXString` into a Rust string and disposes it.
///
/// A null C string becomes the empty string.
///
/// ## Safety
/// `raw` must be a string returned by libclang that has not been disposed.
pub(crate) unsafe fn take_string(raw: CXString) -> String {
    // SAFETY: guaranteed by the caller.
    unsafe {
        let ptr = clang_getCString(raw);
        let value = if ptr.is_null() {
            String::new()
        } else {
            CStr::from_ptr(ptr).to_string_lossy().into_owned()
        };
        clang_disposeString(raw);
        value
    }
}

/// C++ reference qualifier of a member function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefQualifier {
    /// `&`
    LValue,
    /// `&&`
    RValue,
}

/// A type as seen by libclang, valid while its translation unit lives.
#[derive(Clone, Copy)]
pub struct Type<'tu> {
    raw: CXType,
    _unit: PhantomData<&'tu ()>,
}

impl<'tu> Type<'tu> {
    pub(crate) fn from_raw(raw: CXType) -> Self {
        Self {
            raw,
            _unit: PhantomData,
        }
    }

    /// The raw type kind.
    pub fn kind(&self) -> CXTypeKind {
        self.raw.kind
    }

    /// True when libclang could not compute the type.
    pub fn is_invalid(&self) -> bool {
        self.raw.kind == CXType_Invalid
    }

    /// Type spelling, e.g. `const std::string &`.
    pub fn spelling(&self) -> String {
        // SAFETY: `raw` is a type of a live translation unit.
        unsafe { take_string(clang_getTypeSpelling(self.raw)) }
    }

    /// Spelling of the type kind, e.g. `LValueReference`.
    pub fn kind_spelling(&self) -> String {
        // SAFETY: any kind value is accepted.
        unsafe { take_string(clang_getTypeKindSpelling(self.raw.kind)) }
    }

    pub fn is_const_qualified(&self) -> bool {
        // SAFETY: `raw` is a type of a live translation unit.
        unsafe { clang_isConstQualifiedType(self.raw) != 0 }
    }

    pub fn is_volatile_qualified(&self) -> bool {
        // SAFETY: `raw` is a type of a live translation unit.
        unsafe { clang_isVolatileQualifiedType(self.raw) != 0 }
    }

    pub fn is_restrict_qualified(&self) -> bool {
        // SAFETY: `raw` is a type of a live translation unit.
        unsafe { clang_isRestrictQualifiedType(self.raw) != 0 }
    }

    pub fn is_pod(&self) -> bool {
        // SAFETY: `raw` is a type of a live translation unit.
        unsafe { clang_isPODType(self.raw) != 0 }
    }

    /// The `&` / `&&` qualifier of a member function type, if any.
    pub fn ref_qualifier(&self) -> Option<RefQualifier> {
        // SAFETY: `raw` is a type of a live translation unit.
        match unsafe { clang_Type_getCXXRefQualifier(self.raw) } {
            CXRefQualifier_LValue => Some(RefQualifier::LValue),
            CXRefQualifier_RValue => Some(RefQualifier::RValue),
            _ => None,
        }
    }

    pub fn pointee(&self) -> Type<'tu> {
        // SAFETY: `raw` is a type of a live translation unit.
        Type::from_raw(unsafe { clang_getPointeeType(self.raw) })
    }

    pub fn canonical(&self) -> Type<'tu> {
        // SAFETY: `raw` is a type of a live translation unit.
        Type::from_raw(unsafe { clang_getCanonicalType(self.raw) })
    }

    /// Result type of a function type.
    pub fn result(&self) -> Type<'tu> {
        // SAFETY: `raw` is a type of a live translation unit.
        Type::from_raw(unsafe { clang_getResultType(self.raw) })
    }

    /// Class type of a member pointer type.
    pub fn class_type(&self) -> Type<'tu> {
        // SAFETY: `raw` is a type of a live translation unit.
        Type::from_raw(unsafe { clang_Type_getClassType(self.raw) })
    }

    /// The cursor declaring this type.
    pub fn declaration(&self) -> Cursor<'tu> {
        // SAFETY: `raw` is a type of a live translation unit.
        Cursor::from_raw(unsafe { clang_getTypeDeclaration(self.raw) })
    }
}

impl fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("kind", &self.raw.kind)
            .field("spelling", &self.spelling())
            .finish()
    }
}

/// A file known to a translation unit.
#[derive(Clone, Copy)]
pub struct File<'tu> {
    raw: CXFile,
    _unit: PhantomData<&'tu ()>,
}

impl File<'_> {
    /// Wraps a raw file handle; `None` for the null handle.
    pub(crate) fn from_raw(raw: CXFile) -> Option<Self> {
        (!raw.is_null()).then_some(Self {
            raw,
            _unit: PhantomData,
        })
    }

    pub(crate) fn as_raw(&self) -> CXFile {
        self.raw
    }

    /// The file name as libclang spells it (not canonicalized).
    pub fn name(&self) -> String {
        // SAFETY: `raw` is a non-null file of a live translation unit.
        unsafe { take_string(clang_getFileName(self.raw)) }
    }
}

impl fmt::Debug for File<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("File").field(&self.name()).finish()
    }
}

/// A resolved position: file name, 1-based line and column, byte offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Position {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

/// A location inside a translation unit.
#[derive(Clone, Copy)]
pub struct SourceLocation<'tu> {
    raw: CXSourceLocation,
    _unit: PhantomData<&'tu ()>,
}

impl<'tu> SourceLocation<'tu> {
    pub(crate) fn from_raw(raw: CXSourceLocation) -> Self {
        Self {
            raw,
            _unit: PhantomData,
        }
    }

    pub(crate) fn as_raw(&self) -> CXSourceLocation {
        self.raw
    }

    /// True for the null location.
    pub fn is_null(&self) -> bool {
        // SAFETY: comparing two location values has no preconditions.
        unsafe { clang_equalLocations(self.raw, clang_getNullLocation()) != 0 }
    }

    /// Where the token at this location was spelled.
    pub fn spelling_position(&self) -> Position {
        self.resolve(false)
    }

    /// The file position after macro expansion is looked through.
    pub fn file_position(&self) -> Position {
        self.resolve(true)
    }

    fn resolve(&self, through_macros: bool) -> Position {
        let mut file: CXFile = ptr::null_mut();
        let (mut line, mut column, mut offset): (c_uint, c_uint, c_uint) = (0, 0, 0);
        // SAFETY: all out-pointers point to live locals.
        unsafe {
            if through_macros {
                clang_getFileLocation(self.raw, &mut file, &mut line, &mut column, &mut offset);
            } else {
                clang_getSpellingLocation(self.raw, &mut file, &mut line, &mut column, &mut offset);
            }
        }
        Position {
            file: File::from_raw(file).map(|f| f.name()).unwrap_or_default(),
            line,
            column,
            offset,
        }
    }

    pub fn is_from_main_file(&self) -> bool {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { clang_Location_isFromMainFile(self.raw) != 0 }
    }

    pub fn is_in_system_header(&self) -> bool {
        // SAFETY: `raw` belongs to a live translation unit.
        unsafe { clang_Location_isInSystemHeader(self.raw) != 0 }
    }
}

impl fmt::Debug for SourceLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SourceLocation")
            .field(&self.spelling_position())
            .finish()
    }
}

/// A half-open source range.
#[derive(Clone, Copy)]
pub struct SourceRange<'tu> {
    raw: CXSourceRange,
    _unit: PhantomData<&'tu ()>,
}

impl<'tu> SourceRange<'tu> {
    pub(crate) fn from_raw(raw: CXSourceRange) -> Self {
        Self {
            raw,
            _unit: PhantomData,
        }
    }

    pub(crate) fn as_raw(&self) -> CXSourceRange {
        self.raw
    }

    pub fn is_null(&self) -> bool {
        // SAFETY: inspecting a range value has no preconditions.
        unsafe { clang_Range_isNull(self.raw) != 0 }
    }

    pub fn start(&self) -> SourceLocation<'tu> {
        // SAFETY: see `is_null`.
        SourceLocation::from_raw(unsafe { clang_getRangeStart(self.raw) })
    }

    pub fn end(&self) -> SourceLocation<'tu> {
        // SAFETY: see `is_null`.
        SourceLocation::from_raw(unsafe { clang_getRangeEnd(self.raw) })
    }
}

impl fmt::Debug for SourceRange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("SourceRange(null)");
        }
        f.debug_struct("SourceRange")
            .field("start", &self.start().spelling_position())
            .field("end", &self.end().spelling_position())
            .finish()
    }
}
