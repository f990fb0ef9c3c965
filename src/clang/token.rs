//! Tokenization of a source range.

use std::os::raw::c_uint;
use std::ptr;
use std::slice;

use clang_sys::{
    CXToken, CXToken_Comment, CXToken_Identifier, CXToken_Keyword, CXToken_Literal,
    CXToken_Punctuation, CXTokenKind, clang_disposeTokens, clang_getTokenKind,
    clang_getTokenLocation, clang_getTokenSpelling, clang_tokenize,
};

use super::TranslationUnit;
use super::types::{SourceLocation, SourceRange, take_string};

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Punctuation,
    Keyword,
    Identifier,
    Literal,
    Comment,
}

impl TokenKind {
    fn from_raw(raw: CXTokenKind) -> Option<Self> {
        match raw {
            CXToken_Punctuation => Some(Self::Punctuation),
            CXToken_Keyword => Some(Self::Keyword),
            CXToken_Identifier => Some(Self::Identifier),
            CXToken_Literal => Some(Self::Literal),
            CXToken_Comment => Some(Self::Comment),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Punctuation => "punctuation",
            Self::Keyword => "keyword",
            Self::Identifier => "identifier",
            Self::Literal => "literal",
            Self::Comment => "comment",
        }
    }
}

/// A token buffer owned by libclang, released on drop.
pub struct Tokens<'tu> {
    unit: &'tu TranslationUnit<'tu>,
    raw: *mut CXToken,
    len: c_uint,
}

impl<'tu> Tokens<'tu> {
    /// Tokenizes `range` of `unit`.
    pub fn new(unit: &'tu TranslationUnit<'tu>, range: SourceRange<'_>) -> Self {
        let mut raw: *mut CXToken = ptr::null_mut();
        let mut len: c_uint = 0;
        // SAFETY: `range` belongs to `unit`; the out-pointers are live locals.
        unsafe { clang_tokenize(unit.as_raw(), range.as_raw(), &mut raw, &mut len) };
        Self { unit, raw, len }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn as_slice(&self) -> &[CXToken] {
        if self.raw.is_null() {
            return &[];
        }
        // SAFETY: libclang returned `len` contiguous tokens at `raw`.
        unsafe { slice::from_raw_parts(self.raw, self.len as usize) }
    }

    /// Iterates over the tokens in source order.
    pub fn iter(&self) -> impl Iterator<Item = Token<'_>> + '_ {
        self.as_slice().iter().map(move |raw| Token {
            unit: self.unit,
            raw: *raw,
        })
    }
}

impl Drop for Tokens<'_> {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            // SAFETY: the buffer came from `clang_tokenize` on this unit.
            unsafe { clang_disposeTokens(self.unit.as_raw(), self.raw, self.len) };
        }
    }
}

/// One token of a [`Tokens`] buffer.
#[derive(Clone, Copy)]
pub struct Token<'a> {
    unit: &'a TranslationUnit<'a>,
    raw: CXToken,
}

impl<'a> Token<'a> {
    /// `None` for a kind this crate does not know about.
    pub fn kind(&self) -> Option<TokenKind> {
        // SAFETY: `raw` is a token of a live unit.
        TokenKind::from_raw(unsafe { clang_getTokenKind(self.raw) })
    }

    pub fn spelling(&self) -> String {
        // SAFETY: `raw` is a token of a live unit.
        unsafe { take_string(clang_getTokenSpelling(self.unit.as_raw(), self.raw)) }
    }

    pub fn location(&self) -> SourceLocation<'a> {
        // SAFETY: `raw` is a token of a live unit.
        SourceLocation::from_raw(unsafe { clang_getTokenLocation(self.unit.as_raw(), self.raw) })
    }
}
