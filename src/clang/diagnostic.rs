//! Diagnostics reported while parsing a translation unit.

use clang_sys::{
    CXDiagnostic, CXDiagnostic_Error, CXDiagnostic_Fatal, CXDiagnostic_Ignored,
    CXDiagnostic_Note, CXDiagnostic_Warning, CXDiagnosticSeverity, clang_disposeDiagnostic,
    clang_getDiagnostic, clang_getDiagnosticLocation, clang_getDiagnosticSeverity,
    clang_getDiagnosticSpelling, clang_getNumDiagnostics,
};

use super::TranslationUnit;
use super::types::{SourceLocation, take_string};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ignored,
    Note,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    fn from_raw(raw: CXDiagnosticSeverity) -> Option<Self> {
        match raw {
            CXDiagnostic_Ignored => Some(Self::Ignored),
            CXDiagnostic_Note => Some(Self::Note),
            CXDiagnostic_Warning => Some(Self::Warning),
            CXDiagnostic_Error => Some(Self::Error),
            CXDiagnostic_Fatal => Some(Self::Fatal),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

/// One diagnostic, released on drop.
pub struct Diagnostic<'tu> {
    raw: CXDiagnostic,
    _unit: &'tu TranslationUnit<'tu>,
}

impl<'tu> Diagnostic<'tu> {
    pub fn severity(&self) -> Option<Severity> {
        // SAFETY: `raw` is a live diagnostic.
        Severity::from_raw(unsafe { clang_getDiagnosticSeverity(self.raw) })
    }

    pub fn location(&self) -> SourceLocation<'tu> {
        // SAFETY: `raw` is a live diagnostic.
        SourceLocation::from_raw(unsafe { clang_getDiagnosticLocation(self.raw) })
    }

    /// The diagnostic text, without location or option information.
    pub fn message(&self) -> String {
        // SAFETY: `raw` is a live diagnostic.
        unsafe { take_string(clang_getDiagnosticSpelling(self.raw)) }
    }
}

impl Drop for Diagnostic<'_> {
    fn drop(&mut self) {
        // SAFETY: `raw` came from `clang_getDiagnostic`.
        unsafe { clang_disposeDiagnostic(self.raw) };
    }
}

/// All diagnostics of `unit`, in the order libclang reports them.
pub fn diagnostics<'tu>(unit: &'tu TranslationUnit<'tu>) -> Vec<Diagnostic<'tu>> {
    // SAFETY: `unit` is live.
    let count = unsafe { clang_getNumDiagnostics(unit.as_raw()) };
    (0..count)
        .filter_map(|i| {
            // SAFETY: `i` is below the diagnostic count.
            let raw = unsafe { clang_getDiagnostic(unit.as_raw(), i) };
            (!raw.is_null()).then_some(Diagnostic { raw, _unit: unit })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_names() {
        assert_eq!(
            Severity::from_raw(CXDiagnostic_Warning),
            Some(Severity::Warning)
        );
        assert_eq!(Severity::Fatal.as_str(), "fatal");
        assert!(Severity::Error > Severity::Warning);
    }
}
