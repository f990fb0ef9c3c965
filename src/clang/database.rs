//! `compile_commands.json` access through libclang's compilation database.

use std::ffi::CString;
use std::path::{Path, PathBuf};

use clang_sys::{
    CXCompilationDatabase, CXCompilationDatabase_Error, CXCompilationDatabase_NoError,
    CXCompileCommand, CXCompileCommands, clang_CompilationDatabase_dispose,
    clang_CompilationDatabase_fromDirectory, clang_CompilationDatabase_getCompileCommands,
    clang_CompileCommand_getArg, clang_CompileCommand_getNumArgs, clang_CompileCommands_dispose,
    clang_CompileCommands_getCommand, clang_CompileCommands_getSize,
};
use tracing::{debug, trace};

use super::types::take_string;
use super::{ClangResult, ensure_loaded};
use crate::error::ClangError;

/// Finds the closest directory, starting at `file`'s own directory and
/// walking up, that contains `database_name`.
///
/// Relative paths resolve against the working directory, so a bare file
/// name starts the search at `.`.
pub fn locate(file: &Path, database_name: &str) -> Option<PathBuf> {
    let start = file.parent().unwrap_or(Path::new(""));
    start
        .ancestors()
        .map(|dir| {
            if dir.as_os_str().is_empty() {
                Path::new(".")
            } else {
                dir
            }
        })
        .inspect(|dir| trace!(dir = %dir.display(), "looking for compilation database"))
        .find(|dir| dir.join(database_name).is_file())
        .map(Path::to_path_buf)
}

/// An owned `CXCompilationDatabase`.
pub struct CompilationDatabase {
    raw: CXCompilationDatabase,
}

impl CompilationDatabase {
    /// Loads the database in `directory`. `Ok(None)` when libclang cannot
    /// read one there.
    ///
    /// ## Errors
    /// Fails when libclang cannot be loaded or the path contains a NUL byte.
    pub fn from_directory(directory: &Path) -> ClangResult<Option<Self>> {
        ensure_loaded()?;
        let dir_name = directory.to_string_lossy();
        let c_dir = CString::new(dir_name.as_bytes())
            .map_err(|_| ClangError::InteriorNul(dir_name.to_string()))?;

        let mut error: CXCompilationDatabase_Error = CXCompilationDatabase_NoError;
        // SAFETY: `c_dir` is NUL-terminated and `error` is a live local.
        let raw = unsafe { clang_CompilationDatabase_fromDirectory(c_dir.as_ptr(), &mut error) };
        if error != CXCompilationDatabase_NoError || raw.is_null() {
            debug!(directory = %dir_name, "no usable compilation database");
            if !raw.is_null() {
                // SAFETY: `raw` came from `fromDirectory` and is not used again.
                unsafe { clang_CompilationDatabase_dispose(raw) };
            }
            return Ok(None);
        }
        Ok(Some(Self { raw }))
    }

    /// The argument vectors of every compile command recorded for `file`.
    ///
    /// ## Errors
    /// Fails when `file` contains a NUL byte.
    pub fn compile_commands(&self, file: &str) -> ClangResult<Vec<Vec<String>>> {
        let c_file = CString::new(file).map_err(|_| ClangError::InteriorNul(file.to_string()))?;
        // SAFETY: `raw` is live and `c_file` is NUL-terminated.
        let commands = CompileCommands {
            raw: unsafe { clang_CompilationDatabase_getCompileCommands(self.raw, c_file.as_ptr()) },
        };
        Ok(commands.arguments())
    }
}

impl Drop for CompilationDatabase {
    fn drop(&mut self) {
        // SAFETY: `raw` is a live database.
        unsafe { clang_CompilationDatabase_dispose(self.raw) };
    }
}

struct CompileCommands {
    raw: CXCompileCommands,
}

impl CompileCommands {
    fn arguments(&self) -> Vec<Vec<String>> {
        if self.raw.is_null() {
            return Vec::new();
        }
        // SAFETY: `raw` is a live command list.
        let size = unsafe { clang_CompileCommands_getSize(self.raw) };
        (0..size)
            .map(|i| {
                // SAFETY: `i` is in bounds; the command lives as long as the list.
                let command = unsafe { clang_CompileCommands_getCommand(self.raw, i) };
                command_arguments(command)
            })
            .collect()
    }
}

impl Drop for CompileCommands {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            // SAFETY: `raw` came from `getCompileCommands`.
            unsafe { clang_CompileCommands_dispose(self.raw) };
        }
    }
}

fn command_arguments(command: CXCompileCommand) -> Vec<String> {
    // SAFETY: `command` belongs to a live command list.
    let count = unsafe { clang_CompileCommand_getNumArgs(command) };
    (0..count)
        // SAFETY: `i` is in bounds.
        .map(|i| unsafe { take_string(clang_CompileCommand_getArg(command, i)) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Runs `f` with the working directory set to `dir`.
    fn in_dir(dir: &Path, f: impl FnOnce()) {
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
        std::env::set_current_dir(previous).unwrap();
        if let Err(payload) = result {
            std::panic::resume_unwind(payload);
        }
    }

    #[test]
    fn test_locate_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("compile_commands.json"), "[]").unwrap();

        let found = locate(&nested.join("main.cpp"), "compile_commands.json");
        assert_eq!(found.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_locate_prefers_closest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("db.json"), "[]").unwrap();
        std::fs::write(nested.join("db.json"), "[]").unwrap();

        let found = locate(&nested.join("x.cpp"), "db.json");
        assert_eq!(found, Some(nested));
    }

    #[test]
    #[serial]
    fn test_locate_bare_file_name_searches_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("compile_commands.json"), "[]").unwrap();

        in_dir(dir.path(), || {
            let found = locate(Path::new("main.cpp"), "compile_commands.json");
            assert_eq!(found.as_deref(), Some(Path::new(".")));
        });
    }

    #[test]
    #[serial]
    fn test_locate_relative_path_reaches_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("compile_commands.json"), "[]").unwrap();

        in_dir(dir.path(), || {
            let found = locate(Path::new("src/a.cpp"), "compile_commands.json");
            assert_eq!(found.as_deref(), Some(Path::new(".")));

            std::fs::write(dir.path().join("src").join("compile_commands.json"), "[]").unwrap();
            let found = locate(Path::new("src/a.cpp"), "compile_commands.json");
            assert_eq!(found.as_deref(), Some(Path::new("src")));
        });
    }

    #[test]
    #[serial]
    fn test_locate_relative_without_database() {
        let dir = tempfile::tempdir().unwrap();

        in_dir(dir.path(), || {
            assert_eq!(locate(Path::new("main.cpp"), "no_such_database.json"), None);
        });
    }

    #[test]
    fn test_from_directory_without_database() {
        let dir = tempfile::tempdir().unwrap();
        match CompilationDatabase::from_directory(dir.path()) {
            Ok(database) => assert!(database.is_none()),
            Err(e) => assert!(matches!(e, ClangError::LibraryUnavailable(_)), "got {e}"),
        }
    }
}
