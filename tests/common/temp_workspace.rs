use std::path::PathBuf;
use tempfile::TempDir;

use super::FLAGS;

/// Represents a test fixture with files and an optional cursor position.
#[derive(Debug)]
pub struct Fixture {
    /// files in fixture
    pub files: Vec<(PathBuf, String)>,
    /// Position of cursor in fixture, 1-based like the argument strings
    pub cursor: Option<(PathBuf, u32, u32)>,
}

/// Splits a fixture into files and finds the `$0` cursor.
///
/// Files start with a `//- <relative path>` header line; blank lines before
/// the first header are ignored.
/// ## Panics
/// if other content appears before the first header
pub fn parse_fixture(input: &str) -> Fixture {
    let mut files = Vec::new();
    let mut current_path: Option<PathBuf> = None;
    let mut current_content = String::new();
    let mut cursor = None;

    for line in input.lines() {
        if let Some(path) = line.strip_prefix("//- ") {
            if let Some(p) = current_path.take() {
                files.push((p, std::mem::take(&mut current_content)));
            }
            current_path = Some(PathBuf::from(path.trim().trim_start_matches('/')));
            continue;
        }
        if current_path.is_none() && line.trim().is_empty() {
            continue;
        }

        let path = current_path
            .clone()
            .expect("fixture content before the first //- header");
        let mut l = line.to_string();
        if let Some(idx) = l.find("$0") {
            let line_no =
                u32::try_from(current_content.lines().count() + 1).expect("line out of range");
            let col = u32::try_from(idx + 1).expect("column out of range");
            cursor = Some((path, line_no, col));
            l = l.replace("$0", "");
        }
        current_content.push_str(&l);
        current_content.push('\n');
    }

    if let Some(p) = current_path {
        files.push((p, current_content));
    }

    Fixture { files, cursor }
}

/// Fixture files written to a temporary directory.
pub struct TestWorkspace {
    /// Temporary folder for the workspace
    pub root: TempDir,
    /// fixture for the workspace
    pub fixture: Fixture,
    /// Canonicalized root path (resolves symlinks like /var -> /private/var on macOS)
    canonical_root: PathBuf,
}

impl TestWorkspace {
    /// Writes `fixture` to a fresh temporary directory.
    /// ## Panics
    /// if the directory or a file cannot be written
    pub fn new(fixture: &str) -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        let fixture = parse_fixture(fixture);

        for (path, content) in &fixture.files {
            let abs = root.path().join(path);
            std::fs::create_dir_all(abs.parent().unwrap()).unwrap();
            std::fs::write(&abs, content).unwrap();
        }

        let canonical_root = root
            .path()
            .canonicalize()
            .expect("Failed to canonicalize root");

        Self {
            root,
            fixture,
            canonical_root,
        }
    }

    /// Returns the canonicalized root path
    pub fn canonical_root(&self) -> &PathBuf {
        &self.canonical_root
    }

    /// Converts a relative path to an absolute path string
    pub fn apath(&self, path: &str) -> String {
        self.canonical_root.join(path).display().to_string()
    }

    /// `"<file>:<flags>"` for a fixture file.
    pub fn file_args(&self, path: &str) -> String {
        format!("{}:{FLAGS}", self.apath(path))
    }

    /// `"<file>:<flags>:<line>:<col>"` at the `$0` cursor.
    /// ## Panics
    /// if the fixture has no cursor
    pub fn cursor_args(&self) -> String {
        let (path, line, col) = self.fixture.cursor.as_ref().expect("missing $0 cursor");
        let file = self.canonical_root.join(path).display().to_string();
        format!("{file}:{FLAGS}:{line}:{col}")
    }
}
