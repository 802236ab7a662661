//! Suite loader: resolves a path into parsed test suites.
//!
//! A path is either a single suite file or a directory of them. Files are
//! dispatched to a parser by extension; anything that cannot be parsed is
//! skipped with a log line so one bad file never blocks the rest of a batch.

use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::parse::ParserRegistry;
use crate::suite::TestSuite;

/// Hard failures for a single [`SuiteLoader::load`] call.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("test suite path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("cannot open test suite path {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a file contributed no suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Subdirectory or other non-regular entry
    NotAFile,
    /// No registered parser for the extension (`None` when the name has no extension)
    NoParser { extension: Option<String> },
    /// The file could not be opened
    OpenFailed { message: String },
    /// The parser rejected the contents
    ParseFailed { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAFile => write!(f, "not a regular file"),
            SkipReason::NoParser { extension: Some(ext) } => {
                write!(f, "no parser registered for extension '{}'", ext)
            }
            SkipReason::NoParser { extension: None } => write!(f, "file has no extension"),
            SkipReason::OpenFailed { message } => write!(f, "cannot open: {}", message),
            SkipReason::ParseFailed { message } => write!(f, "parse failed: {}", message),
        }
    }
}

/// A file that was seen but skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Suites loaded from a path along with every file that was skipped.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Parsed suites in sorted file-name order
    pub suites: Vec<TestSuite>,
    /// Skipped files in the order they were visited
    pub skipped: Vec<SkippedFile>,
}

impl LoadReport {
    /// Number of files skipped because no parser matched their extension.
    pub fn unmatched_count(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::NoParser { .. }))
            .count()
    }
}

/// Loads test suites from files using a [`ParserRegistry`].
#[derive(Debug, Default)]
pub struct SuiteLoader {
    registry: ParserRegistry,
}

impl SuiteLoader {
    /// Create a loader backed by the built-in parsers.
    pub fn new() -> Self {
        Self::with_registry(ParserRegistry::discover())
    }

    pub fn with_registry(registry: ParserRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Load every suite reachable from `path`.
    ///
    /// `None` yields no suites. A file yields at most one suite; a directory
    /// yields one suite per parseable immediate child, in file-name order.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when `path` does not exist or cannot be opened.
    /// Files without a matching parser, or with malformed contents, are
    /// skipped rather than reported as errors.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use suiteload::SuiteLoader;
    ///
    /// let loader = SuiteLoader::new();
    /// let suites = loader.load(Some(Path::new("suites/")))?;
    /// println!("loaded {} suites", suites.len());
    /// # Ok::<(), suiteload::LoadError>(())
    /// ```
    pub fn load(&self, path: Option<&Path>) -> Result<Vec<TestSuite>, LoadError> {
        self.load_with_report(path).map(|report| report.suites)
    }

    /// Like [`load`](Self::load), also returning the files that were skipped.
    pub fn load_with_report(&self, path: Option<&Path>) -> Result<LoadReport, LoadError> {
        let mut report = LoadReport::default();
        let path = match path {
            Some(path) => path,
            None => return Ok(report),
        };

        let metadata = fs::metadata(path).map_err(|e| classify_io_error(path, e))?;

        if metadata.is_file() {
            tracing::info!("Test suite path {} is a file, loading...", path.display());
            // Surface an unreadable target as a hard error before dispatch.
            File::open(path).map_err(|e| classify_io_error(path, e))?;
            self.load_file(path, &mut report);
        } else {
            tracing::info!(
                "Test suite path {} is a directory, loading all files inside...",
                path.display()
            );
            let dir = fs::read_dir(path).map_err(|e| classify_io_error(path, e))?;
            let mut entries = readable_entries(dir, path);
            entries.sort_by_key(|entry| entry.file_name());

            for entry in entries {
                self.load_file(&entry.path(), &mut report);
            }
        }

        tracing::info!(
            "Loaded {} test suites from {} ({} files skipped)",
            report.suites.len(),
            path.display(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Load one file into `report`, recording a skip instead of failing.
    fn load_file(&self, path: &Path, report: &mut LoadReport) {
        match self.parse_file(path) {
            Ok(suite) => report.suites.push(suite),
            Err(reason) => report.skipped.push(SkippedFile {
                path: path.to_path_buf(),
                reason,
            }),
        }
    }

    fn parse_file(&self, path: &Path) -> Result<TestSuite, SkipReason> {
        if !path.is_file() {
            tracing::debug!("Skipping {}: not a regular file", path.display());
            return Err(SkipReason::NotAFile);
        }

        // Only the suffix has to be valid UTF-8 to match a parser name.
        let file_name = path.file_name().map(|name| name.to_string_lossy());
        let extension = file_name.as_deref().and_then(file_extension);

        let parser = match extension.and_then(|ext| self.registry.get(ext)) {
            Some(parser) => parser,
            None => {
                tracing::warn!(
                    "Unable to parse {}. File extension does not match any known parsers. Skipping...",
                    path.display()
                );
                return Err(SkipReason::NoParser {
                    extension: extension.map(str::to_string),
                });
            }
        };

        // The handle is dropped when this block ends, whatever `parse` returns.
        let parsed = {
            let mut file = File::open(path).map_err(|e| {
                tracing::error!("Unable to open {}: {}", path.display(), e);
                SkipReason::OpenFailed { message: e.to_string() }
            })?;
            parser.parse(&mut file)
        };

        parsed.map_err(|e| {
            tracing::error!("Unable to parse {} as {}: {}", path.display(), parser.name(), e);
            SkipReason::ParseFailed { message: e.to_string() }
        })
    }
}

/// Extension used for parser dispatch: the text after the last `.`.
///
/// Returns `None` when the name has no `.` or its only `.` is the first
/// character, so hidden files like `.hidden` have no extension.
///
/// ```
/// use suiteload::loader::file_extension;
///
/// assert_eq!(file_extension("a.b.c.xml"), Some("xml"));
/// assert_eq!(file_extension("noext"), None);
/// assert_eq!(file_extension(".hidden"), None);
/// ```
pub fn file_extension(file_name: &str) -> Option<&str> {
    match file_name.rfind('.') {
        Some(index) if index > 0 => Some(&file_name[index + 1..]),
        _ => None,
    }
}

/// Drop directory entries that fail to read, logging each one.
fn readable_entries<T, I>(entries: I, dir: &Path) -> Vec<T>
where
    I: IntoIterator<Item = io::Result<T>>,
{
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::error!("Unable to read an entry of {}: {}", dir.display(), e);
                None
            }
        })
        .collect()
}

fn classify_io_error(path: &Path, error: io::Error) -> LoadError {
    if error.kind() == io::ErrorKind::NotFound {
        LoadError::PathNotFound(path.to_path_buf())
    } else {
        LoadError::Unreadable {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{ParseError, Parser};
    use std::io::Read;
    use tempfile::TempDir;

    /// Uses the whole file contents as the suite name; fails on "bad".
    struct Echo;

    impl Parser for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn parse(&self, reader: &mut dyn Read) -> Result<TestSuite, ParseError> {
            let mut contents = String::new();
            reader.read_to_string(&mut contents)?;
            if contents == "bad" {
                return Err(ParseError::Invalid("bad contents".to_string()));
            }
            Ok(TestSuite::new(contents))
        }
    }

    fn echo_loader() -> SuiteLoader {
        SuiteLoader::with_registry(ParserRegistry::builder().register(Box::new(Echo)).build())
    }

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn names(suites: &[TestSuite]) -> Vec<&str> {
        suites.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("a.b.c.xml"), Some("xml"));
        assert_eq!(file_extension("suite.yaml"), Some("yaml"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension(".hidden"), None);
        assert_eq!(file_extension(".hidden.yaml"), Some("yaml"));
        assert_eq!(file_extension("trailing."), Some(""));
    }

    #[test]
    fn test_load_none_is_empty() {
        let report = echo_loader().load_with_report(None).unwrap();
        assert!(report.suites.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_load_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let result = echo_loader().load(Some(&missing));
        assert!(matches!(result, Err(LoadError::PathNotFound(p)) if p == missing));
    }

    #[test]
    fn test_load_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(temp_dir.path(), "one.echo", "first");

        let suites = echo_loader().load(Some(&path)).unwrap();
        assert_eq!(names(&suites), vec!["first"]);
    }

    #[test]
    fn test_load_single_file_without_parser() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(temp_dir.path(), "one.txt", "first");

        let report = echo_loader().load_with_report(Some(&path)).unwrap();
        assert!(report.suites.is_empty());
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::NoParser { extension: Some("txt".to_string()) }
        );
    }

    #[test]
    fn test_load_directory_sorted_and_skips() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "c.echo", "charlie");
        write(temp_dir.path(), "a.echo", "alpha");
        write(temp_dir.path(), "b.txt", "ignored");
        write(temp_dir.path(), "noext", "ignored");
        write(temp_dir.path(), ".echo", "hidden");
        write(temp_dir.path(), "b.echo", "bravo");
        fs::create_dir(temp_dir.path().join("nested.echo")).unwrap();

        let report = echo_loader().load_with_report(Some(temp_dir.path())).unwrap();

        assert_eq!(names(&report.suites), vec!["alpha", "bravo", "charlie"]);
        assert_eq!(report.unmatched_count(), 3);
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason == SkipReason::NotAFile && s.path.ends_with("nested.echo")));
    }

    #[test]
    fn test_parse_failure_skips_only_that_file() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "1.echo", "one");
        write(temp_dir.path(), "2.echo", "bad");
        write(temp_dir.path(), "3.echo", "three");

        let report = echo_loader().load_with_report(Some(temp_dir.path())).unwrap();

        assert_eq!(names(&report.suites), vec!["one", "three"]);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(report.skipped[0].reason, SkipReason::ParseFailed { .. }));
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "upper.ECHO", "upper");

        let suites = echo_loader().load(Some(temp_dir.path())).unwrap();
        assert!(suites.is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let suites = echo_loader().load(Some(temp_dir.path())).unwrap();
        assert!(suites.is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_stem_keeps_extension() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.echo", "plain");
        let name = OsStr::from_bytes(b"caf\xE9.echo");
        fs::write(temp_dir.path().join(name), "latin1").unwrap();

        let report = echo_loader().load_with_report(Some(temp_dir.path())).unwrap();

        assert_eq!(names(&report.suites), vec!["plain", "latin1"]);
        assert!(report.skipped.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_path_through_file_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let file = write(temp_dir.path(), "a.echo", "alpha");

        let err = echo_loader().load(Some(&file.join("child"))).unwrap_err();

        assert!(matches!(err, LoadError::Unreadable { .. }));
        assert!(!matches!(err, LoadError::PathNotFound(_)));
        assert!(err.to_string().starts_with("cannot open test suite path"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unopenable_entry_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.echo", "alpha");
        let locked = write(temp_dir.path(), "b.echo", "bravo");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can open the file regardless of its mode.
        if File::open(&locked).is_ok() {
            return;
        }

        let report = echo_loader().load_with_report(Some(temp_dir.path())).unwrap();
        assert_eq!(names(&report.suites), vec!["alpha"]);
        assert!(matches!(report.skipped[0].reason, SkipReason::OpenFailed { .. }));

        let err = echo_loader().load(Some(&locked)).unwrap_err();
        assert!(matches!(err, LoadError::Unreadable { .. }));
    }

    #[test]
    fn test_unreadable_entries_are_dropped() {
        let entries = vec![
            Ok(PathBuf::from("a.echo")),
            Err(io::Error::new(io::ErrorKind::Other, "stale handle")),
            Ok(PathBuf::from("c.echo")),
        ];

        let kept = readable_entries(entries, Path::new("suites"));
        assert_eq!(kept, vec![PathBuf::from("a.echo"), PathBuf::from("c.echo")]);
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::NoParser { extension: Some("xml".to_string()) };
        assert_eq!(reason.to_string(), "no parser registered for extension 'xml'");
        assert_eq!(SkipReason::NoParser { extension: None }.to_string(), "file has no extension");
    }
}
