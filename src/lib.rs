//! # suiteload: pluggable test-suite loading
//!
//! Loads declarative test-suite files from disk, dispatching each file to a
//! format parser chosen by its extension, and expands `${name}` parameters in
//! the loaded queries.
//!
//! ## Features
//!
//! - **Parser registry**: built-in `yaml` and `json` parsers, plus any
//!   [`Parser`] a host registers; lookup is by exact format name
//! - **Suite loader**: a single file or every file in a directory, in
//!   deterministic file-name order; unparseable files are skipped, not fatal
//! - **Parameter expansion**: `${name}` substitution that leaves unknown
//!   placeholders visible and inserts values literally
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use suiteload::{expand_parameters, parameter_map, SuiteLoader};
//!
//! let loader = SuiteLoader::new();
//! let mut suites = loader.load(Some(Path::new("suites")))?;
//!
//! let params = parameter_map(["table=orders", "date=2024-01-01"])?;
//! expand_parameters(&mut suites, Some(&params));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod suite;
pub mod parse;
pub mod loader;
pub mod expand;

// Configuration and output
pub mod config;
pub mod serialization;

// Re-export key types
pub use suite::{Metadata, Query, Test, TestSuite};
pub use parse::{ParseError, Parser, ParserInitError, ParserRegistry};
pub use loader::{file_extension, LoadError, LoadReport, SkipReason, SkippedFile, SuiteLoader};
pub use expand::{
    expand_parameters, expand_placeholders, expand_suite_parameters, parameter_map,
    parse_parameter, ParameterError, ParameterMap,
};
pub use config::{ConfigError, SuiteloadConfig};
pub use serialization::{write_suites, OutputError, OutputFormat};
