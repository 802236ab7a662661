//! Format-specific test suite parsers.
//!
//! Every supported file format is a [`Parser`] registered under the name it
//! declares. The name doubles as the file extension the loader dispatches on,
//! so a `yaml` parser handles `*.yaml` files and nothing else.

pub mod json;
pub mod registry;
pub mod yaml;

use std::io::{self, Read};
use thiserror::Error;

use crate::suite::TestSuite;

pub use json::JsonParser;
pub use registry::{ParserFactory, ParserRegistry, ParserRegistryBuilder, BUILTIN_PARSERS};
pub use yaml::YamlParser;

/// Error returned by [`Parser::parse`] for one input.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error("malformed {format} document: {message}")]
    Syntax { format: String, message: String },

    #[error("invalid test suite: {0}")]
    Invalid(String),
}

/// Error returned by a parser factory that cannot construct its parser.
#[derive(Debug, Error)]
#[error("failed to initialize parser '{parser}': {reason}")]
pub struct ParserInitError {
    pub parser: String,
    pub reason: String,
}

/// A converter from the raw bytes of one file format into a [`TestSuite`].
///
/// Implementations must not keep `reader` past the call to `parse`.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use suiteload::parse::{ParseError, Parser};
/// use suiteload::TestSuite;
///
/// struct NameOnly;
///
/// impl Parser for NameOnly {
///     fn name(&self) -> &str {
///         "name"
///     }
///
///     fn parse(&self, reader: &mut dyn Read) -> Result<TestSuite, ParseError> {
///         let mut contents = String::new();
///         reader.read_to_string(&mut contents)?;
///         Ok(TestSuite::new(contents.trim()))
///     }
/// }
/// ```
pub trait Parser: Send + Sync {
    /// Format name; used as the registry key and matched against file extensions.
    fn name(&self) -> &str;

    /// Parse a suite from `reader`.
    fn parse(&self, reader: &mut dyn Read) -> Result<TestSuite, ParseError>;
}

/// Reject suites that deserialized but cannot be used.
pub(crate) fn validate_suite(suite: &TestSuite) -> Result<(), ParseError> {
    if suite.name.trim().is_empty() {
        return Err(ParseError::Invalid("suite name cannot be empty".to_string()));
    }

    for query in &suite.queries {
        if query.name.trim().is_empty() {
            return Err(ParseError::Invalid(format!(
                "suite '{}' contains a query with an empty name",
                suite.name
            )));
        }
    }

    Ok(())
}
