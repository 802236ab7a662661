//! YAML test suite parser.

use std::io::Read;

use super::{validate_suite, ParseError, Parser, ParserInitError};
use crate::suite::TestSuite;

/// Parses `*.yaml` suite definitions.
///
/// ```yaml
/// name: Orders
/// description: Sanity checks for the orders table
/// queries:
///   - name: Count
///     engine: hive
///     value: "SELECT COUNT(*) AS total FROM ${table}"
/// tests:
///   - name: NonEmpty
///     asserts:
///       - Count.total > 0
/// ```
#[derive(Debug, Default)]
pub struct YamlParser;

impl YamlParser {
    pub const NAME: &'static str = "yaml";

    pub fn new() -> Self {
        Self
    }

    /// Factory used by the built-in parser list.
    pub fn factory() -> Result<Box<dyn Parser>, ParserInitError> {
        Ok(Box::new(Self::new()))
    }
}

impl Parser for YamlParser {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn parse(&self, reader: &mut dyn Read) -> Result<TestSuite, ParseError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;

        let suite: TestSuite = serde_yaml::from_str(&contents).map_err(|e| ParseError::Syntax {
            format: Self::NAME.to_string(),
            message: e.to_string(),
        })?;

        validate_suite(&suite)?;
        Ok(suite)
    }
}
