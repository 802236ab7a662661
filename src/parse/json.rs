//! JSON test suite parser.

use std::io::Read;

use super::{validate_suite, ParseError, Parser, ParserInitError};
use crate::suite::TestSuite;

/// Parses `*.json` suite definitions. The document shape mirrors the YAML
/// format: `{"name": ..., "queries": [...], "tests": [...]}`.
#[derive(Debug, Default)]
pub struct JsonParser;

impl JsonParser {
    pub const NAME: &'static str = "json";

    pub fn new() -> Self {
        Self
    }

    /// Factory used by the built-in parser list.
    pub fn factory() -> Result<Box<dyn Parser>, ParserInitError> {
        Ok(Box::new(Self::new()))
    }
}

impl Parser for JsonParser {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn parse(&self, reader: &mut dyn Read) -> Result<TestSuite, ParseError> {
        let suite: TestSuite = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                ParseError::Io(e.into())
            } else {
                ParseError::Syntax {
                    format: Self::NAME.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        validate_suite(&suite)?;
        Ok(suite)
    }
}
