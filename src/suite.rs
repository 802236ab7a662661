//! Test suite data model.
//!
//! A suite is what a parser produces from one file: a named, ordered list of
//! queries plus the tests that assert over their results. Only the query text
//! is touched by this crate after parsing (see [`crate::expand`]).

use serde::{Deserialize, Serialize};

/// A named collection of queries and tests loaded from a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuite {
    /// Suite name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Queries in file order
    #[serde(default)]
    pub queries: Vec<Query>,

    /// Tests in file order
    #[serde(default)]
    pub tests: Vec<Test>,
}

impl TestSuite {
    /// Create an empty suite with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            queries: Vec::new(),
            tests: Vec::new(),
        }
    }

    /// Append a query, returning the suite for chaining.
    pub fn with_query(mut self, query: Query) -> Self {
        self.queries.push(query);
        self
    }

    /// Find a query by name.
    pub fn query(&self, name: &str) -> Option<&Query> {
        self.queries.iter().find(|q| q.name == name)
    }
}

/// A single query: raw, possibly templated, text addressed to an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Query name, referenced by test assertions
    pub name: String,

    /// Engine the query targets (e.g. "hive", "rest")
    pub engine: String,

    /// Raw query text; may contain `${name}` placeholders
    pub value: String,

    /// Engine-specific key/value options
    #[serde(default)]
    pub metadata: Vec<Metadata>,
}

impl Query {
    pub fn new(name: impl Into<String>, engine: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine: engine.into(),
            value: value.into(),
            metadata: Vec::new(),
        }
    }

    /// Look up a metadata value by key (first match wins).
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|m| m.key == key)
            .map(|m| m.value.as_str())
    }
}

/// Key/value pair attached to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub key: String,
    pub value: String,
}

/// A named group of assertions over query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    /// Test name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Assertion expressions, evaluated by the execution engine
    #[serde(default)]
    pub asserts: Vec<String>,

    /// Report failures as warnings instead of errors
    #[serde(default, rename = "warnOnly", alias = "warn_only")]
    pub warn_only: bool,
}
