//! Parser registry keyed by declared format name.
//!
//! The registry is assembled once, from [`BUILTIN_PARSERS`] plus anything a
//! host registers explicitly, and is read-only afterwards. Adding a format
//! means writing a [`Parser`] and appending its factory to the built-in list;
//! the loader never needs to change.

use indexmap::IndexMap;

use super::{JsonParser, Parser, ParserInitError, YamlParser};

/// Constructor for one parser. Failures are logged and the parser is left out.
pub type ParserFactory = fn() -> Result<Box<dyn Parser>, ParserInitError>;

/// Parsers available to every registry built with [`ParserRegistry::discover`].
pub const BUILTIN_PARSERS: &[ParserFactory] = &[YamlParser::factory, JsonParser::factory];

/// Immutable map from format name to parser.
pub struct ParserRegistry {
    parsers: IndexMap<String, Box<dyn Parser>>,
}

impl ParserRegistry {
    /// Build a registry from the built-in parser list.
    pub fn discover() -> Self {
        Self::builder().register_factories(BUILTIN_PARSERS).build()
    }

    /// Start an empty registry.
    pub fn builder() -> ParserRegistryBuilder {
        ParserRegistryBuilder::default()
    }

    /// Look up a parser by exact, case-sensitive format name.
    pub fn get(&self, name: &str) -> Option<&dyn Parser> {
        self.parsers.get(name).map(|p| p.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    /// Registered format names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.parsers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::discover()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parsers", &self.names())
            .finish()
    }
}

/// Collects parsers before freezing them into a [`ParserRegistry`].
#[derive(Default)]
pub struct ParserRegistryBuilder {
    parsers: IndexMap<String, Box<dyn Parser>>,
}

impl ParserRegistryBuilder {
    /// Register a parser under the name it declares.
    ///
    /// A later parser with the same name replaces the earlier one; the
    /// replacement is logged so the collision does not go unnoticed.
    pub fn register(mut self, parser: Box<dyn Parser>) -> Self {
        let name = parser.name().to_string();
        if self.parsers.insert(name.clone(), parser).is_some() {
            tracing::warn!("Parser '{}' registered more than once, keeping the last one", name);
        } else {
            tracing::info!("Setup parser {}", name);
        }
        self
    }

    /// Run each factory, registering the parsers that construct successfully.
    pub fn register_factories(mut self, factories: &[ParserFactory]) -> Self {
        for factory in factories {
            match factory() {
                Ok(parser) => self = self.register(parser),
                Err(e) => tracing::error!("Skipping parser: {}", e),
            }
        }
        self
    }

    pub fn build(self) -> ParserRegistry {
        ParserRegistry {
            parsers: self.parsers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ParseError;
    use crate::suite::TestSuite;
    use std::io::Read;

    struct Fixed {
        format: &'static str,
        suite: &'static str,
    }

    impl Parser for Fixed {
        fn name(&self) -> &str {
            self.format
        }

        fn parse(&self, _reader: &mut dyn Read) -> Result<TestSuite, ParseError> {
            Ok(TestSuite::new(self.suite))
        }
    }

    fn failing_factory() -> Result<Box<dyn Parser>, ParserInitError> {
        Err(ParserInitError {
            parser: "broken".to_string(),
            reason: "missing schema".to_string(),
        })
    }

    fn xml_factory() -> Result<Box<dyn Parser>, ParserInitError> {
        Ok(Box::new(Fixed { format: "xml", suite: "from-xml" }))
    }

    #[test]
    fn test_discover_builtin_parsers() {
        let registry = ParserRegistry::discover();

        assert_eq!(registry.names(), vec!["yaml", "json"]);
        assert!(registry.get("yaml").is_some());
        assert!(registry.get("json").is_some());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = ParserRegistry::discover();

        assert!(registry.get("YAML").is_none());
        assert!(registry.get("yml").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_failing_factory_is_skipped() {
        let factories: [ParserFactory; 2] = [failing_factory, xml_factory];
        let registry = ParserRegistry::builder()
            .register_factories(&factories)
            .build();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("xml"));
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn test_duplicate_name_last_registered_wins() {
        let registry = ParserRegistry::builder()
            .register(Box::new(Fixed { format: "xml", suite: "first" }))
            .register(Box::new(Fixed { format: "xml", suite: "second" }))
            .build();

        assert_eq!(registry.len(), 1);
        let parser = registry.get("xml").unwrap();
        let suite = parser.parse(&mut std::io::empty()).unwrap();
        assert_eq!(suite.name, "second");
    }

    #[test]
    fn test_empty_registry() {
        let registry = ParserRegistry::builder().build();
        assert!(registry.is_empty());
        assert!(registry.names().is_empty());
    }
}
