//! `${name}` parameter expansion over query text.
//!
//! A placeholder is `${`, the shortest run of characters up to the next `}`,
//! and that `}`. The inner text is looked up verbatim. Known names are
//! replaced by their value; unknown names are left in place so unresolved
//! parameters stay visible in the query. Values are inserted literally and
//! never rescanned, which also means expansion is not idempotent when a value
//! itself contains `${...}`.

use std::collections::HashMap;
use thiserror::Error;

use crate::suite::TestSuite;

/// Parameter name -> replacement value.
pub type ParameterMap = HashMap<String, String>;

const OPEN: &str = "${";
const CLOSE: char = '}';

/// Error for a malformed `name=value` parameter argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("parameter '{0}' is not of the form name=value")]
    MissingSeparator(String),

    #[error("parameter '{0}' has an empty name")]
    EmptyName(String),
}

/// Expand placeholders in every query of every suite, in place.
///
/// Does nothing when `parameters` is `None`. Returns the same collection to
/// allow chaining.
pub fn expand_parameters<'a>(
    suites: &'a mut Vec<TestSuite>,
    parameters: Option<&ParameterMap>,
) -> &'a mut Vec<TestSuite> {
    for suite in suites.iter_mut() {
        expand_suite_parameters(suite, parameters);
    }
    suites
}

/// Expand placeholders in every query of one suite, in place.
pub fn expand_suite_parameters(suite: &mut TestSuite, parameters: Option<&ParameterMap>) {
    let parameters = match parameters {
        Some(parameters) => parameters,
        None => return,
    };

    for query in &mut suite.queries {
        query.value = expand_placeholders(&query.value, parameters);
    }
}

/// Return `text` with every known `${name}` replaced by its value.
///
/// ```
/// use std::collections::HashMap;
/// use suiteload::expand::expand_placeholders;
///
/// let mut params = HashMap::new();
/// params.insert("table".to_string(), "orders".to_string());
///
/// assert_eq!(
///     expand_placeholders("SELECT * FROM ${table} WHERE ${missing}", &params),
///     "SELECT * FROM orders WHERE ${missing}"
/// );
/// ```
pub fn expand_placeholders(text: &str, parameters: &ParameterMap) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let end = match after_open.find(CLOSE) {
            Some(end) => end,
            // Unterminated placeholder: nothing more can match.
            None => break,
        };

        let name = &after_open[..end];
        output.push_str(&rest[..start]);
        match parameters.get(name) {
            Some(value) => output.push_str(value),
            None => {
                output.push_str(OPEN);
                output.push_str(name);
                output.push(CLOSE);
            }
        }
        rest = &after_open[end + CLOSE.len_utf8()..];
    }

    output.push_str(rest);
    output
}

/// Split a `name=value` argument at the first `=`.
///
/// The value may be empty and may itself contain `=`.
pub fn parse_parameter(argument: &str) -> Result<(String, String), ParameterError> {
    let (name, value) = argument
        .split_once('=')
        .ok_or_else(|| ParameterError::MissingSeparator(argument.to_string()))?;

    if name.is_empty() {
        return Err(ParameterError::EmptyName(argument.to_string()));
    }

    Ok((name.to_string(), value.to_string()))
}

/// Build a [`ParameterMap`] from `name=value` arguments; later names win.
pub fn parameter_map<I, S>(arguments: I) -> Result<ParameterMap, ParameterError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    arguments
        .into_iter()
        .map(|argument| parse_parameter(argument.as_ref()))
        .collect()
}
