//! Override dictionary sanitization.
//!
//! Persisted data is not trusted: entries whose value is not a string or
//! looks like active content are dropped before a pass uses them.

use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::warn;

use slactac_config::{ConfigError, SecurityConfig};
use slactac_protocols::OverrideDictionary;

/// Markers of script tags and script-capable URI schemes. A `data:` URI
/// needs a media type or a bare `,`/`;` after the colon, so prose such as
/// "Big data: Q3" is not matched.
const BUILTIN_DENYLIST: &[&str] = &[
    r"<\s*/?\s*script",
    r"\bjavascript\s*:",
    r"\bdata\s*:\s*(?:[\w.+-]+/[\w.+-]+)?\s*[;,]",
];

/// Filters a raw dictionary snapshot down to safe plain-text entries.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    denylist: Vec<Regex>,
}

impl Sanitizer {
    /// Built-in patterns plus `extra`, all case-insensitive.
    pub fn new(extra: &[String]) -> Result<Self, ConfigError> {
        let mut denylist = Vec::with_capacity(BUILTIN_DENYLIST.len() + extra.len());
        let patterns = BUILTIN_DENYLIST
            .iter()
            .map(|p| p.to_string())
            .chain(extra.iter().cloned());
        for pattern in patterns {
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| ConfigError::InvalidValue {
                    field: "security.extra_denylist".to_string(),
                    message: e.to_string(),
                })?;
            denylist.push(regex);
        }
        Ok(Self { denylist })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, ConfigError> {
        Self::new(&config.extra_denylist)
    }

    /// Whether `value` is free of every denylisted marker.
    pub fn is_safe(&self, value: &str) -> bool {
        !self.denylist.iter().any(|re| re.is_match(value))
    }

    /// Turn a raw snapshot into a dictionary. Missing or non-object
    /// snapshots yield an empty dictionary.
    pub fn sanitize(&self, snapshot: Option<Value>) -> OverrideDictionary {
        let entries = match snapshot {
            Some(Value::Object(entries)) => entries,
            Some(other) => {
                warn!("Ignoring malformed override dictionary: {}", type_name(&other));
                return OverrideDictionary::new();
            }
            None => return OverrideDictionary::new(),
        };

        let mut dictionary = OverrideDictionary::new();
        for (original, value) in entries {
            match value {
                Value::String(replacement) if self.is_safe(&replacement) => {
                    dictionary.insert(original, replacement);
                }
                Value::String(_) => warn!("Dropping unsafe override for '{}'", original),
                other => warn!(
                    "Dropping override for '{}': expected string, got {}",
                    original,
                    type_name(&other)
                ),
            }
        }
        dictionary
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            denylist: BUILTIN_DENYLIST
                .iter()
                .filter_map(|p| RegexBuilder::new(p).case_insensitive(true).build().ok())
                .collect(),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
