//! Translatable messages - a lookup key paired with its parameters

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ArgumentError;
use crate::params::{NoParameters, Parameters, Value};

/// Anything that can be turned into text by a [`Translator`].
///
/// Implementors name their template key explicitly.
///
/// [`Translator`]: crate::Translator
pub trait Translatable {
    /// Key of the template in the message source
    fn key(&self) -> &str;

    /// Values for the template's parameters
    fn parameters(&self) -> &dyn Parameters {
        &NoParameters
    }
}

/// A message key with a set of named parameter values
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    key: String,
    parameters: BTreeMap<String, Value>,
}

impl Message {
    /// Create a message with no parameters
    pub fn new(key: impl Into<String>) -> Result<Self, ArgumentError> {
        Self::with_parameters(key, BTreeMap::new())
    }

    /// Create a message with an initial set of parameters
    pub fn with_parameters(
        key: impl Into<String>,
        parameters: BTreeMap<String, Value>,
    ) -> Result<Self, ArgumentError> {
        let key = key.into();
        ArgumentError::require(&key, "message key")?;
        Ok(Self { key, parameters })
    }

    /// Set a parameter, replacing any previous value
    pub fn put(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, ArgumentError> {
        let name = name.into();
        ArgumentError::require(&name, "parameter key")?;
        self.parameters.insert(name, value.into());
        Ok(self)
    }

    /// Set a parameter computed from its name, only if it has no value yet
    pub fn put_if_absent<V, F>(
        mut self,
        name: impl Into<String>,
        compute: F,
    ) -> Result<Self, ArgumentError>
    where
        V: Into<Value>,
        F: FnOnce(&str) -> V,
    {
        let name = name.into();
        ArgumentError::require(&name, "parameter key")?;
        if !self.parameters.contains_key(&name) {
            let value = compute(&name).into();
            self.parameters.insert(name, value);
        }
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// Get a parameter, or `fallback` when it is not set
    pub fn get_or(&self, name: &str, fallback: impl Into<Value>) -> Value {
        self.get(name).cloned().unwrap_or_else(|| fallback.into())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }
}

impl Parameters for Message {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.parameters.lookup(name)
    }
}

impl Translatable for Message {
    fn key(&self) -> &str {
        &self.key
    }

    fn parameters(&self) -> &dyn Parameters {
        &self.parameters
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message(key={}", self.key)?;
        if !self.parameters.is_empty() {
            let params = self
                .parameters
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, ", parameters={{{}}}", params)?;
        }
        write!(f, ")")
    }
}
