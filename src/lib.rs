//! Message Resolver - recursive parameter substitution for message templates
//!
//! This library resolves templates such as `Hello {name:-friend}` against a
//! set of named parameters. Parameter names and defaults may themselves
//! contain parameters, and substituted values are resolved again until
//! nothing more changes.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use message_resolver::resolve;
//!
//! let mut params = HashMap::new();
//! params.insert("user".to_string(), "{first} {last}".to_string());
//! params.insert("first".to_string(), "Ada".to_string());
//! params.insert("last".to_string(), "Lovelace".to_string());
//!
//! let text = resolve("Hello {user}, you have {count:-no} messages", &params);
//! assert_eq!(text, "Hello Ada Lovelace, you have no messages");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod message;
pub mod params;
pub mod template;
pub mod translator;

pub use catalog::{Catalog, InMemorySource, TemplateSource};
pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use error::{ArgumentError, CatalogError, ConfigError};
pub use message::{Message, Translatable};
pub use params::{NoParameters, Parameters, Value};
pub use template::{IssueKind, Resolution, Resolver, TemplateIssue};
pub use translator::Translator;

/// Resolve `template` with the default syntax
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use message_resolver::{resolve, Value};
///
/// let mut params = BTreeMap::new();
/// params.insert("n".to_string(), Value::from(3));
///
/// assert_eq!(resolve("{n} items, {missing}", &params), "3 items, {missing}");
/// ```
pub fn resolve<P: Parameters + ?Sized>(template: &str, params: &P) -> String {
    Resolver::default().resolve(template, params)
}

/// Resolve `template` with a custom syntax
///
/// # Example
///
/// ```rust
/// use message_resolver::{resolve_with_config, Message, ResolverConfig};
///
/// let config = ResolverConfig::builder()
///     .with_prefix("${")
///     .with_default_delimiter(":")
///     .build()
///     .unwrap();
/// let params = Message::new("greeting").unwrap().put("name", "Ada").unwrap();
///
/// let text = resolve_with_config("Hi ${name}, ${mood:welcome}!", &params, config);
/// assert_eq!(text, "Hi Ada, welcome!");
/// ```
pub fn resolve_with_config<P: Parameters + ?Sized>(
    template: &str,
    params: &P,
    config: ResolverConfig,
) -> String {
    Resolver::new(config).resolve(template, params)
}
