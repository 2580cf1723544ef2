//! Message catalogs - where templates come from
//!
//! A catalog is a TOML document with an optional `[syntax]` table and one
//! `[messages.<locale>]` table per locale:
//!
//! ```toml
//! [syntax]
//! prefix = "${"
//! default-delimiter = ":"
//!
//! [messages.en]
//! greeting = "Hello ${name:friend}"
//!
//! [messages.fr]
//! greeting = "Bonjour ${name:l'ami}"
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::config::ResolverConfig;
use crate::error::{ArgumentError, CatalogError};
use crate::template::Resolver;
use crate::translator::Translator;

/// Lookup of raw templates by message key and locale
pub trait TemplateSource {
    fn lookup(&self, key: &str, locale: &str) -> Option<&str>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for &T {
    fn lookup(&self, key: &str, locale: &str) -> Option<&str> {
        (**self).lookup(key, locale)
    }
}

/// Templates held in memory, keyed by locale then message key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemorySource {
    templates: HashMap<String, HashMap<String, String>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `template` for `key` in `locale`, replacing any previous one
    pub fn put(
        &mut self,
        key: impl Into<String>,
        locale: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<&mut Self, ArgumentError> {
        let key = key.into();
        let locale = locale.into();
        ArgumentError::require(&key, "message key")?;
        ArgumentError::require(&locale, "locale")?;

        self.templates
            .entry(locale)
            .or_default()
            .insert(key, template.into());
        Ok(self)
    }

    /// Number of stored templates across all locales
    pub fn len(&self) -> usize {
        self.templates.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locales with at least one template, sorted
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }
}

impl TemplateSource for InMemorySource {
    fn lookup(&self, key: &str, locale: &str) -> Option<&str> {
        self.templates
            .get(locale)
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
    }
}

/// A resolver configuration together with the templates written for it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    config: ResolverConfig,
    source: InMemorySource,
}

/// TOML structure for deserializing catalogs
#[derive(Deserialize)]
struct TomlCatalog {
    syntax: Option<TomlSyntax>,
    #[serde(default)]
    messages: HashMap<String, HashMap<String, String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TomlSyntax {
    prefix: Option<String>,
    suffix: Option<String>,
    default_delimiter: Option<String>,
    escape: Option<String>,
    preserve_escapes: Option<bool>,
    max_depth: Option<usize>,
}

impl TomlSyntax {
    fn into_config(self) -> Result<ResolverConfig, CatalogError> {
        let mut builder = ResolverConfig::builder();
        if let Some(prefix) = self.prefix {
            builder = builder.with_prefix(prefix);
        }
        if let Some(suffix) = self.suffix {
            builder = builder.with_suffix(suffix);
        }
        if let Some(delimiter) = self.default_delimiter {
            builder = builder.with_default_delimiter(delimiter);
        }
        if let Some(escape) = self.escape {
            builder = builder.with_escape_str(&escape)?;
        }
        if let Some(preserve) = self.preserve_escapes {
            builder = builder.with_preserve_escapes(preserve);
        }
        if let Some(max_depth) = self.max_depth {
            builder = builder.with_max_depth(max_depth);
        }
        Ok(builder.build()?)
    }
}

impl Catalog {
    pub fn new(config: ResolverConfig, source: InMemorySource) -> Self {
        Self { config, source }
    }

    /// Load a catalog from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog: Catalog = content.parse()?;
        debug!(path = %path.display(), templates = catalog.source.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn source(&self) -> &InMemorySource {
        &self.source
    }

    /// A translator over this catalog's templates, using its syntax
    pub fn into_translator(self) -> Translator<InMemorySource> {
        Translator::new(self.source, Resolver::new(self.config))
    }
}

impl FromStr for Catalog {
    type Err = CatalogError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let parsed: TomlCatalog = toml::from_str(content)?;

        let config = match parsed.syntax {
            Some(syntax) => syntax.into_config()?,
            None => ResolverConfig::default(),
        };

        let mut source = InMemorySource::new();
        for (locale, messages) in parsed.messages {
            for (key, template) in messages {
                source.put(key, locale.as_str(), template)?;
            }
        }

        Ok(Catalog { config, source })
    }
}

impl TemplateSource for Catalog {
    fn lookup(&self, key: &str, locale: &str) -> Option<&str> {
        self.source.lookup(key, locale)
    }
}
