//! Translation: look up a message's template, then resolve it

use tracing::warn;

use crate::catalog::TemplateSource;
use crate::message::Translatable;
use crate::template::Resolver;

/// Turns [`Translatable`] messages into text using templates from a source
#[derive(Debug, Clone)]
pub struct Translator<S> {
    source: S,
    resolver: Resolver,
}

impl<S: TemplateSource> Translator<S> {
    pub fn new(source: S, resolver: Resolver) -> Self {
        Self { source, resolver }
    }

    /// The raw template for `key` in `locale`.
    ///
    /// A missing template yields an empty string rather than an error.
    pub fn lookup(&self, key: &str, locale: &str) -> String {
        match self.source.lookup(key, locale) {
            Some(template) => template.to_string(),
            None => {
                warn!(key, locale, "no template for message");
                String::new()
            }
        }
    }

    /// Look up the message's template and resolve it with the message's parameters
    pub fn translate<T: Translatable + ?Sized>(&self, message: &T, locale: &str) -> String {
        let template = self.lookup(message.key(), locale);
        self.resolver.resolve(&template, message.parameters())
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
