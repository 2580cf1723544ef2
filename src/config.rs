//! Configuration for template resolution

use crate::error::ConfigError;

/// Default token that opens a parameter region
pub const DEFAULT_PREFIX: &str = "{";
/// Default token that closes a parameter region
pub const DEFAULT_SUFFIX: &str = "}";
/// Default token separating a parameter name from its default value
pub const DEFAULT_DEFAULT_DELIMITER: &str = ":-";
/// Default escape character
pub const DEFAULT_ESCAPE: char = '\\';
/// Default bound on nested expansions within one resolution
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Validated, immutable delimiter configuration shared by every resolution.
///
/// The prefix, suffix, default delimiter and the escape character (as a
/// one-character string) are pairwise distinct and non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolverConfig {
    prefix: String,
    suffix: String,
    default_delimiter: String,
    escape: char,
    preserve_escapes: bool,
    max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            default_delimiter: DEFAULT_DEFAULT_DELIMITER.to_string(),
            escape: DEFAULT_ESCAPE,
            preserve_escapes: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolverConfig {
    /// Create a validated configuration with the default recursion bound
    pub fn new(
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        default_delimiter: impl Into<String>,
        escape: char,
        preserve_escapes: bool,
    ) -> Result<Self, ConfigError> {
        Self::builder()
            .with_prefix(prefix)
            .with_suffix(suffix)
            .with_default_delimiter(default_delimiter)
            .with_escape(escape)
            .with_preserve_escapes(preserve_escapes)
            .build()
    }

    /// Start a builder seeded with the default tokens
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    /// Start a builder seeded with this configuration's settings
    pub fn to_builder(&self) -> ResolverConfigBuilder {
        ResolverConfigBuilder {
            config: self.clone(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn default_delimiter(&self) -> &str {
        &self.default_delimiter
    }

    pub fn escape(&self) -> char {
        self.escape
    }

    /// Whether an escape character in front of a prefix is kept in the output
    pub fn preserves_escapes(&self) -> bool {
        self.preserve_escapes
    }

    /// Maximum nesting of name, default and value expansions
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let escape = self.escape.to_string();
        let tokens = [
            ("prefix", self.prefix.as_str()),
            ("suffix", self.suffix.as_str()),
            ("default delimiter", self.default_delimiter.as_str()),
            ("escape", escape.as_str()),
        ];

        for (token, value) in &tokens[..3] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyToken { token: *token });
            }
        }
        if self.escape.is_whitespace() {
            return Err(ConfigError::EmptyToken { token: "escape" });
        }

        for (i, (first, a)) in tokens.iter().enumerate() {
            for (second, b) in &tokens[i + 1..] {
                if a == b {
                    return Err(ConfigError::DuplicateTokens {
                        first: *first,
                        second: *second,
                        value: (*a).to_string(),
                    });
                }
            }
        }

        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}

/// Mutable accumulator for a [`ResolverConfig`], validated once by [`build`].
///
/// [`build`]: ResolverConfigBuilder::build
#[derive(Debug, Clone, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Set the token that opens a region
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    /// Set the token that closes a region
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.suffix = suffix.into();
        self
    }

    /// Set the token separating a name from its default value
    pub fn with_default_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.default_delimiter = delimiter.into();
        self
    }

    /// Set the escape character
    pub fn with_escape(mut self, escape: char) -> Self {
        self.config.escape = escape;
        self
    }

    /// Set the escape character from text, which must hold exactly one character
    pub fn with_escape_str(self, escape: &str) -> Result<Self, ConfigError> {
        let mut chars = escape.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(self.with_escape(c)),
            _ => Err(ConfigError::InvalidEscape {
                value: escape.to_string(),
            }),
        }
    }

    /// Keep or drop escape characters in front of escaped prefixes
    pub fn with_preserve_escapes(mut self, preserve: bool) -> Self {
        self.config.preserve_escapes = preserve;
        self
    }

    /// Set the recursion bound
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Validate and freeze the configuration
    pub fn build(self) -> Result<ResolverConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
