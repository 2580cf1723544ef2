//! Parameter declarations - the canonical written form of a parameter reference

use crate::config::ResolverConfig;
use crate::error::ArgumentError;

/// `prefix + key + suffix`
pub fn declare(config: &ResolverConfig, key: &str) -> Result<String, ArgumentError> {
    ArgumentError::require(key, "parameter key")?;
    Ok(format!("{}{}{}", config.prefix(), key, config.suffix()))
}

/// `prefix + key + delimiter + default + suffix`, with an absent default written as empty
pub fn declare_with_default(
    config: &ResolverConfig,
    key: &str,
    default: Option<&str>,
) -> Result<String, ArgumentError> {
    ArgumentError::require(key, "parameter key")?;
    Ok(format!(
        "{}{}{}{}{}",
        config.prefix(),
        key,
        config.default_delimiter(),
        default.unwrap_or_default(),
        config.suffix()
    ))
}
