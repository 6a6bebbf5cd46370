/// Errors that can occur during configuration loading
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is missing or empty")]
    MissingVariable(String),

    #[error("Environment variable {0} still holds a placeholder value")]
    PlaceholderValue(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Fetch a required variable, rejecting empty and placeholder values
pub fn require<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingVariable(key.to_string()))?;

    if is_placeholder(&value) {
        return Err(ConfigError::PlaceholderValue(key.to_string()));
    }

    Ok(value)
}

/// Values copied verbatim from an `.env.example` template
pub fn is_placeholder(value: &str) -> bool {
    let lower = value.trim().to_lowercase();

    lower.starts_with("your")
        || lower.contains("placeholder")
        || lower.contains("changeme")
        || lower.contains("...")
        || lower == "0x"
        || (lower.starts_with('<') && lower.ends_with('>'))
}
