use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Timeout must be positive: {field}")]
    ZeroTimeout { field: &'static str },

    #[error("transform.part_size must be positive")]
    ZeroPartSize,

    #[error("server.max_event_bytes must be positive")]
    ZeroEventLimit,

    #[error("transform.transformer must name a transformer")]
    MissingTransformer,

    #[error("fetch.user_agent must not be empty")]
    EmptyUserAgent,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_fetch(config)?;
    validate_transform(config)?;
    validate_server(config)?;
    Ok(())
}

fn validate_fetch(config: &Config) -> Result<(), ValidationError> {
    if config.fetch.connect_timeout_ms == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "fetch.connect_timeout_ms",
        });
    }

    if config.fetch.request_timeout_ms == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "fetch.request_timeout_ms",
        });
    }

    if config.fetch.user_agent.trim().is_empty() {
        return Err(ValidationError::EmptyUserAgent);
    }

    Ok(())
}

fn validate_transform(config: &Config) -> Result<(), ValidationError> {
    if config.transform.transformer.trim().is_empty() {
        return Err(ValidationError::MissingTransformer);
    }

    if config.transform.part_size.as_u64() == 0 {
        return Err(ValidationError::ZeroPartSize);
    }

    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_event_bytes.as_u64() == 0 {
        return Err(ValidationError::ZeroEventLimit);
    }

    Ok(())
}
