//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use url::Url;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_user_agent(&config.http.user_agent)?;
    validate_timeout("connect_timeout_secs", config.http.connect_timeout_secs)?;
    validate_timeout("page_timeout_secs", config.http.page_timeout_secs)?;
    validate_timeout("read_timeout_secs", config.http.read_timeout_secs)?;

    if config.options.download_directory.as_os_str().is_empty() {
        return Err(Error::MissingConfig("download_directory".to_string()));
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    if user_agent.contains(['\r', '\n']) {
        return Err(Error::ConfigValidation {
            field: "user_agent".to_string(),
            message: "User agent must be a single line".to_string(),
        });
    }

    Ok(())
}

/// Validate that a timeout is positive.
pub fn validate_timeout(field: &str, seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Timeout must be at least 1 second".to_string(),
        });
    }

    Ok(())
}

/// Validate a remote page URL: must be absolute http or https.
pub fn validate_page_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim()).map_err(|e| Error::ConfigValidation {
        field: "url".to_string(),
        message: format!("'{}' is not a valid URL: {}", input, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::ConfigValidation {
            field: "url".to_string(),
            message: format!("Unsupported URL scheme '{}', expected http or https", scheme),
        }),
    }
}
