use crate::config::types::{Config, CrawlerConfig, DomainEntry, OcrConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_ocr_config(&config.ocr)?;
    validate_output_config(&config.output)?;
    validate_seeds(&config.seeds)?;
    validate_deny_list(&config.deny)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates OCR configuration
fn validate_ocr_config(config: &OcrConfig) -> Result<(), ConfigError> {
    if config.languages.is_empty() {
        return Err(ConfigError::Validation(
            "ocr.languages must name at least one language".to_string(),
        ));
    }

    // Tesseract language codes: lowercase letters plus script suffixes
    // like "aze_cyrl".
    for lang in &config.languages {
        if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
            return Err(ConfigError::Validation(format!(
                "'{}' is not a valid OCR language code",
                lang
            )));
        }
    }

    if config.render_width < 100 || config.render_width > 10_000 {
        return Err(ConfigError::Validation(format!(
            "ocr.render-width must be between 100 and 10000 pixels, got {}",
            config.render_width
        )));
    }

    if config.max_concurrent < 1 {
        return Err(ConfigError::Validation(format!(
            "ocr.max-concurrent must be >= 1, got {}",
            config.max_concurrent
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.text_dir.is_empty() {
        return Err(ConfigError::Validation(
            "text_dir cannot be empty".to_string(),
        ));
    }

    if config.metadata_path.is_empty() {
        return Err(ConfigError::Validation(
            "metadata_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the seed URL list
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use an HTTP(S) scheme",
                seed
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' has no host",
                seed
            )));
        }
    }

    Ok(())
}

/// Validates deny-list domain entries
fn validate_deny_list(entries: &[DomainEntry]) -> Result<(), ConfigError> {
    for entry in entries {
        validate_domain_pattern(&entry.domain)?;
    }
    Ok(())
}

/// Validates a domain pattern ("example.com" or "*.example.com")
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    let base = pattern.strip_prefix("*.").unwrap_or(pattern);

    if base.is_empty() || base.contains('*') {
        return Err(ConfigError::InvalidPattern(format!(
            "Invalid domain pattern '{}'",
            pattern
        )));
    }

    if !base
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain pattern '{}' contains invalid characters",
            pattern
        )));
    }

    Ok(())
}

/// Basic email validation: one '@', non-empty local part and domain
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "'{}' is not a valid contact email",
            email
        )));
    }

    Ok(())
}
