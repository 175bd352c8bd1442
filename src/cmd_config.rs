//! Configuration check.

use std::path::Path;

use tracing::warn;

use slactac_config::{Config, ConfigValidator};

/// Validate the loaded configuration and report problems.
pub(crate) fn check_config(path: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        warn!("{} not found, checking defaults", path.display());
    }

    let result = ConfigValidator::validate(config)?;
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    if result.is_valid() {
        println!("Configuration OK");
        Ok(())
    } else {
        Err(format!("{} configuration error(s)", result.errors.len()).into())
    }
}
