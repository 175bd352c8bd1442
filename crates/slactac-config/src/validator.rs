//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_selectors(config, &mut result);
        Self::validate_detector(config, &mut result);
        Self::validate_picker(config, &mut result);
        Self::validate_storage(config, &mut result);
        Self::validate_security(config, &mut result);

        Ok(result)
    }

    /// Validate and turn the first error into a [`ConfigError`].
    pub fn ensure_valid(config: &Config) -> Result<ValidationResult, ConfigError> {
        let result = Self::validate(config)?;
        if let Some(first) = result.errors.first() {
            return Err(ConfigError::InvalidValue {
                field: first.path.clone(),
                message: first.message.clone(),
            });
        }
        Ok(result)
    }

    fn validate_selectors(config: &Config, result: &mut ValidationResult) {
        let selectors = &config.selectors;
        for (path, value) in [
            ("selectors.label_class", &selectors.label_class),
            ("selectors.sidebar_class", &selectors.sidebar_class),
            ("selectors.origin_key", &selectors.origin_key),
        ] {
            if value.trim().is_empty() {
                result.add_error(ValidationError::new(path, "cannot be empty"));
            }
        }

        if selectors.label_class == selectors.sidebar_class {
            result.add_error(ValidationError::new(
                "selectors.sidebar_class",
                "sidebar_class must differ from label_class",
            ));
        }
    }

    fn validate_detector(config: &Config, result: &mut ValidationResult) {
        if config.detector.debounce_ms == 0 {
            result.add_error(ValidationError::new(
                "detector.debounce_ms",
                "debounce_ms must be greater than 0",
            ));
        }

        if config.detector.debounce_ms > 5_000 {
            result.add_warning(ValidationWarning::new(
                "detector.debounce_ms",
                "debounce_ms is very high (>5000), renamed labels will lag behind the page",
            ));
        }
    }

    fn validate_picker(config: &Config, result: &mut ValidationResult) {
        let picker = &config.picker;

        if picker.target_hosts.iter().all(|h| h.trim().is_empty()) {
            result.add_error(ValidationError::new(
                "picker.target_hosts",
                "at least one target host is required",
            ));
        }

        if !(picker.max_viewport_fraction > 0.0 && picker.max_viewport_fraction <= 1.0) {
            result.add_error(ValidationError::new(
                "picker.max_viewport_fraction",
                "max_viewport_fraction must be in (0, 1]",
            ));
        }

        if picker.min_size_px < 0.0 || picker.min_size_px.is_nan() {
            result.add_error(ValidationError::new(
                "picker.min_size_px",
                "min_size_px cannot be negative",
            ));
        } else if picker.min_size_px > 100.0 {
            result.add_warning(ValidationWarning::new(
                "picker.min_size_px",
                "min_size_px is very high (>100), most labels will be unpickable",
            ));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        let storage = &config.storage;
        if storage.overrides_key.trim().is_empty() {
            result.add_error(ValidationError::new(
                "storage.overrides_key",
                "cannot be empty",
            ));
        }
        if storage.last_picked_key.trim().is_empty() {
            result.add_error(ValidationError::new(
                "storage.last_picked_key",
                "cannot be empty",
            ));
        }
    }

    fn validate_security(config: &Config, result: &mut ValidationResult) {
        if config.security.extension_id.trim().is_empty() {
            result.add_error(ValidationError::new(
                "security.extension_id",
                "extension_id cannot be empty",
            ));
        }

        for (i, pattern) in config.security.extra_denylist.iter().enumerate() {
            let path = format!("security.extra_denylist[{}]", i);
            if pattern.trim().is_empty() {
                result.add_error(ValidationError::new(path, "pattern cannot be empty"));
            } else if let Err(e) = regex::Regex::new(pattern) {
                result.add_error(ValidationError::new(path, format!("invalid pattern: {}", e)));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
