//! Configuration loading and management

use crate::core::settings::Settings;
use crate::core::value::Value;
use crate::validators::{ExtraOptions, SchemaValidator};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Which built-in validator a configuration selects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    /// Strict schema validation
    #[default]
    Schema,

    /// Schema validation with coercion
    Lax,
}

/// Validation settings as read from YAML
///
/// ```yaml
/// validator: lax
/// replace_args: true
/// replace_result: false
/// extra:
///   allow_extra_fields: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub validator: ValidatorKind,

    /// Substitute arguments with normalized values
    #[serde(default = "default_true")]
    pub replace_args: bool,

    /// Substitute the return value with its normalized value
    #[serde(default = "default_true")]
    pub replace_result: bool,

    /// Options forwarded to the validator unchanged
    #[serde(default)]
    pub extra: ExtraOptions,
}

fn default_true() -> bool {
    true
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validator: ValidatorKind::default(),
            replace_args: true,
            replace_result: true,
            extra: ExtraOptions::new(),
        }
    }
}

impl ValidationConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Look up an extra option
    pub fn extra_option(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Build the settings this configuration describes
    pub fn into_settings(self) -> Settings {
        let validator = match self.validator {
            ValidatorKind::Schema => SchemaValidator::strict(),
            ValidatorKind::Lax => SchemaValidator::lax(),
        };
        Settings::new(validator)
            .with_replace_args(self.replace_args)
            .with_replace_result(self.replace_result)
            .with_extra_options(self.extra)
    }
}
