//! # Toolkit configuration
//!
//! [`ToolsConfig`] is a plain value owned by the application and passed by
//! reference into every helper. The toolkit never writes back into it:
//! defaults for unset (zero) size limits are resolved by [`ToolsConfig::limits`].
//!
//! ```rust
//! use toolkit_core::ToolsConfig;
//!
//! let config = ToolsConfig::new()
//!     .allow_file_type("image/png")
//!     .allow_file_type("image/jpeg")
//!     .with_max_json_size(64 * 1024);
//!
//! assert_eq!(config.limits().max_file_size, toolkit_core::DEFAULT_MAX_FILE_SIZE);
//! assert_eq!(config.limits().max_json_size, 64 * 1024);
//! ```
//!
//! ## Environment overrides
//! Applications that configure through the environment can use
//! [`ToolsConfig::from_env`] with their own prefix:
//!
//! ```bash
//! export MYAPP_MAX_FILE_SIZE=10485760
//! export MYAPP_ALLOWED_FILE_TYPES=image/png,image/jpeg
//! export MYAPP_MAX_JSON_SIZE=65536
//! export MYAPP_ALLOW_UNKNOWN_JSON_FIELDS=false
//! ```

use serde::{Deserialize, Serialize};

use crate::{ToolkitError, ToolkitResult};

/// Upload cap used when `max_file_size` is zero (1 GiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// JSON body cap used when `max_json_size` is zero (1 MiB).
pub const DEFAULT_MAX_JSON_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Maximum size of a multipart upload in bytes (0 = 1 GiB)
    pub max_file_size: u64,

    /// The only MIME types accepted for uploads (empty = all allowed)
    pub allowed_file_types: Vec<String>,

    /// Maximum size of a JSON request body in bytes (0 = 1 MiB)
    pub max_json_size: u64,

    /// Accept object keys the target type does not declare
    pub allow_unknown_json_fields: bool,
}

/// Size limits with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_file_size: u64,
    pub max_json_size: u64,
}

impl ToolsConfig {
    /// Create a config with every value at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the upload size cap
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Add one MIME type to the upload allow-list
    pub fn allow_file_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.allowed_file_types.push(content_type.into());
        self
    }

    /// Replace the upload allow-list
    pub fn with_allowed_file_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_file_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the JSON body size cap
    pub fn with_max_json_size(mut self, bytes: u64) -> Self {
        self.max_json_size = bytes;
        self
    }

    /// Accept or reject unknown JSON object keys
    pub fn allow_unknown_json_fields(mut self, allow: bool) -> Self {
        self.allow_unknown_json_fields = allow;
        self
    }

    /// Effective limits, with zero values replaced by the defaults.
    pub fn limits(&self) -> Limits {
        Limits {
            max_file_size: non_zero_or(self.max_file_size, DEFAULT_MAX_FILE_SIZE),
            max_json_size: non_zero_or(self.max_json_size, DEFAULT_MAX_JSON_SIZE),
        }
    }

    /// Whether a sniffed content type passes the allow-list.
    ///
    /// Comparison is case-insensitive and matches either the full type
    /// (`text/plain; charset=utf-8`) or its essence (`text/plain`).
    pub fn is_file_type_allowed(&self, content_type: &str) -> bool {
        if self.allowed_file_types.is_empty() {
            return true;
        }

        let essence = content_type.split(';').next().unwrap_or(content_type).trim();
        self.allowed_file_types.iter().any(|allowed| {
            let allowed = allowed.trim();
            allowed.eq_ignore_ascii_case(content_type) || allowed.eq_ignore_ascii_case(essence)
        })
    }

    /// Build a config from `<prefix>`-prefixed environment variables.
    ///
    /// Missing variables keep their defaults; present but unparsable values fail.
    pub fn from_env(prefix: &str) -> ToolkitResult<Self> {
        let mut config = Self::default();

        if let Some(value) = env_var(prefix, "MAX_FILE_SIZE") {
            config.max_file_size = parse_env(prefix, "MAX_FILE_SIZE", &value)?;
        }
        if let Some(value) = env_var(prefix, "ALLOWED_FILE_TYPES") {
            config.allowed_file_types = value
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(value) = env_var(prefix, "MAX_JSON_SIZE") {
            config.max_json_size = parse_env(prefix, "MAX_JSON_SIZE", &value)?;
        }
        if let Some(value) = env_var(prefix, "ALLOW_UNKNOWN_JSON_FIELDS") {
            config.allow_unknown_json_fields = parse_env(prefix, "ALLOW_UNKNOWN_JSON_FIELDS", &value)?;
        }

        Ok(config)
    }
}

fn non_zero_or(value: u64, default: u64) -> u64 {
    if value == 0 {
        default
    } else {
        value
    }
}

fn env_var(prefix: &str, key: &str) -> Option<String> {
    std::env::var(format!("{prefix}{key}")).ok()
}

fn parse_env<T>(prefix: &str, key: &str, value: &str) -> ToolkitResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ToolkitError::config(format!("{prefix}{key}"), e.to_string()))
}
