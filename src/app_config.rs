use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::errors::ConfigError;
use crate::exchange_table::Delimiter;
use crate::file_utils::FileManager;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading
/// and validating configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Translation backend settings
    #[serde(default, alias = "Yandex")]
    pub backend: BackendConfig,

    /// Request and glossary limits
    #[serde(default, alias = "Limits")]
    pub limits: LimitsConfig,

    /// Default file locations
    #[serde(default, alias = "Files")]
    pub files: FilesConfig,

    /// Exchange table delimiter (`#`, `,`, `;`, `|`, `tab` or any single ASCII character)
    #[serde(default = "default_delimiter", alias = "Delimiter")]
    pub delimiter: String,

    /// Backend price per million characters, used by cost estimation
    #[serde(default, alias = "PricePerMillion")]
    pub price_per_million: Option<f64>,

    /// Log level
    #[serde(default, alias = "LogLevel")]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            limits: LimitsConfig::default(),
            files: FilesConfig::default(),
            delimiter: default_delimiter(),
            price_per_million: None,
            log_level: LogLevel::default(),
        }
    }
}

/// Translation backend configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    // @field: API key or IAM token
    #[serde(default, alias = "ApiKey")]
    pub api_key: String,

    // @field: Cloud folder id
    #[serde(default, alias = "FolderId")]
    pub folder_id: Option<String>,

    // @field: Send the key as a Bearer token instead of Api-Key
    #[serde(default, alias = "UseBearerToken")]
    pub use_bearer_token: bool,

    // @field: Service URL
    #[serde(default = "default_endpoint", alias = "Endpoint")]
    pub endpoint: String,

    // @field: Source language, empty or "auto" for detection
    #[serde(default = "default_source_lang", alias = "DefaultSourceLang")]
    pub default_source_lang: String,

    // @field: Target language
    #[serde(default = "default_target_lang", alias = "DefaultTargetLang")]
    pub default_target_lang: String,

    // @field: Glossary JSON file
    #[serde(default = "default_glossary_path", alias = "GlossaryPath")]
    pub glossary_path: String,

    // @field: Ask the backend to spell-check input
    #[serde(default, alias = "Speller")]
    pub speller: bool,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs", alias = "TimeoutSecs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            folder_id: None,
            use_bearer_token: false,
            endpoint: default_endpoint(),
            default_source_lang: default_source_lang(),
            default_target_lang: default_target_lang(),
            glossary_path: default_glossary_path(),
            speller: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Value of the Authorization header
    pub fn auth_header(&self) -> String {
        if self.use_bearer_token {
            format!("Bearer {}", self.api_key)
        } else {
            format!("Api-Key {}", self.api_key)
        }
    }

    /// Source language to send, `None` when the backend should detect it
    pub fn source_language(&self) -> Option<&str> {
        if language_utils::is_auto_detect(&self.default_source_lang) {
            None
        } else {
            Some(self.default_source_lang.trim())
        }
    }
}

/// Request and glossary limits
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LimitsConfig {
    /// Character budget per translation request
    #[serde(default = "default_max_chars_per_request", alias = "MaxCharsPerRequest")]
    pub max_chars_per_request: usize,

    /// Maximum glossary pairs sent with each request
    #[serde(default = "default_max_glossary_pairs", alias = "MaxGlossaryPairs")]
    pub max_glossary_pairs: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_chars_per_request: default_max_chars_per_request(),
            max_glossary_pairs: default_max_glossary_pairs(),
        }
    }
}

/// Default file locations used when a command omits a path
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilesConfig {
    #[serde(default = "default_input", alias = "DefaultInput")]
    pub default_input: String,

    #[serde(default = "default_output", alias = "DefaultOutput")]
    pub default_output: String,

    #[serde(default = "default_table", alias = "DefaultTable")]
    pub default_table: String,

    #[serde(default = "default_table_out", alias = "DefaultTableOut")]
    pub default_table_out: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            default_input: default_input(),
            default_output: default_output(),
            default_table: default_table(),
            default_table_out: default_table_out(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_delimiter() -> String {
    "#".to_string()
}

fn default_endpoint() -> String {
    crate::providers::yandex::DEFAULT_ENDPOINT.to_string()
}

fn default_source_lang() -> String {
    "zh".to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

fn default_glossary_path() -> String {
    "glossary.json".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_chars_per_request() -> usize {
    10_000
}

fn default_max_glossary_pairs() -> usize {
    50
}

fn default_input() -> String {
    "input.txt".to_string()
}

fn default_output() -> String {
    "output.txt".to_string()
}

fn default_table() -> String {
    "strings.tsv".to_string()
}

fn default_table_out() -> String {
    "strings_out.tsv".to_string()
}

/// Check that a price per million characters is a finite, non-negative number
pub fn validate_price(price: f64) -> Result<(), ConfigError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ConfigError::Invalid(format!("price_per_million must be non-negative, got {}", price)));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let unreadable = |reason: String| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        let content = FileManager::read_to_string(path).map_err(|e| unreadable(format!("{:#}", e)))?;
        Self::from_json(&content).map_err(|e| unreadable(e.to_string()))
    }

    /// Parse configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolved table delimiter
    pub fn table_delimiter(&self) -> Result<Delimiter, ConfigError> {
        self.delimiter
            .parse()
            .map_err(|e: crate::errors::TableError| ConfigError::Invalid(e.to_string()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        language_utils::validate_source_language(&self.backend.default_source_lang)
            .map_err(|e| ConfigError::Invalid(format!("source language: {}", e)))?;
        language_utils::validate_language_code(&self.backend.default_target_lang)
            .map_err(|e| ConfigError::Invalid(format!("target language: {}", e)))?;

        if self.limits.max_chars_per_request == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_chars_per_request must be greater than 0".to_string(),
            ));
        }

        if let Some(price) = self.price_per_million {
            validate_price(price)?;
        }

        self.table_delimiter()?;
        Ok(())
    }

    /// Validate the settings needed to call the translation backend
    pub fn validate_backend(&self) -> Result<(), ConfigError> {
        if self.backend.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "backend.api_key is required to call the translation backend".to_string(),
            ));
        }
        Ok(())
    }
}
