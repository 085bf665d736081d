/*!
 * Error types for the loctool application.
 *
 * This module contains custom error types for the different stages of the
 * localization workflow, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when sending the request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Non-success status returned by the API
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Response body returned by the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while reading or writing an exchange table
#[derive(Error, Debug)]
pub enum TableError {
    /// Header lacks one of the required columns
    #[error(
        "Table must contain columns: original_line_no, field_index, orig_text, translated_text. Found: {}",
        found.join(", ")
    )]
    MissingColumns {
        /// Columns actually present in the header
        found: Vec<String>,
    },

    /// Delimiter option could not be resolved to a single ASCII character
    #[error("Invalid delimiter: {0:?}")]
    InvalidDelimiter(String),

    /// Table text could not be read as delimited records
    #[error("Malformed table data: {0}")]
    Csv(#[from] csv::Error),

    /// Encoded table could not be produced
    #[error("Failed to encode table: {0}")]
    Encode(String),
}

/// Errors that can occur while running the translation pipeline
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Backend call for a batch failed
    #[error("Batch {batch} of {total} failed: {source}")]
    Batch {
        /// 1-based batch position
        batch: usize,
        /// Number of planned batches
        total: usize,
        /// Underlying provider failure
        #[source]
        source: ProviderError,
    },

    /// Backend returned a different number of translations than texts sent
    #[error("Batch {batch}: backend returned {actual} translations for {expected} texts")]
    Misaligned {
        /// 1-based batch position
        batch: usize,
        /// Number of texts sent
        expected: usize,
        /// Number of translations received
        actual: usize,
    },

    /// Input table could not be decoded
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file does not exist
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Config file exists but could not be read or parsed
    #[error("Failed to read config {path}: {reason}")]
    Unreadable {
        /// Path of the config file
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// Config values are inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
