/*!
 * # loctool - localization exchange table translator
 *
 * A Rust library for moving game text through a translation backend.
 *
 * ## Features
 *
 * - Extract CJK fields of a `#`-separated text asset into an exchange table
 * - Translate pending table rows in character-bounded batches
 * - Send a bounded glossary with every request
 * - Apply translations back by line, field and original text
 * - Estimate request count and cost before translating
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `exchange_table`: Exchange table decoding and encoding
 * - `template`: Extraction from and application to the source asset
 * - `glossary`: Glossary loading and limiting
 * - `translation`: Batch planning, cost estimation and the translation pipeline
 * - `providers`: Translation backend clients
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod exchange_table;
pub mod file_utils;
pub mod glossary;
pub mod language_utils;
pub mod providers;
pub mod template;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{ConfigError, ProviderError, TableError, TranslationError};
pub use exchange_table::{Delimiter, ExchangeTable, Row};
pub use glossary::GlossaryEntry;
pub use translation::{TablePipeline, TranslationStats};
