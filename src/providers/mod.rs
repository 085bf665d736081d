/*!
 * Translation backend implementations.
 *
 * This module contains client implementations for machine-translation services:
 * - Yandex: Yandex Cloud Translate REST API
 * - Mock: Scripted backend used by tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::glossary::GlossaryEntry;

/// One batch translation request
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    /// Texts to translate, in row order
    pub texts: &'a [String],
    /// Target language code
    pub target_language: &'a str,
    /// Source language code, `None` for auto-detection
    pub source_language: Option<&'a str>,
    /// Glossary pairs sent with the request
    pub glossary: &'a [GlossaryEntry],
    /// Whether the backend should spell-check the input
    pub speller: bool,
}

/// Common trait for all translation backends
///
/// Implementations translate a batch of texts and return the translations in
/// the same order as the request texts.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Translate a batch of texts
    ///
    /// # Returns
    /// * `Result<Vec<String>, ProviderError>` - One translation per request text, or an error
    async fn translate_batch(&self, request: BatchRequest<'_>) -> Result<Vec<String>, ProviderError>;
}

pub mod mock;
pub mod yandex;
