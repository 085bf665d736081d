/*!
 * Mock provider implementation for testing.
 *
 * This module provides a scripted backend that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds, one translation per text
 * - `MockProvider::failing()` - Always fails with an API error
 * - `MockProvider::failing_on_call(n)` - Fails only on the n-th call
 * - `MockProvider::short()` - Returns one translation fewer than requested
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{BatchRequest, Provider};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Always fails with an error
    Failing,
    /// Fails on the given 1-based call, succeeds otherwise
    FailOnCall { call: usize },
    /// Drops the last translation of every response
    Short,
}

/// Mock provider for testing pipeline behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Call counter, shared between clones
    call_count: Arc<AtomicUsize>,
    /// Texts of every received batch, shared between clones
    received: Arc<Mutex<Vec<Vec<String>>>>,
    /// Custom per-text translation (optional)
    custom_response: Option<fn(&str, &str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails only on the given 1-based call
    pub fn failing_on_call(call: usize) -> Self {
        Self::new(MockBehavior::FailOnCall { call })
    }

    /// Create a mock that returns fewer translations than requested
    pub fn short() -> Self {
        Self::new(MockBehavior::Short)
    }

    /// Set a custom translation function taking (text, target language)
    pub fn with_custom_response(mut self, generator: fn(&str, &str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Texts of every batch received so far, in call order
    pub fn received_batches(&self) -> Vec<Vec<String>> {
        self.received.lock().clone()
    }

    fn translate_one(&self, text: &str, target_language: &str) -> String {
        match self.custom_response {
            Some(generator) => generator(text, target_language),
            None => format!("[{}] {}", target_language, text),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn translate_batch(&self, request: BatchRequest<'_>) -> Result<Vec<String>, ProviderError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.received.lock().push(request.texts.to_vec());

        let fail = match self.behavior {
            MockBehavior::Failing => true,
            MockBehavior::FailOnCall { call: failing_call } => call == failing_call,
            MockBehavior::Working | MockBehavior::Short => false,
        };
        if fail {
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: format!("Simulated provider failure (call #{})", call),
            });
        }

        let mut translations: Vec<String> = request
            .texts
            .iter()
            .map(|t| self.translate_one(t, request.target_language))
            .collect();

        if self.behavior == MockBehavior::Short {
            translations.pop();
        }

        Ok(translations)
    }
}
