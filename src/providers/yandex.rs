use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::glossary::GlossaryEntry;
use crate::providers::{BatchRequest, Provider};

/// Default REST endpoint of Yandex Cloud Translate
pub const DEFAULT_ENDPOINT: &str = "https://translate.api.cloud.yandex.net/translate/v2/translate";

/// Yandex Cloud Translate client
#[derive(Debug)]
pub struct YandexTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Full value of the Authorization header ("Api-Key ..." or "Bearer ...")
    auth_header: String,
    /// Cloud folder the request is billed to
    folder_id: Option<String>,
    /// API endpoint URL
    endpoint: String,
}

/// Translate request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    folder_id: Option<String>,

    target_language_code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    source_language_code: Option<String>,

    format: &'static str,

    speller: bool,

    texts: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    glossary_config: Option<GlossaryConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GlossaryConfig {
    glossary_data: GlossaryData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GlossaryData {
    glossary_pairs: Vec<GlossaryPair>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GlossaryPair {
    source_text: String,
    translated_text: String,
    exact: bool,
}

impl From<&GlossaryEntry> for GlossaryPair {
    fn from(entry: &GlossaryEntry) -> Self {
        Self {
            source_text: entry.source.clone(),
            translated_text: entry.target.clone(),
            exact: entry.exact,
        }
    }
}

/// Translate response body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    #[serde(default)]
    pub translations: Vec<TranslatedText>,
}

/// One translation in the response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedText {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub detected_language_code: Option<String>,
}

impl TranslateRequest {
    /// Build the wire request for a batch
    pub fn from_batch(request: &BatchRequest<'_>, folder_id: Option<&str>) -> Self {
        let glossary_config = (!request.glossary.is_empty()).then(|| GlossaryConfig {
            glossary_data: GlossaryData {
                glossary_pairs: request.glossary.iter().map(GlossaryPair::from).collect(),
            },
        });

        Self {
            folder_id: folder_id.map(str::to_string),
            target_language_code: request.target_language.to_string(),
            source_language_code: request
                .source_language
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            format: "PLAIN_TEXT",
            speller: request.speller,
            texts: request.texts.to_vec(),
            glossary_config,
        }
    }
}

impl TranslateResponse {
    /// Translations in response order, missing texts as empty strings
    pub fn into_texts(self) -> Vec<String> {
        self.translations
            .into_iter()
            .map(|t| t.text.unwrap_or_default())
            .collect()
    }
}

impl YandexTranslate {
    /// Create a new Yandex client
    pub fn new(
        auth_header: impl Into<String>,
        folder_id: Option<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = endpoint.into();
        Ok(Self {
            client,
            auth_header: auth_header.into(),
            folder_id: folder_id.filter(|f| !f.is_empty()),
            endpoint: if endpoint.is_empty() { DEFAULT_ENDPOINT.to_string() } else { endpoint },
        })
    }
}

#[async_trait]
impl Provider for YandexTranslate {
    fn name(&self) -> &str {
        "Yandex Translate"
    }

    async fn translate_batch(&self, request: BatchRequest<'_>) -> Result<Vec<String>, ProviderError> {
        let body = TranslateRequest::from_batch(&request, self.folder_id.as_deref());
        debug!(
            "POST {} ({} texts, {} glossary pairs)",
            self.endpoint,
            request.texts.len(),
            request.glossary.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.auth_header)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!("Translate REST error ({}): {}", status, text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::AuthenticationError(format!("{}: {}", status.as_u16(), text))
                }
                _ => ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message: text,
                },
            });
        }

        let parsed: TranslateResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(parsed.into_texts())
    }
}
