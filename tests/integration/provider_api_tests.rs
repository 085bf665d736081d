/*!
 * Provider HTTP tests against a mock translate endpoint
 */

use std::time::Duration;

use loctool::errors::ProviderError;
use loctool::glossary::GlossaryEntry;
use loctool::providers::yandex::YandexTranslate;
use loctool::providers::{BatchRequest, Provider};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TRANSLATE_PATH: &str = "/translate/v2/translate";

/// Start a server answering every authorized translate call with `response`
async fn mock_translate(response: ResponseTemplate) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TRANSLATE_PATH))
        .and(header("Authorization", "Api-Key secret"))
        .respond_with(response)
        .expect(1)
        .mount(&mock_server)
        .await;

    mock_server
}

fn client(mock_server: &MockServer) -> YandexTranslate {
    let url = format!("{}{}", mock_server.uri(), TRANSLATE_PATH);
    YandexTranslate::new("Api-Key secret", Some("b1gfolder".to_string()), url, Duration::from_secs(5)).unwrap()
}

fn single_text_request(texts: &[String]) -> BatchRequest<'_> {
    BatchRequest {
        texts,
        target_language: "en",
        source_language: None,
        glossary: &[],
        speller: false,
    }
}

/// Test that translations come back in order and the request carries auth and glossary
#[tokio::test]
async fn test_translateBatch_withSuccess_shouldReturnTranslationsInOrder() {
    let mock_server = mock_translate(ResponseTemplate::new(200).set_body_json(json!({
        "translations": [
            { "text": "Long sword" },
            { "text": "Shield", "detectedLanguageCode": "zh" }
        ]
    })))
    .await;
    let texts = vec!["长剑".to_string(), "盾".to_string()];
    let glossary = vec![GlossaryEntry::new("盾", "Shield", true)];

    let result = client(&mock_server)
        .translate_batch(BatchRequest {
            texts: &texts,
            target_language: "en",
            source_language: Some("zh"),
            glossary: &glossary,
            speller: false,
        })
        .await
        .unwrap();

    assert_eq!(result, vec!["Long sword".to_string(), "Shield".to_string()]);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["folderId"], "b1gfolder");
    assert_eq!(body["targetLanguageCode"], "en");
    assert_eq!(body["sourceLanguageCode"], "zh");
    assert_eq!(body["format"], "PLAIN_TEXT");
    assert_eq!(body["texts"], json!(["长剑", "盾"]));
    assert_eq!(
        body["glossaryConfig"]["glossaryData"]["glossaryPairs"],
        json!([{ "sourceText": "盾", "translatedText": "Shield", "exact": true }])
    );
}

/// Test that detection mode leaves out the source language and the empty glossary
#[tokio::test]
async fn test_translateBatch_withAutoSource_shouldOmitOptionalFields() {
    let mock_server =
        mock_translate(ResponseTemplate::new(200).set_body_json(json!({ "translations": [{}] }))).await;
    let texts = vec!["盾".to_string()];

    let result = client(&mock_server)
        .translate_batch(single_text_request(&texts))
        .await
        .unwrap();

    assert_eq!(result, vec![String::new()]);

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert!(body.get("sourceLanguageCode").is_none());
    assert!(body.get("glossaryConfig").is_none());
}

/// Test that a rejected key maps to an authentication error
#[tokio::test]
async fn test_translateBatch_withUnauthorized_shouldReturnAuthenticationError() {
    let mock_server =
        mock_translate(ResponseTemplate::new(401).set_body_json(json!({ "message": "bad key" }))).await;
    let texts = vec!["盾".to_string()];

    let err = client(&mock_server)
        .translate_batch(single_text_request(&texts))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::AuthenticationError(_)));
}

/// Test that a server error carries its status code and body
#[tokio::test]
async fn test_translateBatch_withServerError_shouldReturnApiError() {
    let mock_server = mock_translate(ResponseTemplate::new(500).set_body_string("boom")).await;
    let texts = vec!["盾".to_string()];

    let err = client(&mock_server)
        .translate_batch(single_text_request(&texts))
        .await
        .unwrap_err();

    match err {
        ProviderError::ApiError { status_code, message } => {
            assert_eq!(status_code, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// Test that a non-JSON success body is a parse error
#[tokio::test]
async fn test_translateBatch_withInvalidBody_shouldReturnParseError() {
    let mock_server = mock_translate(ResponseTemplate::new(200).set_body_string("not json")).await;
    let texts = vec!["盾".to_string()];

    let err = client(&mock_server)
        .translate_batch(single_text_request(&texts))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ParseError(_)));
}
