/*!
 * Tests for the explanation fallback chain and the encyclopedia client
 */

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use signgloss::errors::LookupError;
use signgloss::explain::{
    AiExplanation, Encyclopedia, EncyclopediaLookup, ExplanationSource, ExplanationStrategy, Explainer,
    RuleBasedExplanation,
};
use signgloss::providers::mock::MockProvider;
use signgloss::providers::Capability;

use crate::common::http_server::{Route, TestServer};

fn ai(provider: MockProvider) -> AiExplanation {
    AiExplanation::new(Capability::ready(Arc::new(provider)), "Be brief.", 100, 0.3)
}

fn encyclopedia(server: &TestServer) -> Encyclopedia {
    Encyclopedia::new(server.base_url(), 2, Duration::from_secs(5)).unwrap()
}

async fn chennai_server() -> TestServer {
    TestServer::start(vec![
        (
            "/w/api.php",
            Route::json(json!(["chennai", ["Chennai"], [""], ["https://en.wikipedia.org/wiki/Chennai"]])),
        ),
        (
            "/api/rest_v1/page/summary/Chennai",
            Route::json(json!({
                "type": "standard",
                "title": "Chennai",
                "extract": "Chennai is the capital city of Tamil Nadu. It is located on the Coromandel Coast. It is a major cultural hub.",
                "content_urls": { "desktop": { "page": "https://en.wikipedia.org/wiki/Chennai" } }
            })),
        ),
    ])
    .await
}

#[tokio::test]
async fn test_encyclopedia_lookup_withKnownPage_shouldReturnTwoSentencesAndLink() {
    let server = chennai_server().await;

    let page = encyclopedia(&server).lookup("chennai").await.unwrap();
    assert_eq!(page.title, "Chennai");
    assert_eq!(
        page.summary,
        "Chennai is the capital city of Tamil Nadu. It is located on the Coromandel Coast."
    );
    assert_eq!(page.url, "https://en.wikipedia.org/wiki/Chennai");

    let search = &server.requests()[0];
    assert!(search.target.contains("action=opensearch"));
    assert!(search.target.contains("search=chennai"));
}

#[tokio::test]
async fn test_encyclopedia_lookup_withNoSearchResult_shouldBeNotFound() {
    let server = TestServer::start(vec![("/w/api.php", Route::json(json!(["qzxv", [], [], []])))]).await;

    let result = encyclopedia(&server).lookup("qzxv").await;
    assert!(matches!(result, Err(LookupError::NotFound(_))));
}

#[tokio::test]
async fn test_encyclopedia_page_summary_withDisambiguation_shouldBeNotFound() {
    let server = TestServer::start(vec![(
        "/api/rest_v1/page/summary/Mercury",
        Route::json(json!({
            "type": "disambiguation",
            "title": "Mercury",
            "extract": "Mercury may refer to:",
            "content_urls": { "desktop": { "page": "https://en.wikipedia.org/wiki/Mercury" } }
        })),
    )])
    .await;

    let result = encyclopedia(&server).page_summary("Mercury").await;
    assert!(matches!(result, Err(LookupError::NotFound(_))));
}

#[tokio::test]
async fn test_encyclopedia_page_summary_withMissingPage_shouldBeNotFound() {
    let server = TestServer::start(Vec::new()).await;

    let result = encyclopedia(&server).page_summary("Nowhere").await;
    assert!(matches!(result, Err(LookupError::NotFound(_))));
}

#[tokio::test]
async fn test_encyclopedia_lookup_withServerError_shouldBeRequestError() {
    let server = TestServer::start(vec![("/w/api.php", Route::status(503))]).await;

    let result = encyclopedia(&server).lookup("chennai").await;
    assert!(matches!(result, Err(LookupError::Request(_))));
}

#[tokio::test]
async fn test_ai_explanation_withAnswer_shouldSendQueryAndSettings() {
    let provider = MockProvider::replying("  Chennai is a city in India.  ");
    let explanation = ai(provider.clone()).explain("Chennai").await.unwrap();

    assert_eq!(explanation.text.as_deref(), Some("Chennai is a city in India."));
    assert_eq!(explanation.source, ExplanationSource::Ai);
    assert_eq!(explanation.link, None);

    let request = provider.last_request().unwrap();
    assert_eq!(request.prompt, "Explain the term: 'Chennai'");
    assert_eq!(request.system.as_deref(), Some("Be brief."));
    assert_eq!(request.max_tokens, 100);
}

#[tokio::test]
async fn test_ai_explanation_withEmptyOrFailingModel_shouldPass() {
    assert!(ai(MockProvider::empty()).explain("Chennai").await.is_none());
    assert!(ai(MockProvider::failing()).explain("Chennai").await.is_none());

    let unavailable = AiExplanation::new(Capability::unavailable("no key"), "Be brief.", 100, 0.3);
    assert!(unavailable.explain("Chennai").await.is_none());
}

#[tokio::test]
async fn test_explainer_withWorkingModel_shouldNotConsultEncyclopedia() {
    let server = chennai_server().await;
    let explainer = Explainer::new(vec![
        Box::new(ai(MockProvider::replying("A city."))),
        Box::new(EncyclopediaLookup::new(encyclopedia(&server))),
        Box::new(RuleBasedExplanation),
    ]);

    let explanation = explainer.explain("Chennai").await;
    assert_eq!(explanation.source, ExplanationSource::Ai);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_explainer_withUnavailableModel_shouldUseEncyclopediaWithLink() {
    let server = chennai_server().await;
    let explainer = Explainer::new(vec![
        Box::new(AiExplanation::new(Capability::unavailable("no key"), "Be brief.", 100, 0.3)),
        Box::new(EncyclopediaLookup::new(encyclopedia(&server))),
        Box::new(RuleBasedExplanation),
    ]);

    let explanation = explainer.explain("Chennai").await;
    assert_eq!(explanation.source, ExplanationSource::Encyclopedia);
    assert_eq!(explanation.link.as_deref(), Some("https://en.wikipedia.org/wiki/Chennai"));
}

#[tokio::test]
async fn test_explainer_withNothingFound_shouldUseRuleBasedMessage() {
    let server = TestServer::start(vec![("/w/api.php", Route::json(json!(["zyx", [], [], []])))]).await;
    let explainer = Explainer::new(vec![
        Box::new(ai(MockProvider::failing())),
        Box::new(EncyclopediaLookup::new(encyclopedia(&server))),
        Box::new(RuleBasedExplanation),
    ]);

    let explanation = explainer.explain("zyx").await;
    assert_eq!(explanation.source, ExplanationSource::RuleBased);
    assert_eq!(
        explanation.text.as_deref(),
        Some("No detailed explanation found for 'zyx'. Attempting fingerspelling.")
    );
    assert_eq!(explanation.link, None);
}
