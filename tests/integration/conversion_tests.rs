/*!
 * End-to-end tests of sentence conversion and concept search through the controller
 */

use serde_json::json;
use std::sync::Arc;

use signgloss::app_config::Config;
use signgloss::errors::AppError;
use signgloss::explain::{AiExplanation, Explainer, RuleBasedExplanation};
use signgloss::gloss::Glosser;
use signgloss::media::{MediaResolver, MediaStore, NoFetcher};
use signgloss::providers::mock::MockProvider;
use signgloss::providers::Capability;
use signgloss::Controller;

use crate::common;
use crate::common::http_server::{Route, TestServer};

fn offline_controller(config: Config) -> Controller {
    common::init_logging();
    Controller::with_config(config).expect("offline config is valid")
}

/// Controller with the rule-based glosser and an AI explainer backed by `provider`
fn controller_with_ai(config: Config, provider: MockProvider) -> Controller {
    let store = MediaStore::from_config(&config.media);
    let explainer = Explainer::new(vec![
        Box::new(AiExplanation::new(Capability::ready(Arc::new(provider)), "Be brief.", 100, 0.3)),
        Box::new(RuleBasedExplanation),
    ]);
    let resolver = MediaResolver::standard(store, Arc::new(NoFetcher));
    Controller::from_parts(config, Glosser::rule_based(), explainer, resolver)
}

#[tokio::test]
async fn test_convert_sentence_withCachedClips_shouldReturnGlossAndMedia() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_clips(temp_dir.path(), &["CAT.mp4", "RUN.mp4"]).unwrap();
    let controller = offline_controller(common::offline_config(temp_dir.path()));

    let response = controller.convert_sentence("The cat is running").await.unwrap();
    assert_eq!(response.asl_gloss, "CAT RUN");
    assert_eq!(response.media, vec!["/media/CAT.mp4", "/media/RUN.mp4"]);
    assert_eq!(response.summary, None);
    assert_eq!(response.link, None);
    assert_eq!(response.source, None);
}

#[tokio::test]
async fn test_convert_sentence_withEmptyInput_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = offline_controller(common::offline_config(temp_dir.path()));

    let error = controller.convert_sentence("   ").await.unwrap_err();
    assert!(matches!(error, AppError::EmptyInput(ref message) if message == "No input provided."));
}

#[tokio::test]
async fn test_convert_sentence_withWordMapOnDisk_shouldApplyItPerCall() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_clips(temp_dir.path(), &["hello_wave.mp4"]).unwrap();
    let controller = offline_controller(common::offline_config(temp_dir.path()));

    let before = controller.convert_sentence("hello").await.unwrap();
    assert!(before.media.is_empty());

    common::create_test_file(temp_dir.path(), "word_to_media.json", r#"{ "HELLO": "hello_wave.mp4" }"#).unwrap();
    let after = controller.convert_sentence("hello").await.unwrap();
    assert_eq!(after.media, vec!["/media/hello_wave.mp4"]);
}

#[tokio::test]
async fn test_convert_sentence_twice_shouldBeIdempotent() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_alphabet(temp_dir.path()).unwrap();
    common::create_clips(temp_dir.path(), &["CAT.mp4"]).unwrap();
    let controller = offline_controller(common::offline_config(temp_dir.path()));

    let first = controller.convert_sentence("The cat saw Zoe").await.unwrap();
    let second = controller.convert_sentence("The cat saw Zoe").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_search_convert_withLocalVideo_shouldShortCircuit() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_clips(temp_dir.path(), &["chennai.mp4"]).unwrap();
    let provider = MockProvider::replying("Should not be asked.");
    let controller = controller_with_ai(common::offline_config(temp_dir.path()), provider.clone());

    let response = controller.search_convert("  Chennai ").await.unwrap();
    assert_eq!(response.asl_gloss, "Chennai");
    assert_eq!(response.media, vec!["/media/chennai.mp4"]);
    assert_eq!(response.summary.as_deref(), Some("Local video found for 'Chennai'."));
    assert_eq!(response.link, None);
    assert_eq!(response.source.as_deref(), Some("local"));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_search_convert_withEmptyQuery_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = offline_controller(common::offline_config(temp_dir.path()));

    let error = controller.search_convert(" \t ").await.unwrap_err();
    assert_eq!(error.to_string(), "No query provided.");
}

#[tokio::test]
async fn test_search_convert_withAiExplanation_shouldGlossTheExplanation() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_clips(temp_dir.path(), &["CITY.mp4", "INDIA.mp4"]).unwrap();
    let provider = MockProvider::replying("A big city in India.");
    let controller = controller_with_ai(common::offline_config(temp_dir.path()), provider);

    let response = controller.search_convert("Chennai").await.unwrap();
    assert_eq!(response.asl_gloss, "BIG CITY INDIA");
    assert_eq!(response.media, vec!["/media/CITY.mp4", "/media/INDIA.mp4"]);
    assert_eq!(response.summary.as_deref(), Some("A big city in India."));
    assert_eq!(response.source.as_deref(), Some("ai"));
}

#[tokio::test]
async fn test_search_convert_withNothingFound_shouldFingerspellQuery() {
    let temp_dir = common::create_temp_dir().unwrap();
    // "ran" glosses to RUN and there is no U clip, so no explanation word resolves
    common::create_clips(temp_dir.path(), &["R.mp4", "A.mp4", "N.mp4"]).unwrap();
    let controller = offline_controller(common::offline_config(temp_dir.path()));

    let response = controller.search_convert("ran").await.unwrap();
    assert_eq!(
        response.summary.as_deref(),
        Some("No detailed explanation found for 'ran'. Attempting fingerspelling.")
    );
    assert_eq!(response.source.as_deref(), Some("rule-based"));
    assert_eq!(response.link, None);
    assert_eq!(response.asl_gloss, "NO DETAIL EXPLANATION FIND RUN ATTEMPT FINGERSPELL");
    assert_eq!(response.media, vec!["/media/R.mp4", "/media/A.mp4", "/media/N.mp4"]);
}

#[tokio::test]
async fn test_search_convert_withEncyclopediaHit_shouldSetLink() {
    let server = TestServer::start(vec![
        ("/w/api.php", Route::json(json!(["chennai", ["Chennai"], [""], [""]]))),
        (
            "/api/rest_v1/page/summary/Chennai",
            Route::json(json!({
                "type": "standard",
                "title": "Chennai",
                "extract": "Chennai is a city. It is in India. It is old.",
                "content_urls": { "desktop": { "page": "https://en.wikipedia.org/wiki/Chennai" } }
            })),
        ),
    ])
    .await;

    let temp_dir = common::create_temp_dir().unwrap();
    common::create_clips(temp_dir.path(), &["CITY.mp4"]).unwrap();
    let mut config = common::offline_config(temp_dir.path());
    config.encyclopedia.enabled = true;
    config.encyclopedia.endpoint = server.base_url().to_string();
    let controller = offline_controller(config);

    let response = controller.search_convert("Chennai").await.unwrap();
    assert_eq!(response.summary.as_deref(), Some("Chennai is a city. It is in India."));
    assert_eq!(response.link.as_deref(), Some("https://en.wikipedia.org/wiki/Chennai"));
    assert_eq!(response.source.as_deref(), Some("wikipedia"));
    assert_eq!(response.asl_gloss, "CHENNAI CITY INDIA");
    assert_eq!(response.media, vec!["/media/CITY.mp4"]);
}

#[tokio::test]
async fn test_conversion_response_shouldSerializeNullFields() {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = offline_controller(common::offline_config(temp_dir.path()));

    let response = controller.convert_sentence("hello").await.unwrap();
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["asl_gloss"], "HELLO");
    assert_eq!(value["media"], json!([]));
    assert!(value["summary"].is_null());
    assert!(value["link"].is_null());
    assert!(value["source"].is_null());
}

#[tokio::test]
async fn test_search_convert_withEncyclopediaMiss_shouldGlossRuleBasedMessage() {
    let server = TestServer::start(vec![("/w/api.php", Route::json(json!(["zyx", [], [], []])))]).await;

    let temp_dir = common::create_temp_dir().unwrap();
    let mut config = common::offline_config(temp_dir.path());
    config.encyclopedia.enabled = true;
    config.encyclopedia.endpoint = server.base_url().to_string();
    let controller = offline_controller(config);

    let response = controller.search_convert("zyx").await.unwrap();
    assert_eq!(server.hits("/w/api.php"), 1);
    assert_eq!(response.source.as_deref(), Some("rule-based"));
    assert_eq!(
        response.summary.as_deref(),
        Some("No detailed explanation found for 'zyx'. Attempting fingerspelling.")
    );
    assert_eq!(response.asl_gloss, "NO DETAIL EXPLANATION FIND ZYX ATTEMPT FINGERSPELL");
    assert_eq!(response.link, None);
    assert!(response.media.is_empty());
}

#[tokio::test]
async fn test_search_convert_withPathLikeQuery_shouldSkipLocalVideoCheck() {
    let temp_dir = common::create_temp_dir().unwrap();
    let media_dir = temp_dir.path().join("media");
    std::fs::create_dir(&media_dir).unwrap();
    common::create_clips(temp_dir.path(), &["conf.mp4"]).unwrap();
    let controller = offline_controller(common::offline_config(&media_dir));

    let response = controller.search_convert("../conf").await.unwrap();
    assert_eq!(response.source.as_deref(), Some("rule-based"));
    assert_eq!(response.summary.as_deref(), Some("No detailed explanation found for '../conf'. Attempting fingerspelling."));
    assert!(response.media.is_empty());
}
