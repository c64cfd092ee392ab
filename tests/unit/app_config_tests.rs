/*!
 * Tests for application configuration functionality
 */

use signgloss::app_config::{Config, LogLevel, ProviderConfig, ProviderKind};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.media.media_dir.to_str(), Some("media"));
    assert_eq!(config.media.word_map_path.to_str(), Some("word_to_media.json"));
    assert_eq!(config.media.url_prefix, "/media");

    assert!(config.gloss.use_model);
    assert_eq!(config.gloss.provider, ProviderKind::Ollama);
    assert_eq!(config.gloss.prompt_template, "Convert to ISL grammar: {text}");
    assert_eq!(config.gloss.max_tokens, 50);

    assert_eq!(config.explanation.provider, ProviderKind::OpenAI);
    assert_eq!(config.explanation.max_tokens, 100);
    assert!((config.explanation.temperature - 0.3).abs() < f32::EPSILON);

    assert!(config.encyclopedia.enabled);
    assert_eq!(config.encyclopedia.sentences, 2);

    assert!(config.fetcher.base_url.is_empty());
    assert_eq!(config.fetcher.request_delay_ms, 1000);
    assert_eq!(config.fetcher.search_timeout_secs, 10);
    assert_eq!(config.fetcher.download_timeout_secs, 20);

    let ollama_config = config.get_provider_config(&ProviderKind::Ollama)
        .expect("Ollama provider config should exist");
    assert_eq!(ollama_config.model, "llama3.2:3b");
    assert_eq!(ollama_config.endpoint, "http://localhost:11434");
    assert_eq!(ollama_config.timeout_secs, 30);

    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.media.url_prefix = "media".to_string();
    assert!(config.validate().is_err());
    config.media.url_prefix = "/media".to_string();

    config.gloss.prompt_template = "Convert to ISL grammar".to_string();
    assert!(config.validate().is_err());
    config.gloss.prompt_template = "Gloss: {text}".to_string();
    assert!(config.validate().is_ok());

    config.explanation.temperature = 3.5;
    assert!(config.validate().is_err());
    config.explanation.temperature = 0.3;

    config.encyclopedia.sentences = 0;
    assert!(config.validate().is_err());
    config.encyclopedia.enabled = false;
    assert!(config.validate().is_ok(), "disabled encyclopedia is not validated");
}

#[test]
fn test_config_validation_withFetcherBaseUrl_shouldCheckUrlAndPlaceholder() {
    let mut config = Config::default();

    config.fetcher.base_url = "not a url".to_string();
    assert!(config.validate().is_err());

    config.fetcher.base_url = "https://signs.example.org".to_string();
    assert!(config.validate().is_ok());

    config.fetcher.search_path = "/search".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "media": { "media_dir": "clips" },
        "gloss": { "use_model": false },
        "fetcher": { "base_url": "https://signs.example.org" }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.media.media_dir.to_str(), Some("clips"));
    assert_eq!(config.media.url_prefix, "/media");
    assert!(!config.gloss.use_model);
    assert_eq!(config.gloss.max_tokens, 50);
    assert_eq!(config.fetcher.search_path, "/search?q={word}");
    assert_eq!(config.available_providers.len(), 4);
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(created.media.url_prefix, "/media");

    let loaded = Config::load_or_create(&path).unwrap();
    assert_eq!(loaded.gloss.prompt_template, created.gloss.prompt_template);
    assert_eq!(loaded.available_providers.len(), created.available_providers.len());
}

#[test]
fn test_load_or_create_withMalformedFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json").unwrap();

    let error = Config::load_or_create(&path).unwrap_err();
    assert!(error.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_provider_kind_withStringForms_shouldParseAndDisplay() {
    assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
    assert_eq!("LMStudio".parse::<ProviderKind>().unwrap(), ProviderKind::LMStudio);
    assert!("gemini".parse::<ProviderKind>().is_err());

    assert_eq!(ProviderKind::Anthropic.to_lowercase_string(), "anthropic");
    assert_eq!(ProviderKind::LMStudio.display_name(), "LM Studio");
}

#[test]
fn test_provider_config_or_default_withMissingEntry_shouldUseBuiltInDefaults() {
    let mut config = Config::default();
    config.available_providers.clear();

    let anthropic = config.provider_config_or_default(&ProviderKind::Anthropic);
    assert_eq!(anthropic.provider_type, "anthropic");
    assert_eq!(anthropic.model, "claude-3-haiku-20240307");
    assert_eq!(anthropic.endpoint, "https://api.anthropic.com");
}

#[test]
fn test_resolved_api_key_withConfiguredKey_shouldPreferIt() {
    let mut provider = ProviderConfig::new(ProviderKind::OpenAI);
    provider.api_key = "sk-configured".to_string();
    assert_eq!(provider.resolved_api_key(), "sk-configured");

    let ollama = ProviderConfig::new(ProviderKind::Ollama);
    assert_eq!(ollama.resolved_api_key(), "");
}

#[test]
fn test_set_model_withDefaultProviders_shouldUpdateGlossAndExplanationModels() {
    let mut config = Config::default();
    config.set_model("custom-model");

    let gloss = config.provider_config_or_default(&config.gloss.provider);
    let explanation = config.provider_config_or_default(&config.explanation.provider);
    assert_eq!(gloss.model, "custom-model");
    assert_eq!(explanation.model, "custom-model");
    assert_eq!(
        config.provider_config_or_default(&ProviderKind::Anthropic).model,
        "claude-3-haiku-20240307",
        "providers in use are the only ones changed"
    );
}

#[test]
fn test_set_model_withMissingProviderEntry_shouldAddIt() {
    let mut config = Config::default();
    config.available_providers.clear();
    config.gloss.provider = ProviderKind::LMStudio;
    config.explanation.provider = ProviderKind::LMStudio;

    config.set_model("local-model");
    assert_eq!(config.available_providers.len(), 1);
    assert_eq!(config.available_providers[0].provider_type, "lmstudio");
    assert_eq!(config.available_providers[0].model, "local-model");
}
