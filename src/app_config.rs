use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Media directory and word map settings
    #[serde(default)]
    pub media: MediaConfig,

    /// Glossing (text to sign grammar) settings
    #[serde(default)]
    pub gloss: GlossConfig,

    /// Explanation fallback settings for the search flow
    #[serde(default)]
    pub explanation: ExplanationConfig,

    /// Encyclopedia lookup settings
    #[serde(default)]
    pub encyclopedia: EncyclopediaConfig,

    /// Remote sign dictionary settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Available text-generation providers
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Text-generation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: Ollama
    #[default]
    Ollama,
    // @provider: OpenAI
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl ProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }

    // @returns: Environment variable holding the API key, if the provider needs one
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self {
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Ollama | Self::LMStudio => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "lmstudio" => Ok(Self::LMStudio),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key (falls back to the provider's environment variable)
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: ProviderKind) -> Self {
        let (model, endpoint) = match provider_type {
            ProviderKind::Ollama => (default_ollama_model(), default_ollama_endpoint()),
            ProviderKind::OpenAI => (default_openai_model(), default_openai_endpoint()),
            ProviderKind::Anthropic => (default_anthropic_model(), default_anthropic_endpoint()),
            ProviderKind::LMStudio => (default_lmstudio_model(), default_lmstudio_endpoint()),
        };

        Self {
            provider_type: provider_type.to_lowercase_string(),
            model,
            api_key: String::new(),
            endpoint,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// API key from the config file, or from the environment when the file leaves it empty
    pub fn resolved_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }

        self.provider_type
            .parse::<ProviderKind>()
            .ok()
            .and_then(|kind| kind.api_key_env_var())
            .and_then(|var| std::env::var(var).ok())
            .unwrap_or_default()
    }
}

/// Media directory configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MediaConfig {
    /// Directory holding `<WORD>.mp4` and `<LETTER>.mp4` clips
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,

    /// JSON file mapping gloss words to media filenames
    #[serde(default = "default_word_map_path")]
    pub word_map_path: PathBuf,

    /// Prefix of the media references handed back to clients
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            media_dir: default_media_dir(),
            word_map_path: default_word_map_path(),
            url_prefix: default_url_prefix(),
        }
    }
}

/// Glossing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GlossConfig {
    /// Whether to try the generative model before the rule-based glosser
    #[serde(default = "default_true")]
    pub use_model: bool,

    /// Provider used for glossing
    #[serde(default)]
    pub provider: ProviderKind,

    /// Prompt template, `{text}` is replaced with the input
    #[serde(default = "default_gloss_prompt")]
    pub prompt_template: String,

    /// Maximum number of tokens the model may generate
    #[serde(default = "default_gloss_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GlossConfig {
    fn default() -> Self {
        Self {
            use_model: true,
            provider: ProviderKind::Ollama,
            prompt_template: default_gloss_prompt(),
            max_tokens: default_gloss_max_tokens(),
        }
    }
}

/// Generative explanation configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExplanationConfig {
    /// Whether to ask a generative model for explanations
    #[serde(default = "default_true")]
    pub use_model: bool,

    /// Provider used for explanations
    #[serde(default = "default_explanation_provider")]
    pub provider: ProviderKind,

    /// System prompt sent with every explanation request
    #[serde(default = "default_explanation_system_prompt")]
    pub system_prompt: String,

    /// Maximum number of tokens in the explanation
    #[serde(default = "default_explanation_max_tokens")]
    pub max_tokens: u32,

    /// Temperature parameter for text generation (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            use_model: true,
            provider: default_explanation_provider(),
            system_prompt: default_explanation_system_prompt(),
            max_tokens: default_explanation_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Encyclopedia lookup configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EncyclopediaConfig {
    /// Whether encyclopedia lookups are attempted
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the wiki (the REST and action APIs hang off it)
    #[serde(default = "default_encyclopedia_endpoint")]
    pub endpoint: String,

    /// Number of sentences kept from the page summary
    #[serde(default = "default_summary_sentences")]
    pub sentences: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_encyclopedia_endpoint(),
            sentences: default_summary_sentences(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Remote sign dictionary configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FetcherConfig {
    /// Base URL of the sign dictionary; empty disables remote fetching
    #[serde(default)]
    pub base_url: String,

    /// Search path template, `{word}` is replaced with the lowercased word
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Delay before each remote request in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Search page timeout in seconds
    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,

    /// Video download timeout in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            search_path: default_search_path(),
            request_delay_ms: default_request_delay_ms(),
            search_timeout_secs: default_search_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_search_timeout_secs() -> u64 {
    10
}

fn default_download_timeout_secs() -> u64 {
    20
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("media")
}

fn default_word_map_path() -> PathBuf {
    PathBuf::from("word_to_media.json")
}

fn default_url_prefix() -> String {
    "/media".to_string()
}

fn default_gloss_prompt() -> String {
    "Convert to ISL grammar: {text}".to_string()
}

fn default_gloss_max_tokens() -> u32 {
    50
}

fn default_explanation_provider() -> ProviderKind {
    ProviderKind::OpenAI
}

fn default_explanation_system_prompt() -> String {
    "You are an AI assistant for a sign language translator app. Your task is to provide a very short, simple, and accessible explanation (max 2 sentences) for a word that does not have a sign video. Focus on defining proper nouns like cities, people, or specific concepts. The output must be pure, clean text.".to_string()
}

fn default_explanation_max_tokens() -> u32 {
    100
}

fn default_encyclopedia_endpoint() -> String {
    "https://en.wikipedia.org".to_string()
}

fn default_summary_sentences() -> usize {
    2
}

fn default_search_path() -> String {
    "/search?q={word}".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_lmstudio_endpoint() -> String {
    // LM Studio default server (OpenAI compatible) runs on port 1234 under /v1
    "http://localhost:1234/v1".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_lmstudio_model() -> String {
    // Placeholder; users should set to the loaded model name in LM Studio
    "local-model".to_string()
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(ProviderKind::Ollama),
        ProviderConfig::new(ProviderKind::OpenAI),
        ProviderConfig::new(ProviderKind::Anthropic),
        ProviderConfig::new(ProviderKind::LMStudio),
    ]
}

impl Config {
    /// Load the configuration file, writing a default one when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .context(format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .context(format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.media.media_dir.as_os_str().is_empty() {
            return Err(anyhow!("Media directory cannot be empty"));
        }

        if !self.media.url_prefix.starts_with('/') {
            return Err(anyhow!("Media URL prefix must start with '/': {}", self.media.url_prefix));
        }

        if !self.gloss.prompt_template.contains("{text}") {
            return Err(anyhow!("Gloss prompt template must contain the {{text}} placeholder"));
        }

        if self.gloss.max_tokens == 0 || self.explanation.max_tokens == 0 {
            return Err(anyhow!("Token limits must be greater than zero"));
        }

        if !(0.0..=2.0).contains(&self.explanation.temperature) {
            return Err(anyhow!("Explanation temperature must be between 0.0 and 2.0"));
        }

        if self.encyclopedia.enabled {
            if self.encyclopedia.sentences == 0 {
                return Err(anyhow!("Encyclopedia summary needs at least one sentence"));
            }
            url::Url::parse(&self.encyclopedia.endpoint)
                .context(format!("Invalid encyclopedia endpoint: {}", self.encyclopedia.endpoint))?;
        }

        if !self.fetcher.base_url.is_empty() {
            url::Url::parse(&self.fetcher.base_url)
                .context(format!("Invalid sign dictionary URL: {}", self.fetcher.base_url))?;
            if !self.fetcher.search_path.contains("{word}") {
                return Err(anyhow!("Fetcher search path must contain the {{word}} placeholder"));
            }
        }

        Ok(())
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &ProviderKind) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Use `model` for both the glossing and the explanation provider
    pub fn set_model(&mut self, model: &str) {
        let mut kinds = vec![self.gloss.provider.clone()];
        if self.explanation.provider != self.gloss.provider {
            kinds.push(self.explanation.provider.clone());
        }

        for kind in kinds {
            let provider_str = kind.to_lowercase_string();
            match self.available_providers.iter_mut().find(|p| p.provider_type == provider_str) {
                Some(provider_config) => provider_config.model = model.to_string(),
                None => {
                    let mut provider_config = ProviderConfig::new(kind);
                    provider_config.model = model.to_string();
                    self.available_providers.push(provider_config);
                }
            }
        }
    }

    /// Provider configuration for `kind`, falling back to the built-in defaults
    pub fn provider_config_or_default(&self, kind: &ProviderKind) -> ProviderConfig {
        self.get_provider_config(kind)
            .cloned()
            .unwrap_or_else(|| ProviderConfig::new(kind.clone()))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            media: MediaConfig::default(),
            gloss: GlossConfig::default(),
            explanation: ExplanationConfig::default(),
            encyclopedia: EncyclopediaConfig::default(),
            fetcher: FetcherConfig::default(),
            available_providers: default_available_providers(),
            log_level: LogLevel::default(),
        }
    }
}
