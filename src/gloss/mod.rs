/*!
 * Text to sign gloss conversion.
 *
 * The `Glosser` first asks a text-generation model to rewrite the input in sign
 * grammar and falls back to the deterministic rule-based glosser whenever the
 * model is disabled, unavailable, failing or silent. Glossing never fails.
 *
 * - `rules`: stopword removal, punctuation stripping and output normalization
 * - `lemma`: rule-based English lemmatizer
 */

use log::{debug, info, warn};
use std::fmt;

use crate::app_config::Config;
use crate::providers::{Capability, CompletionRequest};

pub mod lemma;
pub mod rules;

pub use rules::{normalize_gloss, rule_based_gloss};

/// An ordered sequence of uppercase gloss tokens joined by single spaces
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlossText(String);

impl GlossText {
    /// Wrap a string, normalizing it into gloss shape
    pub fn new(text: &str) -> Self {
        Self(normalize_gloss(text))
    }

    /// The tokens in signing order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|token| !token.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GlossText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts English text to gloss, model first, rules as fallback
#[derive(Debug)]
pub struct Glosser {
    /// Generative model; `None` disables the model path entirely
    model: Option<Capability>,
    /// Prompt template with a `{text}` placeholder
    prompt_template: String,
    /// Output bound for the model
    max_tokens: u32,
}

impl Glosser {
    /// Create a glosser around an optional model capability
    pub fn new(model: Option<Capability>, prompt_template: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model,
            prompt_template: prompt_template.into(),
            max_tokens,
        }
    }

    /// A glosser that only uses the rules
    pub fn rule_based() -> Self {
        let defaults = crate::app_config::GlossConfig::default();
        Self::new(None, defaults.prompt_template, defaults.max_tokens)
    }

    /// Build the glosser described by the configuration
    pub fn from_config(config: &Config) -> Self {
        let model = if config.gloss.use_model {
            let provider_config = config.provider_config_or_default(&config.gloss.provider);
            Some(Capability::from_config(&provider_config))
        } else {
            info!("Generative glossing disabled, using rule-based glosser only");
            None
        };

        Self::new(model, config.gloss.prompt_template.clone(), config.gloss.max_tokens)
    }

    /// Convert text to gloss. Never fails; empty input yields empty gloss.
    pub async fn gloss(&self, text: &str) -> GlossText {
        if text.trim().is_empty() {
            return GlossText::default();
        }

        if let Some(gloss) = self.model_gloss(text).await {
            debug!("Model gloss used: {}", gloss);
            return gloss;
        }

        let gloss = GlossText::new(&rule_based_gloss(text));
        debug!("Rule-based gloss used: {}", gloss);
        gloss
    }

    async fn model_gloss(&self, text: &str) -> Option<GlossText> {
        let provider = self.model.as_ref()?.acquire().await?;

        let prompt = self.prompt_template.replace("{text}", text);
        let request = CompletionRequest::new(prompt)
            .max_tokens(self.max_tokens)
            .temperature(0.0);

        match provider.complete(request).await {
            Ok(answer) => {
                let gloss = GlossText::new(answer.trim());
                if gloss.is_empty() {
                    debug!("{} returned an empty gloss, falling back to rules", provider.name());
                    None
                } else {
                    Some(gloss)
                }
            }
            Err(e) => {
                warn!("{} glossing failed: {}. Falling back to rule-based conversion.", provider.name(), e);
                None
            }
        }
    }
}
