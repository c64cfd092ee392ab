/*!
 * Short explanations of search queries.
 *
 * Strategies are tried in order and the first one that produces text wins:
 * generative model, encyclopedia summary, fixed rule-based message. With the
 * rule-based stage in place the explainer always has an answer.
 *
 * - `encyclopedia`: MediaWiki title search and page summary client
 */

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt::{self, Debug};

use crate::app_config::Config;
use crate::errors::LookupError;
use crate::providers::{Capability, CompletionRequest};

pub mod encyclopedia;

pub use encyclopedia::{first_sentences, Encyclopedia, PageSummary};

/// Which stage produced an explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExplanationSource {
    #[serde(rename = "ai")]
    Ai,
    #[serde(rename = "wikipedia")]
    Encyclopedia,
    #[serde(rename = "rule-based")]
    RuleBased,
    #[serde(rename = "error")]
    Error,
}

impl ExplanationSource {
    // @returns: Label used in responses
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Encyclopedia => "wikipedia",
            Self::RuleBased => "rule-based",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ExplanationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Explanation of a query
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    // @field: Explanation text, `None` only for `ExplanationSource::Error`
    pub text: Option<String>,
    // @field: Source page, set by the encyclopedia stage
    pub link: Option<String>,
    // @field: Stage that produced it
    pub source: ExplanationSource,
}

impl Explanation {
    pub fn new(text: impl Into<String>, source: ExplanationSource) -> Self {
        Self {
            text: Some(text.into()),
            link: None,
            source,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// The result of a chain that produced nothing
    pub fn missing() -> Self {
        Self {
            text: None,
            link: None,
            source: ExplanationSource::Error,
        }
    }
}

/// One way of explaining a query
#[async_trait]
pub trait ExplanationStrategy: Send + Sync + Debug {
    /// Name used in log lines
    fn name(&self) -> &'static str;

    /// Explanation of `query`, or `None` to pass to the next strategy
    async fn explain(&self, query: &str) -> Option<Explanation>;
}

/// Ask a generative model for a short explanation
#[derive(Debug)]
pub struct AiExplanation {
    capability: Capability,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl AiExplanation {
    pub fn new(capability: Capability, system_prompt: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            capability,
            system_prompt: system_prompt.into(),
            max_tokens,
            temperature,
        }
    }
}

#[async_trait]
impl ExplanationStrategy for AiExplanation {
    fn name(&self) -> &'static str {
        "ai"
    }

    async fn explain(&self, query: &str) -> Option<Explanation> {
        let provider = self.capability.acquire().await?;

        let request = CompletionRequest::new(format!("Explain the term: '{}'", query))
            .system(self.system_prompt.clone())
            .max_tokens(self.max_tokens)
            .temperature(self.temperature);

        match provider.complete(request).await {
            Ok(answer) if !answer.trim().is_empty() => {
                Some(Explanation::new(answer.trim(), ExplanationSource::Ai))
            }
            Ok(_) => {
                debug!("{} returned an empty explanation for '{}'", provider.name(), query);
                None
            }
            Err(e) => {
                warn!("{} explanation failed for '{}': {}", provider.name(), query, e);
                None
            }
        }
    }
}

/// Summarize the best matching encyclopedia page
#[derive(Debug)]
pub struct EncyclopediaLookup {
    encyclopedia: Encyclopedia,
}

impl EncyclopediaLookup {
    pub fn new(encyclopedia: Encyclopedia) -> Self {
        Self { encyclopedia }
    }
}

#[async_trait]
impl ExplanationStrategy for EncyclopediaLookup {
    fn name(&self) -> &'static str {
        "encyclopedia"
    }

    async fn explain(&self, query: &str) -> Option<Explanation> {
        match self.encyclopedia.lookup(query).await {
            Ok(page) => {
                debug!("Encyclopedia summary for '{}' from {}", query, page.title);
                Some(Explanation::new(page.summary, ExplanationSource::Encyclopedia).with_link(page.url))
            }
            Err(LookupError::NotFound(what)) => {
                debug!("No encyclopedia page for '{}': {}", query, what);
                None
            }
            Err(e) => {
                warn!("Encyclopedia lookup failed for '{}': {}", query, e);
                None
            }
        }
    }
}

/// Fixed message announcing the fingerspelling fallback
#[derive(Debug, Default)]
pub struct RuleBasedExplanation;

#[async_trait]
impl ExplanationStrategy for RuleBasedExplanation {
    fn name(&self) -> &'static str {
        "rule-based"
    }

    async fn explain(&self, query: &str) -> Option<Explanation> {
        Some(Explanation::new(
            format!("No detailed explanation found for '{}'. Attempting fingerspelling.", query),
            ExplanationSource::RuleBased,
        ))
    }
}

/// Ordered explanation fallback chain
#[derive(Debug)]
pub struct Explainer {
    strategies: Vec<Box<dyn ExplanationStrategy>>,
}

impl Explainer {
    /// Create an explainer trying `strategies` in order
    pub fn new(strategies: Vec<Box<dyn ExplanationStrategy>>) -> Self {
        Self { strategies }
    }

    /// Build the chain described by the configuration
    pub fn from_config(config: &Config) -> Self {
        let mut strategies: Vec<Box<dyn ExplanationStrategy>> = Vec::new();

        if config.explanation.use_model {
            let provider_config = config.provider_config_or_default(&config.explanation.provider);
            strategies.push(Box::new(AiExplanation::new(
                Capability::from_config(&provider_config),
                config.explanation.system_prompt.clone(),
                config.explanation.max_tokens,
                config.explanation.temperature,
            )));
        } else {
            info!("Generative explanations disabled");
        }

        if config.encyclopedia.enabled {
            match Encyclopedia::from_config(&config.encyclopedia) {
                Ok(encyclopedia) => strategies.push(Box::new(EncyclopediaLookup::new(encyclopedia))),
                Err(e) => warn!("Encyclopedia lookups disabled: {}", e),
            }
        }

        strategies.push(Box::new(RuleBasedExplanation));
        Self::new(strategies)
    }

    /// Explain `query` with the first strategy that has an answer
    pub async fn explain(&self, query: &str) -> Explanation {
        for strategy in &self.strategies {
            if let Some(explanation) = strategy.explain(query).await {
                debug!("Explanation for '{}' via {}", query, strategy.name());
                return explanation;
            }
        }

        Explanation::missing()
    }
}
