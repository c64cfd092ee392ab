use anyhow::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::explain::{ExplanationSource, Explainer};
use crate::gloss::Glosser;
use crate::media::{fingerspell, ExternalFetcher, MediaResolver, MediaStore, SignFetcher, WordMediaMap};

// @module: Application controller for gloss conversion requests

/// Response of both conversion operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResponse {
    // @field: Gloss text in signing order
    pub asl_gloss: String,
    // @field: Media references in signing order
    pub media: Vec<String>,
    // @field: Explanation shown with a search result
    pub summary: Option<String>,
    // @field: Source page of the explanation
    pub link: Option<String>,
    // @field: Provenance label of the explanation
    pub source: Option<String>,
}

/// Main application controller
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,
    glosser: Glosser,
    explainer: Explainer,
    store: MediaStore,
    resolver: MediaResolver,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let store = MediaStore::from_config(&config.media);
        let fetcher = ExternalFetcher::new(&config.fetcher, config.media.media_dir.clone());
        if !fetcher.is_available() {
            info!("No sign dictionary configured, remote fetching disabled");
        }
        let fetcher: Arc<dyn SignFetcher> = Arc::new(fetcher);

        let glosser = Glosser::from_config(&config);
        let explainer = Explainer::from_config(&config);
        let resolver = MediaResolver::standard(store.clone(), fetcher);

        Ok(Self::from_parts(config, glosser, explainer, resolver))
    }

    /// Assemble a controller from already built components
    pub fn from_parts(config: Config, glosser: Glosser, explainer: Explainer, resolver: MediaResolver) -> Self {
        let store = MediaStore::from_config(&config.media);
        Self {
            config,
            glosser,
            explainer,
            store,
            resolver,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // Reloaded per call so edits to the table apply without a restart
    fn word_map(&self) -> WordMediaMap {
        WordMediaMap::load(&self.config.media.word_map_path)
    }

    /// Convert a sentence to gloss and sign media
    pub async fn convert_sentence(&self, text: &str) -> Result<ConversionResponse, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::EmptyInput("No input provided.".to_string()));
        }

        let gloss = self.glosser.gloss(text).await;
        let media = self.resolver.resolve(&gloss, &self.word_map()).await;
        debug!("Converted '{}' to '{}' with {} media references", text, gloss, media.len());

        Ok(ConversionResponse {
            asl_gloss: gloss.into_string(),
            media,
            summary: None,
            link: None,
            source: None,
        })
    }

    /// Explain a concept and convert the explanation to gloss and sign media
    pub async fn search_convert(&self, query: &str) -> Result<ConversionResponse, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::EmptyInput("No query provided.".to_string()));
        }

        let local_file = format!("{}.mp4", query.to_lowercase());
        if is_plain_file_stem(query) && self.store.contains(&local_file) {
            info!("Local video found for '{}'", query);
            return Ok(ConversionResponse {
                asl_gloss: query.to_string(),
                media: vec![self.store.reference(&local_file)],
                summary: Some(format!("Local video found for '{}'.", query)),
                link: None,
                source: Some("local".to_string()),
            });
        }

        let explanation = self.explainer.explain(query).await;
        info!("Explanation for '{}' from {}", query, explanation.source);

        let gloss = self.glosser.gloss(explanation.text.as_deref().unwrap_or(query)).await;
        let mut media = self.resolver.resolve(&gloss, &self.word_map()).await;

        if media.is_empty() && explanation.source == ExplanationSource::RuleBased {
            debug!("No signs found for the explanation, fingerspelling '{}'", query);
            media = fingerspell(&self.store, query);
        }

        Ok(ConversionResponse {
            asl_gloss: gloss.into_string(),
            media,
            summary: explanation.text,
            link: explanation.link,
            source: Some(explanation.source.label().to_string()),
        })
    }
}

/// Whether `query` can name a file inside the media directory
fn is_plain_file_stem(query: &str) -> bool {
    !query.contains(['/', '\\']) && !query.contains("..")
}
