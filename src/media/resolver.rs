/*!
 * Gloss token to media reference resolution.
 *
 * Each token goes through an ordered list of strategies and the first one that
 * produces references wins: local cache, remote fetch, fingerspelling. A token no
 * strategy can handle is dropped.
 */

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use super::fetcher::SignFetcher;
use super::fingerspell::fingerspell;
use super::store::MediaStore;
use super::word_map::WordMediaMap;
use crate::file_utils::FileManager;
use crate::gloss::GlossText;

/// One way of turning a gloss token into media references
#[async_trait]
pub trait ResolveStrategy: Send + Sync + Debug {
    /// Name used in log lines
    fn name(&self) -> &'static str;

    /// References for `token` (whose mapped media file is `media_file`), or `None`
    async fn attempt(&self, token: &str, media_file: &str) -> Option<Vec<String>>;
}

/// Serve the clip from the media directory
#[derive(Debug, Clone)]
pub struct CacheLookup {
    store: MediaStore,
}

impl CacheLookup {
    pub fn new(store: MediaStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResolveStrategy for CacheLookup {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn attempt(&self, _token: &str, media_file: &str) -> Option<Vec<String>> {
        self.store
            .contains(media_file)
            .then(|| vec![self.store.reference(media_file)])
    }
}

/// Download the clip from the remote dictionary into the media directory
#[derive(Debug, Clone)]
pub struct RemoteFetch {
    store: MediaStore,
    fetcher: Arc<dyn SignFetcher>,
}

impl RemoteFetch {
    pub fn new(store: MediaStore, fetcher: Arc<dyn SignFetcher>) -> Self {
        Self { store, fetcher }
    }
}

#[async_trait]
impl ResolveStrategy for RemoteFetch {
    fn name(&self) -> &'static str {
        "fetch"
    }

    async fn attempt(&self, token: &str, _media_file: &str) -> Option<Vec<String>> {
        let path = self.fetcher.fetch(token).await?;
        let filename = FileManager::file_name(&path)?;
        Some(vec![self.store.reference(&filename)])
    }
}

/// Spell the token letter by letter
#[derive(Debug, Clone)]
pub struct Fingerspelling {
    store: MediaStore,
}

impl Fingerspelling {
    pub fn new(store: MediaStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResolveStrategy for Fingerspelling {
    fn name(&self) -> &'static str {
        "fingerspelling"
    }

    async fn attempt(&self, token: &str, _media_file: &str) -> Option<Vec<String>> {
        let references = fingerspell(&self.store, token);
        (!references.is_empty()).then_some(references)
    }
}

/// Resolves gloss text into an ordered list of media references
#[derive(Debug)]
pub struct MediaResolver {
    strategies: Vec<Box<dyn ResolveStrategy>>,
}

impl MediaResolver {
    /// Create a resolver trying `strategies` in order
    pub fn new(strategies: Vec<Box<dyn ResolveStrategy>>) -> Self {
        Self { strategies }
    }

    /// The standard chain: cache, fetch, fingerspelling
    pub fn standard(store: MediaStore, fetcher: Arc<dyn SignFetcher>) -> Self {
        Self::new(vec![
            Box::new(CacheLookup::new(store.clone())),
            Box::new(RemoteFetch::new(store.clone(), fetcher)),
            Box::new(Fingerspelling::new(store)),
        ])
    }

    /// References for a single token, or `None` when every strategy failed
    pub async fn resolve_token(&self, token: &str, word_map: &WordMediaMap) -> Option<Vec<String>> {
        let media_file = word_map.media_file(token);

        for strategy in &self.strategies {
            if let Some(references) = strategy.attempt(token, &media_file).await {
                debug!("Resolved {} via {}", token, strategy.name());
                return Some(references);
            }
        }

        None
    }

    /// References for every token in signing order; unresolvable tokens are dropped.
    ///
    /// A repeated token reuses the outcome of its first occurrence, so each word is
    /// fetched at most once per call.
    pub async fn resolve(&self, gloss: &GlossText, word_map: &WordMediaMap) -> Vec<String> {
        let mut references = Vec::new();
        let mut outcomes: HashMap<&str, Option<Vec<String>>> = HashMap::new();

        for token in gloss.tokens() {
            if !outcomes.contains_key(token) {
                let outcome = self.resolve_token(token, word_map).await;
                if outcome.is_none() {
                    debug!("Skipping sign: {} (no local video, download or fingerspelling)", token);
                }
                outcomes.insert(token, outcome);
            }

            if let Some(Some(found)) = outcomes.get(token) {
                references.extend(found.iter().cloned());
            }
        }

        references
    }
}
