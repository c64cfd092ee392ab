use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::file_utils::FileManager;

/// Gloss word to media filename table, read-only during a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordMediaMap {
    entries: HashMap<String, String>,
}

impl WordMediaMap {
    /// Build a map from `(word, filename)` pairs
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Load the JSON table at `path`; a missing or malformed file yields an empty map
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            debug!("No word map at {:?}, using default file names", path);
            return Self::default();
        }

        let content = match FileManager::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("{}", e);
                return Self::default();
            }
        };

        match serde_json::from_str::<WordMediaMap>(&content) {
            Ok(map) => {
                debug!("Loaded {} word map entries from {:?}", map.len(), path);
                map
            }
            Err(e) => {
                warn!("Ignoring malformed word map {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Media filename for a gloss token: the mapped name, or `<token>.mp4`
    pub fn media_file(&self, token: &str) -> String {
        self.entries
            .get(token)
            .cloned()
            .unwrap_or_else(|| format!("{}.mp4", token))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
