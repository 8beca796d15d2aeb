// src/provider/cache.rs — Memoizing responder decorator
//
// Answers are keyed by SHA-256 over (model, temperature, prompt). Successful
// results are stored, including absent content; errors never are. The map can
// be backed by a JSON file so a re-run replays earlier answers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{ResponseRequest, Responder};
use crate::infra::errors::EvolveError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    entries: HashMap<String, Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct CachingResponder {
    inner: Arc<dyn Responder>,
    entries: Mutex<HashMap<String, Option<String>>>,
    path: Option<PathBuf>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Stable cache key for a request.
pub fn cache_key(request: &ResponseRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.model.as_bytes());
    hasher.update([0u8]);
    hasher.update(request.temperature.to_bits().to_le_bytes());
    hasher.update([0u8]);
    hasher.update(request.prompt.as_bytes());
    hex::encode(hasher.finalize())
}

impl CachingResponder {
    /// In-memory cache for the lifetime of this value.
    pub fn new(inner: Arc<dyn Responder>) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
            path: None,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache backed by `path`. A missing or unreadable file starts empty.
    pub fn with_file(inner: Arc<dyn Responder>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        tracing::debug!(
            "Loaded {} cached responses from {}",
            entries.len(),
            path.display()
        );
        Self {
            entries: Mutex::new(entries),
            path: Some(path),
            ..Self::new(inner)
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.lock().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Write the map to the backing file, if there is one.
    pub fn persist(&self) -> Result<(), EvolveError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = CacheFile {
            entries: self.lock().clone(),
        };
        let json = serde_json::to_string(&file).map_err(anyhow::Error::from)?;
        std::fs::write(path, json)?;
        tracing::debug!(
            "Saved {} cached responses to {}",
            file.entries.len(),
            path.display()
        );
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Option<String>>> {
        // A poisoned map is still a valid map; no invariant spans entries.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn load_entries(path: &Path) -> HashMap<String, Option<String>> {
    let data = match std::fs::read_to_string(path) {
        Ok(d) => d,
        Err(_) => return HashMap::new(),
    };
    match serde_json::from_str::<CacheFile>(&data) {
        Ok(file) => file.entries,
        Err(e) => {
            tracing::warn!("Ignoring corrupt response cache {}: {}", path.display(), e);
            HashMap::new()
        }
    }
}

#[async_trait]
impl Responder for CachingResponder {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn respond(&self, request: &ResponseRequest) -> Result<Option<String>, EvolveError> {
        let key = cache_key(request);
        let cached = self.lock().get(&key).cloned();
        if let Some(hit) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let answer = self.inner.respond(request).await?;
        self.lock().insert(key, answer.clone());
        Ok(answer)
    }
}
