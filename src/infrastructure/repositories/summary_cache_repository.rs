use crate::error::AppResult;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Hex digits kept from the SHA-256 digest.
const KEY_LENGTH: usize = 16;

/// Cache key for a code block: truncated SHA-256 of `"{language}:{code}"`.
///
/// The joined input is ambiguous when a language tag contains `:`
/// (`("a:b", "c")` and `("a", "b:c")` share a key). Fence tags never carry a
/// colon, and changing the input format would orphan every existing cache
/// file, so the format stays.
pub fn cache_key(language: &str, code: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}", language, code).as_bytes());
    format!("{:x}", digest)[..KEY_LENGTH].to_string()
}

/// Durable key → summary map backed by a JSON file.
///
/// Loaded once, rewritten in full after every insert. A disabled cache never
/// hits and never touches the disk.
pub struct SummaryCacheRepository {
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, String>>,
}

impl SummaryCacheRepository {
    /// Load the cache file. Missing or unreadable files start an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::read_entries(&path);

        Self {
            path: Some(path),
            entries: Mutex::new(entries),
        }
    }

    pub fn disabled() -> Self {
        Self {
            path: None,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        self.lock().get(key).cloned()
    }

    /// Store a summary and persist the whole cache immediately.
    ///
    /// Persistence failures are logged; the in-memory entry is kept.
    pub fn insert(&self, key: &str, summary: &str) {
        let Some(path) = &self.path else {
            return;
        };

        let snapshot = {
            let mut entries = self.lock();
            entries.insert(key.to_string(), summary.to_string());
            entries.clone()
        };

        if let Err(e) = Self::write_entries(path, &snapshot) {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Could not save code summary cache"
            );
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and delete the cache file.
    pub fn clear(&self) -> AppResult<()> {
        self.lock().clear();
        if let Some(path) = &self.path {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
            tracing::info!(path = %path.display(), "Code summary cache cleared");
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned lock still holds a consistent map; keep using it.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_entries(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No code summary cache on disk yet");
            return BTreeMap::new();
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                serde_json::from_str::<BTreeMap<String, String>>(&raw).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(entries) => {
                tracing::info!(
                    entries = entries.len(),
                    path = %path.display(),
                    "Loaded cached code summaries"
                );
                entries
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Could not load code summary cache, starting empty"
                );
                BTreeMap::new()
            }
        }
    }

    fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
