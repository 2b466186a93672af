use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

/// Incremental loader for a scene's asset manifest.
///
/// Assets are read one per [`AssetLoader::load_next`] call so a loading
/// scene can show progress between frames. Bytes are cached by key; what
/// they decode to is up to the consumer.
#[derive(Default)]
pub struct AssetLoader {
    queue: VecDeque<(String, PathBuf)>,
    total: usize,
    finished: usize,
    failed: Vec<String>,
    cache: HashMap<String, Vec<u8>>,
}

impl AssetLoader {
    /// Create a new loader with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an asset. Keys already cached are skipped.
    pub fn queue(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        let key = key.into();
        if self.cache.contains_key(&key) {
            return;
        }
        self.queue.push_back((key, path.into()));
        self.total += 1;
    }

    /// Load the next queued asset, if any. Returns false once the queue is empty.
    ///
    /// A file that cannot be read is logged and counted as finished; loading
    /// never stalls on it.
    pub fn load_next(&mut self) -> bool {
        let Some((key, path)) = self.queue.pop_front() else {
            return false;
        };
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::debug!("loaded asset {} ({} bytes)", key, bytes.len());
                self.cache.insert(key, bytes);
            }
            Err(err) => {
                log::warn!("failed to load asset {} from {}: {}", key, path.display(), err);
                self.failed.push(key);
            }
        }
        self.finished += 1;
        true
    }

    /// Fraction of queued assets that finished, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.finished as f32 / self.total as f32
        }
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_empty()
    }

    /// Get cached bytes by key, if loaded.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.cache.get(key).map(Vec::as_slice)
    }

    /// Keys of assets that could not be read.
    pub fn failed(&self) -> &[String] {
        &self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_loader_is_complete() {
        let loader = AssetLoader::new();
        assert!(loader.is_complete());
        assert_eq!(loader.progress(), 1.0);
    }

    #[test]
    fn missing_files_still_finish() {
        let mut loader = AssetLoader::new();
        loader.queue("logo", "definitely/not/here/logo.png");
        loader.queue("star", "definitely/not/here/star.png");
        assert_eq!(loader.progress(), 0.0);

        assert!(loader.load_next());
        assert_eq!(loader.progress(), 0.5);
        assert!(loader.load_next());
        assert!(!loader.load_next());

        assert!(loader.is_complete());
        assert_eq!(loader.progress(), 1.0);
        assert_eq!(loader.failed().len(), 2);
        assert!(loader.get("logo").is_none());
    }

    #[test]
    fn readable_files_are_cached() {
        let path = std::env::temp_dir().join(format!("scene2d-asset-{}.bin", std::process::id()));
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let mut loader = AssetLoader::new();
        loader.queue("blob", path.clone());
        loader.load_next();
        assert_eq!(loader.get("blob"), Some(&[1u8, 2, 3][..]));

        // Cached keys are not queued twice.
        loader.queue("blob", path.clone());
        assert!(loader.is_complete());
        let _ = std::fs::remove_file(path);
    }
}
