//! Decoded image cache keyed by reference string.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use image::DynamicImage;

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, DynamicImage>,
    order: VecDeque<String>,
    /// References that failed to decode, so they are not retried every frame.
    rejected: HashSet<String>,
}

/// Bounded cache of decoded images. Oldest entries are evicted first.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    inner: Arc<Mutex<CacheInner>>,
    max_size: usize,
}

impl ImageCache {
    /// Create a new image cache with the given maximum number of entries.
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner::default())),
            max_size,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, reference: &str) -> Option<DynamicImage> {
        self.lock().entries.get(reference).cloned()
    }

    pub fn insert(&self, reference: String, image: DynamicImage) {
        let mut guard = self.lock();

        if guard.entries.contains_key(&reference) {
            guard.entries.insert(reference, image);
            return;
        }

        guard.order.push_back(reference.clone());
        guard.entries.insert(reference, image);

        while guard.entries.len() > self.max_size {
            let Some(oldest) = guard.order.pop_front() else {
                break;
            };
            guard.entries.remove(&oldest);
        }
    }

    /// Return the cached image for `reference`, decoding it on a miss.
    ///
    /// Only data URIs decode; other references yield `None`. A reference
    /// that fails once is remembered and not decoded again.
    pub fn get_or_decode(&self, reference: &str) -> Option<DynamicImage> {
        if let Some(image) = self.get(reference) {
            return Some(image);
        }
        if self.is_rejected(reference) {
            return None;
        }
        match super::decode_data_uri(reference) {
            Ok(image) => {
                self.insert(reference.to_string(), image.clone());
                Some(image)
            }
            Err(err) => {
                tracing::debug!(error = %err, "image reference not decoded");
                self.reject(reference);
                None
            }
        }
    }

    fn reject(&self, reference: &str) {
        let mut guard = self.lock();
        if guard.rejected.len() >= self.max_size.max(1) {
            guard.rejected.clear();
        }
        guard.rejected.insert(reference.to_string());
    }

    /// Whether `reference` already failed to decode.
    pub fn is_rejected(&self, reference: &str) -> bool {
        self.lock().rejected.contains(reference)
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.lock().entries.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn pixel() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255])))
    }

    #[test]
    fn test_cache_new_is_empty() {
        let cache = ImageCache::new(10);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_evicts_oldest() {
        let cache = ImageCache::new(2);
        cache.insert("a".to_string(), pixel());
        cache.insert("b".to_string(), pixel());
        cache.insert("c".to_string(), pixel());
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("a"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_reinsert_does_not_grow() {
        let cache = ImageCache::new(2);
        cache.insert("a".to_string(), pixel());
        cache.insert("a".to_string(), pixel());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remote_url_is_not_decoded() {
        let cache = ImageCache::new(2);
        assert!(cache.get_or_decode("https://example.com/a.png").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_broken_data_uri_is_remembered() {
        let cache = ImageCache::new(2);
        let broken = "data:image/png;base64,!!!";
        assert!(!cache.is_rejected(broken));
        assert!(cache.get_or_decode(broken).is_none());
        assert!(cache.is_rejected(broken));
        assert!(cache.get_or_decode(broken).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_rejected_set_stays_bounded() {
        let cache = ImageCache::new(2);
        for n in 0..5 {
            let _ = cache.get_or_decode(&format!("data:image/png;base64,!{n}"));
        }
        assert!(cache.lock().rejected.len() <= 2);
        assert!(cache.is_rejected("data:image/png;base64,!4"));
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = ImageCache::new(4);
        let other = cache.clone();
        other.insert("a".to_string(), pixel());
        assert!(cache.contains("a"));
    }
}
