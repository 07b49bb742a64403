use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::generator::dictionary::fallback_pool;
use crate::generator::{WordPool, WordSource, sanitize_words};

/// Populate-once cache in front of a [`WordSource`].
///
/// The first successful non-empty fetch is kept for the lifetime of the
/// value and never invalidated. Failures are not cached: they resolve to the
/// fallback list and the next call tries the source again.
pub struct CachedWordSource<S> {
    inner: S,
    cached: OnceLock<WordPool>,
}

impl<S: WordSource> CachedWordSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cached: OnceLock::new(),
        }
    }

    /// Never fails; an unreachable source degrades to the fallback list.
    pub fn words(&self) -> WordPool {
        if let Some(pool) = self.cached.get() {
            return pool.clone();
        }

        match self.inner.fetch() {
            Ok(raw) => {
                let words = sanitize_words(raw);
                if words.is_empty() {
                    warn!("word source returned no usable words, using fallback list");
                    return fallback_pool();
                }
                debug!(count = words.len(), "cached word list");
                // A concurrent caller may have won the race; keep whichever landed first.
                let _ = self.cached.set(words.into());
                self.cached.get().cloned().unwrap_or_else(fallback_pool)
            }
            Err(err) => {
                warn!(%err, "using fallback word list");
                fallback_pool()
            }
        }
    }

    pub fn is_populated(&self) -> bool {
        self.cached.get().is_some()
    }
}

#[cfg(feature = "network")]
pub fn fetch_url(url: &str) -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .ok()?;
    let response = client.get(url).send().ok()?;
    if response.status().is_success() {
        response.text().ok()
    } else {
        None
    }
}

#[cfg(not(feature = "network"))]
pub fn fetch_url(_url: &str) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::{EngineError, EngineResult};
    use crate::generator::dictionary::FALLBACK_WORDS;

    struct CountingSource {
        calls: AtomicUsize,
        fail_first: usize,
        words: Vec<&'static str>,
    }

    impl CountingSource {
        fn new(fail_first: usize, words: Vec<&'static str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first,
                words,
            }
        }
    }

    impl WordSource for CountingSource {
        fn fetch(&self) -> EngineResult<Vec<String>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(EngineError::WordSourceUnavailable("offline".to_string()));
            }
            Ok(self.words.iter().map(|w| w.to_string()).collect())
        }
    }

    #[test]
    fn success_is_fetched_once() {
        let cache = CachedWordSource::new(CountingSource::new(0, vec!["alpha", "beta"]));
        let first = cache.words();
        let second = cache.words();
        assert_eq!(&*first, &["alpha".to_string(), "beta".to_string()]);
        assert_eq!(first, second);
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_populated());
    }

    #[test]
    fn failure_falls_back_and_is_retried() {
        let cache = CachedWordSource::new(CountingSource::new(1, vec!["alpha"]));

        let degraded = cache.words();
        assert_eq!(degraded.len(), FALLBACK_WORDS.len());
        assert!(!cache.is_populated());

        let recovered = cache.words();
        assert_eq!(&*recovered, &["alpha".to_string()]);
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn empty_list_is_treated_as_unusable() {
        let cache = CachedWordSource::new(CountingSource::new(0, vec!["", "   "]));
        assert_eq!(cache.words().len(), FALLBACK_WORDS.len());
        assert!(!cache.is_populated());
    }
}
