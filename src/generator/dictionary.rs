use crate::error::EngineResult;
use crate::generator::{WordPool, WordSource, sanitize_words};

/// Built-in list used whenever the configured source cannot be reached.
/// Order is fixed so placeholder windows are reproducible.
pub const FALLBACK_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "she", "or",
    "an", "will", "my", "one", "all", "would", "there", "their", "what", "so", "up", "out", "if",
    "about", "who", "get", "which", "go", "me", "when", "make", "can", "like", "time", "no",
    "just", "him", "know", "take", "people", "into", "year",
];

pub fn fallback_pool() -> WordPool {
    FALLBACK_WORDS.iter().map(|w| w.to_string()).collect()
}

/// Word at position `i` of the endless fallback cycle.
pub fn placeholder_word(i: usize) -> &'static str {
    FALLBACK_WORDS[i % FALLBACK_WORDS.len()]
}

/// In-memory source, used offline and in tests.
pub struct StaticWordSource {
    words: Vec<String>,
}

impl StaticWordSource {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: sanitize_words(words),
        }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_WORDS)
    }
}

impl WordSource for StaticWordSource {
    fn fetch(&self) -> EngineResult<Vec<String>> {
        Ok(self.words.clone())
    }
}
