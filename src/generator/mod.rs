pub mod cache;
pub mod dictionary;
pub mod remote;

use std::sync::Arc;

use crate::error::EngineResult;

/// Shared, immutable list of candidate words drawn from when filling a window.
pub type WordPool = Arc<[String]>;

/// Supplies the raw word list. Implementations may block (network fetch);
/// the engine only ever sees the result through [`cache::CachedWordSource`].
pub trait WordSource: Send + Sync {
    fn fetch(&self) -> EngineResult<Vec<String>>;
}

impl<T: WordSource + ?Sized> WordSource for Box<T> {
    fn fetch(&self) -> EngineResult<Vec<String>> {
        (**self).fetch()
    }
}

/// Trim and lowercase every token, dropping empties and anything with inner
/// whitespace (a space is the advance signal and could never be typed).
pub fn sanitize_words<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty() && !w.chars().any(char::is_whitespace))
        .collect()
}
