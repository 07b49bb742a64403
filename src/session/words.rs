use rand::Rng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::debug;

use crate::generator::WordPool;
use crate::generator::dictionary::placeholder_word;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    Pending,
    Correct,
    Incorrect,
}

/// A word in the window. `status` is a display annotation only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Word {
    pub text: String,
    pub status: WordStatus,
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: WordStatus::Pending,
        }
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// The window was exhausted and replaced; the active index is back at 0.
    Regenerated,
}

/// Fixed-size window of words plus the active position within it.
pub struct WordBuffer {
    words: Vec<Word>,
    active: usize,
    pool: WordPool,
    rng: SmallRng,
}

impl WordBuffer {
    pub fn new(size: usize, pool: WordPool, rng: SmallRng) -> Self {
        let mut buffer = Self {
            words: Vec::new(),
            active: 0,
            pool,
            rng,
        };
        buffer.regenerate(size);
        buffer
    }

    /// Start from a predetermined first window; later windows come from the pool.
    pub fn with_window(window: Vec<String>, pool: WordPool, rng: SmallRng) -> Self {
        Self {
            words: window.into_iter().map(Word::new).collect(),
            active: 0,
            pool,
            rng,
        }
    }

    /// Replace the window with `count` words drawn with replacement from the
    /// pool. An empty pool yields the fixed placeholder sequence instead.
    pub fn regenerate(&mut self, count: usize) {
        self.words = if self.pool.is_empty() {
            (0..count).map(|i| Word::new(placeholder_word(i))).collect()
        } else {
            (0..count)
                .map(|_| {
                    let idx = self.rng.gen_range(0..self.pool.len());
                    Word::new(self.pool[idx].clone())
                })
                .collect()
        };
        self.active = 0;
        debug!(count, pool = self.pool.len(), "regenerated word window");
    }

    pub fn advance(&mut self) -> Step {
        let next = self.active + 1;
        if next >= self.words.len() {
            let size = self.words.len();
            self.regenerate(size);
            Step::Regenerated
        } else {
            self.active = next;
            Step::Moved
        }
    }

    /// Step back one word. Returns false (and changes nothing) on the first word.
    pub fn retreat(&mut self) -> bool {
        if self.active == 0 {
            return false;
        }
        self.active -= 1;
        true
    }

    pub fn set_pool(&mut self, pool: WordPool) {
        self.pool = pool;
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_word(&self) -> &Word {
        &self.words[self.active]
    }

    pub fn set_active_status(&mut self, status: WordStatus) {
        self.words[self.active].status = status;
    }
}
