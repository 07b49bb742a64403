use std::collections::BTreeSet;

use serde::Serialize;

use crate::session::judge::{Judgement, judge};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CharCounts {
    pub correct_chars: usize,
    pub total_chars: usize,
}

impl CharCounts {
    pub fn incorrect_chars(&self) -> usize {
        self.total_chars - self.correct_chars
    }

    fn merged(self, other: CharCounts) -> CharCounts {
        CharCounts {
            correct_chars: self.correct_chars + other.correct_chars,
            total_chars: self.total_chars + other.total_chars,
        }
    }
}

/// A character position that was mistyped, keyed by window-relative word index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CharMark {
    pub word_index: usize,
    pub char_index: usize,
}

/// Committed and in-flight character counts plus the mistype marks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressTracker {
    cumulative: CharCounts,
    current: CharCounts,
    marks: BTreeSet<CharMark>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the in-flight counts and this word's marks from scratch.
    pub fn update_current_word(&mut self, typed: &str, target: &str, word_index: usize) -> Judgement {
        let judgement = judge(typed, target);
        self.clear_marks_for(word_index);
        self.marks
            .extend(judgement.incorrect_positions().map(|char_index| CharMark {
                word_index,
                char_index,
            }));
        self.current = CharCounts {
            correct_chars: judgement.correct_count,
            total_chars: judgement.typed_count(),
        };
        judgement
    }

    /// Fold the in-flight word into the permanent tally. Commits are never reversed.
    pub fn commit_word(&mut self) -> CharCounts {
        let committed = self.current;
        self.cumulative = self.cumulative.merged(committed);
        self.current = CharCounts::default();
        committed
    }

    /// Start a fresh in-flight word at `word_index`, dropping its old marks.
    pub fn begin_word(&mut self, word_index: usize) {
        self.current = CharCounts::default();
        self.clear_marks_for(word_index);
    }

    pub fn clear_marks_for(&mut self, word_index: usize) {
        self.marks.retain(|m| m.word_index != word_index);
    }

    pub fn clear_marks(&mut self) {
        self.marks.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn cumulative(&self) -> CharCounts {
        self.cumulative
    }

    pub fn current(&self) -> CharCounts {
        self.current
    }

    /// Committed words plus the word being typed.
    pub fn combined(&self) -> CharCounts {
        self.cumulative.merged(self.current)
    }

    pub fn is_marked(&self, word_index: usize, char_index: usize) -> bool {
        self.marks.contains(&CharMark {
            word_index,
            char_index,
        })
    }

    pub fn marks(&self) -> impl Iterator<Item = &CharMark> {
        self.marks.iter()
    }

    pub fn marks_for_word(&self, word_index: usize) -> impl Iterator<Item = &CharMark> {
        self.marks.iter().filter(move |m| m.word_index == word_index)
    }
}
