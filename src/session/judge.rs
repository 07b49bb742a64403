/// Per-position comparison of typed text against a target word.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Judgement {
    pub correct_count: usize,
    pub per_char: Vec<bool>,
}

impl Judgement {
    pub fn typed_count(&self) -> usize {
        self.per_char.len()
    }

    pub fn incorrect_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.per_char
            .iter()
            .enumerate()
            .filter(|(_, ok)| !**ok)
            .map(|(i, _)| i)
    }

    pub fn is_clean(&self) -> bool {
        self.correct_count == self.per_char.len()
    }
}

/// Compare `typed` against `target` one char at a time, ignoring case.
///
/// Positions past the end of `target` are judged incorrect; the input
/// controller never lets them through, so callers normally see
/// `typed.len() <= target.len()`.
pub fn judge(typed: &str, target: &str) -> Judgement {
    let mut expected = target.chars();
    let per_char: Vec<bool> = typed
        .chars()
        .map(|actual| match expected.next() {
            Some(want) => chars_match(actual, want),
            None => false,
        })
        .collect();
    let correct_count = per_char.iter().filter(|ok| **ok).count();

    Judgement {
        correct_count,
        per_char,
    }
}

fn chars_match(actual: char, expected: char) -> bool {
    actual == expected || actual.to_lowercase().eq(expected.to_lowercase())
}
