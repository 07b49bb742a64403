use std::time::Instant;

use tracing::debug;

use crate::generator::WordPool;
use crate::session::clock::TickOutcome;
use crate::session::result::TestReport;
use crate::session::state::{Phase, TypingSession};
use crate::session::words::{Step, WordStatus};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// New full value of the input field.
    Edit(String),
    /// Append one character. A space is the advance signal.
    Type(char),
    /// Delete one character, or step back a word when the input is empty.
    Backspace,
    Advance,
    Tick,
    /// End the test early.
    Stop,
    WordsLoaded { epoch: u64, words: WordPool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The session is terminal; it accepts nothing until reset.
    InvalidTransition,
    /// The edit would run past the end of the active word.
    Overflow,
    /// Advance requested before the active word was fully typed.
    IncompleteWord,
    /// Backspace at empty input on the first word of the window.
    AtFirstWord,
    /// Tick before the first keystroke.
    ClockIdle,
    /// Word list delivered for an epoch that has since been reset.
    StaleWords,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    Ignored(IgnoreReason),
    /// The session just ended. Emitted exactly once per session.
    Finished(TestReport),
}

/// Apply one event to the session.
///
/// The clock is sampled at `now` before anything else: once the deadline
/// has passed the session finishes and the triggering event is dropped.
pub fn handle_event(session: &mut TypingSession, event: SessionEvent, now: Instant) -> EventOutcome {
    if !matches!(event, SessionEvent::WordsLoaded { .. }) {
        if session.phase == Phase::Terminal {
            return EventOutcome::Ignored(IgnoreReason::InvalidTransition);
        }
        if session.phase == Phase::Running && session.clock.tick(now) == TickOutcome::Expired {
            return finish(session, now);
        }
    }

    match event {
        SessionEvent::Tick => match session.phase {
            Phase::Running => EventOutcome::Applied,
            _ => EventOutcome::Ignored(IgnoreReason::ClockIdle),
        },
        SessionEvent::Stop => finish(session, now),
        SessionEvent::Edit(value) => apply_edit(session, value, now),
        SessionEvent::Type(' ') | SessionEvent::Advance => advance(session),
        SessionEvent::Type(ch) => {
            let mut value = session.input.clone();
            value.push(ch);
            apply_edit(session, value, now)
        }
        SessionEvent::Backspace => {
            if session.input.is_empty() {
                retreat(session)
            } else {
                let mut value = session.input.clone();
                value.pop();
                apply_edit(session, value, now)
            }
        }
        SessionEvent::WordsLoaded { epoch, words } => load_words(session, epoch, words),
    }
}

fn finish(session: &mut TypingSession, now: Instant) -> EventOutcome {
    match session.finish(now) {
        Some(report) => EventOutcome::Finished(report),
        None => EventOutcome::Ignored(IgnoreReason::InvalidTransition),
    }
}

fn apply_edit(session: &mut TypingSession, value: String, now: Instant) -> EventOutcome {
    if value.chars().count() > session.words.active_word().len() {
        return EventOutcome::Ignored(IgnoreReason::Overflow);
    }
    if session.phase == Phase::Idle && !value.is_empty() {
        session.begin(now);
    }

    session.input = value;
    let index = session.words.active_index();
    session
        .progress
        .update_current_word(&session.input, &session.words.active_word().text, index);
    EventOutcome::Applied
}

fn advance(session: &mut TypingSession) -> EventOutcome {
    if session.input.chars().count() != session.words.active_word().len() {
        return EventOutcome::Ignored(IgnoreReason::IncompleteWord);
    }

    let committed = session.progress.commit_word();
    let status = if committed.correct_chars == committed.total_chars {
        WordStatus::Correct
    } else {
        WordStatus::Incorrect
    };
    session.words.set_active_status(status);

    if session.words.advance() == Step::Regenerated {
        session.progress.clear_marks();
    }
    session.progress.begin_word(session.words.active_index());
    session.input.clear();
    EventOutcome::Applied
}

/// Step back into the previous word. The input is refilled with that word's
/// target text (the keystrokes originally typed are not kept), so the word
/// reads as fully and correctly typed and its old marks are dropped.
fn retreat(session: &mut TypingSession) -> EventOutcome {
    if !session.words.retreat() {
        return EventOutcome::Ignored(IgnoreReason::AtFirstWord);
    }

    let index = session.words.active_index();
    session.words.set_active_status(WordStatus::Pending);
    session.input = session.words.active_word().text.clone();
    session.progress.begin_word(index);
    session
        .progress
        .update_current_word(&session.input, &session.words.active_word().text, index);
    EventOutcome::Applied
}

fn load_words(session: &mut TypingSession, epoch: u64, words: WordPool) -> EventOutcome {
    if epoch != session.epoch {
        debug!(epoch, current = session.epoch, "discarding stale word list");
        return EventOutcome::Ignored(IgnoreReason::StaleWords);
    }
    if session.phase == Phase::Terminal {
        return EventOutcome::Ignored(IgnoreReason::InvalidTransition);
    }

    session.words.set_pool(words);
    // Swap the visible words only before the user has started typing.
    if session.phase == Phase::Idle && session.input.is_empty() {
        session.words.regenerate(session.config.window_size);
        session.progress.reset();
    }
    EventOutcome::Applied
}
