use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use typepace::error::{EngineError, EngineResult};
use typepace::generator::WordSource;
use typepace::generator::cache::CachedWordSource;
use typepace::generator::dictionary::{FALLBACK_WORDS, fallback_pool};
use typepace::session::progress::CharCounts;
use typepace::session::{
    EventOutcome, IgnoreReason, Phase, SessionConfig, SessionEvent, TestReport, TypingSession,
    handle_event,
};

fn fixed_session(words: &[&str], duration_secs: u64) -> TypingSession {
    let config = SessionConfig {
        duration_secs,
        window_size: words.len(),
    };
    TypingSession::with_window(
        config,
        fallback_pool(),
        words.iter().map(|w| w.to_string()).collect(),
    )
    .unwrap()
}

fn send(session: &mut TypingSession, text: &str, now: Instant) {
    for ch in text.chars() {
        handle_event(session, SessionEvent::Type(ch), now);
    }
}

fn type_active_word(session: &mut TypingSession, now: Instant) {
    let word = session.active_word().text.clone();
    send(session, &word, now);
    assert_eq!(
        handle_event(session, SessionEvent::Advance, now),
        EventOutcome::Applied
    );
}

#[test]
fn the_cat_scenario_reports_83_percent() {
    let mut session = fixed_session(&["the", "cat", "sat"], 60);
    let t0 = Instant::now();

    send(&mut session, "the cxt ", t0);
    assert_eq!(
        session.progress().cumulative(),
        CharCounts {
            correct_chars: 5,
            total_chars: 6
        }
    );

    let outcome = handle_event(&mut session, SessionEvent::Stop, t0 + Duration::from_secs(20));
    match outcome {
        EventOutcome::Finished(report) => {
            assert_eq!(report.accuracy, 83);
            assert_eq!(report.correct_chars, 5);
            assert_eq!(report.total_chars, 6);
            assert_eq!(report.incorrect_chars, 1);
            assert_eq!(report.time_elapsed, 20);
            assert_eq!(report.wpm, 3);
        }
        other => panic!("expected a report, got {other:?}"),
    }
}

#[test]
fn timer_and_manual_end_agree_on_statistics() {
    let t0 = Instant::now();

    let mut by_timer = fixed_session(&["the", "cat", "sat"], 60);
    send(&mut by_timer, "the cxt ", t0);
    let timer_report = match handle_event(&mut by_timer, SessionEvent::Tick, t0 + Duration::from_secs(61)) {
        EventOutcome::Finished(report) => report,
        other => panic!("expected expiry, got {other:?}"),
    };

    let mut by_hand = fixed_session(&["the", "cat", "sat"], 60);
    send(&mut by_hand, "the cxt ", t0);
    let manual_report = match handle_event(&mut by_hand, SessionEvent::Stop, t0 + Duration::from_secs(60)) {
        EventOutcome::Finished(report) => report,
        other => panic!("expected a report, got {other:?}"),
    };

    assert_eq!(timer_report, manual_report);
    assert_eq!(timer_report, TestReport::generate(5, 6, 60));
}

#[test]
fn duplicate_expiry_produces_one_report() {
    let mut session = fixed_session(&["go", "up"], 10);
    let t0 = Instant::now();
    send(&mut session, "go", t0);

    let late = t0 + Duration::from_secs(10);
    let outcomes = [
        handle_event(&mut session, SessionEvent::Tick, late),
        handle_event(&mut session, SessionEvent::Tick, late),
    ];
    let reports = outcomes
        .iter()
        .filter(|o| matches!(o, EventOutcome::Finished(_)))
        .count();
    assert_eq!(reports, 1);
    assert_eq!(
        outcomes[1],
        EventOutcome::Ignored(IgnoreReason::InvalidTransition)
    );
    assert_eq!(session.phase(), Phase::Terminal);
}

#[test]
fn exhausting_a_window_regenerates_same_length() {
    let config = SessionConfig::default();
    let mut session = TypingSession::with_seed(config, fallback_pool(), 99).unwrap();
    let now = Instant::now();

    for expected in 1..config.window_size {
        type_active_word(&mut session, now);
        assert_eq!(session.active_index(), expected);
    }
    type_active_word(&mut session, now);

    assert_eq!(session.active_index(), 0);
    assert_eq!(session.words().len(), 25);
    assert_eq!(session.progress().marks().count(), 0);
}

#[test]
fn incomplete_advance_never_moves() {
    let mut session = fixed_session(&["hello", "world"], 60);
    let now = Instant::now();
    for prefix in ["", "h", "he", "hel", "hell"] {
        handle_event(&mut session, SessionEvent::Edit(prefix.to_string()), now);
        assert_eq!(
            handle_event(&mut session, SessionEvent::Advance, now),
            EventOutcome::Ignored(IgnoreReason::IncompleteWord)
        );
        assert_eq!(session.active_index(), 0);
    }
}

#[test]
fn backspace_policy_restores_target_not_keystrokes() {
    let mut session = fixed_session(&["word", "next"], 60);
    let now = Instant::now();
    send(&mut session, "wxrd ", now);
    handle_event(&mut session, SessionEvent::Backspace, now);

    assert_eq!(session.active_index(), 0);
    assert_eq!(session.input(), "word");
    assert_eq!(session.progress().marks_for_word(0).count(), 0);

    // Editing the restored word is ordinary mid-word editing.
    handle_event(&mut session, SessionEvent::Backspace, now);
    handle_event(&mut session, SessionEvent::Type('x'), now);
    assert_eq!(session.input(), "worx");
    assert!(session.progress().is_marked(0, 3));
}

struct Unreachable;

impl WordSource for Unreachable {
    fn fetch(&self) -> EngineResult<Vec<String>> {
        Err(EngineError::WordSourceUnavailable("connection refused".to_string()))
    }
}

#[test]
fn offline_source_still_gives_a_typeable_test() {
    let source = CachedWordSource::new(Unreachable);
    let pool = source.words();
    assert_eq!(pool.len(), FALLBACK_WORDS.len());

    let mut session = TypingSession::with_seed(SessionConfig::default(), pool, 3).unwrap();
    let now = Instant::now();
    type_active_word(&mut session, now);
    assert_eq!(session.phase(), Phase::Running);
    assert_eq!(session.active_index(), 1);
}

#[test]
fn words_from_a_reset_session_are_dropped() {
    let mut session = TypingSession::with_seed(SessionConfig::default(), fallback_pool(), 5).unwrap();
    let requested_for = session.epoch();
    let now = Instant::now();
    let first = session.active_word().text.clone();
    send(&mut session, &first, now);
    let current = session.reset();

    let late: Vec<String> = vec!["stale".to_string()];
    assert_eq!(
        handle_event(
            &mut session,
            SessionEvent::WordsLoaded {
                epoch: requested_for,
                words: late.into()
            },
            now
        ),
        EventOutcome::Ignored(IgnoreReason::StaleWords)
    );

    let fresh: Vec<String> = vec!["fresh".to_string()];
    assert_eq!(
        handle_event(
            &mut session,
            SessionEvent::WordsLoaded {
                epoch: current,
                words: fresh.into()
            },
            now
        ),
        EventOutcome::Applied
    );
    assert!(session.words().iter().all(|w| w.text == "fresh"));
}

#[test]
fn snapshot_serializes_for_presentation() {
    let mut session = fixed_session(&["cat", "dog"], 30);
    send(&mut session, "cx", Instant::now());
    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["phase"], "running");
    assert_eq!(json["input"], "cx");
    assert_eq!(json["words"][0]["status"], "pending");
    assert_eq!(json["marks"][0]["char_index"], 1);
    assert_eq!(json["remainingSecs"], 30);
}

fn random_event(rng: &mut SmallRng, session: &TypingSession) -> SessionEvent {
    let target: Vec<char> = session.active_word().text.chars().collect();
    let typed = session.input().chars().count();
    match rng.gen_range(0..10) {
        0..=4 => {
            let ch = if rng.gen_bool(0.8) && typed < target.len() {
                target[typed]
            } else {
                rng.gen_range('a'..='z')
            };
            SessionEvent::Type(ch)
        }
        5 | 6 => SessionEvent::Backspace,
        7 | 8 => SessionEvent::Advance,
        _ => {
            let cut = rng.gen_range(0..=target.len() + 1);
            SessionEvent::Edit(target.iter().take(cut).collect())
        }
    }
}

#[test]
fn invariants_hold_for_random_keystrokes() {
    for seed in 0..20u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let config = SessionConfig {
            duration_secs: 600,
            window_size: 6,
        };
        let mut session = TypingSession::with_seed(config, fallback_pool(), seed).unwrap();
        let now = Instant::now();

        for _ in 0..500 {
            let before_index = session.active_index();
            let before_len = session.input().chars().count();
            let word_len = session.active_word().text.chars().count();
            let event = random_event(&mut rng, &session);
            let is_advance = matches!(event, SessionEvent::Advance | SessionEvent::Type(' '));

            let outcome = handle_event(&mut session, event, now);
            assert!(!matches!(outcome, EventOutcome::Finished(_)));

            let current = session.progress().current();
            let cumulative = session.progress().cumulative();
            assert_eq!(current.total_chars, session.input().chars().count());
            assert!(cumulative.correct_chars <= cumulative.total_chars);
            assert!(session.input().chars().count() <= session.active_word().text.chars().count());

            let after = session.active_index();
            let wrapped = before_index == config.window_size - 1 && after == 0;
            assert!(
                after == before_index
                    || after == before_index + 1
                    || after + 1 == before_index
                    || wrapped,
                "active index jumped from {before_index} to {after}"
            );
            if is_advance && before_len < word_len {
                assert_eq!(after, before_index);
            }
            assert_eq!(session.words().len(), config.window_size);
        }
    }
}
