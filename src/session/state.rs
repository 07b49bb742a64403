use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::generator::{WordPool, sanitize_words};
use crate::session::clock::SessionClock;
use crate::session::progress::{CharCounts, CharMark, ProgressTracker};
use crate::session::result::TestReport;
use crate::session::words::{Word, WordBuffer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub duration_secs: u64,
    pub window_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            window_size: 25,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.duration_secs == 0 {
            return Err(EngineError::Configuration(
                "duration must be at least one second".to_string(),
            ));
        }
        if self.window_size == 0 {
            return Err(EngineError::Configuration(
                "word window must hold at least one word".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Terminal,
}

/// One typing test: the word window, the progress tally and the clock,
/// mutated only through [`crate::session::input::handle_event`].
///
/// Every reset bumps `epoch`; asynchronous word deliveries tagged with an
/// older epoch are discarded.
pub struct TypingSession {
    pub(crate) config: SessionConfig,
    pub(crate) phase: Phase,
    pub(crate) words: WordBuffer,
    pub(crate) progress: ProgressTracker,
    pub(crate) clock: SessionClock,
    pub(crate) input: String,
    pub(crate) epoch: u64,
}

impl TypingSession {
    pub fn new(config: SessionConfig, pool: WordPool) -> EngineResult<Self> {
        Self::with_rng(config, pool, SmallRng::from_entropy())
    }

    pub fn with_seed(config: SessionConfig, pool: WordPool, seed: u64) -> EngineResult<Self> {
        Self::with_rng(config, pool, SmallRng::seed_from_u64(seed))
    }

    /// Use `window` as the first set of words (e.g. a fixed practice text).
    /// It must hold exactly `window_size` non-empty words.
    pub fn with_window(
        config: SessionConfig,
        pool: WordPool,
        window: Vec<String>,
    ) -> EngineResult<Self> {
        config.validate()?;
        let window = sanitize_words(window);
        if window.len() != config.window_size {
            return Err(EngineError::Configuration(format!(
                "first window holds {} usable words, expected {}",
                window.len(),
                config.window_size
            )));
        }
        Ok(Self::assemble(
            config,
            WordBuffer::with_window(window, pool, SmallRng::from_entropy()),
        ))
    }

    fn with_rng(config: SessionConfig, pool: WordPool, rng: SmallRng) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::assemble(
            config,
            WordBuffer::new(config.window_size, pool, rng),
        ))
    }

    fn assemble(config: SessionConfig, words: WordBuffer) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            words,
            progress: ProgressTracker::new(),
            clock: SessionClock::new(config.duration_secs),
            input: String::new(),
            epoch: 0,
        }
    }

    /// Restart with the same configuration. Returns the new epoch.
    pub fn reset(&mut self) -> u64 {
        let config = self.config;
        self.restart(config)
    }

    /// Restart with a new configuration (e.g. a different duration).
    pub fn reset_with(&mut self, config: SessionConfig) -> EngineResult<u64> {
        config.validate()?;
        Ok(self.restart(config))
    }

    fn restart(&mut self, config: SessionConfig) -> u64 {
        self.config = config;
        self.phase = Phase::Idle;
        self.clock.reset(config.duration_secs);
        self.progress.reset();
        self.input.clear();
        self.words.regenerate(config.window_size);
        self.epoch += 1;
        info!(epoch = self.epoch, duration = config.duration_secs, "session reset");
        self.epoch
    }

    pub(crate) fn begin(&mut self, now: Instant) {
        self.clock.start(now);
        self.phase = Phase::Running;
        info!(epoch = self.epoch, "session started");
    }

    /// Move to the terminal phase and build the report. Only the first call
    /// produces one.
    pub(crate) fn finish(&mut self, now: Instant) -> Option<TestReport> {
        if self.phase == Phase::Terminal {
            return None;
        }
        self.clock.stop(now);
        self.phase = Phase::Terminal;
        let report = TestReport::from_counts(self.progress.combined(), self.clock.elapsed_secs());
        info!(
            wpm = report.wpm,
            accuracy = report.accuracy,
            elapsed = report.time_elapsed,
            "session finished"
        );
        Some(report)
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn words(&self) -> &[Word] {
        self.words.words()
    }

    pub fn active_index(&self) -> usize {
        self.words.active_index()
    }

    pub fn active_word(&self) -> &Word {
        self.words.active_word()
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Statistics so far, counting the word being typed.
    pub fn live_report(&self) -> TestReport {
        TestReport::from_counts(self.progress.combined(), self.clock.elapsed_secs())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            epoch: self.epoch,
            phase: self.phase,
            words: self.words.words().to_vec(),
            active_index: self.words.active_index(),
            input: self.input.clone(),
            marks: self.progress.marks().copied().collect(),
            cumulative: self.progress.cumulative(),
            current: self.progress.current(),
            elapsed_secs: self.clock.elapsed_secs(),
            remaining_secs: self.clock.remaining_secs(),
            live: self.live_report(),
        }
    }
}

/// Everything a presentation layer reads, captured at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub epoch: u64,
    pub phase: Phase,
    pub words: Vec<Word>,
    pub active_index: usize,
    pub input: String,
    pub marks: Vec<CharMark>,
    pub cumulative: CharCounts,
    pub current: CharCounts,
    pub elapsed_secs: u64,
    pub remaining_secs: u64,
    pub live: TestReport,
}
