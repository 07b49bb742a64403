use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::progress::CharCounts;

/// Final (or live) performance figures for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub wpm: u32,
    pub accuracy: u32,
    pub time_elapsed: u64,
    pub correct_chars: usize,
    pub total_chars: usize,
    pub incorrect_chars: usize,
}

impl TestReport {
    /// WPM counts five correct characters as one word. Both ratios are
    /// rounded to whole numbers and read 0 when their denominator is 0.
    pub fn generate(correct_chars: usize, total_chars: usize, elapsed_secs: u64) -> Self {
        let wpm = if elapsed_secs > 0 {
            ((correct_chars as f64 / 5.0) / (elapsed_secs as f64 / 60.0)).round() as u32
        } else {
            0
        };
        let accuracy = if total_chars > 0 {
            (correct_chars as f64 / total_chars as f64 * 100.0).round() as u32
        } else {
            0
        };

        Self {
            wpm,
            accuracy,
            time_elapsed: elapsed_secs,
            correct_chars,
            total_chars,
            incorrect_chars: total_chars.saturating_sub(correct_chars),
        }
    }

    pub fn from_counts(counts: CharCounts, elapsed_secs: u64) -> Self {
        Self::generate(counts.correct_chars, counts.total_chars, elapsed_secs)
    }
}

/// What the persistence collaborator stores for one finished test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSubmission {
    pub wpm: u32,
    pub accuracy: u32,
    pub time: u64,
    pub characters: usize,
    pub mistakes: usize,
    pub test_type: String,
    pub difficulty: String,
    pub completed_at: DateTime<Utc>,
}

impl ResultSubmission {
    pub fn from_report(report: &TestReport, test_type: &str, difficulty: &str) -> Self {
        Self {
            wpm: report.wpm,
            accuracy: report.accuracy,
            time: report.time_elapsed,
            characters: report.total_chars,
            mistakes: report.incorrect_chars,
            test_type: test_type.to_string(),
            difficulty: difficulty.to_string(),
            completed_at: Utc::now(),
        }
    }
}

/// Receives the one submission produced per finished session.
pub trait ResultSink {
    fn submit(&mut self, submission: &ResultSubmission) -> Result<()>;

    /// Deliver anything held back by `submit`. Called once on shutdown.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes each submission as one line of JSON.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for JsonLinesSink<W> {
    fn submit(&mut self, submission: &ResultSubmission) -> Result<()> {
        serde_json::to_writer(&mut self.out, submission)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// `m:ss`, e.g. `1:05`.
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
