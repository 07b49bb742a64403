mod event;

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::cursor::MoveToColumn;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::queue;
use tracing::info;

use typepace::config::Config;
use typepace::generator::WordSource;
use typepace::generator::cache::CachedWordSource;
use typepace::generator::dictionary::{StaticWordSource, fallback_pool};
use typepace::generator::remote::HttpWordSource;
use typepace::logging;
use typepace::session::result::{
    JsonLinesSink, ResultSink, ResultSubmission, TestReport, format_time,
};
use typepace::session::{EventOutcome, Phase, SessionEvent, TypingSession, handle_event};

use event::{AppEvent, EventHandler};

const WORDS_SHOWN: usize = 8;

#[derive(Parser)]
#[command(name = "typepace", version, about = "Timed typing-speed test")]
struct Cli {
    #[arg(short, long, help = "Test length in seconds")]
    duration: Option<u64>,

    #[arg(short, long, help = "Number of words per window")]
    words: Option<usize>,

    #[arg(long, help = "URL of a JSON array of words")]
    word_list_url: Option<String>,

    #[arg(long, help = "Seed for reproducible word windows")]
    seed: Option<u64>,

    #[arg(long, help = "Append finished results as JSON lines to this file")]
    results: Option<PathBuf>,

    #[arg(long, help = "Write the effective settings back to the config file")]
    save: bool,
}

impl Cli {
    /// Layer command-line overrides on top of the loaded config.
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(duration) = self.duration {
            config.set_custom_duration(duration)?;
        }
        if let Some(words) = self.words {
            config.word_window_size = words;
        }
        if let Some(url) = &self.word_list_url {
            config.word_list_url = url.clone();
        }
        config.validate()?;
        Ok(())
    }
}

type SharedSource = Arc<CachedWordSource<Box<dyn WordSource>>>;

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = logging::init() {
        info!(path = %path.display(), "logging to file");
    }

    let mut config = Config::load().unwrap_or_default();
    cli.apply(&mut config)?;
    if cli.save {
        config.save()?;
    }

    let source: Box<dyn WordSource> = match config.word_list_url() {
        Some(url) => Box::new(HttpWordSource::new(url)),
        None => Box::new(StaticWordSource::fallback()),
    };
    let source: SharedSource = Arc::new(CachedWordSource::new(source));

    // Start typeable immediately; the real list replaces the window if it
    // arrives before the first keystroke.
    let session_config = config.session_config();
    let mut session = match cli.seed {
        Some(seed) => TypingSession::with_seed(session_config, fallback_pool(), seed)?,
        None => TypingSession::new(session_config, fallback_pool())?,
    };

    let mut sink: Box<dyn ResultSink> = match &cli.results {
        Some(path) => Box::new(JsonLinesSink::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        )),
        None => Box::new(PendingStdout::default()),
    };

    enable_raw_mode()?;
    let events = EventHandler::new(Duration::from_secs(1));
    events.load_words(source.clone(), session.epoch());

    let result = run(&mut session, &events, &source, &mut config, sink.as_mut());

    disable_raw_mode()?;
    println!();
    sink.flush()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    Ok(())
}

fn run(
    session: &mut TypingSession,
    events: &EventHandler,
    source: &SharedSource,
    config: &mut Config,
    sink: &mut dyn ResultSink,
) -> Result<()> {
    let mut last_report: Option<TestReport> = None;
    loop {
        render(session, last_report.as_ref())?;

        let now = Instant::now();
        let event = match events.next()? {
            AppEvent::Tick => SessionEvent::Tick,
            AppEvent::WordsLoaded { epoch, words } => SessionEvent::WordsLoaded { epoch, words },
            AppEvent::Key(key) => match key_action(key) {
                KeyAction::Quit => return Ok(()),
                KeyAction::Restart => {
                    let epoch = session.reset();
                    last_report = None;
                    events.load_words(source.clone(), epoch);
                    continue;
                }
                KeyAction::NextPreset => {
                    config.cycle_duration_preset();
                    let epoch = session.reset_with(config.session_config())?;
                    last_report = None;
                    events.load_words(source.clone(), epoch);
                    continue;
                }
                KeyAction::Session(event) => event,
                KeyAction::None => continue,
            },
        };

        if let EventOutcome::Finished(report) = handle_event(session, event, now) {
            info!(wpm = report.wpm, accuracy = report.accuracy, "test complete");
            let submission =
                ResultSubmission::from_report(&report, &config.test_type, &config.difficulty);
            sink.submit(&submission)?;
            last_report = Some(report);
        }
    }
}

#[derive(Debug, PartialEq)]
enum KeyAction {
    Quit,
    Restart,
    NextPreset,
    Session(SessionEvent),
    None,
}

fn key_action(key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Tab => KeyAction::Restart,
        KeyCode::BackTab => KeyAction::NextPreset,
        KeyCode::Backspace => KeyAction::Session(SessionEvent::Backspace),
        KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            KeyAction::None
        }
        KeyCode::Char(ch) => KeyAction::Session(SessionEvent::Type(ch)),
        _ => KeyAction::None,
    }
}

fn render(session: &TypingSession, last_report: Option<&TestReport>) -> Result<()> {
    let line = match (session.phase(), last_report) {
        (Phase::Terminal, Some(report)) => format!(
            "done: {} wpm, {}% accuracy, {} chars, {} mistakes in {}  [tab] again  [shift+tab] next length  [esc] quit",
            report.wpm,
            report.accuracy,
            report.total_chars,
            report.incorrect_chars,
            format_time(report.time_elapsed),
        ),
        _ => {
            let live = session.live_report();
            let upcoming: Vec<&str> = session
                .words()
                .iter()
                .skip(session.active_index() + 1)
                .take(WORDS_SHOWN)
                .map(|w| w.text.as_str())
                .collect();
            format!(
                "{} | {} wpm {}% | [{}] {} | {}",
                format_time(session.clock().remaining_secs()),
                live.wpm,
                live.accuracy,
                session.active_word().text,
                upcoming.join(" "),
                session.input(),
            )
        }
    };

    let mut stdout = io::stdout();
    queue!(
        stdout,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(line)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Holds submissions until the terminal leaves raw mode, then prints them.
#[derive(Default)]
struct PendingStdout {
    pending: Vec<ResultSubmission>,
}

impl ResultSink for PendingStdout {
    fn submit(&mut self, submission: &ResultSubmission) -> Result<()> {
        self.pending.push(submission.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let mut out = JsonLinesSink::new(io::stdout());
        for submission in self.pending.drain(..) {
            out.submit(&submission)?;
        }
        Ok(())
    }
}
