use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

use typepace::generator::cache::CachedWordSource;
use typepace::generator::{WordPool, WordSource};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    WordsLoaded { epoch: u64, words: WordPool },
}

/// Single queue feeding the session. Keys, ticks and word deliveries come
/// from separate threads but are applied one at a time by the consumer.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        let key_tx = tx.clone();
        thread::spawn(move || {
            loop {
                match event::read() {
                    Ok(Event::Key(key)) => {
                        if key_tx.send(AppEvent::Key(key)).is_err() {
                            return;
                        }
                    }
                    Ok(_) => {}
                    Err(_) => return,
                }
            }
        });

        let tick_tx = tx.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(tick_rate);
                if tick_tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    /// Resolve the word list off the event loop and deliver it tagged with `epoch`.
    pub fn load_words<S>(&self, source: Arc<CachedWordSource<S>>, epoch: u64)
    where
        S: WordSource + 'static,
    {
        let tx = self.tx.clone();
        thread::spawn(move || {
            let words = source.words();
            let _ = tx.send(AppEvent::WordsLoaded { epoch, words });
        });
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
