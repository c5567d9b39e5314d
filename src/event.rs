use std::sync::mpsc::{self, Receiver, RecvError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
}

/// Dedicated input thread: polls the terminal and forwards key events,
/// emitting a tick whenever a poll window elapses quietly. Keystroke
/// handling on the receiving side never waits on anything slower than a
/// channel recv; all content I/O lives on the prefetch worker instead.
pub struct EventHandler {
    receiver: Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => Some(AppEvent::Key(key)),
                        Ok(Event::Resize(width, height)) => Some(AppEvent::Resize(width, height)),
                        _ => None,
                    }
                } else {
                    Some(AppEvent::Tick)
                };

                if let Some(event) = event {
                    if sender.send(event).is_err() {
                        // Receiver gone: the app is shutting down.
                        return;
                    }
                }
            }
        });

        Self { receiver }
    }

    pub fn next(&self) -> Result<AppEvent, RecvError> {
        self.receiver.recv()
    }
}
