//! Event sources for the run page
//!
//! Terminal input is polled on a blocking thread; responses from the
//! orchestration service arrive from spawned effect tasks. Both are funneled
//! into one channel so the UI task applies them in arrival order.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use dobie_core::Msg;
use std::time::Duration;
use tokio::sync::mpsc;

/// Everything the UI loop reacts to
#[derive(Debug)]
pub enum Event {
    /// Periodic tick (toast expiry, spinner)
    Tick,
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// A service response for the controller
    Reply(Msg),
}

/// Merged event stream
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Channel without a terminal reader, for driving the app in tests
    pub fn detached() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    /// Start reading the terminal, emitting a tick every `tick_rate` of idle time
    pub fn new(tick_rate: Duration) -> Self {
        let handler = Self::detached();
        let tx = handler.tx.clone();
        let dispatch = tracing::dispatcher::get_default(|current| current.clone());

        tokio::task::spawn_blocking(move || {
            tracing::dispatcher::with_default(&dispatch, || read_terminal(tick_rate, tx))
        });

        handler
    }

    /// Sender used by effect tasks to deliver replies
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Next event if one is already queued
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// Poll the terminal until the receiver goes away
fn read_terminal(tick_rate: Duration, tx: mpsc::UnboundedSender<Event>) {
    loop {
        let next = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                // Windows reports releases too; only presses drive the page
                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    Some(Event::Key(key))
                }
                Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("Terminal read failed: {}", e);
                    None
                }
            },
            Ok(false) => Some(Event::Tick),
            Err(e) => {
                tracing::warn!("Terminal poll failed: {}", e);
                break;
            }
        };
        if let Some(event) = next {
            if tx.send(event).is_err() {
                break;
            }
        }
    }
}
