//! Run page application state and key handling

use crate::event::{Event, EventHandler};
use crate::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dobie_client::{FileKind, OrchestratorClient};
use dobie_core::{run_effect, Effect, Msg, Navigation, PageState};
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::instrument::WithSubscriber;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// How long a toast stays on screen
pub const TOAST_TTL: Duration = Duration::from_secs(5);

/// Which button of the confirmation dialog has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogFocus {
    Confirm,
    Cancel,
}

/// Why the page closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageExit {
    /// User quit
    Quit,
    /// Navigated to the project list (after a delete)
    ProjectList,
}

/// Application state
pub struct App {
    pub state: PageState,
    client: Arc<dyn OrchestratorClient>,
    replies: mpsc::UnboundedSender<Event>,
    pub dialog_focus: DialogFocus,
    /// First visible line of the file modal
    pub modal_scroll: u16,
    /// Ticks seen, drives the spinner
    pub ticks: usize,
    pub exit: Option<PageExit>,
}

impl App {
    /// Create the app; effect replies are delivered through `replies`
    pub fn new(
        client: Arc<dyn OrchestratorClient>,
        state: PageState,
        replies: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            state,
            client,
            replies,
            dialog_focus: DialogFocus::Cancel,
            modal_scroll: 0,
            ticks: 0,
            exit: None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.exit.is_some()
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventHandler,
    ) -> AppResult<PageExit> {
        self.send(Msg::Mount);

        while !self.should_quit() {
            terminal.draw(|frame| ui::draw(frame, self))?;

            match events.next().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }

        Ok(self.exit.unwrap_or(PageExit::Quit))
    }

    /// Handle an event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Reply(msg) => self.send(msg),
            Event::Tick => {
                self.ticks = self.ticks.wrapping_add(1);
                let ttl = chrono::Duration::from_std(TOAST_TTL)
                    .unwrap_or_else(|_| chrono::Duration::seconds(5));
                self.state.expire_toasts(chrono::Utc::now(), ttl);
            }
            Event::Resize(_, _) => {}
        }
    }

    /// Apply a message to the page and start whatever it asks for
    pub fn send(&mut self, msg: Msg) {
        let effects = self.state.update(msg);
        for effect in effects {
            match effect {
                Effect::Navigate(Navigation::ManageView) => {
                    // full reload of the management view
                    self.modal_scroll = 0;
                    self.send(Msg::Mount);
                }
                Effect::Navigate(Navigation::ProjectList) => {
                    self.exit = Some(PageExit::ProjectList);
                }
                effect => self.spawn(effect),
            }
        }
    }

    fn spawn(&self, effect: Effect) {
        let client = Arc::clone(&self.client);
        let project = self.state.project.id.clone();
        let replies = self.replies.clone();
        // Worker threads only see the global subscriber; carry the page's
        // (silent) one along so nothing is written over the alternate screen
        let task = async move {
            if let Some(msg) = run_effect(&*client, &project, effect).await {
                // receiver gone means the page already closed
                let _ = replies.send(Event::Reply(msg));
            }
        };
        tokio::spawn(task.with_current_subscriber());
    }

    /// Handle a key press. Overlays take keys in stacking order: notice
    /// dialog, confirmation, file modal, progress indicator, page.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let code = key.code;
        if code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.exit = Some(PageExit::Quit);
            return;
        }

        if self.blocking_notice() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.send(Msg::DismissNotice);
            }
            return;
        }

        if self.state.pending_confirmation.is_some() {
            self.handle_confirm_key(code);
            return;
        }

        if self.state.modal.is_some() {
            match code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.modal_scroll = 0;
                    self.send(Msg::CloseModal);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.modal_scroll = self.modal_scroll.saturating_add(1);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.modal_scroll = self.modal_scroll.saturating_sub(1);
                }
                KeyCode::PageDown => self.modal_scroll = self.modal_scroll.saturating_add(10),
                KeyCode::PageUp => self.modal_scroll = self.modal_scroll.saturating_sub(10),
                KeyCode::Char('g') => self.modal_scroll = 0,
                _ => {}
            }
            return;
        }

        // The progress indicator blocks the page; reload and quit still work
        if self.state.progress.is_some() {
            match code {
                KeyCode::Char('r') => self.send(Msg::Mount),
                KeyCode::Char('q') => self.exit = Some(PageExit::Quit),
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit = Some(PageExit::Quit),
            KeyCode::Char('b') => self.send(Msg::Build),
            KeyCode::Char('s') => self.send(Msg::Start),
            KeyCode::Char('x') => self.send(Msg::Stop),
            KeyCode::Char('d') => {
                self.dialog_focus = DialogFocus::Cancel;
                self.send(Msg::RequestDelete);
            }
            KeyCode::Char('n') => self.send(Msg::ViewFile(FileKind::Nginx)),
            KeyCode::Char('c') => self.send(Msg::ViewFile(FileKind::DockerCompose)),
            KeyCode::Char('r') => self.send(Msg::Mount),
            KeyCode::Backspace => self.send(Msg::DismissNotice),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.dialog_focus = match self.dialog_focus {
                    DialogFocus::Confirm => DialogFocus::Cancel,
                    DialogFocus::Cancel => DialogFocus::Confirm,
                };
            }
            KeyCode::Enter => match self.dialog_focus {
                DialogFocus::Confirm => self.send(Msg::ConfirmAccepted),
                DialogFocus::Cancel => self.send(Msg::ConfirmCancelled),
            },
            KeyCode::Char('y') | KeyCode::Char('Y') => self.send(Msg::ConfirmAccepted),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.send(Msg::ConfirmCancelled)
            }
            _ => {}
        }
    }

    /// Whether a dialog is waiting for acknowledgement
    pub fn blocking_notice(&self) -> bool {
        self.state.blocking_dialog().is_some()
    }
}
