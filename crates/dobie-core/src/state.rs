//! Run page state
//!
//! Everything the page renders lives in one [`PageState`]. It is only
//! mutated through [`PageState::update`](crate::PageState::update).

use chrono::{DateTime, Utc};
use dobie_client::{FileKind, Project, RunStatus};
use dobie_config::BuildFailurePolicy;
use std::collections::{BTreeMap, VecDeque};

/// Page lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first run status
    Loading,
    Ready,
}

/// Actions that mutate the project on the orchestration service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Build,
    Run,
    Stop,
    Delete,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Build => "build",
            ActionKind::Run => "run",
            ActionKind::Stop => "stop",
            ActionKind::Delete => "delete",
        }
    }

    /// Text for the progress indicator
    pub fn progress_message(&self) -> &'static str {
        match self {
            ActionKind::Build => "Building project...",
            ActionKind::Run => "Starting containers...",
            ActionKind::Stop => "Stopping containers...",
            ActionKind::Delete => "Deleting project...",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// How a notice is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    /// Non-blocking, disappears on its own
    Toast,
    /// Stays until acknowledged
    Dialog,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub style: NoticeStyle,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn toast(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            style: NoticeStyle::Toast,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn dialog(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            style: NoticeStyle::Dialog,
            ..Self::toast(level, message)
        }
    }
}

/// Places the page can send the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Full reload of the management view for the same project
    ManageView,
    /// The project list; the page is done with this project
    ProjectList,
}

/// Actions that need an explicit yes before they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete,
}

impl ConfirmAction {
    pub fn title(&self) -> &'static str {
        match self {
            ConfirmAction::Delete => "Delete project",
        }
    }

    pub fn warning(&self) -> &'static str {
        match self {
            ConfirmAction::Delete => "This cannot be undone!",
        }
    }
}

/// Generated file shown in the content modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub kind: FileKind,
    pub content: String,
}

/// State of the run page for one project
#[derive(Debug, Clone)]
pub struct PageState {
    pub project: Project,
    pub phase: Phase,
    pub run_status: RunStatus,
    /// Extra fields of the last status payload
    pub status_details: BTreeMap<String, serde_json::Value>,
    /// Blocking progress indicator and the action it belongs to
    pub progress: Option<ActionKind>,
    /// Mutating action awaiting its response
    pub in_flight: Option<ActionKind>,
    pub modal: Option<FileContent>,
    pub pending_confirmation: Option<ConfirmAction>,
    /// Oldest first
    pub notices: VecDeque<Notice>,
    /// Navigations requested since the page was created
    pub navigations: Vec<Navigation>,
    pub build_failure: BuildFailurePolicy,
}

impl PageState {
    pub fn new(project: Project, build_failure: BuildFailurePolicy) -> Self {
        Self {
            project,
            phase: Phase::Loading,
            run_status: RunStatus::NotRunning,
            status_details: BTreeMap::new(),
            progress: None,
            in_flight: None,
            modal: None,
            pending_confirmation: None,
            notices: VecDeque::new(),
            navigations: Vec::new(),
            build_failure,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.back()
    }

    /// Oldest dialog waiting for acknowledgement, wherever it sits in the queue
    pub fn blocking_dialog(&self) -> Option<&Notice> {
        self.notices.iter().find(|n| n.style == NoticeStyle::Dialog)
    }

    /// Acknowledge the blocking dialog if there is one, otherwise the oldest toast
    pub(crate) fn dismiss_notice(&mut self) {
        let index = self
            .notices
            .iter()
            .position(|n| n.style == NoticeStyle::Dialog)
            .unwrap_or(0);
        self.notices.remove(index);
    }

    /// Drop toasts older than `max_age`; dialogs stay until dismissed
    pub fn expire_toasts(&mut self, now: DateTime<Utc>, max_age: chrono::Duration) {
        self.notices
            .retain(|n| n.style == NoticeStyle::Dialog || now - n.raised_at < max_age);
    }

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dobie_client::ProjectId;

    fn state() -> PageState {
        PageState::new(
            Project::new(ProjectId::new("p1"), "shop"),
            BuildFailurePolicy::Notify,
        )
    }

    #[test]
    fn test_new_state_is_loading() {
        let state = state();
        assert!(state.is_loading());
        assert!(!state.is_busy());
        assert_eq!(state.run_status, RunStatus::NotRunning);
        assert!(state.latest_notice().is_none());
    }

    #[test]
    fn test_expire_toasts_keeps_dialogs() {
        let mut state = state();
        let old = Utc::now() - chrono::Duration::seconds(30);
        state.notify(Notice {
            raised_at: old,
            ..Notice::toast(NoticeLevel::Info, "old toast")
        });
        state.notify(Notice {
            raised_at: old,
            ..Notice::dialog(NoticeLevel::Success, "old dialog")
        });
        state.notify(Notice::toast(NoticeLevel::Error, "fresh toast"));

        state.expire_toasts(Utc::now(), chrono::Duration::seconds(5));

        let left: Vec<_> = state.notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(left, vec!["old dialog", "fresh toast"]);
    }

    #[test]
    fn test_blocking_dialog_behind_toast() {
        let mut state = state();
        state.notify(Notice::toast(NoticeLevel::Error, "toast"));
        assert!(state.blocking_dialog().is_none());

        state.notify(Notice::dialog(NoticeLevel::Error, "dialog"));
        assert_eq!(state.blocking_dialog().unwrap().message, "dialog");

        state.dismiss_notice();
        assert!(state.blocking_dialog().is_none());
        assert_eq!(state.notices.len(), 1);
        assert_eq!(state.notices[0].message, "toast");

        state.dismiss_notice();
        assert!(state.notices.is_empty());
        state.dismiss_notice();
    }
}
