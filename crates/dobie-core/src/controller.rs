//! Project run controller
//!
//! [`PageState::update`] is the only place page state changes. It takes a
//! [`Msg`] (a user intent or a service response), applies the transition and
//! returns the [`Effect`]s to perform. Effects are executed by
//! [`run_effect`], which turns each client call into the response message.
//!
//! Mutating actions (build, start, stop, delete) are serialized: while one is
//! in flight every other mutating request is turned away with a notice.

use crate::state::{
    ActionKind, ConfirmAction, FileContent, Navigation, Notice, NoticeLevel, PageState, Phase,
};
use dobie_client::{
    BuildOutcome, ErrorKind, FileKind, OrchestratorClient, ProjectId, ProjectStatus,
    Result as ClientResult, RunStatus,
};
use dobie_config::BuildFailurePolicy;
use std::collections::VecDeque;
use std::sync::Arc;

/// Inputs to the run page
#[derive(Debug)]
pub enum Msg {
    /// Page opened or reloaded
    Mount,
    StatusLoaded(ClientResult<ProjectStatus>),
    Build,
    BuildFinished(ClientResult<BuildOutcome>),
    Start,
    StartFinished(ClientResult<()>),
    Stop,
    StopFinished(ClientResult<()>),
    /// First step of deleting: ask the user
    RequestDelete,
    ConfirmAccepted,
    ConfirmCancelled,
    DeleteFinished(ClientResult<()>),
    ViewFile(FileKind),
    FileLoaded(FileKind, ClientResult<String>),
    CloseModal,
    DismissNotice,
}

/// Work requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FetchStatus,
    Build,
    Start,
    Stop,
    Delete,
    FetchFile(FileKind),
    /// Handled by the front end, not by [`run_effect`]
    Navigate(Navigation),
}

impl PageState {
    /// Apply one message and return the effects it requires
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Mount => self.mount(),
            Msg::StatusLoaded(result) => {
                self.status_loaded(result);
                Vec::new()
            }

            Msg::Build => self.begin(ActionKind::Build, Effect::Build),
            Msg::BuildFinished(result) => {
                self.build_finished(result);
                Vec::new()
            }

            Msg::Start => self.begin(ActionKind::Run, Effect::Start),
            Msg::StartFinished(result) => self.start_finished(result),

            Msg::Stop => {
                if self.refuse_action() {
                    return Vec::new();
                }
                if !self.run_status.is_running() {
                    self.notify(Notice::toast(
                        NoticeLevel::Error,
                        "This project is already stopped.",
                    ));
                    return Vec::new();
                }
                self.begin(ActionKind::Stop, Effect::Stop)
            }
            Msg::StopFinished(result) => {
                self.stop_finished(result);
                Vec::new()
            }

            Msg::RequestDelete => {
                if !self.refuse_action() {
                    self.pending_confirmation = Some(ConfirmAction::Delete);
                }
                Vec::new()
            }
            Msg::ConfirmCancelled => {
                if let Some(action) = self.pending_confirmation.take() {
                    tracing::debug!("{} cancelled by user", action.title());
                }
                Vec::new()
            }
            Msg::ConfirmAccepted => match self.pending_confirmation.take() {
                Some(ConfirmAction::Delete) => {
                    if self.refuse_action() {
                        return Vec::new();
                    }
                    self.in_flight = Some(ActionKind::Delete);
                    vec![Effect::Delete]
                }
                None => Vec::new(),
            },
            Msg::DeleteFinished(result) => self.delete_finished(result),

            Msg::ViewFile(kind) => {
                if self.phase == Phase::Loading {
                    return Vec::new();
                }
                vec![Effect::FetchFile(kind)]
            }
            Msg::FileLoaded(kind, result) => {
                self.file_loaded(kind, result);
                Vec::new()
            }
            Msg::CloseModal => {
                self.modal = None;
                Vec::new()
            }
            Msg::DismissNotice => {
                self.dismiss_notice();
                Vec::new()
            }
        }
    }

    fn mount(&mut self) -> Vec<Effect> {
        tracing::debug!("Loading run status for project {}", self.project.id);
        self.phase = Phase::Loading;
        self.progress = None;
        self.modal = None;
        self.pending_confirmation = None;
        vec![Effect::FetchStatus]
    }

    fn status_loaded(&mut self, result: ClientResult<ProjectStatus>) {
        self.phase = Phase::Ready;
        match result {
            Ok(status) => {
                tracing::info!(
                    "Project {} run status: {}",
                    self.project.id,
                    status.all_running
                );
                self.run_status = status.all_running;
                self.status_details = status.details;
            }
            Err(e) => {
                tracing::error!("Failed to load run status for {}: {}", self.project.id, e);
                self.run_status = RunStatus::NotRunning;
                self.status_details.clear();
                let message = match e.kind() {
                    ErrorKind::Application => {
                        "Could not load the project's run status.".to_string()
                    }
                    _ => format!("Could not reach the orchestration service: {}", e),
                };
                self.notify(Notice::toast(NoticeLevel::Error, message));
            }
        }
    }

    /// Reject a mutating request while the page is loading or another action
    /// is outstanding. Returns true when the request was refused.
    fn refuse_action(&mut self) -> bool {
        if self.phase == Phase::Loading {
            tracing::debug!("Ignoring action while the page is loading");
            return true;
        }
        if let Some(busy) = self.in_flight {
            self.notify(Notice::toast(
                NoticeLevel::Info,
                format!("Please wait, the {} action is still in progress.", busy),
            ));
            return true;
        }
        false
    }

    fn begin(&mut self, action: ActionKind, effect: Effect) -> Vec<Effect> {
        if self.refuse_action() {
            return Vec::new();
        }
        tracing::info!("{} requested for project {}", action, self.project.id);
        self.in_flight = Some(action);
        self.progress = Some(action);
        vec![effect]
    }

    fn finish(&mut self) {
        self.in_flight = None;
        self.progress = None;
    }

    fn build_finished(&mut self, result: ClientResult<BuildOutcome>) {
        match result {
            Ok(outcome) => {
                self.finish();
                tracing::info!(
                    "Build finished for {}{}",
                    self.project.id,
                    outcome
                        .message()
                        .map(|m| format!(": {}", m))
                        .unwrap_or_default()
                );
                self.notify(Notice::toast(
                    NoticeLevel::Success,
                    "Build files were generated successfully.",
                ));
            }
            Err(e) => {
                tracing::error!("Build failed for {}: {}", self.project.id, e);
                self.in_flight = None;
                match self.build_failure {
                    BuildFailurePolicy::Notify => {
                        self.progress = None;
                        self.notify(Notice::toast(
                            NoticeLevel::Error,
                            format!("Build failed: {}", e),
                        ));
                    }
                    // progress indicator intentionally left up
                    BuildFailurePolicy::Silent => {}
                }
            }
        }
    }

    fn start_finished(&mut self, result: ClientResult<()>) -> Vec<Effect> {
        self.finish();
        match result {
            Ok(()) => {
                tracing::info!("Project {} started", self.project.id);
                self.run_status = RunStatus::Running;
                self.navigate(Navigation::ManageView)
            }
            Err(e) => {
                tracing::error!("Failed to start {}: {}", self.project.id, e);
                self.notify(Notice::toast(
                    NoticeLevel::Error,
                    "The project has to be built before it can be started.",
                ));
                Vec::new()
            }
        }
    }

    fn stop_finished(&mut self, result: ClientResult<()>) {
        self.finish();
        match result {
            Ok(()) => {
                tracing::info!("Project {} stopped", self.project.id);
                self.run_status = RunStatus::NotRunning;
                self.notify(Notice::toast(
                    NoticeLevel::Success,
                    "The project was stopped successfully.",
                ));
            }
            Err(e) => {
                tracing::error!("Failed to stop {}: {}", self.project.id, e);
                self.notify(Notice::toast(
                    NoticeLevel::Error,
                    format!("Failed to stop the project: {}", e),
                ));
            }
        }
    }

    fn delete_finished(&mut self, result: ClientResult<()>) -> Vec<Effect> {
        self.finish();
        match result {
            Ok(()) => {
                tracing::info!("Project {} deleted", self.project.id);
                self.notify(Notice::dialog(
                    NoticeLevel::Success,
                    "The project was deleted successfully.",
                ));
                self.navigate(Navigation::ProjectList)
            }
            Err(e) => {
                tracing::error!("Failed to delete {}: {}", self.project.id, e);
                let message = match e.kind() {
                    ErrorKind::Application => "The project could not be deleted.",
                    _ => "A problem occurred while deleting the project.",
                };
                self.notify(Notice::dialog(NoticeLevel::Error, message));
                Vec::new()
            }
        }
    }

    fn file_loaded(&mut self, kind: FileKind, result: ClientResult<String>) {
        match result {
            Ok(content) => {
                tracing::debug!("Loaded {} ({} bytes)", kind.file_name(), content.len());
                self.modal = Some(FileContent { kind, content });
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", kind.file_name(), e);
                self.notify(Notice::toast(
                    NoticeLevel::Error,
                    format!("Could not load {}.", kind.file_name()),
                ));
            }
        }
    }

    fn navigate(&mut self, to: Navigation) -> Vec<Effect> {
        self.navigations.push(to);
        vec![Effect::Navigate(to)]
    }
}

/// Perform one effect against the orchestration service.
///
/// Returns the message carrying the response, or `None` for effects the
/// front end handles itself.
pub async fn run_effect<C>(client: &C, project: &ProjectId, effect: Effect) -> Option<Msg>
where
    C: OrchestratorClient + ?Sized,
{
    tracing::debug!("Running {:?} for project {}", effect, project);
    let msg = match effect {
        Effect::FetchStatus => Msg::StatusLoaded(client.fetch_run_status(project).await),
        Effect::Build => Msg::BuildFinished(client.build(project).await),
        Effect::Start => Msg::StartFinished(client.start(project).await),
        Effect::Stop => Msg::StopFinished(client.stop(project).await),
        Effect::Delete => Msg::DeleteFinished(client.delete_project(project).await),
        Effect::FetchFile(kind) => Msg::FileLoaded(kind, client.fetch_file(project, kind).await),
        Effect::Navigate(_) => return None,
    };
    Some(msg)
}

/// Drives a [`PageState`] against a client, one message at a time.
///
/// `dispatch` runs every effect to completion before returning, which is what
/// one-shot commands want. Interactive front ends call [`PageState::update`]
/// directly and spawn [`run_effect`] instead.
pub struct RunController<C: ?Sized> {
    client: Arc<C>,
    state: PageState,
}

impl<C> RunController<C>
where
    C: OrchestratorClient + ?Sized,
{
    pub fn new(client: Arc<C>, state: PageState) -> Self {
        Self { client, state }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PageState {
        &mut self.state
    }

    pub fn client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }

    /// Apply `msg` and every response it leads to. Returns the navigations
    /// requested along the way.
    pub async fn dispatch(&mut self, msg: Msg) -> Vec<Navigation> {
        let mut queue = VecDeque::from([msg]);
        let mut navigations = Vec::new();

        while let Some(msg) = queue.pop_front() {
            for effect in self.state.update(msg) {
                if let Effect::Navigate(to) = effect {
                    navigations.push(to);
                    continue;
                }
                let project = self.state.project.id.clone();
                if let Some(reply) = run_effect(&*self.client, &project, effect).await {
                    queue.push_back(reply);
                }
            }
        }

        navigations
    }
}
