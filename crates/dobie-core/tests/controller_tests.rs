//! Run controller tests against MockClient.

use dobie_client::{FileKind, ProjectStatus, RunStatus};
use dobie_config::{BuildFailurePolicy, Endpoint};
use dobie_core::test_support::{
    mounted_controller, rejected, test_state, unreachable, MockCall, MockClient,
};
use dobie_core::{
    ActionKind, ConfirmAction, Effect, Msg, Navigation, NoticeLevel, NoticeStyle, Phase,
    RunController,
};
use std::sync::Arc;

fn p1() -> String {
    "p1".to_string()
}

// ---- mount ----

#[tokio::test]
async fn test_mount_loads_running_status() {
    let mock = Arc::new(MockClient::with_status(RunStatus::Running));
    let mut controller = RunController::new(mock.clone(), test_state(BuildFailurePolicy::Notify));
    assert_eq!(controller.state().phase, Phase::Loading);

    controller.dispatch(Msg::Mount).await;

    let state = controller.state();
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.run_status, RunStatus::Running);
    assert!(state.notices.is_empty());
    assert!(mock.was_called(&MockCall::FetchRunStatus { project: p1() }));
}

#[tokio::test]
async fn test_mount_keeps_extra_status_fields() {
    let mock = MockClient::new();
    let mut status = ProjectStatus::new(RunStatus::Other("Partial".to_string()));
    status
        .details
        .insert("backend".to_string(), serde_json::json!("Exited"));
    *mock.status_result.lock().unwrap() = Ok(status);

    let controller = mounted_controller(Arc::new(mock), BuildFailurePolicy::Notify).await;
    let state = controller.state();
    assert_eq!(state.run_status, RunStatus::Other("Partial".to_string()));
    assert_eq!(state.status_details["backend"], "Exited");
}

#[tokio::test]
async fn test_mount_rejected_status_sets_sentinel_and_notifies() {
    let mock = MockClient::with_status(RunStatus::Running);
    *mock.status_result.lock().unwrap() = Err(rejected(Endpoint::RunStatus));

    let controller = mounted_controller(Arc::new(mock), BuildFailurePolicy::Notify).await;
    let state = controller.state();
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.run_status, RunStatus::NotRunning);
    assert_eq!(state.run_status.as_wire(), "null");
    let notice = state.latest_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.style, NoticeStyle::Toast);
}

#[tokio::test]
async fn test_mount_transport_failure_still_readies_page() {
    let mock = MockClient::new();
    *mock.status_result.lock().unwrap() = Err(unreachable(Endpoint::RunStatus));

    let controller = mounted_controller(Arc::new(mock), BuildFailurePolicy::Notify).await;
    let state = controller.state();
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.run_status, RunStatus::NotRunning);
    assert!(state
        .latest_notice()
        .unwrap()
        .message
        .contains("orchestration service"));
}

// ---- stop ----

#[tokio::test]
async fn test_stop_while_running() {
    let mock = Arc::new(MockClient::with_status(RunStatus::Running));
    let mut controller = mounted_controller(mock.clone(), BuildFailurePolicy::Notify).await;

    // the progress indicator goes up before the call is made
    let effects = controller.state_mut().update(Msg::Stop);
    assert_eq!(effects, vec![Effect::Stop]);
    assert_eq!(controller.state().progress, Some(ActionKind::Stop));

    controller.dispatch(Msg::StopFinished(Ok(()))).await;

    let state = controller.state();
    assert_eq!(state.progress, None);
    assert_eq!(state.run_status.as_wire(), "null");
    assert_eq!(state.latest_notice().unwrap().level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_stop_dispatch_calls_endpoint_with_project_id() {
    let mock = Arc::new(MockClient::with_status(RunStatus::Running));
    let mut controller = mounted_controller(mock.clone(), BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::Stop).await;

    assert!(mock.was_called(&MockCall::Stop { project: p1() }));
    assert_eq!(controller.state().run_status, RunStatus::NotRunning);
    assert!(!controller.state().is_busy());
}

#[tokio::test]
async fn test_stop_when_not_running_is_a_no_op() {
    for status in [RunStatus::NotRunning, RunStatus::Other("Partial".to_string())] {
        let mock = Arc::new(MockClient::with_status(status));
        let mut controller = mounted_controller(mock.clone(), BuildFailurePolicy::Notify).await;

        controller.dispatch(Msg::Stop).await;

        assert_eq!(mock.count(Endpoint::Stop), 0);
        let state = controller.state();
        assert_eq!(state.progress, None);
        let notice = state.latest_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("already stopped"));
    }
}

#[tokio::test]
async fn test_stop_failure_keeps_status() {
    let mock = MockClient::with_status(RunStatus::Running);
    *mock.stop_result.lock().unwrap() = Err(unreachable(Endpoint::Stop));
    let mut controller = mounted_controller(Arc::new(mock), BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::Stop).await;

    let state = controller.state();
    assert_eq!(state.run_status, RunStatus::Running);
    assert_eq!(state.progress, None);
    assert_eq!(state.latest_notice().unwrap().level, NoticeLevel::Error);
}

// ---- start ----

#[tokio::test]
async fn test_start_always_calls_network() {
    for status in [RunStatus::NotRunning, RunStatus::Running] {
        let mock = Arc::new(MockClient::with_status(status));
        let mut controller = mounted_controller(mock.clone(), BuildFailurePolicy::Notify).await;

        let navigations = controller.dispatch(Msg::Start).await;

        assert_eq!(mock.count(Endpoint::Start), 1);
        assert_eq!(navigations, vec![Navigation::ManageView]);
        assert_eq!(controller.state().navigations, vec![Navigation::ManageView]);
        assert_eq!(controller.state().run_status, RunStatus::Running);
        assert_eq!(controller.state().progress, None);
    }
}

#[tokio::test]
async fn test_start_failure_asks_for_build() {
    let mock = MockClient::new();
    *mock.start_result.lock().unwrap() = Err(rejected(Endpoint::Start));
    let mut controller = mounted_controller(Arc::new(mock), BuildFailurePolicy::Notify).await;

    let navigations = controller.dispatch(Msg::Start).await;

    assert!(navigations.is_empty());
    let state = controller.state();
    assert_eq!(state.progress, None);
    assert_eq!(state.run_status, RunStatus::NotRunning);
    assert!(state.latest_notice().unwrap().message.contains("built"));
}

// ---- build ----

#[tokio::test]
async fn test_build_success() {
    let mock = Arc::new(MockClient::new());
    let mut controller = mounted_controller(mock.clone(), BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::Build).await;

    assert!(mock.was_called(&MockCall::Build { project: p1() }));
    let state = controller.state();
    assert_eq!(state.progress, None);
    assert_eq!(state.latest_notice().unwrap().level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_build_failure_silent_leaves_indicator() {
    let mock = MockClient::new();
    *mock.build_result.lock().unwrap() = Err(rejected(Endpoint::Build));
    let mut controller = mounted_controller(Arc::new(mock), BuildFailurePolicy::Silent).await;

    controller.dispatch(Msg::Build).await;

    let state = controller.state();
    assert_eq!(state.progress, Some(ActionKind::Build));
    assert!(state.notices.is_empty());
    // the guard is released so the user can retry
    assert!(!state.is_busy());
}

#[tokio::test]
async fn test_build_failure_notify_surfaces_error() {
    let mock = MockClient::new();
    *mock.build_result.lock().unwrap() = Err(rejected(Endpoint::Build));
    let mut controller = mounted_controller(Arc::new(mock), BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::Build).await;

    let state = controller.state();
    assert_eq!(state.progress, None);
    let notice = state.latest_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.starts_with("Build failed"));
}

// ---- delete ----

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let mock = Arc::new(MockClient::new());
    let mut controller = mounted_controller(mock.clone(), BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::RequestDelete).await;
    assert_eq!(
        controller.state().pending_confirmation,
        Some(ConfirmAction::Delete)
    );
    assert_eq!(mock.count(Endpoint::Delete), 0);

    controller.dispatch(Msg::ConfirmCancelled).await;
    assert_eq!(controller.state().pending_confirmation, None);
    assert_eq!(mock.count(Endpoint::Delete), 0);

    // accepting with nothing pending does nothing either
    controller.dispatch(Msg::ConfirmAccepted).await;
    assert_eq!(mock.count(Endpoint::Delete), 0);
    assert!(controller.state().navigations.is_empty());
}

#[tokio::test]
async fn test_confirmed_delete_navigates_once() {
    let mock = Arc::new(MockClient::new());
    let mut controller = mounted_controller(mock.clone(), BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::RequestDelete).await;
    let navigations = controller.dispatch(Msg::ConfirmAccepted).await;

    assert_eq!(mock.count(Endpoint::Delete), 1);
    assert_eq!(navigations, vec![Navigation::ProjectList]);
    let state = controller.state();
    assert_eq!(state.navigations, vec![Navigation::ProjectList]);
    let notice = state.latest_notice().unwrap();
    assert_eq!(notice.style, NoticeStyle::Dialog);
    assert_eq!(notice.level, NoticeLevel::Success);

    // a second accept has no pending confirmation to act on
    controller.dispatch(Msg::ConfirmAccepted).await;
    assert_eq!(mock.count(Endpoint::Delete), 1);
    assert_eq!(controller.state().navigations.len(), 1);
}

#[tokio::test]
async fn test_delete_failure_stays_on_page() {
    let mock = MockClient::new();
    *mock.delete_result.lock().unwrap() = Err(rejected(Endpoint::Delete));
    let mut controller = mounted_controller(Arc::new(mock), BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::RequestDelete).await;
    let navigations = controller.dispatch(Msg::ConfirmAccepted).await;

    assert!(navigations.is_empty());
    let notice = controller.state().latest_notice().unwrap();
    assert_eq!(notice.style, NoticeStyle::Dialog);
    assert_eq!(notice.message, "The project could not be deleted.");
}

#[tokio::test]
async fn test_delete_transport_failure_message() {
    let mock = MockClient::new();
    *mock.delete_result.lock().unwrap() = Err(unreachable(Endpoint::Delete));
    let mut controller = mounted_controller(Arc::new(mock), BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::RequestDelete).await;
    controller.dispatch(Msg::ConfirmAccepted).await;

    assert!(controller
        .state()
        .latest_notice()
        .unwrap()
        .message
        .contains("problem occurred"));
}

// ---- file views ----

#[tokio::test]
async fn test_file_views_show_exact_payload() {
    let mock = MockClient::new();
    *mock.nginx_result.lock().unwrap() = Ok("upstream api { server 10.0.0.2; }".to_string());
    *mock.compose_result.lock().unwrap() = Ok("version: '3'\n".to_string());
    let mut controller = mounted_controller(Arc::new(mock), BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::ViewFile(FileKind::Nginx)).await;
    let modal = controller.state().modal.clone().unwrap();
    assert_eq!(modal.kind.tag(), "nginx");
    assert_eq!(modal.content, "upstream api { server 10.0.0.2; }");

    controller.dispatch(Msg::ViewFile(FileKind::DockerCompose)).await;
    let modal = controller.state().modal.clone().unwrap();
    assert_eq!(modal.kind.tag(), "dockerCompose");
    assert_eq!(modal.content, "version: '3'\n");

    controller.dispatch(Msg::CloseModal).await;
    assert!(controller.state().modal.is_none());
}

#[tokio::test]
async fn test_file_view_failure_notifies() {
    let mock = MockClient::new();
    *mock.compose_result.lock().unwrap() = Err(unreachable(Endpoint::DockerCompose));
    let mut controller = mounted_controller(Arc::new(mock), BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::ViewFile(FileKind::DockerCompose)).await;

    assert!(controller.state().modal.is_none());
    assert!(controller
        .state()
        .latest_notice()
        .unwrap()
        .message
        .contains("docker-compose.yml"));
}

// ---- in-flight guard ----

#[tokio::test]
async fn test_competing_actions_are_refused() {
    let mock = Arc::new(MockClient::with_status(RunStatus::Running));
    let mut controller = mounted_controller(mock.clone(), BuildFailurePolicy::Notify).await;

    // start is outstanding: its response has not arrived yet
    assert_eq!(controller.state_mut().update(Msg::Start), vec![Effect::Start]);
    assert!(controller.state_mut().update(Msg::Stop).is_empty());
    assert!(controller.state_mut().update(Msg::Build).is_empty());
    assert!(controller.state_mut().update(Msg::RequestDelete).is_empty());
    assert_eq!(controller.state().pending_confirmation, None);
    assert_eq!(
        controller.state().latest_notice().unwrap().level,
        NoticeLevel::Info
    );

    // read-only lookups still go through
    assert_eq!(
        controller.state_mut().update(Msg::ViewFile(FileKind::Nginx)),
        vec![Effect::FetchFile(FileKind::Nginx)]
    );

    controller.dispatch(Msg::StartFinished(Ok(()))).await;
    assert!(!controller.state().is_busy());
    assert_eq!(controller.state_mut().update(Msg::Stop), vec![Effect::Stop]);
}

#[tokio::test]
async fn test_actions_ignored_while_loading() {
    let mock = Arc::new(MockClient::new());
    let mut controller = RunController::new(mock.clone(), test_state(BuildFailurePolicy::Notify));

    assert!(controller.state_mut().update(Msg::Start).is_empty());
    assert!(controller.state_mut().update(Msg::Build).is_empty());
    assert!(controller.state().notices.is_empty());
    assert!(mock.get_calls().is_empty());
}

#[tokio::test]
async fn test_dismiss_notice_drops_oldest() {
    let mock = Arc::new(MockClient::new());
    let mut controller = mounted_controller(mock, BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::Stop).await; // already stopped
    controller.dispatch(Msg::Build).await; // success
    assert_eq!(controller.state().notices.len(), 2);

    controller.dispatch(Msg::DismissNotice).await;
    let notices = &controller.state().notices;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_dismiss_notice_acknowledges_dialog_behind_toast() {
    let mock = Arc::new(MockClient::new());
    *mock.delete_result.lock().unwrap() = Err(rejected(Endpoint::Delete));
    let mut controller = mounted_controller(mock, BuildFailurePolicy::Notify).await;

    controller.dispatch(Msg::Stop).await; // already stopped
    controller.dispatch(Msg::RequestDelete).await;
    controller.dispatch(Msg::ConfirmAccepted).await;

    let state = controller.state();
    assert_eq!(state.notices[0].style, NoticeStyle::Toast);
    assert_eq!(
        state.blocking_dialog().unwrap().message,
        "The project could not be deleted."
    );

    controller.dispatch(Msg::DismissNotice).await;
    let state = controller.state();
    assert!(state.blocking_dialog().is_none());
    assert_eq!(state.notices.len(), 1);
    assert_eq!(state.notices[0].message, "This project is already stopped.");
}
