//! Run page actions: status, build, start, stop, delete and file views

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use dobie_client::{FileKind, OrchestratorClient};
use dobie_core::{ConfirmAction, Msg, Navigation, NoticeStyle, PageState, RunController};
use std::sync::Arc;

use super::{flush_notices, prepare, project_label, status_line};

/// Show the project's run status and any extra fields the service reports
pub async fn status<C>(controller: &mut RunController<C>) -> Result<()>
where
    C: OrchestratorClient + ?Sized,
{
    controller.dispatch(Msg::Mount).await;
    flush_notices(controller)?;

    let state = controller.state();
    println!("{}", status_line(state));
    for (key, value) in &state.status_details {
        match value {
            serde_json::Value::String(s) => println!("  {}: {}", key, s),
            other => println!("  {}: {}", key, other),
        }
    }
    Ok(())
}

/// Generate the project's build files
pub async fn build<C>(controller: &mut RunController<C>) -> Result<()>
where
    C: OrchestratorClient + ?Sized,
{
    prepare(controller).await;
    controller.dispatch(Msg::Build).await;
    flush_notices(controller)?;

    // Under the silent policy a failed build leaves the indicator up and
    // raises nothing; a one-shot command still has to fail
    if controller.state().progress.is_some() {
        bail!("Build did not complete");
    }
    Ok(())
}

/// Start the project's containers, then show the reloaded status
pub async fn start<C>(controller: &mut RunController<C>) -> Result<()>
where
    C: OrchestratorClient + ?Sized,
{
    prepare(controller).await;
    let navigations = controller.dispatch(Msg::Start).await;
    flush_notices(controller)?;

    if navigations.contains(&Navigation::ManageView) {
        controller.dispatch(Msg::Mount).await;
        flush_notices(controller)?;
        println!("{}", status_line(controller.state()));
    }
    Ok(())
}

/// Stop the project's containers
pub async fn stop<C>(controller: &mut RunController<C>) -> Result<()>
where
    C: OrchestratorClient + ?Sized,
{
    prepare(controller).await;
    controller.dispatch(Msg::Stop).await;
    flush_notices(controller)
}

/// Delete the project after confirmation (`yes` skips the prompt)
pub async fn delete<C>(controller: &mut RunController<C>, yes: bool) -> Result<()>
where
    C: OrchestratorClient + ?Sized,
{
    prepare(controller).await;
    controller.dispatch(Msg::RequestDelete).await;
    flush_notices(controller)?;

    let Some(action) = controller.state().pending_confirmation else {
        return Ok(());
    };

    // References resolve by prefix, so always say which project is going
    println!("Deleting {}", project_label(controller.state()));
    let confirmed = yes || confirm(action, controller.state())?;
    if !confirmed {
        controller.dispatch(Msg::ConfirmCancelled).await;
        println!("Cancelled.");
        return Ok(());
    }

    controller.dispatch(Msg::ConfirmAccepted).await;
    flush_notices(controller)
}

fn confirm(action: ConfirmAction, state: &PageState) -> Result<bool> {
    let prompt = format!(
        "{} {}? {}",
        action.title(),
        project_label(state),
        action.warning()
    );
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Print the generated configuration file exactly as the service returns it
pub async fn view_file<C>(controller: &mut RunController<C>, kind: FileKind) -> Result<()>
where
    C: OrchestratorClient + ?Sized,
{
    prepare(controller).await;
    controller.dispatch(Msg::ViewFile(kind)).await;
    flush_notices(controller)?;

    if let Some(file) = controller.state_mut().modal.take() {
        print!("{}", file.content);
        if !file.content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

/// Open the interactive run page
pub async fn tui(client: Arc<dyn OrchestratorClient>, state: PageState) -> Result<()> {
    let (_, state) = dobie_tui::run(client, state).await?;

    // Dialogs raised on the way out (e.g. after a delete) were never seen
    let mut failed = false;
    for notice in state.notices.iter().filter(|n| n.style == NoticeStyle::Dialog) {
        match notice.level {
            dobie_core::NoticeLevel::Error => {
                failed = true;
                eprintln!("{}", notice.message);
            }
            _ => println!("{}", notice.message),
        }
    }
    if failed {
        bail!("The run page closed with an error");
    }
    Ok(())
}
