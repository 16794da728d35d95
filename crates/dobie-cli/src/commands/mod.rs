//! CLI command implementations

mod actions;
mod config;

use anyhow::{anyhow, Result};
use dobie_client::{OrchestratorClient, RunStatus};
use dobie_core::{Msg, NoticeLevel, PageState, RunController};

pub use actions::*;
pub use config::*;

/// Mount the page and report what the status load raised.
///
/// A failed status load is only a warning here: actions still go ahead,
/// exactly as the page stays usable after a failed load.
async fn prepare<C>(controller: &mut RunController<C>)
where
    C: OrchestratorClient + ?Sized,
{
    controller.dispatch(Msg::Mount).await;
    for notice in controller.state_mut().notices.drain(..) {
        match notice.level {
            NoticeLevel::Error => eprintln!("Warning: {}", notice.message),
            _ => println!("{}", notice.message),
        }
    }
}

/// Print and drop pending notices. The first error notice becomes the
/// command's error so the process exits non-zero.
fn flush_notices<C>(controller: &mut RunController<C>) -> Result<()>
where
    C: OrchestratorClient + ?Sized,
{
    let mut failure = None;
    for notice in controller.state_mut().notices.drain(..) {
        match notice.level {
            NoticeLevel::Error => {
                if failure.is_none() {
                    failure = Some(notice.message);
                } else {
                    eprintln!("{}", notice.message);
                }
            }
            _ => println!("{}", notice.message),
        }
    }
    match failure {
        Some(message) => Err(anyhow!(message)),
        None => Ok(()),
    }
}

/// `name (id)` of the page's project
pub fn project_label(state: &PageState) -> String {
    format!("{} ({})", state.project.name, state.project.id)
}

/// One-line run state, e.g. `shop (p1): Running`
pub fn status_line(state: &PageState) -> String {
    let status = match &state.run_status {
        RunStatus::Running => "Running".to_string(),
        RunStatus::NotRunning => "Not running".to_string(),
        RunStatus::Other(value) => value.clone(),
    };
    format!("{}: {}", project_label(state), status)
}
