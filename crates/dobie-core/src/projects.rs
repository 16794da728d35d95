//! Resolving a project reference typed by the user

use crate::{CoreError, Result};
use dobie_client::{Project, ProjectId};
use dobie_config::{GlobalConfig, ProjectEntry};

/// Find the project a reference points at.
///
/// Registered projects are matched by exact id, then exact name, then a
/// unique id or name prefix. A reference that matches nothing is taken as a
/// raw project id, since projects do not have to be registered.
pub fn resolve_project(config: &GlobalConfig, reference: &str) -> Result<Project> {
    let reference = reference.trim();
    let projects = &config.projects;

    if let Some(entry) = projects.iter().find(|p| p.id == reference) {
        return to_project(entry);
    }
    if let Some(entry) = projects.iter().find(|p| p.name == reference) {
        return to_project(entry);
    }

    let matches: Vec<&ProjectEntry> = if reference.is_empty() {
        Vec::new()
    } else {
        projects
            .iter()
            .filter(|p| p.id.starts_with(reference) || p.name.starts_with(reference))
            .collect()
    };

    match matches.len() {
        0 => {
            let id = ProjectId::parse(reference)?;
            let name = id.to_string();
            Ok(Project::new(id, name))
        }
        1 => to_project(matches[0]),
        _ => Err(CoreError::AmbiguousProject {
            query: reference.to_string(),
            matches: matches
                .iter()
                .map(|p| format!("{} ({})", p.name, p.id))
                .collect(),
        }),
    }
}

fn to_project(entry: &ProjectEntry) -> Result<Project> {
    Ok(Project::new(ProjectId::parse(&entry.id)?, entry.name.clone()))
}
