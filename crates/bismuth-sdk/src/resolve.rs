use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::git::{self, REMOTE_NAME};
use crate::project::Project;
use crate::types::ProjectRecord;

#[derive(Serialize)]
struct CreateProject<'a> {
    name: &'a str,
}

impl Client {
    /// Find the Bismuth project linked to the working tree at `repo`.
    ///
    /// A tree is linked when its `bismuth` remote carries the clone token of
    /// a project in the active organization. Without that remote a new
    /// project is created and pushed when `create` is set, and
    /// [`Error::NoRemote`] is returned otherwise. A remote whose token matches
    /// no project is reported as [`Error::RemoteProjectNotFound`]; no
    /// duplicate project is created for it.
    ///
    /// If several projects share the token, the first one the server lists
    /// wins.
    pub async fn load_project(&self, repo: &Path, create: bool) -> Result<Project> {
        git::ensure_repository(repo)?;
        let repo = repo.canonicalize()?;

        let organization = self.organization().await?;

        let Some(remote_url) = git::remote_url(&repo, REMOTE_NAME)? else {
            if !create {
                return Err(Error::NoRemote(repo));
            }
            let name = project_name(&repo)?;
            info!(%name, "creating project");
            let record: ProjectRecord = self
                .post(
                    &format!("{}/projects", organization.api_prefix()),
                    &CreateProject { name: &name },
                )
                .await?;
            let mut project = Project::from_record(self.clone(), organization.id, record);
            project.synchronize_git_local(&repo).await?;
            return Ok(project);
        };

        let clone_token = git::clone_token(&remote_url);
        debug!("matching project by clone token");
        let record = self
            .project_records(organization)
            .await?
            .into_iter()
            .find(|p| Some(&p.clone_token) == clone_token.as_ref())
            .ok_or(Error::RemoteProjectNotFound)?;

        let mut project = Project::from_record(self.clone(), organization.id, record);
        project.refresh().await?;
        Ok(project)
    }
}

fn project_name(repo: &Path) -> Result<String> {
    repo.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Config(format!("cannot name a project after {}", repo.display())))
}
