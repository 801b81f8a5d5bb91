use std::path::PathBuf;

use anyhow::{Context, Result};
use bismuth_sdk::blocking::{Branch, Client, Project};
use tracing::debug;

use crate::config::Config;
use crate::util;
use crate::GlobalArgs;

/// A connected client together with the repository the command works on.
pub struct Session {
    pub client: Client,
    pub repo: PathBuf,
}

impl Session {
    /// Resolve the repository first so a bad path fails before any network
    /// access or credential lookup.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let repo = util::repo_root(&global.repo)?;
        debug!(repo = %repo.display(), "using repository");
        let client = Self::client(global)?;
        Ok(Self { client, repo })
    }

    /// Client only, for commands that do not touch a repository.
    pub fn client(global: &GlobalArgs) -> Result<Client> {
        let config = Config::load()?.client_config(global.overrides())?;
        Client::new(config).context("failed to create API client")
    }

    pub fn project(&self, create: bool) -> Result<Project> {
        self.client
            .load_project(&self.repo, create)
            .with_context(|| format!("failed to load project for {}", self.repo.display()))
    }

    /// `name`, or the branch checked out in the repository.
    pub fn branch(&self, name: Option<&str>) -> Result<Branch> {
        let name = match name {
            Some(name) => name.to_string(),
            None => util::current_branch(&self.repo)?,
        };
        let project = self.project(false)?;
        project.get_branch(&name).with_context(|| {
            format!("branch '{name}' is not synced; run `bismuth sync` first")
        })
    }
}
