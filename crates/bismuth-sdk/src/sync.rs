use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::git::{self, REMOTE_NAME};
use crate::project::Project;

impl Project {
    /// Make the repository stored by Bismuth match the local working tree at
    /// `repo`.
    ///
    /// Points the `bismuth` remote at this project (adding it, or overwriting
    /// whatever URL it had), force-pushes the current branch and reloads the
    /// project so branches created by the push show up.
    pub async fn synchronize_git_local(&mut self, repo: &Path) -> Result<()> {
        self.ensure_manually_synced()?;
        git::ensure_repository(repo)?;

        let url = git::push_url(self.client().base_url(), &self.hash, &self.clone_token)?;
        match git::remote_url(repo, REMOTE_NAME)? {
            None => {
                git::add_remote(repo, REMOTE_NAME, &url).await?;
                info!(project = self.id, "created bismuth remote");
            }
            Some(_) => {
                git::set_remote_url(repo, REMOTE_NAME, &url).await?;
                debug!(project = self.id, "updated bismuth remote");
            }
        }

        let branch = git::current_branch(repo).await?;
        info!(project = self.id, %branch, "pushing to bismuth remote");
        self.client()
            .transport()
            .push(repo, REMOTE_NAME, &branch, true)
            .await?;

        self.refresh().await
    }

    /// Make the repository stored by Bismuth match the git repository at
    /// `git_url`.
    ///
    /// The repository is cloned into a scratch directory that is removed
    /// again however the synchronization ends.
    pub async fn synchronize_git_remote(&mut self, git_url: &str) -> Result<()> {
        self.ensure_manually_synced()?;

        let scratch = tempfile::Builder::new().prefix("bismuth-sync-").tempdir()?;
        info!(project = self.id, "cloning remote");
        self.client()
            .transport()
            .clone_repo(git_url, scratch.path())
            .await?;
        self.synchronize_git_local(scratch.path()).await
    }

    fn ensure_manually_synced(&self) -> Result<()> {
        if self.is_externally_linked() {
            return Err(Error::ExternallyLinked(self.name.clone()));
        }
        Ok(())
    }
}
