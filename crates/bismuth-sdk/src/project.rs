use tracing::debug;

use crate::branch::Branch;
use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::{BranchRecord, GitHubAppInstall, ProjectRecord};

/// A Bismuth project: one remote repository plus its branches.
///
/// Fields mirror the server record at load time. Only `branches` changes
/// afterwards, and only through [`Project::refresh`].
#[derive(Debug, Clone)]
pub struct Project {
    client: Client,
    organization_id: u64,
    pub id: u64,
    pub name: String,
    pub hash: String,
    /// Secret embedded in the `bismuth` git remote. Authenticates pushes and
    /// identifies which project a working tree is linked to.
    pub clone_token: String,
    pub github_repo: Option<String>,
    pub github_app_install: Option<GitHubAppInstall>,
    pub branches: Vec<Branch>,
}

impl Project {
    pub(crate) fn from_record(client: Client, organization_id: u64, record: ProjectRecord) -> Self {
        let mut project = Self {
            client,
            organization_id,
            id: record.id,
            name: record.name,
            hash: record.hash,
            clone_token: record.clone_token,
            github_repo: record.github_repo,
            github_app_install: record.github_app_install,
            branches: Vec::new(),
        };
        project.branches = project.branches_from(record.features);
        project
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn api_prefix(&self) -> String {
        format!("/organizations/{}/projects/{}", self.organization_id, self.id)
    }

    /// True when the project is fed by a GitHub App install rather than by
    /// pushes from a local clone.
    pub fn is_externally_linked(&self) -> bool {
        self.github_app_install.is_some()
    }

    /// Reload the branch list from the server.
    ///
    /// The list is replaced as a whole. [`Branch`] handles taken before the
    /// call keep working but are no longer part of `branches`.
    pub async fn refresh(&mut self) -> Result<()> {
        debug!(project = self.id, "refreshing project branches");
        let record: ProjectRecord = self.client.get(&self.api_prefix()).await?;
        self.branches = self.branches_from(record.features);
        Ok(())
    }

    fn branches_from(&self, records: Vec<BranchRecord>) -> Vec<Branch> {
        records
            .into_iter()
            .map(|b| Branch::new(self.client.clone(), self.api_prefix(), self.id, b.id, b.name))
            .collect()
    }

    /// First branch named `name`.
    pub fn get_branch(&self, name: &str) -> Result<&Branch> {
        self.branches
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| Error::BranchNotFound(name.to_string()))
    }

    /// Delete the project on the server.
    pub async fn delete(&self) -> Result<()> {
        self.client.delete(&self.api_prefix()).await
    }
}
