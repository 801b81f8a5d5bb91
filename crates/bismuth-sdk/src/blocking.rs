//! Blocking wrappers around the async API.
//!
//! Each handle drives the async implementation on a current-thread runtime
//! shared with the client it came from. Do not call these from inside an
//! async runtime; use the types at the crate root there instead.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::git::GitTransport;
use crate::types::*;

fn new_runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Blocking counterpart of [`crate::Client`].
#[derive(Debug, Clone)]
pub struct Client {
    inner: crate::Client,
    runtime: Arc<Runtime>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            inner: crate::Client::new(config)?,
            runtime: Arc::new(new_runtime()?),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn GitTransport>) -> Result<Self> {
        Ok(Self {
            inner: crate::Client::with_transport(config, transport)?,
            runtime: Arc::new(new_runtime()?),
        })
    }

    pub fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.runtime.block_on(self.inner.list_organizations())
    }

    pub fn organization(&self) -> Result<Organization> {
        self.runtime
            .block_on(self.inner.organization())
            .map(Organization::clone)
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let projects = self.runtime.block_on(self.inner.list_projects())?;
        Ok(projects.into_iter().map(|p| self.wrap(p)).collect())
    }

    pub fn get_project(&self, project: impl Into<ProjectRef>) -> Result<Project> {
        let project = self.runtime.block_on(self.inner.get_project(project))?;
        Ok(self.wrap(project))
    }

    /// See [`crate::Client::load_project`].
    pub fn load_project(&self, repo: &Path, create: bool) -> Result<Project> {
        let project = self.runtime.block_on(self.inner.load_project(repo, create))?;
        Ok(self.wrap(project))
    }

    fn wrap(&self, inner: crate::Project) -> Project {
        Project {
            inner,
            runtime: self.runtime.clone(),
        }
    }
}

/// Blocking counterpart of [`crate::Project`].
#[derive(Debug, Clone)]
pub struct Project {
    inner: crate::Project,
    runtime: Arc<Runtime>,
}

impl Project {
    /// The underlying project record.
    pub fn project(&self) -> &crate::Project {
        &self.inner
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn branches(&self) -> Vec<Branch> {
        self.inner
            .branches
            .iter()
            .map(|b| self.wrap(b.clone()))
            .collect()
    }

    pub fn get_branch(&self, name: &str) -> Result<Branch> {
        let branch = self.inner.get_branch(name)?.clone();
        Ok(self.wrap(branch))
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.refresh())
    }

    pub fn synchronize_git_local(&mut self, repo: &Path) -> Result<()> {
        self.runtime.block_on(self.inner.synchronize_git_local(repo))
    }

    pub fn synchronize_git_remote(&mut self, git_url: &str) -> Result<()> {
        self.runtime.block_on(self.inner.synchronize_git_remote(git_url))
    }

    pub fn delete(&self) -> Result<()> {
        self.runtime.block_on(self.inner.delete())
    }

    fn wrap(&self, inner: crate::Branch) -> Branch {
        Branch {
            inner,
            runtime: self.runtime.clone(),
        }
    }
}

/// Blocking counterpart of [`crate::Branch`].
#[derive(Debug, Clone)]
pub struct Branch {
    inner: crate::Branch,
    runtime: Arc<Runtime>,
}

impl Branch {
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn search(&self, query: &str, top: u32) -> Result<Vec<SearchResult>> {
        self.runtime.block_on(self.inner.search(query, top))
    }

    pub fn start_generate(&self, message: &str, options: &GenerateOptions) -> Result<AsyncResponse> {
        self.runtime
            .block_on(self.inner.start_generate(message, options))
    }

    pub fn generate(&self, message: &str, options: &GenerateOptions) -> Result<GenerateResult> {
        self.runtime.block_on(self.inner.generate(message, options))
    }

    pub fn summarize_changes(&self, diff: &str) -> Result<String> {
        self.runtime.block_on(self.inner.summarize_changes(diff))
    }

    pub fn start_review_changes(
        &self,
        message: &str,
        changed_files: &BTreeMap<String, String>,
    ) -> Result<AsyncResponse> {
        self.runtime
            .block_on(self.inner.start_review_changes(message, changed_files))
    }

    pub fn review_changes(
        &self,
        message: &str,
        changed_files: &BTreeMap<String, String>,
    ) -> Result<ReviewResult> {
        self.runtime
            .block_on(self.inner.review_changes(message, changed_files))
    }

    pub fn start_scan(&self, max_subsystems: u32) -> Result<AsyncResponse> {
        self.runtime.block_on(self.inner.start_scan(max_subsystems))
    }

    pub fn scan(&self, max_subsystems: u32) -> Result<ScanResult> {
        self.runtime.block_on(self.inner.scan(max_subsystems))
    }

    /// See [`crate::Branch::poll`].
    pub fn poll<T: DeserializeOwned>(&self, pending: &AsyncResponse) -> Result<T> {
        self.runtime.block_on(self.inner.poll(pending))
    }
}

/// Blocking counterpart of [`crate::apply_diff`].
pub fn apply_diff(repo: &Path, diff: &str) -> bool {
    match new_runtime() {
        Ok(runtime) => runtime.block_on(crate::apply_diff(repo, diff)),
        Err(_) => false,
    }
}
