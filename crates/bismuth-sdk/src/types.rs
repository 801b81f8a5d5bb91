use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A Bismuth organization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: u64,
    pub name: String,
}

impl Organization {
    pub(crate) fn api_prefix(&self) -> String {
        format!("/organizations/{}", self.id)
    }
}

/// Identifies a project either by numeric id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    Id(u64),
    Name(String),
}

impl From<u64> for ProjectRef {
    fn from(id: u64) -> Self {
        ProjectRef::Id(id)
    }
}

impl From<&str> for ProjectRef {
    fn from(name: &str) -> Self {
        ProjectRef::Name(name.to_string())
    }
}

impl From<String> for ProjectRef {
    fn from(name: String) -> Self {
        ProjectRef::Name(name)
    }
}

/// GitHub App installation backing a project synced from GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubAppInstall {
    pub installation_id: u64,
}

/// Project as returned by the projects endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectRecord {
    pub id: u64,
    pub name: String,
    pub hash: String,
    pub clone_token: String,
    #[serde(default)]
    pub github_repo: Option<String>,
    #[serde(default)]
    pub github_app_install: Option<GitHubAppInstall>,
    // The list endpoint may leave branches out; refresh() fills them in.
    #[serde(default)]
    pub features: Vec<BranchRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BranchRecord {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectList {
    pub projects: Vec<ProjectRecord>,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Kind of location, e.g. `FILE`, `CLASS`, `FUNCTION`.
    #[serde(rename = "type")]
    pub kind: String,
    pub file: String,
    /// 1-indexed, inclusive.
    pub start_line: u32,
    /// 1-indexed, exclusive. Absent when the hit is the whole file.
    #[serde(default)]
    pub end_line: Option<u32>,
}

/// A point in a file, used to seed generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    /// 1-indexed.
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl From<&SearchResult> for Location {
    fn from(result: &SearchResult) -> Self {
        Self {
            file: result.file.clone(),
            line: result.start_line,
        }
    }
}

/// Optional inputs to [`crate::Branch::generate`].
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// File path to full content, applied on top of the branch before the
    /// agent runs.
    pub local_changes: BTreeMap<String, String>,
    /// Where the agent should start. When `None` it looks for relevant code
    /// itself.
    pub start_locations: Option<Vec<Location>>,
    /// Named session to create or continue.
    pub session: Option<String>,
}

/// Outcome of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResult {
    /// Unified diff, suitable for [`crate::apply_diff`].
    pub diff: String,
    /// Set when the server reported the generation as partial.
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerationRecord {
    #[serde(default)]
    pub partial: bool,
    #[serde(default)]
    pub error: Option<String>,
    pub diff: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryRecord {
    pub message: String,
}

/// A bug found by review, with a replacement for the affected lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewBug {
    pub description: String,
    pub file: String,
    /// 1-indexed, inclusive.
    pub start_line: u32,
    /// 1-indexed, exclusive.
    pub end_line: u32,
    pub suggested_fix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub message: String,
    pub bugs: Vec<ReviewBug>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCommit {
    pub message: String,
    /// `git diff` of the commit.
    pub diff: String,
}

/// A proposed fix for one discovered issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanChangeset {
    pub title: String,
    pub body: String,
    pub commits: Vec<ScanCommit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSubsystem {
    pub name: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub scanned_subsystems: Vec<ScanSubsystem>,
    pub changesets: Vec<ScanChangeset>,
}

/// Handle to a request that completes asynchronously on the server.
/// Pass it to [`crate::Branch::poll`] to wait for the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncResponse {
    pub request_id: String,
}
