use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::*;

/// A branch ("feature" on the wire) of a [`crate::Project`].
///
/// Every operation is scoped to this branch. Obtain one from
/// [`crate::Project::get_branch`].
#[derive(Debug, Clone)]
pub struct Branch {
    client: Client,
    api_prefix: String,
    pub id: u64,
    pub name: String,
    /// Id of the owning project.
    pub project_id: u64,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    query: &'a str,
    top: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    message: &'a str,
    local_changes: &'a BTreeMap<String, String>,
    start_locations: Option<&'a [Location]>,
    session: Option<&'a str>,
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    diff: &'a str,
}

#[derive(Serialize)]
struct ReviewRequest<'a> {
    message: &'a str,
    changes: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct ScanRequest {
    max_subsystems: u32,
}

impl Branch {
    pub(crate) fn new(
        client: Client,
        project_prefix: String,
        project_id: u64,
        id: u64,
        name: String,
    ) -> Self {
        Self {
            client,
            api_prefix: format!("{project_prefix}/features/{id}"),
            id,
            name,
            project_id,
        }
    }

    fn path(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_prefix, endpoint)
    }

    /// Search the branch for code relevant to `query`, best match first.
    pub async fn search(&self, query: &str, top: u32) -> Result<Vec<SearchResult>> {
        self.client
            .get_with_query(&self.path("search"), &SearchQuery { query, top })
            .await
    }

    /// Start a generation without waiting for it. See [`Branch::generate`].
    pub async fn start_generate(
        &self,
        message: &str,
        options: &GenerateOptions,
    ) -> Result<AsyncResponse> {
        self.client
            .post(
                &self.path("generate"),
                &GenerateRequest {
                    message,
                    local_changes: &options.local_changes,
                    start_locations: options
                        .start_locations
                        .as_deref()
                        .filter(|l| !l.is_empty()),
                    session: options.session.as_deref(),
                },
            )
            .await
    }

    /// Run the Bismuth agent on `message` and return the resulting diff.
    ///
    /// `options.local_changes` are applied to the branch before the agent
    /// starts. A generation the server marks as partial is still returned;
    /// the reason ends up in [`GenerateResult::warning`].
    pub async fn generate(&self, message: &str, options: &GenerateOptions) -> Result<GenerateResult> {
        let pending = self.start_generate(message, options).await?;
        let generation: GenerationRecord = self.poll(&pending).await?;

        let warning = generation.partial.then(|| {
            let reason = generation.error.as_deref().unwrap_or("unknown error");
            format!("potentially incomplete generation due to {reason}")
        });
        if let Some(warning) = &warning {
            warn!(branch = self.id, "{warning}");
        }
        Ok(GenerateResult {
            diff: generation.diff,
            warning,
        })
    }

    /// Summarize a unified diff as a commit message.
    pub async fn summarize_changes(&self, diff: &str) -> Result<String> {
        let summary: SummaryRecord = self
            .client
            .post(&self.path("summarize"), &SummarizeRequest { diff })
            .await?;
        Ok(summary.message)
    }

    /// Start a review without waiting for it. See [`Branch::review_changes`].
    pub async fn start_review_changes(
        &self,
        message: &str,
        changed_files: &BTreeMap<String, String>,
    ) -> Result<AsyncResponse> {
        self.client
            .post(
                &self.path("review"),
                &ReviewRequest {
                    message,
                    changes: changed_files,
                },
            )
            .await
    }

    /// Review `changed_files` (path to new content, compared to HEAD) for
    /// bugs. `message` states the intent of the change.
    pub async fn review_changes(
        &self,
        message: &str,
        changed_files: &BTreeMap<String, String>,
    ) -> Result<ReviewResult> {
        let pending = self.start_review_changes(message, changed_files).await?;
        self.poll(&pending).await
    }

    /// Start a scan without waiting for it. See [`Branch::scan`].
    pub async fn start_scan(&self, max_subsystems: u32) -> Result<AsyncResponse> {
        self.client
            .post(&self.path("scan"), &ScanRequest { max_subsystems })
            .await
    }

    /// Scan the branch for bugs. The agent splits the code into subsystems
    /// and scans at most `max_subsystems` of them, picked at random.
    pub async fn scan(&self, max_subsystems: u32) -> Result<ScanResult> {
        let pending = self.start_scan(max_subsystems).await?;
        self.poll(&pending).await
    }

    /// Wait for an asynchronous request to finish and decode its result.
    ///
    /// Polls every `poll_interval` of the client config. `202`, `204` and
    /// `404` mean the result is not ready yet; any other non-200 status is an
    /// error. Gives up with [`Error::PollTimeout`] once `poll_timeout`, if
    /// set, has elapsed.
    pub async fn poll<T: DeserializeOwned>(&self, pending: &AsyncResponse) -> Result<T> {
        let path = self.path(&format!("response/{}", pending.request_id));
        let interval = self.client.poll_interval();
        let deadline = self.client.poll_timeout().map(|t| Instant::now() + t);

        loop {
            let res = self.client.get_raw(&path).await?;
            match res.status() {
                StatusCode::OK => return Client::handle_response(res).await,
                StatusCode::ACCEPTED | StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => {
                    debug!(request = %pending.request_id, "response not ready");
                }
                status => {
                    let body = res.text().await.unwrap_or_default();
                    return Err(Error::Api {
                        status: status.as_u16(),
                        body,
                    });
                }
            }

            if deadline.is_some_and(|deadline| Instant::now() + interval > deadline) {
                return Err(Error::PollTimeout(pending.request_id.clone()));
            }
            tokio::time::sleep(interval).await;
        }
    }
}
