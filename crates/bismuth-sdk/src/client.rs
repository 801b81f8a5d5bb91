use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::git::{CliTransport, GitTransport};
use crate::project::Project;
use crate::types::{Organization, ProjectList, ProjectRecord, ProjectRef};

/// Entry point to the Bismuth API.
///
/// Cloning is cheap and clones share the resolved organization. Every
/// [`Project`] and [`crate::Branch`] keeps a clone so it can issue its own
/// requests.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    organization_id: Option<u64>,
    organization: OnceCell<Organization>,
    poll_interval: Duration,
    poll_timeout: Option<Duration>,
    transport: Arc<dyn GitTransport>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(CliTransport))
    }

    /// Build a client from `BISMUTH_API_KEY` and friends, see
    /// [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Like [`Client::new`], with pushes and clones routed through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn GitTransport>) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| Error::InvalidUrl(base_url.clone()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // No request timeout: generation and review can run for minutes.
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                api_key: config.api_key,
                base_url,
                organization_id: config.organization_id,
                organization: OnceCell::new(),
                poll_interval: config.poll_interval,
                poll_timeout: config.poll_timeout,
                transport,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub(crate) fn transport(&self) -> &dyn GitTransport {
        self.inner.transport.as_ref()
    }

    pub(crate) fn poll_interval(&self) -> Duration {
        self.inner.poll_interval
    }

    pub(crate) fn poll_timeout(&self) -> Option<Duration> {
        self.inner.poll_timeout
    }

    /// List all organizations the API key is a member of.
    pub async fn list_organizations(&self) -> Result<Vec<Organization>> {
        debug!("listing organizations");
        self.get("/organizations").await
    }

    /// The organization every project call is scoped to.
    ///
    /// Resolved on first use and cached for the lifetime of the client. With
    /// no configured id the key must belong to exactly one organization.
    pub async fn organization(&self) -> Result<&Organization> {
        self.inner
            .organization
            .get_or_try_init(|| self.resolve_organization())
            .await
    }

    async fn resolve_organization(&self) -> Result<Organization> {
        let id = match self.inner.organization_id {
            Some(id) => id,
            None => {
                let organizations = self.list_organizations().await?;
                match organizations.as_slice() {
                    [only] => only.id,
                    [] => return Err(Error::NoOrganization),
                    _ => {
                        return Err(Error::AmbiguousOrganization {
                            count: organizations.len(),
                        })
                    }
                }
            }
        };
        self.get(&format!("/organizations/{id}")).await
    }

    /// All projects in the active organization, in server order.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let organization = self.organization().await?;
        let list = self.project_records(organization).await?;
        Ok(list
            .into_iter()
            .map(|record| Project::from_record(self.clone(), organization.id, record))
            .collect())
    }

    /// Fetch a project by id or by name, with its branches loaded.
    pub async fn get_project(&self, project: impl Into<ProjectRef>) -> Result<Project> {
        let organization = self.organization().await?;

        let record = match project.into() {
            ProjectRef::Id(id) => {
                self.get::<ProjectRecord>(&format!("{}/projects/{id}", organization.api_prefix()))
                    .await?
            }
            ProjectRef::Name(name) => {
                debug!(%name, "matching project by name");
                self.project_records(organization)
                    .await?
                    .into_iter()
                    .find(|p| p.name == name)
                    .ok_or(Error::ProjectNotFound(name))?
            }
        };

        let mut project = Project::from_record(self.clone(), organization.id, record);
        project.refresh().await?;
        Ok(project)
    }

    pub(crate) async fn project_records(
        &self,
        organization: &Organization,
    ) -> Result<Vec<ProjectRecord>> {
        let list: ProjectList = self
            .get(&format!("{}/projects/list", organization.api_prefix()))
            .await?;
        Ok(list.projects)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let res = self.request(reqwest::Method::GET, path).send().await?;
        Self::handle_response(res).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &(impl Serialize + ?Sized),
    ) -> Result<T> {
        let res = self
            .request(reqwest::Method::GET, path)
            .query(query)
            .send()
            .await?;
        Self::handle_response(res).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let res = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        Self::handle_response(res).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let res = self.request(reqwest::Method::DELETE, path).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Unchecked GET, for callers that branch on the status code.
    pub(crate) async fn get_raw(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self.request(reqwest::Method::GET, path).send().await?)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);
        self.inner
            .http
            .request(method, url)
            .basic_auth("", Some(&self.inner.api_key))
    }

    pub(crate) async fn handle_response<T: DeserializeOwned>(res: reqwest::Response) -> Result<T> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }
        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("organization_id", &self.inner.organization_id)
            .field("organization", &self.inner.organization.get())
            .finish_non_exhaustive()
    }
}
