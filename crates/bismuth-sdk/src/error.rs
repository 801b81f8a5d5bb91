use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("multiple organizations found ({count}) - organization_id must be specified")]
    AmbiguousOrganization { count: usize },

    #[error("no organizations are visible to this API key")]
    NoOrganization,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{} is not a git repository", .0.display())]
    NotARepository(PathBuf),

    #[error("cannot synchronize project '{0}': it is linked to a GitHub repository")]
    ExternallyLinked(String),

    #[error("no such branch: {0}")]
    BranchNotFound(String),

    #[error("no such project: {0}")]
    ProjectNotFound(String),

    #[error("no bismuth remote found in {}", .0.display())]
    NoRemote(PathBuf),

    #[error("Couldn't find project, but repo already has a bismuth remote")]
    RemoteProjectNotFound,

    #[error("request timed out waiting for {0}")]
    PollTimeout(String),

    #[error("server returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url '{0}'")]
    InvalidUrl(String),

    #[error("git error: {0}")]
    Git(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
