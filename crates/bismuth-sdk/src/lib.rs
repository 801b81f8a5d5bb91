//! # bismuth-sdk
//!
//! Typed Rust client for the Bismuth API.
//!
//! Link a local git working tree to a Bismuth project, then search it, have
//! the agent generate changes, summarize or review diffs, and scan for bugs.
//! Generated diffs can be applied back to the working tree with
//! [`apply_diff`].
//!
//! The API is async. [`blocking`] offers the same operations for callers
//! without a runtime.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use bismuth_sdk::{apply_diff, Client, ClientConfig, GenerateOptions};
//!
//! # async fn example() -> bismuth_sdk::Result<()> {
//! let client = Client::new(ClientConfig::new("my-api-key"))?;
//! let repo = Path::new("/path/to/repo");
//! let project = client.load_project(repo, true).await?;
//! let branch = project.get_branch("main")?;
//!
//! let hits = branch.search("request parsing", 5).await?;
//! let result = branch
//!     .generate("handle empty bodies", &GenerateOptions::default())
//!     .await?;
//! if !apply_diff(repo, &result.diff).await {
//!     eprintln!("patch did not apply");
//! }
//! let message = branch.summarize_changes(&result.diff).await?;
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod branch;
pub mod client;
pub mod config;
pub mod error;
pub mod git;
pub mod patch;
pub mod project;
mod resolve;
mod sync;
pub mod types;

pub use branch::Branch;
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use git::{CliTransport, GitTransport, REMOTE_NAME};
pub use patch::apply_diff;
pub use project::Project;
pub use types::*;
