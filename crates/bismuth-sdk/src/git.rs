//! Local git plumbing used to link a working tree to a Bismuth project.
//!
//! Reads go through `gix`; writes and network operations shell out to the
//! git executable, the same way the CLI does for push and clone.

use std::path::Path;

use reqwest::Url;

use crate::error::{Error, Result};

/// Name of the remote that links a working tree to its Bismuth project.
pub const REMOTE_NAME: &str = "bismuth";

const PUSH_USERNAME: &str = "git";

/// Git operations that talk to another repository.
///
/// [`CliTransport`] is the default. Alternative implementations can route
/// pushes through a credential helper or observe them in tests.
#[async_trait::async_trait]
pub trait GitTransport: Send + Sync {
    /// Push `refspec` from the repository at `repo` to `remote`.
    async fn push(&self, repo: &Path, remote: &str, refspec: &str, force: bool) -> Result<()>;

    /// Clone `url` into `dest`, which may already exist but must be empty.
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;
}

/// [`GitTransport`] backed by the git executable.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliTransport;

#[async_trait::async_trait]
impl GitTransport for CliTransport {
    async fn push(&self, repo: &Path, remote: &str, refspec: &str, force: bool) -> Result<()> {
        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.extend([remote, refspec]);
        run_git(Some(repo), &args).await.map(|_| ())
    }

    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let dest = dest.to_string_lossy();
        run_git(None, &["clone", "--quiet", url, &dest])
            .await
            .map(|_| ())
    }
}

/// Fail unless `path` holds a `.git` directory.
pub(crate) fn ensure_repository(path: &Path) -> Result<()> {
    if path.join(".git").exists() {
        Ok(())
    } else {
        Err(Error::NotARepository(path.to_path_buf()))
    }
}

/// URL configured for remote `name`, if the remote exists.
pub(crate) fn remote_url(repo: &Path, name: &str) -> Result<Option<String>> {
    let repo = gix::open(repo).map_err(|e| {
        Error::Git(format!("failed to open repository at {}: {e}", repo.display()))
    })?;
    let key = format!("remote.{name}.url");
    Ok(repo
        .config_snapshot()
        .string(key.as_str())
        .map(|url| url.to_string()))
}

pub(crate) async fn add_remote(repo: &Path, name: &str, url: &str) -> Result<()> {
    run_git(Some(repo), &["remote", "add", name, url])
        .await
        .map(|_| ())
}

pub(crate) async fn set_remote_url(repo: &Path, name: &str, url: &str) -> Result<()> {
    run_git(Some(repo), &["remote", "set-url", name, url])
        .await
        .map(|_| ())
}

/// Short name of the checked-out branch.
pub(crate) async fn current_branch(repo: &Path) -> Result<String> {
    let name = run_git(Some(repo), &["rev-parse", "--abbrev-ref", "HEAD"]).await?;
    let name = name.trim();
    if name.is_empty() || name == "HEAD" {
        return Err(Error::Git(format!(
            "{} has a detached HEAD; check out a branch to synchronize",
            repo.display()
        )));
    }
    Ok(name.to_string())
}

/// Push target for a project: `{base_url}/git/{hash}` authenticated with the
/// project's clone token.
pub(crate) fn push_url(base_url: &str, hash: &str, clone_token: &str) -> Result<String> {
    let raw = format!("{}/git/{}", base_url.trim_end_matches('/'), hash);
    let mut url = Url::parse(&raw).map_err(|_| Error::InvalidUrl(raw.clone()))?;
    url.set_username(PUSH_USERNAME)
        .and_then(|_| url.set_password(Some(clone_token)))
        .map_err(|_| Error::InvalidUrl(raw.clone()))?;
    Ok(url.to_string())
}

/// The password embedded in a remote URL, which for a Bismuth remote is the
/// project's clone token. `Url` keeps userinfo percent-encoded, so it is
/// decoded back to the raw token.
pub(crate) fn clone_token(remote_url: &str) -> Option<String> {
    let url = Url::parse(remote_url).ok()?;
    let password = url.password()?;
    urlencoding::decode(password).ok().map(|token| token.into_owned())
}

async fn run_git(repo: Option<&Path>, args: &[&str]) -> Result<String> {
    let git_exe = gix::path::env::exe_invocation();
    let mut cmd = tokio::process::Command::new(git_exe);
    cmd.args(args);
    if let Some(repo) = repo {
        cmd.current_dir(repo);
    }

    let output = cmd
        .output()
        .await
        .map_err(|e| Error::Git(format!("failed to run git {}: {e}", args[0])))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Git(format!("git {} failed: {}", args[0], stderr.trim())));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
