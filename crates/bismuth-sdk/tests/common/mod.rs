#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bismuth_sdk::{CliTransport, Client, ClientConfig, Error, GitTransport, Result};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const API_KEY: &str = "test-api-key";
/// `Basic base64(":test-api-key")`
pub const AUTH: &str = "Basic OnRlc3QtYXBpLWtleQ==";
pub const CLONE_TOKEN: &str = "clone-token-123";
pub const PROJECT_HASH: &str = "abc123";
pub const PROJECT: &str = "/organizations/1/projects/1";
pub const BRANCH: &str = "/organizations/1/projects/1/features/1";

pub fn config(server: &ServerGuard) -> ClientConfig {
    ClientConfig::new(API_KEY)
        .base_url(server.url())
        .poll_interval(Duration::from_millis(10))
}

pub fn client(server: &ServerGuard) -> Client {
    Client::new(config(server)).unwrap()
}

pub fn client_with(server: &ServerGuard, transport: Arc<RecordingTransport>) -> Client {
    Client::with_transport(config(server), transport).unwrap()
}

pub fn project_json(name: &str, branches: &[(u64, &str)]) -> Value {
    json!({
        "id": 1,
        "name": name,
        "hash": PROJECT_HASH,
        "cloneToken": CLONE_TOKEN,
        "githubRepo": null,
        "githubAppInstall": null,
        "features": branches
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect::<Vec<_>>(),
    })
}

pub async fn mock_json(server: &mut ServerGuard, method: &str, path: &str, body: Value) -> Mock {
    server
        .mock(method, path)
        .match_header("authorization", AUTH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// The key is a member of exactly one organization, id 1.
pub async fn mock_organization(server: &mut ServerGuard) -> (Mock, Mock) {
    let org = json!({ "id": 1, "name": "Example Org" });
    let list = mock_json(server, "GET", "/organizations", json!([org])).await;
    let get = mock_json(server, "GET", "/organizations/1", org).await;
    (list, get)
}

/// Project 1 with a `main` branch, served by id.
pub async fn mock_project(server: &mut ServerGuard, name: &str) -> Mock {
    mock_json(server, "GET", PROJECT, project_json(name, &[(1, "main")])).await
}

pub async fn mock_project_list(server: &mut ServerGuard, projects: Vec<Value>) -> Mock {
    mock_json(
        server,
        "GET",
        "/organizations/1/projects/list",
        json!({ "projects": projects }),
    )
    .await
}

pub async fn mock_create_project(server: &mut ServerGuard, name: &str, hits: usize) -> Mock {
    server
        .mock("POST", "/organizations/1/projects")
        .match_header("authorization", AUTH)
        .match_body(Matcher::PartialJson(json!({ "name": name })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(project_json(name, &[]).to_string())
        .expect(hits)
        .create_async()
        .await
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A committed repository on `main` holding `test.py`.
pub fn test_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-b", "main"]);
    git(dir.path(), &["config", "user.name", "Test User"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    std::fs::write(dir.path().join("test.py"), "print('Hello, world!')\n").unwrap();
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-m", "Initial commit"]);
    dir
}

pub fn remotes(dir: &Path) -> Vec<String> {
    git(dir, &["remote"])
        .lines()
        .map(str::to_string)
        .collect()
}

/// Push URL the SDK is expected to configure for project 1.
pub fn expected_push_url(server: &ServerGuard) -> String {
    format!("{}/git/{PROJECT_HASH}", server.url())
        .replacen("://", &format!("://git:{CLONE_TOKEN}@"), 1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Push {
    pub repo: PathBuf,
    pub remote: String,
    pub refspec: String,
    pub force: bool,
}

/// Records pushes instead of performing them. Clones are real unless
/// `fail_clone` is set.
#[derive(Default)]
pub struct RecordingTransport {
    pub pushes: Mutex<Vec<Push>>,
    pub clones: Mutex<Vec<PathBuf>>,
    pub fail_clone: bool,
    pub fail_push: bool,
}

impl RecordingTransport {
    pub fn pushes(&self) -> Vec<Push> {
        self.pushes.lock().unwrap().clone()
    }

    pub fn clones(&self) -> Vec<PathBuf> {
        self.clones.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GitTransport for RecordingTransport {
    async fn push(&self, repo: &Path, remote: &str, refspec: &str, force: bool) -> Result<()> {
        self.pushes.lock().unwrap().push(Push {
            repo: repo.to_path_buf(),
            remote: remote.to_string(),
            refspec: refspec.to_string(),
            force,
        });
        if self.fail_push {
            return Err(Error::Git("git push failed: connection refused".into()));
        }
        Ok(())
    }

    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        self.clones.lock().unwrap().push(dest.to_path_buf());
        if self.fail_clone {
            std::fs::write(dest.join("partial"), "half a clone")?;
            return Err(Error::Git("git clone failed: repository not found".into()));
        }
        CliTransport.clone_repo(url, dest).await
    }
}
