//! Drives the binary against a mock API server, in a repository already
//! linked through its `bismuth` remote.

use mockito::{Matcher, Mock, Server, ServerGuard};
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::{git, isolated, test_repo};

const API_KEY: &str = "test-api-key";
const AUTH: &str = "Basic OnRlc3QtYXBpLWtleQ==";
const CLONE_TOKEN: &str = "clone-token-123";
const PROJECT: &str = "/organizations/1/projects/1";
const BRANCH: &str = "/organizations/1/projects/1/features/1";
const DIFF: &str = "--- test.py\n+++ test.py\n@@ -1 +1 @@\n-print('Hello, world!')\n+print('Goodbye, world!')\n";

fn mock(server: &mut ServerGuard, method: &str, path: &str, body: Value) -> Mock {
    server
        .mock(method, path)
        .match_header("authorization", AUTH)
        .with_status(200)
        .with_body(body.to_string())
        .create()
}

fn project_json() -> Value {
    json!({
        "id": 1,
        "name": "Example Project",
        "hash": "abc123",
        "cloneToken": CLONE_TOKEN,
        "githubRepo": null,
        "githubAppInstall": null,
        "features": [{ "id": 1, "name": "main" }],
    })
}

/// Organization 1 holding project 1, which the returned repository is
/// linked to.
fn linked(server: &mut ServerGuard) -> (TempDir, Vec<Mock>) {
    linked_to(server, project_json())
}

fn linked_to(server: &mut ServerGuard, project: Value) -> (TempDir, Vec<Mock>) {
    let org = json!({ "id": 1, "name": "Example Org" });
    let mocks = vec![
        mock(server, "GET", "/organizations", json!([org.clone()])),
        mock(server, "GET", "/organizations/1", org),
        mock(
            server,
            "GET",
            "/organizations/1/projects/list",
            json!({ "projects": [project.clone()] }),
        ),
        mock(server, "GET", PROJECT, project),
    ];
    let repo = test_repo();
    let url = format!("{}/git/abc123", server.url())
        .replacen("://", &format!("://git:{CLONE_TOKEN}@"), 1);
    git(repo.path(), &["remote", "add", "bismuth", &url]);
    (repo, mocks)
}

fn run(server: &ServerGuard, home: &TempDir, repo: &TempDir) -> assert_cmd::Command {
    let mut cmd = isolated(home.path());
    cmd.env("BISMUTH_API_KEY", API_KEY)
        .env("BISMUTH_API", server.url())
        .current_dir(repo.path());
    cmd
}

#[test]
fn whoami_and_projects() {
    let mut server = Server::new();
    let home = TempDir::new().unwrap();
    let (repo, _mocks) = linked(&mut server);

    run(&server, &home, &repo)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Example Org (id 1)"));

    run(&server, &home, &repo)
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("Example Project").and(predicate::str::contains("main")));
}

#[test]
fn search_prints_hits() {
    let mut server = Server::new();
    let home = TempDir::new().unwrap();
    let (repo, _mocks) = linked(&mut server);
    let _search = server
        .mock("GET", format!("{BRANCH}/search").as_str())
        .match_query(Matcher::UrlEncoded("query".into(), "hello".into()))
        .with_status(200)
        .with_body(json!([{ "type": "FUNCTION", "file": "test.py", "start_line": 1, "end_line": 2 }]).to_string())
        .create();

    run(&server, &home, &repo)
        .args(["search", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("test.py").and(predicate::str::contains("1-2")));

    run(&server, &home, &repo)
        .args(["search", "hello", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"FUNCTION\""));
}

#[test]
fn generate_applies_and_summarizes() {
    let mut server = Server::new();
    let home = TempDir::new().unwrap();
    let (repo, _mocks) = linked(&mut server);
    let _generate = server
        .mock("POST", format!("{BRANCH}/generate").as_str())
        .match_body(Matcher::PartialJson(json!({
            "message": "say goodbye",
            "start_locations": [{ "file": "test.py", "line": 7 }]
        })))
        .with_status(200)
        .with_body(json!({ "request_id": "gen-1" }).to_string())
        .create();
    let _result = mock(
        &mut server,
        "GET",
        &format!("{BRANCH}/response/gen-1"),
        json!({ "partial": false, "error": null, "diff": DIFF }),
    );
    let _summary = mock(
        &mut server,
        "POST",
        &format!("{BRANCH}/summarize"),
        json!({ "message": "Say goodbye instead of hello" }),
    );

    run(&server, &home, &repo)
        .args(["generate", "say goodbye", "--start", "test.py:7", "--apply", "--summarize"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Say goodbye instead of hello"));

    assert_eq!(
        std::fs::read_to_string(repo.path().join("test.py")).unwrap(),
        "print('Goodbye, world!')\n"
    );
}

#[test]
fn review_reports_bugs() {
    let mut server = Server::new();
    let home = TempDir::new().unwrap();
    let (repo, _mocks) = linked(&mut server);
    let _review = server
        .mock("POST", format!("{BRANCH}/review").as_str())
        .match_body(Matcher::Json(json!({
            "message": "update print",
            "changes": { "test.py": "print('Hello, world!')\n" }
        })))
        .with_status(200)
        .with_body(json!({ "request_id": "rev-1" }).to_string())
        .create();
    let _result = mock(
        &mut server,
        "GET",
        &format!("{BRANCH}/response/rev-1"),
        json!({
            "message": "Found 1 issue",
            "bugs": [{
                "description": "Missing docstring",
                "file": "test.py",
                "start_line": 1,
                "end_line": 2,
                "suggested_fix": "print('Hello')\n"
            }]
        }),
    );

    run(&server, &home, &repo)
        .args(["review", "update print", "test.py"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Found 1 issue")
                .and(predicate::str::contains("test.py:1-2"))
                .and(predicate::str::contains("Missing docstring")),
        );
}

#[test]
fn delete_needs_confirmation() {
    let mut server = Server::new();
    let home = TempDir::new().unwrap();
    let (repo, _mocks) = linked(&mut server);
    let delete = server
        .mock("DELETE", PROJECT)
        .match_header("authorization", AUTH)
        .with_status(200)
        .expect(1)
        .create();

    run(&server, &home, &repo)
        .arg("delete")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    run(&server, &home, &repo)
        .args(["delete", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted project 'Example Project'"));
    delete.assert();
}

#[test]
fn import_without_create_needs_a_remote() {
    let mut server = Server::new();
    let home = TempDir::new().unwrap();
    let repo = test_repo();
    let _org = mock(
        &mut server,
        "GET",
        "/organizations/1",
        json!({ "id": 1, "name": "Example Org" }),
    );
    let create = server
        .mock("POST", "/organizations/1/projects")
        .expect(0)
        .create();

    run(&server, &home, &repo)
        .args(["import", "--no-create", "--organization", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no bismuth remote"));
    create.assert();
}

#[test]
fn scan_defaults_to_five_subsystems() {
    let mut server = Server::new();
    let home = TempDir::new().unwrap();
    let (repo, _mocks) = linked(&mut server);
    let start = server
        .mock("POST", format!("{BRANCH}/scan").as_str())
        .match_body(Matcher::Json(json!({ "max_subsystems": 5 })))
        .with_status(200)
        .with_body(json!({ "request_id": "scan-1" }).to_string())
        .expect(1)
        .create();
    let _result = mock(
        &mut server,
        "GET",
        &format!("{BRANCH}/response/scan-1"),
        json!({
            "scanned_subsystems": [{ "name": "Core", "files": ["test.py"] }],
            "changesets": [{
                "title": "Add missing docstrings",
                "body": "Document public functions.",
                "commits": [{ "message": "Add docstring", "diff": DIFF }]
            }]
        }),
    );

    run(&server, &home, &repo)
        .arg("scan")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Core (1 files)")
                .and(predicate::str::contains("Add missing docstrings"))
                .and(predicate::str::contains("Add docstring")),
        );
    start.assert();
}

#[test]
fn sync_refuses_github_linked_project() {
    let mut server = Server::new();
    let home = TempDir::new().unwrap();
    let mut project = project_json();
    project["githubRepo"] = json!("example/repo");
    project["githubAppInstall"] = json!({ "installationId": 42 });
    let (repo, _mocks) = linked_to(&mut server, project);
    let url_before = git(repo.path(), &["remote", "get-url", "bismuth"]);

    run(&server, &home, &repo)
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("linked to a GitHub repository"));

    assert_eq!(git(repo.path(), &["remote", "get-url", "bismuth"]), url_before);
}
