mod workflow_test;

use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

#[allow(deprecated)]
pub fn bismuth() -> Command {
    Command::cargo_bin("bismuth").unwrap()
}

/// `bismuth` with credentials and config isolated from the developer's
/// environment. `home` stands in for both `$HOME` and `$XDG_CONFIG_HOME`.
pub fn isolated(home: &Path) -> Command {
    let mut cmd = bismuth();
    cmd.env_remove("BISMUTH_API_KEY")
        .env_remove("BISMUTH_API")
        .env_remove("BISMUTH_ORGANIZATION_ID")
        .env_remove("RUST_LOG")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1");
    cmd
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
