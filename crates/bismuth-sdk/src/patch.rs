use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Apply a diff returned by [`crate::Branch::generate`] to the working tree
/// at `repo` with `patch -p0`.
///
/// Returns whether the patch applied cleanly. Failures to run `patch` count
/// as not applied.
pub async fn apply_diff(repo: &Path, diff: &str) -> bool {
    match run_patch(repo, diff).await {
        Ok(applied) => applied,
        Err(e) => {
            debug!(error = %e, "failed to run patch");
            false
        }
    }
}

async fn run_patch(repo: &Path, diff: &str) -> std::io::Result<bool> {
    let mut child = Command::new("patch")
        .arg("-p0")
        .current_dir(repo)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(diff.as_bytes()).await?;
        // Dropping stdin closes the pipe so patch sees EOF.
    }

    let status = child.wait().await?;
    Ok(status.success())
}
