use anyhow::{Context, Result};
use colored::Colorize;

use crate::session::Session;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, url: Option<String>) -> Result<()> {
    let session = Session::open(global)?;
    let mut project = session.project(false)?;

    match url {
        Some(url) => project
            .synchronize_git_remote(&url)
            .with_context(|| format!("failed to sync {url}"))?,
        None => project
            .synchronize_git_local(&session.repo)
            .context("failed to push repository")?,
    }

    println!("{} {}", "Synced".green(), project.name().bold());
    for branch in project.branches() {
        println!("  {}", branch.name());
    }
    Ok(())
}
