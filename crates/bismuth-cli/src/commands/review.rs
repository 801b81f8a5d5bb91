use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::session::Session;
use crate::util;
use crate::GlobalArgs;

pub fn run(
    global: &GlobalArgs,
    message: String,
    files: Vec<PathBuf>,
    branch: Option<String>,
) -> Result<()> {
    let session = Session::open(global)?;

    let mut changes = BTreeMap::new();
    for file in &files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        changes.insert(util::repo_relative(&session.repo, file)?, content);
    }

    let branch = session.branch(branch.as_deref())?;
    let review = branch.review_changes(&message, &changes)?;

    println!("{}", review.message);
    if review.bugs.is_empty() {
        println!("{}", "No bugs found.".green());
        return Ok(());
    }

    for bug in &review.bugs {
        println!();
        println!(
            "{} {}:{}-{}",
            "bug".red().bold(),
            bug.file.cyan(),
            bug.start_line,
            bug.end_line
        );
        println!("  {}", bug.description);
        println!("  {}", "suggested fix:".dimmed());
        for line in bug.suggested_fix.lines() {
            println!("    {}", line.green());
        }
    }
    Ok(())
}
