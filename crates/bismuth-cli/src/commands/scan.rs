use anyhow::Result;
use colored::Colorize;

use crate::session::Session;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, max_subsystems: u32, branch: Option<String>, json: bool) -> Result<()> {
    let session = Session::open(global)?;
    let branch = session.branch(branch.as_deref())?;
    let result = branch.scan(max_subsystems)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", "Scanned subsystems".bold());
    for subsystem in &result.scanned_subsystems {
        println!("  {} ({} files)", subsystem.name, subsystem.files.len());
    }

    if result.changesets.is_empty() {
        println!("\nNothing to change.");
        return Ok(());
    }

    for changeset in &result.changesets {
        println!("\n{}", changeset.title.yellow().bold());
        if !changeset.body.is_empty() {
            println!("{}", changeset.body);
        }
        for commit in &changeset.commits {
            println!("  {} {}", "commit".dimmed(), commit.message);
        }
    }
    Ok(())
}
