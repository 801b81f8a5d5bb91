use anyhow::Result;
use colored::Colorize;

use crate::session::Session;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, create: bool) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.project(create)?;

    println!(
        "Linked {} to project {} (id {})",
        session.repo.display(),
        project.name().bold(),
        project.id()
    );
    for branch in project.branches() {
        println!("  {} {}", "*".green(), branch.name());
    }
    Ok(())
}
