use anyhow::Result;

use crate::session::Session;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs) -> Result<()> {
    let client = Session::client(global)?;
    let projects = client.list_projects()?;

    if projects.is_empty() {
        println!("No projects.");
        return Ok(());
    }

    println!("{:<8} {:<30} Branches", "Id", "Name");
    println!("{}", "-".repeat(60));
    for project in projects {
        let branches: Vec<String> = project
            .branches()
            .iter()
            .map(|b| b.name().to_string())
            .collect();
        println!("{:<8} {:<30} {}", project.id(), project.name(), branches.join(", "));
    }
    Ok(())
}
