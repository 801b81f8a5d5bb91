use anyhow::Result;
use colored::Colorize;

use crate::session::Session;
use crate::GlobalArgs;

pub fn run(
    global: &GlobalArgs,
    query: String,
    top: u32,
    branch: Option<String>,
    json: bool,
) -> Result<()> {
    let session = Session::open(global)?;
    let branch = session.branch(branch.as_deref())?;
    let results = branch.search(&query, top)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!("{:>3} | {:<10} | {:<40} | Lines", "#", "Kind", "File");
    println!("{}", "-".repeat(70));

    for (i, result) in results.iter().enumerate() {
        let lines = match result.end_line {
            Some(end) => format!("{}-{}", result.start_line, end),
            None => result.start_line.to_string(),
        };
        println!(
            "{:>3} | {:<10} | {:<40} | {}",
            i + 1,
            result.kind,
            result.file.cyan(),
            lines
        );
    }

    Ok(())
}
