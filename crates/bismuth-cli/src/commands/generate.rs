use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bismuth_sdk::blocking::{self, Branch};
use bismuth_sdk::{GenerateOptions, Location};
use colored::Colorize;

use crate::session::Session;
use crate::util;
use crate::GlobalArgs;

/// Number of search hits used as start locations with `--search`.
const SEARCH_SEEDS: u32 = 5;

pub struct GenerateArgs {
    pub message: String,
    pub branch: Option<String>,
    pub start: Vec<String>,
    pub search: Option<String>,
    pub local: Vec<PathBuf>,
    pub session: Option<String>,
    pub apply: bool,
    pub summarize: bool,
}

pub fn run(global: &GlobalArgs, args: GenerateArgs) -> Result<()> {
    let session = Session::open(global)?;
    let branch = session.branch(args.branch.as_deref())?;

    let mut local_changes = BTreeMap::new();
    for file in &args.local {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        local_changes.insert(util::repo_relative(&session.repo, file)?, content);
    }

    let options = GenerateOptions {
        local_changes,
        start_locations: start_locations(&branch, &args)?,
        session: args.session,
    };

    let result = branch.generate(&args.message, &options)?;
    if let Some(warning) = &result.warning {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    if result.diff.trim().is_empty() {
        println!("No changes generated.");
        return Ok(());
    }

    if args.apply {
        if !blocking::apply_diff(&session.repo, &result.diff) {
            print!("{}", result.diff);
            bail!("generated diff did not apply cleanly to {}", session.repo.display());
        }
        eprintln!("{} {}", "Applied changes to".green(), session.repo.display());
    } else {
        print!("{}", result.diff);
    }

    if args.summarize {
        let message = branch.summarize_changes(&result.diff)?;
        println!("\n{}", message.bold());
    }
    Ok(())
}

fn start_locations(branch: &Branch, args: &GenerateArgs) -> Result<Option<Vec<Location>>> {
    if let Some(query) = &args.search {
        let hits = branch.search(query, SEARCH_SEEDS)?;
        if hits.is_empty() {
            eprintln!("{} no search hits for '{}'", "warning:".yellow().bold(), query);
            return Ok(None);
        }
        return Ok(Some(hits.iter().map(Location::from).collect()));
    }

    if args.start.is_empty() {
        return Ok(None);
    }
    args.start
        .iter()
        .map(|raw| util::parse_location(raw))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
