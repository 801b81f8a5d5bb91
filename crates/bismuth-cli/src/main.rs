mod commands;
mod config;
mod session;
mod util;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Overrides;

#[derive(Parser)]
#[command(name = "bismuth", version, about = "Bismuth CLI: search, generate, review and scan code")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// API key (overrides the config file)
    #[arg(long, env = "BISMUTH_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL
    #[arg(long, env = "BISMUTH_API", global = true)]
    api_url: Option<String>,

    /// Organization id, required when the key belongs to several
    #[arg(long, env = "BISMUTH_ORGANIZATION_ID", global = true)]
    organization: Option<u64>,

    /// Path inside the git repository to work on
    #[arg(short = 'C', long, global = true, default_value = ".")]
    repo: PathBuf,
}

impl GlobalArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            api_url: self.api_url.clone(),
            organization_id: self.organization,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Link the repository to a Bismuth project, creating it if needed
    Import {
        /// Fail instead of creating a project when the repository is not linked
        #[arg(long)]
        no_create: bool,
    },

    /// Push the repository (or a remote git URL) to its Bismuth project
    Sync {
        /// Clone this URL and push it instead of the local repository
        #[arg(long)]
        url: Option<String>,
    },

    /// Search the indexed code of a branch
    Search {
        /// Search query
        query: String,
        /// Maximum results
        #[arg(long, default_value_t = 10)]
        top: u32,
        /// Branch to search (default: current branch)
        #[arg(short, long)]
        branch: Option<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask Bismuth to write a change and print or apply the resulting diff
    Generate {
        /// What to change
        message: String,
        /// Branch to generate against (default: current branch)
        #[arg(short, long)]
        branch: Option<String>,
        /// Start from these locations (FILE:LINE)
        #[arg(long = "start", value_name = "FILE:LINE")]
        start: Vec<String>,
        /// Seed the start locations with the hits of a search query
        #[arg(long, conflicts_with = "start")]
        search: Option<String>,
        /// Send the working tree content of these files with the request
        #[arg(long = "local", value_name = "FILE")]
        local: Vec<PathBuf>,
        /// Session name to group related generations
        #[arg(long)]
        session: Option<String>,
        /// Apply the diff to the working tree
        #[arg(long)]
        apply: bool,
        /// Print a commit message for the diff
        #[arg(long)]
        summarize: bool,
    },

    /// Write a commit message for a diff
    Summarize {
        /// Diff file (default: stdin)
        diff: Option<PathBuf>,
        /// Branch the diff applies to (default: current branch)
        #[arg(short, long)]
        branch: Option<String>,
    },

    /// Review changed files for bugs
    Review {
        /// Description of the change
        message: String,
        /// Changed files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Branch to review against (default: current branch)
        #[arg(short, long)]
        branch: Option<String>,
    },

    /// Scan a branch for improvements
    Scan {
        /// Upper bound on the subsystems scanned
        #[arg(long, default_value_t = 5)]
        max_subsystems: u32,
        /// Branch to scan (default: current branch)
        #[arg(short, long)]
        branch: Option<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the projects of the organization
    Projects,

    /// Delete the Bismuth project linked to the repository
    Delete {
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },

    /// Show the organization the API key resolves to
    Whoami,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bismuth=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let global = cli.global;
    match cli.command {
        Commands::Import { no_create } => commands::import::run(&global, !no_create),
        Commands::Sync { url } => commands::sync::run(&global, url),
        Commands::Search {
            query,
            top,
            branch,
            json,
        } => commands::search::run(&global, query, top, branch, json),
        Commands::Generate {
            message,
            branch,
            start,
            search,
            local,
            session,
            apply,
            summarize,
        } => commands::generate::run(
            &global,
            commands::generate::GenerateArgs {
                message,
                branch,
                start,
                search,
                local,
                session,
                apply,
                summarize,
            },
        ),
        Commands::Summarize { diff, branch } => commands::summarize::run(&global, diff, branch),
        Commands::Review {
            message,
            files,
            branch,
        } => commands::review::run(&global, message, files, branch),
        Commands::Scan {
            max_subsystems,
            branch,
            json,
        } => commands::scan::run(&global, max_subsystems, branch, json),
        Commands::Projects => commands::projects::run(&global),
        Commands::Delete { yes } => commands::delete::run(&global, yes),
        Commands::Whoami => commands::whoami::run(&global),
    }
}
