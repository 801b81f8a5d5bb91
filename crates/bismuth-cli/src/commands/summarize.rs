use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::session::Session;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, diff: Option<PathBuf>, branch: Option<String>) -> Result<()> {
    let diff = match diff {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read diff from stdin")?;
            buf
        }
    };
    if diff.trim().is_empty() {
        bail!("empty diff");
    }

    let session = Session::open(global)?;
    let branch = session.branch(branch.as_deref())?;
    println!("{}", branch.summarize_changes(&diff)?);
    Ok(())
}
