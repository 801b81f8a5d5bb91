use anyhow::{bail, Result};

use crate::session::Session;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, yes: bool) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.project(false)?;

    if !yes {
        bail!(
            "this deletes project '{}' (id {}); rerun with --yes to confirm",
            project.name(),
            project.id()
        );
    }

    project.delete()?;
    println!("Deleted project '{}'", project.name());
    Ok(())
}
