use anyhow::Result;

use crate::session::Session;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs) -> Result<()> {
    let client = Session::client(global)?;
    let organization = client.organization()?;
    println!("Organization {} (id {})", organization.name, organization.id);
    Ok(())
}
