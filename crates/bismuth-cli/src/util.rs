use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Working tree root of the git repository containing `path`.
pub fn repo_root(path: &Path) -> Result<PathBuf> {
    let repo = gix::discover(path)
        .context("not a git repository (or any parent up to mount point)")?;
    let workdir = repo
        .workdir()
        .context("bare repositories cannot be linked to Bismuth")?;
    Ok(workdir.to_path_buf())
}

/// Short name of the checked out branch.
pub fn current_branch(repo: &Path) -> Result<String> {
    let repo = gix::open(repo).context("failed to open repository")?;
    match repo.head_name().context("failed to read HEAD")? {
        Some(name) => Ok(name.shorten().to_string()),
        None => bail!("HEAD is detached; pass --branch"),
    }
}

/// Parse a `FILE:LINE` start location.
pub fn parse_location(raw: &str) -> Result<bismuth_sdk::Location> {
    let (file, line) = raw
        .rsplit_once(':')
        .with_context(|| format!("expected FILE:LINE, got '{raw}'"))?;
    let line = line
        .parse()
        .with_context(|| format!("invalid line number in '{raw}'"))?;
    if file.is_empty() {
        bail!("expected FILE:LINE, got '{raw}'");
    }
    Ok(bismuth_sdk::Location::new(file, line))
}

/// Path of `file` relative to the repository root, with `/` separators.
pub fn repo_relative(repo: &Path, file: &Path) -> Result<String> {
    let absolute = if file.is_absolute() {
        file.to_path_buf()
    } else {
        std::env::current_dir()?.join(file)
    };
    let absolute = absolute
        .canonicalize()
        .with_context(|| format!("cannot read {}", file.display()))?;
    let root = repo.canonicalize()?;
    let relative = absolute
        .strip_prefix(&root)
        .with_context(|| format!("{} is outside the repository", file.display()))?;
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}
