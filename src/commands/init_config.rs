//! src/commands/init_config.rs
//! Write the built-in settings to a TOML file users can edit.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::{ensure_parent_dir, Settings};
use crate::io::atomic::atomic_write;

pub fn main(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    ensure_parent_dir(path)?;
    let txt = Settings::default().to_toml()?;
    atomic_write(path, txt.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}
