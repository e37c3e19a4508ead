use crate::error::{BrewError, Result};
use std::path::PathBuf;

pub const CONFIG_DIR: &str = ".config/brewer";
pub const CONFIG_FILE: &str = "config.yaml";
pub const MIRROR_FILE: &str = "cards.db";

pub fn config_dir() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(BrewError::HomeNotFound)?;
    Ok(home.join(CONFIG_DIR))
}

/// `~/.config/brewer/config.yaml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// `~/.config/brewer/cards.db`
pub fn default_mirror_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(MIRROR_FILE))
}
