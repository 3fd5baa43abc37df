use dirs::home_dir;
use std::{env, path::PathBuf};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".booking_core";
const HOME_ENV: &str = "BOOKING_CORE_HOME";
const STORE_DIR: &str = "store";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Resolves the on-disk layout of the application data directory.
pub struct PathResolver;

impl PathResolver {
    /// `$BOOKING_CORE_HOME` when set, otherwise `~/.booking_core`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(custom: Option<PathBuf>) -> PathBuf {
        custom.unwrap_or_else(Self::base_dir)
    }

    /// Directory holding the key-value store documents.
    pub fn store_dir_in(base: &std::path::Path) -> PathBuf {
        base.join(STORE_DIR)
    }

    pub fn config_file_in(base: &std::path::Path) -> PathBuf {
        base.join(CONFIG_DIR).join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}
