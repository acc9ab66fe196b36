use crate::config::ConfigError;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "FILE_AGENT_CONFIG";
pub const DEFAULT_CONFIG_FILE_NAME: &str = "file-agent.yaml";
pub const DEFAULT_WORKSPACE_DIR: &str = "workspace";
pub const DEFAULT_LOG_FILE: &str = "logs/file_agent.log";

/// Config file to load when the caller did not pass one: `$FILE_AGENT_CONFIG`
/// first, then `file-agent.yaml` in the current directory.
pub fn default_config_path(env_value: Option<&str>, cwd: &Path) -> PathBuf {
    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(explicit) => cwd.join(explicit),
        None => cwd.join(DEFAULT_CONFIG_FILE_NAME),
    }
}

pub fn current_dir() -> Result<PathBuf, ConfigError> {
    std::env::current_dir().map_err(ConfigError::CurrentDir)
}

pub(crate) fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
