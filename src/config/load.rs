use super::paths::{current_dir, default_config_path, CONFIG_PATH_ENV};
use super::{ConfigError, Settings};
use std::path::Path;

/// Loads settings once at startup.
///
/// An explicitly passed path must exist. Without one, a missing default file
/// falls back to built-in defaults. Relative paths inside the settings are
/// anchored at the directory holding the config file.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let cwd = current_dir()?;
    let (settings, base) = match explicit {
        Some(path) => {
            let path = cwd.join(path);
            (Settings::from_path(&path)?, config_dir(&path, &cwd))
        }
        None => {
            let env_value = std::env::var(CONFIG_PATH_ENV).ok();
            let path = default_config_path(env_value.as_deref(), &cwd);
            if env_value.is_none() && !path.exists() {
                (Settings::default(), cwd.clone())
            } else {
                (Settings::from_path(&path)?, config_dir(&path, &cwd))
            }
        }
    };

    let mut settings = settings.anchored_at(&base);
    settings.apply_env_overrides(|name| std::env::var(name).ok())?;
    settings.validate()?;
    Ok(settings)
}

fn config_dir(path: &Path, cwd: &Path) -> std::path::PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf())
}
