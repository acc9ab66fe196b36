use super::paths::{anchor, DEFAULT_LOG_FILE, DEFAULT_WORKSPACE_DIR};
use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MODEL_ENV: &str = "LLM_MODELEND";
pub const TEMPERATURE_ENV: &str = "LLM_TEMPERATURE";

const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[".txt", ".md", ".pdf", ".doc", ".docx"];
const DEFAULT_EXCLUDE_DIRS: &[&str] = &[".git", "__pycache__", "node_modules"];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,
    #[serde(default)]
    pub file_operations: FileOperationsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileOperationsConfig {
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: Option<usize>,
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_max_log_size")]
    pub max_log_size: u64,
    #[serde(default = "default_backup_count")]
    pub backup_count: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_workspace_root() -> PathBuf {
    PathBuf::from(DEFAULT_WORKSPACE_DIR)
}

fn default_allowed_extensions() -> Vec<String> {
    DEFAULT_ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_max_file_size() -> u64 {
    100 * 1024 * 1024
}

fn default_max_depth() -> Option<usize> {
    Some(5)
}

fn default_exclude_dirs() -> Vec<String> {
    DEFAULT_EXCLUDE_DIRS.iter().map(|dir| dir.to_string()).collect()
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_max_log_size() -> u64 {
    10 * 1024 * 1024
}

fn default_backup_count() -> u32 {
    5
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workspace_root: default_workspace_root(),
            file_operations: FileOperationsConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for FileOperationsConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            max_log_size: default_max_log_size(),
            backup_count: default_backup_count(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.0,
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Lowercases an allow-list entry and adds the leading dot, so `TXT`, `.txt`
/// and `.Txt` all compare equal.
pub fn normalize_extension(raw: &str) -> String {
    let trimmed = raw.trim().to_ascii_lowercase();
    if trimmed.is_empty() || trimmed.starts_with('.') {
        trimmed
    } else {
        format!(".{trimmed}")
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn anchored_at(mut self, base: &Path) -> Self {
        self.workspace_root = anchor(base, &self.workspace_root);
        self.logging.log_file = anchor(base, &self.logging.log_file);
        self
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.llm.model = Some(model.trim().to_string());
        }
        if let Some(raw) = lookup(TEMPERATURE_ENV).filter(|v| !v.trim().is_empty()) {
            self.llm.temperature =
                raw.trim()
                    .parse::<f32>()
                    .map_err(|err| ConfigError::InvalidEnv {
                        name: TEMPERATURE_ENV.to_string(),
                        value: raw.clone(),
                        reason: err.to_string(),
                    })?;
        }
        Ok(())
    }

    pub fn allowed_extensions(&self) -> Vec<String> {
        let mut normalized: Vec<String> = self
            .file_operations
            .allowed_extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .collect();
        normalized.sort();
        normalized.dedup();
        normalized
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workspace_root.as_os_str().is_empty() {
            return Err(ConfigError::Settings(
                "`workspace_root` must be non-empty".to_string(),
            ));
        }
        if self.file_operations.max_file_size == 0 {
            return Err(ConfigError::Settings(
                "`file_operations.max_file_size` must be > 0".to_string(),
            ));
        }
        for ext in &self.file_operations.allowed_extensions {
            let normalized = normalize_extension(ext);
            if normalized.len() < 2 || normalized[1..].contains(['.', '/', '\\']) {
                return Err(ConfigError::Settings(format!(
                    "`file_operations.allowed_extensions` entry `{ext}` is not a single extension"
                )));
            }
        }
        if self.search.max_depth == Some(0) {
            return Err(ConfigError::Settings(
                "`search.max_depth` must be > 0 or null".to_string(),
            ));
        }
        for dir in &self.search.exclude_dirs {
            if dir.trim().is_empty() || dir.contains(['/', '\\']) {
                return Err(ConfigError::Settings(format!(
                    "`search.exclude_dirs` entry `{dir}` must be a directory name"
                )));
            }
        }
        if self.logging.log_file.as_os_str().is_empty() {
            return Err(ConfigError::Settings(
                "`logging.log_file` must be non-empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Settings(
                "`llm.temperature` must be within 0.0..=2.0".to_string(),
            ));
        }
        if self.llm.api_base.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`llm.api_base` must be non-empty".to_string(),
            ));
        }
        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::Settings(
                "`llm.timeout_seconds` must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn empty_document_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").expect("parse settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.search.max_depth, Some(5));
        assert_eq!(settings.logging.backup_count, 5);
        settings.validate().expect("defaults validate");
    }

    #[test]
    fn explicit_null_depth_means_unbounded() {
        let settings: Settings = serde_yaml::from_str(
            r#"
workspace_root: /tmp/ws
search:
  max_depth: null
  exclude_dirs: [target]
"#,
        )
        .expect("parse settings");
        assert_eq!(settings.search.max_depth, None);
        assert_eq!(settings.search.exclude_dirs, vec!["target".to_string()]);
    }

    #[test]
    fn allowed_extensions_are_normalized_and_deduplicated() {
        let settings: Settings = serde_yaml::from_str(
            r#"
file_operations:
  allowed_extensions: [TXT, .txt, ".Md"]
"#,
        )
        .expect("parse settings");
        assert_eq!(
            settings.allowed_extensions(),
            vec![".md".to_string(), ".txt".to_string()]
        );
    }

    #[test]
    fn validation_rejects_compound_extension() {
        let settings: Settings = serde_yaml::from_str(
            r#"
file_operations:
  allowed_extensions: [.tar.gz]
"#,
        )
        .expect("parse settings");
        let err = settings.validate().expect_err("compound extension");
        assert!(err.to_string().contains(".tar.gz"));
    }

    #[test]
    fn validation_rejects_zero_depth_and_nested_exclude() {
        let mut settings = Settings::default();
        settings.search.max_depth = Some(0);
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.search.exclude_dirs = vec!["a/b".to_string()];
        assert!(settings.validate().is_err());
    }

    #[test]
    fn env_overrides_set_model_and_temperature() {
        let env = BTreeMap::from([
            (MODEL_ENV.to_string(), "gpt-test".to_string()),
            (TEMPERATURE_ENV.to_string(), "0.7".to_string()),
        ]);
        let mut settings = Settings::default();
        settings
            .apply_env_overrides(|name| env.get(name).cloned())
            .expect("overrides");
        assert_eq!(settings.llm.model.as_deref(), Some("gpt-test"));
        assert!((settings.llm.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_temperature_env_is_reported() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env_overrides(|name| {
                (name == TEMPERATURE_ENV).then(|| "warm".to_string())
            })
            .expect_err("invalid temperature");
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn anchoring_keeps_absolute_paths() {
        let mut settings = Settings::default();
        settings.workspace_root = PathBuf::from("/srv/ws");
        let anchored = settings.anchored_at(Path::new("/etc/agent"));
        assert_eq!(anchored.workspace_root, PathBuf::from("/srv/ws"));
        assert_eq!(
            anchored.logging.log_file,
            PathBuf::from("/etc/agent/logs/file_agent.log")
        );
    }
}
