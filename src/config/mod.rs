pub mod error;
pub mod load;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use load::load_settings;
pub use paths::{
    default_config_path, CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE_NAME, DEFAULT_LOG_FILE,
    DEFAULT_WORKSPACE_DIR,
};
pub use settings::{
    normalize_extension, FileOperationsConfig, LlmConfig, LoggingConfig, SearchConfig, Settings,
    MODEL_ENV, TEMPERATURE_ENV,
};
