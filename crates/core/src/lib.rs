pub mod config;
pub mod config_loader;
pub mod traits;

pub use config::{
    AnalysisConfig, AppConfig, CollectorConfig, ConfigError, OutputConfig, ProcessingConfig,
};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH, ENV_PREFIX};
pub use traits::{PostSource, SignalRenderer};
