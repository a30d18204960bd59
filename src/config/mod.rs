//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingBackend, EmbeddingSettings, LogFormat, LoggingConfig,
    DEFAULT_API_KEY_ENV,
};
