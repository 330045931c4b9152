pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{AppConfig, DatabaseConfig, GeneralConfig, LoggingConfig};
pub use envconfig::{ENV_PREFIX, ENV_SEPARATOR};
