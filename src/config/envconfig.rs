use std::{collections::HashMap, path::Path};

use ::config as config_rs;
use anyhow::{Context, Result};

use super::{AppConfig, validate};

/// `APP_DATABASE__URL` is read as `database.url`.
pub const ENV_PREFIX: &str = "APP";
pub const ENV_SEPARATOR: &str = "__";

impl AppConfig {
    /// Loads `.env`, reads the `APP_*` variables and validates the result.
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_source(app_environment())
    }

    /// Same as `from_env` over the given variables only. The process
    /// environment and `.env` are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self::from_source(app_environment().source(Some(vars)))
    }

    fn from_source(source: config_rs::Environment) -> Result<Self> {
        let cfg = config_rs::Config::builder()
            .add_source(source)
            .build()
            .context("failed to read APP_* variables")?
            .try_deserialize::<Self>()
            .context("failed to deserialize APP_* variables into config")?;

        validate::validate(&cfg)?;
        Ok(cfg)
    }
}

fn app_environment() -> config_rs::Environment {
    config_rs::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn load_dotenv() {
    // crate root first, then the working directory
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
}
