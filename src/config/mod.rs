//! Builds an `AppConfig` by layering configuration sources with `figment`.
//!
//! Sources, later ones win:
//! 1. `config/base.toml`
//! 2. `config/{environment}.toml`, where the environment comes from `APP_ENVIRONMENT`
//! 3. `APP_` prefixed environment variables, `__` separates nested keys
//! 4. `DYNAMODB_TABLE`, which selects the table waitlist entries are written to
//! 5. `DATABASE_URL`, required in production, replaces `db_config`

mod error;
mod types;

use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use types::{
    AppConfig, DbConfig, Environment, NetConfig, SslRequire, StoreBackend, StoreConfig,
    TableName, DEFAULT_TABLE_NAME,
};

pub const ENVIRONMENT_ENV_VAR: &str = "APP_ENVIRONMENT";
pub const TABLE_ENV_VAR: &str = "DYNAMODB_TABLE";
pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";

impl Environment {
    /// Reads `APP_ENVIRONMENT`, defaults to `Local` when it is not set.
    pub fn from_env() -> ConfigResult<Self> {
        std::env::var(ENVIRONMENT_ENV_VAR)
            .unwrap_or_else(|_| "local".into())
            .try_into()
    }
}

impl AppConfig {
    /// Loads the configuration from the `config` directory in the current working directory.
    pub fn from_env() -> ConfigResult<Self> {
        let environment = Environment::from_env()?;
        let config_dir = std::env::current_dir()?.join("config");

        Self::load(&config_dir, environment)
    }

    pub fn load(config_dir: &Path, environment: Environment) -> ConfigResult<Self> {
        info!(
            "{:<20} - Loading the {} configuration",
            "load_config",
            environment.as_ref()
        );
        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        let mut config: AppConfig = Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment_filename)))
            .merge(Env::prefixed("APP_").split("__"))
            .merge(
                Env::raw()
                    .only(&[TABLE_ENV_VAR])
                    .map(|_| "store_config.table_name".into()),
            )
            .extract()?;

        if matches!(environment, Environment::Production) {
            let production_db = std::env::var(DATABASE_URL_ENV_VAR)
                .map_err(|_| ConfigError::MissingEnv(DATABASE_URL_ENV_VAR))?;
            config.db_config = production_db.parse()?;
        }

        Ok(config)
    }
}
