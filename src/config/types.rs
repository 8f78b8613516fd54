//! The configuration structs used to build the `AppConfig`, and their impls.
use std::str::FromStr;

use lazy_regex::{regex_captures, regex_is_match};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::{
    postgres::{PgConnectOptions, PgSslMode},
    ConnectOptions,
};
use strum_macros::AsRefStr;

use crate::config::{ConfigError, ConfigResult};

/// Table the waitlist entries get written to when `DYNAMODB_TABLE` is not set.
pub const DEFAULT_TABLE_NAME: &str = "fillflow-waitlist";

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub db_config: DbConfig,
    #[serde(default)]
    pub store_config: StoreConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DbConfig {
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub db_name: String,
    #[serde(default)]
    pub require_ssl: SslRequire,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SslRequire {
    #[default]
    Prefer,
    Require,
    Disable,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub table_name: TableName,
    /// Run `CREATE TABLE IF NOT EXISTS` for `table_name` on startup.
    pub create_table: bool,
}

/// Which `WaitlistStore` implementation the application is built with.
#[derive(Deserialize, AsRefStr, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

/// A table name that is safe to quote into an SQL statement.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct TableName(String);

// ###################################
// ->   IMPLs
// ###################################
impl TableName {
    pub fn parse<S: AsRef<str>>(value: S) -> ConfigResult<Self> {
        let value = value.as_ref();
        if regex_is_match!(r"^[A-Za-z_][A-Za-z0-9_\-]{0,62}$", value) {
            Ok(TableName(value.to_owned()))
        } else {
            Err(ConfigError::InvalidTableName(value.to_owned()))
        }
    }
}

impl Default for TableName {
    fn default() -> Self {
        TableName(DEFAULT_TABLE_NAME.to_owned())
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl DbConfig {
    pub fn connection_options(&self) -> PgConnectOptions {
        // Don't try to use the '$HOME/.pgpass' file.
        PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .database(&self.db_name)
            .ssl_mode(self.require_ssl.into())
            .log_statements(tracing::log::LevelFilter::Trace)
    }
}

impl From<SslRequire> for PgSslMode {
    fn from(value: SslRequire) -> Self {
        match value {
            SslRequire::Require => PgSslMode::Require,
            SslRequire::Disable => PgSslMode::Disable,
            SslRequire::Prefer => PgSslMode::Prefer,
        }
    }
}

// ###################################
// ->   TRY FROMs
// ###################################
impl TryFrom<String> for TableName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TableName::parse(value)
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}

impl FromStr for DbConfig {
    type Err = ConfigError;

    /// Parses `postgres://{username}:{password}@{hostname}:{port}/{database}?{options}`
    /// The only option that is recognized is `sslmode`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (_whole, username, password, host, port, db_name, options) = regex_captures!(
            r#"^postgres(?:ql)?:\/\/([^:]+):([^@]+)@([^:\/]+):(\d+)\/([^\s\/?]+)(\?[^\s]*)?$"#,
            value
        )
        .ok_or(ConfigError::StringToDbConfigFail)?;

        let port = port.parse().map_err(|_| ConfigError::StringToDbConfigFail)?;

        let require_ssl = options
            .strip_prefix('?')
            .into_iter()
            .flat_map(|options| options.split(['&', ',']))
            .filter_map(|option| option.split_once('='))
            .filter(|(id, _)| *id == "sslmode")
            .fold(SslRequire::default(), |current, (_, val)| match val {
                "disable" => SslRequire::Disable,
                "require" => SslRequire::Require,
                _ => current,
            });

        Ok(DbConfig {
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
            port,
            host: host.to_string(),
            db_name: db_name.to_string(),
            require_ssl,
        })
    }
}
