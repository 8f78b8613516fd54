pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to build the 'Environment' from the provided string: {0}")]
    StringToEnvironmentFail(String),
    #[error("failed to parse 'DbConfig' from the provided string.")]
    StringToDbConfigFail,
    #[error("invalid table name: '{0}'")]
    InvalidTableName(String),
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("figment extraction error: {0}")]
    Figment(#[from] figment::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
