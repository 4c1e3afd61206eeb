use anyhow::Context as _;
use kb_client_core::ClientSettings;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::{
    convert::{TryFrom, TryInto},
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Configuration {
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub session: SessionSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_ms: u64,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct StorageSettings {
    /// JSON file used as durable storage for the session
    pub path: PathBuf,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct SessionSettings {
    /// If false a 401 only removes the token and keeps the stored identity
    pub unauthorized_clears_identity: bool,
}

impl Configuration {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            server_address: self.api.base_url.clone(),
            timeout: Duration::from_millis(self.api.timeout_ms),
            unauthorized_clears_identity: self.session.unauthorized_clears_identity,
        }
    }
}

/// Loads `base.toml` then the file for the environment in `APP_ENVIRONMENT`
/// (default `local`) then environment variables prefixed with `APP_`
pub fn get_configuration(configuration_directory: &Path) -> anyhow::Result<Configuration> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("failed to parse APP_ENVIRONMENT")?;
    load_configuration(configuration_directory, environment)
}

pub fn load_configuration(
    configuration_directory: &Path,
    environment: Environment,
) -> anyhow::Result<Configuration> {
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.toml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_API__BASE_URL=http://10.0.0.2:8000` would set `Configuration.api.base_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("failed to load configuration from {configuration_directory:?}"))?;

    settings
        .try_deserialize::<Configuration>()
        .context("configuration is not valid")
}

/// The possible runtime environment for our application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
