use std::collections::HashMap;
use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::MailchimpConfig;
use crate::mailchimp_client::MailchimpClient;

/// Global configuration, loaded from `configuration/*.yaml`. See
/// `get_configuration`.
#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub mailchimp: MailchimpSettings,

    #[serde(default)]
    pub forms: FormSettings,
}

/// Connector config per form handle. Submissions for forms not listed here
/// are processed with an empty config (and thus only logged).
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(transparent)]
pub struct FormSettings(HashMap<String, MailchimpConfig>);

/// Server configuration
#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    /// Should be localhost on dev machine, 0.0.0.0 on prod
    pub host: String,

    /// 0 lets the OS pick a port (tests)
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

/// Settings shared by every form's connector
#[derive(Deserialize, Clone, Debug)]
pub struct MailchimpSettings {
    /// May contain `{dc}`, which is replaced by the datacenter of each form's
    /// API key
    pub api_base_url: String,

    #[serde(
        default = "default_timeout",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub timeout_milliseconds: u64,
}

fn default_timeout() -> u64 { 10_000 }

impl MailchimpSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }

    pub fn client(&self) -> MailchimpClient {
        MailchimpClient::new(self.api_base_url.clone(), self.timeout())
    }
}

impl FormSettings {
    /// Config for a given form; the default (empty) config if none was set
    pub fn get(
        &self,
        handle: &str,
    ) -> MailchimpConfig {
        // `config` lowercases keys
        self.0
            .get(handle)
            .or_else(|| self.0.get(&handle.to_lowercase()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn insert(
        &mut self,
        handle: &str,
        config: MailchimpConfig,
    ) {
        self.0.insert(handle.to_string(), config);
    }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("Invalid environment: {e}")),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`: first
/// `base.yaml`, then `local.yaml` or `production.yaml` depending on
/// `APP_ENVIRONMENT` (default `local`), then `APP_`-prefixed env vars.
///
/// Env vars use `__` to descend into sections, e.g.
/// `APP_APPLICATION__PORT=5001` -> `Settings.application.port`, and
/// `APP_FORMS__CONTACT__LIST_ID=abc` -> `Settings.forms["contact"].list_id`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Foreign(Box::new(e)))?
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            // env vars are always parsed as String; `serde-aux` handles the
            // numeric fields
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
