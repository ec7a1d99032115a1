use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::spotify::Credentials;
use crate::Error;

/// Raw environment variables, lower-cased by envy
#[derive(Deserialize)]
struct Environment {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_endpoint: String,
    now_playing_endpoint: String,
}

/// Everything needed to talk to the provider. Built once at startup and handed to
/// [`Spotify`](crate::Spotify).
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub token_endpoint: Url,
    pub now_playing_endpoint: Url,
}

impl Config {
    pub fn new(
        credentials: Credentials,
        token_endpoint: &str,
        now_playing_endpoint: &str,
    ) -> Result<Self, Error> {
        Ok(Self {
            credentials,
            token_endpoint: parse_endpoint("TOKEN_ENDPOINT", token_endpoint)?,
            now_playing_endpoint: parse_endpoint("NOW_PLAYING_ENDPOINT", now_playing_endpoint)?,
        })
    }

    /// Read the configuration from the process environment, seeded from a `.env` file
    /// in the working directory when one exists.
    pub fn from_env() -> Result<Self, Error> {
        if let Err(err) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {err}");
        }
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env = envy::from_iter::<_, Environment>(vars).map_err(|err| match &err {
            envy::Error::MissingValue(field) => {
                Error::config(format!("missing environment variable {}", field.to_uppercase()))
            }
            _ => Error::config(&err),
        })?;

        Self::new(
            Credentials {
                client_id: env.client_id,
                client_secret: env.client_secret,
                refresh_token: env.refresh_token,
            },
            &env.token_endpoint,
            &env.now_playing_endpoint,
        )
    }
}

fn parse_endpoint(name: &str, value: &str) -> Result<Url, Error> {
    Url::parse(value).map_err(|err| Error::config(format!("{name} is not a valid url ({err}): {value}")))
}

/// Polling settings, optionally read from a yaml file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Milliseconds between poll ticks
    pub interval_ms: u64,
    /// Upper bound for a single http request
    pub timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            timeout_ms: 10_000,
        }
    }
}

impl Settings {
    /// Load the first settings file that exists, or the defaults if none do
    pub fn load_with_fallback<const N: usize>(paths: [&str; N]) -> Result<Self, Error> {
        match paths.into_iter().map(PathBuf::from).find(|path| path.exists()) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| Error::config(format!("{}: {err}", path.display())))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, Error> {
        // An empty document deserializes to unit, not to a map of defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(content).map_err(Error::config)?;
        settings.validate()
    }

    pub fn with_interval_ms(self, interval_ms: u64) -> Result<Self, Error> {
        Self { interval_ms, ..self }.validate()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(self) -> Result<Self, Error> {
        if self.interval_ms == 0 {
            return Err(Error::config("interval_ms must be greater than zero"));
        }
        if self.timeout_ms == 0 {
            return Err(Error::config("timeout_ms must be greater than zero"));
        }
        Ok(self)
    }
}
