use std::future::Future;

use reqwest::StatusCode;

pub use auth::{fetch_access_token, AccessToken};
pub use credentials::Credentials;
pub use now_playing::NowPlaying;

use crate::config::{Config, Settings};
use crate::logging::ResponseLogger;
use crate::poller::NowPlayingSource;
use crate::{Error, FetchError};
use response::CurrentlyPlaying;

pub mod auth;
mod credentials;
mod now_playing;
pub mod response;

/// Client for the token and playback-status endpoints.
///
/// No token is kept between calls: every [`Spotify::fetch_now_playing`] starts with a
/// fresh refresh-token exchange.
#[derive(Debug, Clone)]
pub struct Spotify {
    client: reqwest::Client,
    config: Config,
}

impl Spotify {
    pub fn new(config: Config, settings: &Settings) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(Error::config)?;

        Ok(Self { client, config })
    }

    pub async fn access_token(&self) -> Result<AccessToken, Error> {
        fetch_access_token(
            &self.client,
            &self.config.token_endpoint,
            &self.config.credentials,
        )
        .await
    }

    /// Get the track that is playing right now.
    ///
    /// Failures are logged here and returned to the caller, never raised further.
    pub async fn fetch_now_playing(&self) -> Result<NowPlaying, Error> {
        let result = self.try_fetch_now_playing().await;
        if let Err(err) = &result {
            log::warn!("Error fetching currently playing song: {err}");
        }
        result
    }

    async fn try_fetch_now_playing(&self) -> Result<NowPlaying, Error> {
        let token = self.access_token().await?;

        let response = self
            .client
            .get(self.config.now_playing_endpoint.clone())
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(Error::request)?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response
                .text()
                .await
                .unwrap_or_else(|err| format!("<unreadable body: {err}>"));
            ResponseLogger::log_error(status, &body);
            return Err(Error::Fetch(FetchError::UnableToFetch));
        }
        if status == StatusCode::NO_CONTENT {
            return Err(Error::Fetch(FetchError::NotPlaying));
        }

        let body = response.text().await.map_err(Error::request)?;
        let jd = &mut serde_json::Deserializer::from_str(&body);
        let playing: CurrentlyPlaying = serde_path_to_error::deserialize(jd).map_err(|err| {
            ResponseLogger::log_error(status, &body);
            Error::parse(err)
        })?;

        NowPlaying::try_from(playing)
    }
}

impl NowPlayingSource for Spotify {
    fn now_playing(&self) -> impl Future<Output = Result<NowPlaying, Error>> + Send {
        self.fetch_now_playing()
    }
}
