use std::fmt::{Display, Formatter};

use color_eyre::{Report, Section};

/// Failure classes of the playback-status request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchError {
    /// The status endpoint answered with 400 or above
    UnableToFetch,
    /// The status endpoint answered with 204
    NotPlaying,
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::UnableToFetch => write!(f, "Unable to Fetch Song"),
            FetchError::NotPlaying => write!(f, "Currently Not Playing"),
        }
    }
}

/// Every way that loading configuration or fetching the current track can fail.
///
/// The error is `Clone` so a poll result can be handed to any number of observers.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Config(String),
    Auth(String),
    Fetch(FetchError),
    Parse(String),
    Request(String),
}

impl Error {
    pub fn config<S: Display>(message: S) -> Self {
        Error::Config(message.to_string())
    }

    pub fn auth<S: Display>(message: S) -> Self {
        Error::Auth(message.to_string())
    }

    pub fn parse<S: Display>(message: S) -> Self {
        Error::Parse(message.to_string())
    }

    pub fn request<S: Display>(message: S) -> Self {
        Error::Request(message.to_string())
    }

    /// Nothing is playing right now; not a real failure for display purposes
    pub fn is_not_playing(&self) -> bool {
        matches!(self, Error::Fetch(FetchError::NotPlaying))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(message) => write!(f, "invalid configuration: {message}"),
            Error::Auth(message) => write!(f, "token exchange failed: {message}"),
            Error::Fetch(fetch) => write!(f, "{fetch}"),
            Error::Parse(message) => write!(f, "malformed now playing response: {message}"),
            Error::Request(message) => write!(f, "request failed: {message}"),
        }
    }
}

impl From<Error> for Report {
    fn from(value: Error) -> Self {
        let message = value.to_string();
        match value {
            Error::Config(_) => Report::msg(message).suggestion(
                "Set CLIENT_ID, CLIENT_SECRET, REFRESH_TOKEN, TOKEN_ENDPOINT and NOW_PLAYING_ENDPOINT in the environment or a .env file",
            ),
            Error::Auth(_) => Report::msg(message)
                .suggestion("Check the client credentials and that the refresh token has not been revoked"),
            Error::Fetch(FetchError::NotPlaying) => {
                Report::msg(message).suggestion("Start playback on any device and try again")
            }
            Error::Fetch(FetchError::UnableToFetch) => Report::msg(message)
                .suggestion("Make sure the refresh token was granted the user-read-currently-playing scope"),
            Error::Parse(_) => Report::msg(message)
                .suggestion("The item playing may not be a track, e.g. an episode or an advert"),
            Error::Request(_) => Report::msg(message).suggestion("Try again later"),
        }
    }
}
