use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Local, TimeDelta};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;

use super::Credentials;
use crate::logging::ResponseLogger;
use crate::Error;

/// Short-lived bearer token returned by the token endpoint.
///
/// Only `access_token` is required; the other fields are filled in when the provider
/// sends them.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub scopes: HashSet<String>,
    pub expires: Option<DateTime<Local>>,
}

impl FromStr for AccessToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let object: Value = serde_json::from_str(s)
            .map_err(|err| Error::auth(format!("token response is not json: {err}")))?;

        Ok(Self {
            access_token: object
                .get("access_token")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::auth("token response is missing access_token"))?
                .to_string(),
            token_type: object
                .get("token_type")
                .and_then(Value::as_str)
                .unwrap_or("Bearer")
                .to_string(),
            scopes: object
                .get("scope")
                .and_then(Value::as_str)
                .map(|scope| {
                    scope
                        .split(' ')
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            expires: object
                .get("expires_in")
                .and_then(Value::as_i64)
                .and_then(expires_at),
        })
    }
}

/// Expiry `seconds` from now, `None` when it falls outside the representable range
fn expires_at(seconds: i64) -> Option<DateTime<Local>> {
    TimeDelta::try_seconds(seconds).and_then(|delta| Local::now().checked_add_signed(delta))
}

#[derive(Deserialize)]
struct TokenErrorBody {
    error: String,
    error_description: Option<String>,
}

fn describe_token_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<TokenErrorBody>(body) {
        Ok(TokenErrorBody {
            error,
            error_description: Some(description),
        }) => format!("{status}: {error} ({description})"),
        Ok(TokenErrorBody { error, .. }) => format!("{status}: {error}"),
        Err(_) => status.to_string(),
    }
}

/// Exchange the refresh token for a new access token.
///
/// A transport failure, an error status, or a body without `access_token` all come
/// back as [`Error::Auth`].
pub async fn fetch_access_token(
    client: &reqwest::Client,
    endpoint: &Url,
    credentials: &Credentials,
) -> Result<AccessToken, Error> {
    let body = serde_urlencoded::to_string([
        ("grant_type", "refresh_token"),
        ("refresh_token", credentials.refresh_token.as_str()),
    ])
    .map_err(Error::auth)?;

    log::debug!("Requesting access token from {endpoint}");
    let response = client
        .post(endpoint.clone())
        .header("Authorization", format!("Basic {}", credentials.auth()))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .map_err(Error::auth)?;

    let status = response.status();
    let body = response.text().await.map_err(Error::auth)?;

    if !status.is_success() {
        ResponseLogger::log_error(status, &body);
        return Err(Error::auth(describe_token_error(status, &body)));
    }

    AccessToken::from_str(&body)
}
