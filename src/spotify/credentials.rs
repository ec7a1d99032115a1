use std::fmt::{Debug, Formatter};

use base64::Engine;

/// Application id/secret pair plus the long-lived refresh token of the listening user.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(client_id: &str, client_secret: &str, refresh_token: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            refresh_token: refresh_token.to_string(),
        }
    }

    /// `base64(client_id:client_secret)` for the `Authorization: Basic` header
    pub fn auth(&self) -> String {
        let auth = format!("{}:{}", self.client_id, self.client_secret);

        base64::engine::general_purpose::STANDARD.encode(auth.as_bytes())
    }
}

// Secrets stay out of logs and panic messages
impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}
