//! UAA password-grant client.

use super::connection::{user_agent, ConnectionConfig};
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UaaError {
    #[error("{message}")]
    BadCredentials { message: String },

    #[error("{message}")]
    InsufficientScope { message: String },

    #[error("{message}")]
    InvalidAuthToken { message: String },

    #[error("Unexpected UAA response (status {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("{message}")]
    Request { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: String,
}

impl Tokens {
    /// The `Authorization` header value, e.g. `bearer eyJ...`.
    pub fn authorization(&self) -> String {
        let kind = if self.token_type.is_empty() {
            "bearer"
        } else {
            self.token_type.as_str()
        };
        format!("{} {}", kind.to_ascii_lowercase(), self.access_token)
    }
}

pub trait UaaClient {
    fn authenticate(&self, username: &str, password: &str) -> Result<Tokens, UaaError>;
}

impl<T: UaaClient + ?Sized> UaaClient for &T {
    fn authenticate(&self, username: &str, password: &str) -> Result<Tokens, UaaError> {
        (**self).authenticate(username, password)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

pub fn uaa_error(status: u16, body: &str) -> UaaError {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let (code, message) = parsed
        .map(|b| (b.error, b.error_description))
        .unwrap_or_default();
    match (status, code.as_str()) {
        (401, "invalid_token") => UaaError::InvalidAuthToken { message },
        (401, "unauthorized") => UaaError::BadCredentials { message },
        (403, "insufficient_scope") => UaaError::InsufficientScope { message },
        _ => UaaError::UnexpectedResponse {
            status,
            body: body.to_string(),
        },
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    uaa_url: String,
    client_id: String,
    client_secret: String,
}

impl Client {
    pub fn new(
        uaa_url: &str,
        client_id: &str,
        client_secret: &str,
        config: &ConnectionConfig,
    ) -> Result<Self, UaaError> {
        let http = HttpClient::builder()
            .user_agent(user_agent())
            .connect_timeout(config.dial_timeout)
            .danger_accept_invalid_certs(config.skip_ssl_validation)
            .build()
            .map_err(|e| UaaError::Request {
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            uaa_url: uaa_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }
}

impl UaaClient for Client {
    fn authenticate(&self, username: &str, password: &str) -> Result<Tokens, UaaError> {
        let url = format!("{}/oauth/token", self.uaa_url);
        debug!(url = %url, username, password = "[PRIVATE DATA HIDDEN]", "UAA REQUEST");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ])
            .send()
            .map_err(|e| UaaError::Request {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| UaaError::Request {
            message: e.to_string(),
        })?;
        debug!(status, "UAA RESPONSE");

        if status >= 400 {
            return Err(uaa_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| UaaError::UnexpectedResponse {
            status,
            body: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_oauth_error_codes() {
        let body = r#"{"error": "unauthorized", "error_description": "Bad credentials"}"#;
        assert_eq!(
            uaa_error(401, body),
            UaaError::BadCredentials {
                message: "Bad credentials".into()
            }
        );

        let body = r#"{"error": "invalid_token", "error_description": "expired"}"#;
        assert!(matches!(
            uaa_error(401, body),
            UaaError::InvalidAuthToken { .. }
        ));

        let body = r#"{"error": "insufficient_scope", "error_description": "scope"}"#;
        assert!(matches!(
            uaa_error(403, body),
            UaaError::InsufficientScope { .. }
        ));

        assert!(matches!(
            uaa_error(500, "boom"),
            UaaError::UnexpectedResponse { status: 500, .. }
        ));
    }

    #[test]
    fn authorization_header_is_lowercase_bearer() {
        let tokens = Tokens {
            access_token: "abc".into(),
            token_type: "Bearer".into(),
            ..Tokens::default()
        };
        assert_eq!(tokens.authorization(), "bearer abc");
    }
}
