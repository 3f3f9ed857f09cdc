//! OpenAM session-token acquisition.

use gridgate_types::{ChunkBuffer, GatewayError};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::{GatewayClient, collect_response};

/// Environment variable holding the PJM account name.
pub const USERNAME_VAR: &str = "PJM_USERNAME";

/// Environment variable holding the PJM account password.
pub const PASSWORD_VAR: &str = "PJM_PASSWORD";

/// Errors that can occur during authentication.
///
/// Authentication failure is fatal to the whole run: no query exchange
/// can proceed without a session token.
#[derive(Error, Debug)]
pub enum AuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The login endpoint returned an error status.
    #[error("login rejected with HTTP status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The login response body is not valid JSON.
    #[error("unparseable login response: {0}")]
    Json(#[from] serde_json::Error),

    /// The login response carries no `tokenId` field.
    #[error("login response has no tokenId")]
    MissingToken,
}

/// Operator credentials read from the environment.
#[derive(Clone)]
pub struct Credentials {
    /// PJM account name.
    pub username: String,
    password: String,
}

impl Credentials {
    /// Creates credentials from explicit values.
    #[must_use]
    pub const fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Reads credentials from `PJM_USERNAME` and `PJM_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingCredentials`] naming the first
    /// absent variable. Absent credentials are surfaced before any
    /// network call, never passed to the gateway as empty strings.
    pub fn from_env() -> Result<Self, GatewayError> {
        let read = |var: &str| {
            std::env::var(var).map_err(|_| GatewayError::MissingCredentials {
                var: var.to_owned(),
            })
        };
        Ok(Self {
            username: read(USERNAME_VAR)?,
            password: read(PASSWORD_VAR)?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"******")
            .finish()
    }
}

/// Short-lived session token obtained once per run and reused for all
/// query exchanges.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// The raw token value, as placed in the session cookie.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(******)")
    }
}

/// Wire shape of the OpenAM login response.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default, rename = "tokenId")]
    token_id: Option<String>,
}

/// Extracts the session token from a login response body.
///
/// The body is parsed as JSON rather than pattern-scanned, so field
/// order and the presence of other fields do not matter.
///
/// # Errors
///
/// Returns an error if the body is not JSON or the `tokenId` field is
/// absent or empty.
pub fn extract_token(body: &[u8]) -> Result<SessionToken, AuthError> {
    let response: LoginResponse = serde_json::from_slice(body)?;
    match response.token_id {
        Some(token) if !token.is_empty() => Ok(SessionToken(token)),
        _ => Err(AuthError::MissingToken),
    }
}

/// Performs the login exchange and returns the session token.
///
/// One HTTP POST with the credentials in the `X-OpenAM-Username` and
/// `X-OpenAM-Password` headers and an empty body; the response is
/// materialized into a [`ChunkBuffer`] and the token extracted from it.
///
/// # Errors
///
/// Returns an error on transport failure, a non-success status, or a
/// response without a usable `tokenId`.
pub async fn authenticate(
    client: &GatewayClient,
    credentials: &Credentials,
) -> Result<SessionToken, AuthError> {
    let url = client.environment().sso_url();
    debug!(url, username = %credentials.username, "requesting session token");

    let response = client
        .http()
        .post(url)
        .header("X-OpenAM-Username", &credentials.username)
        .header("X-OpenAM-Password", &credentials.password)
        .body("")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuthError::Status {
            status: status.as_u16(),
        });
    }

    let mut body = ChunkBuffer::new();
    collect_response(response, &mut body).await?;

    let token = extract_token(body.as_slice())?;
    info!(environment = %client.environment(), "session token acquired");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_from_full_response() {
        let body = br#"{"tokenId":"AQIC5wM2LY4Sfcw","successUrl":"/access/console","realm":"/"}"#;
        let token = extract_token(body).unwrap();
        assert_eq!(token.as_str(), "AQIC5wM2LY4Sfcw");
    }

    #[test]
    fn test_extract_token_ignores_field_order() {
        let body = br#"{"realm":"/","tokenId":"tok123"}"#;
        assert_eq!(extract_token(body).unwrap().as_str(), "tok123");
    }

    #[test]
    fn test_extract_token_missing_field() {
        let body = br#"{"successUrl":"/access/console","realm":"/"}"#;
        assert!(matches!(extract_token(body), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_extract_token_empty_value() {
        let body = br#"{"tokenId":""}"#;
        assert!(matches!(extract_token(body), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_extract_token_non_json_body() {
        let body = b"<html>maintenance</html>";
        assert!(matches!(extract_token(body), Err(AuthError::Json(_))));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("trader1".into(), "hunter2".into());
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("trader1"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_session_token_debug_is_redacted() {
        let token = extract_token(br#"{"tokenId":"secret"}"#).unwrap();
        assert!(!format!("{token:?}").contains("secret"));
    }
}
