//! # Auth Client
//!
//! Sign-in against the remote backend.
//!
//! `POST /login` with `{email, password}` answers `{token, user}`; the
//! backend strips the password from the user record before responding.
//! Wrong or missing credentials come back as a failing status whose
//! message (`"Invalid credentials"`, `"Email and password are required"`)
//! is surfaced verbatim through [`ClientError::Api`].
//!
//! Login is a POST, so the static backend rejects it with the usual
//! write guard — a read-only snapshot has nobody to sign in to.
//!
//! The resulting [`AuthSession`] is held by the presentation layer; this
//! core only ever produces it, never mutates it.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use bookstack_core::types::{AuthSession, User};

use crate::error::ClientResult;
use crate::transport::{Method, RequestOptions, Transport};

/// Resource path for the login endpoint.
const LOGIN: &str = "login";

/// Shape of a successful login response.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: User,
}

/// Issues login requests and builds sessions from the results.
pub struct AuthClient {
    transport: Arc<Transport>,
}

impl AuthClient {
    /// Creates an auth client over a shared transport.
    pub fn new(transport: Arc<Transport>) -> Self {
        AuthClient { transport }
    }

    /// Signs in with email and password.
    ///
    /// Credentials pass through unmodified; the backend decides what is
    /// missing or wrong and its message is surfaced to the caller.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthSession> {
        let body = json!({ "email": email, "password": password });
        let response: LoginResponse = self
            .transport
            .request(Method::Post, LOGIN, RequestOptions::with_body(body))
            .await?
            .decode()?;

        info!(user = %response.user.email, "Signed in");

        Ok(AuthSession {
            token: response.token,
            user: response.user,
            signed_in_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, SnapshotSettings, SourceMode, SourceSettings};

    #[tokio::test]
    async fn test_login_rejected_in_static_mode() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            source: SourceSettings {
                mode: SourceMode::Static,
            },
            snapshot: SnapshotSettings {
                root: dir.path().to_path_buf(),
            },
            ..Default::default()
        };
        let auth = AuthClient::new(Arc::new(Transport::from_config(&config).unwrap()));

        let err = auth.login("admin@bookstack.io", "admin123").await.unwrap_err();
        assert!(err.is_write_rejected());
    }

    #[test]
    fn test_login_response_shape() {
        let json = serde_json::json!({
            "token": "dG9rZW4=",
            "user": { "id": 1, "name": "Store Manager", "email": "admin@bookstack.io", "role": "admin" }
        });
        let response: LoginResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.user.role, "admin");
        assert!(!response.token.is_empty());
    }
}
