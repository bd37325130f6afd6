// ============================================================================
// Auth - Bearer Token Gate
// ============================================================================
//
// Credential check and opaque bearer tokens with TTL expiry. The handler
// layer consumes `AuthenticatedUser` as an extractor; every company route
// requires a live token issued by `POST /api/v1/login`. Token *design* is
// deliberately minimal: handlers only care that a valid token is present.
//
// ============================================================================

use std::collections::HashMap;
use std::future::{ready, Ready};
use std::sync::Mutex;

use actix_web::http::{header, StatusCode};
use actix_web::{dev::Payload, FromRequest, HttpRequest, HttpResponse, ResponseError};
use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

/// Expected login credentials. Only the password digest is retained.
pub struct Credentials {
    username: String,
    password_digest: [u8; 32],
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password_digest: digest(password),
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }
        // Constant-time compare on fixed-width digests.
        constant_time_eq(&digest(password), &self.password_digest)
    }
}

fn digest(input: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hasher.finalize().into()
}

struct Session {
    username: String,
    expires_at: DateTime<Utc>,
}

/// In-memory session store mapping opaque tokens to their expiry.
pub struct TokenStore {
    credentials: Credentials,
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl TokenStore {
    pub fn new(credentials: Credentials, ttl: Duration) -> Self {
        Self {
            credentials,
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Validate credentials and issue a fresh bearer token.
    pub fn login(&self, username: &str, password: &str) -> Option<String> {
        if !self.credentials.verify(username, password) {
            tracing::warn!(username, "login rejected");
            return None;
        }

        let token = Uuid::new_v4().simple().to_string();
        self.sessions.lock().expect("sessions lock poisoned").insert(
            token.clone(),
            Session {
                username: username.to_string(),
                expires_at: Utc::now() + self.ttl,
            },
        );
        tracing::info!(username, "login succeeded");
        Some(token)
    }

    /// Resolve a token to its username, purging it when expired.
    pub fn verify(&self, token: &str) -> Option<String> {
        let mut sessions = self.sessions.lock().expect("sessions lock poisoned");
        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Some(session.username.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }
}

/// Route guard: present on every handler that requires a live token.
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let store = req.app_data::<actix_web::web::Data<TokenStore>>();

        let result = match (store, bearer_token(req)) {
            (Some(store), Some(token)) => match store.verify(&token) {
                Some(username) => Ok(AuthenticatedUser { username }),
                None => Err(AuthError::InvalidToken),
            },
            _ => Err(AuthError::MissingToken),
        };

        ready(result)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(|t| t.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web;

    fn store(ttl_secs: i64) -> TokenStore {
        TokenStore::new(
            Credentials::new("admin", "hunter2"),
            Duration::seconds(ttl_secs),
        )
    }

    #[test]
    fn login_issues_verifiable_token() {
        let store = store(60);
        let token = store.login("admin", "hunter2").unwrap();
        assert_eq!(store.verify(&token).as_deref(), Some("admin"));
    }

    #[test]
    fn wrong_credentials_are_rejected() {
        let store = store(60);
        assert!(store.login("admin", "wrong").is_none());
        assert!(store.login("root", "hunter2").is_none());
    }

    #[test]
    fn expired_token_is_purged() {
        let store = store(-1);
        let token = store.login("admin", "hunter2").unwrap();
        assert!(store.verify(&token).is_none());
        // Second lookup hits the purged map, not the expiry branch.
        assert!(store.verify(&token).is_none());
    }

    #[test]
    fn unknown_token_is_rejected() {
        let store = store(60);
        assert!(store.verify("not-a-token").is_none());
    }

    #[tokio::test]
    async fn extractor_accepts_live_token_and_rejects_garbage() {
        let tokens = web::Data::new(store(60));
        let token = tokens.login("admin", "hunter2").unwrap();

        let req = actix_web::test::TestRequest::default()
            .app_data(tokens.clone())
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_http_request();
        let user = AuthenticatedUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(user.username, "admin");

        let req = actix_web::test::TestRequest::default()
            .app_data(tokens.clone())
            .insert_header((header::AUTHORIZATION, "Bearer bogus"))
            .to_http_request();
        let err = AuthenticatedUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));

        let req = actix_web::test::TestRequest::default()
            .app_data(tokens)
            .to_http_request();
        let err = AuthenticatedUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }
}
