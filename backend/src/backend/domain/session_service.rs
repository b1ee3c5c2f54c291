//! The authentication gate: configured credentials, opaque bearer tokens.
//!
//! Sessions live for twenty minutes with no refresh; an expired token simply
//! stops authenticating and the caller signs in again. Every attempt is
//! recorded, successful or not.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::backend::domain::commands::sessions::{LoginCommand, LoginResult};
use crate::backend::domain::models::session::{Principal, Session};
use crate::backend::storage::csv::{CsvConnection, LoginAttemptRepository};
use crate::backend::storage::traits::LoginAttemptStore;

/// Session lifetime in minutes, with no auto-refresh.
pub const SESSION_TTL_MINUTES: i64 = 20;

/// One configured account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
    pub display_name: String,
}

/// Service validating credentials and tracking issued sessions.
#[derive(Clone)]
pub struct SessionService {
    credentials: Arc<Vec<Credential>>,
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    attempt_repository: LoginAttemptRepository,
}

impl SessionService {
    pub fn new(connection: CsvConnection, credentials: Vec<Credential>) -> Self {
        let attempt_repository = LoginAttemptRepository::new(connection);
        Self {
            credentials: Arc::new(credentials),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            attempt_repository,
        }
    }

    /// Validate credentials and issue a session on success. A failed attempt
    /// is a normal outcome reported in the result, not an error.
    pub fn login(&self, command: LoginCommand) -> Result<LoginResult> {
        let username = command.username.trim();
        info!("Sign-in attempt for '{}'", username);

        let matched = self
            .credentials
            .iter()
            .find(|c| c.username == username && c.password == command.password);

        match self
            .attempt_repository
            .record_attempt(username, matched.is_some())
        {
            Ok(attempt_id) => info!("Recorded sign-in attempt {}", attempt_id),
            Err(e) => {
                // Keep authenticating even if the log write fails
                warn!("Failed to record sign-in attempt: {}", e);
            }
        }

        let Some(credential) = matched else {
            info!("Sign-in failed for '{}'", username);
            return Ok(LoginResult {
                session: None,
                message: "Invalid username or password".to_string(),
            });
        };

        let now = Utc::now();
        let session = Session {
            token: Session::generate_token(),
            principal: Principal {
                username: credential.username.clone(),
                display_name: credential.display_name.clone(),
            },
            issued_at: now,
            expires_at: now + Duration::minutes(SESSION_TTL_MINUTES),
        };

        self.sessions
            .lock()
            .unwrap()
            .insert(session.token.clone(), session.clone());

        info!("Signed in '{}'", credential.username);
        Ok(LoginResult {
            session: Some(session),
            message: format!("Signed in as {}", credential.display_name),
        })
    }

    /// Resolve a bearer token to its principal. Expired or unknown tokens
    /// yield None; expired sessions are dropped on the way out.
    pub fn authenticate(&self, token: &str) -> Option<Principal> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get(token) {
            Some(session) if session.is_expired(Utc::now()) => {
                sessions.remove(token);
                None
            }
            Some(session) => Some(session.principal.clone()),
            None => None,
        }
    }

    /// Recent sign-in attempts, most recent first.
    pub fn recent_attempts(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<crate::backend::domain::models::session::LoginAttempt>> {
        self.attempt_repository.list_attempts(limit)
    }
}
