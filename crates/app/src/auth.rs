//! Admin identity.
//!
//! Email/password sign-in for the admin surface. The storefront itself
//! never authenticates; an absent session simply hides the admin views.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tokio::sync::watch;

use crate::subscription::Subscription;

/// An authenticated admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
}

/// Errors from the identity collaborator.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email/password pair was not accepted.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The identity backend rejected or failed the operation.
    #[error("identity backend error: {0}")]
    Backend(String),
}

/// Narrow interface to the identity provider.
#[automock]
#[async_trait]
pub trait Identity: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Watch the current session; `None` means signed out.
    async fn watch_session(&self) -> Result<Subscription<Option<Session>>, AuthError>;
}

/// In-memory [`Identity`] with a fixed credential table, for tests and
/// local development.
#[derive(Debug)]
pub struct MemoryIdentity {
    credentials: FxHashMap<String, String>,
    session: watch::Sender<Option<Session>>,
    // Keeps the channel open; `watch::Sender::send` drops the value when
    // no receiver exists.
    _session_rx: watch::Receiver<Option<Session>>,
}

impl MemoryIdentity {
    /// Build an identity provider accepting the given email/password pairs.
    #[must_use]
    pub fn new(credentials: impl IntoIterator<Item = (String, String)>) -> Self {
        let (session, _session_rx) = watch::channel(None);

        Self {
            credentials: credentials.into_iter().collect(),
            session,
            _session_rx,
        }
    }
}

#[async_trait]
impl Identity for MemoryIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        match self.credentials.get(email) {
            Some(expected) if expected == password => {
                let session = Session {
                    email: email.to_string(),
                };

                _ = self.session.send(Some(session.clone()));
                tracing::info!(%email, "admin signed in");

                Ok(session)
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        _ = self.session.send(None);
        tracing::info!("admin signed out");

        Ok(())
    }

    async fn watch_session(&self) -> Result<Subscription<Option<Session>>, AuthError> {
        Ok(Subscription::new(self.session.subscribe()))
    }
}
