//! # Admin Session Gate
//!
//! Login for the back-office pages. This gates navigation into the admin
//! area, nothing more: the catalog reads are public either way, and the
//! only credential source is a single pair from configuration. The
//! [`CredentialVerifier`] trait is the seam where a real identity provider
//! would plug in.
//!
//! Sessions are opaque v4 tokens held in an in-process map. Restarting the
//! server logs everyone out, which is fine for a one-admin back office.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::config::AdminConfig;

/// The record handed to the admin frontend after a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub role: String,
}

pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> Option<Principal>;
}

/// Verifier backed by the admin credentials in [`AdminConfig`]. With no
/// configured password every login attempt is rejected.
pub struct ConfigCredentials {
    email: String,
    password: Option<String>,
}

impl ConfigCredentials {
    pub fn new(config: &AdminConfig) -> Self {
        if config.password.is_none() {
            warn!("ADMIN_PASSWORD not set, admin login is disabled");
        }

        Self {
            email: config.email.clone(),
            password: config.password.clone(),
        }
    }
}

impl CredentialVerifier for ConfigCredentials {
    fn verify(&self, email: &str, password: &str) -> Option<Principal> {
        let expected = self.password.as_deref()?;

        if email != self.email || password != expected {
            return None;
        }

        Some(Principal {
            id: "admin".to_string(),
            email: self.email.clone(),
            role: "admin".to_string(),
        })
    }
}

pub struct SessionStore {
    verifier: Box<dyn CredentialVerifier>,
    sessions: RwLock<HashMap<Uuid, Principal>>,
}

impl SessionStore {
    pub fn new(verifier: Box<dyn CredentialVerifier>) -> Self {
        Self {
            verifier,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Verifies the pair and opens a session. A mismatch stores nothing.
    pub async fn login(&self, email: &str, password: &str) -> Option<(Uuid, Principal)> {
        let principal = self.verifier.verify(email, password)?;
        let token = Uuid::new_v4();

        self.sessions
            .write()
            .await
            .insert(token, principal.clone());

        Some((token, principal))
    }

    /// Removing an unknown token is a no-op.
    pub async fn logout(&self, token: &Uuid) {
        self.sessions.write().await.remove(token);
    }

    pub async fn current(&self, token: &Uuid) -> Option<Principal> {
        self.sessions.read().await.get(token).cloned()
    }
}
