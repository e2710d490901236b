//! Admin authentication boundary.
//!
//! The directory has no role model: an operation is either open to everyone
//! (reads) or gated behind an admin session (mutations). This layer answers
//! "is an admin signed in" and lets interested parties watch that answer
//! change; it never talks to the store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{DirectoryError, DirectoryResult};

/// An active admin session.
#[derive(Debug, Clone)]
pub struct Session {
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Handle for removing a session-change subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type SessionCallback = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

/// Email/password sign-in with session-change notifications.
pub struct AdminAuth {
    /// email -> password
    credentials: RwLock<HashMap<String, String>>,
    session: RwLock<Option<Session>>,
    subscribers: RwLock<Vec<(u64, SessionCallback)>>,
    next_subscription: AtomicU64,
    /// Allow admin operations while no credentials are registered at all.
    pub allow_anonymous_unconfigured: bool,
}

impl Default for AdminAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminAuth {
    pub fn new() -> Self {
        Self {
            credentials: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
            subscribers: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            allow_anonymous_unconfigured: true,
        }
    }

    /// Register an admin login.
    pub fn register_admin(&self, email: &str, password: &str) {
        let mut credentials = self.credentials.write().unwrap();
        credentials.insert(email.to_string(), password.to_string());
    }

    /// Load credentials from the environment (JSON map of email -> password
    /// in `VINODEX_ADMIN_CREDENTIALS`).
    pub fn load_from_env(&self) {
        if let Ok(json) = std::env::var("VINODEX_ADMIN_CREDENTIALS") {
            match serde_json::from_str::<HashMap<String, String>>(&json) {
                Ok(map) => {
                    for (email, password) in map {
                        self.register_admin(&email, &password);
                    }
                }
                Err(e) => warn!(error = %e, "ignoring malformed VINODEX_ADMIN_CREDENTIALS"),
            }
        }
    }

    /// Validate credentials and open a session.
    ///
    /// Failure is generic on purpose: the caller learns neither whether the
    /// email exists nor whether the password was close.
    pub fn sign_in(&self, email: &str, password: &str) -> DirectoryResult<Session> {
        let ok = self
            .credentials
            .read()
            .unwrap()
            .get(email)
            .is_some_and(|stored| stored == password);
        if !ok {
            warn!(email, "failed sign-in attempt");
            return Err(DirectoryError::AuthFailed);
        }

        let session = Session {
            email: email.to_string(),
            signed_in_at: Utc::now(),
        };
        *self.session.write().unwrap() = Some(session.clone());
        info!(email, "admin signed in");
        self.notify();
        Ok(session)
    }

    /// Close the current session, if any.
    pub fn sign_out(&self) {
        let had_session = self.session.write().unwrap().take().is_some();
        if had_session {
            info!("admin signed out");
            self.notify();
        }
    }

    /// The current session, if an admin is signed in.
    pub fn session(&self) -> Option<Session> {
        self.session.read().unwrap().clone()
    }

    /// Check whether admin operations are currently allowed: either an
    /// active session, or nothing to sign in with because no credentials
    /// were ever registered.
    pub fn check(&self) -> DirectoryResult<()> {
        if self.session.read().unwrap().is_some() {
            return Ok(());
        }
        if self.allow_anonymous_unconfigured && self.credentials.read().unwrap().is_empty() {
            return Ok(());
        }
        Err(DirectoryError::SessionRequired)
    }

    /// Subscribe to session changes. The callback fires immediately with the
    /// current state, then again on every sign-in and sign-out until
    /// unsubscribed.
    pub fn on_session_change(
        &self,
        callback: impl Fn(Option<&Session>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        let callback: SessionCallback = Arc::new(callback);
        let current = self.session();
        callback(current.as_ref());
        self.subscribers.write().unwrap().push((id, callback));
        SubscriptionId(id)
    }

    /// Stop delivering session changes to one subscriber. A callback may
    /// remove itself this way.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .write()
            .unwrap()
            .retain(|(sid, _)| *sid != id.0);
    }

    fn notify(&self) {
        let current = self.session();
        // Snapshot first: a callback may subscribe or unsubscribe from
        // inside itself, which needs the list lock.
        let callbacks: Vec<SessionCallback> = self
            .subscribers
            .read()
            .unwrap()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(current.as_ref());
        }
    }
}
