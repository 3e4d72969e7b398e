//! Session-scoped access gate for the form entry point
//!
//! A [`Session`] is created when a form session starts and passed to every
//! handler. Only [`AccessGate::unlock`] marks it authenticated; there is no
//! process-wide flag.

use std::fmt;

use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::config::AccessSettings;
use crate::error::{PassError, Result};

/// Message shown after a wrong access key
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied. Please enter the correct access key.";

/// State of one form session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    /// Start a new, locked session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Fail with `AccessDenied` unless the session has been unlocked
    pub fn require_authenticated(&self) -> Result<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(PassError::AccessDenied)
        }
    }
}

/// Result of an unlock attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// The session is (now) authenticated
    Granted,
    /// Nothing was entered yet; keep showing the key field
    Prompt,
    /// A key was entered and it was wrong
    Denied,
}

impl GateStatus {
    /// User-facing message, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            GateStatus::Denied => Some(ACCESS_DENIED_MESSAGE),
            GateStatus::Granted | GateStatus::Prompt => None,
        }
    }
}

/// Shared-secret gate
pub struct AccessGate {
    secret: Option<String>,
    key_env: String,
}

impl AccessGate {
    /// Read the secret from the environment variable named in the settings.
    ///
    /// An unset or empty variable leaves the gate unconfigured.
    pub fn from_env(settings: &AccessSettings) -> Self {
        let secret = std::env::var(&settings.key_env)
            .ok()
            .filter(|s| !s.is_empty());
        Self {
            secret,
            key_env: settings.key_env.clone(),
        }
    }

    /// Gate with a known secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            key_env: AccessSettings::default().key_env,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Check an access key and unlock the session on a match.
    ///
    /// An already unlocked session stays unlocked. Without a configured
    /// secret every attempt fails with `AccessNotConfigured`.
    pub fn unlock(&self, session: &mut Session, attempt: &str) -> Result<GateStatus> {
        let Some(secret) = self.secret.as_deref() else {
            return Err(PassError::AccessNotConfigured(self.key_env.clone()));
        };
        if session.authenticated {
            return Ok(GateStatus::Granted);
        }
        if attempt.is_empty() {
            return Ok(GateStatus::Prompt);
        }

        if bool::from(attempt.as_bytes().ct_eq(secret.as_bytes())) {
            session.authenticated = true;
            debug!("Session unlocked");
            Ok(GateStatus::Granted)
        } else {
            warn!("Rejected access key attempt");
            Ok(GateStatus::Denied)
        }
    }
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGate")
            .field("configured", &self.is_configured())
            .field("key_env", &self.key_env)
            .finish()
    }
}
