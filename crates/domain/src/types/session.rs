//! Session state published by the session manager

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::auth::Identity;

/// Discrete state of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    Initializing,
    Authenticated,
    Refreshing,
    Anonymous,
}

impl Phase {
    /// Phases in which stored credentials are expected to be valid.
    pub fn holds_credentials(self) -> bool {
        matches!(self, Self::Authenticated | Self::Refreshing)
    }

    /// True once the startup check has finished one way or the other.
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Uninitialized | Self::Initializing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Authenticated => "authenticated",
            Self::Refreshing => "refreshing",
            Self::Anonymous => "anonymous",
        };
        f.write_str(label)
    }
}

/// Observable session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub identity: Option<Arc<Identity>>,
    pub phase: Phase,
}

impl Session {
    pub fn uninitialized() -> Self {
        Self { identity: None, phase: Phase::Uninitialized }
    }

    pub fn anonymous() -> Self {
        Self { identity: None, phase: Phase::Anonymous }
    }

    pub fn authenticated(identity: Arc<Identity>) -> Self {
        Self { identity: Some(identity), phase: Phase::Authenticated }
    }

    /// Same identity, different phase.
    pub fn with_phase(&self, phase: Phase) -> Self {
        Self { identity: self.identity.clone(), phase }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase.holds_credentials() && self.identity.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::uninitialized()
    }
}
