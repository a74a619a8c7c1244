//! Current user identity.

use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(String),
}

impl Session {
    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(username) => Some(username),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}

/// Sole owner of the in-memory session. Persistence of the identity is
/// carried out by the caller through [`crate::controller::Effect`]s.
#[derive(Debug, Default)]
pub struct SessionState {
    session: Session,
}

impl SessionState {
    /// Seeds the session from a previously persisted identity.
    pub fn restore(persisted: Option<String>) -> Self {
        let session = match persisted {
            Some(username) if !username.trim().is_empty() => Session::Authenticated(username),
            _ => Session::Anonymous,
        };
        Self { session }
    }

    pub fn current(&self) -> Session {
        self.session.clone()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Returns false when the username is blank and the session was left as is.
    pub fn login(&mut self, username: &str) -> bool {
        let username = username.trim();
        if username.is_empty() {
            warn!("session: ignoring login with blank username");
            return false;
        }
        info!(username, "session: authenticated");
        self.session = Session::Authenticated(username.to_string());
        true
    }

    pub fn logout(&mut self) {
        if let Session::Authenticated(username) = &self.session {
            info!(username = username.as_str(), "session: logged out");
        }
        self.session = Session::Anonymous;
    }
}
