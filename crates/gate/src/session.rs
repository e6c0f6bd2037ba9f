//! Authentication state lookup.
//!
//! The credential service owns per-actor authentication state; the gate only
//! reads it. Lookups must be cheap (every guard consults them, the movement
//! guard once per actor per tick) and authoritative for the instant of the
//! call — the gate never caches a result across ticks.

use std::collections::HashSet;
use std::sync::Arc;

use authward_core::ActorId;
use thiserror::Error;

/// Failure while consulting the authentication store.
///
/// The gate treats any lookup failure as "unauthenticated" (fail closed)
/// and logs it; this error never propagates out of a guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session registry unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of per-actor authentication state.
pub trait SessionRegistry {
    /// Whether the actor has completed external authentication.
    ///
    /// Must be side-effect-free and safe to call at tick frequency.
    fn is_authenticated(&self, actor: ActorId) -> Result<bool, SessionError>;
}

impl<T: SessionRegistry + ?Sized> SessionRegistry for &T {
    fn is_authenticated(&self, actor: ActorId) -> Result<bool, SessionError> {
        (**self).is_authenticated(actor)
    }
}

impl<T: SessionRegistry + ?Sized> SessionRegistry for Arc<T> {
    fn is_authenticated(&self, actor: ActorId) -> Result<bool, SessionError> {
        (**self).is_authenticated(actor)
    }
}

/// In-process session registry backed by a set of authenticated actors.
///
/// Suitable for hosts that track authentication state in the same process
/// as the simulation; also the registry every test uses.
#[derive(Debug, Default, Clone)]
pub struct MemorySessions {
    authenticated: HashSet<ActorId>,
}

impl MemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the actor authenticated (external login completed).
    pub fn login(&mut self, actor: ActorId) {
        self.authenticated.insert(actor);
    }

    /// Mark the actor unauthenticated again.
    pub fn logout(&mut self, actor: ActorId) {
        self.authenticated.remove(&actor);
    }

    /// Drop all state for a disconnected actor.
    pub fn disconnect(&mut self, actor: ActorId) {
        self.authenticated.remove(&actor);
    }
}

impl SessionRegistry for MemorySessions {
    fn is_authenticated(&self, actor: ActorId) -> Result<bool, SessionError> {
        Ok(self.authenticated.contains(&actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sessions_login_logout() {
        let mut sessions = MemorySessions::new();
        assert_eq!(sessions.is_authenticated(7), Ok(false));

        sessions.login(7);
        assert_eq!(sessions.is_authenticated(7), Ok(true));
        assert_eq!(sessions.is_authenticated(8), Ok(false));

        sessions.logout(7);
        assert_eq!(sessions.is_authenticated(7), Ok(false));
    }

    #[test]
    fn test_disconnect_clears_state() {
        let mut sessions = MemorySessions::new();
        sessions.login(7);
        sessions.disconnect(7);
        assert_eq!(sessions.is_authenticated(7), Ok(false));
    }

    #[test]
    fn test_registry_through_reference() {
        let mut sessions = MemorySessions::new();
        sessions.login(1);

        fn check(registry: impl SessionRegistry) -> bool {
            registry.is_authenticated(1).unwrap()
        }
        assert!(check(&sessions));
    }
}
