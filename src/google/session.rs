use crate::error::{AppError, Result};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Bearer token for the signed-in user. `Debug` output is redacted.
pub type Credential = oauth2::AccessToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated(Credential),
}

/// In-memory credential slot shared by the identity flow and the API readers.
///
/// Nothing is persisted: a new `Session` always starts unauthenticated.
#[derive(Debug, Default)]
pub struct Session {
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        match &*self.lock() {
            SessionState::Unauthenticated => SessionStatus::Unauthenticated,
            SessionState::Authenticating => SessionStatus::Authenticating,
            SessionState::Authenticated(_) => SessionStatus::Authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    /// The active credential, or `NotAuthenticated`.
    pub fn credential(&self) -> Result<Credential> {
        match &*self.lock() {
            SessionState::Authenticated(credential) => Ok(credential.clone()),
            _ => Err(AppError::NotAuthenticated),
        }
    }

    /// Move to `Authenticating`. Only one attempt may be outstanding; the
    /// returned guard rolls the session back unless completed.
    pub(super) fn begin_sign_in(&self) -> Result<SignInGuard<'_>> {
        let mut state = self.lock();
        if matches!(*state, SessionState::Authenticating) {
            return Err(AppError::SignInInProgress);
        }
        *state = SessionState::Authenticating;

        Ok(SignInGuard {
            session: self,
            completed: false,
        })
    }

    /// Drop the credential, returning it if one was held.
    pub(super) fn clear(&self) -> Option<Credential> {
        match std::mem::take(&mut *self.lock()) {
            SessionState::Authenticated(credential) => Some(credential),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(super) struct SignInGuard<'a> {
    session: &'a Session,
    completed: bool,
}

impl SignInGuard<'_> {
    pub(super) fn complete(mut self, credential: Credential) {
        *self.session.lock() = SessionState::Authenticated(credential);
        self.completed = true;
    }
}

impl Drop for SignInGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            *self.session.lock() = SessionState::Unauthenticated;
        }
    }
}
