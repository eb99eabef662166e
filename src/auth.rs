//! Login / sign-up form.

use crate::api::BoardApi;
use crate::session::Session;
use log::{info, warn};
use std::fmt;

/// Which action the form submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    SignUp,
}

impl AuthMode {
    pub fn label(&self) -> &'static str {
        match self {
            AuthMode::Login => "Log in",
            AuthMode::SignUp => "Sign up",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            AuthMode::Login => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::Login,
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inline failure shown under the form. The cause is deliberately not
/// part of the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{mode} failed. Please check your credentials and try again.")]
pub struct AuthError {
    pub mode: AuthMode,
}

/// What a successful submit led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Logged in; the board can be shown.
    LoggedIn,
    /// Account created; the form switched back to login.
    SignedUp,
}

/// Form state.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    error: Option<AuthError>,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            error: None,
        }
    }
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&AuthError> {
        self.error.as_ref()
    }

    /// Switch between login and sign-up, clearing any shown error.
    pub fn toggle(&mut self) {
        self.error = None;
        self.mode = self.mode.other();
    }

    pub async fn submit(&mut self, api: &dyn BoardApi, session: &Session) -> Result<AuthOutcome, AuthError> {
        self.error = None;

        let result = match self.mode {
            AuthMode::Login => api.login(&self.email, &self.password).await,
            AuthMode::SignUp => api.signup(&self.name, &self.email, &self.password).await,
        };

        if let Err(e) = result {
            warn!("{} failed: {}", self.mode, e);
            return Err(self.fail(session));
        }

        match self.mode {
            AuthMode::Login => {
                if let Err(e) = session.authenticate(api.session_cookie()) {
                    warn!("Could not store session: {}", e);
                    return Err(self.fail(session));
                }
                info!("Logged in as {}", self.email);
                Ok(AuthOutcome::LoggedIn)
            }
            AuthMode::SignUp => {
                self.mode = AuthMode::Login;
                self.name.clear();
                Ok(AuthOutcome::SignedUp)
            }
        }
    }

    fn fail(&mut self, session: &Session) -> AuthError {
        session.clear();
        let error = AuthError { mode: self.mode };
        self.error = Some(error.clone());
        error
    }
}
