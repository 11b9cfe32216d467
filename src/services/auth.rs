//! Operator authentication.
//!
//! Credential checking is delegated to an [`Authenticator`]; the application
//! ships [`ConfiguredOperator`], which compares against the operator account
//! from configuration.

use serde::Serialize;

use crate::forms::auth::LoginForm;
use crate::services::{ServiceError, ServiceResult};

/// Username and password as submitted on the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Identity of a logged-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorSession {
    pub username: String,
}

/// Decides whether credentials belong to an operator.
pub trait Authenticator {
    fn authenticate(&self, credentials: &Credentials) -> Option<OperatorSession>;
}

/// Single operator account read from configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredOperator {
    username: String,
    password: String,
}

impl ConfiguredOperator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            password: password.into(),
        }
    }
}

impl Authenticator for ConfiguredOperator {
    fn authenticate(&self, credentials: &Credentials) -> Option<OperatorSession> {
        // An account without a password never logs in.
        if self.username.is_empty() || self.password.is_empty() {
            return None;
        }
        (credentials.username == self.username && credentials.password == self.password).then(
            || OperatorSession {
                username: self.username.clone(),
            },
        )
    }
}

/// Validates the login form and asks `authenticator` for a session.
pub fn login<A>(form: LoginForm, authenticator: &A) -> ServiceResult<OperatorSession>
where
    A: Authenticator + ?Sized,
{
    let credentials = Credentials::try_from(form)?;

    match authenticator.authenticate(&credentials) {
        Some(session) => {
            log::info!("Operator {} logged in", session.username);
            Ok(session)
        }
        None => {
            log::warn!("Rejected login attempt for {}", credentials.username);
            Err(ServiceError::Unauthorized)
        }
    }
}
