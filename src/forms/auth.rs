use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::services::auth::Credentials;

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Error)]
pub enum LoginFormError {
    #[error("Login form validation failed: {0}")]
    Validation(String),
}

impl From<ValidationErrors> for LoginFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<LoginForm> for Credentials {
    type Error = LoginFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Credentials {
            username: value.username.trim().to_string(),
            password: value.password,
        })
    }
}
