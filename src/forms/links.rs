use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::platform::{PlatformLinks, PlatformSet};

/// Longest URL accepted for a single marketplace slot.
pub const MAX_LINK_LENGTH: usize = 2048;

fn validate_link_values(links: &HashMap<String, String>) -> Result<(), ValidationError> {
    if links
        .values()
        .any(|url| url.trim().chars().count() > MAX_LINK_LENGTH)
    {
        return Err(ValidationError::new("link_too_long"));
    }
    Ok(())
}

/// Edit form of one product: one text field per marketplace key.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditLinksForm {
    #[serde(flatten)]
    #[validate(custom(function = "validate_link_values"))]
    pub links: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum EditLinksFormError {
    #[error("Edit links form validation failed: {0}")]
    Validation(String),
}

impl From<ValidationErrors> for EditLinksFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl EditLinksForm {
    /// Validates the submission and projects it onto the configured slots.
    ///
    /// Fields for unknown keys are ignored and missing keys come back empty,
    /// so the result is always a full record.
    pub fn into_links(self, platforms: &PlatformSet) -> Result<PlatformLinks, EditLinksFormError> {
        self.validate()?;
        Ok(platforms.normalize(self.links))
    }
}
