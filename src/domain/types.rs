//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs carry these wrappers instead of raw primitives so that
//! identifiers and marketplace keys are checked once at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A marketplace key contained whitespace.
    #[error("{0} cannot contain whitespace")]
    ContainsWhitespace(&'static str),
    /// The same marketplace key was configured twice.
    #[error("duplicate marketplace key: {0}")]
    DuplicateKey(String),
    /// The configured marketplace set has no entries.
    #[error("marketplace set cannot be empty")]
    EmptyPlatformSet,
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: u64) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `u64` backing this identifier.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<u64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: u64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for u64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<u64> for $name {
            fn eq(&self, other: &u64) -> bool {
                self.0 == *other
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Wraps a compile-time constant without re-validating it.
            pub(crate) fn from_static(value: &'static str) -> Self {
                Self(value.to_string())
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ProductId, "Unique identifier for a catalog product.", "product_id");

non_empty_string_newtype!(
    PlatformLabel,
    "Human readable marketplace name shown in headers and badges.",
    "platform label"
);
non_empty_string_newtype!(
    SiteHost,
    "Public host of a marketplace, used to build sample URLs.",
    "site host"
);

/// Short identifier of a marketplace slot in a link record.
///
/// Keys are stored lower-cased and never contain whitespace, so they can be
/// used verbatim as JSON object keys and form field names.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct PlatformKey(String);

impl PlatformKey {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "platform key")?;
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TypeConstraintError::ContainsWhitespace("platform key"));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Wraps a lower-case, whitespace-free constant.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PlatformKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for PlatformKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlatformKey {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PlatformKey {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlatformKey> for String {
    fn from(value: PlatformKey) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_product_id() {
        let err = ProductId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("product_id"));
    }

    #[test]
    fn product_id_displays_as_plain_number() {
        let id = ProductId::new(7_912_345_678).unwrap();
        assert_eq!(id.to_string(), "7912345678");
    }

    #[test]
    fn platform_key_is_trimmed_and_lowercased() {
        let key = PlatformKey::new("  Amazon1 ").unwrap();
        assert_eq!(key.as_str(), "amazon1");
    }

    #[test]
    fn platform_key_rejects_inner_whitespace() {
        assert_eq!(
            PlatformKey::new("home depot").unwrap_err(),
            TypeConstraintError::ContainsWhitespace("platform key")
        );
    }

    #[test]
    fn labels_reject_blank_values() {
        assert_eq!(
            PlatformLabel::new("   ").unwrap_err(),
            TypeConstraintError::EmptyString("platform label")
        );
    }
}
