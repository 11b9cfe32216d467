//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service, form or repository error
//! types, so every `From` impl into [`ServiceError`] lives here.

use crate::domain::types::TypeConstraintError;
use crate::forms::auth::LoginFormError;
use crate::forms::import_export::UploadParseError;
use crate::forms::links::EditLinksFormError;
use crate::repository::RepositoryError;
use crate::services::ServiceError;
use crate::services::import_export::DownloadError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::Status(404) => ServiceError::NotFound,
            _ => ServiceError::Backend,
        }
    }
}

impl From<UploadParseError> for ServiceError {
    fn from(val: UploadParseError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<EditLinksFormError> for ServiceError {
    fn from(val: EditLinksFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<LoginFormError> for ServiceError {
    fn from(val: LoginFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<DownloadError> for ServiceError {
    fn from(val: DownloadError) -> Self {
        match val {
            DownloadError::InvalidFormat(_) => ServiceError::Form(val.to_string()),
            DownloadError::CsvRender | DownloadError::XlsxRender => ServiceError::Internal,
        }
    }
}
