use std::collections::{BTreeMap, HashMap};
use std::future::Future;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::catalog::RawLinkRecord;
use crate::domain::platform::PlatformLinks;
use crate::domain::product::Product;
use crate::domain::types::ProductId;

pub mod platform_links;
pub mod shopify;

/// Failures talking to the backend API.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The request never produced a response.
    #[error("backend request failed: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("backend returned status {0}")]
    Status(u16),
    /// The response body did not have the expected shape.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
    /// The configured base URL is unusable.
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for RepositoryError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else if e.is_decode() {
            Self::MalformedResponse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Backend answer to a bulk link update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub updated_count: usize,
}

/// Repository backed by the storefront backend HTTP API.
///
/// `reqwest::Client` keeps its connection pool behind an `Arc`, so the
/// repository is cheap to clone into every worker.
#[derive(Clone)]
pub struct HttpRepository {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRepository {
    /// Create a repository for the backend at `base_url`.
    pub fn new(base_url: &str) -> RepositoryResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RepositoryError::InvalidUrl(base_url));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("storefront-links/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> RepositoryResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> RepositoryResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

/// Read access to the product catalog.
pub trait ProductReader {
    /// Every product the catalog source exposes.
    fn list_products(&self) -> impl Future<Output = RepositoryResult<Vec<Product>>> + Send;
}

/// Read access to the link store.
pub trait LinkReader {
    /// All stored records keyed by product identifier string.
    fn list_links(
        &self,
    ) -> impl Future<Output = RepositoryResult<HashMap<String, RawLinkRecord>>> + Send;
    /// The stored record of one product.
    fn get_links(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = RepositoryResult<RawLinkRecord>> + Send;
}

/// Write access to the link store.
pub trait LinkWriter {
    /// Replace one product's record. Resolves to the backend's `success` flag.
    fn update_links(
        &self,
        product_id: ProductId,
        links: &PlatformLinks,
    ) -> impl Future<Output = RepositoryResult<bool>> + Send;
    /// Replace the records of many products in one call.
    fn bulk_update_links(
        &self,
        links: &BTreeMap<ProductId, PlatformLinks>,
    ) -> impl Future<Output = RepositoryResult<BulkUpdateOutcome>> + Send;
}
