use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::catalog::RawLinkRecord;
use crate::domain::platform::PlatformLinks;
use crate::domain::types::ProductId;
use crate::repository::{
    BulkUpdateOutcome, HttpRepository, LinkReader, LinkWriter, RepositoryResult,
};

const LINKS_PATH: &str = "/api/platform-links";

#[derive(Deserialize)]
struct UpdateResponse {
    #[serde(default)]
    success: bool,
}

#[derive(Serialize)]
struct BulkUpdateRequest<'a> {
    links: &'a BTreeMap<ProductId, PlatformLinks>,
}

impl LinkReader for HttpRepository {
    async fn list_links(&self) -> RepositoryResult<HashMap<String, RawLinkRecord>> {
        self.get_json(LINKS_PATH).await
    }

    async fn get_links(&self, product_id: ProductId) -> RepositoryResult<RawLinkRecord> {
        self.get_json(&format!("{LINKS_PATH}/{product_id}")).await
    }
}

impl LinkWriter for HttpRepository {
    async fn update_links(
        &self,
        product_id: ProductId,
        links: &PlatformLinks,
    ) -> RepositoryResult<bool> {
        let response: UpdateResponse = self
            .post_json(&format!("{LINKS_PATH}/{product_id}"), links)
            .await?;
        Ok(response.success)
    }

    async fn bulk_update_links(
        &self,
        links: &BTreeMap<ProductId, PlatformLinks>,
    ) -> RepositoryResult<BulkUpdateOutcome> {
        self.post_json(&format!("{LINKS_PATH}/bulk"), &BulkUpdateRequest { links })
            .await
    }
}
