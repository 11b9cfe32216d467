use crate::domain::product::Product;
use crate::repository::{HttpRepository, ProductReader, RepositoryResult};

const PRODUCTS_PATH: &str = "/api/shopify/products";

impl ProductReader for HttpRepository {
    async fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        let products: Vec<Product> = self.get_json(PRODUCTS_PATH).await?;
        log::debug!("Fetched {} products from {PRODUCTS_PATH}", products.len());
        Ok(products)
    }
}
