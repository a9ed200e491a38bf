//! Product CRUD

use shared::models::{Product, ProductLine, ProductListResponse, ProductPayload, ProductResponse};

use super::CatalogClient;
use crate::error::ClientResult;
use crate::http::HttpClient;

fn item_path(line: ProductLine, id: &str) -> String {
    format!("{}/{}", line.collection_path(), id)
}

impl<H: HttpClient> CatalogClient<H> {
    /// All products of one line
    pub async fn list_products(&self, line: ProductLine) -> ClientResult<Vec<Product>> {
        let response: ProductListResponse = self.http.get(&line.collection_path()).await?;
        let products = response.into_products();
        tracing::debug!(%line, count = products.len(), "Products listed");
        Ok(products)
    }

    /// Products of both lines, skincare first, each tagged with its line
    pub async fn list_all_products(&self) -> ClientResult<Vec<(ProductLine, Product)>> {
        let (skincare, haircare) = tokio::try_join!(
            self.list_products(ProductLine::Skincare),
            self.list_products(ProductLine::Haircare),
        )?;
        Ok(skincare
            .into_iter()
            .map(|p| (ProductLine::Skincare, p))
            .chain(haircare.into_iter().map(|p| (ProductLine::Haircare, p)))
            .collect())
    }

    pub async fn get_product(&self, line: ProductLine, id: &str) -> ClientResult<Product> {
        let response: ProductResponse = self.http.get(&item_path(line, id)).await?;
        Ok(response.into_product())
    }

    pub async fn create_product(
        &self,
        line: ProductLine,
        payload: &ProductPayload,
    ) -> ClientResult<()> {
        let _: serde_json::Value = self.http.post(&line.collection_path(), payload).await?;
        tracing::info!(%line, name = %payload.name, "Product created");
        Ok(())
    }

    pub async fn update_product(
        &self,
        line: ProductLine,
        id: &str,
        payload: &ProductPayload,
    ) -> ClientResult<()> {
        let _: serde_json::Value = self.http.put(&item_path(line, id), payload).await?;
        tracing::info!(%line, id, "Product updated");
        Ok(())
    }

    pub async fn delete_product(&self, line: ProductLine, id: &str) -> ClientResult<()> {
        let _: serde_json::Value = self.http.delete(&item_path(line, id)).await?;
        tracing::info!(%line, id, "Product deleted");
        Ok(())
    }
}
