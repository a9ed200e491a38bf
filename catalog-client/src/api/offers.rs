//! Discount offers

use rust_decimal::Decimal;
use shared::models::{OfferRequest, OfferUpdate, Product, ProductLine};

use super::CatalogClient;
use crate::error::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> CatalogClient<H> {
    /// Apply a `discount` percent offer to `product`
    ///
    /// Only `product.id` is read from the argument. The record is fetched
    /// again first, so a stale list row cannot feed an old price into the
    /// computation. The discount is taken from the canonical original price,
    /// so applying offers repeatedly never compounds. Returns the fields
    /// written to the server.
    pub async fn apply_offer(
        &self,
        line: ProductLine,
        product: &Product,
        discount: Decimal,
    ) -> ClientResult<OfferUpdate> {
        let current = self.get_product(line, &product.id).await?;
        let request = OfferRequest::for_product(&current, discount)?;
        let update = request.to_update(&current);

        let path = format!("{}/{}", line.collection_path(), current.id);
        let _: serde_json::Value = self.http.put(&path, &update).await?;

        tracing::info!(
            %line,
            id = %current.id,
            discount = %request.discount(),
            price = %update.price,
            "Offer applied"
        );
        Ok(update)
    }
}
