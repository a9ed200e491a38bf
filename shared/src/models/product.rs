//! Product Model

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Catalog product line; each line is its own collection on the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductLine {
    Haircare,
    Skincare,
}

impl ProductLine {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductLine::Haircare => "haircare",
            ProductLine::Skincare => "skincare",
        }
    }

    /// Human-readable label ("Haircare", "Skincare")
    pub fn label(&self) -> &'static str {
        match self {
            ProductLine::Haircare => "Haircare",
            ProductLine::Skincare => "Skincare",
        }
    }

    /// API path of the line's collection, e.g. `api/haircare`
    pub fn collection_path(&self) -> String {
        format!("api/{}", self.as_str())
    }
}

impl std::fmt::Display for ProductLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Product entity as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Current (possibly discounted) price
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Decimal,
    /// Canonical price before any offer; set once, never overwritten
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,
    /// Offer percentage currently applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<Decimal>,
    /// Ordered image references (object ids, URLs or paths)
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hair_type: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub concern: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skin_type: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skin_concern: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Product list response: either a bare array or `{ "products": [...] }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProductListResponse {
    Bare(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

impl ProductListResponse {
    pub fn into_products(self) -> Vec<Product> {
        match self {
            ProductListResponse::Bare(products) | ProductListResponse::Wrapped { products } => {
                products
            }
        }
    }
}

/// Single product response: either `{ "product": {...} }` or the bare record
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProductResponse {
    Wrapped { product: Product },
    Bare(Product),
}

impl ProductResponse {
    pub fn into_product(self) -> Product {
        match self {
            ProductResponse::Wrapped { product } | ProductResponse::Bare(product) => product,
        }
    }
}

/// Editable product form
///
/// Tag fields hold comma separated text the way an admin types them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub range: String,
    pub hair_type: String,
    pub concern: String,
    pub skin_type: String,
    pub skin_concern: String,
}

impl ProductForm {
    /// Prefill the form from a loaded product
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            range: product.range.clone().unwrap_or_default(),
            hair_type: product.hair_type.join(", "),
            concern: product.concern.join(", "),
            skin_type: product.skin_type.join(", "),
            skin_concern: product.skin_concern.join(", "),
        }
    }

    /// Parse the price field
    pub fn parse_price(&self) -> ValidationResult<Decimal> {
        let text = self.price.trim();
        if text.is_empty() {
            return Err(ValidationError::Required("price"));
        }
        Decimal::from_str(text).map_err(|_| ValidationError::InvalidPrice(text.to_string()))
    }

    /// Build the save payload for `line` with the final image list
    pub fn to_payload(
        &self,
        line: ProductLine,
        images: Vec<String>,
    ) -> ValidationResult<ProductPayload> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("name"));
        }
        let price = self.parse_price()?;

        let mut payload = ProductPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            price,
            images,
            range: self.range.clone(),
            hair_type: None,
            concern: None,
            skin_type: None,
            skin_concern: None,
        };
        match line {
            ProductLine::Haircare => {
                payload.hair_type = Some(split_tags(&self.hair_type));
                payload.concern = Some(split_tags(&self.concern));
            }
            ProductLine::Skincare => {
                payload.skin_type = Some(split_tags(&self.skin_type));
                payload.skin_concern = Some(split_tags(&self.skin_concern));
            }
        }
        Ok(payload)
    }
}

/// Create/update product payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub images: Vec<String>,
    pub range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_type: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concern: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_type: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_concern: Option<Vec<String>>,
}

/// Split a comma separated tag field, dropping blank entries
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Case-insensitive name search; a blank query matches everything
pub fn filter_by_name<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .collect()
}
