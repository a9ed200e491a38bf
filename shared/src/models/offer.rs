//! Offer Model
//!
//! An offer is a percentage discount applied against a product's canonical
//! original price. The first time an offer is applied the current price
//! becomes `originalPrice`; later offers always discount from that value.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::product::Product;
use crate::error::{ValidationError, ValidationResult};

/// Canonical price an offer is computed from
///
/// `originalPrice`, else `oldPrice`, else the current price.
pub fn canonical_original_price(product: &Product) -> Decimal {
    product
        .original_price
        .or(product.old_price)
        .unwrap_or(product.price)
}

/// Validated offer: original price and discount percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferRequest {
    original: Decimal,
    discount: Decimal,
}

impl OfferRequest {
    /// Validate an offer against an explicit original price
    pub fn new(original: Decimal, discount: Decimal) -> ValidationResult<Self> {
        if discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
            return Err(ValidationError::DiscountOutOfRange(discount));
        }
        if original <= Decimal::ZERO {
            return Err(ValidationError::InvalidOriginalPrice(original));
        }
        Ok(Self { original, discount })
    }

    /// Validate an offer against the product's canonical original price
    pub fn for_product(product: &Product, discount: Decimal) -> ValidationResult<Self> {
        Self::new(canonical_original_price(product), discount)
    }

    pub fn original(&self) -> Decimal {
        self.original
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Discounted price, rounded to two decimals
    pub fn discounted_price(&self) -> Decimal {
        let cut = self.original * self.discount / Decimal::ONE_HUNDRED;
        (self.original - cut).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Update body for `product`; an existing `originalPrice` is kept
    pub fn to_update(&self, product: &Product) -> OfferUpdate {
        OfferUpdate {
            price: self.discounted_price(),
            old_price: self.original,
            original_price: product.original_price.unwrap_or(self.original),
            offer: self.discount,
        }
    }
}

/// Product update body sent when applying an offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferUpdate {
    pub price: Decimal,
    pub old_price: Decimal,
    pub original_price: Decimal,
    pub offer: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, original: Option<i64>, old: Option<i64>) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "price": price,
            "originalPrice": original,
            "oldPrice": old,
        }))
        .unwrap()
    }

    #[test]
    fn test_canonical_original_price() {
        assert_eq!(
            canonical_original_price(&product(80, Some(100), Some(90))),
            Decimal::from(100)
        );
        assert_eq!(
            canonical_original_price(&product(80, None, Some(90))),
            Decimal::from(90)
        );
        assert_eq!(
            canonical_original_price(&product(80, None, None)),
            Decimal::from(80)
        );
    }

    #[test]
    fn test_discounted_price_rounding() {
        let offer = OfferRequest::new(Decimal::new(999, 1), Decimal::from(15)).unwrap();
        // 99.9 * 0.85 = 84.915
        assert_eq!(offer.discounted_price(), Decimal::new(8492, 2));

        let free = OfferRequest::new(Decimal::from(50), Decimal::ONE_HUNDRED).unwrap();
        assert_eq!(free.discounted_price(), Decimal::ZERO);
    }

    #[test]
    fn test_offer_validation() {
        assert_eq!(
            OfferRequest::new(Decimal::from(10), Decimal::from(101)),
            Err(ValidationError::DiscountOutOfRange(Decimal::from(101)))
        );
        assert_eq!(
            OfferRequest::new(Decimal::from(10), Decimal::from(-1)),
            Err(ValidationError::DiscountOutOfRange(Decimal::from(-1)))
        );
        assert_eq!(
            OfferRequest::new(Decimal::ZERO, Decimal::from(10)),
            Err(ValidationError::InvalidOriginalPrice(Decimal::ZERO))
        );
    }

    #[test]
    fn test_original_price_is_never_overwritten() {
        // Second offer on an already discounted product
        let p = product(90, Some(100), Some(100));
        let update = OfferRequest::for_product(&p, Decimal::from(20))
            .unwrap()
            .to_update(&p);
        assert_eq!(update.price, Decimal::from(80));
        assert_eq!(update.original_price, Decimal::from(100));
        assert_eq!(update.offer, Decimal::from(20));

        // First offer: current price becomes the original
        let p = product(200, None, None);
        let update = OfferRequest::for_product(&p, Decimal::from(10))
            .unwrap()
            .to_update(&p);
        assert_eq!(update.original_price, Decimal::from(200));
        assert_eq!(update.old_price, Decimal::from(200));
        assert_eq!(update.price, Decimal::from(180));

    }

    #[test]
    fn test_update_body_uses_json_numbers() {
        let p = product(80, Some(100), None);
        let update = OfferRequest::for_product(&p, Decimal::new(125, 1))
            .unwrap()
            .to_update(&p);
        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(json["price"], serde_json::json!(87.5));
        assert_eq!(json["oldPrice"], serde_json::json!(100.0));
        assert_eq!(json["originalPrice"], serde_json::json!(100.0));
        assert_eq!(json["offer"], serde_json::json!(12.5));
        for key in ["price", "oldPrice", "originalPrice", "offer"] {
            assert!(json[key].is_number(), "{} should be a number", key);
        }
    }
}
