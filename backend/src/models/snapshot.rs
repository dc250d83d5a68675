//! Catalog snapshot model.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Schema version stamped on every built snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// A product listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number or numeric string; anything else fails validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "image_url",
        alias = "imageUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    /// Category ID this product is listed under.
    #[serde(
        default,
        alias = "category_id",
        alias = "categoryId",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    /// Crossed-out price shown next to `price`.
    #[serde(
        default,
        alias = "compareAtPrice",
        alias = "original_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub compare_at_price: Option<Value>,
    /// Feature flags and any other fields the dashboard attaches.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Numeric price, if the field holds a finite number.
    pub fn price_amount(&self) -> Option<f64> {
        self.price.as_ref().and_then(numeric)
    }

    /// Numeric compare-at price, if present and finite.
    pub fn compare_at_amount(&self) -> Option<f64> {
        self.compare_at_price.as_ref().and_then(numeric)
    }
}

/// A product category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        alias = "image_url",
        alias = "imageUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A customer review shown on the storefront.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A promotional offer banner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole published catalog and site configuration.
///
/// Cosmetic sections are kept as raw JSON: the storefront owns their shape and
/// the pipeline only needs to carry them. Keys this struct does not name land
/// in `extra` and are written back unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: BTreeMap<String, Product>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: BTreeMap<String, Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<BTreeMap<String, Review>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offers: Option<BTreeMap<String, Offer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_settings: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage_sections: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_sections: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marquee_sections: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_sections: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_designs: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupons: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_settings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub try_on_models: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carousel_settings: Option<Value>,
    /// Set by the builder at publish time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Set by the builder at publish time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Snapshot {
    pub fn review_count(&self) -> usize {
        self.reviews.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn offer_count(&self) -> usize {
        self.offers.as_ref().map_or(0, BTreeMap::len)
    }
}

/// Read a number or a numeric string as a finite `f64`.
pub fn numeric(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|v| v.is_finite())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
