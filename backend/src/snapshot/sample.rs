//! Built-in sample catalog served when no real snapshot is available.

use std::collections::BTreeMap;

use serde_json::{json, Map};

use super::default_navigation_map;
use crate::models::{Category, Product, Snapshot, SNAPSHOT_VERSION};

/// Deterministic stand-in catalog.
///
/// Every product references one of the sample categories and every
/// compare-at price is above its price, so the storefront can treat it
/// exactly like published data. `published_at` stays unset.
pub fn sample_snapshot() -> Snapshot {
    let categories = BTreeMap::from([
        category("sample-hair", "Hair Accessories"),
        category("sample-jewelry", "Jewelry"),
        category("sample-bags", "Bags"),
    ]);

    let products = BTreeMap::from([
        product(
            "sample-pearl-clip",
            "Pearl Hair Clip",
            299,
            399,
            "sample-hair",
            "Classic claw clip finished with faux pearls.",
        ),
        product(
            "sample-silk-scrunchie",
            "Silk Scrunchie Set",
            349,
            499,
            "sample-hair",
            "Three mulberry silk scrunchies in neutral tones.",
        ),
        product(
            "sample-hoop-earrings",
            "Gold Hoop Earrings",
            799,
            999,
            "sample-jewelry",
            "Lightweight hoops with an 18k gold finish.",
        ),
        product(
            "sample-mini-tote",
            "Mini Canvas Tote",
            1299,
            1599,
            "sample-bags",
            "Everyday tote with an inner zip pocket.",
        ),
    ]);

    Snapshot {
        products,
        categories,
        navigation_settings: Some(default_navigation_map()),
        version: Some(SNAPSHOT_VERSION.to_string()),
        ..Snapshot::default()
    }
}

fn category(id: &str, name: &str) -> (String, Category) {
    (
        id.to_string(),
        Category {
            name: Some(name.to_string()),
            image: Some(format!("/images/sample/{}.jpg", id)),
            extra: Map::new(),
        },
    )
}

fn product(
    id: &str,
    name: &str,
    price: u32,
    compare_at_price: u32,
    category: &str,
    description: &str,
) -> (String, Product) {
    let mut extra = Map::new();
    extra.insert("featured".to_string(), json!(false));

    (
        id.to_string(),
        Product {
            name: Some(name.to_string()),
            price: Some(json!(price)),
            description: Some(description.to_string()),
            image: Some(format!("/images/sample/{}.jpg", id)),
            category: Some(category.to_string()),
            in_stock: Some(true),
            compare_at_price: Some(json!(compare_at_price)),
            extra,
        },
    )
}
