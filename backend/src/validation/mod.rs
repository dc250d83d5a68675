//! Catalog validation.
//!
//! Validation is pure: it inspects a candidate snapshot and reports hard
//! errors (which make the snapshot unpublishable) and warnings (which are
//! surfaced to the operator but never block).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Category, Offer, Product, Review, Snapshot};

/// How a product pointing at a category that does not exist is reported.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    Warn,
    Error,
}

impl FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" | "warning" => Ok(OrphanPolicy::Warn),
            "error" => Ok(OrphanPolicy::Error),
            other => Err(format!("unknown orphan policy '{}'", other)),
        }
    }
}

/// Tunable validation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationPolicy {
    /// Prices above this are flagged as likely typos.
    pub price_warning_threshold: f64,
    pub orphan_policy: OrphanPolicy,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            price_warning_threshold: 100_000.0,
            orphan_policy: OrphanPolicy::Warn,
        }
    }
}

/// Section counts for the candidate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub product_count: usize,
    pub category_count: usize,
    pub review_count: usize,
    pub offer_count: usize,
}

/// Result of validating a candidate snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

#[derive(Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Findings {
    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Validate a candidate snapshot.
pub fn validate(snapshot: &Snapshot, policy: &ValidationPolicy) -> ValidationReport {
    let mut findings = Findings::default();

    if snapshot.products.is_empty() {
        findings.error("Cannot publish without products".to_string());
    }
    if snapshot.categories.is_empty() {
        findings.error("Cannot publish without categories".to_string());
    }

    for (id, product) in &snapshot.products {
        check_product(id, product, snapshot, policy, &mut findings);
    }
    for (id, category) in &snapshot.categories {
        check_category(id, category, &mut findings);
    }
    for (id, review) in snapshot.reviews.iter().flatten() {
        check_review(id, review, &mut findings);
    }
    for (id, offer) in snapshot.offers.iter().flatten() {
        check_offer(id, offer, &mut findings);
    }

    ValidationReport {
        valid: findings.errors.is_empty(),
        errors: findings.errors,
        warnings: findings.warnings,
        stats: ValidationStats {
            product_count: snapshot.products.len(),
            category_count: snapshot.categories.len(),
            review_count: snapshot.review_count(),
            offer_count: snapshot.offer_count(),
        },
    }
}

fn check_product(
    id: &str,
    product: &Product,
    snapshot: &Snapshot,
    policy: &ValidationPolicy,
    findings: &mut Findings,
) {
    if is_blank(product.name.as_deref()) {
        findings.error(format!("Product {} missing name", id));
    }

    let price = match &product.price {
        None => {
            findings.error(format!("Product {} missing price", id));
            None
        }
        Some(_) => match product.price_amount() {
            None => {
                findings.error(format!("Product {} has invalid price", id));
                None
            }
            Some(p) if p < 0.0 => {
                findings.error(format!("Product {} has negative price {}", id, p));
                None
            }
            Some(p) => {
                if p > policy.price_warning_threshold {
                    findings.warn(format!(
                        "Product {} price {} exceeds {}",
                        id, p, policy.price_warning_threshold
                    ));
                }
                Some(p)
            }
        },
    };

    if product.compare_at_price.as_ref().is_some_and(|v| !is_blank_value(v)) {
        match (product.compare_at_amount(), price) {
            (None, _) => findings.error(format!("Product {} has invalid compare-at price", id)),
            (Some(compare), Some(p)) if compare < p => findings.error(format!(
                "Product {} compare-at price {} is lower than price {}",
                id, compare, p
            )),
            _ => {}
        }
    }

    match product.category.as_deref().map(str::trim) {
        None | Some("") => findings.warn(format!("Product {} missing category", id)),
        Some(category) if !snapshot.categories.contains_key(category) => {
            let message = format!("Product {} references unknown category {}", id, category);
            match policy.orphan_policy {
                OrphanPolicy::Warn => findings.warn(message),
                OrphanPolicy::Error => findings.error(message),
            }
        }
        Some(_) => {}
    }

    if is_blank(product.image.as_deref()) {
        findings.warn(format!("Product {} missing image", id));
    }
    if is_blank(product.description.as_deref()) {
        findings.warn(format!("Product {} missing description", id));
    }
}

fn check_category(id: &str, category: &Category, findings: &mut Findings) {
    if is_blank(category.name.as_deref()) {
        findings.error(format!("Category {} missing name", id));
    }
    if is_blank(category.image.as_deref()) {
        findings.warn(format!("Category {} missing image", id));
    }
}

fn check_review(id: &str, review: &Review, findings: &mut Findings) {
    if is_blank(review.name.as_deref()) {
        findings.error(format!("Review {} missing customer name", id));
    }
    if is_blank(review.text.as_deref()) {
        findings.error(format!("Review {} missing review text", id));
    }
    if review.active.is_none() {
        findings.warn(format!("Review {} missing active flag", id));
    }
}

fn check_offer(id: &str, offer: &Offer, findings: &mut Findings) {
    if is_blank(offer.title.as_deref()) {
        findings.error(format!("Offer {} missing title", id));
    }
    if offer.active.is_none() {
        findings.warn(format!("Offer {} missing active flag", id));
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

// Dashboard forms submit "" for a cleared compare-at price.
fn is_blank_value(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim().is_empty())
}
