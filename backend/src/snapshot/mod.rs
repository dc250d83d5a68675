//! Snapshot assembly.
//!
//! The builder turns the admin draft into the document that gets published:
//! it stamps publish time and schema version and fills in sections the
//! storefront cannot render without.

mod defaults;
mod sample;

pub use defaults::*;
pub use sample::sample_snapshot;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::models::{Snapshot, SNAPSHOT_VERSION};

/// A built snapshot plus the sections that were synthesized for it.
#[derive(Debug, Clone)]
pub struct BuiltSnapshot {
    pub snapshot: Snapshot,
    pub defaults_applied: Vec<&'static str>,
}

/// Build the outgoing snapshot, stamped with the current time.
pub fn build(draft: Snapshot) -> BuiltSnapshot {
    build_at(draft, Utc::now())
}

/// Build the outgoing snapshot with an explicit publish time.
///
/// `published_at` and `version` are always overwritten; whatever the caller
/// sent for them is discarded.
pub fn build_at(draft: Snapshot, now: DateTime<Utc>) -> BuiltSnapshot {
    let mut snapshot = draft;
    let mut defaults_applied = Vec::new();

    snapshot.published_at = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
    snapshot.version = Some(SNAPSHOT_VERSION.to_string());

    if snapshot
        .navigation_settings
        .as_ref()
        .map_or(true, Map::is_empty)
    {
        snapshot.navigation_settings = Some(default_navigation_map());
        defaults_applied.push("navigation_settings");
        tracing::info!("No navigation settings in draft, applied defaults");
    }

    BuiltSnapshot {
        snapshot,
        defaults_applied,
    }
}

fn default_navigation_map() -> Map<String, Value> {
    match serde_json::to_value(NavigationSettings::default()) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
