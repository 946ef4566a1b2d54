//! Versioned migration of persisted store snapshots.
//!
//! Snapshots carry a numeric `schemaVersion`. Loading walks the migration
//! table one version at a time on the raw JSON until the snapshot reaches
//! [`CURRENT_SCHEMA_VERSION`]. Snapshots written before versioning existed
//! have no `schemaVersion` and start at 0.

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{Result, StoreError};

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

type Migration = fn(Map<String, Value>) -> Map<String, Value>;

/// Migration producing version `index + 1`.
const MIGRATIONS: &[Migration] = &[to_v1];

/// Upgrade a raw snapshot to the current schema.
pub fn migrate(raw: Value) -> Result<Value> {
    let Value::Object(mut snapshot) = raw else {
        return Err(StoreError::UnsupportedVersion {
            found: "non-object snapshot".to_string(),
            supported: CURRENT_SCHEMA_VERSION.to_string(),
        });
    };

    let mut version = schema_version(&snapshot);
    if version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: version.to_string(),
            supported: CURRENT_SCHEMA_VERSION.to_string(),
        });
    }

    while version < CURRENT_SCHEMA_VERSION {
        let migration = MIGRATIONS[version as usize];
        snapshot = migration(snapshot);
        version += 1;
        debug!(version, "migrated store snapshot");
    }

    let _ = snapshot.remove("version");
    let _ = snapshot.insert("schemaVersion".to_string(), Value::from(version));
    Ok(Value::Object(snapshot))
}

fn schema_version(snapshot: &Map<String, Value>) -> u32 {
    snapshot
        .get("schemaVersion")
        .or_else(|| snapshot.get("version"))
        .and_then(Value::as_u64)
        .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// v0 → v1: assets gain `tags` and `updatedAt`; conversations gain `title`
/// and `updatedAt`; messages gain `mentions`.
fn to_v1(mut snapshot: Map<String, Value>) -> Map<String, Value> {
    if let Some(Value::Array(assets)) = snapshot.get_mut("assets") {
        for asset in assets.iter_mut().filter_map(Value::as_object_mut) {
            let _ = asset
                .entry("tags")
                .or_insert_with(|| Value::Array(Vec::new()));
            backfill_updated_at(asset);
        }
    }

    if let Some(Value::Array(conversations)) = snapshot.get_mut("conversations") {
        for conversation in conversations.iter_mut().filter_map(Value::as_object_mut) {
            let _ = conversation
                .entry("title")
                .or_insert_with(|| Value::from("New Conversation"));
            backfill_updated_at(conversation);
            if let Some(Value::Array(messages)) = conversation.get_mut("messages") {
                for message in messages.iter_mut().filter_map(Value::as_object_mut) {
                    let _ = message
                        .entry("mentions")
                        .or_insert_with(|| Value::Array(Vec::new()));
                }
            }
        }
    }

    snapshot
}

fn backfill_updated_at(entity: &mut Map<String, Value>) {
    if !entity.contains_key("updatedAt") {
        let created = entity.get("createdAt").cloned().unwrap_or_else(|| Value::from(0));
        let _ = entity.insert("updatedAt".to_string(), created);
    }
}
