//! Workspace export bundles.
//!
//! A bundle holds one workspace with its assets and conversations:
//!
//! ```json
//! { "version": "1.0.0", "workspace": {..}, "assets": [..], "conversations": [..] }
//! ```
//!
//! Bundles are what the browser app downloads as `pv-export-*.json` files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vault_core::{Asset, Conversation, Workspace, WorkspaceId};

use crate::errors::{Result, StoreError};
use crate::store::VaultStore;

/// Bundle format version written and accepted by this build.
pub const BUNDLE_VERSION: &str = "1.0.0";

/// Single-workspace export bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultExport {
    /// Bundle format version.
    pub version: String,
    /// Exported workspace.
    pub workspace: Workspace,
    /// Assets of the workspace.
    #[serde(default)]
    pub assets: Vec<Asset>,
    /// Conversations of the workspace.
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

/// Counts of what an import added to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Assets written.
    pub assets: usize,
    /// Conversations written.
    pub conversations: usize,
    /// Entries skipped because they belong to another workspace.
    pub skipped: usize,
}

/// Build a bundle for one workspace, or `None` if the workspace is unknown.
pub fn export_workspace(store: &VaultStore, workspace_id: &WorkspaceId) -> Option<VaultExport> {
    let workspace = store.workspace(workspace_id)?;
    Some(VaultExport {
        version: BUNDLE_VERSION.to_string(),
        assets: store.assets_in(workspace_id),
        conversations: store.conversations_in(workspace_id),
        workspace,
    })
}

/// Load a bundle into `store`, replacing entries with the same IDs.
///
/// Assets or conversations claiming a different workspace are skipped.
/// The import is all or nothing: if any entry is rejected (invalid name,
/// ID owned by another workspace), the store is left as it was.
pub fn import_bundle(store: &VaultStore, bundle: &VaultExport) -> Result<ImportSummary> {
    bundle.check_version()?;

    let summary = store.transaction(|state| {
        state.put_workspace(bundle.workspace.clone())?;

        let mut summary = ImportSummary::default();
        for asset in &bundle.assets {
            if asset.workspace_id != bundle.workspace.id {
                debug!(asset_id = %asset.id, "skipping asset from another workspace");
                summary.skipped += 1;
                continue;
            }
            state.put_asset(asset.clone())?;
            summary.assets += 1;
        }
        for conversation in &bundle.conversations {
            if conversation.workspace_id != bundle.workspace.id {
                debug!(conversation_id = %conversation.id, "skipping conversation from another workspace");
                summary.skipped += 1;
                continue;
            }
            state.put_conversation(conversation.clone())?;
            summary.conversations += 1;
        }
        Ok(summary)
    })?;

    info!(
        workspace = %bundle.workspace.id,
        assets = summary.assets,
        conversations = summary.conversations,
        skipped = summary.skipped,
        "bundle imported"
    );
    Ok(summary)
}

impl VaultExport {
    /// Parse and version-check a bundle.
    pub fn from_json(json: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_str(json)?;
        bundle.check_version()?;
        Ok(bundle)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_version(&self) -> Result<()> {
        if self.version == BUNDLE_VERSION {
            Ok(())
        } else {
            Err(StoreError::UnsupportedVersion {
                found: self.version.clone(),
                supported: BUNDLE_VERSION.to_string(),
            })
        }
    }
}

/// Read a bundle file.
pub fn read_bundle(path: &Path) -> Result<VaultExport> {
    VaultExport::from_json(&std::fs::read_to_string(path)?)
}

/// Write a bundle file, creating parent directories.
pub fn write_bundle(path: &Path, bundle: &VaultExport) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bundle.to_json()?)?;
    Ok(())
}

/// File name for an export: `pv-export-<workspace-slug>-<YYYY-MM-DD>.json`.
pub fn export_file_name(workspace: &Workspace, date: chrono::NaiveDate) -> String {
    let mut slug = String::with_capacity(workspace.name.len());
    for c in workspace.name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "workspace" } else { slug };
    format!("pv-export-{slug}-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use vault_core::{AssetType, Message};

    fn populated_store() -> (VaultStore, WorkspaceId) {
        let store = VaultStore::new();
        let workspace = Workspace::new("Team Prompts");
        let ws = workspace.id.clone();
        store.add_workspace(workspace).unwrap();
        store
            .add_asset(Asset::new(ws.clone(), "Reviewer", AssetType::Prompt, "Review."))
            .unwrap();
        let mut conversation = Conversation::new(ws.clone());
        conversation.messages.push(Message::user("#Reviewer this"));
        store.add_conversation(conversation).unwrap();
        (store, ws)
    }

    #[test]
    fn export_unknown_workspace_is_none() {
        let store = VaultStore::new();
        assert!(export_workspace(&store, &WorkspaceId::from("x")).is_none());
    }

    #[test]
    fn export_contains_only_workspace_entries() {
        let (store, ws) = populated_store();
        let other = Workspace::new("Other");
        let other_id = other.id.clone();
        store.add_workspace(other).unwrap();
        store
            .add_asset(Asset::new(other_id, "Elsewhere", AssetType::Skill, ""))
            .unwrap();

        let bundle = export_workspace(&store, &ws).unwrap();
        assert_eq!(bundle.version, "1.0.0");
        assert_eq!(bundle.assets.len(), 1);
        assert_eq!(bundle.conversations.len(), 1);
    }

    #[test]
    fn file_round_trip_into_fresh_store() {
        let (store, ws) = populated_store();
        let bundle = export_workspace(&store, &ws).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        write_bundle(&path, &bundle).unwrap();
        let loaded = read_bundle(&path).unwrap();
        assert_eq!(loaded, bundle);

        let fresh = VaultStore::new();
        let summary = import_bundle(&fresh, &loaded).unwrap();
        assert_eq!(summary.assets, 1);
        assert_eq!(summary.conversations, 1);
        assert_eq!(fresh.assets_in(&ws).len(), 1);
    }

    #[test]
    fn import_skips_foreign_entries() {
        let (store, ws) = populated_store();
        let mut bundle = export_workspace(&store, &ws).unwrap();
        bundle.assets[0].workspace_id = WorkspaceId::from("foreign");

        let summary = import_bundle(&VaultStore::new(), &bundle).unwrap();
        assert_eq!(summary.assets, 0);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn rejected_entry_leaves_store_unchanged() {
        let workspace = Workspace::new("Imported");
        let ws = workspace.id.clone();
        let bundle = VaultExport {
            version: BUNDLE_VERSION.to_string(),
            workspace,
            assets: vec![
                Asset::new(ws.clone(), "Good", AssetType::Skill, ""),
                Asset::new(ws.clone(), "  ", AssetType::Skill, ""),
            ],
            conversations: vec![Conversation::new(ws.clone())],
        };

        let store = VaultStore::new();
        assert_matches!(import_bundle(&store, &bundle), Err(StoreError::Validation(_)));
        assert!(store.workspaces().is_empty());
        assert!(store.assets_in(&ws).is_empty());
        assert!(store.conversations_in(&ws).is_empty());
    }

    #[test]
    fn import_cannot_take_over_another_workspace_id() {
        let (store, ws) = populated_store();
        let before = store.snapshot();
        let existing = store.assets_in(&ws)[0].clone();

        let workspace = Workspace::new("Intruder");
        let mut stolen = existing.clone();
        stolen.workspace_id = workspace.id.clone();
        stolen.content = "replaced".into();
        let bundle = VaultExport {
            version: BUNDLE_VERSION.to_string(),
            workspace,
            assets: vec![stolen],
            conversations: Vec::new(),
        };

        assert_matches!(
            import_bundle(&store, &bundle),
            Err(StoreError::IdConflict { entity: "asset", .. })
        );
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.asset(&existing.id).unwrap().content, "Review.");
    }

    #[test]
    fn wrong_version_is_rejected() {
        let json = r#"{"version": "2.0.0", "workspace": {"id": "w", "name": "W"}}"#;
        assert_matches!(
            VaultExport::from_json(json),
            Err(StoreError::UnsupportedVersion { .. })
        );
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert_matches!(VaultExport::from_json("{"), Err(StoreError::Json(_)));
    }

    #[test]
    fn export_file_name_slugifies() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let workspace = Workspace::new("  Team Prompts / v2 ");
        assert_eq!(
            export_file_name(&workspace, date),
            "pv-export-team-prompts-v2-2026-03-09.json"
        );
        let unnamed = Workspace::new("!!!");
        assert_eq!(
            export_file_name(&unnamed, date),
            "pv-export-workspace-2026-03-09.json"
        );
    }
}
