//! In-memory vault store.
//!
//! Holds every workspace, asset, and conversation behind a single
//! `parking_lot::RwLock`. Reads hand out owned clones so callers can run
//! the compiler on a snapshot without holding the lock.

use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vault_compiler::{CompileOptions, CompiledPrompt, compile_conversation};
use vault_core::{
    Asset, AssetId, AssetType, Conversation, ConversationId, Message, Workspace, WorkspaceId,
    now_ms,
};

use crate::errors::{Result, StoreError};
use crate::migration::{CURRENT_SCHEMA_VERSION, migrate};

/// Persisted form of the whole store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSnapshot {
    /// Schema version of this snapshot.
    pub schema_version: u32,
    /// All workspaces.
    pub workspaces: Vec<Workspace>,
    /// All assets, across workspaces.
    pub assets: Vec<Asset>,
    /// All conversations, across workspaces.
    pub conversations: Vec<Conversation>,
    /// Workspace selected in the UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_workspace_id: Option<WorkspaceId>,
    /// Conversation selected in the UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_conversation_id: Option<ConversationId>,
}

impl StoreSnapshot {
    fn has_workspace(&self, id: &WorkspaceId) -> bool {
        self.workspaces.iter().any(|w| w.id == *id)
    }

    pub(crate) fn put_workspace(&mut self, workspace: Workspace) -> Result<()> {
        workspace.validate()?;
        match self.workspaces.iter_mut().find(|w| w.id == workspace.id) {
            Some(existing) => *existing = workspace,
            None => self.workspaces.push(workspace),
        }
        Ok(())
    }

    /// Insert or replace an asset. Replacement is only allowed within the
    /// asset's own workspace.
    pub(crate) fn put_asset(&mut self, asset: Asset) -> Result<()> {
        asset.validate()?;
        if !self.has_workspace(&asset.workspace_id) {
            return Err(StoreError::WorkspaceNotFound(asset.workspace_id.to_string()));
        }
        match self.assets.iter_mut().find(|a| a.id == asset.id) {
            Some(existing) if existing.workspace_id != asset.workspace_id => {
                Err(StoreError::IdConflict {
                    entity: "asset",
                    id: asset.id.to_string(),
                    owner: existing.workspace_id.to_string(),
                })
            }
            Some(existing) => {
                *existing = asset;
                Ok(())
            }
            None => {
                self.assets.push(asset);
                Ok(())
            }
        }
    }

    /// Insert or replace a conversation, with the same workspace rule as
    /// [`Self::put_asset`].
    pub(crate) fn put_conversation(&mut self, conversation: Conversation) -> Result<()> {
        if !self.has_workspace(&conversation.workspace_id) {
            return Err(StoreError::WorkspaceNotFound(
                conversation.workspace_id.to_string(),
            ));
        }
        match self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation.id)
        {
            Some(existing) if existing.workspace_id != conversation.workspace_id => {
                Err(StoreError::IdConflict {
                    entity: "conversation",
                    id: conversation.id.to_string(),
                    owner: existing.workspace_id.to_string(),
                })
            }
            Some(existing) => {
                *existing = conversation;
                Ok(())
            }
            None => {
                self.conversations.push(conversation);
                Ok(())
            }
        }
    }
}

/// Partial update for an asset. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct AssetPatch {
    /// New name.
    pub name: Option<String>,
    /// New description (`Some(None)` clears it).
    pub description: Option<Option<String>>,
    /// New type.
    pub asset_type: Option<AssetType>,
    /// New content.
    pub content: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct VaultStore {
    state: RwLock<StoreSnapshot>,
}

impl VaultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::from_snapshot(StoreSnapshot::default())
    }

    /// Create a store from a snapshot (assumed current schema).
    pub fn from_snapshot(mut snapshot: StoreSnapshot) -> Self {
        snapshot.schema_version = CURRENT_SCHEMA_VERSION;
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Load a persisted snapshot, migrating it to the current schema.
    ///
    /// A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(?path, "store file not found, starting empty");
            return Ok(Self::new());
        }
        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        let snapshot: StoreSnapshot = serde_json::from_value(migrate(raw)?)?;
        info!(
            ?path,
            workspaces = snapshot.workspaces.len(),
            assets = snapshot.assets.len(),
            "store loaded"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Persist the store as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json)?;
        debug!(?path, "store saved");
        Ok(())
    }

    /// Clone the full store state.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.read().clone()
    }

    /// Apply `apply` to a staged copy of the state under the write lock.
    ///
    /// The staged copy replaces the state only if `apply` succeeds, so a
    /// failed batch leaves the store untouched.
    pub(crate) fn transaction<T>(
        &self,
        apply: impl FnOnce(&mut StoreSnapshot) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.write();
        let mut staged = state.clone();
        let value = apply(&mut staged)?;
        *state = staged;
        Ok(value)
    }

    // ── Workspaces ──────────────────────────────────────────────────────

    /// Add a workspace. An existing workspace with the same ID is replaced.
    pub fn add_workspace(&self, workspace: Workspace) -> Result<()> {
        self.state.write().put_workspace(workspace)
    }

    /// Look up a workspace.
    pub fn workspace(&self, id: &WorkspaceId) -> Option<Workspace> {
        self.state
            .read()
            .workspaces
            .iter()
            .find(|w| w.id == *id)
            .cloned()
    }

    /// All workspaces, in insertion order.
    pub fn workspaces(&self) -> Vec<Workspace> {
        self.state.read().workspaces.clone()
    }

    /// Select the active workspace.
    pub fn set_active_workspace(&self, id: Option<WorkspaceId>) -> Result<()> {
        let mut state = self.state.write();
        if let Some(id) = &id {
            if !state.workspaces.iter().any(|w| w.id == *id) {
                return Err(StoreError::WorkspaceNotFound(id.to_string()));
            }
        }
        state.active_workspace_id = id;
        Ok(())
    }

    /// Currently selected workspace ID.
    pub fn active_workspace_id(&self) -> Option<WorkspaceId> {
        self.state.read().active_workspace_id.clone()
    }

    // ── Assets ──────────────────────────────────────────────────────────

    /// Add an asset to an existing workspace.
    ///
    /// An asset with the same ID in the same workspace is replaced. An ID
    /// owned by another workspace is an [`StoreError::IdConflict`].
    pub fn add_asset(&self, asset: Asset) -> Result<()> {
        self.state.write().put_asset(asset)
    }

    /// Look up an asset.
    pub fn asset(&self, id: &AssetId) -> Option<Asset> {
        self.state.read().assets.iter().find(|a| a.id == *id).cloned()
    }

    /// Apply a partial update and bump `updated_at`. Returns the updated asset.
    pub fn update_asset(&self, id: &AssetId, patch: AssetPatch) -> Result<Asset> {
        let mut state = self.state.write();
        let asset = state
            .assets
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| StoreError::AssetNotFound(id.to_string()))?;

        let mut updated = asset.clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }
        if let Some(asset_type) = patch.asset_type {
            updated.asset_type = asset_type;
        }
        if let Some(content) = patch.content {
            updated.content = content;
        }
        if let Some(tags) = patch.tags {
            updated.tags = tags;
        }
        updated.validate()?;
        updated.updated_at = now_ms().max(asset.updated_at);

        *asset = updated.clone();
        Ok(updated)
    }

    /// Remove an asset. Recorded mentions pointing at it become dangling
    /// and resolve to nothing.
    pub fn delete_asset(&self, id: &AssetId) -> Result<Asset> {
        let mut state = self.state.write();
        let index = state
            .assets
            .iter()
            .position(|a| a.id == *id)
            .ok_or_else(|| StoreError::AssetNotFound(id.to_string()))?;
        Ok(state.assets.remove(index))
    }

    /// All assets of a workspace, in insertion order.
    pub fn assets_in(&self, workspace_id: &WorkspaceId) -> Vec<Asset> {
        self.state
            .read()
            .assets
            .iter()
            .filter(|a| a.workspace_id == *workspace_id)
            .cloned()
            .collect()
    }

    // ── Conversations ───────────────────────────────────────────────────

    /// Add a conversation to an existing workspace, replacing one with the
    /// same ID in that workspace.
    pub fn add_conversation(&self, conversation: Conversation) -> Result<()> {
        self.state.write().put_conversation(conversation)
    }

    /// Append a message and bump the conversation's `updated_at`.
    pub fn append_message(&self, conversation_id: &ConversationId, message: Message) -> Result<()> {
        let mut state = self.state.write();
        let conversation = state
            .conversations
            .iter_mut()
            .find(|c| c.id == *conversation_id)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation_id.to_string()))?;
        conversation.updated_at = message.created_at.max(conversation.updated_at);
        conversation.messages.push(message);
        Ok(())
    }

    /// Look up a conversation.
    pub fn conversation(&self, id: &ConversationId) -> Option<Conversation> {
        self.state
            .read()
            .conversations
            .iter()
            .find(|c| c.id == *id)
            .cloned()
    }

    /// All conversations of a workspace, in insertion order.
    pub fn conversations_in(&self, workspace_id: &WorkspaceId) -> Vec<Conversation> {
        self.state
            .read()
            .conversations
            .iter()
            .filter(|c| c.workspace_id == *workspace_id)
            .cloned()
            .collect()
    }

    /// Select the active conversation.
    pub fn set_active_conversation(&self, id: Option<ConversationId>) -> Result<()> {
        let mut state = self.state.write();
        if let Some(id) = &id {
            if !state.conversations.iter().any(|c| c.id == *id) {
                return Err(StoreError::ConversationNotFound(id.to_string()));
            }
        }
        state.active_conversation_id = id;
        Ok(())
    }

    /// Currently selected conversation ID.
    pub fn active_conversation_id(&self) -> Option<ConversationId> {
        self.state.read().active_conversation_id.clone()
    }

    /// Compile a conversation against its workspace's assets.
    pub fn compile(
        &self,
        conversation_id: &ConversationId,
        options: &CompileOptions,
    ) -> Result<CompiledPrompt> {
        let conversation = self
            .conversation(conversation_id)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation_id.to_string()))?;
        let assets = self.assets_in(&conversation.workspace_id);
        Ok(compile_conversation(&conversation, &assets, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use vault_core::Role;

    fn store_with_workspace() -> (VaultStore, WorkspaceId) {
        let store = VaultStore::new();
        let workspace = Workspace::new("Main");
        let id = workspace.id.clone();
        store.add_workspace(workspace).unwrap();
        (store, id)
    }

    #[test]
    fn add_asset_requires_workspace() {
        let store = VaultStore::new();
        let asset = Asset::new(WorkspaceId::from("nope"), "A", AssetType::Skill, "");
        assert_matches!(store.add_asset(asset), Err(StoreError::WorkspaceNotFound(_)));
    }

    #[test]
    fn add_asset_validates_name() {
        let (store, ws) = store_with_workspace();
        let asset = Asset::new(ws, "", AssetType::Skill, "");
        assert_matches!(store.add_asset(asset), Err(StoreError::Validation(_)));
    }

    #[test]
    fn assets_are_scoped_to_workspace() {
        let (store, ws) = store_with_workspace();
        let other = Workspace::new("Other");
        let other_id = other.id.clone();
        store.add_workspace(other).unwrap();

        store
            .add_asset(Asset::new(ws.clone(), "A", AssetType::Skill, ""))
            .unwrap();
        store
            .add_asset(Asset::new(other_id.clone(), "B", AssetType::Prompt, ""))
            .unwrap();

        assert_eq!(store.assets_in(&ws).len(), 1);
        assert_eq!(store.assets_in(&other_id)[0].name, "B");
    }

    #[test]
    fn add_asset_replaces_within_workspace() {
        let (store, ws) = store_with_workspace();
        let mut asset = Asset::new(ws.clone(), "A", AssetType::Skill, "v1");
        store.add_asset(asset.clone()).unwrap();
        asset.content = "v2".into();
        store.add_asset(asset.clone()).unwrap();

        let assets = store.assets_in(&ws);
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].content, "v2");
    }

    #[test]
    fn asset_id_of_another_workspace_is_a_conflict() {
        let (store, ws) = store_with_workspace();
        let other = Workspace::new("Other");
        let other_id = other.id.clone();
        store.add_workspace(other).unwrap();

        let mut asset = Asset::new(ws.clone(), "Mine", AssetType::Skill, "");
        asset.id = "shared".into();
        store.add_asset(asset).unwrap();

        let mut intruder = Asset::new(other_id.clone(), "Theirs", AssetType::Skill, "");
        intruder.id = "shared".into();
        assert_matches!(
            store.add_asset(intruder),
            Err(StoreError::IdConflict { entity: "asset", .. })
        );
        assert_eq!(store.assets_in(&ws)[0].name, "Mine");
        assert!(store.assets_in(&other_id).is_empty());
    }

    #[test]
    fn conversation_id_of_another_workspace_is_a_conflict() {
        let (store, ws) = store_with_workspace();
        let other = Workspace::new("Other");
        let other_id = other.id.clone();
        store.add_workspace(other).unwrap();

        let mut conversation = Conversation::new(ws.clone());
        conversation.id = "c1".into();
        store.add_conversation(conversation).unwrap();

        let mut intruder = Conversation::new(other_id.clone());
        intruder.id = "c1".into();
        assert_matches!(
            store.add_conversation(intruder),
            Err(StoreError::IdConflict { entity: "conversation", .. })
        );
        assert_eq!(store.conversations_in(&ws).len(), 1);
        assert!(store.conversations_in(&other_id).is_empty());
    }

    #[test]
    fn failed_transaction_leaves_state_untouched() {
        let (store, ws) = store_with_workspace();
        let before = store.snapshot();
        let result = store.transaction(|state| {
            state.put_asset(Asset::new(ws.clone(), "Good", AssetType::Skill, ""))?;
            state.put_asset(Asset::new(ws.clone(), " ", AssetType::Skill, ""))
        });
        assert_matches!(result, Err(StoreError::Validation(_)));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn update_asset_applies_patch() {
        let (store, ws) = store_with_workspace();
        let mut asset = Asset::new(ws, "A", AssetType::Skill, "old");
        asset.updated_at = 0;
        let id = asset.id.clone();
        store.add_asset(asset).unwrap();

        let updated = store
            .update_asset(
                &id,
                AssetPatch {
                    content: Some("new".into()),
                    description: Some(Some("desc".into())),
                    ..AssetPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.content, "new");
        assert_eq!(updated.name, "A");
        assert_eq!(updated.description.as_deref(), Some("desc"));
        assert!(updated.updated_at > 0);
        assert_eq!(store.asset(&id).unwrap().content, "new");
    }

    #[test]
    fn update_asset_rejects_empty_name() {
        let (store, ws) = store_with_workspace();
        let asset = Asset::new(ws, "A", AssetType::Skill, "");
        let id = asset.id.clone();
        store.add_asset(asset).unwrap();

        let patch = AssetPatch {
            name: Some(" ".into()),
            ..AssetPatch::default()
        };
        assert_matches!(store.update_asset(&id, patch), Err(StoreError::Validation(_)));
        assert_eq!(store.asset(&id).unwrap().name, "A");
    }

    #[test]
    fn delete_asset() {
        let (store, ws) = store_with_workspace();
        let asset = Asset::new(ws.clone(), "A", AssetType::Skill, "");
        let id = asset.id.clone();
        store.add_asset(asset).unwrap();

        assert_eq!(store.delete_asset(&id).unwrap().name, "A");
        assert!(store.assets_in(&ws).is_empty());
        assert_matches!(store.delete_asset(&id), Err(StoreError::AssetNotFound(_)));
    }

    #[test]
    fn append_message_and_compile() {
        let (store, ws) = store_with_workspace();
        store
            .add_asset(Asset::new(ws.clone(), "Helper", AssetType::Skill, "Help."))
            .unwrap();
        let conversation = Conversation::new(ws);
        let conv_id = conversation.id.clone();
        store.add_conversation(conversation).unwrap();
        store
            .append_message(&conv_id, Message::user("use @Helper"))
            .unwrap();
        store
            .append_message(&conv_id, Message::new(Role::Assistant, "ok"))
            .unwrap();

        let compiled = store.compile(&conv_id, &CompileOptions::default()).unwrap();
        assert_eq!(compiled.asset_count, 1);
        assert!(compiled.text.contains("## SKILL: Helper\nHelp."));
        assert!(compiled.text.ends_with("## USER MESSAGE\nuse @Helper"));
    }

    #[test]
    fn compile_unknown_conversation_fails() {
        let store = VaultStore::new();
        assert_matches!(
            store.compile(&ConversationId::from("x"), &CompileOptions::default()),
            Err(StoreError::ConversationNotFound(_))
        );
    }

    #[test]
    fn active_selection_must_exist() {
        let (store, ws) = store_with_workspace();
        store.set_active_workspace(Some(ws.clone())).unwrap();
        assert_eq!(store.active_workspace_id(), Some(ws));
        assert_matches!(
            store.set_active_conversation(Some(ConversationId::from("missing"))),
            Err(StoreError::ConversationNotFound(_))
        );
        store.set_active_conversation(None).unwrap();
        assert!(store.active_conversation_id().is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vault.json");
        let (store, ws) = store_with_workspace();
        store
            .add_asset(Asset::new(ws.clone(), "A", AssetType::Workflow, "steps"))
            .unwrap();
        store.set_active_workspace(Some(ws.clone())).unwrap();
        store.save(&path).unwrap();

        let loaded = VaultStore::load(&path).unwrap();
        assert_eq!(loaded.snapshot(), store.snapshot());
        assert_eq!(loaded.assets_in(&ws)[0].asset_type, AssetType::Workflow);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let store = VaultStore::load(Path::new("/nonexistent/vault.json")).unwrap();
        assert!(store.workspaces().is_empty());
    }
}
