//! Workspace-scoped asset pool.
//!
//! Borrows assets from an external store snapshot and keeps only the ones
//! owned by a single workspace, so nothing downstream can resolve across
//! workspaces. Name candidates are kept longest-first for prefix matching.

use std::collections::HashMap;

use tracing::debug;
use vault_core::{Asset, WorkspaceId};

/// Read-only view over the assets of one workspace.
#[derive(Debug, Clone)]
pub struct AssetPool<'a> {
    workspace_id: WorkspaceId,
    by_id: HashMap<&'a str, &'a Asset>,
    by_name_len: Vec<&'a Asset>,
}

impl<'a> AssetPool<'a> {
    /// Build a pool from any asset snapshot, keeping only `workspace_id`'s assets.
    ///
    /// When two assets share an ID the first one wins.
    pub fn new<I>(workspace_id: &WorkspaceId, assets: I) -> Self
    where
        I: IntoIterator<Item = &'a Asset>,
    {
        let mut by_id = HashMap::new();
        let mut by_name_len = Vec::new();

        for asset in assets {
            if asset.workspace_id != *workspace_id {
                continue;
            }
            if by_id.contains_key(asset.id.as_str()) {
                debug!(asset_id = %asset.id, "duplicate asset id in pool, keeping first");
                continue;
            }
            let _ = by_id.insert(asset.id.as_str(), asset);
            if !asset.name.trim().is_empty() {
                by_name_len.push(asset);
            }
        }

        // Longest names first; stable sort keeps snapshot order among equals.
        by_name_len.sort_by_key(|a| std::cmp::Reverse(a.name.trim().chars().count()));

        Self {
            workspace_id: workspace_id.clone(),
            by_id,
            by_name_len,
        }
    }

    /// Workspace this pool is scoped to.
    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    /// Look up an asset by ID.
    pub fn get(&self, id: &str) -> Option<&'a Asset> {
        self.by_id.get(id).copied()
    }

    /// Assets with a non-empty name, longest name first.
    pub fn name_candidates(&self) -> &[&'a Asset] {
        &self.by_name_len
    }

    /// Number of assets in scope.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the pool has no assets.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
