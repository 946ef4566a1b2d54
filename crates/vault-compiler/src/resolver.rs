//! Reference resolution.
//!
//! Expands top-level mentions into the transitive closure of referenced
//! assets. Each asset's content is scanned for further mentions, which are
//! followed up to `max_depth` levels beyond the directly mentioned assets.
//!
//! Expansion is breadth-first, one level at a time. A single visited set is
//! shared by the whole traversal, so an asset is emitted and expanded at most
//! once, at its shortest distance from the directly mentioned assets. The
//! resolved set therefore does not depend on mention order, and resolution
//! stays finite on cyclic content graphs.

use std::collections::HashSet;

use tracing::debug;
use vault_core::{Asset, Mention};

use crate::constants::DEFAULT_MAX_DEPTH;
use crate::extractor::{MatchOptions, extract_mentions};
use crate::pool::AssetPool;

/// Resolution bounds and matching rules for nested mentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Levels of indirection followed beyond the directly mentioned assets.
    pub max_depth: usize,
    /// Matching rules for mentions found inside asset content.
    pub matching: MatchOptions,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            matching: MatchOptions::default(),
        }
    }
}

/// Resolve `mentions` to assets of `pool`, in discovery order.
///
/// Directly mentioned assets come first, then each further level in the
/// order its assets were found. Mentions whose asset is not in the pool
/// contribute nothing. The result never contains the same asset twice.
pub fn resolve<'a>(
    mentions: &[Mention],
    pool: &AssetPool<'a>,
    options: &ResolveOptions,
) -> Vec<&'a Asset> {
    let mut visited = HashSet::new();
    let mut resolved = Vec::new();
    let mut frontier = admit(mentions, pool, &mut visited, &mut resolved);

    let mut depth = 0;
    while depth < options.max_depth && !frontier.is_empty() {
        let mut next = Vec::new();
        for asset in frontier {
            let nested = extract_mentions(&asset.content, pool, &options.matching);
            next.extend(admit(&nested, pool, &mut visited, &mut resolved));
        }
        frontier = next;
        depth += 1;
    }

    debug!(
        workspace = %pool.workspace_id(),
        requested = mentions.len(),
        resolved = resolved.len(),
        depth,
        "resolved mentions"
    );
    resolved
}

/// Append the unvisited assets of `mentions` to `resolved`, returning them.
fn admit<'a>(
    mentions: &[Mention],
    pool: &AssetPool<'a>,
    visited: &mut HashSet<&'a str>,
    resolved: &mut Vec<&'a Asset>,
) -> Vec<&'a Asset> {
    let mut admitted = Vec::new();
    for mention in mentions {
        let Some(asset) = pool.get(mention.asset_id.as_str()) else {
            debug!(asset_id = %mention.asset_id, "mention points outside the pool");
            continue;
        };
        if visited.insert(asset.id.as_str()) {
            resolved.push(asset);
            admitted.push(asset);
        }
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::{AssetType, WorkspaceId};

    fn make_asset(id: &str, name: &str, content: &str) -> Asset {
        let mut asset = Asset::new(WorkspaceId::from("ws"), name, AssetType::Skill, content);
        asset.id = id.into();
        asset
    }

    fn ids(resolved: &[&Asset]) -> Vec<String> {
        resolved.iter().map(|a| a.id.to_string()).collect()
    }

    fn resolve_from(assets: &[Asset], start: &str, max_depth: usize) -> Vec<String> {
        let pool = AssetPool::new(&WorkspaceId::from("ws"), assets);
        let first = pool.get(start).unwrap().mention();
        let options = ResolveOptions {
            max_depth,
            ..ResolveOptions::default()
        };
        ids(&resolve(&[first], &pool, &options))
    }

    #[test]
    fn single_asset_without_references() {
        let assets = vec![make_asset("a", "Alpha", "plain")];
        assert_eq!(resolve_from(&assets, "a", 3), vec!["a"]);
    }

    #[test]
    fn follows_nested_reference() {
        let assets = vec![
            make_asset("a", "Alpha", "uses @Beta"),
            make_asset("b", "Beta", "leaf"),
        ];
        assert_eq!(resolve_from(&assets, "a", 3), vec!["a", "b"]);
    }

    #[test]
    fn two_cycle_yields_both_once() {
        let assets = vec![
            make_asset("a", "Alpha", "see @Beta"),
            make_asset("b", "Beta", "see @Alpha"),
        ];
        assert_eq!(resolve_from(&assets, "a", 3), vec!["a", "b"]);
    }

    #[test]
    fn self_reference_included_once() {
        let assets = vec![make_asset("a", "Alpha", "recurse into @Alpha forever")];
        assert_eq!(resolve_from(&assets, "a", 3), vec!["a"]);
    }

    #[test]
    fn depth_zero_keeps_only_direct_mentions() {
        let assets = vec![
            make_asset("a", "Alpha", "see @Beta"),
            make_asset("b", "Beta", ""),
        ];
        assert_eq!(resolve_from(&assets, "a", 0), vec!["a"]);
    }

    #[test]
    fn dangling_mention_contributes_nothing() {
        let assets = vec![make_asset("a", "Alpha", "")];
        let pool = AssetPool::new(&WorkspaceId::from("ws"), &assets);
        let dangling = Mention {
            id: None,
            asset_type: AssetType::Skill,
            name: "Gone".into(),
            asset_id: "missing".into(),
        };
        let resolved = resolve(
            &[dangling, assets[0].mention()],
            &pool,
            &ResolveOptions::default(),
        );
        assert_eq!(ids(&resolved), vec!["a"]);
    }

    #[test]
    fn discovery_order_is_level_by_level() {
        let assets = vec![
            make_asset("a", "Alpha", "@Gamma"),
            make_asset("b", "Beta", ""),
            make_asset("c", "Gamma", ""),
        ];
        let pool = AssetPool::new(&WorkspaceId::from("ws"), &assets);
        let mentions = vec![assets[0].mention(), assets[1].mention()];
        let resolved = resolve(&mentions, &pool, &ResolveOptions::default());
        assert_eq!(ids(&resolved), vec!["a", "b", "c"]);
    }

    #[test]
    fn direct_mention_is_expanded_even_when_also_deep() {
        // a -> b -> c -> x -> y; x is also mentioned directly.
        let assets = vec![
            make_asset("a", "Alpha", "@Beta"),
            make_asset("b", "Beta", "@Gamma"),
            make_asset("c", "Gamma", "@Xray"),
            make_asset("x", "Xray", "@Yankee"),
            make_asset("y", "Yankee", ""),
        ];
        let pool = AssetPool::new(&WorkspaceId::from("ws"), &assets);
        let a = assets[0].mention();
        let x = assets[3].mention();

        let forward = ids(&resolve(&[a.clone(), x.clone()], &pool, &ResolveOptions::default()));
        let backward = ids(&resolve(&[x, a], &pool, &ResolveOptions::default()));

        assert_eq!(forward, vec!["a", "x", "b", "y", "c"]);
        let mut forward_set = forward.clone();
        let mut backward_set = backward;
        forward_set.sort();
        backward_set.sort();
        assert_eq!(forward_set, backward_set);
    }

    #[test]
    fn empty_mentions_resolve_to_nothing() {
        let assets = vec![make_asset("a", "Alpha", "")];
        let pool = AssetPool::new(&WorkspaceId::from("ws"), &assets);
        assert!(resolve(&[], &pool, &ResolveOptions::default()).is_empty());
    }
}
