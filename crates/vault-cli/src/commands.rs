//! Subcommand implementations.
//!
//! Each command works on a single-workspace export bundle and returns the
//! text to print, so `main` stays a thin dispatcher.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::{info, warn};
use vault_compiler::{
    AssetPool, CompileOptions, extract_mentions, resolve, scan_mentions, strip_mentions,
};
use vault_core::{Conversation, ConversationId, Message};
use vault_import::{GitHubScanner, ScannedItem};
use vault_settings::ImportSettings;
use vault_store::{
    VaultExport, VaultStore, export_file_name, export_workspace, import_bundle, read_bundle,
    seed_quick_start, write_bundle,
};

fn open_bundle(path: &Path) -> Result<(VaultStore, VaultExport)> {
    let bundle =
        read_bundle(path).with_context(|| format!("Failed to read bundle: {}", path.display()))?;
    let store = VaultStore::new();
    let _ = import_bundle(&store, &bundle).context("Failed to load bundle")?;
    Ok((store, bundle))
}

/// Write a quick-start bundle to `path`.
pub fn init(path: &Path, name: &str, force: bool) -> Result<String> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let store = VaultStore::new();
    let workspace = seed_quick_start(&store, name)?;
    let bundle = export_workspace(&store, &workspace.id).context("Seeded workspace vanished")?;
    write_bundle(path, &bundle)
        .with_context(|| format!("Failed to write bundle: {}", path.display()))?;

    Ok(format!(
        "Created workspace \"{}\" with {} assets in {}",
        workspace.name,
        bundle.assets.len(),
        path.display()
    ))
}

/// Compile a conversation of the bundle.
///
/// With `message`, compiles a fresh one-message conversation instead. With
/// neither `conversation` nor `message`, the bundle's last conversation is
/// used.
pub fn compile(
    path: &Path,
    conversation: Option<&str>,
    message: Option<&str>,
    json: bool,
    options: &CompileOptions,
) -> Result<String> {
    let (store, bundle) = open_bundle(path)?;

    let conversation_id = if let Some(text) = message {
        let mut adhoc = Conversation::new(bundle.workspace.id.clone());
        adhoc.messages.push(Message::user(text));
        let id = adhoc.id.clone();
        store.add_conversation(adhoc)?;
        id
    } else if let Some(id) = conversation {
        ConversationId::from(id)
    } else {
        match bundle.conversations.last() {
            Some(last) => last.id.clone(),
            None => bail!("Bundle has no conversations; pass --message"),
        }
    };

    let compiled = store.compile(&conversation_id, options)?;
    if compiled.large_context {
        warn!(
            assets = compiled.asset_count,
            threshold = options.large_context_threshold,
            "large context: compiled prompt includes many assets"
        );
    }
    info!(conversation = %conversation_id, assets = compiled.asset_count, "compiled");

    if json {
        Ok(serde_json::to_string_pretty(&compiled)?)
    } else {
        Ok(compiled.text)
    }
}

/// List the mentions in `text` and what they resolve to.
pub fn mentions(path: &Path, text: &str, strip: bool, options: &CompileOptions) -> Result<String> {
    let bundle = read_bundle(path)
        .with_context(|| format!("Failed to read bundle: {}", path.display()))?;
    let pool = AssetPool::new(&bundle.workspace.id, &bundle.assets);
    let matching = &options.resolve.matching;

    let spans = scan_mentions(text, &pool, matching);
    let mut out = String::new();
    if spans.is_empty() {
        out.push_str("No mentions\n");
    } else {
        out.push_str("Mentions:\n");
        for span in &spans {
            let _ = writeln!(
                out,
                "  {} -> {}: {} [{}..{}]",
                span.original,
                span.mention.asset_type.label(),
                span.mention.name,
                span.start,
                span.end
            );
        }

        let resolved = resolve(&extract_mentions(text, &pool, matching), &pool, &options.resolve);
        out.push_str("Resolved:\n");
        for asset in resolved {
            let _ = writeln!(out, "  {}: {}", asset.asset_type.label(), asset.name);
        }
    }

    if strip {
        let _ = writeln!(out, "Stripped:\n  {}", strip_mentions(text, &spans));
    }
    Ok(out.trim_end().to_string())
}

/// Append scanned items to a bundle, skipping names it already has and
/// items that do not make a valid asset.
///
/// Returns the number of assets added.
pub fn merge_scanned(bundle: &mut VaultExport, items: Vec<ScannedItem>) -> usize {
    let mut added = 0;
    for item in items {
        let exists = bundle
            .assets
            .iter()
            .any(|a| a.name.eq_ignore_ascii_case(&item.name));
        if exists {
            info!(name = %item.name, "asset already in bundle, skipping");
            continue;
        }
        let asset = item.into_asset(bundle.workspace.id.clone());
        if let Err(e) = asset.validate() {
            warn!(name = %asset.name, error = %e, "scanned item is not a valid asset, skipping");
            continue;
        }
        bundle.assets.push(asset);
        added += 1;
    }
    added
}

/// Scan a GitHub repository, optionally importing into a bundle.
pub async fn scan(url: &str, into: Option<&Path>, settings: &ImportSettings) -> Result<String> {
    let scanner = GitHubScanner::from_settings(settings)?;
    let items = scanner
        .scan(url)
        .await
        .with_context(|| format!("Repository scan failed: {url}"))?;

    let mut out = String::new();
    for item in &items {
        let _ = writeln!(out, "{}: {} ({})", item.asset_type.label(), item.name, item.path);
    }
    if items.is_empty() {
        out.push_str("No importable files found\n");
    }

    if let Some(path) = into {
        let mut bundle = read_bundle(path)
            .with_context(|| format!("Failed to read bundle: {}", path.display()))?;
        let added = merge_scanned(&mut bundle, items);
        write_bundle(path, &bundle)
            .with_context(|| format!("Failed to write bundle: {}", path.display()))?;
        let _ = writeln!(out, "Added {added} assets to {}", path.display());
    }
    Ok(out.trim_end().to_string())
}

/// File name the bundle would be exported under on `date`.
pub fn export_name(path: &Path, date: NaiveDate) -> Result<String> {
    let bundle = read_bundle(path)
        .with_context(|| format!("Failed to read bundle: {}", path.display()))?;
    Ok(export_file_name(&bundle.workspace, date))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
