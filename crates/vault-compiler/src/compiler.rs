//! Prompt compilation.
//!
//! Gathers the mentions of a conversation, resolves them, and renders one
//! document:
//!
//! ```text
//! # COMPILED PROMPT
//!
//! ## SKILL: Code Architect
//! Be precise.
//!
//! ## USER MESSAGE
//! @Code Architect help me design an API
//! ```
//!
//! Mention gathering walks messages in order; for each message its recorded
//! mentions come first, then (optionally) mentions parsed from its text.
//! Everything is deduplicated by asset ID before resolution.

use std::collections::HashSet;
use std::fmt::Write;

use serde::Serialize;
use tracing::debug;
use vault_core::{Asset, AssetId, AssetType, Conversation, Mention, Message, last_user_message};
use vault_settings::VaultSettings;

use crate::constants::{
    DEFAULT_HEADER, DEFAULT_LARGE_CONTEXT_THRESHOLD, DEFAULT_USER_SECTION_TITLE, SECTION_PREFIX,
};
use crate::extractor::{MatchOptions, extract_mentions};
use crate::pool::AssetPool;
use crate::resolver::{ResolveOptions, resolve};

/// Compilation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Resolution bounds and matching rules.
    pub resolve: ResolveOptions,
    /// Asset count above which `large_context` is set.
    pub large_context_threshold: usize,
    /// First line of the document.
    pub header: String,
    /// Title of the trailing user message section.
    pub user_section_title: String,
    /// Merge mentions parsed from raw message text with recorded mentions.
    pub scan_message_text: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            resolve: ResolveOptions::default(),
            large_context_threshold: DEFAULT_LARGE_CONTEXT_THRESHOLD,
            header: DEFAULT_HEADER.to_string(),
            user_section_title: DEFAULT_USER_SECTION_TITLE.to_string(),
            scan_message_text: true,
        }
    }
}

impl From<&VaultSettings> for CompileOptions {
    fn from(settings: &VaultSettings) -> Self {
        Self {
            resolve: ResolveOptions {
                max_depth: settings.compiler.max_depth,
                matching: MatchOptions::from(&settings.mentions),
            },
            large_context_threshold: settings.compiler.large_context_threshold,
            header: settings.compiler.header.clone(),
            user_section_title: settings.compiler.user_section_title.clone(),
            scan_message_text: settings.compiler.scan_message_text,
        }
    }
}

/// Identity of an asset included in a compiled prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledAsset {
    /// Asset ID.
    pub id: AssetId,
    /// Asset name.
    pub name: String,
    /// Asset type.
    #[serde(rename = "type")]
    pub asset_type: AssetType,
}

impl From<&Asset> for CompiledAsset {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            name: asset.name.clone(),
            asset_type: asset.asset_type,
        }
    }
}

/// Result of compiling a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledPrompt {
    /// The rendered document.
    pub text: String,
    /// Included assets, in section order.
    pub assets: Vec<CompiledAsset>,
    /// Number of included assets.
    pub asset_count: usize,
    /// Advisory: `asset_count` exceeds the configured threshold.
    pub large_context: bool,
}

/// Collect the mentions of `messages`, deduplicated by asset ID.
pub fn gather_mentions(
    messages: &[Message],
    pool: &AssetPool<'_>,
    options: &CompileOptions,
) -> Vec<Mention> {
    let mut seen: HashSet<AssetId> = HashSet::new();
    let mut gathered = Vec::new();

    for message in messages {
        let parsed = if options.scan_message_text {
            extract_mentions(&message.content, pool, &options.resolve.matching)
        } else {
            Vec::new()
        };

        for mention in message.mentions.iter().chain(parsed.iter()) {
            if seen.insert(mention.asset_id.clone()) {
                gathered.push(mention.clone());
            }
        }
    }

    gathered
}

/// Compile `messages` against the assets of `pool`.
pub fn compile(messages: &[Message], pool: &AssetPool<'_>, options: &CompileOptions) -> CompiledPrompt {
    let mentions = gather_mentions(messages, pool, options);
    let resolved = resolve(&mentions, pool, &options.resolve);

    let user_message = last_user_message(messages).map_or("", |m| m.content.as_str());

    let text = render(&resolved, user_message, options);
    let asset_count = resolved.len();
    let large_context = asset_count > options.large_context_threshold;

    debug!(
        messages = messages.len(),
        mentions = mentions.len(),
        asset_count,
        large_context,
        "compiled prompt"
    );

    CompiledPrompt {
        text,
        assets: resolved.iter().map(|a| CompiledAsset::from(*a)).collect(),
        asset_count,
        large_context,
    }
}

/// Compile a conversation against an asset snapshot, scoped to the
/// conversation's workspace.
pub fn compile_conversation(
    conversation: &Conversation,
    assets: &[Asset],
    options: &CompileOptions,
) -> CompiledPrompt {
    let pool = AssetPool::new(&conversation.workspace_id, assets);
    compile(&conversation.messages, &pool, options)
}

fn render(assets: &[&Asset], user_message: &str, options: &CompileOptions) -> String {
    let body_len: usize = assets.iter().map(|a| a.content.len() + a.name.len()).sum();
    let mut text = String::with_capacity(body_len + user_message.len() + 64);

    text.push_str(&options.header);
    text.push_str("\n\n");

    for asset in assets {
        let _ = writeln!(
            text,
            "{SECTION_PREFIX}{}: {}",
            asset.asset_type.label(),
            asset.name
        );
        text.push_str(&asset.content);
        text.push_str("\n\n");
    }

    let _ = write!(
        text,
        "{SECTION_PREFIX}{}\n{user_message}",
        options.user_section_title
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::{Role, WorkspaceId};

    fn make_asset(id: &str, name: &str, asset_type: AssetType, content: &str) -> Asset {
        let mut asset = Asset::new(WorkspaceId::from("ws"), name, asset_type, content);
        asset.id = id.into();
        asset
    }

    fn pool(assets: &[Asset]) -> AssetPool<'_> {
        AssetPool::new(&WorkspaceId::from("ws"), assets)
    }

    #[test]
    fn empty_conversation_renders_empty_sections() {
        let compiled = compile(&[], &pool(&[]), &CompileOptions::default());
        assert_eq!(compiled.text, "# COMPILED PROMPT\n\n## USER MESSAGE\n");
        assert_eq!(compiled.asset_count, 0);
        assert!(!compiled.large_context);
    }

    #[test]
    fn sections_follow_resolution_order() {
        let assets = vec![
            make_asset("1", "Alpha", AssetType::Skill, "alpha body ~Flow"),
            make_asset("2", "Flow", AssetType::Workflow, "flow body"),
            make_asset("3", "Review", AssetType::Prompt, "review body"),
        ];
        let messages = vec![Message::user("@Alpha then #Review")];
        let compiled = compile(&messages, &pool(&assets), &CompileOptions::default());

        assert_eq!(
            compiled.text,
            "# COMPILED PROMPT\n\n\
             ## SKILL: Alpha\nalpha body ~Flow\n\n\
             ## PROMPT: Review\nreview body\n\n\
             ## WORKFLOW: Flow\nflow body\n\n\
             ## USER MESSAGE\n@Alpha then #Review"
        );
        assert_eq!(compiled.asset_count, 3);
    }

    #[test]
    fn structured_mentions_come_before_parsed_ones() {
        let assets = vec![
            make_asset("1", "Alpha", AssetType::Skill, ""),
            make_asset("2", "Beta", AssetType::Skill, ""),
        ];
        let messages = vec![Message::user("@Alpha").with_mentions(vec![assets[1].mention()])];
        let gathered = gather_mentions(&messages, &pool(&assets), &CompileOptions::default());
        let names: Vec<&str> = gathered.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Alpha"]);
    }

    #[test]
    fn recorded_and_typed_mention_of_one_asset_merge() {
        let assets = vec![make_asset("1", "Alpha", AssetType::Skill, "alpha body")];
        let messages =
            vec![Message::user("use @Alpha please").with_mentions(vec![assets[0].mention()])];
        let pool = pool(&assets);

        let gathered = gather_mentions(&messages, &pool, &CompileOptions::default());
        assert_eq!(gathered.len(), 1);
        assert_eq!(gathered[0].asset_id.as_str(), "1");

        let compiled = compile(&messages, &pool, &CompileOptions::default());
        assert_eq!(compiled.asset_count, 1);
        assert_eq!(compiled.text.matches("## SKILL: Alpha\n").count(), 1);
        assert_eq!(
            compiled.text,
            "# COMPILED PROMPT\n\n## SKILL: Alpha\nalpha body\n\n## USER MESSAGE\nuse @Alpha please"
        );
    }

    #[test]
    fn text_scanning_can_be_disabled() {
        let assets = vec![make_asset("1", "Alpha", AssetType::Skill, "")];
        let options = CompileOptions {
            scan_message_text: false,
            ..CompileOptions::default()
        };
        let compiled = compile(&[Message::user("@Alpha")], &pool(&assets), &options);
        assert_eq!(compiled.asset_count, 0);
    }

    #[test]
    fn mentions_from_all_roles_are_gathered() {
        let assets = vec![make_asset("1", "Alpha", AssetType::Skill, "")];
        let messages = vec![
            Message::new(Role::Assistant, "try @Alpha"),
            Message::user("thanks"),
        ];
        let compiled = compile(&messages, &pool(&assets), &CompileOptions::default());
        assert_eq!(compiled.asset_count, 1);
        assert!(compiled.text.ends_with("## USER MESSAGE\nthanks"));
    }

    #[test]
    fn no_user_message_leaves_trailing_section_empty() {
        let messages = vec![Message::new(Role::System, "system text")];
        let compiled = compile(&messages, &pool(&[]), &CompileOptions::default());
        assert!(compiled.text.ends_with("## USER MESSAGE\n"));
    }

    #[test]
    fn custom_header_and_title() {
        let options = CompileOptions {
            header: "# CONTEXT".to_string(),
            user_section_title: "REQUEST".to_string(),
            ..CompileOptions::default()
        };
        let compiled = compile(&[Message::user("hi")], &pool(&[]), &options);
        assert_eq!(compiled.text, "# CONTEXT\n\n## REQUEST\nhi");
    }

    #[test]
    fn options_from_settings() {
        let mut settings = VaultSettings::default();
        settings.compiler.max_depth = 1;
        settings.mentions.case_sensitive = true;
        let options = CompileOptions::from(&settings);
        assert_eq!(options.resolve.max_depth, 1);
        assert!(options.resolve.matching.case_sensitive);
        assert_eq!(options.large_context_threshold, 10);
    }

    #[test]
    fn default_settings_give_default_options() {
        assert_eq!(CompileOptions::from(&VaultSettings::default()), CompileOptions::default());
    }

    #[test]
    fn compiled_prompt_serializes_camel_case() {
        let assets = vec![make_asset("1", "Alpha", AssetType::Skill, "")];
        let compiled = compile(&[Message::user("@Alpha")], &pool(&assets), &CompileOptions::default());
        let value = serde_json::to_value(&compiled).unwrap();
        assert_eq!(value["assetCount"], 1);
        assert_eq!(value["largeContext"], false);
        assert_eq!(value["assets"][0]["type"], "skill");
    }
}
