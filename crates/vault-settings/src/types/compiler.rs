//! Mention matching and prompt compilation settings.

use serde::{Deserialize, Serialize};

/// Levels of indirection followed beyond the directly mentioned assets.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Resolved asset count above which a compiled prompt is flagged as large.
pub const DEFAULT_LARGE_CONTEXT_THRESHOLD: usize = 10;

/// First line of a compiled document.
pub const DEFAULT_HEADER: &str = "# COMPILED PROMPT";

/// Title of the trailing user message section.
pub const DEFAULT_USER_SECTION_TITLE: &str = "USER MESSAGE";

/// Prompt compilation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerSettings {
    /// Levels of indirection followed beyond the directly mentioned assets.
    pub max_depth: usize,
    /// Asset count above which the compiled prompt is flagged as large.
    pub large_context_threshold: usize,
    /// First line of the compiled document.
    pub header: String,
    /// Title of the trailing user message section.
    pub user_section_title: String,
    /// Also parse mentions out of raw message text and merge them with
    /// the structured mentions.
    pub scan_message_text: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            large_context_threshold: DEFAULT_LARGE_CONTEXT_THRESHOLD,
            header: DEFAULT_HEADER.to_string(),
            user_section_title: DEFAULT_USER_SECTION_TITLE.to_string(),
            scan_message_text: true,
        }
    }
}

/// Mention matching settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MentionSettings {
    /// Match asset names case-sensitively.
    pub case_sensitive: bool,
    /// Require the trigger to match the asset type (`@` skill, `#` prompt,
    /// `~` workflow).
    pub strict_triggers: bool,
}
