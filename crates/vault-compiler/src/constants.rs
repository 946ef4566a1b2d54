//! Shared constants for mention resolution and compilation.
//!
//! Defaults come from `vault-settings` so compiled defaults and
//! [`CompileOptions::default`](crate::CompileOptions) never drift apart.

pub use vault_settings::{
    DEFAULT_HEADER, DEFAULT_LARGE_CONTEXT_THRESHOLD, DEFAULT_MAX_DEPTH, DEFAULT_USER_SECTION_TITLE,
};

/// Markdown prefix for every section title.
pub const SECTION_PREFIX: &str = "## ";
