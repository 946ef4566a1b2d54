//! Mention extraction.
//!
//! Finds `@name`, `#name` and `~name` references in free-form text and binds
//! them to assets of an [`AssetPool`].
//!
//! Matching rules:
//! - A trigger counts only at the start of a line or after a character that
//!   is neither a word character nor a backtick (`user@example.com` is not a
//!   mention).
//! - Fenced code blocks and inline code spans are skipped.
//! - After the trigger, the longest asset name that matches the following
//!   text and ends on a boundary wins. Names may contain spaces, so
//!   `@Code Architect` binds to an asset named `Code Architect`.
//! - Unknown names are dropped silently.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use vault_core::{Asset, AssetType, Mention};
use vault_settings::MentionSettings;

use crate::pool::AssetPool;

static MULTI_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("static regex is valid"));

/// How mention text is compared against asset names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare names case-sensitively.
    pub case_sensitive: bool,
    /// Only bind a trigger to assets of the matching type.
    pub strict_triggers: bool,
}

impl From<&MentionSettings> for MatchOptions {
    fn from(settings: &MentionSettings) -> Self {
        Self {
            case_sensitive: settings.case_sensitive,
            strict_triggers: settings.strict_triggers,
        }
    }
}

/// One mention occurrence found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionSpan {
    /// The bound mention.
    pub mention: Mention,
    /// Original text as typed (e.g., `@Code Architect`).
    pub original: String,
    /// Start byte offset in the scanned text.
    pub start: usize,
    /// End byte offset in the scanned text (exclusive).
    pub end: usize,
}

/// Find every mention occurrence in `text`, in order of appearance.
///
/// Occurrences are not deduplicated; use [`extract_mentions`] for that.
pub fn scan_mentions(text: &str, pool: &AssetPool<'_>, options: &MatchOptions) -> Vec<MentionSpan> {
    let mut spans = Vec::new();
    if pool.name_candidates().is_empty() {
        return spans;
    }

    let mut in_code_block = false;
    let mut line_offset = 0;

    for line in text.split('\n') {
        if line.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
            line_offset += line.len() + 1;
            continue;
        }

        if !in_code_block {
            scan_line(line, line_offset, pool, options, &mut spans);
        }

        line_offset += line.len() + 1; // +1 for newline
    }

    spans
}

/// Extract the distinct mentions in `text`, in first-appearance order.
///
/// Deduplicated by asset ID.
pub fn extract_mentions(text: &str, pool: &AssetPool<'_>, options: &MatchOptions) -> Vec<Mention> {
    let mut seen = HashSet::new();
    scan_mentions(text, pool, options)
        .into_iter()
        .filter(|span| seen.insert(span.mention.asset_id.clone()))
        .map(|span| span.mention)
        .collect()
}

/// Remove mention occurrences from `text`.
///
/// Collects the kept ranges between spans in a single forward pass.
/// Resulting runs of spaces are collapsed and the result is trimmed.
pub fn strip_mentions(text: &str, spans: &[MentionSpan]) -> String {
    if spans.is_empty() {
        return text.to_string();
    }

    let mut sorted: Vec<&MentionSpan> = spans.iter().collect();
    sorted.sort_by_key(|s| s.start);

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;

    for span in sorted {
        if span.start >= cursor && span.end <= text.len() {
            result.push_str(&text[cursor..span.start]);
            cursor = span.end;
        }
    }
    if cursor < text.len() {
        result.push_str(&text[cursor..]);
    }

    MULTI_SPACE.replace_all(&result, " ").trim().to_string()
}

fn scan_line(
    line: &str,
    line_offset: usize,
    pool: &AssetPool<'_>,
    options: &MatchOptions,
    spans: &mut Vec<MentionSpan>,
) {
    let mut resume_at = 0;
    let mut backticks = 0usize;
    let mut prev: Option<char> = None;

    for (idx, c) in line.char_indices() {
        if idx < resume_at {
            prev = Some(c);
            continue;
        }

        if c == '`' {
            backticks += 1;
        }

        let trigger = AssetType::from_trigger(c).filter(|_| {
            // Inside an inline code span, or glued to a word (email address)
            backticks % 2 == 0 && !prev.is_some_and(|p| is_word_char(p) || p == '`')
        });
        prev = Some(c);

        let Some(trigger) = trigger else {
            continue;
        };

        let name_start = idx + c.len_utf8();
        let Some((asset, len)) = match_name(&line[name_start..], trigger, pool, options) else {
            continue;
        };

        let end = name_start + len;
        spans.push(MentionSpan {
            mention: asset.mention(),
            original: line[idx..end].to_string(),
            start: line_offset + idx,
            end: line_offset + end,
        });
        resume_at = end;
    }
}

/// Longest asset name matching the start of `rest`, with its byte length in `rest`.
fn match_name<'a>(
    rest: &str,
    trigger: AssetType,
    pool: &AssetPool<'a>,
    options: &MatchOptions,
) -> Option<(&'a Asset, usize)> {
    pool.name_candidates()
        .iter()
        .filter(|asset| !options.strict_triggers || asset.asset_type == trigger)
        .find_map(|asset| {
            let len = prefix_len(rest, asset.name.trim(), options.case_sensitive)?;
            let at_boundary = rest[len..]
                .chars()
                .next()
                .is_none_or(|next| !is_word_char(next) && next != '-');
            at_boundary.then_some((*asset, len))
        })
}

/// Byte length of `text`'s prefix equal to `name`, if `text` starts with it.
fn prefix_len(text: &str, name: &str, case_sensitive: bool) -> Option<usize> {
    let mut chars = text.char_indices();
    let mut consumed = 0;

    for expected in name.chars() {
        let (idx, actual) = chars.next()?;
        let equal = if case_sensitive {
            actual == expected
        } else {
            actual == expected || actual.to_lowercase().eq(expected.to_lowercase())
        };
        if !equal {
            return None;
        }
        consumed = idx + actual.len_utf8();
    }

    Some(consumed)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
