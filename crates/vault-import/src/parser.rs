//! Frontmatter and dependency extraction for imported files.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static RELATIVE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]*\]\(\./([\w\-./]+)\)").expect("static regex is valid")
});

/// Parse `key: value` lines from a leading `---` block.
///
/// Only flat string pairs are read. Lines without a colon and pairs with an
/// empty key or value are ignored. Content without frontmatter yields an
/// empty map.
pub fn parse_frontmatter(content: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let Some(block) = frontmatter_block(content) else {
        return fields;
    };

    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if !key.is_empty() && !value.is_empty() {
            let _ = fields.insert(key.to_string(), value.to_string());
        }
    }
    fields
}

fn frontmatter_block(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    let rest = rest.trim_start_matches([' ', '\t', '\r']);
    let rest = rest.strip_prefix('\n')?;
    if let Some(body) = rest.strip_prefix("---") {
        return body.starts_with(['\n', '\r']).then_some("");
    }
    rest.find("\n---").map(|end| &rest[..end])
}

/// Relative markdown link targets (`[text](./path)`), in order of appearance.
pub fn extract_dependencies(content: &str) -> Vec<String> {
    RELATIVE_LINK
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}
