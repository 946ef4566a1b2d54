//! Quick-start workspace with sample assets.

use tracing::info;
use vault_core::{Asset, AssetType, Workspace};

use crate::errors::Result;
use crate::store::VaultStore;

const SAMPLES: &[(&str, AssetType, &str, &str, &[&str])] = &[
    (
        "Code Architect",
        AssetType::Skill,
        "Expert software architect for system design",
        "You are an expert software architect. Your role is to:\n\n\
         1. Analyze codebases for architectural patterns\n\
         2. Suggest improvements and refactoring opportunities\n\
         3. Help design scalable system architectures\n\
         4. Review code for best practices\n\n\
         Be thorough but concise. Use examples when helpful.",
        &["architecture", "design", "code-review"],
    ),
    (
        "PR Review Checklist",
        AssetType::Prompt,
        "Comprehensive pull request review checklist",
        "Review this pull request for:\n\n\
         - [ ] Code correctness and logic\n\
         - [ ] Test coverage\n\
         - [ ] Documentation updates\n\
         - [ ] Breaking changes\n\
         - [ ] Performance implications\n\
         - [ ] Security considerations\n\n\
         Provide actionable feedback.",
        &["code-review", "pr", "checklist"],
    ),
    (
        "Debug Assistant",
        AssetType::Skill,
        "Helps debug code issues systematically",
        "You are a debugging expert. Help users:\n\n\
         1. Identify root causes of issues\n\
         2. Suggest debugging strategies\n\
         3. Explain error messages\n\
         4. Propose fixes with code examples\n\n\
         Always ask clarifying questions if the problem isn't clear.",
        &["debugging", "troubleshooting"],
    ),
];

/// Create a workspace named `name` holding the sample assets and make it
/// the active workspace.
pub fn seed_quick_start(store: &VaultStore, name: &str) -> Result<Workspace> {
    let workspace = Workspace::new(name);
    store.add_workspace(workspace.clone())?;

    for &(asset_name, asset_type, description, content, tags) in SAMPLES {
        let mut asset = Asset::new(workspace.id.clone(), asset_name, asset_type, content);
        asset.description = Some(description.to_string());
        asset.tags = tags.iter().map(|t| (*t).to_string()).collect();
        store.add_asset(asset)?;
    }

    store.set_active_workspace(Some(workspace.id.clone()))?;
    info!(workspace = %workspace.id, assets = SAMPLES.len(), "seeded quick-start workspace");
    Ok(workspace)
}
