//! Vault data model.
//!
//! All types use `camelCase` serde renaming so that export bundles written
//! by the browser app load unchanged. Timestamps are epoch milliseconds.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::ids::{AssetId, ConversationId, MentionId, MessageId, WorkspaceId};

/// Current time as epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Kind of asset. Determines the mention trigger and the compiled section label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Reusable instructions (`@name`).
    Skill,
    /// A prompt template (`#name`).
    Prompt,
    /// A multi-step workflow (`~name`).
    Workflow,
}

impl AssetType {
    /// All asset types, in display order.
    pub const ALL: [Self; 3] = [Self::Skill, Self::Prompt, Self::Workflow];

    /// Trigger character used to mention assets of this type.
    pub const fn trigger(self) -> char {
        match self {
            Self::Skill => '@',
            Self::Prompt => '#',
            Self::Workflow => '~',
        }
    }

    /// Map a trigger character back to its asset type.
    pub const fn from_trigger(c: char) -> Option<Self> {
        match c {
            '@' => Some(Self::Skill),
            '#' => Some(Self::Prompt),
            '~' => Some(Self::Workflow),
            _ => None,
        }
    }

    /// Upper-case section label (`SKILL`, `PROMPT`, `WORKFLOW`).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Skill => "SKILL",
            Self::Prompt => "PROMPT",
            Self::Workflow => "WORKFLOW",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skill => write!(f, "skill"),
            Self::Prompt => write!(f, "prompt"),
            Self::Workflow => write!(f, "workflow"),
        }
    }
}

/// A named unit of reusable prompt content, owned by one workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Stable, opaque identifier.
    pub id: AssetId,
    /// Display name, matched against mention text.
    pub name: String,
    /// Optional short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Asset kind.
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// Free-form content; may mention other assets.
    pub content: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Where the asset was imported from, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Creation time (epoch ms).
    #[serde(default)]
    pub created_at: i64,
    /// Last update time (epoch ms).
    #[serde(default)]
    pub updated_at: i64,
}

impl Asset {
    /// Create a new asset with a fresh ID and current timestamps.
    pub fn new(
        workspace_id: WorkspaceId,
        name: impl Into<String>,
        asset_type: AssetType,
        content: impl Into<String>,
    ) -> Self {
        let now = now_ms();
        Self {
            id: AssetId::new(),
            name: name.into(),
            description: None,
            asset_type,
            content: content.into(),
            tags: Vec::new(),
            workspace_id,
            source_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check the invariants the store relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName {
                entity: "asset",
                id: self.id.to_string(),
            });
        }
        Ok(())
    }

    /// Build a mention record pointing at this asset.
    pub fn mention(&self) -> Mention {
        Mention {
            id: None,
            asset_type: self.asset_type,
            name: self.name.clone(),
            asset_id: self.id.clone(),
        }
    }
}

/// An isolation boundary for assets and conversations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Workspace identifier.
    pub id: WorkspaceId,
    /// Display name.
    pub name: String,
    /// Creation time (epoch ms).
    #[serde(default)]
    pub created_at: i64,
}

impl Workspace {
    /// Create a new workspace with a fresh ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: WorkspaceId::new(),
            name: name.into(),
            created_at: now_ms(),
        }
    }

    /// Check the invariants the store relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName {
                entity: "workspace",
                id: self.id.to_string(),
            });
        }
        Ok(())
    }
}

/// A reference from a message (or asset content) to an asset.
///
/// `asset_type` and `name` are a denormalized copy of the asset's identity
/// at the time the mention was created; only `asset_id` is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    /// Recorded mention ID. `None` for mentions derived on the fly from text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MentionId>,
    /// Referenced asset's type.
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// Referenced asset's name.
    pub name: String,
    /// Referenced asset.
    pub asset_id: AssetId,
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Human turn.
    User,
    /// Model turn.
    Assistant,
    /// System instruction.
    System,
}

/// One turn in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message identifier.
    pub id: MessageId,
    /// Author role.
    pub role: Role,
    /// Raw text.
    pub content: String,
    /// Structured mentions recorded when the message was composed.
    #[serde(default)]
    pub mentions: Vec<Mention>,
    /// Creation time (epoch ms).
    #[serde(default)]
    pub created_at: i64,
}

impl Message {
    /// Create a message with a fresh ID and no structured mentions.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            mentions: Vec::new(),
            created_at: now_ms(),
        }
    }

    /// Shorthand for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Attach structured mentions.
    #[must_use]
    pub fn with_mentions(mut self, mentions: Vec<Mention>) -> Self {
        self.mentions = mentions;
        self
    }
}

fn default_title() -> String {
    "New Conversation".to_string()
}

/// Ordered sequence of messages scoped to one workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Conversation identifier.
    pub id: ConversationId,
    /// Display title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Messages in order.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Creation time (epoch ms).
    #[serde(default)]
    pub created_at: i64,
    /// Last update time (epoch ms).
    #[serde(default)]
    pub updated_at: i64,
}

impl Conversation {
    /// Create an empty conversation with the default title.
    pub fn new(workspace_id: WorkspaceId) -> Self {
        let now = now_ms();
        Self {
            id: ConversationId::new(),
            title: default_title(),
            workspace_id,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The most recent message with role `user`, if any.
    pub fn last_user_message(&self) -> Option<&Message> {
        last_user_message(&self.messages)
    }
}

/// The most recent message in `messages` with role `user`, if any.
pub fn last_user_message(messages: &[Message]) -> Option<&Message> {
    messages.iter().rev().find(|m| m.role == Role::User)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
