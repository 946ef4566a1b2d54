//! Branded ID newtypes for type safety.
//!
//! Every entity in the vault has a distinct ID type implemented as a
//! newtype wrapper around `String`. This prevents accidentally passing a
//! workspace ID where an asset ID is expected.
//!
//! Fresh IDs are UUID v7 (time-ordered) generated via [`uuid::Uuid::now_v7`].
//! Imported bundles may carry arbitrary opaque strings, which are kept as-is.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generate a new UUID v7 string (time-ordered).
fn new_v7() -> String {
    Uuid::now_v7().to_string()
}

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID (UUID v7, time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(new_v7())
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

branded_id! {
    /// Unique identifier for a stored asset (skill, prompt, or workflow).
    AssetId
}

branded_id! {
    /// Unique identifier for a workspace (the isolation boundary).
    WorkspaceId
}

branded_id! {
    /// Unique identifier for a conversation.
    ConversationId
}

branded_id! {
    /// Unique identifier for a message within a conversation.
    MessageId
}

branded_id! {
    /// Unique identifier for a recorded mention.
    MentionId
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_new_is_uuid_v7() {
        let id = AssetId::new();
        let parsed = Uuid::parse_str(id.as_str()).expect("should be valid UUID");
        assert_eq!(parsed.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn ids_are_unique() {
        let a = WorkspaceId::new();
        let b = WorkspaceId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn opaque_ids_are_preserved() {
        let id = AssetId::from("1");
        assert_eq!(id.as_str(), "1");
        assert_eq!(format!("{id}"), "1");
    }

    #[test]
    fn deref_to_str() {
        let id = MessageId::from("hello");
        let s: &str = &id;
        assert_eq!(s, "hello");
    }

    #[test]
    fn serde_is_transparent() {
        let id = ConversationId::from("conv-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"conv-1\"");
        let back: ConversationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn hash_and_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        let id = AssetId::from("same");
        let _ = set.insert(id.clone());
        let _ = set.insert(id);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn into_inner() {
        let id = MentionId::from("inner-test");
        assert_eq!(id.into_inner(), "inner-test");
    }
}
