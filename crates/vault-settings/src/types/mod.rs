//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]`. Each type implements
//! [`Default`] with production default values, and `#[serde(default)]`
//! allows partial JSON; missing fields get their default value.

mod compiler;
mod import;

pub use compiler::*;
pub use import::*;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Upper bound accepted for `compiler.maxDepth`.
pub const MAX_RESOLUTION_DEPTH: usize = 32;

/// Root settings type.
///
/// # JSON Format
///
/// ```json
/// {
///   "compiler": { "maxDepth": 5 },
///   "mentions": { "caseSensitive": true }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VaultSettings {
    /// Prompt compilation settings.
    pub compiler: CompilerSettings,
    /// Mention matching settings.
    pub mentions: MentionSettings,
    /// Repository import settings.
    pub import: ImportSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl VaultSettings {
    /// Reject values the compiler cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.compiler.max_depth > MAX_RESOLUTION_DEPTH {
            return Err(SettingsError::InvalidValue(format!(
                "compiler.maxDepth {} exceeds {MAX_RESOLUTION_DEPTH}",
                self.compiler.max_depth
            )));
        }
        if self.compiler.header.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "compiler.header must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}
