//! # vault-compiler
//!
//! Mention extraction, reference resolution, and prompt compilation.
//!
//! Assets reference each other by name (`@skill`, `#prompt`, `~workflow`).
//! Compiling a conversation collects every mentioned asset, follows the
//! references inside their content up to a fixed depth, and flattens the
//! result into a single text document.
//!
//! ## Module Overview
//!
//! - [`pool`]: Workspace-scoped, read-only view over the asset list
//! - [`extractor`]: `@reference` scanning and binding to assets
//! - [`resolver`]: Bounded, cycle-safe transitive expansion
//! - [`compiler`]: Compiled document rendering and the large-context signal
//!
//! All functions here are pure and total: unknown names, dangling asset ids
//! and exhausted depth simply contribute nothing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vault_compiler::compiler::{CompileOptions, compile_conversation};
//! # let conversation: vault_core::Conversation = unimplemented!();
//! # let assets: Vec<vault_core::Asset> = Vec::new();
//!
//! let compiled = compile_conversation(&conversation, &assets, &CompileOptions::default());
//! println!("{}", compiled.text);
//! ```

#![deny(unsafe_code)]

pub mod compiler;
pub mod constants;
pub mod extractor;
pub mod pool;
pub mod resolver;

pub use compiler::{CompileOptions, CompiledAsset, CompiledPrompt, compile, compile_conversation};
pub use extractor::{MatchOptions, MentionSpan, extract_mentions, scan_mentions, strip_mentions};
pub use pool::AssetPool;
pub use resolver::{ResolveOptions, resolve};
