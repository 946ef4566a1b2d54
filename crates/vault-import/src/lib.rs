//! # vault-import
//!
//! Imports skills and prompts from public GitHub repositories.
//!
//! A scan lists the repository tree, keeps `SKILL.md` files, `.prompt` files
//! and anything under a `prompts/` directory, downloads their content, and
//! returns [`ScannedItem`]s. Selected items become assets through
//! [`ScannedItem::into_asset`].

#![deny(unsafe_code)]

pub mod errors;
pub mod parser;
pub mod paths;
pub mod scanner;

pub use errors::{ImportError, Result};
pub use parser::{extract_dependencies, parse_frontmatter};
pub use paths::{RepoRef, classify_path, derive_name_from_path, is_importable, parse_repo_url};
pub use scanner::{GitHubScanner, ScannedItem};
