//! # vault
//!
//! Command-line front end for Prompt Vault export bundles: seed a workspace,
//! compile conversations, inspect mentions, and import from GitHub.

#![deny(unsafe_code)]

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use vault_compiler::CompileOptions;
use vault_core::logging::{init_json_subscriber, init_subscriber};
use vault_settings::{VaultSettings, get_settings, init_settings, load_settings_from_path};

/// Prompt Vault command-line interface.
#[derive(Parser, Debug)]
#[command(name = "vault", version, about = "Compile prompts from a Prompt Vault bundle")]
struct Cli {
    /// Settings file (defaults to `~/.prompt-vault/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a bundle holding the quick-start workspace.
    Init {
        /// Bundle file to create.
        bundle: PathBuf,
        /// Workspace name.
        #[arg(long, default_value = "Quick Start")]
        name: String,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Compile a conversation into a single prompt.
    Compile {
        /// Bundle file to read.
        bundle: PathBuf,
        /// Conversation ID (defaults to the last conversation).
        #[arg(long)]
        conversation: Option<String>,
        /// Compile this message instead of a stored conversation.
        #[arg(long, conflicts_with = "conversation")]
        message: Option<String>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the mentions found in a piece of text.
    Mentions {
        /// Bundle file to read.
        bundle: PathBuf,
        /// Text to scan.
        text: String,
        /// Also print the text with mentions removed.
        #[arg(long)]
        strip: bool,
    },
    /// Scan a GitHub repository for skills and prompts.
    Scan {
        /// Repository URL (`https://github.com/<owner>/<repo>`).
        url: String,
        /// Add the scanned assets to this bundle.
        #[arg(long)]
        into: Option<PathBuf>,
    },
    /// Print the export file name for a bundle's workspace.
    ExportName {
        /// Bundle file to read.
        bundle: PathBuf,
    },
}

fn load_settings(path: Option<PathBuf>) -> Result<VaultSettings> {
    let path = match path {
        Some(path) if !path.exists() => bail!("Settings file not found: {}", path.display()),
        Some(path) => path,
        None => vault_settings::settings_path(),
    };
    load_settings_from_path(&path)
        .with_context(|| format!("Failed to load settings: {}", path.display()))
}

async fn run(command: Command, settings: &VaultSettings) -> Result<String> {
    let options = CompileOptions::from(settings);
    match command {
        Command::Init { bundle, name, force } => commands::init(&bundle, &name, force),
        Command::Compile {
            bundle,
            conversation,
            message,
            json,
        } => commands::compile(
            &bundle,
            conversation.as_deref(),
            message.as_deref(),
            json,
            &options,
        ),
        Command::Mentions {
            bundle,
            text,
            strip,
        } => commands::mentions(&bundle, &text, strip, &options),
        Command::Scan { url, into } => commands::scan(&url, into.as_deref(), &settings.import).await,
        Command::ExportName { bundle } => {
            commands::export_name(&bundle, chrono::Local::now().date_naive())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.settings)?;
    if settings.logging.json {
        init_json_subscriber(&settings.logging.level);
    } else {
        init_subscriber(&settings.logging.level);
    }
    if init_settings(settings).is_err() {
        tracing::warn!("settings were already initialized");
    }

    let output = run(cli.command, get_settings()).await?;
    println!("{output}");
    Ok(())
}
