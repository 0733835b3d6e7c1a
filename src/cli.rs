//! CLI interface for tradepost.
//!
//! Each subcommand is one user action: arguments in, output out. The wizard
//! session and drafts persist between invocations, so a post is built up over
//! several calls.
//!
//! - `tradepost post ...` drives the post wizard.
//! - `tradepost posts` lists created posts.
//! - `tradepost quota ...` shows or tops up the post allowance.
//! - `tradepost account ...` registers and signs in.
//! - `tradepost like|unlike|likes` manages liked items.

mod account;
mod format;
mod post;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{services::QuotaService, storage::Storage};

use account::AccountCommand;
use post::PostCommand;

/// tradepost: swap items and services, or donate them.
#[derive(Debug, Parser)]
#[command(name = "tradepost", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Storage directory. Overrides `storage-root` from the config file.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Log at debug level regardless of config and `RUST_LOG`.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: posting an item
  1. tradepost post start --kind item
  2. tradepost post set category=home subcategory=lighting
     → both set, so the wizard moves on to Details
  3. tradepost post set title=Lamp "description=Brass desk lamp" condition=good location=Lisbon
  4. tradepost post next
  5. tradepost post set "preferredSwaps=Books or records" preferredCategories=books,music
  6. tradepost post next
  7. tradepost post terms accept
  8. tradepost post submit
  9. tradepost post done

Save without moving on:
  tradepost post save"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a post step by step.
    Post {
        #[command(subcommand)]
        command: PostCommand,
    },

    /// List created posts as JSON.
    Posts,

    /// Show or top up the remaining post allowance.
    Quota {
        #[command(subcommand)]
        command: QuotaCommand,
    },

    /// Register, sign in and out.
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },

    /// Like an item.
    Like {
        /// Item id.
        item: String,
    },

    /// Remove a like.
    Unlike {
        /// Item id.
        item: String,
    },

    /// List liked items.
    Likes,
}

#[derive(Debug, Subcommand)]
pub enum QuotaCommand {
    /// Show remaining free and paid posts.
    Show,

    /// Add posts to the allowance.
    Grant {
        /// Free posts to add.
        #[arg(long, default_value_t = 0)]
        free: u32,

        /// Paid posts to add.
        #[arg(long, default_value_t = 0)]
        paid: u32,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli, storage: &Storage) -> Result<(), String> {
    match cli.command {
        Command::Post { command } => post::run(command, storage),
        Command::Posts => cmd_posts(storage),
        Command::Quota { command } => match command {
            QuotaCommand::Show => cmd_quota_show(storage),
            QuotaCommand::Grant { free, paid } => cmd_quota_grant(storage, free, paid),
        },
        Command::Account { command } => account::run(command, storage),
        Command::Like { item } => account::cmd_like(storage, &item),
        Command::Unlike { item } => account::cmd_unlike(storage, &item),
        Command::Likes => account::cmd_likes(storage),
    }
}

fn cmd_posts(storage: &Storage) -> Result<(), String> {
    let posts = storage
        .list_posts()
        .map_err(|e| format!("failed to list posts: {e}"))?;

    let json = serde_json::to_string_pretty(&posts)
        .map_err(|e| format!("failed to serialize posts: {e}"))?;

    println!("{json}");
    Ok(())
}

fn cmd_quota_show(storage: &Storage) -> Result<(), String> {
    let status = storage
        .check_posts_status()
        .map_err(|e| format!("failed to check quota: {e}"))?;
    println!("{}", format::format_status(&status));
    Ok(())
}

fn cmd_quota_grant(storage: &Storage, free: u32, paid: u32) -> Result<(), String> {
    if free == 0 && paid == 0 {
        return Err("specify --free and/or --paid".to_string());
    }
    let status = storage
        .grant_posts(free, paid)
        .map_err(|e| format!("failed to update quota: {e}"))?;
    println!("{}", format::format_status(&status));
    Ok(())
}
