//! Command line arguments.

use bitmask_api::{KeyKind, ValidationLevel};
use clap::{Parser, Subcommand};

/// Talk to a running Bitmask backend
#[derive(Parser, Debug)]
#[command(name = "bitmask-cli")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Backend API root
    #[arg(long, env = "BITMASK_API_URL")]
    pub api_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Accounts and sessions
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Mail service
    Mail {
        #[command(subcommand)]
        action: MailAction,
    },
    /// Keyring
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
    /// Backend events
    Events {
        #[command(subcommand)]
        action: EventsAction,
    },
    /// Send a raw command, e.g. `call keys export alice@example.org private`
    Call {
        namespace: String,
        verb: String,
        args: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Show the logged in user
    Active,
    /// Register a new account
    Create {
        uid: String,
        #[arg(long, env = "BITMASK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in
    Login {
        uid: String,
        #[arg(long, env = "BITMASK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out (the active user when no uid is given)
    Logout { uid: Option<String> },
}

#[derive(Subcommand, Debug)]
pub enum MailAction {
    /// Show the mail service status
    Status,
    /// Print the IMAP/SMTP token of the active user
    Token,
}

#[derive(Subcommand, Debug)]
pub enum KeysAction {
    /// List keys
    List {
        /// `private` or `public`
        #[arg(long)]
        kind: Option<KeyKind>,
    },
    /// Show the key bound to an address
    Export {
        address: String,
        #[arg(long)]
        kind: Option<KeyKind>,
    },
    /// Add an armored key read from a file
    Insert {
        address: String,
        path: std::path::PathBuf,
        /// e.g. `Fingerprint`, `Provider_Trust`
        #[arg(long)]
        validation: Option<ValidationLevel>,
    },
    /// Remove the key bound to an address
    Delete {
        address: String,
        #[arg(long)]
        kind: Option<KeyKind>,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventsAction {
    /// Print events as JSON lines until interrupted
    Watch {
        #[arg(required = true)]
        names: Vec<String>,
    },
}
