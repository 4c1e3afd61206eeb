use clap::{Parser, Subcommand};
use kb_shared::uac::Role;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,

    #[arg(
        long,
        default_value = "configuration",
        help = "Folder holding base.toml and the per environment files"
    )]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in and remember the session
    Login {
        account: String,
        /// Read from stdin when not given
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the session (the server is told as well)
    Logout,
    /// Show the stored identity
    Whoami {
        /// Also ask the server if the stored token is still accepted
        #[arg(long)]
        verify: bool,
    },
    /// Create an account
    Register {
        account: String,
        #[arg(long)]
        role: Option<Role>,
        /// Read from stdin when not given
        #[arg(long)]
        password: Option<String>,
    },
    /// Resolve a path against the route table as the current user
    Navigate { path: String },
    #[command(subcommand)]
    Users(UsersCommand),
    #[command(subcommand)]
    Chat(ChatCommand),
    #[command(subcommand)]
    Knowledge(KnowledgeCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum UsersCommand {
    List,
    Show { id: u64 },
    Disable { id: u64 },
    Enable { id: u64 },
    Delete { id: u64 },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Start a new conversation and print its id
    New,
    Sessions {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 3)]
        size: u32,
    },
    History { session_id: String },
    /// Send a message and print the assistant's reply
    Ask { session_id: String, message: String },
    Symptoms { session_id: String },
    Clear { session_id: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeCommand {
    Graph,
    Node { id: String },
    Related {
        id: String,
        #[arg(long = "type")]
        relation_type: Option<String>,
    },
    Disease { name: String },
    Subgraph {
        node: String,
        #[arg(long = "type")]
        node_type: String,
    },
}
