//! Command-line arguments.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "mailsieve", version, about = "Read recent mail without the senders you blocked")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List recent INBOX messages
    Fetch {
        /// Days to look back (defaults to FETCH_WINDOW_DAYS)
        #[arg(short, long)]
        days: Option<u32>,
        /// Print messages as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one message from the recent list
    Show {
        /// Position in the list printed by `fetch`, starting at 1
        index: usize,
        /// Days to look back (defaults to FETCH_WINDOW_DAYS)
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Block a sender address
    Block { address: String },
    /// Unblock a sender address
    Unblock { address: String },
    /// List blocked addresses
    Blocked,
    /// Interactive session with a checklist
    Shell,
}
