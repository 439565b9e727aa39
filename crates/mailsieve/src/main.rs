//! `mailsieve` - terminal inbox viewer with a sender blocklist.
//!
//! Fetches the last few days of INBOX over IMAP, hides blocked senders and
//! keeps a session checklist that an LLM assistant can help fill.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod shell;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailsieve_core::address::{is_valid_email, normalize};
use mailsieve_core::format::{detail_view, list_line};
use mailsieve_core::{Config, MailError, MailboxClient, Message, SenderFilter};

use cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from_env();
    debug!(?config, "configuration loaded");
    let mut filter = SenderFilter::load(config.blocked_emails_file.clone());

    match cli.command {
        Command::Fetch { days, json } => {
            let days = days.unwrap_or(config.fetch_window_days);
            let messages = fetch_once(&config, &filter, days).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else {
                print_list(&messages);
            }
        }
        Command::Show { index, days } => {
            let days = days.unwrap_or(config.fetch_window_days);
            let messages = fetch_once(&config, &filter, days).await?;
            let Some(message) = index.checked_sub(1).and_then(|i| messages.get(i)) else {
                bail!("no message #{index} ({} fetched)", messages.len());
            };
            println!("{}", detail_view(message));
        }
        Command::Block { address } => block(&mut filter, &address)?,
        Command::Unblock { address } => unblock(&mut filter, &address),
        Command::Blocked => print_blocked(&filter),
        Command::Shell => shell::run(config, filter).await?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "mailsieve=info,mailsieve_core=info,mailsieve_imap=warn",
        1 => "mailsieve=debug,mailsieve_core=debug,mailsieve_imap=debug",
        _ => "mailsieve=trace,mailsieve_core=trace,mailsieve_imap=trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Logs in with the configured credentials.
async fn open_mailbox(config: &Config) -> Result<MailboxClient> {
    let (email, password) = config.credentials()?;
    let mut mailbox: MailboxClient = MailboxClient::new(config.imap_config());
    mailbox
        .connect(email, password)
        .await
        .with_context(|| format!("could not log in to {}", config.imap_server))?;
    Ok(mailbox)
}

/// Connects, fetches once and disconnects.
///
/// A refused search is reported and treated as an empty inbox.
async fn fetch_once(config: &Config, filter: &SenderFilter, days: u32) -> Result<Vec<Message>> {
    let mut mailbox = open_mailbox(config).await?;
    let result = mailbox.fetch_recent(filter, days).await;
    mailbox.disconnect().await;

    match result {
        Ok(messages) => Ok(messages),
        Err(MailError::Search(reason)) => {
            eprintln!("Search failed: {reason}");
            Ok(Vec::new())
        }
        Err(e) => Err(e).context("could not fetch messages"),
    }
}

pub(crate) fn print_list(messages: &[Message]) {
    if messages.is_empty() {
        println!("No messages.");
        return;
    }
    let today = Local::now().date_naive();
    for (i, message) in messages.iter().enumerate() {
        println!("{:>3}. {}", i + 1, list_line(message, today));
    }
}

pub(crate) fn block(filter: &mut SenderFilter, address: &str) -> Result<()> {
    let address = normalize(address);
    if !is_valid_email(&address) {
        bail!("not a valid email address: {address}");
    }
    filter.add(&address);
    println!("Blocked {address}");
    Ok(())
}

pub(crate) fn unblock(filter: &mut SenderFilter, address: &str) {
    let address = normalize(address);
    if filter.remove(&address) {
        println!("Unblocked {address}");
    } else {
        println!("{address} is not in the blocklist");
    }
}

pub(crate) fn print_blocked(filter: &SenderFilter) {
    let blocked = filter.list();
    if blocked.is_empty() {
        println!("Blocklist is empty.");
        return;
    }
    for address in blocked {
        println!("{address}");
    }
}
