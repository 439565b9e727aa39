//! Interactive session.
//!
//! Holds one IMAP connection, the last fetch result and the checklist for
//! as long as the user stays in the shell.

use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use mailsieve_core::address::extract_address;
use mailsieve_core::format::detail_view;
use mailsieve_core::{
    Assistant, Checklist, Config, MailError, MailboxClient, Message, SenderFilter,
};

use crate::{block, print_blocked, print_list, unblock};

const HELP: &str = "\
Commands:
  fetch [DAYS]          fetch recent messages
  show N                show message N
  block N|ADDRESS       block the sender of message N, or an address
  unblock ADDRESS       remove an address from the blocklist
  blocked               list blocked addresses
  todo                  show the checklist
  todo add TEXT         add a checklist item
  todo done N           check or uncheck item N
  todo rm N             remove item N
  suggest N [COUNT]     draft checklist items from message N
  summary N             summarize message N
  help                  show this help
  quit                  leave the shell";

#[derive(Debug, PartialEq, Eq)]
enum BlockTarget {
    Index(usize),
    Address(String),
}

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Fetch(Option<u32>),
    Show(usize),
    Block(BlockTarget),
    Unblock(String),
    Blocked,
    Todo,
    TodoAdd(String),
    TodoDone(usize),
    TodoRemove(usize),
    Suggest { index: usize, count: Option<usize> },
    Summary(usize),
    Help,
    Quit,
}

/// Splits off the first word and returns it with the trimmed remainder.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    input
        .split_once(char::is_whitespace)
        .map_or((input, ""), |(word, rest)| (word, rest.trim()))
}

fn number<T: std::str::FromStr>(arg: &str, usage: &str) -> Result<T> {
    arg.parse().map_err(|_| anyhow!("usage: {usage}"))
}

/// Parses one input line. Blank lines give `None`.
fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let (word, rest) = split_word(line);
    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "fetch" if rest.is_empty() => ShellCommand::Fetch(None),
        "fetch" => ShellCommand::Fetch(Some(number(rest, "fetch [DAYS]")?)),
        "show" => ShellCommand::Show(number(rest, "show N")?),
        "block" if rest.is_empty() => bail!("usage: block N|ADDRESS"),
        "block" => ShellCommand::Block(
            rest.parse()
                .map_or_else(|_| BlockTarget::Address(rest.to_string()), BlockTarget::Index),
        ),
        "unblock" if rest.is_empty() => bail!("usage: unblock ADDRESS"),
        "unblock" => ShellCommand::Unblock(rest.to_string()),
        "blocked" => ShellCommand::Blocked,
        "todo" => parse_todo(rest)?,
        "suggest" => {
            let (index, count) = split_word(rest);
            ShellCommand::Suggest {
                index: number(index, "suggest N [COUNT]")?,
                count: if count.is_empty() {
                    None
                } else {
                    Some(number(count, "suggest N [COUNT]")?)
                },
            }
        }
        "summary" => ShellCommand::Summary(number(rest, "summary N")?),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => bail!("unknown command `{other}`, try `help`"),
    };
    Ok(Some(command))
}

fn parse_todo(args: &str) -> Result<ShellCommand> {
    let (sub, rest) = split_word(args);
    Ok(match sub {
        "" => ShellCommand::Todo,
        "add" if rest.is_empty() => bail!("usage: todo add TEXT"),
        "add" => ShellCommand::TodoAdd(rest.to_string()),
        "done" => ShellCommand::TodoDone(number(rest, "todo done N")?),
        "rm" => ShellCommand::TodoRemove(number(rest, "todo rm N")?),
        other => bail!("unknown todo command `{other}`, try `help`"),
    })
}

struct Shell {
    mailbox: MailboxClient,
    config: Config,
    filter: SenderFilter,
    messages: Vec<Message>,
    checklist: Checklist,
    assistant: Option<Assistant>,
}

impl Shell {
    async fn execute(&mut self, command: ShellCommand) -> Result<()> {
        match command {
            ShellCommand::Fetch(days) => {
                let days = days.unwrap_or(self.config.fetch_window_days);
                self.fetch(days).await?;
            }
            ShellCommand::Show(n) => println!("{}", detail_view(self.message(n)?)),
            ShellCommand::Block(target) => {
                let address = match target {
                    BlockTarget::Index(n) => extract_address(&self.message(n)?.sender).to_string(),
                    BlockTarget::Address(address) => address,
                };
                block(&mut self.filter, &address)?;
                let before = self.messages.len();
                self.messages.retain(|m| !self.filter.is_blocked(&m.sender));
                if self.messages.len() != before {
                    print_list(&self.messages);
                }
            }
            ShellCommand::Unblock(address) => unblock(&mut self.filter, &address),
            ShellCommand::Blocked => print_blocked(&self.filter),
            ShellCommand::Todo => self.print_checklist(),
            ShellCommand::TodoAdd(text) => match self.checklist.add(&text) {
                Some(i) => println!("Added #{}", i + 1),
                None => println!("Nothing to add."),
            },
            ShellCommand::TodoDone(n) => {
                match n.checked_sub(1).and_then(|i| self.checklist.toggle(i)) {
                    Some(true) => println!("Checked off #{n}"),
                    Some(false) => println!("Unchecked #{n}"),
                    None => bail!("no checklist item #{n}"),
                }
            }
            ShellCommand::TodoRemove(n) => {
                let Some(item) = n.checked_sub(1).and_then(|i| self.checklist.remove(i)) else {
                    bail!("no checklist item #{n}");
                };
                println!("Removed: {}", item.text);
            }
            ShellCommand::Suggest { index, count } => {
                let items = {
                    let assistant = self.assistant()?;
                    let message = self.message(index)?;
                    match count {
                        None => vec![assistant.suggest_item(message).await?],
                        Some(count) => assistant.suggest_items(message, count).await?,
                    }
                };
                if items.is_empty() {
                    println!("No suggestions.");
                }
                for item in items {
                    if let Some(i) = self.checklist.add(&item) {
                        println!("Added #{}: {item}", i + 1);
                    }
                }
            }
            ShellCommand::Summary(n) => {
                let summary = self.assistant()?.summarize(self.message(n)?).await?;
                println!("{summary}");
            }
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => {}
        }
        Ok(())
    }

    /// Fetches into `self.messages`, connecting first if needed.
    ///
    /// A refused search clears the list; other failures keep it.
    async fn fetch(&mut self, days: u32) -> Result<()> {
        if !self.mailbox.is_connected() {
            let (email, password) = self.config.credentials()?;
            self.mailbox
                .connect(email, password)
                .await
                .with_context(|| format!("could not log in to {}", self.config.imap_server))?;
        }

        match self.mailbox.fetch_recent(&self.filter, days).await {
            Ok(messages) => self.messages = messages,
            Err(MailError::Search(reason)) => {
                println!("Search failed: {reason}");
                self.messages.clear();
            }
            Err(e) => return Err(e).context("could not fetch messages"),
        }
        print_list(&self.messages);
        Ok(())
    }

    /// Runs commands from `input`, then closes the IMAP session whether or
    /// not reading failed.
    async fn serve<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let result = self.read_loop(input).await;
        self.mailbox.disconnect().await;
        result
    }

    /// Reads and runs commands until `quit` or end of input.
    async fn read_loop<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        loop {
            print!("mailsieve> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!();
                return Ok(());
            };
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            };
            if command == ShellCommand::Quit {
                return Ok(());
            }
            if let Err(e) = self.execute(command).await {
                println!("Error: {e:#}");
            }
        }
    }

    fn message(&self, n: usize) -> Result<&Message> {
        n.checked_sub(1)
            .and_then(|i| self.messages.get(i))
            .ok_or_else(|| anyhow!("no message #{n}, run `fetch` first or pick from the list"))
    }

    fn assistant(&self) -> Result<&Assistant> {
        self.assistant
            .as_ref()
            .context("assistant disabled, set CLAUDE_API_KEY to enable it")
    }

    fn print_checklist(&self) {
        if self.checklist.is_empty() {
            println!("Checklist is empty.");
            return;
        }
        for (i, item) in self.checklist.items().iter().enumerate() {
            println!("{:>3}. {item}", i + 1);
        }
    }
}

/// Runs the shell until `quit` or end of input.
pub async fn run(config: Config, filter: SenderFilter) -> Result<()> {
    let assistant = Assistant::from_config(&config);
    if assistant.is_none() {
        info!("assistant disabled, set CLAUDE_API_KEY to enable it");
    }

    let mut shell = Shell {
        mailbox: MailboxClient::new(config.imap_config()),
        config,
        filter,
        messages: Vec::new(),
        checklist: Checklist::new(),
        assistant,
    };

    println!("mailsieve shell. Type `help` for commands.");
    shell.serve(BufReader::new(tokio::io::stdin())).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ShellCommand {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert!(parse_command("   ").unwrap().is_none());
    }

    #[test]
    fn test_fetch_and_show() {
        assert_eq!(parse("fetch"), ShellCommand::Fetch(None));
        assert_eq!(parse("FETCH 3"), ShellCommand::Fetch(Some(3)));
        assert_eq!(parse("show 2"), ShellCommand::Show(2));
        assert!(parse_command("fetch soon").is_err());
        assert!(parse_command("show").is_err());
    }

    #[test]
    fn test_block_target() {
        assert_eq!(parse("block 4"), ShellCommand::Block(BlockTarget::Index(4)));
        assert_eq!(
            parse("block Spam@Example.com"),
            ShellCommand::Block(BlockTarget::Address("Spam@Example.com".to_string()))
        );
        assert!(parse_command("block").is_err());
        assert_eq!(
            parse("unblock a@b.co"),
            ShellCommand::Unblock("a@b.co".to_string())
        );
    }

    #[test]
    fn test_todo_commands() {
        assert_eq!(parse("todo"), ShellCommand::Todo);
        assert_eq!(
            parse("todo add  Call the   bank "),
            ShellCommand::TodoAdd("Call the   bank".to_string())
        );
        assert_eq!(parse("todo done 1"), ShellCommand::TodoDone(1));
        assert_eq!(parse("todo rm 2"), ShellCommand::TodoRemove(2));
        assert!(parse_command("todo add").is_err());
        assert!(parse_command("todo later").is_err());
    }

    #[test]
    fn test_assistant_commands() {
        assert_eq!(
            parse("suggest 1"),
            ShellCommand::Suggest {
                index: 1,
                count: None
            }
        );
        assert_eq!(
            parse("suggest 1 3"),
            ShellCommand::Suggest {
                index: 1,
                count: Some(3)
            }
        );
        assert_eq!(parse("summary 5"), ShellCommand::Summary(5));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("frobnicate").unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
        assert_eq!(parse("quit"), ShellCommand::Quit);
        assert_eq!(parse("?"), ShellCommand::Help);
    }

    fn idle_shell() -> Shell {
        let config = Config::default();
        Shell {
            mailbox: MailboxClient::new(config.imap_config()),
            filter: SenderFilter::load("unused_blocklist.json"),
            config,
            messages: Vec::new(),
            checklist: Checklist::new(),
            assistant: None,
        }
    }

    #[tokio::test]
    async fn test_serve_stops_at_quit() {
        let mut shell = idle_shell();
        let input: &[u8] = b"todo add Pay rent\nquit\ntodo add Never reached\n";

        shell.serve(input).await.unwrap();

        assert_eq!(shell.checklist.items().len(), 1);
        assert!(!shell.mailbox.is_connected());
    }

    #[tokio::test]
    async fn test_serve_read_error_still_disconnects() {
        let mut shell = idle_shell();
        let input: &[u8] = b"todo add Pay rent\n\xff\xfe\n";

        assert!(shell.serve(input).await.is_err());
        assert_eq!(shell.checklist.items().len(), 1);
        assert!(!shell.mailbox.is_connected());
    }
}
