use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use glance_core::followup::MAX_FOLLOWUPS;
use glance_core::session::Mode;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::host::Host;

const COMMANDS: [&str; 4] = ["/open", "/brief", "/close", "/help"];

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open { mode: Mode, text: String },
    Close,
    Help,
    Followup(usize),
    Ask(String),
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            return Command::Quit;
        }

        if let Some(rest) = line.strip_prefix('/') {
            let (name, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let text = text.trim();
            return match name {
                "open" | "brief" if text.is_empty() => {
                    Command::Invalid(format!("Usage: /{name} <text>"))
                }
                "open" => Command::Open {
                    mode: Mode::Long,
                    text: text.to_string(),
                },
                "brief" => Command::Open {
                    mode: Mode::Short,
                    text: text.to_string(),
                },
                "close" => Command::Close,
                "help" => Command::Help,
                _ => Command::Invalid(format!("Unknown command: /{name}")),
            };
        }

        match line.parse::<usize>() {
            Ok(number) if (1..=MAX_FOLLOWUPS).contains(&number) => Command::Followup(number),
            _ => Command::Ask(line.to_string()),
        }
    }
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn print_help() {
    println!("{}", "/open <text>   explain in depth".bright_black());
    println!("{}", "/brief <text>  explain briefly".bright_black());
    println!("{}", "1-3            ask a suggested follow-up".bright_black());
    println!("{}", "/close         close the panel".bright_black());
    println!("{}", "quit | exit    leave".bright_black());
    println!("{}", "Anything else is sent to the open panel.".bright_black());
}

/// Runs the prompt loop until `quit`, `exit` or Ctrl-D.
pub async fn run(host: &mut Host) -> anyhow::Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Glance ===".bright_magenta().bold());
    println!("{}", "Type '/help' for commands or 'quit' to exit.".bright_black());
    println!();

    loop {
        let prompt = if host.has_panel() { "glance> " } else { ">> " };
        match rl.readline(prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.trim());

                match Command::parse(&line) {
                    Command::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Command::Open { mode, text } => {
                        if let Err(err) = host.open(&text, mode).await {
                            eprintln!("{}", format!("Error: {err}").red());
                        }
                    }
                    Command::Close => host.close(),
                    Command::Help => print_help(),
                    Command::Followup(number) => host.choose_followup(number).await,
                    Command::Ask(text) => host.ask(&text).await,
                    Command::Invalid(message) => println!("{}", message.yellow()),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    host.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_commands_pick_mode() {
        assert_eq!(
            Command::parse("/open  hyponatremia "),
            Command::Open {
                mode: Mode::Long,
                text: "hyponatremia".into()
            }
        );
        assert_eq!(
            Command::parse("/brief SIADH"),
            Command::Open {
                mode: Mode::Short,
                text: "SIADH".into()
            }
        );
        assert!(matches!(Command::parse("/open"), Command::Invalid(_)));
    }

    #[test]
    fn test_numbers_select_followups() {
        assert_eq!(Command::parse("2"), Command::Followup(2));
        assert_eq!(Command::parse("4"), Command::Ask("4".into()));
        assert_eq!(Command::parse("0"), Command::Ask("0".into()));
    }

    #[test]
    fn test_other_lines() {
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("/close"), Command::Close);
        assert_eq!(
            Command::parse("what about children?"),
            Command::Ask("what about children?".into())
        );
        assert!(matches!(Command::parse("/plan"), Command::Invalid(_)));
    }
}
