//! Line-oriented console front end for a running engine.
//!
//! Reads one command per line from stdin and prints the history whenever
//! it changes. Entries are numbered from 1 on screen.

use std::io::BufRead;

use clipkeep_engine::{EngineEvent, EngineHandle, HistorySnapshot};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

const HELP: &str = "commands: <n> restore entry n | d <n> drag entry n | l list | c clear | t toggle | q quit";

/// A parsed console command. Indexes are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    List,
    Select(usize),
    Drag(usize),
    Clear,
    Toggle,
    Help,
    Quit,
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(ConsoleCommand::List);
    };
    let command = match head {
        "l" | "list" => ConsoleCommand::List,
        "c" | "clear" => ConsoleCommand::Clear,
        "t" | "toggle" => ConsoleCommand::Toggle,
        "h" | "help" | "?" => ConsoleCommand::Help,
        "q" | "quit" | "exit" => ConsoleCommand::Quit,
        "d" | "drag" => {
            let arg = words.next().ok_or("drag needs an entry number")?;
            ConsoleCommand::Drag(parse_entry(arg)?)
        }
        other => ConsoleCommand::Select(parse_entry(other)?),
    };
    if words.next().is_some() {
        return Err(format!("unexpected arguments after {head:?}"));
    }
    Ok(command)
}

fn parse_entry(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("not an entry number: {arg:?}")),
        Ok(n) => Ok(n - 1),
    }
}

/// Render the history listing.
pub fn render(history: &HistorySnapshot) -> String {
    if history.is_empty() {
        return "No clipboard history yet".to_string();
    }
    history
        .labels()
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{:>3}  {label}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read stdin lines on a detached thread.
///
/// A blocking stdin read cannot be cancelled, so it must not live on the
/// runtime's blocking pool, which is joined at shutdown. The thread exits
/// when stdin closes or the receiver is gone.
fn spawn_stdin_reader() -> anyhow::Result<mpsc::Receiver<std::io::Result<String>>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::Builder::new()
        .name("clipkeep-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Drive the engine from stdin until the user quits or stdin closes.
pub async fn run(handle: EngineHandle) -> anyhow::Result<()> {
    let mut events = handle.subscribe();
    let mut lines = spawn_stdin_reader()?;

    println!("{HELP}");
    println!("{}", render(&handle.snapshot()));

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line.transpose()? else {
                    debug!("stdin closed");
                    break;
                };
                match parse_command(&line) {
                    Ok(ConsoleCommand::Quit) => break,
                    Ok(command) => execute(&handle, command).await?,
                    Err(message) => println!("{message}"),
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => report(&handle, &event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "console fell behind engine events");
                        println!("{}", render(&handle.snapshot()));
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    Ok(())
}

async fn execute(handle: &EngineHandle, command: ConsoleCommand) -> anyhow::Result<()> {
    match command {
        ConsoleCommand::List => println!("{}", render(&handle.snapshot())),
        ConsoleCommand::Select(index) => {
            if index >= handle.snapshot().len() {
                println!("no entry {}", index + 1);
                return Ok(());
            }
            handle.select(index).await?;
        }
        ConsoleCommand::Drag(index) => match handle.begin_drag(index).await? {
            Some(text) => println!("drag payload: {text}"),
            None => println!("only text entries can be dragged"),
        },
        ConsoleCommand::Clear => handle.clear_history().await?,
        ConsoleCommand::Toggle => handle.toggle_visibility().await?,
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => {}
    }
    Ok(())
}

fn report(handle: &EngineHandle, event: &EngineEvent) {
    match event {
        EngineEvent::HistoryChanged => println!("{}", render(&handle.snapshot())),
        EngineEvent::SelectionCommitted { label, .. } => println!("copied: {label}"),
        EngineEvent::SelectionFailed { index, reason } => {
            println!("could not copy entry {}: {reason}", index + 1);
        }
        EngineEvent::VisibilityChanged { visible } => {
            println!("{}", if *visible { "shown" } else { "hidden" });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clipkeep_clipboard::mock::MockClipboard;
    use clipkeep_engine::{Config, Engine};

    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("3"), Ok(ConsoleCommand::Select(2)));
        assert_eq!(parse_command(" d 1 "), Ok(ConsoleCommand::Drag(0)));
        assert_eq!(parse_command("clear"), Ok(ConsoleCommand::Clear));
        assert_eq!(parse_command("t"), Ok(ConsoleCommand::Toggle));
        assert_eq!(parse_command("q"), Ok(ConsoleCommand::Quit));
        assert_eq!(parse_command(""), Ok(ConsoleCommand::List));
    }

    #[test]
    fn rejects_bad_entries() {
        assert!(parse_command("0").is_err());
        assert!(parse_command("abc").is_err());
        assert!(parse_command("d").is_err());
        assert!(parse_command("1 2").is_err());
    }

    #[test]
    fn renders_empty_history() {
        assert_eq!(render(&HistorySnapshot::default()), "No clipboard history yet");
    }

    #[tokio::test]
    async fn missing_entry_is_not_sent_to_engine() {
        let engine = Engine::new(Config::default(), Arc::new(MockClipboard::new()));
        let handle = engine.handle();
        // With the engine gone, any command that reaches it fails.
        drop(engine);

        assert!(execute(&handle, ConsoleCommand::Select(0)).await.is_ok());
        assert!(execute(&handle, ConsoleCommand::Clear).await.is_err());
    }
}
