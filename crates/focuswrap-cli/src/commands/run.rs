use std::io::BufRead;
use std::path::PathBuf;

use clap::{ArgGroup, Args};
use focuswrap_core::{normalize, Command, Config, HttpMonitoring, MonitoringBridge, SessionRunner};
use tokio::sync::mpsc;
use tracing::debug;
use url::Url;

use super::plan::{generate, read_input};

const HELP: &str = "commands: start | pause | resume | toggle N | end | status | help";

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["plan", "prompt"])))]
pub struct RunArgs {
    /// Raw plan payload file (generator output)
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Generate the plan from this prompt
    #[arg(long)]
    prompt: Option<String>,
}

/// Run one session. Commands are read line by line from stdin; events are
/// written to stdout as JSON lines.
pub async fn run(args: RunArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let plan = match (&args.plan, &args.prompt) {
        (Some(file), _) => normalize(&read_input(file)?)?,
        (None, Some(prompt)) => generate(prompt, config).await?,
        (None, None) => return Err("either --plan or --prompt is required".into()),
    };
    let view_url = Url::parse(&config.results.view_url)?;

    let bridge = MonitoringBridge::new(HttpMonitoring::from_config(&config.monitoring));
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::channel(32);

    let mut runner = SessionRunner::new(bridge, event_tx);
    runner.arm(plan)?;

    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => debug!(error = %e, "could not serialize event"),
            }
        }
    });

    // Blocking stdin reads stay off the runtime; the thread is left behind
    // if the session ends on its own.
    eprintln!("{HELP}");
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Ok(Some(command)) => {
                    if command_tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(message) => eprintln!("{message}"),
            }
        }
    });

    let report = runner.run(command_rx).await;
    printer.await?;

    match report {
        Some(report) => {
            println!("{}", serde_json::to_string(&report.handoff)?);
            println!("{}", report.handoff.to_url(&view_url));
        }
        None => eprintln!("session was never started"),
    }
    Ok(())
}

/// Parse one stdin line. `Ok(None)` means nothing to send.
fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "start" => Command::Start,
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "end" | "stop" => Command::End,
        "status" => Command::Status,
        "toggle" => {
            let index = parts
                .next()
                .ok_or_else(|| "usage: toggle N".to_string())?
                .parse::<usize>()
                .map_err(|_| "toggle expects a checklist index".to_string())?;
            Command::Toggle(index)
        }
        "help" => return Err(HELP.to_string()),
        other => return Err(format!("unknown command '{other}'; {HELP}")),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse_command("start"), Ok(Some(Command::Start)));
        assert_eq!(parse_command("  PAUSE "), Ok(Some(Command::Pause)));
        assert_eq!(parse_command("toggle 2"), Ok(Some(Command::Toggle(2))));
        assert_eq!(parse_command("end"), Ok(Some(Command::End)));
        assert_eq!(parse_command(""), Ok(None));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("toggle").is_err());
        assert!(parse_command("toggle x").is_err());
        assert!(parse_command("jump").is_err());
        assert!(parse_command("help").is_err());
    }
}
