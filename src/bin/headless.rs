//! Headless auto-play driver.
//!
//! Spawns the async adapter runtime, lets the planner play until the level
//! ends (or `MATCH3_MAX_MOVES` moves), and prints every outbound message as
//! one JSON line on stdout. When stdin is not a terminal its lines are
//! parsed as commands and sent first, so a scripted opening can be piped in.
//!
//! ```text
//! MATCH3_SEED=7 MATCH3_PACING_MS=0 headless < /dev/null
//! ```

use std::io::{BufRead, IsTerminal, StdoutLock, Write};

use anyhow::{Context, Result};
use log::{info, warn};

use tui_match3::adapter::{encode_line, parse_command, AdapterConfig, Command, Outbound, RuntimeHandle};
use tui_match3::core::GameSnapshot;

const DEFAULT_MAX_MOVES: u32 = 200;

struct Printer {
    out: StdoutLock<'static>,
    seq: u64,
}

impl Printer {
    fn emit(&mut self, msg: &Outbound) -> Result<()> {
        self.seq += 1;
        writeln!(self.out, "{}", encode_line(self.seq, msg)?)?;
        Ok(())
    }

    /// Print messages up to the state that closes the current command.
    /// Returns `None` if the command was rejected.
    async fn until_state(&mut self, rt: &mut RuntimeHandle) -> Result<Option<GameSnapshot>> {
        let mut rejected = false;
        while let Some(msg) = rt.recv().await {
            self.emit(&msg)?;
            match msg {
                Outbound::Rejected { command, reason } => {
                    warn!("{} rejected: {}", command, reason.message());
                    rejected = true;
                }
                Outbound::State(snap) => return Ok((!rejected).then_some(*snap)),
                _ => {}
            }
        }
        Ok(None)
    }
}

fn read_script() -> Result<Vec<Command>> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }
    let mut commands = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Snapshot) => {}
            Ok(cmd) => commands.push(cmd),
            Err(e) => warn!("skipping input line: {e}"),
        }
    }
    Ok(commands)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = AdapterConfig::from_env().context("reading adapter configuration")?;
    let max_moves = std::env::var("MATCH3_MAX_MOVES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_MOVES);
    let script = read_script()?;

    let mut rt = RuntimeHandle::spawn(config);
    let mut printer = Printer {
        out: std::io::stdout().lock(),
        seq: 0,
    };

    let first = rt.next_state().await?;
    printer.emit(&Outbound::State(Box::new(first)))?;

    for cmd in script {
        rt.send(cmd).await?;
        printer.until_state(&mut rt).await?;
    }

    let mut played = 0;
    while played < max_moves {
        rt.send(Command::AutoMove).await?;
        let Some(snap) = printer.until_state(&mut rt).await? else {
            break;
        };
        played += 1;
        if !snap.phase.is_active() {
            info!("level ended ({}) after {} moves", snap.phase.as_str(), played);
            break;
        }
    }

    printer.out.flush()?;
    rt.shutdown().await?;
    Ok(())
}
