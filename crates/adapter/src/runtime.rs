//! Adapter runtime - one actor task owns the game
//!
//! Commands arrive over a bounded channel and are applied one at a time.
//! The engine resolves an action synchronously; the actor then replays the
//! captured phase frames with a pause after each. While a paced action is
//! being replayed the single-flight gate is held: new actions are rejected
//! (never queued) but countdown ticks and snapshot requests are served.

use std::collections::VecDeque;

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::AdapterConfig;
use crate::core::{EngineEvent, GameSnapshot, GameState, RandomSource, SimpleRng};
use crate::countdown::Countdown;
use crate::engine::{apply_best_move, PlanError};
use crate::error::{AdapterError, Result};
use crate::types::{GameMode, Phase, PowerKind};

/// Command delivered to the actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Swap { a: usize, b: usize },
    Power { kind: PowerKind, target: Option<usize> },
    SelectPower(PowerKind),
    Reset,
    SetMode(GameMode),
    LevelUp,
    /// Let the planner play the best swap.
    AutoMove,
    Hint,
    Snapshot,
    /// Jump to an active level (scenario setup).
    StartAtLevel(u32),
    Shutdown,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Swap { .. } => "swap",
            Command::Power { .. } => "power",
            Command::SelectPower(_) => "selectPower",
            Command::Reset => "reset",
            Command::SetMode(_) => "mode",
            Command::LevelUp => "levelUp",
            Command::AutoMove => "autoMove",
            Command::Hint => "hint",
            Command::Snapshot => "snapshot",
            Command::StartAtLevel(_) => "startAtLevel",
            Command::Shutdown => "shutdown",
        }
    }

    /// Whether the command starts a board-mutating action
    pub fn is_action(&self) -> bool {
        !matches!(self, Command::Hint | Command::Snapshot | Command::Shutdown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// An action is still being paced.
    Busy,
    Planner(PlanError),
}

impl Rejection {
    pub fn code(self) -> &'static str {
        match self {
            Rejection::Busy => "busy",
            Rejection::Planner(e) => e.code(),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Rejection::Busy => "an action is still being resolved",
            Rejection::Planner(e) => e.message(),
        }
    }
}

/// Message produced by the actor
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    State(Box<GameSnapshot>),
    Frame { phase: Phase, snapshot: Box<GameSnapshot> },
    Event(EngineEvent),
    Clock { time_left: u32 },
    Hint(Option<(usize, usize)>),
    Ack { command: &'static str, committed: bool },
    Rejected { command: &'static str, reason: Rejection },
}

/// Actor owning one game session
pub struct Actor<R = SimpleRng> {
    state: GameState<R>,
    config: AdapterConfig,
    cmd_rx: mpsc::Receiver<Command>,
    out_tx: mpsc::UnboundedSender<Outbound>,
    tick_tx: mpsc::UnboundedSender<u32>,
    tick_rx: mpsc::UnboundedReceiver<u32>,
    countdown: Countdown,
    closing: bool,
}

impl<R: RandomSource + Clone> Actor<R> {
    pub fn new(
        state: GameState<R>,
        config: AdapterConfig,
        cmd_rx: mpsc::Receiver<Command>,
        out_tx: mpsc::UnboundedSender<Outbound>,
    ) -> Self {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        Self {
            state,
            config,
            cmd_rx,
            out_tx,
            tick_tx,
            tick_rx,
            countdown: Countdown::new(),
            closing: false,
        }
    }

    /// Run until `Shutdown` or until every command sender is dropped
    pub async fn run(mut self) -> Result<()> {
        self.state.set_frame_capture(true);
        self.state.start();
        self.settle(true).await?;

        while !self.closing {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    None | Some(Command::Shutdown) => break,
                    // Exactly one state, no settle pass.
                    Some(Command::Snapshot) => self.send_state()?,
                    Some(cmd) => {
                        self.apply(cmd)?;
                        self.settle(true).await?;
                    }
                },
                Some(epoch) = self.tick_rx.recv() => {
                    self.on_tick(epoch)?;
                    self.settle(false).await?;
                }
            }
        }

        self.countdown.stop();
        info!("adapter runtime stopped (session {})", self.state.session_id());
        Ok(())
    }

    fn send(&self, msg: Outbound) -> Result<()> {
        self.out_tx.send(msg).map_err(|_| AdapterError::ChannelClosed)
    }

    fn send_state(&self) -> Result<()> {
        self.send(Outbound::State(Box::new(self.state.snapshot())))
    }

    fn apply(&mut self, cmd: Command) -> Result<()> {
        let command = cmd.name();
        let committed = match cmd {
            Command::Swap { a, b } => self.state.submit_swap(a, b),
            Command::Power { kind, target } => self.state.use_superpower(kind, target),
            Command::SelectPower(kind) => {
                let before = self.state.superpowers().count(kind);
                let selected = self.state.select_power(kind);
                // The time power is applied on selection.
                selected == Some(kind) || self.state.superpowers().count(kind) < before
            }
            Command::Reset => {
                self.countdown.stop();
                self.state.reset_session();
                true
            }
            Command::SetMode(mode) => {
                self.countdown.stop();
                self.state.configure_mode(mode);
                true
            }
            Command::LevelUp => self.state.level_up(),
            Command::StartAtLevel(level) => {
                self.countdown.stop();
                self.state.start_at_level(level);
                true
            }
            Command::AutoMove => match apply_best_move(&mut self.state) {
                Ok(plan) => {
                    debug!("auto move {}<->{}", plan.a, plan.b);
                    true
                }
                Err(e) => {
                    return self.send(Outbound::Rejected {
                        command,
                        reason: Rejection::Planner(e),
                    });
                }
            },
            Command::Hint => return self.send(Outbound::Hint(self.state.hint())),
            Command::Snapshot => return self.send_state(),
            Command::Shutdown => {
                self.closing = true;
                return Ok(());
            }
        };
        self.send(Outbound::Ack { command, committed })
    }

    fn on_tick(&mut self, epoch: u32) -> Result<()> {
        if !self.countdown.accepts(epoch) || epoch != self.state.countdown_epoch() {
            debug!("dropping stale countdown tick {}", epoch);
            return Ok(());
        }
        if self.state.tick_second() {
            self.send(Outbound::Clock {
                time_left: self.state.time_left(),
            })?;
        }
        Ok(())
    }

    /// Forward every pending engine event, pacing at phase frames, then
    /// publish the settled state (always when `publish`, otherwise only if
    /// something happened)
    async fn settle(&mut self, publish: bool) -> Result<()> {
        let mut gated = false;
        let mut forwarded = false;
        loop {
            let mut pending: VecDeque<EngineEvent> = self.state.drain_events().into();
            forwarded |= !pending.is_empty();
            if pending.is_empty() {
                if gated {
                    gated = false;
                    self.state.set_busy(false);
                    // The countdown may have run out while the gate was held.
                    self.state.check_game_state();
                    continue;
                }
                break;
            }

            while let Some(event) = pending.pop_front() {
                match event {
                    EngineEvent::Frame { phase, snapshot } => {
                        if !gated {
                            gated = true;
                            self.state.set_busy(true);
                        }
                        self.send(Outbound::Frame { phase, snapshot })?;
                        self.pause(phase).await?;
                        if self.closing {
                            self.state.set_busy(false);
                            return Ok(());
                        }
                    }
                    EngineEvent::CountdownStarted { seconds } => {
                        self.countdown.start(
                            self.state.countdown_epoch(),
                            self.config.countdown_tick,
                            self.tick_tx.clone(),
                        );
                        self.send(Outbound::Event(EngineEvent::CountdownStarted { seconds }))?;
                    }
                    EngineEvent::CountdownStopped => {
                        self.countdown.stop();
                        self.send(Outbound::Event(EngineEvent::CountdownStopped))?;
                    }
                    other => self.send(Outbound::Event(other))?,
                }
                pending.extend(self.state.drain_events());
            }
        }
        if publish || forwarded {
            self.send_state()?;
        }
        Ok(())
    }

    /// Sleep for a phase pause while still serving ticks and snapshots
    async fn pause(&mut self, phase: Phase) -> Result<()> {
        let duration = self.config.pause_for(phase);
        if duration.is_zero() {
            return Ok(());
        }
        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return Ok(()),
                cmd = self.cmd_rx.recv() => match cmd {
                    None | Some(Command::Shutdown) => {
                        self.closing = true;
                        return Ok(());
                    }
                    Some(cmd) if !cmd.is_action() => self.apply(cmd)?,
                    Some(cmd) => {
                        warn!("rejecting {} while an action is in flight", cmd.name());
                        self.send(Outbound::Rejected {
                            command: cmd.name(),
                            reason: Rejection::Busy,
                        })?;
                    }
                },
                Some(epoch) = self.tick_rx.recv() => self.on_tick(epoch)?,
            }
        }
    }
}

/// Handle to a spawned actor
pub struct RuntimeHandle {
    cmd_tx: mpsc::Sender<Command>,
    out_rx: mpsc::UnboundedReceiver<Outbound>,
    task: JoinHandle<Result<()>>,
}

impl RuntimeHandle {
    /// Spawn an actor on the current tokio runtime
    pub fn spawn(config: AdapterConfig) -> Self {
        let state = GameState::new(config.mode, config.seed);
        Self::spawn_with(state, config)
    }

    pub fn spawn_with<R>(state: GameState<R>, config: AdapterConfig) -> Self
    where
        R: RandomSource + Clone + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel(config.max_pending_commands.max(1));
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        info!(
            "adapter runtime starting ({} mode, seed {})",
            config.mode.as_str(),
            config.seed
        );
        let actor = Actor::new(state, config, cmd_rx, out_tx);
        let task = tokio::spawn(actor.run());
        Self {
            cmd_tx,
            out_rx,
            task,
        }
    }

    pub async fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| AdapterError::ChannelClosed)
    }

    pub async fn recv(&mut self) -> Option<Outbound> {
        self.out_rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Outbound> {
        self.out_rx.try_recv().ok()
    }

    /// Receive until the next full state message
    pub async fn next_state(&mut self) -> Result<GameSnapshot> {
        while let Some(msg) = self.out_rx.recv().await {
            if let Outbound::State(snapshot) = msg {
                return Ok(*snapshot);
            }
        }
        Err(AdapterError::ChannelClosed)
    }

    pub fn sender(&self) -> mpsc::Sender<Command> {
        self.cmd_tx.clone()
    }

    /// Stop the actor and wait for it
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.cmd_tx.send(Command::Shutdown).await;
        drop(self.cmd_tx);
        match self.task.await {
            Ok(result) => result,
            Err(_) => Err(AdapterError::ChannelClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initial_state_is_published() {
        let mut rt = RuntimeHandle::spawn(AdapterConfig::unpaced(GameMode::Easy, 7));
        let snap = rt.next_state().await.unwrap();
        assert!(snap.phase.is_active());
        assert_eq!(snap.level, 1);
        assert_eq!(snap.width, 8);
        rt.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn hint_then_swap_commits() {
        let mut rt = RuntimeHandle::spawn(AdapterConfig::unpaced(GameMode::Easy, 7));
        rt.next_state().await.unwrap();

        rt.send(Command::Hint).await.unwrap();
        let hint = loop {
            if let Some(Outbound::Hint(h)) = rt.recv().await {
                break h;
            }
        };
        let (a, b) = hint.unwrap();
        rt.send(Command::Swap { a, b }).await.unwrap();

        let mut acked = false;
        while let Some(msg) = rt.recv().await {
            match msg {
                Outbound::Ack { command, committed } => {
                    assert_eq!(command, "swap");
                    assert!(committed);
                    acked = true;
                }
                Outbound::State(snap) => {
                    assert!(acked);
                    assert!(snap.score > 0);
                    assert!(!snap.busy);
                    break;
                }
                _ => {}
            }
        }
        rt.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn actions_are_rejected_while_pacing() {
        let config = AdapterConfig {
            pacing_ms: Some(200),
            ..AdapterConfig::unpaced(GameMode::Easy, 7)
        };
        let mut rt = RuntimeHandle::spawn(config);
        rt.next_state().await.unwrap();

        rt.send(Command::AutoMove).await.unwrap();
        // The first paced frame proves the gate is held.
        loop {
            if let Some(Outbound::Frame { snapshot, .. }) = rt.recv().await {
                assert!(snapshot.busy);
                break;
            }
        }
        rt.send(Command::Reset).await.unwrap();
        let rejection = loop {
            match rt.recv().await {
                Some(Outbound::Rejected { command, reason }) => break (command, reason),
                Some(_) => {}
                None => panic!("runtime closed"),
            }
        };
        assert_eq!(rejection, ("reset", Rejection::Busy));

        let snap = rt.next_state().await.unwrap();
        assert!(!snap.busy);
        assert_eq!(snap.session_id, 1);
        rt.shutdown().await.unwrap();
    }
}
