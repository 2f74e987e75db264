//! Cancelable once-per-second countdown task
//!
//! Every tick carries the epoch it was started with. The runtime drops ticks
//! whose epoch no longer matches the game's, so a tick already in the channel
//! when a countdown is replaced never reaches the new level.

use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Default)]
pub struct Countdown {
    handle: Option<JoinHandle<()>>,
    epoch: u32,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any running countdown with one tagged `epoch`
    pub fn start(&mut self, epoch: u32, period: Duration, ticks: mpsc::UnboundedSender<u32>) {
        self.stop();
        self.epoch = epoch;
        debug!("countdown {} started ({:?} period)", epoch, period);
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(epoch).is_err() {
                    break;
                }
            }
        }));
    }

    /// Idempotent
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("countdown {} stopped", self.epoch);
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Whether a tick belongs to the countdown that is currently running
    pub fn accepts(&self, epoch: u32) -> bool {
        self.is_running() && epoch == self.epoch
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut countdown = Countdown::new();
        countdown.start(3, Duration::from_secs(1), tx);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let mut ticks = Vec::new();
        while let Ok(epoch) = rx.try_recv() {
            ticks.push(epoch);
        }
        assert_eq!(ticks, vec![3, 3, 3]);
        assert!(countdown.accepts(3));
        assert!(!countdown.accepts(2));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_silences_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut countdown = Countdown::new();
        countdown.start(1, Duration::from_secs(1), tx);
        countdown.stop();
        countdown.stop();
        assert!(!countdown.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_the_old_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut countdown = Countdown::new();
        countdown.start(1, Duration::from_secs(1), tx.clone());
        countdown.start(2, Duration::from_secs(1), tx);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let mut ticks = Vec::new();
        while let Ok(epoch) = rx.try_recv() {
            ticks.push(epoch);
        }
        assert_eq!(ticks, vec![2, 2]);
    }
}
