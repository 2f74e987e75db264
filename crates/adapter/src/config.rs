//! Runtime configuration read from the environment

use std::time::Duration;

use crate::error::{AdapterError, Result};
use crate::types::{GameMode, Phase, COUNTDOWN_TICK_MS};

pub const DEFAULT_SEED: u32 = 12345;
pub const DEFAULT_MAX_PENDING: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub mode: GameMode,
    pub seed: u32,
    /// Fixed pause between pipeline phases. `None` uses each phase's own pause.
    pub pacing_ms: Option<u64>,
    pub countdown_tick: Duration,
    pub max_pending_commands: usize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Easy,
            seed: DEFAULT_SEED,
            pacing_ms: None,
            countdown_tick: Duration::from_millis(COUNTDOWN_TICK_MS),
            max_pending_commands: DEFAULT_MAX_PENDING,
        }
    }
}

impl AdapterConfig {
    /// Read `MATCH3_MODE`, `MATCH3_SEED`, `MATCH3_PACING_MS`,
    /// `MATCH3_COUNTDOWN_MS` and `MATCH3_MAX_PENDING`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AdapterConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        };

        if let Some((key, value)) = get("MATCH3_MODE") {
            config.mode = GameMode::from_str(&value.to_ascii_lowercase())
                .ok_or(AdapterError::InvalidConfig { key, value })?;
        }
        if let Some((key, value)) = get("MATCH3_SEED") {
            config.seed = parse(key, value)?;
        }
        if let Some((key, value)) = get("MATCH3_PACING_MS") {
            config.pacing_ms = Some(parse(key, value)?);
        }
        if let Some((key, value)) = get("MATCH3_COUNTDOWN_MS") {
            let ms: u64 = parse(key, value.clone())?;
            if ms == 0 {
                return Err(AdapterError::InvalidConfig { key, value });
            }
            config.countdown_tick = Duration::from_millis(ms);
        }
        if let Some((key, value)) = get("MATCH3_MAX_PENDING") {
            config.max_pending_commands = parse::<usize>(key, value)?.max(1);
        }
        Ok(config)
    }

    /// Headless/test setup: no pacing at all
    pub fn unpaced(mode: GameMode, seed: u32) -> Self {
        Self {
            mode,
            seed,
            pacing_ms: Some(0),
            ..Self::default()
        }
    }

    pub fn pause_for(&self, phase: Phase) -> Duration {
        Duration::from_millis(self.pacing_ms.unwrap_or_else(|| phase.pause_ms()))
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T> {
    value
        .parse()
        .map_err(|_| AdapterError::InvalidConfig { key, value })
}
