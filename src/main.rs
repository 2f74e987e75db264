//! Terminal match-3 runner (default binary).
//!
//! Drives `GameState` directly from a synchronous crossterm loop. Captured
//! phase frames are drawn with their pause so cascades are visible, and a
//! one-second tick feeds the countdown of timed levels.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info, warn};

use tui_match3::core::{EngineEvent, GameSnapshot, GameState};
use tui_match3::engine::{apply_best_move, best_swap};
use tui_match3::input::{handle_key_event, should_quit, Cursor, Selection, UiCommand};
use tui_match3::term::{FrameBuffer, GameView, Overlay, TerminalRenderer, Viewport};
use tui_match3::types::{GameMode, COUNTDOWN_TICK_MS};

const MESSAGE_MS: u64 = 1500;

fn main() -> Result<()> {
    env_logger::init();

    let mode = std::env::var("MATCH3_MODE")
        .ok()
        .and_then(|m| GameMode::from_str(&m))
        .unwrap_or_default();
    let seed = std::env::var("MATCH3_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(seed_from_clock);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, mode, seed);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn seed_from_clock() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

struct App {
    game: GameState,
    cursor: Cursor,
    view: GameView,
    fb: FrameBuffer,
    hint: Option<(usize, usize)>,
    message: Option<(&'static str, Instant)>,
}

impl App {
    fn new(mode: GameMode, seed: u32) -> Self {
        let mut game = GameState::new(mode, seed);
        game.set_frame_capture(true);
        game.start();
        let config = mode.config();
        info!("starting {} mode with seed {}", mode.as_str(), seed);
        Self {
            game,
            cursor: Cursor::new(config.width, config.height),
            view: GameView::default(),
            fb: FrameBuffer::new(0, 0),
            hint: None,
            message: None,
        }
    }

    fn draw(&mut self, term: &mut TerminalRenderer, snap: &GameSnapshot) -> Result<()> {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let message = self
            .message
            .filter(|(_, at)| at.elapsed() < Duration::from_millis(MESSAGE_MS))
            .map(|(m, _)| m);
        let overlay = Overlay {
            cursor: Some(self.cursor.index()),
            selected: self.cursor.selected(),
            hint: self.hint,
            message,
        };
        self.view.render_into(snap, &overlay, Viewport::new(w, h), &mut self.fb);
        term.draw_swap(&mut self.fb)
    }

    /// Replay the events of the last action, pausing at phase frames
    fn play_events(&mut self, term: &mut TerminalRenderer) -> Result<()> {
        for event in self.game.drain_events() {
            match event {
                EngineEvent::Frame { phase, snapshot } => {
                    self.draw(term, &snapshot)?;
                    std::thread::sleep(Duration::from_millis(phase.pause_ms()));
                }
                EngineEvent::Message(text) => self.message = Some((text, Instant::now())),
                _ => {}
            }
        }
        Ok(())
    }

    fn handle(&mut self, cmd: UiCommand) {
        self.hint = None;
        match cmd {
            UiCommand::CursorUp => self.cursor.step(-1, 0),
            UiCommand::CursorDown => self.cursor.step(1, 0),
            UiCommand::CursorLeft => self.cursor.step(0, -1),
            UiCommand::CursorRight => self.cursor.step(0, 1),
            UiCommand::Select => {
                if self.game.selected_power().is_some() {
                    self.game.use_selected_power(self.cursor.index());
                    self.cursor.clear();
                } else if let Selection::Swap(a, b) = self.cursor.press() {
                    self.game.submit_swap(a, b);
                }
            }
            UiCommand::Cancel => {
                self.cursor.clear();
                if let Some(kind) = self.game.selected_power() {
                    self.game.select_power(kind);
                }
            }
            UiCommand::Power(kind) => {
                self.game.select_power(kind);
            }
            UiCommand::Hint => self.hint = best_swap(&self.game).ok().map(|p| (p.a, p.b)),
            UiCommand::AutoMove => match apply_best_move(&mut self.game) {
                Ok(plan) => debug!("auto move {}<->{}", plan.a, plan.b),
                Err(e) => {
                    warn!("auto move refused: {}", e.code());
                    self.message = Some((e.message(), Instant::now()));
                }
            },
            UiCommand::NextLevel => {
                self.game.level_up();
            }
            UiCommand::Reset => {
                self.game.reset_session();
                self.cursor.clear();
            }
            UiCommand::ToggleMode => {
                let mode = self.game.mode().toggled();
                self.game.configure_mode(mode);
                let config = mode.config();
                self.cursor.resize(config.width, config.height);
            }
        }
    }
}

fn run(term: &mut TerminalRenderer, mode: GameMode, seed: u32) -> Result<()> {
    let mut app = App::new(mode, seed);
    app.game.drain_events();

    let tick = Duration::from_millis(COUNTDOWN_TICK_MS);
    let mut last_tick = Instant::now();

    loop {
        let snap = app.game.snapshot();
        app.draw(term, &snap)?;

        let timeout = tick.checked_sub(last_tick.elapsed()).unwrap_or_default();
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(cmd) = handle_key_event(key) {
                        app.handle(cmd);
                        app.play_events(term)?;
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            if app.game.countdown_running() {
                app.game.tick_second();
                app.play_events(term)?;
            }
        }
    }
}
