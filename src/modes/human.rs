use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, Write, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::game::{GameConfig, GameSession, TickEvent};
use crate::input::{InputHandler, KeyAction};
use crate::render::{Renderer, Screen};
use crate::storage::RecordStore;

/// Options for the interactive terminal game
#[derive(Debug, Clone, Default)]
pub struct HumanOptions {
    /// Ring the terminal bell when food is eaten
    pub bell: bool,
}

pub struct HumanMode<S: RecordStore> {
    session: GameSession<S>,
    screen: Screen,
    renderer: Renderer,
    input_handler: InputHandler,
    options: HumanOptions,
    should_quit: bool,
    ring_bell: bool,
}

impl<S: RecordStore> HumanMode<S> {
    pub fn new(config: GameConfig, store: S, options: HumanOptions) -> Self {
        Self {
            session: GameSession::new(config, store),
            screen: Screen::Menu,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            options,
            should_quit: false,
            ring_bell: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks follow the session speed
        let mut tick_period = self.session.tick_interval();
        let mut tick_timer = pacing_timer(tick_period);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    self.on_tick();
                }

                _ = render_timer.tick() => {
                    if std::mem::take(&mut self.ring_bell) {
                        ring_bell(terminal.backend_mut());
                    }
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.screen, &self.session);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            let period = self.session.tick_interval();
            if period != tick_period {
                debug!("tick period now {:?}", period);
                tick_period = period;
                tick_timer = pacing_timer(period);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.apply(action);
        }
    }

    /// Screen transitions driven by the player
    fn apply(&mut self, action: KeyAction) {
        match (self.screen, action) {
            (_, KeyAction::Quit) => {
                info!("quit requested");
                self.should_quit = true;
            }
            (Screen::Menu, KeyAction::Confirm) => {
                self.screen = Screen::Playing;
            }
            (Screen::Playing, KeyAction::Steer(direction)) => {
                self.session.steer(direction);
            }
            (Screen::Playing, KeyAction::TogglePause) => {
                self.screen = Screen::Paused;
            }
            (Screen::Paused, KeyAction::TogglePause) => {
                self.screen = Screen::Playing;
            }
            (Screen::GameOver { .. }, KeyAction::Confirm) => {
                self.session.restart();
                self.screen = Screen::Playing;
            }
            _ => {}
        }
    }

    /// Advance the game when it is actually being played
    fn on_tick(&mut self) {
        if self.screen != Screen::Playing {
            return;
        }

        match self.session.tick() {
            TickEvent::AteFood { .. } => {
                self.ring_bell = self.options.bell;
            }
            TickEvent::GameOver { new_record, .. } => {
                self.screen = Screen::GameOver { new_record };
            }
            TickEvent::Moved | TickEvent::Idle => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Game tick timer whose first tick is one full period away
fn pacing_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Sound cue for eating. Terminals without a bell just ignore it.
fn ring_bell(out: &mut impl Write) {
    if let Err(err) = out.write_all(b"\x07").and_then(|_| out.flush()) {
        debug!("bell unavailable: {}", err);
    }
}
