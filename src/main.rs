//! Terminal match-3 runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `term`.
//! Configuration comes from the `MATCH3_*` environment variables. Logs go to
//! the file named by `MATCH3_LOG_PATH` (filtered by `RUST_LOG`); without it
//! nothing is logged, since stderr belongs to the TUI.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tui_match3::core::{EffectLog, GameConfig, GameSnapshot, GameState, TickOutcome};
use tui_match3::input::{handle_key_event, should_quit, Cursor};
use tui_match3::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_match3::types::{BoardAction, TICK_MS};

const LOG_PATH_ENV: &str = "MATCH3_LOG_PATH";

fn main() -> Result<()> {
    init_tracing()?;
    let config = GameConfig::from_env().context("loading configuration")?;
    info!(?config, "starting");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_tracing() -> Result<()> {
    let Ok(path) = std::env::var(LOG_PATH_ENV) else {
        return Ok(());
    };
    let file = std::fs::File::create(&path).with_context(|| format!("creating log file {path}"))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, config: GameConfig) -> Result<()> {
    let mut game = GameState::with_sink(config, EffectLog::new())?;
    let mut cursor = Cursor::new(game.grid().width(), game.grid().height());

    let view = GameView::default();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.snapshot_into(&mut snap);
        view.render_into(&snap, Some(cursor.pos()), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        info!(points = game.points(), "quit");
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        apply_action(&mut game, &mut cursor, action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            match game.on_tick(TICK_MS) {
                TickOutcome::GoalBeaten { new_goal } => debug!(new_goal, "next goal"),
                TickOutcome::GameOver { points, goal } => debug!(points, goal, "round over"),
                TickOutcome::Idle | TickOutcome::Running => {}
            }

            // Effects are drawn from the snapshot; the log only feeds tracing.
            let effects = game.sink_mut().take();
            if !effects.is_empty() {
                debug!(count = effects.len(), "board effects");
            }
        }
    }
}

fn apply_action(game: &mut GameState<EffectLog>, cursor: &mut Cursor, action: BoardAction) {
    match action {
        BoardAction::CursorLeft
        | BoardAction::CursorRight
        | BoardAction::CursorUp
        | BoardAction::CursorDown => {
            cursor.apply(action);
        }
        BoardAction::Select => match game.click(cursor.pos()) {
            Ok(outcome) => debug!(?outcome, "click"),
            Err(err) if err.is_recoverable() => debug!(reason = err.as_str(), "click ignored"),
            Err(err) => warn!(%err, "click failed"),
        },
        BoardAction::Cancel => {
            game.cancel_selection();
        }
        BoardAction::StartRound | BoardAction::StartRush => {
            game.start_round(action == BoardAction::StartRush);
            cursor.resize(game.grid().width(), game.grid().height());
        }
    }
}
