//! Runtime: event loop and terminal lifecycle for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (raw mode, alternate screen, mouse capture).
//! - Drive a single `tokio::select!` loop over terminal input, a ticker,
//!   finished background commands and Ctrl+C.
//! - Execute the `Effect`s returned by `App::update` through `cmd`.
//!
//! Input comes from a dedicated OS thread that blocks on
//! `crossterm::event::read()` and forwards events over a channel, so the
//! async loop never blocks on the terminal.
//!
//! Ticking is fast (40 ms) only while a pulse or an upload is in progress
//! and slow (1 s) otherwise.
use std::io::Stdout;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use swatchbox_types::{Effect, ExecOutcome, Msg};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{error, info, warn};

use crate::TuiOptions;
use crate::app::App;
use crate::clipboard::SystemClipboard;
use crate::cmd::{self, Executor};
use crate::ui::{input, render, theme};

type Backend = CrosstermBackend<Stdout>;

const FAST_TICK: Duration = Duration::from_millis(40);
const IDLE_TICK: Duration = Duration::from_millis(1000);
const MOUSE_MOVE_THROTTLE: Duration = Duration::from_millis(16);

/// Spawn the input thread. It exits when the receiver is dropped.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);

    thread::spawn(move || {
        let mut last_mouse_move = Instant::now();
        loop {
            match event::read() {
                Ok(event) => {
                    // Throttle mouse moves to one per 16 ms.
                    let is_mouse_move = event
                        .as_mouse_event()
                        .is_some_and(|mouse| mouse.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_move.elapsed() < MOUSE_MOVE_THROTTLE {
                            continue;
                        }
                        last_mouse_move = Instant::now();
                    }
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!("Failed to read terminal event: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop, and restores the terminal even when the loop fails.
pub async fn run_app(options: TuiOptions) -> Result<()> {
    let TuiOptions {
        service,
        download_dir,
        default_top_n,
        initial_file,
        server_label,
    } = options;

    let mut app = App::new(default_top_n, server_label);
    let mut executor = Executor::new(service, Box::new(SystemClipboard), download_dir);
    let theme = theme::load_from_env();

    let mut terminal = setup_terminal()?;
    let input_receiver = spawn_input_thread();

    let mut initial_effects = Vec::new();
    if let Some(path) = initial_file {
        app.path_input = path.display().to_string();
        initial_effects = app.update(Msg::FileSelected(Some(path)));
    }

    let outcome = event_loop(
        &mut terminal,
        &mut app,
        &mut executor,
        theme.as_ref(),
        input_receiver,
        initial_effects,
    )
    .await;

    cleanup_terminal(&mut terminal)?;
    info!("terminal session ended");
    outcome
}

async fn event_loop(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    executor: &mut Executor,
    theme: &dyn theme::Theme,
    mut input_receiver: mpsc::Receiver<Event>,
    initial_effects: Vec<Effect>,
) -> Result<()> {
    let mut pending: FuturesUnordered<JoinHandle<ExecOutcome>> = FuturesUnordered::new();
    process_effects(app, executor, initial_effects, &mut pending);

    let mut current_interval = IDLE_TICK;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    terminal.draw(|frame| render::draw(frame, app, theme))?;

    loop {
        let animating = app.is_animating();
        let target_interval = if animating { FAST_TICK } else { IDLE_TICK };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input thread ended; shut down cleanly.
                    break;
                };
                if let Event::Key(key) = &event
                    && input::is_quit_key(key)
                {
                    break;
                }
                let effects = match event {
                    Event::Key(key) => input::handle_key(app, key),
                    Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                    Event::Resize(width, height) => app.update(Msg::Resize(width, height)),
                    _ => Vec::new(),
                };
                process_effects(app, executor, effects, &mut pending);
                needs_render = true;
            }

            _ = ticker.tick() => {
                app.update(Msg::Tick);
                needs_render = animating;
            }

            Some(joined) = pending.next(), if !pending.is_empty() => {
                match joined {
                    Ok(outcome) => {
                        let effects = app.update(Msg::ExecCompleted(Box::new(outcome)));
                        process_effects(app, executor, effects, &mut pending);
                    }
                    Err(join_error) => {
                        error!("Background command failed: {}", join_error);
                        app.status.push(format!("Background command failed: {}", join_error));
                    }
                }
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if needs_render {
            terminal.draw(|frame| render::draw(frame, app, theme))?;
        }
    }

    Ok(())
}

/// Run effects, feed immediate outcomes straight back into the app and
/// queue background tasks.
fn process_effects(
    app: &mut App,
    executor: &mut Executor,
    effects: Vec<Effect>,
    pending: &mut FuturesUnordered<JoinHandle<ExecOutcome>>,
) {
    let mut queue = effects;
    while !queue.is_empty() {
        let batch = cmd::run_cmds(executor, cmd::from_effects(std::mem::take(&mut queue)));
        pending.extend(batch.pending);
        for outcome in batch.immediate {
            queue.extend(app.update(Msg::ExecCompleted(Box::new(outcome))));
        }
    }
}
