//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (entry form ripples, pending reply, pending refocus):
//!   draws every ~80ms.
//! - **Idle** (thread view, nothing pending): sleeps up to 500ms and only
//!   redraws on events or terminal resize.
//!
//! ## Requests
//!
//! `Effect::SpawnRequest` runs `FlowClient::send` on a tokio task. The task
//! reports back through a `std::sync::mpsc` channel that the loop drains
//! every iteration, so the reducer only ever runs on the UI thread.

mod component;
mod components;
mod event;
pub mod markdown;
pub mod plain;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use tokio::task::JoinHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::i18n::{Language, Phrase};
use crate::core::state::App;
use crate::flow::{FlowClient, LangflowClient};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Delay before the entry form gets its cursor back after closing the thread.
pub const REFOCUS_DELAY: Duration = Duration::from_millis(500);

const ANIMATION_FRAME: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// When the input box should take focus again after a close.
    pub refocus_at: Option<Instant>,
    /// The in-flight flow request, if any.
    pub pending: Option<JoinHandle<()>>,
}

impl TuiState {
    pub fn new(language: Language) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(
                Phrase::Placeholder.text(language),
                Phrase::Send.text(language),
            ),
            refocus_at: None,
            pending: None,
        }
    }

    /// Gives focus back once the refocus deadline has passed.
    fn tick_refocus(&mut self, now: Instant) {
        if self.refocus_at.is_some_and(|at| now >= at) {
            self.refocus_at = None;
            self.input_box.focused = true;
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Blink timer resets on every draw
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let client: Arc<dyn FlowClient> = Arc::new(LangflowClient::from_config(&config));
    info!("Using flow client '{}' ({:?})", client.name(), config);
    let mut app = App::new(client, config.language);
    let mut tui = TuiState::new(app.language);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        tui.tick_refocus(Instant::now());

        let animating = !app.is_open() || app.is_loading || tui.refocus_at.is_some();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed();
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, elapsed))?;
            needs_redraw = false;
        }

        let timeout = if animating { ANIMATION_FRAME } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut app, &mut tui, event, &tx) {
                should_quit = true;
                break;
            }
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, &mut tui, action, &tx) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    if let Some(pending) = tui.pending.take() {
        pending.abort();
    }

    ratatui::restore();
    Ok(())
}

/// Routes one terminal event. Returns true when the app should quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match event {
        TuiEvent::Resize => false,
        TuiEvent::ForceQuit => dispatch(app, tui, Action::Quit, tx),
        TuiEvent::Escape => dispatch(app, tui, Action::CloseChat, tx),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            if app.is_open() {
                tui.message_list.handle_event(&event);
            }
            false
        }
        _ => match tui.input_box.handle_event(&event) {
            Some(InputEvent::Submit(text)) => dispatch(app, tui, Action::Submit(text), tx),
            Some(InputEvent::ContentChanged) | None => false,
        },
    }
}

/// Applies an action and carries out its effect. Returns true on quit.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::SpawnRequest {
            message,
            session_id,
        } => {
            tui.input_box.disabled = true;
            tui.message_list.pin_to_bottom();
            tui.pending = Some(spawn_request(
                app.client.clone(),
                message,
                session_id,
                tx.clone(),
            ));
            false
        }
        Effect::ScheduleRefocus => {
            tui.input_box.focused = false;
            tui.refocus_at = Some(Instant::now() + REFOCUS_DELAY);
            false
        }
        Effect::Quit => true,
    }
}

fn spawn_request(
    client: Arc<dyn FlowClient>,
    message: String,
    session_id: Option<String>,
    tx: mpsc::Sender<Action>,
) -> JoinHandle<()> {
    info!(
        "Spawning flow request via '{}' (session: {})",
        client.name(),
        session_id.as_deref().unwrap_or("new")
    );
    tokio::spawn(async move {
        let action = match client.send(&message, session_id.as_deref()).await {
            Ok(reply) => Action::ReplyReceived(reply),
            Err(e) => Action::RequestFailed(e),
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver flow result: receiver dropped");
        }
    })
}
