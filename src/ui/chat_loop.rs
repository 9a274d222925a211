//! Event polling, dispatching and redraw loop for the interactive chat.
//!
//! The loop owns the [`ChatSession`] outright. Slow work (the network call
//! and reading attachments) runs on spawned tasks that report back through
//! an mpsc channel, so the screen keeps repainting while they are pending.

use std::{error::Error, io, path::PathBuf, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::GenerateContentResponse;
use crate::core::attachment::{read_selected_file, SelectedFile};
use crate::core::credentials::ApiSettings;
use crate::core::gemini::{GeminiClient, GenerateError};
use crate::core::session::{ChatSession, PendingRequest};
use crate::ui::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::ui::renderer::ui;
use crate::ui::state::UiState;
use crate::ui::theme::ThemeMode;

const SCROLL_STEP: u16 = 5;

pub struct ChatOptions {
    pub settings: ApiSettings,
    pub theme: ThemeMode,
    pub initial_file: Option<PathBuf>,
}

/// Results delivered back to the loop by background tasks.
#[derive(Debug)]
pub enum LoopEvent {
    Generated {
        request_id: u64,
        outcome: Result<GenerateContentResponse, GenerateError>,
    },
    FileLoaded {
        path: PathBuf,
        result: io::Result<SelectedFile>,
    },
}

/// What the loop must do after a key press.
#[derive(Debug)]
pub enum KeyAction {
    None,
    Quit,
    Send(PendingRequest),
    LoadFile(PathBuf),
}

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let client = GeminiClient::new(reqwest::Client::new(), &options.settings);
    let mut session = ChatSession::new();
    let mut state = UiState::new(options.theme);
    let (tx, mut rx) = mpsc::unbounded_channel();

    if let Some(path) = options.initial_file {
        spawn_file_load(tx.clone(), path);
    }

    let mut terminal = setup_terminal()?;
    let result = event_loop(
        &mut terminal,
        &mut session,
        &mut state,
        &client,
        &tx,
        &mut rx,
    )
    .await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    session: &mut ChatSession,
    state: &mut UiState,
    client: &GeminiClient,
    tx: &mpsc::UnboundedSender<LoopEvent>,
    rx: &mut mpsc::UnboundedReceiver<LoopEvent>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(f, session, state, client.model()))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match handle_key(key, session, state) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Send(request) => {
                            spawn_generate(client.clone(), tx.clone(), request)
                        }
                        KeyAction::LoadFile(path) => spawn_file_load(tx.clone(), path),
                        KeyAction::None => {}
                    }
                }
                Event::Paste(text) => {
                    state.textarea_mut().insert_str(text);
                    session.set_input(state.input_text());
                }
                _ => {}
            }
        }

        while let Ok(loop_event) = rx.try_recv() {
            apply_loop_event(loop_event, session, state);
        }
    }
}

fn spawn_generate(
    client: GeminiClient,
    tx: mpsc::UnboundedSender<LoopEvent>,
    request: PendingRequest,
) {
    tokio::spawn(async move {
        let PendingRequest {
            request_id,
            contents,
        } = request;
        let outcome = client.generate(contents).await;
        let _ = tx.send(LoopEvent::Generated {
            request_id,
            outcome,
        });
    });
}

fn spawn_file_load(tx: mpsc::UnboundedSender<LoopEvent>, path: PathBuf) {
    tokio::spawn(async move {
        let result = read_selected_file(&path).await;
        let _ = tx.send(LoopEvent::FileLoaded { path, result });
    });
}

pub fn handle_key(key: KeyEvent, session: &mut ChatSession, state: &mut UiState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('t') if ctrl => {
            state.toggle_theme();
            KeyAction::None
        }
        KeyCode::Esc => {
            state.status = None;
            KeyAction::None
        }
        KeyCode::PageUp => {
            state.scroll_up(SCROLL_STEP);
            KeyAction::None
        }
        KeyCode::PageDown => {
            state.scroll_down(SCROLL_STEP);
            KeyAction::None
        }
        KeyCode::Enter if alt => {
            state.textarea_mut().insert_newline();
            session.set_input(state.input_text());
            KeyAction::None
        }
        KeyCode::Enter => submit_input(session, state),
        _ => {
            state.textarea_mut().input(key);
            session.set_input(state.input_text());
            KeyAction::None
        }
    }
}

fn submit_input(session: &mut ChatSession, state: &mut UiState) -> KeyAction {
    let text = state.input_text();
    let trimmed = text.trim();

    if trimmed == "/attach" || trimmed.starts_with("/attach ") {
        let path = trimmed.trim_start_matches("/attach").trim();
        if path.is_empty() {
            state.set_status("Usage: /attach <path>");
            return KeyAction::None;
        }
        let path = PathBuf::from(path);
        state.clear_input();
        session.set_input("");
        return KeyAction::LoadFile(path);
    }

    if trimmed == "/detach" {
        session.clear_attachment();
        state.clear_input();
        session.set_input("");
        state.status = None;
        return KeyAction::None;
    }

    if session.is_busy() {
        return KeyAction::None;
    }

    match session.begin_send(&text) {
        Some(request) => {
            state.clear_input();
            state.status = None;
            state.scroll_to_bottom();
            KeyAction::Send(request)
        }
        None => KeyAction::None,
    }
}

pub fn apply_loop_event(loop_event: LoopEvent, session: &mut ChatSession, state: &mut UiState) {
    match loop_event {
        LoopEvent::Generated {
            request_id,
            outcome,
        } => {
            if session.finish_send(request_id, outcome) {
                // A draft typed while busy survives the cleanup.
                session.set_input(state.input_text());
                state.scroll_to_bottom();
            }
        }
        LoopEvent::FileLoaded { path, result } => match result {
            Ok(file) => {
                debug!(path = %path.display(), "attachment loaded");
                session.attach_file(Some(file));
                state.status = None;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read attachment");
                state.set_status(format!("Could not read {}: {err}", path.display()));
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compose::FAILURE_FALLBACK;
    use crate::core::message::Role;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(text: &str, session: &mut ChatSession, state: &mut UiState) {
        for ch in text.chars() {
            handle_key(press(KeyCode::Char(ch)), session, state);
        }
    }

    fn answer(text: &str) -> GenerateContentResponse {
        serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        }))
        .unwrap()
    }

    #[test]
    fn typing_mirrors_into_pending_input() {
        let mut session = ChatSession::new();
        let mut state = UiState::new(ThemeMode::Dark);
        type_text("hey", &mut session, &mut state);
        assert_eq!(session.pending_input(), "hey");
        assert_eq!(state.input_text(), "hey");
    }

    #[test]
    fn enter_sends_and_clears_the_box() {
        let mut session = ChatSession::new();
        let mut state = UiState::new(ThemeMode::Dark);
        type_text("hello", &mut session, &mut state);

        let action = handle_key(press(KeyCode::Enter), &mut session, &mut state);
        match action {
            KeyAction::Send(request) => {
                assert_eq!(request.contents.len(), 1);
                assert_eq!(request.contents[0].parts[0].text, "hello");
            }
            other => panic!("expected send, got {other:?}"),
        }
        assert!(session.is_busy());
        assert_eq!(state.input_text(), "");
    }

    #[test]
    fn enter_on_empty_box_does_nothing() {
        let mut session = ChatSession::new();
        let mut state = UiState::new(ThemeMode::Dark);
        let action = handle_key(press(KeyCode::Enter), &mut session, &mut state);
        assert!(matches!(action, KeyAction::None));
        assert!(session.messages().is_empty());
    }

    #[test]
    fn enter_while_busy_keeps_the_draft() {
        let mut session = ChatSession::new();
        let mut state = UiState::new(ThemeMode::Dark);
        type_text("first", &mut session, &mut state);
        handle_key(press(KeyCode::Enter), &mut session, &mut state);

        type_text("second", &mut session, &mut state);
        let action = handle_key(press(KeyCode::Enter), &mut session, &mut state);
        assert!(matches!(action, KeyAction::None));
        assert_eq!(state.input_text(), "second");
        assert_eq!(session.messages().len(), 1);

        let request_id = session.messages()[0].id;
        apply_loop_event(
            LoopEvent::Generated {
                request_id,
                outcome: Ok(answer("ok")),
            },
            &mut session,
            &mut state,
        );
        assert!(!session.is_busy());
        assert_eq!(state.input_text(), "second");
        assert_eq!(session.pending_input(), state.input_text());
    }

    #[test]
    fn attach_command_requests_file_load() {
        let mut session = ChatSession::new();
        let mut state = UiState::new(ThemeMode::Dark);
        type_text("/attach notes.txt", &mut session, &mut state);

        match handle_key(press(KeyCode::Enter), &mut session, &mut state) {
            KeyAction::LoadFile(path) => assert_eq!(path, PathBuf::from("notes.txt")),
            other => panic!("expected file load, got {other:?}"),
        }
        assert!(session.messages().is_empty());
    }

    #[test]
    fn attach_without_path_shows_usage() {
        let mut session = ChatSession::new();
        let mut state = UiState::new(ThemeMode::Dark);
        type_text("/attach", &mut session, &mut state);
        let action = handle_key(press(KeyCode::Enter), &mut session, &mut state);
        assert!(matches!(action, KeyAction::None));
        assert_eq!(state.status.as_deref(), Some("Usage: /attach <path>"));
    }

    #[test]
    fn ctrl_shortcuts_quit_and_toggle_theme() {
        let mut session = ChatSession::new();
        let mut state = UiState::new(ThemeMode::Dark);

        let toggle = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
        handle_key(toggle, &mut session, &mut state);
        assert_eq!(state.theme.mode, ThemeMode::Light);

        let quit = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(
            handle_key(quit, &mut session, &mut state),
            KeyAction::Quit
        ));
    }

    #[test]
    fn loaded_file_is_attached_and_failures_set_status() {
        let mut session = ChatSession::new();
        let mut state = UiState::new(ThemeMode::Dark);

        apply_loop_event(
            LoopEvent::FileLoaded {
                path: PathBuf::from("missing.txt"),
                result: Err(io::Error::new(io::ErrorKind::NotFound, "not found")),
            },
            &mut session,
            &mut state,
        );
        assert!(session.pending_file().is_none());
        assert!(state.status.as_deref().unwrap().contains("missing.txt"));

        apply_loop_event(
            LoopEvent::FileLoaded {
                path: PathBuf::from("notes.txt"),
                result: Ok(SelectedFile {
                    name: "notes.txt".into(),
                    bytes: b" A B C ".to_vec(),
                }),
            },
            &mut session,
            &mut state,
        );
        assert_eq!(session.pending_file().unwrap().content, "A B C");
        assert!(state.status.is_none());
    }

    #[test]
    fn generated_outcome_completes_the_exchange() {
        let mut session = ChatSession::new();
        let mut state = UiState::new(ThemeMode::Dark);
        type_text("hi", &mut session, &mut state);
        let KeyAction::Send(request) = handle_key(press(KeyCode::Enter), &mut session, &mut state)
        else {
            panic!("expected send");
        };

        state.scroll_up(3);
        apply_loop_event(
            LoopEvent::Generated {
                request_id: request.request_id,
                outcome: Ok(answer("**hello**")),
            },
            &mut session,
            &mut state,
        );

        assert!(!session.is_busy());
        assert_eq!(session.messages()[1].role, Role::Model);
        assert_eq!(session.messages()[1].content, "hello");
        assert_eq!(state.scroll_from_bottom, 0);
    }

    #[test]
    fn failed_outcome_appends_filler() {
        let mut session = ChatSession::new();
        let mut state = UiState::new(ThemeMode::Dark);
        let request = session.begin_send("hi").unwrap();

        let err: GenerateError = serde_json::from_str::<GenerateContentResponse>("nope")
            .map_err(GenerateError::Decode)
            .unwrap_err();
        apply_loop_event(
            LoopEvent::Generated {
                request_id: request.request_id,
                outcome: Err(err),
            },
            &mut session,
            &mut state,
        );

        assert_eq!(session.messages()[1].content, FAILURE_FALLBACK);
        assert!(!session.is_busy());
    }
}
