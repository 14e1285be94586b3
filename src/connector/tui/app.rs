use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

use crate::application::ChatClient;
use crate::connector::tui::view;
use crate::presentation::{AppController, AppEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    City,
    Range,
    Search,
    Email,
    Subscribe,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::City,
        Focus::Range,
        Focus::Search,
        Focus::Email,
        Focus::Subscribe,
    ];

    fn cycle(self, forward: bool) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let len = Self::ORDER.len();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        Self::ORDER[next]
    }
}

/// Terminal-only state: which field has focus and which suggestion is highlighted.
#[derive(Debug, Default)]
pub struct UiState {
    pub focus: Focus,
    pub highlighted: Option<usize>,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the interactive UI until the user quits.
pub async fn run(chat_client: Arc<dyn ChatClient>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = AppController::new(chat_client, tx);
    let mut ui = UiState::default();

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut controller, &mut ui, &mut rx).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    controller: &mut AppController,
    ui: &mut UiState,
    rx: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut input = EventStream::new();

    loop {
        terminal.draw(|frame| view::draw(frame, controller, ui))?;

        tokio::select! {
            Some(event) = rx.recv() => {
                if controller.handle_event(event) {
                    clamp_highlight(controller, ui);
                }
            }
            next = input.next() => match next {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_key(key, controller, ui) == Flow::Quit {
                        info!("Leaving interactive mode");
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }
}

fn handle_key(key: KeyEvent, controller: &mut AppController, ui: &mut UiState) -> Flow {
    if key.code == KeyCode::Esc
        || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
    {
        return Flow::Quit;
    }

    match key.code {
        KeyCode::Tab => {
            ui.focus = ui.focus.cycle(true);
            return Flow::Continue;
        }
        KeyCode::BackTab => {
            ui.focus = ui.focus.cycle(false);
            return Flow::Continue;
        }
        _ => {}
    }

    match ui.focus {
        Focus::City => handle_city_key(key.code, controller, ui),
        Focus::Range => match key.code {
            KeyCode::Up => controller.step_range(true),
            KeyCode::Down => controller.step_range(false),
            KeyCode::Enter => {
                controller.request_search();
            }
            code => {
                let mut text = controller.range_input().to_string();
                if edit_text(&mut text, code, |c| c.is_ascii_digit()) {
                    controller.edit_range(text);
                }
            }
        },
        Focus::Search => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                controller.request_search();
            }
        }
        Focus::Email => {
            if key.code == KeyCode::Enter {
                controller.subscribe().ok();
            } else {
                let mut text = controller.email().to_string();
                if edit_text(&mut text, key.code, |c| !c.is_whitespace()) {
                    controller.edit_email(text);
                }
            }
        }
        Focus::Subscribe => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                controller.subscribe().ok();
            }
        }
    }

    Flow::Continue
}

fn handle_city_key(code: KeyCode, controller: &mut AppController, ui: &mut UiState) {
    let count = controller.suggestion_state().suggestions().len();

    match code {
        KeyCode::Down if count > 0 => {
            ui.highlighted = Some(ui.highlighted.map_or(0, |i| (i + 1).min(count - 1)));
        }
        KeyCode::Up if count > 0 => {
            ui.highlighted = ui.highlighted.and_then(|i| i.checked_sub(1));
        }
        KeyCode::Enter => {
            let selected = ui
                .highlighted
                .is_some_and(|index| controller.select_suggestion_at(index));
            ui.highlighted = None;
            if !selected {
                controller.request_search();
            }
        }
        code => {
            let mut text = controller.city().to_string();
            if edit_text(&mut text, code, |c| !c.is_control()) {
                controller.edit_city(text);
                ui.highlighted = None;
            }
        }
    }
}

/// Apply a character or backspace to `text`. Returns whether it changed.
fn edit_text(text: &mut String, code: KeyCode, accept: impl Fn(char) -> bool) -> bool {
    match code {
        KeyCode::Char(c) if accept(c) => {
            text.push(c);
            true
        }
        KeyCode::Backspace => text.pop().is_some(),
        _ => false,
    }
}

fn clamp_highlight(controller: &AppController, ui: &mut UiState) {
    let count = controller.suggestion_state().suggestions().len();
    ui.highlighted = ui.highlighted.filter(|i| *i < count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SuggestionEvent;
    use crate::connector::adapter::ScriptedChatClient;
    use crate::domain::SuggestionList;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn controller() -> (AppController, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (AppController::new(Arc::new(ScriptedChatClient::new()), tx), rx)
    }

    #[test]
    fn test_focus_cycles_both_ways() {
        assert_eq!(Focus::City.cycle(true), Focus::Range);
        assert_eq!(Focus::City.cycle(false), Focus::Subscribe);
        assert_eq!(Focus::Subscribe.cycle(true), Focus::City);
    }

    #[tokio::test]
    async fn test_typing_and_selecting_a_suggestion() {
        let (mut controller, _rx) = controller();
        let mut ui = UiState::default();

        for c in "Za".chars() {
            handle_key(key(KeyCode::Char(c)), &mut controller, &mut ui);
        }
        assert_eq!(controller.city(), "Za");

        let query_id = match controller.suggestion_state() {
            crate::presentation::SuggestionState::Debouncing { query_id } => *query_id,
            other => panic!("unexpected state: {other:?}"),
        };
        controller.handle_event(AppEvent::Suggestion(SuggestionEvent::Resolved {
            query_id,
            result: Ok(SuggestionList::from_items(["Zakopane", "Zawoja"])),
        }));

        handle_key(key(KeyCode::Down), &mut controller, &mut ui);
        handle_key(key(KeyCode::Down), &mut controller, &mut ui);
        assert_eq!(ui.highlighted, Some(1));

        handle_key(key(KeyCode::Enter), &mut controller, &mut ui);
        assert_eq!(controller.city(), "Zawoja");
        assert!(controller.is_city_confirmed());
    }

    #[tokio::test]
    async fn test_range_field_accepts_digits_only() {
        let (mut controller, _rx) = controller();
        let mut ui = UiState {
            focus: Focus::Range,
            highlighted: None,
        };

        handle_key(key(KeyCode::Backspace), &mut controller, &mut ui);
        handle_key(key(KeyCode::Char('x')), &mut controller, &mut ui);
        handle_key(key(KeyCode::Char('5')), &mut controller, &mut ui);
        assert_eq!(controller.range_input(), "105");
    }

    #[tokio::test]
    async fn test_subscribe_with_invalid_email_shows_toast() {
        let (mut controller, _rx) = controller();
        let mut ui = UiState {
            focus: Focus::Email,
            highlighted: None,
        };

        handle_key(key(KeyCode::Char('x')), &mut controller, &mut ui);
        handle_key(key(KeyCode::Enter), &mut controller, &mut ui);
        assert_eq!(
            controller.toast_message(),
            Some("Please enter a valid email address.")
        );

        ui.focus = Focus::Subscribe;
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut controller, &mut ui),
            Flow::Continue
        );
        assert_eq!(
            controller.toast_message(),
            Some("Please enter a valid email address.")
        );
    }

    #[tokio::test]
    async fn test_escape_quits() {
        let (mut controller, _rx) = controller();
        let mut ui = UiState::default();
        assert_eq!(handle_key(key(KeyCode::Esc), &mut controller, &mut ui), Flow::Quit);
    }
}
