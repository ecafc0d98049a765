use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pullrefresh_core::GestureEvent;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollToTop,
    /// One keyboard pull step (starts a pull if none is active)
    PullStep,
    /// End a keyboard pull
    ReleasePull,
    /// Abandon a keyboard pull without refreshing
    CancelPull,
    /// Raw gesture from the mouse
    Gesture(GestureEvent),
    /// Host-driven refresh through the `refreshing` flag
    ProgrammaticRefresh,
    ToggleEnabled,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::ScrollToTop,

        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::PullStep,
        (KeyCode::Enter, KeyModifiers::NONE) => Action::ReleasePull,
        (KeyCode::Esc, _) => Action::CancelPull,

        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::ProgrammaticRefresh,
        (KeyCode::Char('e'), KeyModifiers::NONE) => Action::ToggleEnabled,

        _ => Action::None,
    }
}

/// Turns left-button mouse drags into gesture events
#[derive(Debug, Clone)]
pub struct DragTracker {
    last_row: Option<u16>,
    row_height: f64,
}

impl DragTracker {
    pub fn new(row_height: f64) -> Self {
        Self {
            last_row: None,
            row_height,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.last_row.is_some()
    }

    /// Handle a mouse event and return the corresponding action
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Action {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.last_row = Some(mouse.row);
                Action::Gesture(GestureEvent::Start)
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(last) = self.last_row else {
                    return Action::None;
                };
                self.last_row = Some(mouse.row);
                let rows = mouse.row as i32 - last as i32;
                if rows == 0 {
                    Action::None
                } else {
                    Action::Gesture(GestureEvent::Move {
                        delta: rows as f64 * self.row_height,
                    })
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.last_row.take().is_some() {
                    Action::Gesture(GestureEvent::Release)
                } else {
                    Action::None
                }
            }
            MouseEventKind::ScrollDown => Action::ScrollDown,
            MouseEventKind::ScrollUp => Action::ScrollUp,
            _ => Action::None,
        }
    }
}
