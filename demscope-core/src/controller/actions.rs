//! src/controller/actions.rs
//! ============================================================================
//! # Actions: Centralized Inspector Commands
//!
//! Defines the `Action` enum, which represents every user input the
//! inspector responds to, and the key map turning terminal key events into
//! actions for the current input mode.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::app_state::DemView;
use crate::model::ui_state::InputMode;

/// Display preference toggles (in memory only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPref {
    EntityIndex,
    FieldEncodedType,
    FieldDecodedType,
    FieldPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,

    ToggleHelp,

    /// Move focus between the list pane and the detail pane.
    SwitchFocus,

    NextView,

    SetView(DemView),

    /// Move the focused list's cursor by n rows.
    MoveCursor(isize),

    PageUp,

    PageDown,

    CursorFirst,

    CursorLast,

    /// Click the row under the cursor: toggles a selection, or follows a
    /// handle when the row is a linked field.
    Activate,

    /// Step the tick slider by n ticks.
    StepTick(i32),

    SeekStart,

    SeekEnd,

    EnterFilter,

    ExitFilter,

    FilterInput(char),

    FilterBackspace,

    FilterClear,

    ToggleMatchCase,

    ToggleRegex,

    TogglePref(DisplayPref),

    Resize(u16, u16),

    /// No operation. Used when an event is consumed but no state change is needed.
    NoOp,
}

/// Rows moved by PageUp/PageDown when the viewport height is unknown.
pub const PAGE_ROWS: isize = 20;

/// Ticks moved by a large step.
pub const LARGE_TICK_STEP: i32 = 100;

/// Maps a key event to an action for `mode`.
#[must_use]
pub fn map_key(key: KeyEvent, mode: InputMode) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::NoOp;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match (key.code, ctrl, alt) {
        (KeyCode::Char('c'), true, _) => return Action::Quit,
        (KeyCode::Char('c'), false, true) => return Action::ToggleMatchCase,
        (KeyCode::Char('r'), false, true) => return Action::ToggleRegex,
        (KeyCode::Up, ..) => return Action::MoveCursor(-1),
        (KeyCode::Down, ..) => return Action::MoveCursor(1),
        (KeyCode::PageUp, ..) => return Action::PageUp,
        (KeyCode::PageDown, ..) => return Action::PageDown,
        (KeyCode::Tab, ..) => return Action::SwitchFocus,
        _ => {}
    }

    match mode {
        InputMode::Filter => map_filter_key(key, ctrl),
        InputMode::Browse => map_browse_key(key),
    }
}

fn map_filter_key(key: KeyEvent, ctrl: bool) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => Action::ExitFilter,
        KeyCode::Backspace => Action::FilterBackspace,
        KeyCode::Char('u') if ctrl => Action::FilterClear,
        KeyCode::Char(c) if !ctrl => Action::FilterInput(c),
        _ => Action::NoOp,
    }
}

fn map_browse_key(key: KeyEvent) -> Action {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('/') => Action::EnterFilter,
        KeyCode::Char('v') => Action::NextView,
        KeyCode::Char('1') => Action::SetView(DemView::Entities),
        KeyCode::Char('2') => Action::SetView(DemView::BaselineEntities),
        KeyCode::Char('3') => Action::SetView(DemView::StringTables),

        KeyCode::Char('k') => Action::MoveCursor(-1),
        KeyCode::Char('j') => Action::MoveCursor(1),
        KeyCode::Home | KeyCode::Char('g') => Action::CursorFirst,
        KeyCode::End | KeyCode::Char('G') => Action::CursorLast,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,

        KeyCode::Left if shift => Action::StepTick(-LARGE_TICK_STEP),
        KeyCode::Right if shift => Action::StepTick(LARGE_TICK_STEP),
        KeyCode::Left | KeyCode::Char('h') => Action::StepTick(-1),
        KeyCode::Right | KeyCode::Char('l') => Action::StepTick(1),
        KeyCode::Char('H') => Action::StepTick(-LARGE_TICK_STEP),
        KeyCode::Char('L') => Action::StepTick(LARGE_TICK_STEP),
        KeyCode::Char('[') => Action::SeekStart,
        KeyCode::Char(']') => Action::SeekEnd,

        KeyCode::Char('i') => Action::TogglePref(DisplayPref::EntityIndex),
        KeyCode::Char('e') => Action::TogglePref(DisplayPref::FieldEncodedType),
        KeyCode::Char('d') => Action::TogglePref(DisplayPref::FieldDecodedType),
        KeyCode::Char('p') => Action::TogglePref(DisplayPref::FieldPath),

        _ => Action::NoOp,
    }
}
