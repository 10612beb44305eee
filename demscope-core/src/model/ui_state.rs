//! src/model/ui_state.rs
//! UI-only state: focus, input mode, list cursors and redraw flags.

use compact_str::CompactString;

use crate::filter::controller::ListId;

/// Redraw flags; combined as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RedrawFlag {
    Main = 1,
    TickBar = 2,
    StatusBar = 4,
    All = 7,
}

impl RedrawFlag {
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Left pane lists entities (or string tables), right pane their details.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pane {
    #[default]
    List,
    Detail,
}

impl Pane {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::List => Self::Detail,
            Self::Detail => Self::List,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Browse,
    /// Keystrokes go to the focused pane's filter bar.
    Filter,
}

/// Session start stages, reported while the demo loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStage {
    ReadingFile,
    ConstructingParser,
    SeekingToTick(i32),
}

impl LoadStage {
    #[must_use]
    pub fn label(self) -> CompactString {
        match self {
            Self::ReadingFile => CompactString::const_new("reading file"),
            Self::ConstructingParser => CompactString::const_new("constructing parser"),
            Self::SeekingToTick(tick) => compact_str::format_compact!("seeking to tick {tick}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ListCursor {
    position: usize,
    offset: usize,
}

#[derive(Debug)]
pub struct UIState {
    pub focus: Pane,
    pub mode: InputMode,
    pub show_help: bool,
    /// Last non-fatal error (failed seek), shown in the status bar.
    pub notice: Option<CompactString>,
    cursors: [ListCursor; 4],
    redraw: u8,
}

impl Default for UIState {
    fn default() -> Self {
        Self {
            focus: Pane::default(),
            mode: InputMode::default(),
            show_help: false,
            notice: None,
            cursors: [ListCursor::default(); 4],
            redraw: RedrawFlag::All.bits(),
        }
    }
}

const fn slot(list: ListId) -> usize {
    match list {
        ListId::Entities => 0,
        ListId::Fields => 1,
        ListId::StringTables => 2,
        ListId::StringTableItems => 3,
    }
}

impl UIState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn request_redraw(&mut self, flag: RedrawFlag) {
        self.redraw |= flag.bits();
    }

    #[inline]
    #[must_use]
    pub const fn needs_redraw(&self) -> bool {
        self.redraw != 0
    }

    #[inline]
    pub fn clear_redraw(&mut self) {
        self.redraw = 0;
    }

    #[must_use]
    pub const fn cursor(&self, list: ListId) -> usize {
        self.cursors[slot(list)].position
    }

    #[must_use]
    pub const fn scroll_offset(&self, list: ListId) -> usize {
        self.cursors[slot(list)].offset
    }

    /// Moves the cursor by `delta`, clamped to `[0, len)`.
    pub fn move_cursor(&mut self, list: ListId, delta: isize, len: usize) {
        let cursor = &mut self.cursors[slot(list)];
        cursor.position = if len == 0 {
            0
        } else {
            cursor.position.saturating_add_signed(delta).min(len - 1)
        };
        self.request_redraw(RedrawFlag::Main);
    }

    pub fn set_cursor(&mut self, list: ListId, position: usize, len: usize) {
        self.cursors[slot(list)].position = position.min(len.saturating_sub(1));
        self.request_redraw(RedrawFlag::Main);
    }

    /// Keeps the cursor inside a list that may have shrunk.
    pub fn clamp_cursor(&mut self, list: ListId, len: usize) {
        let cursor = &mut self.cursors[slot(list)];
        cursor.position = cursor.position.min(len.saturating_sub(1));
    }

    /// Scrolls just enough to keep the cursor within `height` rows; returns
    /// the new first visible position.
    pub fn scroll_into_view(&mut self, list: ListId, height: usize) -> usize {
        let cursor = &mut self.cursors[slot(list)];
        if height == 0 {
            return cursor.offset;
        }
        if cursor.position < cursor.offset {
            cursor.offset = cursor.position;
        } else if cursor.position >= cursor.offset + height {
            cursor.offset = cursor.position + 1 - height;
        }
        cursor.offset
    }
}
