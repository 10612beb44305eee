//! src/view/components/list_pane.rs
//! Shared chrome for the list panes: bordered block, windowed rows and the
//! empty-state message.

use std::ops::Range;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::view::{icons, theme};

/// The slice of a filtered list that is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    pub offset: usize,
    pub height: usize,
    pub cursor: usize,
    pub focused: bool,
}

impl ListWindow {
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.height
    }

    /// Row (relative to the window) carrying the cursor, if shown.
    #[must_use]
    pub const fn highlight(&self) -> Option<usize> {
        if self.focused && self.cursor >= self.offset && self.cursor < self.offset + self.height {
            Some(self.cursor - self.offset)
        } else {
            None
        }
    }
}

/// Rows available inside a bordered block.
#[must_use]
pub const fn inner_height(area: Rect) -> usize {
    area.height.saturating_sub(2) as usize
}

pub fn pane_block<'a>(title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(theme::pane_title_style())
        .border_style(theme::pane_border_style(focused))
        .style(theme::base_style())
}

pub fn render_items(frame: &mut Frame<'_>, area: Rect, block: Block<'_>, items: Vec<ListItem<'_>>, window: &ListWindow) {
    let mut state = ListState::default().with_selected(window.highlight());

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::cursor_style())
        .highlight_symbol(icons::CURSOR_SYMBOL)
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(list, area, &mut state);
}

pub fn render_message(frame: &mut Frame<'_>, area: Rect, block: Block<'_>, message: &str) {
    let text = Paragraph::new(Span::styled(message.to_owned(), theme::empty_message_style()))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(text, area);
}
