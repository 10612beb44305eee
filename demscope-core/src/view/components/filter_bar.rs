//! src/view/components/filter_bar.rs
//! Query input with match-case and regex toggles; the regex error, when
//! present, is drawn on the line below.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::search::predicate::RegexError;
use crate::search::query::FilterQuery;
use crate::view::theme;

/// Height of the bar including the error line when `has_error`.
#[must_use]
pub const fn height(has_error: bool) -> u16 {
    if has_error { 4 } else { 3 }
}

pub struct FilterBarView<'a> {
    query: &'a FilterQuery,
    error: Option<&'a RegexError>,
    busy: bool,
    editing: bool,
}

impl<'a> FilterBarView<'a> {
    pub const fn new(query: &'a FilterQuery, error: Option<&'a RegexError>, busy: bool, editing: bool) -> Self {
        Self {
            query,
            error,
            busy,
            editing,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, focused: bool) {
        let [bar, error_line] =
            Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);

        let border = if self.editing && focused {
            Style::default().fg(theme::YELLOW)
        } else {
            theme::pane_border_style(focused)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .style(theme::base_style());

        let [input, toggles] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).areas(block.inner(bar));
        frame.render_widget(block, bar);

        frame.render_widget(Paragraph::new(self.input_line(focused)), input);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Aa ", theme::toggle_style(self.query.match_case)),
                Span::raw(" "),
                Span::styled(" .* ", theme::toggle_style(self.query.use_regex)),
            ]))
            .alignment(Alignment::Right),
            toggles,
        );

        if let Some(err) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(err.to_string(), theme::error_style())),
                error_line,
            );
        }
    }

    fn input_line(&self, focused: bool) -> Line<'static> {
        let mut spans = vec![Span::styled("/ ", theme::dim_style())];

        if self.query.is_empty() && !(self.editing && focused) {
            spans.push(Span::styled("filter", theme::dim_style()));
        } else {
            spans.push(Span::raw(self.query.text.to_string()));
        }
        if self.editing && focused {
            spans.push(Span::styled("_", Style::default().fg(theme::YELLOW).add_modifier(Modifier::SLOW_BLINK)));
        }
        if self.busy {
            spans.push(Span::styled(" …", theme::dim_style()));
        }

        Line::from(spans)
    }
}
