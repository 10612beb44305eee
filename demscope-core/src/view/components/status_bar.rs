//! src/view/components/status_bar.rs
//!
//! Bottom line: input mode, focused list with its `visible/total` counts,
//! the last non-fatal notice, and key hints on the right.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::filter::controller::ListId;
use crate::model::ui_state::InputMode;
use crate::util::humanize::format_number;
use crate::view::theme;

const BROWSE_HINTS: &str = "/ filter  ←→ tick  v view  ⏎ select  ? help  q quit";
const FILTER_HINTS: &str = "⏎/esc done  alt-c case  alt-r regex  ctrl-u clear";

/// `12/3,400`
#[must_use]
pub fn counts_label(visible: usize, total: usize) -> String {
    format!(
        "{}/{}",
        format_number(visible as i64),
        format_number(total as i64)
    )
}

pub struct StatusBar<'a> {
    mode: InputMode,
    list: ListId,
    visible: usize,
    total: usize,
    notice: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub const fn new(mode: InputMode, list: ListId, visible: usize, total: usize, notice: Option<&'a str>) -> Self {
        Self {
            mode,
            list,
            visible,
            total,
            notice,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let (mode_str, hints) = match self.mode {
            InputMode::Browse => ("BROWSE", BROWSE_HINTS),
            InputMode::Filter => ("FILTER", FILTER_HINTS),
        };

        let mut left = vec![
            Span::styled(format!(" {mode_str} "), theme::toggle_style(true)),
            Span::raw(format!(" {} ", self.list)),
            Span::styled(counts_label(self.visible, self.total), Style::default().fg(theme::GREEN)),
        ];
        if let Some(notice) = self.notice {
            left.push(Span::raw("  "));
            left.push(Span::styled(notice.to_owned(), theme::error_style()));
        }

        let [left_area, right_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);

        Paragraph::new(Line::from(left))
            .style(theme::base_style())
            .alignment(Alignment::Left)
            .render(left_area, frame.buffer_mut());

        Paragraph::new(hints)
            .style(theme::base_style().fg(theme::COMMENT))
            .alignment(Alignment::Right)
            .render(right_area, frame.buffer_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_label() {
        assert_eq!(counts_label(12, 3_400), "12/3,400");
        assert_eq!(counts_label(0, 0), "0/0");
    }
}
