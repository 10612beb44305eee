//! src/view/components/help_overlay.rs
//! Key reference, toggled with `?`.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::view::theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("↑/↓ j/k", "move cursor"),
            ("PgUp/PgDn", "move one page"),
            ("g/G Home/End", "first / last row"),
            ("Tab", "switch pane"),
            ("Enter/Space", "select row, follow handle"),
        ],
    ),
    (
        "Ticks",
        &[
            ("←/→ h/l", "step one tick"),
            ("Shift-←/→ H/L", "step 100 ticks"),
            ("[ ]", "jump to start / end"),
        ],
    ),
    (
        "Views",
        &[
            ("v", "next view"),
            ("1 2 3", "entities / baselines / string tables"),
            ("i e d p", "toggle index / encoded / decoded / path"),
        ],
    ),
    (
        "Filter",
        &[
            ("/", "edit the focused pane's filter"),
            ("Alt-c", "match case"),
            ("Alt-r", "regular expression"),
            ("Ctrl-u", "clear"),
            ("Enter/Esc", "stop editing"),
        ],
    ),
];

pub struct HelpOverlay;

impl HelpOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Clear, area);

        let mut lines = Vec::new();
        for (title, keys) in SECTIONS {
            lines.push(Line::from(Span::styled(
                *title,
                Style::default()
                    .fg(theme::YELLOW)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, what) in *keys {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {key:<16}"), Style::default().fg(theme::CYAN)),
                    Span::raw(*what),
                ]));
            }
            lines.push(Line::default());
        }

        let help = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" demscope help ")
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(theme::PURPLE))
                    .style(theme::base_style()),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(help, area);
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}
