//! src/view/components/loading_overlay.rs
//! Session start screen: the current load stage, or the failure that ended
//! the session.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::model::ui_state::LoadStage;
use crate::view::theme;

pub struct LoadingOverlay;

impl LoadingOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render_stage(&self, frame: &mut Frame<'_>, stage: LoadStage, area: Rect) {
        frame.render_widget(Clear, area);

        let chrome = Block::default()
            .title(" Loading ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::PURPLE))
            .style(theme::base_style());

        let text = Line::from(Span::styled(
            format!("{}…", stage.label()),
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ));

        frame.render_widget(
            Paragraph::new(text).block(chrome).alignment(Alignment::Center),
            area,
        );
    }

    pub fn render_failure(&self, frame: &mut Frame<'_>, message: &str, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Could not open demo ")
            .borders(Borders::ALL)
            .border_style(theme::error_style())
            .style(theme::base_style());

        let text = Text::from(vec![
            Line::from(Span::styled(message.to_owned(), theme::error_style())),
            Line::default(),
            Line::from(Span::styled("press q to quit", theme::dim_style())),
        ]);

        frame.render_widget(
            Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

impl Default for LoadingOverlay {
    fn default() -> Self {
        Self::new()
    }
}
