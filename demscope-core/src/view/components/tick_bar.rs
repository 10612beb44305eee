//! src/view/components/tick_bar.rs

use ratatui::{
    prelude::*,
    widgets::{LineGauge, Paragraph, Tabs},
};

use crate::model::app_state::DemView;
use crate::util::humanize::format_number;
use crate::view::theme;

/// `tick 1,234 / 50,000`
#[must_use]
pub fn tick_label(tick: i32, total_ticks: i32) -> String {
    format!(
        "tick {} / {}",
        format_number(i64::from(tick)),
        format_number(i64::from(total_ticks))
    )
}

/// Slider position in `[0, 1]`; the pre-start tick sits at zero.
#[must_use]
pub fn tick_ratio(tick: i32, total_ticks: i32) -> f64 {
    if total_ticks <= 0 {
        return 0.0;
    }
    (f64::from(tick.max(0)) / f64::from(total_ticks)).clamp(0.0, 1.0)
}

pub struct TickBar {
    tick: i32,
    total_ticks: i32,
    view: DemView,
}

impl TickBar {
    pub const fn new(tick: i32, total_ticks: i32, view: DemView) -> Self {
        Self {
            tick,
            total_ticks,
            view,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let [top, slider] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);
        let [tabs_area, label_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(28)]).areas(top);

        let selected = DemView::ALL.iter().position(|v| *v == self.view).unwrap_or(0);
        let tabs = Tabs::new(DemView::ALL.iter().map(|v| v.title()))
            .style(theme::dim_style())
            .highlight_style(theme::selected_row_style())
            .select(selected);
        frame.render_widget(tabs, tabs_area);

        frame.render_widget(
            Paragraph::new(tick_label(self.tick, self.total_ticks))
                .style(Style::default().fg(theme::CYAN))
                .alignment(Alignment::Right),
            label_area,
        );

        let gauge = LineGauge::default()
            .filled_style(Style::default().fg(theme::PINK))
            .unfilled_style(Style::default().fg(theme::CURRENT_LINE))
            .label("")
            .ratio(tick_ratio(self.tick, self.total_ticks));
        frame.render_widget(gauge, slider);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_label_uses_separators() {
        assert_eq!(tick_label(1_234, 50_000), "tick 1,234 / 50,000");
        assert_eq!(tick_label(-1, 900), "tick -1 / 900");
    }

    #[test]
    fn test_tick_ratio_is_clamped() {
        assert_eq!(tick_ratio(-1, 100), 0.0);
        assert_eq!(tick_ratio(50, 100), 0.5);
        assert_eq!(tick_ratio(100, 100), 1.0);
        assert_eq!(tick_ratio(5, 0), 0.0);
    }
}
