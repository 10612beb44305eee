//! src/view/components/entity_list.rs

use ratatui::{prelude::*, widgets::ListItem};

use crate::filter::view::FilteredView;
use crate::model::entries::EntityEntry;
use crate::view::components::list_pane::{self, ListWindow};
use crate::view::{icons, theme};

pub const NO_ENTITIES: &str = "no entities, try moving the slider";

pub struct EntityList<'a> {
    view: Option<&'a FilteredView<EntityEntry>>,
    selected: Option<i32>,
    show_index: bool,
}

impl<'a> EntityList<'a> {
    pub const fn new(view: Option<&'a FilteredView<EntityEntry>>, selected: Option<i32>, show_index: bool) -> Self {
        Self {
            view,
            selected,
            show_index,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, title: &str, window: &ListWindow) {
        let block = list_pane::pane_block(format!(" {title} "), window.focused);

        let Some(view) = self.view.filter(|v| v.total_len() > 0) else {
            list_pane::render_message(frame, area, block, NO_ENTITIES);
            return;
        };

        let items = view
            .window(window.range())
            .map(|(_, entity)| ListItem::new(self.entity_line(entity)))
            .collect();

        list_pane::render_items(frame, area, block, items, window);
    }

    fn entity_line(&self, entity: &EntityEntry) -> Line<'static> {
        let selected = self.selected == Some(entity.index);
        let mut spans = Vec::with_capacity(3);

        if selected {
            spans.push(Span::styled(format!("{} ", icons::SELECTED_ICON), theme::selected_row_style()));
        }
        if self.show_index {
            spans.push(Span::styled(format!("{:>5} ", entity.index), theme::dim_style()));
        }

        let name_style = if selected {
            theme::selected_row_style()
        } else {
            Style::default().fg(theme::FOREGROUND)
        };
        spans.push(Span::styled(entity.name.to_string(), name_style));

        Line::from(spans)
    }
}
