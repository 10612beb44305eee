//! src/view/components/string_tables.rs
//! Table list and item list of the string tables view.

use ratatui::{prelude::*, widgets::ListItem};

use crate::filter::view::FilteredView;
use crate::model::entries::{StringTableEntry, StringTableItemRow};
use crate::view::components::list_pane::{self, ListWindow};
use crate::view::{icons, theme};

pub const NO_STRING_TABLES: &str = "no string tables";
pub const ITEMS_UNSELECTED: &str = "to view table items, select a table";
pub const EMPTY_ITEM_STRING: &str = "<empty>";

#[must_use]
pub fn empty_table_message(name: &str) -> String {
    format!("{name} string table appears to be empty")
}

pub struct StringTableList<'a> {
    view: Option<&'a FilteredView<StringTableEntry>>,
    selected: Option<&'a str>,
}

impl<'a> StringTableList<'a> {
    pub const fn new(view: Option<&'a FilteredView<StringTableEntry>>, selected: Option<&'a str>) -> Self {
        Self { view, selected }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, window: &ListWindow) {
        let block = list_pane::pane_block(" String tables ", window.focused);

        let Some(view) = self.view.filter(|v| v.total_len() > 0) else {
            list_pane::render_message(frame, area, block, NO_STRING_TABLES);
            return;
        };

        let items = view
            .window(window.range())
            .map(|(_, table)| {
                if self.selected == Some(table.name.as_str()) {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{} ", icons::SELECTED_ICON), theme::selected_row_style()),
                        Span::styled(table.name.to_string(), theme::selected_row_style()),
                    ]))
                } else {
                    ListItem::new(Span::raw(table.name.to_string()))
                }
            })
            .collect();

        list_pane::render_items(frame, area, block, items, window);
    }
}

pub struct StringTableItemList<'a> {
    view: Option<&'a FilteredView<StringTableItemRow>>,
    table: Option<&'a str>,
}

impl<'a> StringTableItemList<'a> {
    pub const fn new(view: Option<&'a FilteredView<StringTableItemRow>>, table: Option<&'a str>) -> Self {
        Self { view, table }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, window: &ListWindow) {
        let Some(table) = self.table else {
            let block = list_pane::pane_block(" Items ", window.focused);
            list_pane::render_message(frame, area, block, ITEMS_UNSELECTED);
            return;
        };

        let block = list_pane::pane_block(format!(" {table} "), window.focused);
        let Some(view) = self.view.filter(|v| v.total_len() > 0) else {
            list_pane::render_message(frame, area, block, &empty_table_message(table));
            return;
        };

        let items = view
            .window(window.range())
            .map(|(_, row)| ListItem::new(item_line(row)))
            .collect();

        list_pane::render_items(frame, area, block, items, window);
    }
}

pub fn item_line(row: &StringTableItemRow) -> Line<'static> {
    let string = match &row.decoded_string {
        Some(s) => Span::raw(s.clone()),
        None => Span::styled(EMPTY_ITEM_STRING, theme::dim_style()),
    };

    match &row.decoded_user_data {
        Some(hex) => Line::from(vec![
            string,
            Span::raw("  "),
            Span::styled(hex.clone(), Style::default().fg(theme::ORANGE)),
        ]),
        None => Line::from(string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entries::StringTableItemEntry;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_item_rendering() {
        let full = StringTableItemRow::new(StringTableItemEntry {
            string: Some(b"player".to_vec()),
            user_data: Some(vec![0x0a, 0xff]),
        });
        assert_eq!(text(&item_line(&full)), "player  0a ff");

        let bare = StringTableItemRow::new(StringTableItemEntry::default());
        assert_eq!(text(&item_line(&bare)), EMPTY_ITEM_STRING);
    }

    #[test]
    fn test_empty_table_message() {
        assert_eq!(
            empty_table_message("userinfo"),
            "userinfo string table appears to be empty"
        );
    }
}
