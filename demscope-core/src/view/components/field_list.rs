//! src/view/components/field_list.rs
//! ============================================================================
//! # Field list
//!
//! One row per field of the selected entity. Handle fields carry a link
//! marker (or a broken-link marker for the invalid handle); the structural
//! path, when shown, is padded to the widest path in the list so values line
//! up.

use ratatui::{prelude::*, widgets::ListItem};

use crate::controller::handle_resolver::{HandleResolver, HandleState};
use crate::controller::selection_coordinator::SelectionDisplay;
use crate::filter::view::FilteredView;
use crate::model::app_state::DisplayPrefs;
use crate::model::entries::FieldRow;
use crate::model::path::PADDED_PART_WIDTH;
use crate::view::components::list_pane::{self, ListWindow};
use crate::view::{icons, theme};

pub const FIELDS_UNSELECTED: &str = "to view entity fields, select an entity from the list of entities";
pub const FIELDS_ENTITY_GONE: &str = "the previously selected entity does not exist at the current tick";

pub struct FieldList<'a> {
    view: Option<&'a FilteredView<FieldRow>>,
    selection: SelectionDisplay,
    resolver: &'a HandleResolver,
    prefs: DisplayPrefs,
}

impl<'a> FieldList<'a> {
    pub const fn new(
        view: Option<&'a FilteredView<FieldRow>>,
        selection: SelectionDisplay,
        resolver: &'a HandleResolver,
        prefs: DisplayPrefs,
    ) -> Self {
        Self {
            view,
            selection,
            resolver,
            prefs,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, window: &ListWindow) {
        let block = list_pane::pane_block(" Fields ", window.focused);

        let view = match (self.selection, self.view) {
            (SelectionDisplay::Unselected, _) => {
                list_pane::render_message(frame, area, block, FIELDS_UNSELECTED);
                return;
            }
            (SelectionDisplay::NotPresent(_), _) => {
                list_pane::render_message(frame, area, block, FIELDS_ENTITY_GONE);
                return;
            }
            // first filter pass for a new selection still running
            (SelectionDisplay::Present(_), None) => {
                frame.render_widget(block, area);
                return;
            }
            (SelectionDisplay::Present(_), Some(view)) => view,
        };

        let path_width = if self.prefs.show_field_path {
            widest_path(view)
        } else {
            0
        };

        let items = view
            .window(window.range())
            .map(|(_, row)| ListItem::new(self.field_line(row, path_width)))
            .collect();

        list_pane::render_items(frame, area, block, items, window);
    }

    /// Renders one field row.
    pub fn field_line(&self, row: &FieldRow, path_width: usize) -> Line<'static> {
        let field = &row.field;
        let mut spans = Vec::with_capacity(8);

        if self.prefs.show_field_path {
            spans.push(Span::styled(
                format!("{:<path_width$} ", field.path.padded()),
                theme::dim_style(),
            ));
        }

        match self.resolver.classify_field(field) {
            HandleState::Linked(target) => {
                spans.push(Span::styled(
                    format!("{} ", icons::LINK_ICON),
                    Style::default().fg(theme::CYAN),
                ));
                spans.push(Span::styled(row.joined_named_path.clone(), Style::default().fg(theme::CYAN)));
                spans.push(Span::raw(" = "));
                spans.push(Span::styled(format!("#{target}"), Style::default().fg(theme::CYAN)));
            }
            HandleState::Invalid => {
                spans.push(Span::styled(format!("{} ", icons::BROKEN_LINK_ICON), theme::error_style()));
                spans.push(Span::raw(row.joined_named_path.clone()));
                spans.push(Span::raw(" = "));
                spans.push(Span::styled(field.value.clone(), theme::error_style()));
            }
            HandleState::NotHandle => {
                spans.push(Span::raw(row.joined_named_path.clone()));
                spans.push(Span::raw(" = "));
                spans.push(Span::styled(field.value.clone(), Style::default().fg(theme::GREEN)));
            }
        }

        if self.prefs.show_field_encoded_type {
            spans.push(Span::styled(format!("  {}", field.encoded_as), theme::dim_style()));
        }
        if self.prefs.show_field_decoded_type {
            spans.push(Span::styled(format!("  ({})", field.decoded_as), Style::default().fg(theme::ORANGE)));
        }

        Line::from(spans)
    }
}

/// Column width of the longest padded path in `view`.
#[must_use]
pub fn widest_path(view: &FilteredView<FieldRow>) -> usize {
    view.iter()
        .map(|row| row.field.path.len())
        .max()
        .unwrap_or(0)
        * PADDED_PART_WIDTH
}
