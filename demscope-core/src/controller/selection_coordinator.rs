//! src/controller/selection_coordinator.rs
//! ============================================================================
//! # SelectionCoordinator
//!
//! Owns the selected entity index and the selected string table name.
//! Clicks toggle, a resolved handle forces. Tick changes never touch the
//! state: the selection is reinterpreted against whatever list is current,
//! and "no longer present" is a display state.

use compact_str::CompactString;
use tracing::debug;

use crate::controller::handle_resolver::HandleState;
use crate::model::entries::EntityEntry;
use crate::model::selection::Selection;

/// How the entity selection reads against the current entity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDisplay {
    Unselected,
    /// Selected entity exists; carries its position in the list.
    Present(usize),
    /// Selected entity index has no entry at this tick.
    NotPresent(i32),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCoordinator {
    entity: Selection<i32>,
    string_table: Selection<CompactString>,
}

impl SelectionCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn entity(&self) -> &Selection<i32> {
        &self.entity
    }

    #[must_use]
    pub fn selected_entity(&self) -> Option<i32> {
        self.entity.selected().copied()
    }

    #[must_use]
    pub const fn string_table(&self) -> &Selection<CompactString> {
        &self.string_table
    }

    #[must_use]
    pub fn selected_string_table(&self) -> Option<&str> {
        self.string_table.selected().map(CompactString::as_str)
    }

    /// Row click in the entity list, keyed by the entity's index.
    pub fn on_row_click(&mut self, index: i32) {
        self.entity.toggle(index);
        debug!(clicked = index, selection = ?self.entity, "entity row clicked");
    }

    /// Activation of a field. Returns `true` if the selection jumped.
    pub fn on_handle_click(&mut self, state: HandleState) -> bool {
        let Some(target) = state.target_index() else {
            return false;
        };
        self.entity.force(target);
        debug!(target, "selection jumped through handle");
        true
    }

    pub fn on_table_click(&mut self, name: &str) {
        self.string_table.toggle(CompactString::from(name));
        debug!(table = name, selection = ?self.string_table, "string table clicked");
    }

    pub fn clear(&mut self) {
        self.entity.clear();
        self.string_table.clear();
    }

    /// Reads the entity selection against `entities`.
    #[must_use]
    pub fn resolve(&self, entities: &[EntityEntry]) -> SelectionDisplay {
        match self.entity.selected() {
            None => SelectionDisplay::Unselected,
            Some(&index) => entities
                .iter()
                .position(|e| e.index == index)
                .map_or(SelectionDisplay::NotPresent(index), SelectionDisplay::Present),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(n: i32) -> Vec<EntityEntry> {
        (0..n)
            .map(|index| EntityEntry {
                index,
                name: CompactString::from("CEntity"),
            })
            .collect()
    }

    #[test]
    fn test_reclick_clears() {
        let mut sel = SelectionCoordinator::new();
        sel.on_row_click(5);
        sel.on_row_click(5);
        assert_eq!(*sel.entity(), Selection::Unselected);
    }

    #[test]
    fn test_click_other_replaces() {
        let mut sel = SelectionCoordinator::new();
        sel.on_row_click(5);
        sel.on_row_click(7);
        assert_eq!(*sel.entity(), Selection::Selected(7));
    }

    #[test]
    fn test_selection_outliving_entity_is_not_present() {
        let mut sel = SelectionCoordinator::new();
        sel.on_row_click(5);
        assert_eq!(sel.resolve(&entities(3)), SelectionDisplay::NotPresent(5));
        // still pinned
        assert_eq!(sel.selected_entity(), Some(5));
        assert_eq!(sel.resolve(&entities(8)), SelectionDisplay::Present(5));
    }

    #[test]
    fn test_handle_click_forces_selection() {
        let mut sel = SelectionCoordinator::new();
        sel.on_row_click(3);
        assert!(sel.on_handle_click(HandleState::Linked(3)));
        assert_eq!(sel.selected_entity(), Some(3));

        assert!(!sel.on_handle_click(HandleState::Invalid));
        assert!(!sel.on_handle_click(HandleState::NotHandle));
        assert_eq!(sel.selected_entity(), Some(3));
    }

    #[test]
    fn test_table_selection_toggles_by_name() {
        let mut sel = SelectionCoordinator::new();
        sel.on_table_click("userinfo");
        assert_eq!(sel.selected_string_table(), Some("userinfo"));
        sel.on_table_click("userinfo");
        assert_eq!(sel.selected_string_table(), None);
        assert_eq!(sel.resolve(&entities(2)), SelectionDisplay::Unselected);
    }
}
