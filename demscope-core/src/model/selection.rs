//! src/model/selection.rs

/// Optional key into the current list.
///
/// Selections are never rewritten when the list is replaced; they are
/// reinterpreted against whatever list is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<K> {
    Unselected,
    Selected(K),
}

impl<K> Default for Selection<K> {
    fn default() -> Self {
        Self::Unselected
    }
}

impl<K: PartialEq> Selection<K> {
    /// Click semantics: re-clicking the selected key clears the selection,
    /// any other key replaces it.
    pub fn toggle(&mut self, key: K) {
        *self = match std::mem::take(self) {
            Self::Selected(current) if current == key => Self::Unselected,
            _ => Self::Selected(key),
        };
    }

    pub fn force(&mut self, key: K) {
        *self = Self::Selected(key);
    }

    pub fn clear(&mut self) {
        *self = Self::Unselected;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&K> {
        match self {
            Self::Selected(key) => Some(key),
            Self::Unselected => None,
        }
    }

    #[must_use]
    pub fn is_selected(&self, key: &K) -> bool {
        self.selected() == Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cycle() {
        let mut sel = Selection::default();
        sel.toggle(5);
        assert_eq!(sel, Selection::Selected(5));
        sel.toggle(7);
        assert_eq!(sel, Selection::Selected(7));
        sel.toggle(7);
        assert_eq!(sel, Selection::Unselected);
    }

    #[test]
    fn test_force_overrides() {
        let mut sel = Selection::Selected("a".to_string());
        sel.force("a".to_string());
        assert!(sel.is_selected(&"a".to_string()));
    }
}
