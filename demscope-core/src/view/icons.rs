//! src/view/icons.rs
//! Row markers for the list panes.

/// Handle field whose value decodes to an entity index.
pub const LINK_ICON: &str = "⇢";
/// Handle field holding the invalid marker or an unparsable value.
pub const BROKEN_LINK_ICON: &str = "⇏";
/// Row matching the current selection.
pub const SELECTED_ICON: &str = "●";
pub const CURSOR_SYMBOL: &str = "▶ ";
