//! src/controller/handle_resolver.rs
//! ============================================================================
//! # HandleResolver
//!
//! Decides when a field value is worth resolving as an entity handle and
//! surfaces one of three states to display and selection. Bit packing is the
//! parser's business; this module only delegates to its [`HandleCodec`].

use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;

use crate::model::entries::FieldEntry;
use crate::source::demo_source::HandleCodec;

/// Classification of one field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    NotHandle,
    /// Handle-typed field whose value does not point at an entity.
    Invalid,
    /// Valid handle with the entity index it points at.
    Linked(i32),
}

impl HandleState {
    #[must_use]
    pub const fn is_handle_field(self) -> bool {
        !matches!(self, Self::NotHandle)
    }

    #[must_use]
    pub const fn is_valid_handle(self) -> bool {
        matches!(self, Self::Linked(_))
    }

    #[must_use]
    pub const fn target_index(self) -> Option<i32> {
        match self {
            Self::Linked(index) => Some(index),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct HandleResolver {
    marker: CompactString,
    codec: Arc<dyn HandleCodec + Send + Sync>,
}

impl fmt::Debug for HandleResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleResolver")
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}

impl HandleResolver {
    pub fn new(marker: impl Into<CompactString>, codec: Arc<dyn HandleCodec + Send + Sync>) -> Self {
        Self {
            marker: marker.into(),
            codec,
        }
    }

    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// `encoded_as` is the field's encoded type tag, `value` its textual value.
    #[must_use]
    pub fn classify(&self, encoded_as: &str, value: &str) -> HandleState {
        if !encoded_as.starts_with(self.marker.as_str()) {
            return HandleState::NotHandle;
        }

        // a handle-typed value that is not a u32 cannot point anywhere
        let Ok(handle) = value.trim().parse::<u32>() else {
            return HandleState::Invalid;
        };

        if !self.codec.is_valid_handle(handle) {
            return HandleState::Invalid;
        }

        HandleState::Linked(self.codec.handle_to_index(handle))
    }

    #[must_use]
    pub fn classify_field(&self, field: &FieldEntry) -> HandleState {
        self.classify(&field.encoded_as, &field.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::handle::{INVALID_HANDLE, Source2Handles};

    fn resolver() -> HandleResolver {
        HandleResolver::new("CHandle", Arc::new(Source2Handles))
    }

    #[test]
    fn test_non_handle_tag_never_resolves() {
        let r = resolver();
        for value in ["0", "123", "16777215", "garbage", ""] {
            let state = r.classify("uint32", value);
            assert_eq!(state, HandleState::NotHandle);
            assert!(!state.is_handle_field());
            assert_eq!(state.target_index(), None);
        }
    }

    #[test]
    fn test_marker_is_a_prefix_match() {
        let r = resolver();
        assert!(r.classify("CHandle< CBaseEntity >", "5").is_handle_field());
        assert!(!r.classify("CStrongHandle<InfoForResourceTypeCModel>", "5").is_handle_field());
    }

    #[test]
    fn test_invalid_handle() {
        let r = resolver();
        let state = r.classify("CHandle< CBaseEntity >", &INVALID_HANDLE.to_string());
        assert_eq!(state, HandleState::Invalid);
        assert!(state.is_handle_field());
        assert!(!state.is_valid_handle());
        assert_eq!(state.target_index(), None);

        assert_eq!(r.classify("CHandle<X>", "-1"), HandleState::Invalid);
    }

    #[test]
    fn test_valid_handle_targets_entry_index() {
        let r = resolver();
        let handle = (12u32 << 14) | 42;
        let state = r.classify("CHandle< CCitadelPlayerController >", &handle.to_string());
        assert_eq!(state, HandleState::Linked(42));
        assert_eq!(state.target_index(), Some(42));
    }
}
