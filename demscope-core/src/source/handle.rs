//! src/source/handle.rs

use crate::source::demo_source::HandleCodec;

/// Value the engine writes into a handle that points nowhere.
pub const INVALID_HANDLE: u32 = 0x00FF_FFFF;

/// Low bits of a handle holding the entity entry index.
pub const ENTRY_INDEX_BITS: u32 = 14;

const ENTRY_INDEX_MASK: u32 = (1 << ENTRY_INDEX_BITS) - 1;

/// Source 2 entity handle packing: serial number above a 14-bit entry index.
#[derive(Debug, Clone, Copy, Default)]
pub struct Source2Handles;

impl HandleCodec for Source2Handles {
    fn is_valid_handle(&self, handle: u32) -> bool {
        handle != INVALID_HANDLE
    }

    fn handle_to_index(&self, handle: u32) -> i32 {
        (handle & ENTRY_INDEX_MASK) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_marker() {
        assert!(!Source2Handles.is_valid_handle(INVALID_HANDLE));
        assert!(Source2Handles.is_valid_handle(0));
    }

    #[test]
    fn test_index_drops_serial_bits() {
        // serial 3, entry 257
        let handle = (3 << ENTRY_INDEX_BITS) | 257;
        assert_eq!(Source2Handles.handle_to_index(handle), 257);
        assert_eq!(Source2Handles.handle_to_index(ENTRY_INDEX_MASK), 16383);
    }
}
