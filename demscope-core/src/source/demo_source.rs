//! src/source/demo_source.rs
//! ============================================================================
//! # Parser boundary
//!
//! Everything the inspector knows about a demo comes through [`DemoSource`].
//! Decoding, field resolution and tick simulation live behind it. List
//! operations return `None` while the parser has no such state yet (before
//! the first tick, or for an entity index that does not exist).

use std::sync::Arc;

use crate::error::AppError;
use crate::model::entries::{EntityEntry, FieldEntry, StringTableEntry, StringTableItemEntry};

/// Handle packing primitives owned by the parser.
pub trait HandleCodec {
    fn is_valid_handle(&self, handle: u32) -> bool;

    fn handle_to_index(&self, handle: u32) -> i32;
}

pub trait DemoSource: Send {
    /// Tick the parser currently sits on; `-1` before the first tick.
    fn tick(&self) -> i32;

    fn total_ticks(&self) -> i32;

    /// Runs the parser to `tick`. The tick it lands on is read back via
    /// [`DemoSource::tick`] and may differ from the request.
    fn seek(&mut self, tick: i32) -> Result<(), AppError>;

    fn list_entities(&self) -> Option<Vec<EntityEntry>>;

    fn list_baseline_entities(&self) -> Option<Vec<EntityEntry>>;

    fn list_entity_fields(&self, index: i32) -> Option<Vec<FieldEntry>>;

    fn list_baseline_entity_fields(&self, index: i32) -> Option<Vec<FieldEntry>>;

    fn list_string_tables(&self) -> Option<Vec<StringTableEntry>>;

    fn list_string_table_items(&self, name: &str) -> Option<Vec<StringTableItemEntry>>;

    fn handle_codec(&self) -> Arc<dyn HandleCodec + Send + Sync>;
}
