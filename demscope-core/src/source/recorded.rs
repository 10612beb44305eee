//! src/source/recorded.rs
//! ============================================================================
//! # RecordedDemo: decoding-free `DemoSource`
//!
//! Serves snapshots from a JSON recording: the total tick count plus the
//! parser state captured at a set of ticks. Seeking lands on the latest
//! recorded tick at or before the request; `-1` (or anything before the
//! first recording) is the pre-start state where no lists exist yet.
//!
//! ```json
//! {
//!   "total_ticks": 1200,
//!   "ticks": [{
//!     "tick": 0,
//!     "entities": [{ "index": 0, "name": "CWorld", "fields": [
//!       { "path": [0], "named_path": ["m_iHealth"], "value": "100",
//!         "encoded_as": "int32", "decoded_as": "I64" }
//!     ]}],
//!     "string_tables": [{ "name": "userinfo",
//!       "items": [{ "string": "player", "user_data": [1, 2] }] }]
//!   }]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::AppError;
use crate::model::entries::{EntityEntry, FieldEntry, StringTableEntry, StringTableItemEntry};
use crate::source::demo_source::{DemoSource, HandleCodec};
use crate::source::handle::Source2Handles;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub total_ticks: i32,
    pub ticks: Vec<RecordedTick>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedTick {
    pub tick: i32,
    #[serde(default)]
    pub entities: Vec<RecordedEntity>,
    #[serde(default)]
    pub baselines: Vec<RecordedEntity>,
    #[serde(default)]
    pub string_tables: Vec<RecordedStringTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEntity {
    pub index: i32,
    pub name: CompactString,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedStringTable {
    pub name: CompactString,
    #[serde(default)]
    pub items: Vec<RecordedItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedItem {
    #[serde(default)]
    pub string: Option<String>,
    #[serde(default)]
    pub user_data: Option<Vec<u8>>,
}

impl From<&RecordedItem> for StringTableItemEntry {
    fn from(item: &RecordedItem) -> Self {
        Self {
            string: item.string.as_ref().map(|s| s.as_bytes().to_vec()),
            user_data: item.user_data.clone(),
        }
    }
}

/// Reads the raw bytes of a demo file.
pub async fn read_demo_file(path: &Path) -> Result<Vec<u8>, AppError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| AppError::file_read(path, source))
}

pub struct RecordedDemo {
    recording: Recording,
    cursor: Option<usize>,
    codec: Arc<Source2Handles>,
}

impl RecordedDemo {
    /// Constructs the parser over an in-memory recording.
    #[instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AppError> {
        let recording: Recording = serde_json::from_slice(bytes)
            .map_err(|err| AppError::parser_init(format!("malformed recording: {err}")))?;
        Self::from_recording(recording)
    }

    pub fn from_recording(mut recording: Recording) -> Result<Self, AppError> {
        validate(&recording)?;

        recording.ticks.sort_by_key(|t| t.tick);
        for tick in &mut recording.ticks {
            tick.entities.sort_by_key(|e| e.index);
            tick.baselines.sort_by_key(|e| e.index);
        }

        info!(
            total_ticks = recording.total_ticks,
            recorded = recording.ticks.len(),
            "recording loaded"
        );

        Ok(Self {
            recording,
            cursor: None,
            codec: Arc::new(Source2Handles),
        })
    }

    fn current(&self) -> Option<&RecordedTick> {
        self.cursor.and_then(|i| self.recording.ticks.get(i))
    }

    fn entity_list(entities: &[RecordedEntity]) -> Vec<EntityEntry> {
        entities
            .iter()
            .map(|e| EntityEntry {
                index: e.index,
                name: e.name.clone(),
            })
            .collect()
    }

    fn fields_of(entities: &[RecordedEntity], index: i32) -> Option<Vec<FieldEntry>> {
        entities
            .binary_search_by_key(&index, |e| e.index)
            .ok()
            .map(|pos| entities[pos].fields.clone())
    }
}

fn validate(recording: &Recording) -> Result<(), AppError> {
    if recording.total_ticks < 0 {
        return Err(AppError::parser_init(format!(
            "negative total tick count {}",
            recording.total_ticks
        )));
    }

    for tick in &recording.ticks {
        if !(0..=recording.total_ticks).contains(&tick.tick) {
            return Err(AppError::parser_init(format!(
                "recorded tick {} outside [0, {}]",
                tick.tick, recording.total_ticks
            )));
        }

        for entity in tick.entities.iter().chain(&tick.baselines) {
            if let Some(field) = entity
                .fields
                .iter()
                .find(|f| f.path.len() != f.named_path.len())
            {
                return Err(AppError::parser_init(format!(
                    "entity {} field {} has {} path parts but {} names",
                    entity.index,
                    field.path,
                    field.path.len(),
                    field.named_path.len()
                )));
            }
        }
    }

    Ok(())
}

impl DemoSource for RecordedDemo {
    fn tick(&self) -> i32 {
        self.current().map_or(-1, |t| t.tick)
    }

    fn total_ticks(&self) -> i32 {
        self.recording.total_ticks
    }

    fn seek(&mut self, tick: i32) -> Result<(), AppError> {
        if tick < -1 || tick > self.recording.total_ticks {
            return Err(AppError::seek_failed(
                tick,
                format!("outside [-1, {}]", self.recording.total_ticks),
            ));
        }

        let landed = self
            .recording
            .ticks
            .partition_point(|t| t.tick <= tick)
            .checked_sub(1);

        self.cursor = landed;
        debug!(requested = tick, landed = self.tick(), "seek");
        Ok(())
    }

    fn list_entities(&self) -> Option<Vec<EntityEntry>> {
        self.current().map(|t| Self::entity_list(&t.entities))
    }

    fn list_baseline_entities(&self) -> Option<Vec<EntityEntry>> {
        self.current().map(|t| Self::entity_list(&t.baselines))
    }

    fn list_entity_fields(&self, index: i32) -> Option<Vec<FieldEntry>> {
        self.current()
            .and_then(|t| Self::fields_of(&t.entities, index))
    }

    fn list_baseline_entity_fields(&self, index: i32) -> Option<Vec<FieldEntry>> {
        self.current()
            .and_then(|t| Self::fields_of(&t.baselines, index))
    }

    fn list_string_tables(&self) -> Option<Vec<StringTableEntry>> {
        self.current().map(|t| {
            t.string_tables
                .iter()
                .map(|table| StringTableEntry {
                    name: table.name.clone(),
                })
                .collect()
        })
    }

    fn list_string_table_items(&self, name: &str) -> Option<Vec<StringTableItemEntry>> {
        self.current().and_then(|t| {
            t.string_tables
                .iter()
                .find(|table| table.name == name)
                .map(|table| table.items.iter().map(StringTableItemEntry::from).collect())
        })
    }

    fn handle_codec(&self) -> Arc<dyn HandleCodec + Send + Sync> {
        self.codec.clone()
    }
}
