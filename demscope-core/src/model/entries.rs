//! src/model/entries.rs
//! ============================================================================
//! # Entry records listed by the parser boundary
//!
//! Identity is positional (or, for entities, the parser-assigned index); none
//! of these records carry a stable id of their own. Rows wrapping a raw
//! record precompute the text the filter bars match against.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::model::path::FieldPath;
use crate::util::humanize::bytes_to_hex;

/// Text a filter predicate is tested against.
pub trait SearchKey {
    fn search_key(&self) -> &str;
}

/// One entity (or baseline) at the current tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEntry {
    pub index: i32,
    pub name: CompactString,
}

impl SearchKey for EntityEntry {
    fn search_key(&self) -> &str {
        &self.name
    }
}

/// One decoded field of an entity.
///
/// `path` and `named_path` are parallel and always have equal length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub path: FieldPath,
    pub named_path: Vec<CompactString>,
    pub value: String,
    pub encoded_as: CompactString,
    pub decoded_as: CompactString,
}

/// Field plus its `.`-joined named path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub field: FieldEntry,
    pub joined_named_path: String,
}

impl FieldRow {
    #[must_use]
    pub fn new(field: FieldEntry) -> Self {
        let joined_named_path = field
            .named_path
            .iter()
            .map(CompactString::as_str)
            .collect::<Vec<_>>()
            .join(".");

        Self {
            field,
            joined_named_path,
        }
    }
}

impl SearchKey for FieldRow {
    fn search_key(&self) -> &str {
        &self.joined_named_path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringTableEntry {
    pub name: CompactString,
}

impl SearchKey for StringTableEntry {
    fn search_key(&self) -> &str {
        &self.name
    }
}

/// Raw string table item as stored by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTableItemEntry {
    pub string: Option<Vec<u8>>,
    pub user_data: Option<Vec<u8>>,
}

/// String table item with its display forms precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTableItemRow {
    pub item: StringTableItemEntry,
    pub decoded_string: Option<String>,
    pub decoded_user_data: Option<String>,
    search_text: String,
}

impl StringTableItemRow {
    #[must_use]
    pub fn new(item: StringTableItemEntry) -> Self {
        let decoded_string = item
            .string
            .as_deref()
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
        let decoded_user_data = item
            .user_data
            .as_deref()
            .filter(|bytes| !bytes.is_empty())
            .map(bytes_to_hex);

        let search_text = match (&decoded_string, &decoded_user_data) {
            (Some(s), Some(u)) => format!("{s} {u}"),
            (Some(s), None) => s.clone(),
            (None, Some(u)) => u.clone(),
            (None, None) => String::new(),
        };

        Self {
            item,
            decoded_string,
            decoded_user_data,
            search_text,
        }
    }
}

impl SearchKey for StringTableItemRow {
    fn search_key(&self) -> &str {
        &self.search_text
    }
}
