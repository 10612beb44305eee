//! src/model/app_state.rs
//! ============================================================================
//! # InspectorState: the session store
//!
//! Owns the parser boundary, the current tick, the active view, selections
//! and display preferences. Derived snapshots (entity list, sorted field
//! rows, string tables and their items) are memoized and invalidated
//! explicitly by a key of (tick generation, view, selection). Every seek
//! bumps the tick generation, so every derived list gets a fresh reference.

use std::fmt;

use compact_str::CompactString;
use tracing::{debug, info, instrument};

use crate::config::DisplayConfig;
use crate::controller::selection_coordinator::{SelectionCoordinator, SelectionDisplay};
use crate::error::AppError;
use crate::model::entries::{EntityEntry, FieldRow, StringTableEntry, StringTableItemRow};
use crate::model::path::sort_by_path;
use crate::model::snapshot::Snapshot;
use crate::source::demo_source::DemoSource;

/// Which entity collection the inspector is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DemView {
    #[default]
    Entities,
    BaselineEntities,
    StringTables,
}

impl DemView {
    pub const ALL: [Self; 3] = [Self::Entities, Self::BaselineEntities, Self::StringTables];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Entities => "Entities",
            Self::BaselineEntities => "Baseline entities",
            Self::StringTables => "String tables",
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Entities => Self::BaselineEntities,
            Self::BaselineEntities => Self::StringTables,
            Self::StringTables => Self::Entities,
        }
    }

    #[must_use]
    pub const fn shows_entities(self) -> bool {
        !matches!(self, Self::StringTables)
    }
}

impl fmt::Display for DemView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Display toggles. Changing these never triggers refiltering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPrefs {
    pub show_entity_index: bool,
    pub show_field_encoded_type: bool,
    pub show_field_decoded_type: bool,
    pub show_field_path: bool,
}

impl Default for DisplayPrefs {
    fn default() -> Self {
        DisplayConfig::default().into()
    }
}

impl From<DisplayConfig> for DisplayPrefs {
    fn from(cfg: DisplayConfig) -> Self {
        Self {
            show_entity_index: cfg.show_entity_index,
            show_field_encoded_type: cfg.show_field_encoded_type,
            show_field_decoded_type: cfg.show_field_decoded_type,
            show_field_path: cfg.show_field_path,
        }
    }
}

/// Memo slot: a value plus the key it was computed for.
struct Derived<K, T> {
    key: Option<K>,
    value: Option<Snapshot<T>>,
}

impl<K: PartialEq, T> Derived<K, T> {
    const fn empty() -> Self {
        Self {
            key: None,
            value: None,
        }
    }

    fn get_or_compute<F>(&mut self, key: K, compute: F) -> Option<Snapshot<T>>
    where
        F: FnOnce() -> Option<Vec<T>>,
    {
        if self.key.as_ref() != Some(&key) {
            self.value = compute().map(Snapshot::new);
            self.key = Some(key);
        }
        self.value.clone()
    }
}

type EntityKey = (u64, DemView);
type FieldKey = (u64, DemView, Option<i32>);
type TableItemKey = (u64, Option<CompactString>);

pub struct InspectorState {
    source: Box<dyn DemoSource>,
    tick: i32,
    total_ticks: i32,
    tick_generation: u64,
    view: DemView,
    selection: SelectionCoordinator,
    pub prefs: DisplayPrefs,

    entities: Derived<EntityKey, EntityEntry>,
    fields: Derived<FieldKey, FieldRow>,
    string_tables: Derived<u64, StringTableEntry>,
    string_table_items: Derived<TableItemKey, StringTableItemRow>,
}

impl InspectorState {
    pub fn new(source: Box<dyn DemoSource>, prefs: DisplayPrefs) -> Self {
        let tick = source.tick();
        let total_ticks = source.total_ticks();
        Self {
            source,
            tick,
            total_ticks,
            tick_generation: 0,
            view: DemView::default(),
            selection: SelectionCoordinator::new(),
            prefs,
            entities: Derived::empty(),
            fields: Derived::empty(),
            string_tables: Derived::empty(),
            string_table_items: Derived::empty(),
        }
    }

    #[must_use]
    pub const fn tick(&self) -> i32 {
        self.tick
    }

    #[must_use]
    pub const fn total_ticks(&self) -> i32 {
        self.total_ticks
    }

    /// Increases on every seek, even when the tick read back is unchanged.
    #[must_use]
    pub const fn tick_generation(&self) -> u64 {
        self.tick_generation
    }

    #[must_use]
    pub const fn view(&self) -> DemView {
        self.view
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionCoordinator {
        &self.selection
    }

    pub const fn selection_mut(&mut self) -> &mut SelectionCoordinator {
        &mut self.selection
    }

    #[must_use]
    pub fn source(&self) -> &dyn DemoSource {
        self.source.as_ref()
    }

    pub fn set_view(&mut self, view: DemView) {
        if self.view != view {
            debug!(from = %self.view, to = %view, "view changed");
            self.view = view;
        }
    }

    #[must_use]
    pub fn clamp_tick(&self, tick: i32) -> i32 {
        tick.clamp(-1, self.total_ticks.max(-1))
    }

    /// Seeks to `tick` clamped to `[-1, total]`; returns the tick landed on.
    #[instrument(level = "debug", skip(self), fields(from = self.tick))]
    pub fn seek(&mut self, tick: i32) -> Result<i32, AppError> {
        let target = self.clamp_tick(tick);
        self.source.seek(target)?;

        self.tick = self.source.tick();
        self.tick_generation += 1;

        info!(requested = tick, landed = self.tick, generation = self.tick_generation, "seek complete");
        Ok(self.tick)
    }

    pub fn step(&mut self, delta: i32) -> Result<i32, AppError> {
        self.seek(self.tick.saturating_add(delta))
    }

    pub fn seek_start(&mut self) -> Result<i32, AppError> {
        self.seek(-1)
    }

    pub fn seek_end(&mut self) -> Result<i32, AppError> {
        self.seek(self.total_ticks)
    }

    /// Entity list for the active view; `None` in the string tables view or
    /// while the parser has no entities.
    pub fn entities(&mut self) -> Option<Snapshot<EntityEntry>> {
        let key = (self.tick_generation, self.view);
        let (source, view) = (&self.source, self.view);
        self.entities.get_or_compute(key, || match view {
            DemView::Entities => source.list_entities(),
            DemView::BaselineEntities => source.list_baseline_entities(),
            DemView::StringTables => None,
        })
    }

    /// Fields of the selected entity, sorted by structural path.
    pub fn fields(&mut self) -> Option<Snapshot<FieldRow>> {
        let selected = self.selection.selected_entity();
        let key = (self.tick_generation, self.view, selected);
        let (source, view) = (&self.source, self.view);

        self.fields.get_or_compute(key, || {
            let index = selected?;
            let mut fields = match view {
                DemView::Entities => source.list_entity_fields(index),
                DemView::BaselineEntities => source.list_baseline_entity_fields(index),
                DemView::StringTables => None,
            }?;

            sort_by_path(&mut fields, |f| &f.path);
            Some(fields.into_iter().map(FieldRow::new).collect())
        })
    }

    pub fn string_tables(&mut self) -> Option<Snapshot<StringTableEntry>> {
        let source = &self.source;
        self.string_tables
            .get_or_compute(self.tick_generation, || source.list_string_tables())
    }

    pub fn string_table_items(&mut self) -> Option<Snapshot<StringTableItemRow>> {
        let selected = self
            .selection
            .selected_string_table()
            .map(CompactString::from);
        let key = (self.tick_generation, selected.clone());
        let source = &self.source;

        self.string_table_items.get_or_compute(key, || {
            let name = selected?;
            source
                .list_string_table_items(&name)
                .map(|items| items.into_iter().map(StringTableItemRow::new).collect())
        })
    }

    /// Entity selection read against the current entity list.
    pub fn selection_display(&mut self) -> SelectionDisplay {
        match self.entities() {
            Some(entities) => self.selection.resolve(&entities),
            None => self.selection.resolve(&[]),
        }
    }
}
