//! src/controller/inspector.rs
//! ============================================================================
//! # Inspector: ties the store, filter bars and selection together
//!
//! All state changes go through [`Inspector::handle_action`]. After each one
//! the derived snapshots are re-read from the store and fed to the filter
//! bars; a changed reference yields an immediate (undebounced) filter job.
//! Query edits only schedule a debounced trigger, delivered back through
//! [`Inspector::on_debounce`]. Filter results arrive via
//! [`Inspector::on_task_result`].

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::controller::actions::{Action, DisplayPref, PAGE_ROWS};
use crate::controller::event_loop::TaskResult;
use crate::controller::handle_resolver::{HandleResolver, HandleState};
use crate::error::AppError;
use crate::filter::bar::FilterBar;
use crate::filter::controller::{FilterJob, FilterOutcome, ListId};
use crate::model::app_state::{DemView, InspectorState};
use crate::model::entries::{EntityEntry, FieldRow, SearchKey, StringTableEntry, StringTableItemRow};
use crate::model::ui_state::{InputMode, Pane, RedrawFlag, UIState};
use crate::tasks::filter_task::spawn_filter;

pub struct Inspector {
    pub state: InspectorState,
    pub ui: UIState,
    resolver: HandleResolver,
    entity_bar: FilterBar<EntityEntry>,
    field_bar: FilterBar<FieldRow>,
    table_bar: FilterBar<StringTableEntry>,
    item_bar: FilterBar<StringTableItemRow>,
    task_tx: mpsc::UnboundedSender<TaskResult>,
    chunk_size: usize,
    page_rows: usize,
    should_quit: bool,
}

impl Inspector {
    /// Wraps a loaded session. The snapshots present now are shown unfiltered.
    pub fn new(
        state: InspectorState,
        config: &Config,
        trigger_tx: mpsc::UnboundedSender<ListId>,
        task_tx: mpsc::UnboundedSender<TaskResult>,
    ) -> Self {
        let filter = &config.filter;
        let resolver = HandleResolver::new(config.handle.marker.as_str(), state.source().handle_codec());

        let mut inspector = Self {
            state,
            ui: UIState::new(),
            resolver,
            entity_bar: FilterBar::new(ListId::Entities, filter.entity_debounce(), trigger_tx.clone()),
            field_bar: FilterBar::new(ListId::Fields, filter.field_debounce(), trigger_tx.clone()),
            table_bar: FilterBar::new(
                ListId::StringTables,
                filter.string_table_debounce(),
                trigger_tx.clone(),
            ),
            item_bar: FilterBar::new(
                ListId::StringTableItems,
                filter.string_table_debounce(),
                trigger_tx,
            ),
            task_tx,
            chunk_size: filter.chunk_size,
            page_rows: PAGE_ROWS.unsigned_abs(),
            should_quit: false,
        };

        inspector.refresh_snapshots();
        inspector
    }

    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub const fn resolver(&self) -> &HandleResolver {
        &self.resolver
    }

    #[must_use]
    pub const fn entity_bar(&self) -> &FilterBar<EntityEntry> {
        &self.entity_bar
    }

    #[must_use]
    pub const fn field_bar(&self) -> &FilterBar<FieldRow> {
        &self.field_bar
    }

    #[must_use]
    pub const fn table_bar(&self) -> &FilterBar<StringTableEntry> {
        &self.table_bar
    }

    #[must_use]
    pub const fn item_bar(&self) -> &FilterBar<StringTableItemRow> {
        &self.item_bar
    }

    /// Rows per page for PageUp/PageDown, set from the rendered list height.
    pub fn set_page_rows(&mut self, rows: usize) {
        self.page_rows = rows.max(1);
    }

    /// List receiving cursor movement and filter input.
    #[must_use]
    pub const fn focused_list(&self) -> ListId {
        match (self.state.view().shows_entities(), self.ui.focus) {
            (true, Pane::List) => ListId::Entities,
            (true, Pane::Detail) => ListId::Fields,
            (false, Pane::List) => ListId::StringTables,
            (false, Pane::Detail) => ListId::StringTableItems,
        }
    }

    #[must_use]
    pub fn visible_len(&self, list: ListId) -> usize {
        match list {
            ListId::Entities => self.entity_bar.visible_len(),
            ListId::Fields => self.field_bar.visible_len(),
            ListId::StringTables => self.table_bar.visible_len(),
            ListId::StringTableItems => self.item_bar.visible_len(),
        }
    }

    /// `(visible, total)` entry counts of `list`.
    #[must_use]
    pub fn counts(&self, list: ListId) -> (usize, usize) {
        match list {
            ListId::Entities => (self.entity_bar.visible_len(), self.entity_bar.total_len()),
            ListId::Fields => (self.field_bar.visible_len(), self.field_bar.total_len()),
            ListId::StringTables => (self.table_bar.visible_len(), self.table_bar.total_len()),
            ListId::StringTableItems => (self.item_bar.visible_len(), self.item_bar.total_len()),
        }
    }

    /// Handle state of the field under the field cursor.
    #[must_use]
    pub fn handle_at_cursor(&self) -> HandleState {
        self.field_bar
            .visible()
            .and_then(|view| view.get(self.ui.cursor(ListId::Fields)))
            .map_or(HandleState::NotHandle, |row| self.resolver.classify_field(&row.field))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn handle_action(&mut self, action: Action) {
        let list = self.focused_list();

        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.ui.show_help = !self.ui.show_help,
            Action::SwitchFocus => self.ui.focus = self.ui.focus.other(),

            Action::NextView => self.set_view(self.state.view().next()),
            Action::SetView(view) => self.set_view(view),

            Action::MoveCursor(delta) => self.ui.move_cursor(list, delta, self.visible_len(list)),
            Action::PageUp => {
                let rows = isize::try_from(self.page_rows).unwrap_or(PAGE_ROWS);
                self.ui.move_cursor(list, -rows, self.visible_len(list));
            }
            Action::PageDown => {
                let rows = isize::try_from(self.page_rows).unwrap_or(PAGE_ROWS);
                self.ui.move_cursor(list, rows, self.visible_len(list));
            }
            Action::CursorFirst => self.ui.set_cursor(list, 0, self.visible_len(list)),
            Action::CursorLast => {
                let len = self.visible_len(list);
                self.ui.set_cursor(list, len.saturating_sub(1), len);
            }

            Action::Activate => self.activate(list),

            Action::StepTick(delta) => {
                let result = self.state.step(delta);
                self.after_seek(result);
            }
            Action::SeekStart => {
                let result = self.state.seek_start();
                self.after_seek(result);
            }
            Action::SeekEnd => {
                let result = self.state.seek_end();
                self.after_seek(result);
            }

            Action::EnterFilter => self.ui.mode = InputMode::Filter,
            Action::ExitFilter => self.ui.mode = InputMode::Browse,
            Action::FilterInput(ch) => self.with_focused_bar(list, |bar| bar.push_char(ch)),
            Action::FilterBackspace => self.with_focused_bar(list, |bar| bar.pop_char()),
            Action::FilterClear => self.with_focused_bar(list, |bar| bar.clear()),
            Action::ToggleMatchCase => self.with_focused_bar(list, |bar| bar.toggle_match_case()),
            Action::ToggleRegex => self.with_focused_bar(list, |bar| bar.toggle_regex()),

            Action::TogglePref(pref) => self.toggle_pref(pref),

            Action::Resize(..) | Action::NoOp => {}
        }

        self.ui.request_redraw(RedrawFlag::All);
    }

    /// A debounced query edit for `list` became due.
    pub fn on_debounce(&mut self, list: ListId) {
        let (tx, chunk) = (self.task_tx.clone(), self.chunk_size);
        match list {
            ListId::Entities => dispatch(self.entity_bar.on_trigger(), chunk, &tx),
            ListId::Fields => dispatch(self.field_bar.on_trigger(), chunk, &tx),
            ListId::StringTables => dispatch(self.table_bar.on_trigger(), chunk, &tx),
            ListId::StringTableItems => dispatch(self.item_bar.on_trigger(), chunk, &tx),
        }
    }

    /// Applies a finished filter job unless it was superseded.
    pub fn on_task_result(&mut self, result: TaskResult) {
        let (list, accepted) = match result {
            TaskResult::Entities(outcome) => (ListId::Entities, self.entity_bar.complete(outcome)),
            TaskResult::Fields(outcome) => (ListId::Fields, self.field_bar.complete(outcome)),
            TaskResult::StringTables(outcome) => {
                (ListId::StringTables, self.table_bar.complete(outcome))
            }
            TaskResult::StringTableItems(outcome) => {
                (ListId::StringTableItems, self.item_bar.complete(outcome))
            }
        };

        if accepted {
            self.ui.clamp_cursor(list, self.visible_len(list));
            self.ui.request_redraw(RedrawFlag::Main);
        }
    }

    /// Re-reads every derived list and feeds changed references to the bars.
    pub fn refresh_snapshots(&mut self) {
        let (tx, chunk) = (self.task_tx.clone(), self.chunk_size);

        let entities = self.state.entities();
        dispatch(self.entity_bar.set_snapshot(entities), chunk, &tx);

        let fields = self.state.fields();
        dispatch(self.field_bar.set_snapshot(fields), chunk, &tx);

        let tables = self.state.string_tables();
        dispatch(self.table_bar.set_snapshot(tables), chunk, &tx);

        let items = self.state.string_table_items();
        dispatch(self.item_bar.set_snapshot(items), chunk, &tx);
    }

    fn set_view(&mut self, view: DemView) {
        self.state.set_view(view);
        self.refresh_snapshots();
    }

    fn after_seek(&mut self, result: Result<i32, AppError>) {
        match result {
            Ok(tick) => {
                self.ui.notice = None;
                debug!(tick, "tick changed");
            }
            Err(err) => {
                warn!(error = %err, "seek failed");
                self.ui.notice = Some(err.to_string().into());
            }
        }
        self.refresh_snapshots();
        self.ui.request_redraw(RedrawFlag::TickBar);
    }

    fn activate(&mut self, list: ListId) {
        match list {
            ListId::Entities => {
                let Some(index) = self
                    .entity_bar
                    .visible()
                    .and_then(|view| view.get(self.ui.cursor(list)))
                    .map(|entity| entity.index)
                else {
                    return;
                };
                self.state.selection_mut().on_row_click(index);
            }

            ListId::Fields => {
                let handle = self.handle_at_cursor();
                if !self.state.selection_mut().on_handle_click(handle) {
                    return;
                }
                if let Some(target) = handle.target_index() {
                    info!(target, "following entity handle");
                    self.focus_entity(target);
                }
            }

            ListId::StringTables => {
                let Some(name) = self
                    .table_bar
                    .visible()
                    .and_then(|view| view.get(self.ui.cursor(list)))
                    .map(|table| table.name.clone())
                else {
                    return;
                };
                self.state.selection_mut().on_table_click(&name);
            }

            ListId::StringTableItems => return,
        }

        self.refresh_snapshots();
    }

    /// Moves the entity cursor onto `index` if it is visible.
    fn focus_entity(&mut self, index: i32) {
        let Some(view) = self.entity_bar.visible() else {
            return;
        };
        if let Some(position) = view.position_of(|e| e.index == index) {
            let len = view.len();
            self.ui.set_cursor(ListId::Entities, position, len);
        }
    }

    fn toggle_pref(&mut self, pref: DisplayPref) {
        let prefs = &mut self.state.prefs;
        let flag = match pref {
            DisplayPref::EntityIndex => &mut prefs.show_entity_index,
            DisplayPref::FieldEncodedType => &mut prefs.show_field_encoded_type,
            DisplayPref::FieldDecodedType => &mut prefs.show_field_decoded_type,
            DisplayPref::FieldPath => &mut prefs.show_field_path,
        };
        *flag = !*flag;
    }

    fn with_focused_bar<F>(&mut self, list: ListId, edit: F)
    where
        F: FnOnce(&mut dyn BarEdit),
    {
        match list {
            ListId::Entities => edit(&mut self.entity_bar),
            ListId::Fields => edit(&mut self.field_bar),
            ListId::StringTables => edit(&mut self.table_bar),
            ListId::StringTableItems => edit(&mut self.item_bar),
        }
        self.ui.request_redraw(RedrawFlag::StatusBar);
    }
}

/// Query edits shared by every filter bar, independent of the entry type.
trait BarEdit {
    fn push_char(&mut self, ch: char);
    fn pop_char(&mut self);
    fn clear(&mut self);
    fn toggle_match_case(&mut self);
    fn toggle_regex(&mut self);
}

impl<T: SearchKey> BarEdit for FilterBar<T> {
    fn push_char(&mut self, ch: char) {
        Self::push_char(self, ch);
    }

    fn pop_char(&mut self) {
        Self::pop_char(self);
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn toggle_match_case(&mut self) {
        Self::toggle_match_case(self);
    }

    fn toggle_regex(&mut self) {
        Self::toggle_regex(self);
    }
}

fn dispatch<T>(job: Option<FilterJob<T>>, chunk_size: usize, tx: &mpsc::UnboundedSender<TaskResult>)
where
    T: SearchKey + Send + Sync + 'static,
    FilterOutcome<T>: Into<TaskResult>,
{
    if let Some(job) = job {
        spawn_filter(job, chunk_size, tx.clone());
    }
}
