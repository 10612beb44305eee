//! src/filter/bar.rs
//! ============================================================================
//! # FilterBar: one filter input bound to one list
//!
//! Pairs a [`FilterController`] with its own [`Debouncer`]. Query edits echo
//! into the controller immediately (so the input and the regex error update
//! on the high-priority path) and schedule a debounced trigger; the trigger
//! arrives back through the shared channel as the list's [`ListId`].

use compact_str::CompactString;
use tokio::sync::mpsc;
use tracing::trace;

use crate::filter::controller::{FilterController, FilterJob, FilterOutcome, ListId};
use crate::filter::view::FilteredView;
use crate::model::entries::SearchKey;
use crate::model::snapshot::Snapshot;
use crate::search::predicate::RegexError;
use crate::search::query::FilterQuery;
use crate::util::debounce::{DebounceConfig, Debouncer};

pub struct FilterBar<T> {
    controller: FilterController<T>,
    debouncer: Debouncer<ListId>,
}

impl<T: SearchKey> FilterBar<T> {
    #[must_use]
    pub fn new(list: ListId, cfg: DebounceConfig, trigger_tx: mpsc::UnboundedSender<ListId>) -> Self {
        Self {
            controller: FilterController::new(list),
            debouncer: Debouncer::new(cfg, trigger_tx),
        }
    }

    #[must_use]
    pub const fn list(&self) -> ListId {
        self.controller.list()
    }

    #[must_use]
    pub const fn controller(&self) -> &FilterController<T> {
        &self.controller
    }

    #[must_use]
    pub const fn query(&self) -> &FilterQuery {
        self.controller.query()
    }

    #[must_use]
    pub const fn regex_error(&self) -> Option<&RegexError> {
        self.controller.regex_error()
    }

    #[must_use]
    pub const fn visible(&self) -> Option<&FilteredView<T>> {
        self.controller.visible()
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.controller.visible_len()
    }

    #[must_use]
    pub fn total_len(&self) -> usize {
        self.controller.total_len()
    }

    /// True while an edit waits for its quiet period or a job is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.debouncer.is_pending() || self.controller.is_pending()
    }

    /// New snapshot for this list; the returned job should run right away.
    pub fn set_snapshot(&mut self, snapshot: Option<Snapshot<T>>) -> Option<FilterJob<T>> {
        let job = self.controller.set_snapshot(snapshot);
        if job.is_some() {
            // the immediate job already uses the latest query
            self.debouncer.cancel();
        }
        job
    }

    pub fn set_text(&mut self, text: impl Into<CompactString>) {
        if self.controller.set_text(text) {
            self.schedule();
        }
    }

    pub fn push_char(&mut self, ch: char) {
        self.controller.push_char(ch);
        self.schedule();
    }

    pub fn pop_char(&mut self) {
        if self.controller.pop_char() {
            self.schedule();
        }
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    pub fn toggle_match_case(&mut self) {
        self.controller.toggle_match_case();
        self.schedule();
    }

    pub fn toggle_regex(&mut self) {
        self.controller.toggle_regex();
        self.schedule();
    }

    /// Called when this bar's debounce trigger fires.
    pub fn on_trigger(&mut self) -> Option<FilterJob<T>> {
        self.controller.request_recompute()
    }

    pub fn complete(&mut self, outcome: FilterOutcome<T>) -> bool {
        self.controller.complete(outcome)
    }

    fn schedule(&mut self) {
        trace!(list = %self.list(), query = %self.controller.query().text, "filter edit scheduled");
        self.debouncer.submit(self.list());
    }
}
