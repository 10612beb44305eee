//! src/filter/controller.rs
//! ============================================================================
//! # FilterController: visible subset of one list instance
//!
//! Owns the query, the independent regex error signal, the current snapshot
//! and the currently visible view of a single list. It never filters on its
//! own: it hands out [`FilterJob`]s and accepts their [`FilterOutcome`]s.
//!
//! ## Rules
//! - The first snapshot a controller receives is shown unfiltered, no job.
//! - Every later snapshot change produces a job right away.
//! - Query edits only update the query; the owner decides when (debounced)
//!   to ask for a job with [`FilterController::request_recompute`].
//! - Jobs carry increasing generations; an outcome older than the newest
//!   accepted one is discarded, so the view never regresses.

use std::fmt;
use std::time::{Duration, Instant};

use compact_str::CompactString;
use tracing::{debug, trace, warn};

use crate::filter::view::{FilteredView, apply};
use crate::model::entries::SearchKey;
use crate::model::snapshot::{Snapshot, same_snapshot};
use crate::search::predicate::{RegexError, SearchPredicate, compile};
use crate::search::query::FilterQuery;

/// Identifies a filterable list in the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListId {
    Entities,
    Fields,
    StringTables,
    StringTableItems,
}

impl ListId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entities => "entities",
            Self::Fields => "fields",
            Self::StringTables => "string_tables",
            Self::StringTableItems => "string_table_items",
        }
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a recomputation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeTrigger {
    /// New snapshot reference (tick, view or selection changed).
    Snapshot,
    /// Debounced query edit.
    Query,
}

/// Self-contained unit of filtering work.
#[derive(Debug)]
pub struct FilterJob<T> {
    pub list: ListId,
    pub generation: u64,
    pub trigger: RecomputeTrigger,
    pub snapshot: Snapshot<T>,
    pub predicate: Option<SearchPredicate>,
}

impl<T: SearchKey> FilterJob<T> {
    /// Runs the job to completion on the current thread.
    #[must_use]
    pub fn run(self) -> FilterOutcome<T> {
        let started = Instant::now();
        let view = apply(&self.snapshot, self.predicate.as_ref());
        self.finish(view, started.elapsed())
    }

    #[must_use]
    pub fn finish(self, view: FilteredView<T>, elapsed: Duration) -> FilterOutcome<T> {
        FilterOutcome {
            list: self.list,
            generation: self.generation,
            trigger: self.trigger,
            view,
            elapsed,
        }
    }
}

#[derive(Debug)]
pub struct FilterOutcome<T> {
    pub list: ListId,
    pub generation: u64,
    pub trigger: RecomputeTrigger,
    pub view: FilteredView<T>,
    pub elapsed: Duration,
}

pub struct FilterController<T> {
    list: ListId,
    query: FilterQuery,
    regex_error: Option<RegexError>,
    snapshot: Option<Snapshot<T>>,
    visible: Option<FilteredView<T>>,
    received_first: bool,
    submitted: u64,
    completed: u64,
}

impl<T: SearchKey> FilterController<T> {
    #[must_use]
    pub fn new(list: ListId) -> Self {
        Self {
            list,
            query: FilterQuery::default(),
            regex_error: None,
            snapshot: None,
            visible: None,
            received_first: false,
            submitted: 0,
            completed: 0,
        }
    }

    #[must_use]
    pub const fn list(&self) -> ListId {
        self.list
    }

    #[must_use]
    pub const fn query(&self) -> &FilterQuery {
        &self.query
    }

    /// Error for the text currently in the input (regex mode only).
    #[must_use]
    pub const fn regex_error(&self) -> Option<&RegexError> {
        self.regex_error.as_ref()
    }

    #[must_use]
    pub const fn snapshot(&self) -> Option<&Snapshot<T>> {
        self.snapshot.as_ref()
    }

    /// Currently visible subset; `None` while the source list is absent.
    #[must_use]
    pub const fn visible(&self) -> Option<&FilteredView<T>> {
        self.visible.as_ref()
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.as_ref().map_or(0, FilteredView::len)
    }

    #[must_use]
    pub fn total_len(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.len())
    }

    /// True while a submitted job has not been accepted yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.submitted > self.completed
    }

    /// Feeds the list's current snapshot.
    ///
    /// Returns a job to run immediately when the reference changed after the
    /// first snapshot. Snapshot-triggered work is never debounced.
    pub fn set_snapshot(&mut self, snapshot: Option<Snapshot<T>>) -> Option<FilterJob<T>> {
        if self.received_first && same_snapshot(self.snapshot.as_ref(), snapshot.as_ref()) {
            return None;
        }

        self.snapshot = snapshot;

        if !self.received_first {
            self.received_first = true;
            trace!(list = %self.list, "first snapshot shown unfiltered");
            self.publish_now(self.snapshot.clone().map(FilteredView::unfiltered));
            return None;
        }

        if self.snapshot.is_none() {
            self.publish_now(None);
            return None;
        }

        self.make_job(RecomputeTrigger::Snapshot)
    }

    /// Replaces the query text. Returns `true` if anything changed.
    pub fn set_text(&mut self, text: impl Into<CompactString>) -> bool {
        let text = text.into();
        if text == self.query.text {
            return false;
        }
        self.query.text = text;
        self.refresh_regex_error();
        true
    }

    pub fn push_char(&mut self, ch: char) {
        let mut text = self.query.text.clone();
        text.push(ch);
        self.set_text(text);
    }

    /// Removes the last character. Returns `true` if the text changed.
    pub fn pop_char(&mut self) -> bool {
        let mut text = self.query.text.clone();
        if text.pop().is_none() {
            return false;
        }
        self.set_text(text)
    }

    pub fn toggle_match_case(&mut self) {
        self.query.match_case = !self.query.match_case;
        self.refresh_regex_error();
    }

    pub fn toggle_regex(&mut self) {
        self.query.use_regex = !self.query.use_regex;
        self.refresh_regex_error();
    }

    /// Job for the current `(snapshot, query)` pair, if a snapshot exists.
    pub fn request_recompute(&mut self) -> Option<FilterJob<T>> {
        if self.snapshot.is_none() {
            self.publish_now(None);
            return None;
        }
        self.make_job(RecomputeTrigger::Query)
    }

    /// Accepts `outcome` unless a newer one was already accepted.
    pub fn complete(&mut self, outcome: FilterOutcome<T>) -> bool {
        if outcome.generation <= self.completed {
            debug!(
                list = %self.list,
                generation = outcome.generation,
                completed = self.completed,
                "discarding stale filter result"
            );
            return false;
        }

        debug!(
            list = %self.list,
            generation = outcome.generation,
            trigger = ?outcome.trigger,
            total = outcome.view.total_len(),
            visible = outcome.view.len(),
            elapsed_us = outcome.elapsed.as_micros() as u64,
            "filter result applied"
        );

        self.completed = outcome.generation;
        self.visible = Some(outcome.view);
        true
    }

    fn make_job(&mut self, trigger: RecomputeTrigger) -> Option<FilterJob<T>> {
        let snapshot = self.snapshot.clone()?;

        // An invalid regex filters nothing; the error is surfaced separately.
        let predicate = compile(&self.query).unwrap_or_else(|err| {
            warn!(list = %self.list, error = %err, "regex rejected, showing unfiltered list");
            None
        });

        self.submitted += 1;

        Some(FilterJob {
            list: self.list,
            generation: self.submitted,
            trigger,
            snapshot,
            predicate,
        })
    }

    fn publish_now(&mut self, view: Option<FilteredView<T>>) {
        self.submitted += 1;
        self.completed = self.submitted;
        self.visible = view;
    }

    fn refresh_regex_error(&mut self) {
        // mirrors what `make_job` compiles
        self.regex_error = compile(&self.query).err();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Named(&'static str);

    impl SearchKey for Named {
        fn search_key(&self) -> &str {
            self.0
        }
    }

    fn snap(names: &[&'static str]) -> Snapshot<Named> {
        Snapshot::new(names.iter().copied().map(Named).collect())
    }

    fn visible_names(ctl: &FilterController<Named>) -> Vec<&'static str> {
        ctl.visible()
            .map(|v| v.iter().map(|n| n.0).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_first_snapshot_is_not_filtered() {
        let mut ctl = FilterController::new(ListId::Entities);
        let first = snap(&["a", "b"]);

        assert!(ctl.set_snapshot(Some(first.clone())).is_none());
        let view = ctl.visible().expect("visible");
        assert!(view.is_unfiltered());
        assert!(view.source().same_as(&first));
    }

    #[test]
    fn test_same_reference_does_not_recompute() {
        let mut ctl = FilterController::new(ListId::Entities);
        let first = snap(&["a"]);
        ctl.set_snapshot(Some(first.clone()));
        assert!(ctl.set_snapshot(Some(first)).is_none());
        assert!(!ctl.is_pending());
    }

    #[test]
    fn test_new_snapshot_is_refiltered_immediately() {
        let mut ctl = FilterController::new(ListId::Entities);
        ctl.set_snapshot(Some(snap(&["alpha", "beta"])));
        ctl.set_text("a");
        let query_job = ctl.request_recompute().expect("job");
        ctl.complete(query_job.run());

        let job = ctl
            .set_snapshot(Some(snap(&["gamma", "delta", "pi"])))
            .expect("snapshot change yields job");
        assert_eq!(job.trigger, RecomputeTrigger::Snapshot);
        assert!(ctl.is_pending());

        assert!(ctl.complete(job.run()));
        assert_eq!(visible_names(&ctl), ["gamma", "delta"]);
    }

    #[test]
    fn test_query_edit_waits_for_request() {
        let mut ctl = FilterController::new(ListId::Fields);
        ctl.set_snapshot(Some(snap(&["m_iHealth", "m_flSpeed"])));

        assert!(ctl.set_text("health"));
        // nothing recomputed yet
        assert_eq!(visible_names(&ctl), ["m_iHealth", "m_flSpeed"]);

        let job = ctl.request_recompute().unwrap();
        assert_eq!(job.trigger, RecomputeTrigger::Query);
        ctl.complete(job.run());
        assert_eq!(visible_names(&ctl), ["m_iHealth"]);
    }

    #[test]
    fn test_stale_outcome_is_discarded() {
        let mut ctl = FilterController::new(ListId::Entities);
        ctl.set_snapshot(Some(snap(&["ab", "b", "a"])));

        ctl.set_text("a");
        let older = ctl.request_recompute().unwrap();
        ctl.set_text("b");
        let newer = ctl.request_recompute().unwrap();

        assert!(ctl.complete(newer.run()));
        assert!(!ctl.complete(older.run()));
        assert_eq!(visible_names(&ctl), ["ab", "b"]);
    }

    #[test]
    fn test_out_of_order_completion_keeps_newest() {
        let mut ctl = FilterController::new(ListId::Entities);
        ctl.set_snapshot(Some(snap(&["x"])));

        let first = ctl.set_snapshot(Some(snap(&["one"]))).unwrap();
        let second = ctl.set_snapshot(Some(snap(&["two"]))).unwrap();

        assert!(ctl.complete(second.run()));
        assert_eq!(visible_names(&ctl), ["two"]);
        assert!(!ctl.complete(first.run()));
        assert_eq!(visible_names(&ctl), ["two"]);
    }

    #[test]
    fn test_invalid_regex_shows_unfiltered_and_reports_error() {
        let mut ctl = FilterController::new(ListId::Entities);
        ctl.set_snapshot(Some(snap(&["a[b", "c"])));

        ctl.toggle_regex();
        ctl.set_text("[");
        assert!(ctl.regex_error().is_some());

        let job = ctl.request_recompute().unwrap();
        assert!(job.predicate.is_none());
        ctl.complete(job.run());
        assert_eq!(visible_names(&ctl), ["a[b", "c"]);

        // leaving regex mode clears the error signal
        ctl.toggle_regex();
        assert!(ctl.regex_error().is_none());
    }

    #[test]
    fn test_regex_error_follows_case_toggle() {
        let mut ctl = FilterController::new(ListId::Entities);
        ctl.set_snapshot(Some(snap(&["kk", "c"])));
        ctl.toggle_regex();

        // only valid when matched case-sensitively
        ctl.set_text("k{64000}");
        assert!(ctl.regex_error().is_some());
        let job = ctl.request_recompute().unwrap();
        assert!(job.predicate.is_none());

        ctl.toggle_match_case();
        assert!(ctl.regex_error().is_none());
        let job = ctl.request_recompute().unwrap();
        assert!(job.predicate.is_some());

        ctl.toggle_match_case();
        assert!(ctl.regex_error().is_some());
    }

    #[test]
    fn test_absent_snapshot_clears_view() {
        let mut ctl = FilterController::new(ListId::Fields);
        ctl.set_snapshot(Some(snap(&["a"])));
        let pending = ctl.set_snapshot(Some(snap(&["b"]))).unwrap();

        assert!(ctl.set_snapshot(None).is_none());
        assert!(ctl.visible().is_none());
        // the in-flight job predates the removal
        assert!(!ctl.complete(pending.run()));
        assert!(ctl.request_recompute().is_none());
    }

    #[test]
    fn test_pop_char() {
        let mut ctl: FilterController<Named> = FilterController::new(ListId::Entities);
        assert!(!ctl.pop_char());
        ctl.push_char('a');
        ctl.push_char('b');
        assert!(ctl.pop_char());
        assert_eq!(ctl.query().text, "a");
    }
}
