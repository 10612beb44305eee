//! ``src/tasks/filter_task.rs``
//! ============================================================================
//! # Filter Task: low-priority recomputation of a visible subset
//!
//! Runs a [`FilterJob`] as a spawned task that yields back to the scheduler
//! every `chunk_size` entries, so terminal input is never starved while a
//! large snapshot is filtered. The outcome is sent back tagged with its
//! generation; superseded outcomes are dropped by the receiving controller.

use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{Instrument, debug, info_span};

use crate::controller::event_loop::TaskResult;
use crate::filter::controller::{FilterJob, FilterOutcome};
use crate::filter::view::FilteredView;
use crate::model::entries::SearchKey;
use crate::model::snapshot::Snapshot;
use crate::search::predicate::SearchPredicate;

/// Same result as [`crate::filter::view::apply`], yielding between chunks.
pub async fn apply_cooperatively<T: SearchKey>(
    entries: &Snapshot<T>,
    predicate: Option<&SearchPredicate>,
    chunk_size: usize,
) -> FilteredView<T> {
    let Some(predicate) = predicate else {
        return FilteredView::unfiltered(entries.clone());
    };

    let chunk_size = chunk_size.max(1);
    let mut indices = Vec::new();

    for (chunk_no, chunk) in entries.chunks(chunk_size).enumerate() {
        let base = chunk_no * chunk_size;
        indices.extend(
            chunk
                .iter()
                .enumerate()
                .filter(|(_, entry)| predicate.matches(entry.search_key()))
                .map(|(i, _)| base + i),
        );
        tokio::task::yield_now().await;
    }

    FilteredView::from_indices(entries.clone(), indices)
}

/// Runs `job` in the background and reports its outcome on `task_tx`.
pub fn spawn_filter<T>(
    job: FilterJob<T>,
    chunk_size: usize,
    task_tx: mpsc::UnboundedSender<TaskResult>,
) -> tokio::task::JoinHandle<()>
where
    T: SearchKey + Send + Sync + 'static,
    FilterOutcome<T>: Into<TaskResult>,
{
    let span = info_span!(
        "filter_task",
        list = %job.list,
        generation = job.generation,
        entries = job.snapshot.len()
    );

    tokio::spawn(
        async move {
            let started = Instant::now();
            let view =
                apply_cooperatively(&job.snapshot, job.predicate.as_ref(), chunk_size).await;

            debug!(
                marker = "FILTER_TASK",
                operation_type = "filter_complete",
                visible = view.len(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "filter task finished"
            );

            let outcome = job.finish(view, started.elapsed());
            // receiver gone means the session is shutting down
            let _ = task_tx.send(outcome.into());
        }
        .instrument(span),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::controller::{FilterController, ListId};
    use crate::filter::view::apply;
    use crate::model::entries::EntityEntry;
    use crate::search::{predicate::compile, query::FilterQuery};
    use compact_str::CompactString;

    fn entities(n: i32) -> Snapshot<EntityEntry> {
        Snapshot::new(
            (0..n)
                .map(|index| EntityEntry {
                    index,
                    name: CompactString::from(if index % 3 == 0 { "CWorld" } else { "CPawn" }),
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_chunked_matches_direct_apply() {
        let snap = entities(1_000);
        let pred = compile(&FilterQuery::new("world")).unwrap();

        let direct = apply(&snap, pred.as_ref());
        for chunk_size in [1, 7, 333, 5_000] {
            let chunked = apply_cooperatively(&snap, pred.as_ref(), chunk_size).await;
            let a: Vec<i32> = direct.iter().map(|e| e.index).collect();
            let b: Vec<i32> = chunked.iter().map(|e| e.index).collect();
            assert_eq!(a, b);
        }
    }

    #[tokio::test]
    async fn test_spawned_outcome_reaches_controller() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ctl = FilterController::new(ListId::Entities);
        ctl.set_snapshot(Some(entities(3)));
        ctl.set_text("pawn");

        let job = ctl.request_recompute().unwrap();
        spawn_filter(job, 2, tx).await.unwrap();

        match rx.recv().await {
            Some(TaskResult::Entities(outcome)) => {
                assert!(ctl.complete(outcome));
                assert_eq!(ctl.visible_len(), 2);
            }
            other => panic!("unexpected task result: {other:?}"),
        }
    }
}
