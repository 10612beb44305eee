//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # Event loop plumbing and session start
//!
//! One `biased` select over three sources, in priority order:
//! 1. terminal input (echo and toggles must never wait on filtering)
//! 2. debounce triggers from the filter bars
//! 3. finished filter tasks
//!
//! Also hosts the session start sequence: reading the file, constructing the
//! parser and seeking to the starting tick. Any failure there is fatal to the
//! session and nothing of it is kept.

use std::io;
use std::path::Path;

use compact_str::CompactString;
use crossterm::event::Event as TermEvent;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, trace};

use crate::controller::inspector::Inspector;
use crate::error::AppError;
use crate::filter::controller::{FilterOutcome, ListId};
use crate::model::app_state::{DisplayPrefs, InspectorState};
use crate::model::entries::{EntityEntry, FieldRow, StringTableEntry, StringTableItemRow};
use crate::model::ui_state::LoadStage;
use crate::source::recorded::{RecordedDemo, read_demo_file};

/// Finished background filter work, one variant per list.
#[derive(Debug)]
pub enum TaskResult {
    Entities(FilterOutcome<EntityEntry>),
    Fields(FilterOutcome<FieldRow>),
    StringTables(FilterOutcome<StringTableEntry>),
    StringTableItems(FilterOutcome<StringTableItemRow>),
}

impl From<FilterOutcome<EntityEntry>> for TaskResult {
    fn from(outcome: FilterOutcome<EntityEntry>) -> Self {
        Self::Entities(outcome)
    }
}

impl From<FilterOutcome<FieldRow>> for TaskResult {
    fn from(outcome: FilterOutcome<FieldRow>) -> Self {
        Self::Fields(outcome)
    }
}

impl From<FilterOutcome<StringTableEntry>> for TaskResult {
    fn from(outcome: FilterOutcome<StringTableEntry>) -> Self {
        Self::StringTables(outcome)
    }
}

impl From<FilterOutcome<StringTableItemRow>> for TaskResult {
    fn from(outcome: FilterOutcome<StringTableItemRow>) -> Self {
        Self::StringTableItems(outcome)
    }
}

/// Lifecycle of the one demo this process inspects.
pub enum Session {
    Loading(LoadStage),
    /// Start failed; the message stays up until the user quits.
    Failed(CompactString),
    Ready(Box<Inspector>),
}

impl Session {
    #[must_use]
    pub fn inspector_mut(&mut self) -> Option<&mut Inspector> {
        match self {
            Self::Ready(inspector) => Some(inspector),
            _ => None,
        }
    }
}

/// Reads, parses and positions a demo. `report` is called before each stage.
#[instrument(skip(prefs, report), fields(path = %path.display()))]
pub async fn load_session<F>(
    path: &Path,
    start_tick: Option<i32>,
    prefs: DisplayPrefs,
    mut report: F,
) -> Result<InspectorState, AppError>
where
    F: FnMut(LoadStage),
{
    report(LoadStage::ReadingFile);
    let bytes = read_demo_file(path).await?;

    report(LoadStage::ConstructingParser);
    let demo = RecordedDemo::from_bytes(&bytes)?;
    drop(bytes);

    let mut state = InspectorState::new(Box::new(demo), prefs);
    let tick = state.clamp_tick(start_tick.unwrap_or(state.total_ticks()));

    report(LoadStage::SeekingToTick(tick));
    state.seek(tick)?;

    info!(tick = state.tick(), total = state.total_ticks(), "session ready");
    Ok(state)
}

#[derive(Debug)]
pub enum LoopEvent {
    Terminal(TermEvent),
    Debounce(ListId),
    Task(TaskResult),
    /// Every source is closed.
    Closed,
}

pub struct EventLoop<S> {
    events: S,
    trigger_rx: mpsc::UnboundedReceiver<ListId>,
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
}

impl<S> EventLoop<S>
where
    S: Stream<Item = io::Result<TermEvent>> + Unpin,
{
    pub fn new(
        events: S,
        trigger_rx: mpsc::UnboundedReceiver<ListId>,
        task_rx: mpsc::UnboundedReceiver<TaskResult>,
    ) -> Self {
        info!("Initializing event loop");
        Self {
            events,
            trigger_rx,
            task_rx,
        }
    }

    pub async fn next_event(&mut self) -> LoopEvent {
        tokio::select! {
            biased;

            Some(maybe_event) = self.events.next() => match maybe_event {
                Ok(event) => {
                    trace!("Terminal event received: {:?}", event);
                    LoopEvent::Terminal(event)
                }
                Err(err) => {
                    // a broken input stream is not recoverable
                    error!("Terminal input error: {err}");
                    LoopEvent::Closed
                }
            },

            Some(list) = self.trigger_rx.recv() => {
                debug!(%list, "debounce trigger");
                LoopEvent::Debounce(list)
            }

            Some(result) = self.task_rx.recv() => LoopEvent::Task(result),

            else => LoopEvent::Closed,
        }
    }
}
