//! End-to-end: recording on disk -> session start -> selection -> debounced
//! field filtering.

use std::io::Write;
use std::time::Duration;

use demscope_core::{
    config::Config,
    controller::{Action, Inspector, TaskResult},
    filter::ListId,
    model::DisplayPrefs,
};
use demscope_core::controller::event_loop::load_session;
use tempfile::NamedTempFile;
use tokio::sync::mpsc;

const RECORDING: &str = r#"{
    "total_ticks": 64,
    "ticks": [{
        "tick": 32,
        "entities": [{ "index": 0, "name": "CScenarioEntity", "fields": [
            { "path": [0],    "named_path": ["A"],  "value": "1", "encoded_as": "int32", "decoded_as": "I64" },
            { "path": [1],    "named_path": ["AB"], "value": "2", "encoded_as": "int32", "decoded_as": "I64" },
            { "path": [0, 0], "named_path": ["B", "C"], "value": "3", "encoded_as": "int32", "decoded_as": "I64" }
        ]}]
    }]
}"#;

struct Session {
    inspector: Inspector,
    trigger_rx: mpsc::UnboundedReceiver<ListId>,
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
    _file: NamedTempFile,
}

impl Session {
    async fn open() -> Self {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(RECORDING.as_bytes()).unwrap();

        let state = load_session(file.path(), None, DisplayPrefs::default(), |_| {})
            .await
            .unwrap();
        assert_eq!(state.tick(), 32);

        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        let inspector = Inspector::new(state, &Config::default(), trigger_tx, task_tx);

        Self {
            inspector,
            trigger_rx,
            task_rx,
            _file: file,
        }
    }

    /// Delivers debounce triggers and filter results until things go quiet.
    async fn settle(&mut self) {
        loop {
            tokio::select! {
                Some(list) = self.trigger_rx.recv() => self.inspector.on_debounce(list),
                Some(result) = self.task_rx.recv() => self.inspector.on_task_result(result),
                () = tokio::time::sleep(Duration::from_secs(1)) => break,
            }
        }
    }

    fn visible_fields(&self) -> Vec<String> {
        self.inspector
            .field_bar()
            .visible()
            .map(|view| view.iter().map(|row| row.joined_named_path.clone()).collect())
            .unwrap_or_default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_fields_sorted_by_path_then_filtered() {
    let mut s = Session::open().await;

    s.inspector.handle_action(Action::Activate);
    s.settle().await;
    assert_eq!(s.visible_fields(), ["A", "B.C", "AB"]);

    s.inspector.handle_action(Action::SwitchFocus);
    s.inspector.handle_action(Action::EnterFilter);
    s.inspector.handle_action(Action::FilterInput('a'));
    s.settle().await;

    assert_eq!(s.visible_fields(), ["A", "AB"]);
    assert_eq!(s.inspector.counts(ListId::Fields), (2, 3));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_regex_shows_unfiltered_list() {
    let mut s = Session::open().await;
    s.inspector.handle_action(Action::Activate);
    s.settle().await;

    s.inspector.handle_action(Action::SwitchFocus);
    s.inspector.handle_action(Action::ToggleRegex);
    s.inspector.handle_action(Action::FilterInput('['));

    // reported before the quiet period ends
    assert!(s.inspector.field_bar().regex_error().is_some());

    s.settle().await;
    assert_eq!(s.visible_fields(), ["A", "B.C", "AB"]);

    s.inspector.handle_action(Action::FilterBackspace);
    s.inspector.handle_action(Action::FilterInput('^'));
    s.inspector.handle_action(Action::FilterInput('A'));
    s.inspector.handle_action(Action::FilterInput('B'));
    assert!(s.inspector.field_bar().regex_error().is_none());
    s.settle().await;
    assert_eq!(s.visible_fields(), ["AB"]);
}

#[tokio::test(start_paused = true)]
async fn test_selection_survives_seek_to_prestart() {
    let mut s = Session::open().await;
    s.inspector.handle_action(Action::Activate);
    s.settle().await;
    assert_eq!(s.inspector.state.selection().selected_entity(), Some(0));

    s.inspector.handle_action(Action::SeekStart);
    s.settle().await;
    assert_eq!(s.inspector.state.tick(), -1);
    assert_eq!(s.inspector.state.selection().selected_entity(), Some(0));
    assert!(s.inspector.entity_bar().visible().is_none());

    s.inspector.handle_action(Action::SeekEnd);
    s.settle().await;
    assert_eq!(s.visible_fields(), ["A", "B.C", "AB"]);
}
