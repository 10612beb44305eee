pub mod error;
pub use error::AppError;

pub mod config;

pub mod logging;

pub mod model {
    pub mod path;
    pub use path::{FieldPath, compare_paths, sort_by_path};

    pub mod snapshot;
    pub use snapshot::Snapshot;

    pub mod entries;
    pub use entries::{
        EntityEntry, FieldEntry, FieldRow, SearchKey, StringTableEntry, StringTableItemEntry,
        StringTableItemRow,
    };

    pub mod selection;
    pub use selection::Selection;

    pub mod app_state;
    pub use app_state::{DemView, DisplayPrefs, InspectorState};

    pub mod ui_state;
    pub use ui_state::{InputMode, LoadStage, Pane, RedrawFlag, UIState};
}

pub mod search {
    pub mod query;
    pub use query::FilterQuery;

    pub mod predicate;
    pub use predicate::{RegexError, SearchPredicate, compile};
}

pub mod filter {
    pub mod view;
    pub use view::{FilteredView, apply};

    pub mod controller;
    pub use controller::{FilterController, FilterJob, FilterOutcome, ListId, RecomputeTrigger};

    pub mod bar;
    pub use bar::FilterBar;
}

pub mod source {
    pub mod demo_source;
    pub use demo_source::{DemoSource, HandleCodec};

    pub mod handle;
    pub use handle::Source2Handles;

    pub mod recorded;
    pub use recorded::{RecordedDemo, Recording};
}

pub mod controller {
    pub mod actions;
    pub use actions::Action;

    pub mod handle_resolver;
    pub use handle_resolver::{HandleResolver, HandleState};

    pub mod selection_coordinator;
    pub use selection_coordinator::{SelectionCoordinator, SelectionDisplay};

    pub mod inspector;
    pub use inspector::Inspector;

    pub mod event_loop;
    pub use event_loop::{EventLoop, Session, TaskResult};
}

pub mod tasks {
    pub mod filter_task;
}

pub mod util {
    pub mod debounce;
    pub use debounce::{DebounceConfig, Debouncer};

    pub mod humanize;
}

pub mod view {
    pub mod icons;

    pub mod theme;

    pub mod ui;

    pub mod components {
        pub mod list_pane;

        pub mod entity_list;
        pub use entity_list::EntityList;
        pub mod field_list;
        pub use field_list::FieldList;
        pub mod string_tables;
        pub use string_tables::{StringTableItemList, StringTableList};
        pub mod filter_bar;
        pub use filter_bar::FilterBarView;
        pub mod tick_bar;
        pub use tick_bar::TickBar;
        pub mod status_bar;
        pub use status_bar::StatusBar;
        pub mod help_overlay;
        pub use help_overlay::HelpOverlay;
        pub mod loading_overlay;
        pub use loading_overlay::LoadingOverlay;
    }
}
