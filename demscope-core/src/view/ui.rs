//! src/view/ui.rs
//! ============================================================
//! Frame renderer. Draws the session screen, or for a ready session:
//! tick bar, list | detail panes under their filter bars, status bar,
//! and the help overlay on top.

use std::time::{Duration, Instant};

use ratatui::prelude::*;
use tracing::{instrument, warn};

use crate::controller::event_loop::Session;
use crate::controller::inspector::Inspector;
use crate::filter::bar::FilterBar;
use crate::filter::controller::ListId;
use crate::model::entries::SearchKey;
use crate::model::ui_state::{InputMode, Pane};
use crate::view::components::{
    entity_list::EntityList,
    field_list::FieldList,
    filter_bar::{self, FilterBarView},
    help_overlay::HelpOverlay,
    list_pane::{self, ListWindow},
    loading_overlay::LoadingOverlay,
    status_bar::StatusBar,
    string_tables::{StringTableItemList, StringTableList},
    tick_bar::TickBar,
};

const SLOW_FRAME: Duration = Duration::from_millis(16);

pub struct UIRenderer {
    cache: LayoutCache,
    stats: RenderStats,
}

#[derive(Default)]
struct LayoutCache {
    screen: Rect,
    /// tick bar, panes, status bar
    main: [Rect; 3],
    hit: u64,
    miss: u64,
}

#[derive(Debug, Default)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

impl RenderStats {
    pub fn average(&self) -> Duration {
        if self.frames == 0 {
            Duration::ZERO
        } else {
            self.total / u32::try_from(self.frames).unwrap_or(u32::MAX)
        }
    }
}

impl UIRenderer {
    pub fn new() -> Self {
        Self {
            cache: LayoutCache::default(),
            stats: RenderStats::default(),
        }
    }

    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, f: &mut Frame<'_>, session: &mut Session) {
        let start = Instant::now();
        let screen = f.area();

        match session {
            Session::Loading(stage) => {
                LoadingOverlay::new().render_stage(f, *stage, centered(screen, 50, 5));
            }
            Session::Failed(message) => {
                LoadingOverlay::new().render_failure(f, message, centered(screen, 70, 7));
            }
            Session::Ready(inspector) => self.draw_inspector(f, inspector),
        }

        let elapsed = start.elapsed();
        self.stats.total += elapsed;
        self.stats.frames += 1;
        if elapsed > SLOW_FRAME {
            self.stats.slow += 1;
            warn!(elapsed_ms = elapsed.as_millis() as u64, "slow frame");
        }
    }

    fn update_layout_cache(&mut self, screen: Rect) {
        if self.cache.screen == screen {
            self.cache.hit += 1;
            return;
        }
        self.cache.screen = screen;
        self.cache.miss += 1;
        self.cache.main = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(screen);
    }

    fn draw_inspector(&mut self, f: &mut Frame<'_>, inspector: &mut Inspector) {
        self.update_layout_cache(f.area());
        let [tick_area, panes_area, status_area] = self.cache.main;

        let state = &inspector.state;
        TickBar::new(state.tick(), state.total_ticks(), state.view()).render(f, tick_area);

        let [list_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(panes_area);

        let shows_entities = inspector.state.view().shows_entities();
        let (left, right) = if shows_entities {
            (ListId::Entities, ListId::Fields)
        } else {
            (ListId::StringTables, ListId::StringTableItems)
        };

        let left_rows = self.draw_pane(f, inspector, left, list_area);
        let right_rows = self.draw_pane(f, inspector, right, detail_area);

        let focused_rows = match inspector.ui.focus {
            Pane::List => left_rows,
            Pane::Detail => right_rows,
        };
        inspector.set_page_rows(focused_rows);

        let list = inspector.focused_list();
        let (visible, total) = inspector.counts(list);
        StatusBar::new(
            inspector.ui.mode,
            list,
            visible,
            total,
            inspector.ui.notice.as_deref(),
        )
        .render(f, status_area);

        if inspector.ui.show_help {
            HelpOverlay::new().render(f, centered(f.area(), 60, 26));
        }
    }

    /// Draws one pane with its filter bar; returns the list height in rows.
    fn draw_pane(&mut self, f: &mut Frame<'_>, inspector: &mut Inspector, list: ListId, area: Rect) -> usize {
        let focused = inspector.focused_list() == list;
        let editing = inspector.ui.mode == InputMode::Filter;

        let has_error = match list {
            ListId::Entities => inspector.entity_bar().regex_error().is_some(),
            ListId::Fields => inspector.field_bar().regex_error().is_some(),
            ListId::StringTables => inspector.table_bar().regex_error().is_some(),
            ListId::StringTableItems => inspector.item_bar().regex_error().is_some(),
        };
        let [bar_area, list_area] =
            Layout::vertical([Constraint::Length(filter_bar::height(has_error)), Constraint::Fill(1)])
                .areas(area);

        let height = list_pane::inner_height(list_area);
        let window = ListWindow {
            offset: inspector.ui.scroll_into_view(list, height),
            height,
            cursor: inspector.ui.cursor(list),
            focused,
        };

        // memoised; keeps the borrows below immutable
        let selection = inspector.state.selection_display();
        let inspector = &*inspector;
        let prefs = inspector.state.prefs;
        let selected = inspector.state.selection();

        match list {
            ListId::Entities => {
                bar_view(inspector.entity_bar(), editing).render(f, bar_area, focused);
                EntityList::new(
                    inspector.entity_bar().visible(),
                    selected.selected_entity(),
                    prefs.show_entity_index,
                )
                .render(f, list_area, inspector.state.view().title(), &window);
            }
            ListId::Fields => {
                bar_view(inspector.field_bar(), editing).render(f, bar_area, focused);
                FieldList::new(inspector.field_bar().visible(), selection, inspector.resolver(), prefs)
                    .render(f, list_area, &window);
            }
            ListId::StringTables => {
                bar_view(inspector.table_bar(), editing).render(f, bar_area, focused);
                StringTableList::new(inspector.table_bar().visible(), selected.selected_string_table())
                    .render(f, list_area, &window);
            }
            ListId::StringTableItems => {
                bar_view(inspector.item_bar(), editing).render(f, bar_area, focused);
                StringTableItemList::new(inspector.item_bar().visible(), selected.selected_string_table())
                    .render(f, list_area, &window);
            }
        }

        height
    }
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn bar_view<T: SearchKey>(bar: &FilterBar<T>, editing: bool) -> FilterBarView<'_> {
    FilterBarView::new(bar.query(), bar.regex_error(), bar.is_busy(), editing)
}

/// Fixed-size box centred in `r`, shrunk to fit.
fn centered(r: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(r.width);
    let h = height.min(r.height);
    Rect {
        x: r.x + (r.width - w) / 2,
        y: r.y + (r.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc;

    use super::*;
    use crate::config::Config;
    use crate::controller::actions::Action;
    use crate::controller::event_loop::TaskResult;
    use crate::model::app_state::{DemView, DisplayPrefs, InspectorState};
    use crate::model::ui_state::LoadStage;
    use crate::source::recorded::RecordedDemo;
    use crate::view::components::{entity_list, field_list, string_tables};

    const RECORDING: &str = r#"{
        "total_ticks": 2000,
        "ticks": [
            { "tick": 1500,
              "entities": [{ "index": 7, "name": "CCitadelPlayerPawn", "fields": [
                  { "path": [0], "named_path": ["m_iHealth"], "value": "100",
                    "encoded_as": "int32", "decoded_as": "I64" }
              ]}],
              "string_tables": [{ "name": "userinfo", "items": [] }] }
        ]
    }"#;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    struct Harness {
        session: Session,
        task_rx: mpsc::UnboundedReceiver<TaskResult>,
        _trigger_rx: mpsc::UnboundedReceiver<ListId>,
    }

    impl Harness {
        fn new(tick: i32) -> Self {
            let demo = RecordedDemo::from_bytes(RECORDING.as_bytes()).unwrap();
            let mut state = InspectorState::new(Box::new(demo), DisplayPrefs::default());
            state.seek(tick).unwrap();
            let (trigger_tx, _trigger_rx) = mpsc::unbounded_channel();
            let (task_tx, task_rx) = mpsc::unbounded_channel();
            let inspector = Inspector::new(state, &Config::default(), trigger_tx, task_tx);
            Self {
                session: Session::Ready(Box::new(inspector)),
                task_rx,
                _trigger_rx,
            }
        }

        fn inspector(&mut self) -> &mut Inspector {
            self.session.inspector_mut().unwrap()
        }

        /// Lets spawned filter tasks finish and applies their results.
        async fn settle(&mut self) {
            for _ in 0..16 {
                tokio::task::yield_now().await;
            }
            while let Ok(result) = self.task_rx.try_recv() {
                self.inspector().on_task_result(result);
            }
        }

        fn draw(&mut self) -> String {
            draw(&mut self.session)
        }
    }

    fn draw(session: &mut Session) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        let mut renderer = UIRenderer::new();
        terminal.draw(|f| renderer.render(f, session)).unwrap();
        screen_text(&terminal)
    }

    #[tokio::test]
    async fn test_empty_states_before_start() {
        let mut h = Harness::new(-1);
        let text = h.draw();
        assert!(text.contains(entity_list::NO_ENTITIES));
        assert!(text.contains("tick -1 / 2,000"));
    }

    #[tokio::test]
    async fn test_entities_and_field_prompt() {
        let mut h = Harness::new(1500);
        let text = h.draw();
        assert!(text.contains("CCitadelPlayerPawn"));
        assert!(text.contains("to view entity fields"));
        assert!(text.contains("1/1"));

        h.inspector().handle_action(Action::Activate);
        h.settle().await;
        let text = h.draw();
        assert!(text.contains("m_iHealth = 100"));
        assert!(!text.contains(field_list::FIELDS_UNSELECTED));
    }

    #[tokio::test]
    async fn test_string_table_messages() {
        let mut h = Harness::new(1500);
        h.inspector().handle_action(Action::SetView(DemView::StringTables));
        h.settle().await;

        let text = h.draw();
        assert!(text.contains("userinfo"));
        assert!(text.contains(string_tables::ITEMS_UNSELECTED));

        h.inspector().handle_action(Action::Activate);
        h.settle().await;
        let text = h.draw();
        assert!(text.contains("userinfo string table appears to be empty"));
    }

    #[test]
    fn test_loading_and_failure_screens() {
        let text = draw(&mut Session::Loading(LoadStage::SeekingToTick(2_000)));
        assert!(text.contains("seeking to tick 2000"));

        let text = draw(&mut Session::Failed("malformed recording".into()));
        assert!(text.contains("malformed recording"));
        assert!(text.contains("press q to quit"));
    }

    #[test]
    fn test_layout_cache_hits_on_same_size() {
        let mut r = UIRenderer::new();
        r.update_layout_cache(Rect::new(0, 0, 100, 40));
        r.update_layout_cache(Rect::new(0, 0, 100, 40));
        assert_eq!(r.cache.hit, 1);
        assert_eq!(r.cache.miss, 1);
    }
}
