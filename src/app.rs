use std::collections::VecDeque;

use log::{debug, info};
use ratatui::{
    layout::{Position, Rect},
    text::Text,
    widgets::ListState,
};

use crate::event::{Focus, Target, UiEvent};
use crate::loader::LoadMsg;
use crate::pager::{PageChange, Pager};
use crate::render;
use crate::source::Document;
use crate::widget::{Dropdown, Sidebar, SidebarEntry, SidebarSection};

/// What the content pane shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Empty,
    Loading { url: String },
    Loaded { document: Document, text: Text<'static> },
    /// The literal failure message replaces the document.
    Failed { url: String, message: String },
}

/// Entries of the dropdown menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NextPage,
    PreviousPage,
    GoToPage,
    DisablePaging,
    ToggleSidebar,
    Reload,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 7] = [
        MenuAction::NextPage,
        MenuAction::PreviousPage,
        MenuAction::GoToPage,
        MenuAction::DisablePaging,
        MenuAction::ToggleSidebar,
        MenuAction::Reload,
        MenuAction::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::NextPage => "Next page",
            MenuAction::PreviousPage => "Previous page",
            MenuAction::GoToPage => "Go to page…",
            MenuAction::DisablePaging => "Turn paging off",
            MenuAction::ToggleSidebar => "Toggle sidebar",
            MenuAction::Reload => "Reload",
            MenuAction::Quit => "Quit",
        }
    }
}

/// Screen regions from the last draw, used to hit-test mouse clicks.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitAreas {
    pub menu_button: Rect,
    /// Inner area of the open menu (one row per item).
    pub menu_list: Rect,
    /// Inner area of the sidebar list.
    pub sidebar: Rect,
    pub content: Rect,
}

pub struct App {
    pub pager: Pager,
    pub content: Content,
    /// Vertical scroll offset of the content pane.
    pub scroll: u16,
    pub dropdown: Dropdown,
    pub sidebar: Sidebar,
    /// Scroll state of the sidebar list.
    pub sidebar_list: ListState,
    /// Text typed into the go-to-page prompt, while it is open.
    pub prompt: Option<String>,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last load status message.
    pub status: String,
    pub areas: HitAreas,
    /// Location the main loop should hand to the loader.
    pending_load: Option<String>,
    /// Events raised by handlers, delivered after the current one.
    queued: VecDeque<UiEvent>,
}

impl App {
    pub fn new(pager: Pager, sidebar: Vec<SidebarSection>) -> Self {
        let labels = MenuAction::ALL.iter().map(|a| a.label().to_string()).collect();
        Self {
            pager,
            content: Content::Empty,
            scroll: 0,
            dropdown: Dropdown::new("Menu", labels),
            sidebar: Sidebar::new(sidebar),
            sidebar_list: ListState::default(),
            prompt: None,
            quit: false,
            status: "Starting…".into(),
            areas: HitAreas::default(),
            pending_load: None,
            queued: VecDeque::new(),
        }
    }

    // -- loading -------------------------------------------------------------

    /// Resolve the current URL and ask the main loop to load it.
    pub fn request_load(&mut self) {
        let url = self.pager.load_url();
        debug!("requesting load of {url}");
        self.status = format!("Loading {url}…");
        self.content = Content::Loading { url: url.clone() };
        self.scroll = 0;
        self.pending_load = Some(url);
    }

    pub fn take_load_request(&mut self) -> Option<String> {
        self.pending_load.take()
    }

    /// Show the outcome of a load.  Callers drop superseded messages first.
    pub fn apply_load(&mut self, msg: LoadMsg) {
        match msg {
            LoadMsg::Loaded { document, .. } => {
                let text = render::to_text(&document.body);
                self.status = format!(
                    "Loaded {} at {}",
                    document.title().unwrap_or(&document.url),
                    document.loaded_at.format("%H:%M:%S")
                );
                info!("showing {}", document.url);
                self.content = Content::Loaded { document, text };
            }
            LoadMsg::Failed { url, error, .. } => {
                self.status = format!("Error loading {url}");
                self.content = Content::Failed {
                    url,
                    message: format!("Failed to load README: {error}"),
                };
            }
        }
        self.scroll = 0;
    }

    fn reload_if(&mut self, change: PageChange) {
        match change {
            PageChange::Changed => self.request_load(),
            PageChange::Unchanged if !self.pager.is_paged() => {
                self.status = "Paging is off; press g to pick a page".into();
            }
            PageChange::Unchanged => {}
        }
    }

    // -- paging --------------------------------------------------------------

    pub fn next_page(&mut self) {
        let change = self.pager.step(1);
        self.reload_if(change);
    }

    pub fn previous_page(&mut self) {
        let change = self.pager.step(-1);
        self.reload_if(change);
    }

    pub fn go_to_page(&mut self, value: &str) {
        let change = self.pager.set(value);
        self.reload_if(change);
    }

    pub fn disable_paging(&mut self) {
        if self.pager.disable() == PageChange::Changed {
            self.request_load();
        }
    }

    pub fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
    }

    pub fn submit_prompt(&mut self) {
        if let Some(value) = self.prompt.take() {
            self.go_to_page(&value);
        }
    }

    // -- menu and sidebar ----------------------------------------------------

    pub fn run_menu_action(&mut self, index: usize) {
        let Some(action) = MenuAction::ALL.get(index).copied() else {
            return;
        };
        debug!("menu action {action:?}");
        match action {
            MenuAction::NextPage => self.next_page(),
            MenuAction::PreviousPage => self.previous_page(),
            MenuAction::GoToPage => self.open_prompt(),
            MenuAction::DisablePaging => self.disable_paging(),
            MenuAction::ToggleSidebar => self.toggle_sidebar(),
            MenuAction::Reload => self.request_load(),
            MenuAction::Quit => self.quit = true,
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar.toggle();
        let focus = if self.sidebar.is_open() {
            Focus::Sidebar
        } else {
            Focus::Content
        };
        self.emit(UiEvent::FocusChange(focus));
    }

    pub fn select_sidebar_entry(&mut self, section: usize, entry: usize) {
        if let Some(entry) = self.sidebar.entry(section, entry).cloned() {
            self.open_entry(entry);
        }
    }

    fn open_entry(&mut self, entry: SidebarEntry) {
        info!("sidebar selected {}", entry.label);
        let change = self.pager.retarget(entry.url, entry.baseurl);
        self.reload_if(change);
    }

    // -- focus and events ----------------------------------------------------

    pub fn focus(&self) -> Focus {
        self.dropdown
            .focus()
            .or_else(|| self.sidebar.is_focused().then_some(Focus::Sidebar))
            .unwrap_or(Focus::Content)
    }

    /// Next focus stop: content → menu button → sidebar (when open).
    pub fn next_focus(&self, forward: bool) -> Focus {
        let mut stops = vec![Focus::Content, Focus::MenuButton];
        if self.sidebar.is_open() {
            stops.push(Focus::Sidebar);
        }
        let current = match self.focus() {
            Focus::MenuItem(_) => Focus::MenuButton,
            other => other,
        };
        let i = stops.iter().position(|f| *f == current).unwrap_or(0);
        let n = stops.len();
        if forward {
            stops[(i + 1) % n]
        } else {
            stops[(i + n - 1) % n]
        }
    }

    /// Queue an event to be dispatched after the current one.
    pub fn emit(&mut self, event: UiEvent) {
        self.queued.push_back(event);
    }

    pub fn next_queued(&mut self) -> Option<UiEvent> {
        self.queued.pop_front()
    }

    /// Map a screen cell to the widget under it.
    pub fn hit_test(&self, column: u16, row: u16) -> Target {
        let pos = Position::new(column, row);
        if self.dropdown.is_open() && self.areas.menu_list.contains(pos) {
            return Target::MenuItem(usize::from(row - self.areas.menu_list.y));
        }
        if self.areas.menu_button.contains(pos) {
            return Target::MenuButton;
        }
        if self.sidebar.is_open() && self.areas.sidebar.contains(pos) {
            let offset = self.sidebar_list.offset();
            return Target::SidebarRow(usize::from(row - self.areas.sidebar.y) + offset);
        }
        if self.areas.content.contains(pos) {
            return Target::Content;
        }
        Target::Elsewhere
    }

    // -- scrolling -----------------------------------------------------------

    fn max_scroll(&self) -> u16 {
        let lines = match &self.content {
            Content::Loaded { text, .. } => text.lines.len(),
            _ => 0,
        };
        u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.max_scroll()));
        self.scroll = u16::try_from(next).unwrap_or(0);
    }

    pub fn scroll_page(&mut self, forward: bool) {
        let page = i32::from(self.areas.content.height.saturating_sub(2).max(1));
        self.scroll_by(if forward { page } else { -page });
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ReadmeSource;
    use crate::source::FetchError;

    fn app(index: Option<&str>) -> App {
        let source = ReadmeSource::new(Some("page{i}"), None::<String>, index);
        let sections = vec![SidebarSection {
            title: "Guides".into(),
            entries: vec![SidebarEntry {
                label: "Setup".into(),
                url: Some("setup.md".into()),
                baseurl: None,
            }],
        }];
        App::new(Pager::new(source), sections)
    }

    fn loaded(body: &str) -> LoadMsg {
        LoadMsg::Loaded {
            generation: 1,
            document: Document::new("https://example.com/page1.md", body),
        }
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_empty() {
        let mut app = app(None);
        assert_eq!(app.content, Content::Empty);
        assert!(!app.quit);
        assert!(app.take_load_request().is_none());
        assert_eq!(app.focus(), Focus::Content);
        assert_eq!(app.dropdown.items().len(), MenuAction::ALL.len());
    }

    // -- loading -------------------------------------------------------------

    #[test]
    fn request_load_resolves_current_url() {
        let mut app = app(Some("3"));
        app.request_load();
        assert_eq!(app.take_load_request().as_deref(), Some("page3.md"));
        assert_eq!(app.content, Content::Loading { url: "page3.md".into() });
        assert!(app.take_load_request().is_none());
    }

    #[test]
    fn apply_loaded_renders_document() {
        let mut app = app(None);
        app.apply_load(loaded("# Hello\n\nbody"));
        match &app.content {
            Content::Loaded { document, text } => {
                assert_eq!(document.title(), Some("Hello"));
                assert!(!text.lines.is_empty());
            }
            other => panic!("unexpected content: {other:?}"),
        }
        assert!(app.status.starts_with("Loaded Hello at "));
    }

    #[test]
    fn apply_failed_shows_literal_message() {
        let mut app = app(None);
        app.apply_load(LoadMsg::Failed {
            generation: 1,
            url: "https://example.com/x.md".into(),
            error: FetchError::Status {
                code: 500,
                text: "Internal Server Error".into(),
            },
        });
        assert_eq!(
            app.content,
            Content::Failed {
                url: "https://example.com/x.md".into(),
                message: "Failed to load README: HTTP 500 Internal Server Error".into(),
            }
        );
    }

    // -- paging --------------------------------------------------------------

    #[test]
    fn next_page_without_index_does_not_reload() {
        let mut app = app(None);
        app.next_page();
        assert!(app.take_load_request().is_none());
        assert!(app.status.contains("Paging is off"));
    }

    #[test]
    fn next_and_previous_page_reload() {
        let mut app = app(Some("1"));
        app.next_page();
        assert_eq!(app.take_load_request().as_deref(), Some("page2.md"));
        app.previous_page();
        app.previous_page();
        assert_eq!(app.take_load_request().as_deref(), Some("page0.md"));
    }

    #[test]
    fn prompt_submission_sets_page() {
        let mut app = app(None);
        app.open_prompt();
        app.prompt.as_mut().unwrap().push_str("x");
        app.submit_prompt();
        assert!(app.prompt.is_none());
        assert_eq!(app.take_load_request().as_deref(), Some("page0.md"));
        assert!(app.pager.is_paged());
    }

    #[test]
    fn disable_paging_reloads_once() {
        let mut app = app(Some("4"));
        app.disable_paging();
        assert_eq!(app.take_load_request().as_deref(), Some("page.md"));
        app.disable_paging();
        assert!(app.take_load_request().is_none());
    }

    // -- menu and sidebar ----------------------------------------------------

    #[test]
    fn menu_actions_map_to_operations() {
        let mut app = app(Some("1"));
        app.run_menu_action(0);
        assert_eq!(app.take_load_request().as_deref(), Some("page2.md"));
        app.run_menu_action(2);
        assert_eq!(app.prompt.as_deref(), Some(""));
        app.run_menu_action(6);
        assert!(app.quit);
    }

    #[test]
    fn out_of_range_menu_action_is_ignored() {
        let mut app = app(None);
        app.run_menu_action(99);
        assert!(!app.quit);
        assert!(app.take_load_request().is_none());
    }

    #[test]
    fn toggle_sidebar_queues_focus_change() {
        let mut app = app(None);
        app.toggle_sidebar();
        assert!(app.sidebar.is_open());
        assert_eq!(app.next_queued(), Some(UiEvent::FocusChange(Focus::Sidebar)));
    }

    #[test]
    fn sidebar_selection_retargets_pager() {
        let mut app = app(Some("2"));
        app.select_sidebar_entry(0, 0);
        assert_eq!(app.take_load_request().as_deref(), Some("setup2.md"));
    }

    #[test]
    fn focus_cycle_skips_closed_sidebar() {
        let app = app(None);
        assert_eq!(app.next_focus(true), Focus::MenuButton);
        assert_eq!(app.next_focus(false), Focus::MenuButton);
    }

    // -- scrolling -----------------------------------------------------------

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut app = app(None);
        app.apply_load(loaded("a\n\nb\n\nc"));
        app.scroll_by(-3);
        assert_eq!(app.scroll, 0);
        app.scroll_by(100);
        assert_eq!(app.scroll, app.max_scroll());
        app.scroll_to_top();
        assert_eq!(app.scroll, 0);
    }

    // -- hit testing ---------------------------------------------------------

    #[test]
    fn hit_test_maps_regions() {
        let mut app = app(None);
        app.areas = HitAreas {
            menu_button: Rect::new(0, 0, 10, 1),
            menu_list: Rect::new(1, 2, 20, 7),
            sidebar: Rect::new(0, 2, 20, 10),
            content: Rect::new(20, 1, 60, 20),
        };
        assert_eq!(app.hit_test(3, 0), Target::MenuButton);
        assert_eq!(app.hit_test(30, 5), Target::Content);
        assert_eq!(app.hit_test(79, 23), Target::Elsewhere);
        // Closed widgets do not receive clicks.
        assert_eq!(app.hit_test(5, 4), Target::Elsewhere);

        app.dropdown.open();
        assert_eq!(app.hit_test(5, 4), Target::MenuItem(2));
    }
}
