//! Collapsible sidebar with nested submenus.
//!
//! The sidebar is open or closed, and holds sections that each expand into a
//! submenu of entries.  Only one section is expanded at a time: expanding one
//! collapses the rest.  Choosing an entry reports it so the app can point the
//! pager at the entry's URL.

use log::debug;
use serde::Deserialize;

use crate::event::{Focus, Key, Target, UiEvent};

/// A document link inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SidebarEntry {
    pub label: String,
    /// URL template, same rules as the top-level `url` option.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub baseurl: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SidebarSection {
    pub title: String,
    #[serde(default)]
    pub entries: Vec<SidebarEntry>,
}

/// One visible line of the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Section(usize),
    Entry { section: usize, entry: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarOutcome {
    Ignored,
    Consumed,
    /// An entry was chosen.
    Selected { section: usize, entry: usize },
}

#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    sections: Vec<SidebarSection>,
    open: bool,
    expanded: Option<usize>,
    /// Index into [`Sidebar::rows`].
    cursor: usize,
    focused: bool,
}

impl Sidebar {
    pub fn new(sections: Vec<SidebarSection>) -> Self {
        Self {
            sections,
            ..Self::default()
        }
    }

    pub fn sections(&self) -> &[SidebarSection] {
        &self.sections
    }

    pub fn entry(&self, section: usize, entry: usize) -> Option<&SidebarEntry> {
        self.sections.get(section)?.entries.get(entry)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_focused(&self) -> bool {
        self.focused && self.open
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        if !self.open {
            self.focused = false;
        }
        debug!("sidebar {}", if self.open { "open" } else { "closed" });
    }

    /// Expand `section`, collapsing any other; expanding the already expanded
    /// section collapses it.
    pub fn toggle_section(&mut self, section: usize) {
        if section >= self.sections.len() {
            return;
        }
        self.expanded = if self.expanded == Some(section) {
            None
        } else {
            Some(section)
        };
        debug!("sidebar expanded section: {:?}", self.expanded);
        self.cursor = self
            .rows()
            .iter()
            .position(|r| *r == Row::Section(section))
            .unwrap_or(0);
    }

    /// Visible rows: every section title, plus the entries of the expanded
    /// one.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            rows.push(Row::Section(i));
            if self.expanded == Some(i) {
                rows.extend((0..section.entries.len()).map(|entry| Row::Entry { section: i, entry }));
            }
        }
        rows
    }

    fn activate_row(&mut self, index: usize) -> SidebarOutcome {
        let Some(row) = self.rows().get(index).copied() else {
            return SidebarOutcome::Ignored;
        };
        self.cursor = index;
        match row {
            Row::Section(section) => {
                self.toggle_section(section);
                SidebarOutcome::Consumed
            }
            Row::Entry { section, entry } => SidebarOutcome::Selected { section, entry },
        }
    }

    pub fn handle(&mut self, event: &UiEvent) -> SidebarOutcome {
        match *event {
            UiEvent::Click(Target::SidebarRow(i)) if self.open => {
                self.focused = true;
                self.activate_row(i)
            }
            UiEvent::FocusChange(focus) => {
                self.focused = focus == Focus::Sidebar && self.open;
                SidebarOutcome::Ignored
            }
            UiEvent::KeyPress(key) if self.is_focused() => self.handle_key(key),
            _ => SidebarOutcome::Ignored,
        }
    }

    fn handle_key(&mut self, key: Key) -> SidebarOutcome {
        let rows = self.rows();
        let last = rows.len().saturating_sub(1);
        match key {
            Key::Down => self.cursor = (self.cursor + 1).min(last),
            Key::Up => self.cursor = self.cursor.saturating_sub(1),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = last,
            Key::Enter | Key::Space => return self.activate_row(self.cursor),
            Key::Right => {
                if let Some(Row::Section(s)) = rows.get(self.cursor) {
                    if self.expanded != Some(*s) {
                        self.toggle_section(*s);
                    }
                }
            }
            Key::Left => match rows.get(self.cursor) {
                Some(Row::Entry { section, .. }) | Some(Row::Section(section))
                    if self.expanded == Some(*section) =>
                {
                    self.toggle_section(*section);
                }
                _ => {}
            },
            Key::Escape => self.toggle(),
            _ => return SidebarOutcome::Ignored,
        }
        SidebarOutcome::Consumed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
