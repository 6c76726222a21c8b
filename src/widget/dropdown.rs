//! Dropdown menu with roving focus.
//!
//! The menu is either closed (focus may sit on its button) or open with focus
//! on one item.  Arrow keys move between items with wraparound; Escape, an
//! outside click or focus leaving the menu close it; activating an item
//! closes it and reports which item was chosen.

use log::debug;

use crate::event::{Focus, Key, Target, UiEvent};

/// What the dropdown did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownOutcome {
    /// Not for the dropdown; let other handlers see it.
    Ignored,
    /// Consumed by the dropdown.
    Consumed,
    /// The item at this index was chosen.  The menu is now closed.
    Activated(usize),
}

#[derive(Debug, Clone)]
pub struct Dropdown {
    label: String,
    items: Vec<String>,
    open: bool,
    /// Focused item while open.
    focused: Option<usize>,
    button_focused: bool,
}

impl Dropdown {
    pub fn new(label: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            label: label.into(),
            items,
            open: false,
            focused: None,
            button_focused: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Focused item index, only while open.
    pub fn focused_item(&self) -> Option<usize> {
        self.focused.filter(|_| self.open)
    }

    /// Where focus sits inside the dropdown, if anywhere.
    pub fn focus(&self) -> Option<Focus> {
        match self.focused_item() {
            Some(i) => Some(Focus::MenuItem(i)),
            None if self.button_focused => Some(Focus::MenuButton),
            None => None,
        }
    }

    pub fn open(&mut self) {
        if self.items.is_empty() {
            return;
        }
        debug!("dropdown open");
        self.open = true;
        self.focused = Some(0);
        self.button_focused = false;
    }

    /// Close and return focus to the button.
    pub fn close(&mut self) {
        if self.open {
            debug!("dropdown close");
        }
        self.open = false;
        self.focused = None;
        self.button_focused = true;
    }

    fn dismiss(&mut self) {
        self.close();
        self.button_focused = false;
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    fn focus_next(&mut self) {
        let n = self.items.len();
        self.focused = Some(match self.focused {
            Some(i) => (i + 1) % n,
            None => 0,
        });
    }

    fn focus_previous(&mut self) {
        let n = self.items.len();
        self.focused = Some(match self.focused {
            Some(i) => (i + n - 1) % n,
            None => n - 1,
        });
    }

    fn activate(&mut self, index: usize) -> DropdownOutcome {
        if index >= self.items.len() {
            return DropdownOutcome::Ignored;
        }
        debug!("dropdown activate {index} ({})", self.items[index]);
        self.close();
        DropdownOutcome::Activated(index)
    }

    pub fn handle(&mut self, event: &UiEvent) -> DropdownOutcome {
        match *event {
            UiEvent::Click(Target::MenuButton) => {
                self.toggle();
                DropdownOutcome::Consumed
            }
            UiEvent::Click(Target::MenuItem(i)) if self.open => self.activate(i),
            UiEvent::Click(_) | UiEvent::OutsideClick => {
                if self.open {
                    self.dismiss();
                }
                DropdownOutcome::Ignored
            }
            UiEvent::KeyPress(key) if self.open => self.handle_open_key(key),
            UiEvent::KeyPress(Key::Down | Key::Enter | Key::Space) if self.button_focused => {
                self.open();
                DropdownOutcome::Consumed
            }
            UiEvent::KeyPress(_) => DropdownOutcome::Ignored,
            UiEvent::FocusChange(focus) => {
                match focus {
                    Focus::MenuButton => {
                        self.open = false;
                        self.focused = None;
                        self.button_focused = true;
                    }
                    Focus::MenuItem(i) if self.open && i < self.items.len() => {
                        self.focused = Some(i);
                    }
                    _ => self.dismiss(),
                }
                DropdownOutcome::Ignored
            }
        }
    }

    fn handle_open_key(&mut self, key: Key) -> DropdownOutcome {
        match key {
            Key::Escape => {
                self.close();
                DropdownOutcome::Consumed
            }
            Key::Down => {
                self.focus_next();
                DropdownOutcome::Consumed
            }
            Key::Up => {
                self.focus_previous();
                DropdownOutcome::Consumed
            }
            Key::Enter | Key::Space => match self.focused {
                Some(i) => self.activate(i),
                None => DropdownOutcome::Consumed,
            },
            // Tab moves focus normally; the resulting FocusChange closes us.
            _ => DropdownOutcome::Ignored,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
