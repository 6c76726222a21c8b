//! Toolkit-independent UI events and handler registration.
//!
//! Terminal input is translated into [`UiEvent`]s by [`crate::input`]; the
//! widgets only ever see these types, never crossterm's.  A [`Dispatcher`]
//! keeps handlers registered per [`EventKind`] and calls them in order until
//! one stops propagation.

use log::trace;

/// A key, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Escape,
    Tab,
    BackTab,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Char(char),
}

/// The part of the screen a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    MenuButton,
    MenuItem(usize),
    /// A visible sidebar row.
    SidebarRow(usize),
    Content,
    Elsewhere,
}

/// What currently holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Content,
    MenuButton,
    MenuItem(usize),
    Sidebar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Click(Target),
    /// A click outside the widget receiving it.
    OutsideClick,
    KeyPress(Key),
    FocusChange(Focus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    OutsideClick,
    KeyPress,
    FocusChange,
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::Click(_) => EventKind::Click,
            UiEvent::OutsideClick => EventKind::OutsideClick,
            UiEvent::KeyPress(_) => EventKind::KeyPress,
            UiEvent::FocusChange(_) => EventKind::FocusChange,
        }
    }
}

/// Whether a handler consumed the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub type Handler<S> = fn(&mut S, &UiEvent) -> Flow;

/// Ordered handler table over some state `S`.
pub struct Dispatcher<S> {
    handlers: Vec<(EventKind, &'static str, Handler<S>)>,
}

impl<S> Dispatcher<S> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register `handler` for events of `kind`.  Handlers run in registration
    /// order.
    pub fn on(mut self, kind: EventKind, name: &'static str, handler: Handler<S>) -> Self {
        self.handlers.push((kind, name, handler));
        self
    }

    /// Deliver `event`, returning [`Flow::Stop`] if some handler consumed it.
    pub fn dispatch(&self, state: &mut S, event: &UiEvent) -> Flow {
        let kind = event.kind();
        for (_, name, handler) in self.handlers.iter().filter(|(k, _, _)| *k == kind) {
            if handler(state, event) == Flow::Stop {
                trace!("{event:?} handled by {name}");
                return Flow::Stop;
            }
        }
        trace!("{event:?} unhandled");
        Flow::Continue
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<&'static str>);

    fn first(log: &mut Log, _: &UiEvent) -> Flow {
        log.0.push("first");
        Flow::Continue
    }

    fn stopper(log: &mut Log, _: &UiEvent) -> Flow {
        log.0.push("stopper");
        Flow::Stop
    }

    fn never(log: &mut Log, _: &UiEvent) -> Flow {
        log.0.push("never");
        Flow::Continue
    }

    #[test]
    fn handlers_run_in_order_until_stopped() {
        let d = Dispatcher::new()
            .on(EventKind::KeyPress, "first", first)
            .on(EventKind::KeyPress, "stopper", stopper)
            .on(EventKind::KeyPress, "never", never);
        let mut log = Log::default();

        let flow = d.dispatch(&mut log, &UiEvent::KeyPress(Key::Enter));
        assert_eq!(flow, Flow::Stop);
        assert_eq!(log.0, vec!["first", "stopper"]);
    }

    #[test]
    fn only_matching_kind_is_called() {
        let d = Dispatcher::new()
            .on(EventKind::Click, "stopper", stopper)
            .on(EventKind::OutsideClick, "first", first);
        let mut log = Log::default();

        let flow = d.dispatch(&mut log, &UiEvent::OutsideClick);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(log.0, vec!["first"]);
    }

    #[test]
    fn event_kind_matches_variant() {
        assert_eq!(UiEvent::Click(Target::Content).kind(), EventKind::Click);
        assert_eq!(
            UiEvent::FocusChange(Focus::Sidebar).kind(),
            EventKind::FocusChange
        );
    }
}
