//! Terminal input handling.
//!
//! Converts crossterm key and mouse events into [`UiEvent`]s and routes them
//! through a [`Dispatcher`] whose handler table is built by [`dispatcher`].
//! Handlers may queue follow-up events on the [`App`] (focus changes, for
//! example); [`handle_event`] delivers those before returning.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a [`Key`] match arm in `global_keys` that calls it.
//! 3. Update the help text in [`crate::ui`]'s status bar.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::App;
use crate::event::{Dispatcher, EventKind, Flow, Focus, Key, Target, UiEvent};
use crate::widget::{DropdownOutcome, SidebarOutcome};

/// Build the handler table.  Order matters: the first handler to return
/// [`Flow::Stop`] wins.
pub fn dispatcher() -> Dispatcher<App> {
    Dispatcher::new()
        .on(EventKind::KeyPress, "prompt", prompt)
        .on(EventKind::Click, "dropdown", dropdown)
        .on(EventKind::OutsideClick, "dropdown", dropdown)
        .on(EventKind::KeyPress, "dropdown", dropdown)
        .on(EventKind::FocusChange, "dropdown", dropdown)
        .on(EventKind::Click, "sidebar", sidebar)
        .on(EventKind::KeyPress, "sidebar", sidebar)
        .on(EventKind::FocusChange, "sidebar", sidebar)
        .on(EventKind::KeyPress, "focus", focus_cycle)
        .on(EventKind::KeyPress, "global", global_keys)
        .on(EventKind::Click, "content", content_click)
}

/// Translate one terminal event and dispatch it plus anything it queues.
pub fn handle_event(app: &mut App, dispatcher: &Dispatcher<App>, event: Event) {
    let ui_event = match event {
        Event::Key(key) => key_event(key).map(UiEvent::KeyPress),
        Event::Mouse(mouse) => mouse_event(app, mouse),
        _ => None,
    };
    let Some(ui_event) = ui_event else {
        return;
    };

    dispatcher.dispatch(app, &ui_event);
    while let Some(queued) = app.next_queued() {
        dispatcher.dispatch(app, &queued);
    }
}

/// Map a crossterm key to a [`Key`].
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.  Ctrl-C maps to `q`.
pub fn key_event(key: KeyEvent) -> Option<Key> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Key::Char('q'));
    }

    Some(match key.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    })
}

fn mouse_event(app: &App, mouse: MouseEvent) -> Option<UiEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            Some(match app.hit_test(mouse.column, mouse.row) {
                Target::Elsewhere => UiEvent::OutsideClick,
                target => UiEvent::Click(target),
            })
        }
        MouseEventKind::ScrollDown => Some(UiEvent::KeyPress(Key::Down)),
        MouseEventKind::ScrollUp => Some(UiEvent::KeyPress(Key::Up)),
        _ => None,
    }
}

// -- handlers ----------------------------------------------------------------

fn prompt(app: &mut App, event: &UiEvent) -> Flow {
    let (Some(buffer), UiEvent::KeyPress(key)) = (app.prompt.as_mut(), event) else {
        return Flow::Continue;
    };
    match key {
        Key::Char(c) if c.is_ascii_digit() || *c == '-' => buffer.push(*c),
        Key::Backspace => {
            buffer.pop();
        }
        Key::Enter => app.submit_prompt(),
        Key::Escape => app.prompt = None,
        _ => {}
    }
    Flow::Stop
}

fn dropdown(app: &mut App, event: &UiEvent) -> Flow {
    match app.dropdown.handle(event) {
        DropdownOutcome::Ignored => Flow::Continue,
        DropdownOutcome::Consumed => Flow::Stop,
        DropdownOutcome::Activated(index) => {
            app.run_menu_action(index);
            Flow::Stop
        }
    }
}

fn sidebar(app: &mut App, event: &UiEvent) -> Flow {
    match app.sidebar.handle(event) {
        SidebarOutcome::Ignored => Flow::Continue,
        SidebarOutcome::Consumed => {
            if let UiEvent::Click(_) = event {
                app.emit(UiEvent::FocusChange(Focus::Sidebar));
            }
            Flow::Stop
        }
        SidebarOutcome::Selected { section, entry } => {
            app.select_sidebar_entry(section, entry);
            Flow::Stop
        }
    }
}

fn focus_cycle(app: &mut App, event: &UiEvent) -> Flow {
    let forward = match event {
        UiEvent::KeyPress(Key::Tab) => true,
        UiEvent::KeyPress(Key::BackTab) => false,
        _ => return Flow::Continue,
    };
    let next = app.next_focus(forward);
    app.emit(UiEvent::FocusChange(next));
    Flow::Stop
}

fn global_keys(app: &mut App, event: &UiEvent) -> Flow {
    let UiEvent::KeyPress(key) = event else {
        return Flow::Continue;
    };
    match key {
        Key::Char('q') => app.quit = true,
        Key::Char('n') | Key::Right => app.next_page(),
        Key::Char('p') | Key::Left => app.previous_page(),
        Key::Char('g') => app.open_prompt(),
        Key::Char('r') => app.request_load(),
        Key::Char('s') => app.toggle_sidebar(),
        Key::Char('m') => {
            app.emit(UiEvent::FocusChange(Focus::MenuButton));
            app.emit(UiEvent::Click(Target::MenuButton));
        }
        Key::Down | Key::Char('j') => app.scroll_by(1),
        Key::Up | Key::Char('k') => app.scroll_by(-1),
        Key::PageDown | Key::Space => app.scroll_page(true),
        Key::PageUp => app.scroll_page(false),
        Key::Home => app.scroll_to_top(),
        Key::End | Key::Char('G') => app.scroll_to_bottom(),
        _ => return Flow::Continue,
    }
    Flow::Stop
}

fn content_click(app: &mut App, event: &UiEvent) -> Flow {
    if *event == UiEvent::Click(Target::Content) && app.focus() != Focus::Content {
        app.emit(UiEvent::FocusChange(Focus::Content));
        return Flow::Stop;
    }
    Flow::Continue
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
