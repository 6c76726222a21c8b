//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Drawing also records the screen
//! areas of clickable widgets in [`App::areas`] for mouse hit-testing.
//!
//! ## For contributors
//!
//! * The layout is three rows: a header with the menu button, the main area
//!   (optional sidebar + content pane), and a one-line status bar.
//! * The open dropdown and the go-to-page prompt are drawn last, as overlays.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Content, HitAreas};
use crate::event::Focus;
use crate::render::MARKDOWN_ENABLED;
use crate::widget::Row;

const SIDEBAR_WIDTH: u16 = 28;

/// Draw the complete UI for one frame.
///
/// Called once per tick from the main loop.  Delegates to helper functions
/// for each screen region.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let (sidebar_area, content_area) = if app.sidebar.is_open() {
        let [side, content] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
                .areas(main_area);
        (Some(side), content)
    } else {
        (None, main_area)
    };

    let mut areas = HitAreas {
        content: content_area,
        ..HitAreas::default()
    };

    areas.menu_button = draw_header(app, frame, header_area);
    if let Some(area) = sidebar_area {
        areas.sidebar = draw_sidebar(app, frame, area);
    }
    draw_content(app, frame, content_area);
    draw_status_bar(app, frame, status_area);

    if app.dropdown.is_open() {
        areas.menu_list = draw_menu(app, frame, main_area, areas.menu_button);
    }
    if app.prompt.is_some() {
        draw_prompt(app, frame, main_area);
    }

    app.areas = areas;
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

/// Render the header; returns the menu button area.
fn draw_header(app: &App, frame: &mut Frame, area: Rect) -> Rect {
    let arrow = if app.dropdown.is_open() { "▴" } else { "▾" };
    let button_text = format!("[ {} {arrow} ]", app.dropdown.label());
    let button_width = u16::try_from(button_text.chars().count()).unwrap_or(area.width);
    let [button_area, title_area] =
        Layout::horizontal([Constraint::Length(button_width), Constraint::Min(0)]).areas(area);

    let button_focused = matches!(app.focus(), Focus::MenuButton | Focus::MenuItem(_));
    let button_style = if button_focused {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    frame.render_widget(Paragraph::new(button_text).style(button_style), button_area);

    let page = match app.pager.page() {
        Some(page) => format!("page {page}"),
        None => "no paging".to_string(),
    };
    let title = Line::from(vec![
        Span::raw("  "),
        Span::styled(app.pager.url(), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(page, Style::default().fg(Color::Green)),
    ]);
    frame.render_widget(Paragraph::new(title), title_area);

    button_area
}

/// Render the sidebar; returns its inner (clickable) area.
fn draw_sidebar(app: &mut App, frame: &mut Frame, area: Rect) -> Rect {
    let rows = app.sidebar.rows();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| match *row {
            Row::Section(i) => {
                let marker = if app.sidebar.expanded() == Some(i) { "▾" } else { "▸" };
                let title = &app.sidebar.sections()[i].title;
                ListItem::new(Line::from(Span::styled(
                    format!("{marker} {title}"),
                    Style::default().add_modifier(Modifier::BOLD),
                )))
            }
            Row::Entry { section, entry } => {
                let label = app
                    .sidebar
                    .entry(section, entry)
                    .map(|e| e.label.as_str())
                    .unwrap_or_default();
                ListItem::new(format!("    {label}"))
            }
        })
        .collect();

    let block = Block::default()
        .title(" Contents ")
        .borders(Borders::ALL)
        .border_style(focus_style(app.sidebar.is_focused()));
    let inner = block.inner(area);

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    let selected = (!rows.is_empty() && app.sidebar.is_focused()).then(|| app.sidebar.cursor());
    app.sidebar_list.select(selected);
    frame.render_stateful_widget(list, area, &mut app.sidebar_list);

    inner
}

/// Render the document, a loading notice or the failure message.
fn draw_content(app: &App, frame: &mut Frame, area: Rect) {
    let title = match &app.content {
        Content::Loaded { document, .. } => {
            format!(" {} ", document.title().unwrap_or("README"))
        }
        _ => " README ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focus_style(app.focus() == Focus::Content));

    let text = match &app.content {
        Content::Empty => Text::raw(""),
        Content::Loading { url } => Text::styled(
            format!("Loading {url}…"),
            Style::default().fg(Color::DarkGray),
        ),
        Content::Loaded { text, .. } => text.clone(),
        Content::Failed { message, .. } => {
            Text::styled(message.clone(), Style::default().fg(Color::Red))
        }
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let mode = if MARKDOWN_ENABLED { "" } else { "  [raw]" };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::styled(mode, Style::default().fg(Color::DarkGray)),
        Span::raw("  q: quit  n/p: page  g: go to  m: menu  s: sidebar  r: reload"),
    ]));
    frame.render_widget(status, area);
}

/// Render the open dropdown below its button; returns the inner item area.
fn draw_menu(app: &App, frame: &mut Frame, bounds: Rect, button: Rect) -> Rect {
    let items = app.dropdown.items();
    let width = items
        .iter()
        .map(|label| label.chars().count() + 4)
        .max()
        .unwrap_or(0);
    let width = u16::try_from(width).unwrap_or(u16::MAX).min(bounds.width);
    let height = u16::try_from(items.len() + 2)
        .unwrap_or(u16::MAX)
        .min(bounds.height);
    let area = Rect::new(button.x, bounds.y, width, height);

    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let style = if app.dropdown.focused_item() == Some(i) {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(format!(" {label} "), style))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(List::new(list_items).block(block), area);
    inner
}

fn draw_prompt(app: &App, frame: &mut Frame, bounds: Rect) {
    let width = 30.min(bounds.width);
    let height = 3.min(bounds.height);
    let area = Rect::new(
        bounds.x + (bounds.width - width) / 2,
        bounds.y + (bounds.height - height) / 2,
        width,
        height,
    );
    let input = app.prompt.as_deref().unwrap_or_default();
    let prompt = Paragraph::new(format!("{input}▏")).block(
        Block::default()
            .title(" Go to page ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(prompt, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
