//! Markdown rendering.
//!
//! Two targets share one input: styled [`Text`] for the terminal content pane
//! and an HTML string for `--print` mode.  Both rely on [`pulldown_cmark`],
//! which is behind the default `markdown` feature.  Built without it, both
//! functions hand back the source text unmodified.

use ratatui::text::Text;

/// Whether markdown is actually rendered in this build.
pub const MARKDOWN_ENABLED: bool = cfg!(feature = "markdown");

/// Render markdown as styled terminal text.
pub fn to_text(markdown: &str) -> Text<'static> {
    #[cfg(feature = "markdown")]
    {
        terminal::render(markdown)
    }
    #[cfg(not(feature = "markdown"))]
    {
        Text::raw(markdown.to_string())
    }
}

/// Render markdown as an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    #[cfg(feature = "markdown")]
    {
        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, terminal::parser(markdown));
        html
    }
    #[cfg(not(feature = "markdown"))]
    {
        markdown.to_string()
    }
}

#[cfg(feature = "markdown")]
mod terminal {
    use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
    use ratatui::{
        style::{Color, Modifier, Style},
        text::{Line, Span, Text},
    };

    pub(super) fn parser(markdown: &str) -> Parser<'_, '_> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES;
        Parser::new_ext(markdown, options)
    }

    pub(super) fn render(markdown: &str) -> Text<'static> {
        let mut writer = Writer::default();
        for event in parser(markdown) {
            writer.event(event);
        }
        writer.finish()
    }

    fn heading_style(level: HeadingLevel) -> Style {
        let base = Style::default().add_modifier(Modifier::BOLD);
        match level {
            HeadingLevel::H1 => base.fg(Color::Magenta).add_modifier(Modifier::UNDERLINED),
            HeadingLevel::H2 => base.fg(Color::Cyan),
            HeadingLevel::H3 => base.fg(Color::Green),
            _ => base,
        }
    }

    fn code_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    fn muted() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    #[derive(Default)]
    struct Writer {
        lines: Vec<Line<'static>>,
        current: Vec<Span<'static>>,
        styles: Vec<Style>,
        /// One entry per open list: `Some(n)` is the next ordinal.
        lists: Vec<Option<u64>>,
        quote_depth: usize,
        in_code_block: bool,
        link_targets: Vec<String>,
    }

    impl Writer {
        fn style(&self) -> Style {
            self.styles
                .iter()
                .fold(Style::default(), |acc, s| acc.patch(*s))
        }

        fn push(&mut self, text: impl Into<String>, style: Style) {
            self.current.push(Span::styled(text.into(), style));
        }

        fn flush(&mut self) {
            let mut spans = Vec::with_capacity(self.current.len() + 1);
            if self.quote_depth > 0 {
                spans.push(Span::styled("│ ".repeat(self.quote_depth), muted()));
            }
            spans.append(&mut self.current);
            self.lines.push(Line::from(spans));
        }

        fn flush_if_pending(&mut self) {
            if !self.current.is_empty() {
                self.flush();
            }
        }

        fn blank(&mut self) {
            if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
                self.lines.push(Line::default());
            }
        }

        fn event(&mut self, event: Event<'_>) {
            match event {
                Event::Start(tag) => self.start(tag),
                Event::End(tag) => self.end(tag),
                Event::Text(text) if self.in_code_block => {
                    let mut parts = text.split('\n').peekable();
                    while let Some(part) = parts.next() {
                        if !part.is_empty() {
                            self.push(format!("    {part}"), code_style());
                        }
                        if parts.peek().is_some() {
                            self.flush();
                        }
                    }
                }
                Event::Text(text) => {
                    let style = self.style();
                    self.push(text.into_string(), style);
                }
                Event::Code(code) => self.push(format!("`{code}`"), code_style()),
                Event::Html(html) => {
                    for line in html.lines() {
                        self.push(line.to_string(), muted());
                        self.flush();
                    }
                }
                Event::FootnoteReference(name) => self.push(format!("[^{name}]"), muted()),
                Event::SoftBreak => self.push(" ", Style::default()),
                Event::HardBreak => self.flush(),
                Event::Rule => {
                    self.flush_if_pending();
                    self.push("─".repeat(40), muted());
                    self.flush();
                    self.blank();
                }
                Event::TaskListMarker(done) => {
                    self.push(if done { "[x] " } else { "[ ] " }, Style::default());
                }
            }
        }

        fn start(&mut self, tag: Tag<'_>) {
            match tag {
                Tag::Heading(level, _, _) => {
                    self.flush_if_pending();
                    let style = heading_style(level);
                    self.push(format!("{} ", "#".repeat(level as usize)), style);
                    self.styles.push(style);
                }
                Tag::BlockQuote => {
                    self.flush_if_pending();
                    self.quote_depth += 1;
                }
                Tag::CodeBlock(kind) => {
                    self.flush_if_pending();
                    if let CodeBlockKind::Fenced(lang) = kind {
                        if !lang.is_empty() {
                            self.push(format!("  [{lang}]"), muted());
                            self.flush();
                        }
                    }
                    self.in_code_block = true;
                }
                Tag::List(start) => {
                    self.flush_if_pending();
                    self.lists.push(start);
                }
                Tag::Item => {
                    self.flush_if_pending();
                    let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                    let bullet = match self.lists.last_mut() {
                        Some(Some(n)) => {
                            let b = format!("{n}. ");
                            *n += 1;
                            b
                        }
                        _ => "• ".to_string(),
                    };
                    self.push(format!("{indent}{bullet}"), Style::default().fg(Color::Blue));
                }
                Tag::Emphasis => self.styles.push(Style::default().add_modifier(Modifier::ITALIC)),
                Tag::Strong => self.styles.push(Style::default().add_modifier(Modifier::BOLD)),
                Tag::Strikethrough => self
                    .styles
                    .push(Style::default().add_modifier(Modifier::CROSSED_OUT)),
                Tag::Link(_, dest, _) => {
                    self.styles.push(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::UNDERLINED),
                    );
                    self.link_targets.push(dest.into_string());
                }
                Tag::Image(_, dest, _) => {
                    self.push("[image: ", muted());
                    self.link_targets.push(dest.into_string());
                }
                Tag::FootnoteDefinition(name) => {
                    self.flush_if_pending();
                    self.push(format!("[^{name}]: "), muted());
                }
                Tag::Paragraph
                | Tag::Table(_)
                | Tag::TableHead
                | Tag::TableRow
                | Tag::TableCell => {}
            }
        }

        fn end(&mut self, tag: Tag<'_>) {
            match tag {
                Tag::Paragraph => {
                    self.flush_if_pending();
                    if self.lists.is_empty() {
                        self.blank();
                    }
                }
                Tag::Heading(..) => {
                    self.styles.pop();
                    self.flush();
                    self.blank();
                }
                Tag::BlockQuote => {
                    self.flush_if_pending();
                    self.quote_depth = self.quote_depth.saturating_sub(1);
                    self.blank();
                }
                Tag::CodeBlock(_) => {
                    self.flush_if_pending();
                    self.in_code_block = false;
                    self.blank();
                }
                Tag::List(_) => {
                    self.lists.pop();
                    if self.lists.is_empty() {
                        self.blank();
                    }
                }
                Tag::Item => self.flush_if_pending(),
                Tag::Emphasis | Tag::Strong | Tag::Strikethrough => {
                    self.styles.pop();
                }
                Tag::Link(..) => {
                    self.styles.pop();
                    if let Some(dest) = self.link_targets.pop() {
                        self.push(format!(" <{dest}>"), muted());
                    }
                }
                Tag::Image(..) => {
                    if let Some(dest) = self.link_targets.pop() {
                        self.push(format!(" ({dest})]"), muted());
                    }
                }
                Tag::TableCell => self.push(" │ ", muted()),
                Tag::TableHead | Tag::TableRow => self.flush_if_pending(),
                Tag::Table(_) => self.blank(),
                Tag::FootnoteDefinition(_) => self.flush_if_pending(),
            }
        }

        fn finish(mut self) -> Text<'static> {
            self.flush_if_pending();
            while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
                self.lines.pop();
            }
            Text::from(self.lines)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
