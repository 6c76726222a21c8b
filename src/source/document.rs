//! The fetched document shared by the loader, app and renderer.

use chrono::{DateTime, Local};

/// A successfully fetched document.
///
/// Holds the raw text exactly as received; rendering happens at draw time so
/// the same body can go to the terminal or to HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The absolute URL the body came from.
    pub url: String,

    /// Markdown source text.
    pub body: String,

    /// When the fetch completed, shown in the status bar.
    pub loaded_at: DateTime<Local>,
}

impl Document {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            loaded_at: Local::now(),
        }
    }

    /// Text of the first ATX heading, if any.
    ///
    /// `#` lines inside fenced code blocks are skipped.
    pub fn title(&self) -> Option<&str> {
        let mut in_fence = false;
        for line in self.body.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }
            let hashes = trimmed.chars().take_while(|c| *c == '#').count();
            if (1..=6).contains(&hashes) {
                let rest = &trimmed[hashes..];
                if rest.is_empty() || rest.starts_with(' ') {
                    let text = rest.trim().trim_end_matches('#').trim();
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_first_heading() {
        let doc = Document::new("u", "intro text\n## Setup ##\n# Later");
        assert_eq!(doc.title(), Some("Setup"));
    }

    #[test]
    fn title_skips_fenced_code() {
        let doc = Document::new("u", "```sh\n# not a heading\n```\n# Real");
        assert_eq!(doc.title(), Some("Real"));
    }

    #[test]
    fn hashtag_without_space_is_not_a_heading() {
        let doc = Document::new("u", "#hashtag\nplain");
        assert_eq!(doc.title(), None);
    }
}
