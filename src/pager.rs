//! Page flipping.
//!
//! The [`Pager`] is the only owner of the [`ReadmeSource`] and the only code
//! that writes its `index`.  Mutations report whether the index changed; the
//! app re-invokes the loader on [`PageChange::Changed`].

use log::{debug, warn};

use crate::resolver::ReadmeSource;

/// Result of a pager mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    /// The index was written; the document should be reloaded.
    Changed,
    /// Nothing was mutated.
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct Pager {
    source: ReadmeSource,
}

impl Pager {
    pub fn new(source: ReadmeSource) -> Self {
        Self { source }
    }

    #[cfg(test)]
    pub fn source(&self) -> &ReadmeSource {
        &self.source
    }

    /// Resolve the URL for the current state.
    pub fn url(&self) -> String {
        self.source.resolve()
    }

    /// Resolve the URL about to be fetched, warning when it is the fallback.
    pub fn load_url(&self) -> String {
        let url = self.url();
        if !self.source.is_configured() {
            warn!("no url or baseurl configured; using fallback {url}");
        }
        url
    }

    pub fn is_paged(&self) -> bool {
        self.source.index.is_some()
    }

    /// Current page as a number, if pagination is enabled.
    ///
    /// An index that was configured as non-numeric text reads as `0`.
    pub fn page(&self) -> Option<i64> {
        self.source.index.as_deref().map(parse_or_zero)
    }

    /// Move the index by `delta`.
    ///
    /// Without an index this is a no-op that only logs a warning.
    pub fn step(&mut self, delta: i64) -> PageChange {
        let Some(current) = self.page() else {
            warn!("page step of {delta} ignored: no index is set");
            return PageChange::Unchanged;
        };
        let next = current.saturating_add(delta);
        debug!("page {current} -> {next}");
        self.source.index = Some(next.to_string());
        PageChange::Changed
    }

    /// Jump to an absolute page, enabling pagination.
    ///
    /// Input that does not parse as an integer is stored as `0`.
    pub fn set(&mut self, value: &str) -> PageChange {
        let page = parse_or_zero(value);
        debug!("page set to {page} (from {value:?})");
        self.source.index = Some(page.to_string());
        PageChange::Changed
    }

    /// Turn pagination off.
    pub fn disable(&mut self) -> PageChange {
        if self.source.index.take().is_some() {
            PageChange::Changed
        } else {
            PageChange::Unchanged
        }
    }

    /// Point the pager at a different template/base, keeping the index.
    pub fn retarget(&mut self, template: Option<String>, base: Option<String>) -> PageChange {
        let index = self.source.index.take();
        self.source = ReadmeSource::new(template, base, index);
        PageChange::Changed
    }
}

fn parse_or_zero(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(index: Option<&str>) -> Pager {
        Pager::new(ReadmeSource::new(Some("page{i}"), None::<String>, index))
    }

    // -- load_url ------------------------------------------------------------

    #[test]
    fn load_url_matches_url() {
        let p = pager(Some("4"));
        assert_eq!(p.load_url(), "page4.md");
    }

    #[test]
    fn load_url_falls_back_when_unconfigured() {
        let p = Pager::new(ReadmeSource::new(None::<String>, None::<String>, Some("2")));
        assert_eq!(p.load_url(), crate::resolver::FALLBACK_URL);
    }

    // -- step ----------------------------------------------------------------

    #[test]
    fn step_without_index_is_noop() {
        let mut p = pager(None);
        assert_eq!(p.step(1), PageChange::Unchanged);
        assert_eq!(p.source().index, None);
        assert_eq!(p.url(), "page.md");
    }

    #[test]
    fn step_moves_forward_and_back() {
        let mut p = pager(Some("3"));
        assert_eq!(p.step(1), PageChange::Changed);
        assert_eq!(p.url(), "page4.md");
        p.step(-2);
        assert_eq!(p.url(), "page2.md");
    }

    #[test]
    fn step_from_non_numeric_index_starts_at_zero() {
        let mut p = pager(Some("intro"));
        p.step(1);
        assert_eq!(p.source().index.as_deref(), Some("1"));
    }

    #[test]
    fn step_is_not_clamped() {
        let mut p = pager(Some("0"));
        p.step(-1);
        assert_eq!(p.page(), Some(-1));
    }

    // -- set -----------------------------------------------------------------

    #[test]
    fn set_enables_indexing() {
        let mut p = pager(None);
        assert_eq!(p.set("5"), PageChange::Changed);
        assert!(p.is_paged());
        assert_eq!(p.url(), "page5.md");
    }

    #[test]
    fn set_coerces_non_numeric_to_zero() {
        let mut p = pager(None);
        p.set("abc");
        assert_eq!(p.source().index.as_deref(), Some("0"));
        assert_eq!(p.step(2), PageChange::Changed);
        assert_eq!(p.page(), Some(2));
    }

    // -- disable / retarget --------------------------------------------------

    #[test]
    fn disable_clears_index_once() {
        let mut p = pager(Some("1"));
        assert_eq!(p.disable(), PageChange::Changed);
        assert_eq!(p.disable(), PageChange::Unchanged);
        assert!(!p.is_paged());
    }

    #[test]
    fn retarget_keeps_index() {
        let mut p = pager(Some("2"));
        p.retarget(Some("guide.md".into()), None);
        assert_eq!(p.url(), "guide2.md");
    }
}
