//! README URL resolution.
//!
//! Turns the three configuration values of a [`ReadmeSource`] (template, base
//! and page index) into the single URL the loader fetches.  Resolution is a
//! pure function: no I/O, no validation of the URL, and it never fails.
//!
//! ## Rules (first match wins)
//!
//! 1. A template containing `{i}` or `{index}` has every placeholder replaced
//!    by the index (or the empty string), then gets a `.md` suffix if it
//!    lacks one.
//! 2. A template without placeholders, or else a base, gets the index
//!    inserted before a trailing `.md` (or appended followed by `.md`).
//! 3. With neither a template nor a base, [`FALLBACK_URL`] is returned.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Document fetched when neither a template nor a base URL is configured.
pub const FALLBACK_URL: &str = "https://raw.githubusercontent.com/exiostorm/EchoGame/main/README.md";

const MD_SUFFIX: &str = ".md";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(?:i|index)\}").expect("placeholder pattern is valid")
});

/// Where to fetch a document from.
///
/// Empty strings are normalised to `None` on construction, so "absent" has a
/// single representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadmeSource {
    /// URL pattern, possibly containing `{i}` / `{index}`.
    pub template: Option<String>,
    /// Fallback base URL, only used without a template.
    pub base: Option<String>,
    /// Current page index.  `None` disables pagination.
    pub index: Option<String>,
}

impl ReadmeSource {
    pub fn new(
        template: Option<impl Into<String>>,
        base: Option<impl Into<String>>,
        index: Option<impl Into<String>>,
    ) -> Self {
        Self {
            template: present(template.map(Into::into)),
            base: present(base.map(Into::into)),
            index: present(index.map(Into::into)),
        }
    }

    /// Whether a template or base is set, i.e. whether [`resolve`] will avoid
    /// the fallback URL.
    pub fn is_configured(&self) -> bool {
        normalize(self.template.as_deref()).is_some() || normalize(self.base.as_deref()).is_some()
    }

    pub fn resolve(&self) -> String {
        resolve(
            self.template.as_deref(),
            self.base.as_deref(),
            self.index.as_deref(),
        )
    }
}

/// Compute the URL to fetch.
///
/// `template` wins over `base`; an empty string counts as absent for all three
/// inputs.  See the module docs for the full rule list.
pub fn resolve(template: Option<&str>, base: Option<&str>, index: Option<&str>) -> String {
    let index = normalize(index);

    if let Some(template) = normalize(template) {
        if PLACEHOLDER.is_match(template) {
            let substituted = PLACEHOLDER
                .replace_all(template, NoExpand(index.unwrap_or("")))
                .into_owned();
            return ensure_md(substituted);
        }
        return with_index(template, index);
    }

    if let Some(base) = normalize(base) {
        return with_index(base, index);
    }

    FALLBACK_URL.to_string()
}

/// Insert `index` before a trailing `.md`, or append `index` and `.md`.
/// Without an index only the suffix is ensured.
fn with_index(url: &str, index: Option<&str>) -> String {
    match index {
        Some(index) => {
            let stem = url.strip_suffix(MD_SUFFIX).unwrap_or(url);
            format!("{stem}{index}{MD_SUFFIX}")
        }
        None => ensure_md(url.to_string()),
    }
}

fn ensure_md(mut url: String) -> String {
    if !url.ends_with(MD_SUFFIX) {
        url.push_str(MD_SUFFIX);
    }
    url
}

fn normalize(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
