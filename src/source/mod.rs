//! Document source abstraction layer.
//!
//! This module defines the [`DocumentSource`] trait, the [`FetchError`] type
//! and [`locate`], which turns a resolved URL string into an absolute [`Url`].
//! Concrete sources live in sub-modules: [`http`] for `http`/`https` and
//! [`file`] for local files.  [`SchemeRouter`] picks between them by scheme.
//!
//! ## Adding a new scheme
//!
//! 1. Create a new file in this directory (e.g. `embedded.rs`).
//! 2. Define a struct and implement [`DocumentSource`] for it.
//! 3. Add a match arm for its scheme in [`SchemeRouter::fetch`].

mod document;
mod file;
mod http;

pub use document::Document;
pub use file::FileSource;
pub use http::HttpSource;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Why a fetch failed.  The `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.  `text` is empty for codes
    /// without a standard reason phrase.
    #[error("HTTP {code}{}", reason_suffix(.text))]
    Status { code: u16, text: String },

    /// Connection, TLS or body failure, with every underlying cause.
    #[error("{}", cause_chain(.0))]
    Transport(#[from] reqwest::Error),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported URL scheme `{0}`")]
    UnsupportedScheme(String),

    #[error("invalid document location `{location}`: {reason}")]
    InvalidLocation { location: String, reason: String },
}

fn reason_suffix(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!(" {text}")
    }
}

/// `outer: cause: root cause`, skipping causes already quoted by their parent.
fn cause_chain(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut cause = std::error::Error::source(err);
    while let Some(inner) = cause {
        let message = inner.to_string();
        if !text.contains(&message) {
            text.push_str(": ");
            text.push_str(&message);
        }
        cause = inner.source();
    }
    text
}

/// Trait that every document source must implement.
///
/// The loader runs [`fetch()`](DocumentSource::fetch) on its own runtime, so
/// implementations must be [`Send`] + [`Sync`].
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &str;

    /// Fetch the document at `url` as text.  Exactly one request per call.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Dispatches to [`HttpSource`] or [`FileSource`] by URL scheme.
#[derive(Default)]
pub struct SchemeRouter {
    http: HttpSource,
    file: FileSource,
}

impl SchemeRouter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentSource for SchemeRouter {
    fn name(&self) -> &str {
        "router"
    }

    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        match url.scheme() {
            "http" | "https" => self.http.fetch(url).await,
            "file" => self.file.fetch(url).await,
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Turn a resolved location into an absolute URL.
///
/// Absolute URLs pass through.  Relative locations are joined onto `origin`
/// when one is given, otherwise they are read as paths relative to the
/// working directory.
pub fn locate(location: &str, origin: Option<&Url>) -> Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidLocation {
        location: location.to_string(),
        reason,
    };

    match Url::parse(location) {
        Ok(url) => return Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {}
        Err(e) => return Err(invalid(e.to_string())),
    }

    if let Some(origin) = origin {
        return origin.join(location).map_err(|e| invalid(e.to_string()));
    }

    let cwd = std::env::current_dir().map_err(|e| invalid(e.to_string()))?;
    Url::from_file_path(cwd.join(location))
        .map_err(|()| invalid("not representable as a file URL".into()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_passes_through() {
        let url = locate("https://example.com/a/readme.md", None).unwrap();
        assert_eq!(url.as_str(), "https://example.com/a/readme.md");
    }

    #[test]
    fn relative_location_joins_origin() {
        let origin = Url::parse("https://example.com/docs/").unwrap();
        let url = locate("guide/page2.md", Some(&origin)).unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/guide/page2.md");
    }

    #[test]
    fn relative_location_without_origin_is_a_file() {
        let url = locate("notes.md", None).unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/notes.md"));
    }

    #[test]
    fn status_error_message_has_code_and_text() {
        let err = FetchError::Status {
            code: 404,
            text: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404 Not Found");
    }

    #[test]
    fn status_error_without_text_has_no_trailing_space() {
        let err = FetchError::Status {
            code: 599,
            text: String::new(),
        };
        assert_eq!(err.to_string(), "HTTP 599");
    }

    #[tokio::test]
    async fn router_rejects_unknown_scheme() {
        let router = SchemeRouter::new();
        let url = Url::parse("ftp://example.com/readme.md").unwrap();
        let err = router.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(s) if s == "ftp"));
    }
}
