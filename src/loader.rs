//! Background document loading.
//!
//! Each [`Loader::load`] spawns one fetch on a private tokio runtime and
//! sends the outcome to the UI thread over an [`mpsc`] channel, which the main
//! loop drains every tick.
//!
//! ## Supersession
//!
//! Every load gets a new generation number.  Starting a load aborts the task
//! of the previous one, and the app drops any message whose generation is
//! not the latest, so rapid page flips never show a stale document.

use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use log::{debug, error, info};
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;
use url::Url;

use crate::source::{locate, Document, DocumentSource, FetchError};

/// Messages sent from a load task to the UI thread.
#[derive(Debug)]
pub enum LoadMsg {
    /// The fetch succeeded.
    Loaded { generation: u64, document: Document },
    /// The fetch (or locating the URL) failed.
    Failed {
        generation: u64,
        url: String,
        error: FetchError,
    },
}

impl LoadMsg {
    pub fn generation(&self) -> u64 {
        match self {
            LoadMsg::Loaded { generation, .. } | LoadMsg::Failed { generation, .. } => *generation,
        }
    }
}

pub struct Loader {
    runtime: Runtime,
    source: Arc<dyn DocumentSource>,
    /// Base for relative locations.
    origin: Option<Url>,
    tx: mpsc::Sender<LoadMsg>,
    in_flight: Option<JoinHandle<()>>,
    generation: u64,
}

impl Loader {
    /// Create a loader and the receiver the main loop should drain.
    pub fn new(
        source: Arc<dyn DocumentSource>,
        origin: Option<Url>,
    ) -> Result<(Self, mpsc::Receiver<LoadMsg>)> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("readme-loader")
            .enable_all()
            .build()
            .context("failed to start the loader runtime")?;
        let (tx, rx) = mpsc::channel();

        let loader = Self {
            runtime,
            source,
            origin,
            tx,
            in_flight: None,
            generation: 0,
        };
        Ok((loader, rx))
    }

    /// Whether `msg` answers the most recent request.
    pub fn is_current(&self, msg: &LoadMsg) -> bool {
        msg.generation() == self.generation
    }

    /// Start fetching `location`, superseding any load still in flight.
    ///
    /// Returns the generation assigned to this request.
    pub fn load(&mut self, location: &str) -> u64 {
        self.generation += 1;
        let generation = self.generation;

        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("load {} superseded by {generation}", generation - 1);
            }
            handle.abort();
        }

        let url = match locate(location, self.origin.as_ref()) {
            Ok(url) => url,
            Err(error) => {
                error!("failed to load README from {location}: {error}");
                // Receiver gone means the app is shutting down.
                let _ = self.tx.send(LoadMsg::Failed {
                    generation,
                    url: location.to_string(),
                    error,
                });
                return generation;
            }
        };

        info!("loading {url} (generation {generation}, via {})", self.source.name());
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.in_flight = Some(self.runtime.spawn(async move {
            let msg = match source.fetch(&url).await {
                Ok(body) => {
                    debug!("loaded {} bytes from {url}", body.len());
                    LoadMsg::Loaded {
                        generation,
                        document: Document::new(url.as_str(), body),
                    }
                }
                Err(error) => {
                    error!("failed to load README from {url}: {error}");
                    LoadMsg::Failed {
                        generation,
                        url: url.to_string(),
                        error,
                    }
                }
            };
            let _ = tx.send(msg);
        }));

        generation
    }

    /// Fetch `location` on the calling thread, outside the generation scheme.
    pub fn fetch_now(&self, location: &str) -> Result<Document, FetchError> {
        let url = locate(location, self.origin.as_ref())?;
        info!("fetching {url}");
        let body = self.runtime.block_on(self.source.fetch(&url)).map_err(|e| {
            error!("failed to load README from {url}: {e}");
            e
        })?;
        Ok(Document::new(url.as_str(), body))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Answers every path with a heading naming it; `slow` paths stall and
    /// `missing` paths return 404.
    struct StubSource;

    #[async_trait]
    impl DocumentSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            let path = url.path().to_string();
            if path.contains("slow") {
                tokio::time::sleep(Duration::from_secs(10)).await;
            }
            if path.contains("missing") {
                return Err(FetchError::Status {
                    code: 404,
                    text: "Not Found".into(),
                });
            }
            Ok(format!("# {path}"))
        }
    }

    fn loader() -> (Loader, mpsc::Receiver<LoadMsg>) {
        let origin = Url::parse("https://stub.test/docs/").unwrap();
        Loader::new(Arc::new(StubSource), Some(origin)).unwrap()
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn load_delivers_document() {
        let (mut loader, rx) = loader();
        let generation = loader.load("page1.md");

        match rx.recv_timeout(WAIT).unwrap() {
            LoadMsg::Loaded { generation: g, document } => {
                assert_eq!(g, generation);
                assert_eq!(document.url, "https://stub.test/docs/page1.md");
                assert_eq!(document.body, "# /docs/page1.md");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn load_reports_status_failure_with_url() {
        let (mut loader, rx) = loader();
        loader.load("missing.md");

        match rx.recv_timeout(WAIT).unwrap() {
            LoadMsg::Failed { url, error, .. } => {
                assert_eq!(url, "https://stub.test/docs/missing.md");
                assert_eq!(error.to_string(), "HTTP 404 Not Found");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn superseded_load_never_delivers() {
        let (mut loader, rx) = loader();
        let first = loader.load("slow.md");
        let second = loader.load("page2.md");
        assert_eq!(second, first + 1);

        let msg = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(msg.generation(), second);
        assert!(loader.is_current(&msg));
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn stale_message_is_not_current() {
        let (mut loader, rx) = loader();
        loader.load("page1.md");
        let msg = rx.recv_timeout(WAIT).unwrap();
        loader.load("page2.md");
        assert!(!loader.is_current(&msg));
    }

    #[test]
    fn fetch_now_blocks_for_result() {
        let (loader, _rx) = loader();
        let doc = loader.fetch_now("guide.md").unwrap();
        assert_eq!(doc.body, "# /docs/guide.md");
        assert!(loader.fetch_now("missing.md").is_err());
    }
}
