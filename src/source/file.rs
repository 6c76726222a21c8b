//! Local file document source for `file://` URLs.

use async_trait::async_trait;
use url::Url;

use super::{DocumentSource, FetchError};

#[derive(Default)]
pub struct FileSource;

#[async_trait]
impl DocumentSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let path = url
            .to_file_path()
            .map_err(|()| FetchError::InvalidLocation {
                location: url.to_string(),
                reason: "not a local file path".into(),
            })?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# Title").unwrap();
        let url = Url::from_file_path(file.path()).unwrap();

        let body = FileSource.fetch(&url).await.unwrap();
        assert_eq!(body, "# Title");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("missing.md")).unwrap();

        let err = FileSource.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
        assert!(err.to_string().contains("missing.md"));
    }
}
