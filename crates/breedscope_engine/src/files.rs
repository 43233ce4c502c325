use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use breedscope_core::{FileSource, ReadError};
use engine_logging::engine_debug;

use crate::FetchSettings;

/// Reads pictures from the local file system into `data:` URLs.
#[derive(Debug, Clone)]
pub struct FsFileSource {
    max_bytes: u64,
    read_timeout: Duration,
}

impl FsFileSource {
    pub fn new(max_bytes: u64, read_timeout: Duration) -> Self {
        Self {
            max_bytes,
            read_timeout,
        }
    }

    /// Same size cap and timeout as network fetches.
    pub fn from_settings(settings: &FetchSettings) -> Self {
        Self::new(settings.max_bytes, settings.request_timeout)
    }
}

#[async_trait::async_trait]
impl FileSource for FsFileSource {
    async fn read_data_url(&self, path: &Path) -> Result<String, ReadError> {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(ReadError::Failed(format!(
                "{} is not an image ({mime})",
                path.display()
            )));
        }

        let metadata = tokio::fs::metadata(path).await.map_err(read_failed)?;
        if metadata.len() > self.max_bytes {
            return Err(ReadError::Failed(format!(
                "{} is {} bytes, the limit is {}",
                path.display(),
                metadata.len(),
                self.max_bytes
            )));
        }

        let bytes = tokio::time::timeout(self.read_timeout, tokio::fs::read(path))
            .await
            .map_err(|_| ReadError::Aborted)?
            .map_err(read_failed)?;
        engine_debug!("read {} bytes from {}", bytes.len(), path.display());
        Ok(to_data_url(mime.essence_str(), &bytes))
    }
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn read_failed(err: std::io::Error) -> ReadError {
    match err.kind() {
        ErrorKind::Interrupted => ReadError::Aborted,
        _ => ReadError::Failed(err.to_string()),
    }
}
