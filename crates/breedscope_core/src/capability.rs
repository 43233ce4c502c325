//! Seams to the outside world. The engine crate provides the real
//! implementations; tests plug in fakes.

use std::path::Path;
use std::sync::Arc;

use crate::{BreedIndex, Classification, PipelineError, Probe, ReadError, Severity};

/// The remote breed catalog: listing plus image search.
#[async_trait::async_trait]
pub trait BreedCatalog: Send + Sync {
    async fn fetch_index(&self) -> Result<BreedIndex, PipelineError>;

    async fn search(&self, probe: &Probe) -> Result<Vec<String>, PipelineError>;
}

/// External image classifier. Labels come back unordered.
#[async_trait::async_trait]
pub trait VisionClassifier: Send + Sync {
    async fn classify(&self, image: &str) -> Result<Vec<Classification>, PipelineError>;
}

/// Turns a user-supplied file into a data URL.
#[async_trait::async_trait]
pub trait FileSource: Send + Sync {
    async fn read_data_url(&self, path: &Path) -> Result<String, ReadError>;
}

/// Fire-and-forget user notification.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Environment handed to every application effect.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn BreedCatalog>,
    pub vision: Arc<dyn VisionClassifier>,
    pub files: Arc<dyn FileSource>,
    pub notifier: Arc<dyn Notifier>,
}
