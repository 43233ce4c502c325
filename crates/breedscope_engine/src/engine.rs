use std::sync::Arc;

use breedscope_core::{Notifier, Services, Spawner};
use futures_util::future::BoxFuture;
use tokio::runtime::{Handle, Runtime};

use crate::{
    DogApiClient, FailureKind, FetchError, FetchSettings, FsFileSource, HttpFetcher,
    HttpVisionClassifier, LogNotifier,
};

/// Spawns effect futures onto a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Spawner for TokioSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        self.handle.spawn(task);
    }
}

/// Owns the IO runtime and the concrete services effects run against.
pub struct EngineHandle {
    runtime: Runtime,
    services: Services,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        Self::with_notifier(settings, Arc::new(LogNotifier))
    }

    pub fn with_notifier(
        settings: FetchSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("breedscope-io")
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        let fetcher = HttpFetcher::new(settings)?;
        let files = FsFileSource::from_settings(fetcher.settings());
        let services = Services {
            catalog: Arc::new(DogApiClient::new(fetcher.clone())),
            vision: Arc::new(HttpVisionClassifier::new(fetcher)),
            files: Arc::new(files),
            notifier,
        };

        Ok(Self { runtime, services })
    }

    pub fn services(&self) -> Services {
        self.services.clone()
    }

    pub fn spawner(&self) -> Arc<dyn Spawner> {
        Arc::new(TokioSpawner::new(self.runtime.handle().clone()))
    }
}
