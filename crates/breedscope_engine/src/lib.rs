//! Breedscope engine: HTTP clients, file ingestion and effect execution.
mod client;
mod engine;
mod envelope;
mod fetch;
mod files;
mod notify;
mod types;
mod vision;

pub use client::{image_path, DogApiClient};
pub use engine::{EngineHandle, TokioSpawner};
pub use envelope::decode_envelope;
pub use fetch::{FetchSettings, HttpFetcher, DEFAULT_BASE_URL, DEFAULT_CLASSIFIER_URL};
pub use files::{to_data_url, FsFileSource};
pub use notify::LogNotifier;
pub use types::{ApiError, FailureKind, FetchError};
pub use vision::HttpVisionClassifier;
