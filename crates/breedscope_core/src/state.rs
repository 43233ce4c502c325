use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::view_model::AppViewModel;
use crate::{BreedIndex, RemoteData, SearchResult};

/// Where the picture pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    PictureLoading,
    PictureFailed,
    PictureReady,
    Classifying,
    ResultsReady,
    ClassificationFailed,
}

impl Stage {
    /// No further transition happens without new user input.
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            Self::Idle | Self::PictureFailed | Self::ResultsReady | Self::ClassificationFailed
        )
    }
}

/// Immutable snapshot; the update function replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) breeds: RemoteData<String, Arc<BreedIndex>>,
    pub(crate) generation: u64,
    pub(crate) source: Option<PathBuf>,
    pub(crate) picture: RemoteData<String, String>,
    pub(crate) results: RemoteData<String, SearchResult>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn breeds(&self) -> &RemoteData<String, Arc<BreedIndex>> {
        &self.breeds
    }

    /// Bumped on every submission; completions for older values are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn picture(&self) -> &RemoteData<String, String> {
        &self.picture
    }

    pub fn results(&self) -> &RemoteData<String, SearchResult> {
        &self.results
    }

    pub fn stage(&self) -> Stage {
        match (&self.picture, &self.results) {
            (RemoteData::NotAsked, _) => Stage::Idle,
            (RemoteData::Loading, _) => Stage::PictureLoading,
            (RemoteData::Failure(_), _) => Stage::PictureFailed,
            (RemoteData::Succeed(_), RemoteData::NotAsked) => Stage::PictureReady,
            (RemoteData::Succeed(_), RemoteData::Loading) => Stage::Classifying,
            (RemoteData::Succeed(_), RemoteData::Succeed(_)) => Stage::ResultsReady,
            (RemoteData::Succeed(_), RemoteData::Failure(_)) => Stage::ClassificationFailed,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let probe = self.results.success().map(|result| result.probe.clone());
        let images = self
            .results
            .success()
            .map(|result| result.images.clone())
            .unwrap_or_default();
        let error = self
            .picture
            .failure()
            .or_else(|| self.results.failure())
            .cloned();

        AppViewModel {
            stage: self.stage(),
            breed_count: self.breeds.success().map_or(0, |index| index.len()),
            breeds_loading: self.breeds.is_loading(),
            breeds_error: self.breeds.failure().cloned(),
            source: self.source.clone(),
            breed: probe.as_ref().map(|probe| probe.as_breed()),
            confidence: probe.map(|probe| probe.confidence),
            images,
            error,
        }
    }
}
