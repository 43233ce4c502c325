use std::collections::BTreeMap;

use breedscope_core::{BreedCatalog, BreedIndex, PipelineError, Probe};
use engine_logging::engine_info;

use crate::envelope::decode_envelope;
use crate::{ApiError, HttpFetcher};

/// Catalog path for the pictures of `probe`'s breed.
pub fn image_path(probe: &Probe) -> String {
    match &probe.sub_breed {
        Some(sub) => format!("breed/{}/{}/images", probe.breed, sub),
        None => format!("breed/{}/images", probe.breed),
    }
}

/// Client for the dog catalog API.
#[derive(Debug, Clone)]
pub struct DogApiClient {
    fetcher: HttpFetcher,
}

impl DogApiClient {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch `breeds/list/all` and build the index. Nothing is returned unless
    /// the whole listing decoded.
    pub async fn load_index(&self) -> Result<BreedIndex, ApiError> {
        let url = self.fetcher.api_url("breeds/list/all")?;
        let text = self.fetcher.get_text(url).await?;
        let listing: BTreeMap<String, Vec<String>> = decode_envelope(&text)?;
        let index = BreedIndex::from_listing(listing);
        engine_info!("loaded {} breeds", index.len());
        Ok(index)
    }

    pub async fn images(&self, probe: &Probe) -> Result<Vec<String>, ApiError> {
        let url = self.fetcher.api_url(&image_path(probe))?;
        let text = self.fetcher.get_text(url).await?;
        decode_envelope(&text)
    }
}

#[async_trait::async_trait]
impl BreedCatalog for DogApiClient {
    async fn fetch_index(&self) -> Result<BreedIndex, PipelineError> {
        Ok(self.load_index().await?)
    }

    async fn search(&self, probe: &Probe) -> Result<Vec<String>, PipelineError> {
        Ok(self.images(probe).await?)
    }
}
