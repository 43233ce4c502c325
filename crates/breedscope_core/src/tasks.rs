//! Effects issued by the application update function.

use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    BreedIndex, BreedsMsg, Classifier, Context, Effect, PictureMsg, PipelineError, SearchResult,
    Services, Severity,
};

pub(crate) fn fetch_breeds() -> Effect<BreedsMsg, Services> {
    Effect::perform("fetch_breeds", |services: Services| async move {
        let result = services.catalog.fetch_index().await.map(Arc::new);
        BreedsMsg::Loaded(result)
    })
}

pub(crate) fn read_picture(generation: u64, path: PathBuf) -> Effect<PictureMsg, Services> {
    Effect::perform("read_picture", move |services: Services| async move {
        let result = services.files.read_data_url(&path).await;
        PictureMsg::Read { generation, result }
    })
}

pub(crate) fn identify_picture(
    generation: u64,
    image: String,
    index: Arc<BreedIndex>,
) -> Effect<PictureMsg, Services> {
    Effect::perform("identify_picture", move |services: Services| async move {
        let result = identify(&services, &image, &index).await;
        PictureMsg::Identified { generation, result }
    })
}

/// Classify, match, then search; the first failing stage ends the chain.
async fn identify(
    services: &Services,
    image: &str,
    index: &BreedIndex,
) -> Result<SearchResult, PipelineError> {
    let classifications = services.vision.classify(image).await?;
    if classifications.is_empty() {
        return Err(PipelineError::EmptyResult);
    }
    let probe = Classifier::new(index)
        .classify(&classifications)
        .ok_or(PipelineError::NoMatch)?;
    let images = services.catalog.search(&probe).await?;
    Ok(SearchResult { probe, images })
}

pub(crate) fn notify<A: 'static>(severity: Severity, message: String) -> Effect<A, Services> {
    Effect::new("notify", move |ctx: Context<A, Services>| {
        ctx.env().notifier.notify(severity, &message)
    })
}
