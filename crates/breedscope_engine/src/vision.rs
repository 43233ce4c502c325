use breedscope_core::{Classification, PipelineError, VisionClassifier};
use serde::Serialize;

use crate::fetch::parse_url;
use crate::{ApiError, HttpFetcher};

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    image: &'a str,
}

/// Sends the picture to a classifier service that answers with a JSON array of
/// `{label, probability}`.
#[derive(Debug, Clone)]
pub struct HttpVisionClassifier {
    fetcher: HttpFetcher,
}

impl HttpVisionClassifier {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn labels(&self, image: &str) -> Result<Vec<Classification>, ApiError> {
        let url = parse_url(&self.fetcher.settings().classifier_url)?;
        let text = self.fetcher.post_json(url, &ClassifyRequest { image }).await?;
        parse_labels(&text)
    }
}

fn parse_labels(text: &str) -> Result<Vec<Classification>, ApiError> {
    let labels: Vec<Classification> =
        serde_json::from_str(text).map_err(|err| ApiError::decode("$", err.to_string()))?;
    if let Some(pos) = labels
        .iter()
        .position(|c| !(0.0..=1.0).contains(&c.probability))
    {
        return Err(ApiError::decode(
            format!("$[{pos}].probability"),
            format!("{} is outside [0, 1]", labels[pos].probability),
        ));
    }
    Ok(labels)
}

#[async_trait::async_trait]
impl VisionClassifier for HttpVisionClassifier {
    async fn classify(&self, image: &str) -> Result<Vec<Classification>, PipelineError> {
        Ok(self.labels(image).await?)
    }
}
