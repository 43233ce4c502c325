use std::path::PathBuf;

use crate::{Breed, Stage};

/// Render-ready projection of [`AppState`](crate::AppState).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub stage: Stage,
    pub breed_count: usize,
    pub breeds_loading: bool,
    pub breeds_error: Option<String>,
    pub source: Option<PathBuf>,
    pub breed: Option<Breed>,
    pub confidence: Option<f64>,
    pub images: Vec<String>,
    /// Inline error for the current picture, independent of any notification.
    pub error: Option<String>,
}
