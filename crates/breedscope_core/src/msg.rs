use std::path::PathBuf;
use std::sync::Arc;

use crate::{BreedIndex, PipelineError, ReadError, SearchResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Breed catalog lifecycle.
    Breeds(BreedsMsg),
    /// Picture submission and identification.
    Picture(PictureMsg),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BreedsMsg {
    /// (Re)load the breed listing.
    Requested,
    /// Listing fetched and indexed, or why not.
    Loaded(Result<Arc<BreedIndex>, PipelineError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PictureMsg {
    /// User picked a file.
    Submitted(PathBuf),
    /// File ingestion finished for submission `generation`.
    Read {
        generation: u64,
        result: Result<String, ReadError>,
    },
    /// Classify-then-search finished for submission `generation`.
    Identified {
        generation: u64,
        result: Result<SearchResult, PipelineError>,
    },
    /// User dismissed the current picture.
    Cleared,
}
