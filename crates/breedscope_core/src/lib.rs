//! Breedscope core: effect runtime, breed matching and the pure application update.
mod capability;
mod classify;
mod effect;
mod error;
mod index;
mod msg;
mod program;
mod remote_data;
mod state;
mod tasks;
mod types;
mod update;
mod view_model;

pub use capability::{BreedCatalog, FileSource, Notifier, Services, VisionClassifier};
pub use classify::{rank, Classifier};
pub use effect::{Context, Dispatch, Effect, Spawner};
pub use error::{PipelineError, ReadError};
pub use index::BreedIndex;
pub use msg::{BreedsMsg, Msg, PictureMsg};
pub use program::{Program, Subscription};
pub use remote_data::RemoteData;
pub use state::{AppState, Stage};
pub use types::{Breed, Classification, Probe, SearchResult, Severity};
pub use update::{init, update, AppEffect};
pub use view_model::AppViewModel;
