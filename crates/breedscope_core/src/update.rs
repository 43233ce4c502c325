use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};

use crate::{
    tasks, AppState, BreedIndex, BreedsMsg, Effect, Msg, PictureMsg, PipelineError, ReadError,
    RemoteData, SearchResult, Services, Severity,
};

pub type AppEffect = Effect<Msg, Services>;

/// Initial state plus the effects that start loading the breed catalog.
pub fn init() -> (AppState, Vec<AppEffect>) {
    let state = AppState {
        breeds: RemoteData::Loading,
        ..AppState::default()
    };
    (state, vec![tasks::fetch_breeds().map(Msg::Breeds)])
}

/// Pure update function: applies a message to state and returns any effects.
///
/// Returns the same `Arc` when nothing changed so the runtime can skip
/// notifying subscribers.
pub fn update(msg: Msg, state: &Arc<AppState>) -> (Arc<AppState>, Vec<AppEffect>) {
    match msg {
        Msg::Breeds(msg) => update_breeds(msg, state),
        Msg::Picture(msg) => update_picture(msg, state),
    }
}

fn update_breeds(msg: BreedsMsg, state: &Arc<AppState>) -> (Arc<AppState>, Vec<AppEffect>) {
    match msg {
        BreedsMsg::Requested => {
            if state.breeds.is_loading() {
                return unchanged(state);
            }
            let next = AppState {
                breeds: RemoteData::Loading,
                ..AppState::clone(state)
            };
            (Arc::new(next), vec![tasks::fetch_breeds().map(Msg::Breeds)])
        }
        BreedsMsg::Loaded(Ok(index)) => {
            engine_info!("breed index ready with {} breeds", index.len());
            let mut next = AppState {
                breeds: RemoteData::Succeed(Arc::clone(&index)),
                ..AppState::clone(state)
            };
            let mut effects = Vec::new();
            // A picture that arrived before the catalog was waiting for it.
            if let RemoteData::Succeed(image) = &next.picture {
                if next.results.is_not_asked() {
                    effects.push(start_identify(next.generation, image.clone(), index));
                    next.results = RemoteData::Loading;
                }
            }
            (Arc::new(next), effects)
        }
        BreedsMsg::Loaded(Err(err)) => {
            let message = format!("Could not load the breed list: {err}");
            let next = AppState {
                breeds: RemoteData::Failure(message.clone()),
                ..AppState::clone(state)
            };
            (Arc::new(next), vec![tasks::notify(Severity::Error, message)])
        }
    }
}

fn update_picture(msg: PictureMsg, state: &Arc<AppState>) -> (Arc<AppState>, Vec<AppEffect>) {
    match msg {
        PictureMsg::Submitted(path) => submit(state, path),
        PictureMsg::Read { generation, .. } | PictureMsg::Identified { generation, .. }
            if generation != state.generation =>
        {
            engine_debug!(
                "discarding completion for submission {} (current {})",
                generation,
                state.generation
            );
            unchanged(state)
        }
        PictureMsg::Read { result, .. } => picture_read(state, result),
        PictureMsg::Identified { result, .. } => identified(state, result),
        PictureMsg::Cleared => {
            if state.stage() == crate::Stage::Idle {
                return unchanged(state);
            }
            let next = AppState {
                generation: state.generation + 1,
                source: None,
                picture: RemoteData::NotAsked,
                results: RemoteData::NotAsked,
                ..AppState::clone(state)
            };
            (Arc::new(next), Vec::new())
        }
    }
}

fn submit(state: &Arc<AppState>, path: PathBuf) -> (Arc<AppState>, Vec<AppEffect>) {
    let generation = state.generation + 1;
    engine_info!("submission {} for {:?}", generation, path);
    let next = AppState {
        generation,
        source: Some(path.clone()),
        picture: RemoteData::Loading,
        results: RemoteData::NotAsked,
        ..AppState::clone(state)
    };
    (
        Arc::new(next),
        vec![tasks::read_picture(generation, path).map(Msg::Picture)],
    )
}

fn picture_read(
    state: &Arc<AppState>,
    result: Result<String, ReadError>,
) -> (Arc<AppState>, Vec<AppEffect>) {
    let image = match result {
        Ok(image) => image,
        Err(err) => {
            let message = err.to_string();
            let next = AppState {
                picture: RemoteData::Failure(message.clone()),
                results: RemoteData::NotAsked,
                ..AppState::clone(state)
            };
            return (Arc::new(next), vec![tasks::notify(Severity::Error, message)]);
        }
    };

    let mut next = AppState {
        picture: RemoteData::Succeed(image.clone()),
        results: RemoteData::NotAsked,
        ..AppState::clone(state)
    };
    let effects = match &state.breeds {
        RemoteData::Succeed(index) => {
            next.results = RemoteData::Loading;
            vec![start_identify(next.generation, image, Arc::clone(index))]
        }
        RemoteData::Failure(_) => vec![tasks::notify(
            Severity::Warning,
            "The breed list is unavailable; the picture cannot be identified".to_string(),
        )],
        // Identification starts once the catalog arrives.
        RemoteData::NotAsked | RemoteData::Loading => Vec::new(),
    };
    (Arc::new(next), effects)
}

fn identified(
    state: &Arc<AppState>,
    result: Result<SearchResult, PipelineError>,
) -> (Arc<AppState>, Vec<AppEffect>) {
    let (results, notification) = match result {
        Ok(found) => {
            let message = format!(
                "Looks like a {} ({:.0}% sure), {} picture(s) found",
                found.probe.as_breed(),
                found.probe.confidence * 100.0,
                found.images.len()
            );
            (RemoteData::Succeed(found), tasks::notify(Severity::Success, message))
        }
        Err(err) => {
            let message = err.to_string();
            (
                RemoteData::Failure(message.clone()),
                tasks::notify(Severity::Error, message),
            )
        }
    };
    let next = AppState {
        results,
        ..AppState::clone(state)
    };
    (Arc::new(next), vec![notification])
}

fn start_identify(generation: u64, image: String, index: Arc<BreedIndex>) -> AppEffect {
    tasks::identify_picture(generation, image, index).map(Msg::Picture)
}

fn unchanged(state: &Arc<AppState>) -> (Arc<AppState>, Vec<AppEffect>) {
    (Arc::clone(state), Vec::new())
}
