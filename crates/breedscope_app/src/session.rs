use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use breedscope_core::{
    init, update, AppState, BreedsMsg, Msg, PictureMsg, Program, Services, Spawner, Stage,
    Subscription,
};
use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::render::status_line;

/// How a single submitted picture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Identified,
    Failed,
    TimedOut,
}

/// A running program plus a renderer that reports every stage change.
pub struct Session {
    program: Program<AppState, Msg, Services>,
    changes: Receiver<Arc<AppState>>,
    renderer: Option<Subscription>,
    settle_timeout: Duration,
}

impl Session {
    pub fn start(
        services: Services,
        spawner: Arc<dyn Spawner>,
        settle_timeout: Duration,
        sink: impl Fn(String) + Send + Sync + 'static,
    ) -> Self {
        let (state, effects) = init();
        let program = Program::new(state, update, services, spawner);
        let (tx, changes) = mpsc::channel();

        let watched = program.clone();
        let last_stage: Mutex<Option<Stage>> = Mutex::new(None);
        let renderer = program.subscribe(move || {
            let state = watched.state();
            let view = state.view();
            let mut last = last_stage.lock().unwrap_or_else(PoisonError::into_inner);
            if *last != Some(view.stage) {
                *last = Some(view.stage);
                sink(status_line(&view));
            }
            // Sent after rendering so a settled snapshot has always been printed.
            let _ = tx.send(state);
        });

        program.run_effects(effects);
        Self {
            program,
            changes,
            renderer: Some(renderer),
            settle_timeout,
        }
    }

    /// Submits `path` and blocks until its pipeline settles or `settle_timeout`
    /// has passed since submission.
    pub fn identify(&self, path: &Path) -> Outcome {
        let before = self.program.state();
        if before.breeds().failure().is_some() {
            engine_info!("retrying the breed list before {:?}", path);
            self.program.dispatch(Msg::Breeds(BreedsMsg::Requested));
        }

        let generation = before.generation() + 1;
        self.program
            .dispatch(Msg::Picture(PictureMsg::Submitted(path.to_path_buf())));

        let deadline = Instant::now() + self.settle_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.changes.recv_timeout(remaining) {
                Ok(state) if state.generation() == generation => {
                    if let Some(outcome) = verdict(&state) {
                        engine_debug!("{:?} settled as {:?}", path, outcome);
                        return outcome;
                    }
                }
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => {
                    engine_warn!("{:?} did not settle within {:?}", path, self.settle_timeout);
                    return Outcome::TimedOut;
                }
                Err(RecvTimeoutError::Disconnected) => return Outcome::Failed,
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // The renderer holds a program handle; removing it breaks the cycle.
        if let Some(renderer) = self.renderer.take() {
            renderer.unsubscribe();
        }
    }
}

fn verdict(state: &AppState) -> Option<Outcome> {
    match state.stage() {
        Stage::ResultsReady => Some(Outcome::Identified),
        Stage::PictureFailed | Stage::ClassificationFailed => Some(Outcome::Failed),
        Stage::PictureReady if state.breeds().failure().is_some() => Some(Outcome::Failed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use breedscope_core::{
        BreedCatalog, BreedIndex, Classification, FileSource, Notifier, PipelineError, Probe,
        ReadError, Severity, VisionClassifier,
    };
    use breedscope_engine::TokioSpawner;
    use pretty_assertions::assert_eq;

    use super::*;

    struct Catalog {
        available: bool,
    }

    #[async_trait::async_trait]
    impl BreedCatalog for Catalog {
        async fn fetch_index(&self) -> Result<BreedIndex, PipelineError> {
            if self.available {
                Ok(BreedIndex::from_listing([("pug", Vec::new())]))
            } else {
                Err(PipelineError::Remote("catalog offline".to_string()))
            }
        }

        async fn search(&self, _probe: &Probe) -> Result<Vec<String>, PipelineError> {
            Ok(vec!["https://images.example/pug.jpg".to_string()])
        }
    }

    struct Vision;

    #[async_trait::async_trait]
    impl VisionClassifier for Vision {
        async fn classify(&self, _image: &str) -> Result<Vec<Classification>, PipelineError> {
            Ok(vec![Classification::new("pug, carlin", 0.9)])
        }
    }

    struct Files;

    #[async_trait::async_trait]
    impl FileSource for Files {
        async fn read_data_url(&self, path: &Path) -> Result<String, ReadError> {
            if path.ends_with("broken.jpg") {
                Err(ReadError::Failed("unreadable".to_string()))
            } else if path.ends_with("stuck.jpg") {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ReadError::Aborted)
            } else {
                Ok("data:image/jpeg;base64,cHVn".to_string())
            }
        }
    }

    struct Quiet;

    impl Notifier for Quiet {
        fn notify(&self, _severity: Severity, _message: &str) {}
    }

    fn session(
        runtime: &tokio::runtime::Runtime,
        catalog_available: bool,
    ) -> (Session, Arc<Mutex<Vec<String>>>) {
        session_with_timeout(runtime, catalog_available, Duration::from_secs(5))
    }

    fn session_with_timeout(
        runtime: &tokio::runtime::Runtime,
        catalog_available: bool,
        settle_timeout: Duration,
    ) -> (Session, Arc<Mutex<Vec<String>>>) {
        engine_logging::initialize_for_tests();
        let services = Services {
            catalog: Arc::new(Catalog {
                available: catalog_available,
            }),
            vision: Arc::new(Vision),
            files: Arc::new(Files),
            notifier: Arc::new(Quiet),
        };
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let session = Session::start(
            services,
            Arc::new(TokioSpawner::new(runtime.handle().clone())),
            settle_timeout,
            move |line| sink.lock().unwrap().push(line),
        );
        (session, lines)
    }

    #[test]
    fn pictures_are_identified_in_turn() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (session, lines) = session(&runtime, true);

        assert_eq!(session.identify(&PathBuf::from("rex.jpg")), Outcome::Identified);
        assert_eq!(session.identify(&PathBuf::from("broken.jpg")), Outcome::Failed);
        assert_eq!(session.identify(&PathBuf::from("fido.jpg")), Outcome::Identified);

        let lines = lines.lock().unwrap();
        assert!(lines.contains(&"rex.jpg: pug (90%), 1 picture(s)".to_string()));
        let failure = "broken.jpg: failed: failed to read picture: unreadable".to_string();
        assert!(lines.contains(&failure));
        assert_eq!(lines.last().unwrap(), "fido.jpg: pug (90%), 1 picture(s)");
    }

    #[test]
    fn unavailable_catalog_fails_the_picture() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (session, _lines) = session(&runtime, false);

        assert_eq!(session.identify(&PathBuf::from("rex.jpg")), Outcome::Failed);
        assert!(session.program.state().breeds().failure().is_some());
    }

    #[test]
    fn dropping_the_session_removes_the_renderer() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (session, _lines) = session(&runtime, true);
        let program = session.program.clone();
        assert_eq!(program.subscriber_count(), 1);

        drop(session);
        assert_eq!(program.subscriber_count(), 0);
    }

    #[test]
    fn settle_timeout_bounds_the_whole_picture() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (session, _lines) = session_with_timeout(&runtime, false, Duration::from_millis(300));

        // Keep unrelated state changes flowing while the picture never loads.
        let stop = Arc::new(AtomicBool::new(false));
        let retries = {
            let stop = Arc::clone(&stop);
            let dispatch = session.program.dispatcher();
            thread::spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    dispatch.send(Msg::Breeds(BreedsMsg::Requested));
                    thread::sleep(Duration::from_millis(10));
                }
            })
        };

        let started = Instant::now();
        let outcome = session.identify(&PathBuf::from("stuck.jpg"));
        let elapsed = started.elapsed();
        stop.store(true, Ordering::SeqCst);
        retries.join().unwrap();

        assert_eq!(outcome, Outcome::TimedOut);
        assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    }
}
