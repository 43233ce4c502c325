#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

use breedscope_core::{
    init, update, AppState, BreedCatalog, BreedIndex, Classification, FileSource, Msg, Notifier,
    PipelineError, Probe, Program, ReadError, Services, Severity, Spawner, VisionClassifier,
};
use futures_util::future::BoxFuture;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Runs every spawned future to completion on the spot.
pub struct BlockingSpawner;

impl Spawner for BlockingSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        futures::executor::block_on(task);
    }
}

/// Holds spawned futures until the test releases them.
#[derive(Default)]
pub struct DeferredSpawner {
    pending: Mutex<Vec<BoxFuture<'static, ()>>>,
}

impl DeferredSpawner {
    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Runs queued futures in spawn order, including ones they spawn.
    pub fn run_all(&self) {
        loop {
            let batch: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
            if batch.is_empty() {
                return;
            }
            for task in batch {
                futures::executor::block_on(task);
            }
        }
    }

    /// Runs only the oldest queued future.
    pub fn run_next(&self) {
        let task = {
            let mut pending = self.pending.lock().unwrap();
            if pending.is_empty() {
                return;
            }
            pending.remove(0)
        };
        futures::executor::block_on(task);
    }
}

impl Spawner for DeferredSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        self.pending.lock().unwrap().push(task);
    }
}

pub struct FakeCatalog {
    pub index: Result<BreedIndex, PipelineError>,
    pub images: Result<Vec<String>, PipelineError>,
    pub searched: Mutex<Vec<Probe>>,
}

#[async_trait::async_trait]
impl BreedCatalog for FakeCatalog {
    async fn fetch_index(&self) -> Result<BreedIndex, PipelineError> {
        self.index.clone()
    }

    async fn search(&self, probe: &Probe) -> Result<Vec<String>, PipelineError> {
        self.searched.lock().unwrap().push(probe.clone());
        self.images.clone()
    }
}

pub struct FakeVision {
    pub result: Result<Vec<Classification>, PipelineError>,
}

#[async_trait::async_trait]
impl VisionClassifier for FakeVision {
    async fn classify(&self, _image: &str) -> Result<Vec<Classification>, PipelineError> {
        self.result.clone()
    }
}

#[derive(Default)]
pub struct FakeFiles {
    pub pictures: HashMap<PathBuf, Result<String, ReadError>>,
}

#[async_trait::async_trait]
impl FileSource for FakeFiles {
    async fn read_data_url(&self, path: &Path) -> Result<String, ReadError> {
        self.pictures
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(ReadError::Failed("no such file".to_string())))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<(Severity, String)>>,
}

impl RecordingNotifier {
    pub fn severities(&self) -> Vec<Severity> {
        self.seen.lock().unwrap().iter().map(|(s, _)| *s).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.seen.lock().unwrap().push((severity, message.to_string()));
    }
}

pub fn dog_index() -> BreedIndex {
    BreedIndex::from_listing([
        ("pug", vec![]),
        ("chihuahua", vec!["mexican dog".to_string()]),
        ("retriever", vec!["golden".to_string(), "flatcoated".to_string()]),
    ])
}

pub struct Harness {
    pub catalog: Arc<FakeCatalog>,
    pub notifier: Arc<RecordingNotifier>,
    pub services: Services,
}

pub struct HarnessBuilder {
    index: Result<BreedIndex, PipelineError>,
    images: Result<Vec<String>, PipelineError>,
    labels: Result<Vec<Classification>, PipelineError>,
    files: FakeFiles,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        let mut files = FakeFiles::default();
        files.pictures.insert(
            PathBuf::from("pug.jpg"),
            Ok("data:image/jpeg;base64,cHVn".to_string()),
        );
        Self {
            index: Ok(dog_index()),
            images: Ok(vec!["https://images.example/pug1.jpg".to_string()]),
            labels: Ok(vec![Classification::new("pug, carlin", 0.8)]),
            files,
        }
    }
}

impl HarnessBuilder {
    pub fn index(mut self, index: Result<BreedIndex, PipelineError>) -> Self {
        self.index = index;
        self
    }

    pub fn images(mut self, images: Result<Vec<String>, PipelineError>) -> Self {
        self.images = images;
        self
    }

    pub fn labels(mut self, labels: Result<Vec<Classification>, PipelineError>) -> Self {
        self.labels = labels;
        self
    }

    pub fn picture(mut self, path: &str, result: Result<String, ReadError>) -> Self {
        self.files.pictures.insert(PathBuf::from(path), result);
        self
    }

    pub fn build(self) -> Harness {
        let catalog = Arc::new(FakeCatalog {
            index: self.index,
            images: self.images,
            searched: Mutex::new(Vec::new()),
        });
        let notifier = Arc::new(RecordingNotifier::default());
        let services = Services {
            catalog: catalog.clone(),
            vision: Arc::new(FakeVision {
                result: self.labels,
            }),
            files: Arc::new(self.files),
            notifier: notifier.clone(),
        };
        Harness {
            catalog,
            notifier,
            services,
        }
    }
}

impl Harness {
    /// Starts a program the way the binary does: init, then initial effects.
    pub fn start(
        &self,
        spawner: Arc<dyn Spawner>,
    ) -> Program<AppState, Msg, breedscope_core::Services> {
        let (state, effects) = init();
        let program = Program::new(state, update, self.services.clone(), spawner);
        program.run_effects(effects);
        program
    }
}
