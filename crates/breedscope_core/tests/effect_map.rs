use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use breedscope_core::{Context, Dispatch, Effect};

mod support;
use support::{init_logging, BlockingSpawner, DeferredSpawner};

#[derive(Debug, Clone, PartialEq)]
enum Inner {
    Fetched(u32),
}

#[derive(Debug, Clone, PartialEq)]
enum Outer {
    Child(Inner),
}

/// Stand-in for a remote call: counts invocations and answers `42`.
#[derive(Clone, Default)]
struct Remote {
    calls: Arc<AtomicUsize>,
}

impl Remote {
    async fn fetch(&self) -> u32 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        42
    }
}

fn fetch_effect<A: Send + 'static>(wrap: fn(u32) -> A) -> Effect<A, Remote> {
    Effect::perform("fetch", move |remote: Remote| async move { wrap(remote.fetch().await) })
}

fn capturing<A: Send + 'static>() -> (Dispatch<A>, Arc<Mutex<Vec<A>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);
    (
        Dispatch::new(move |action| sink.lock().unwrap().push(action)),
        captured,
    )
}

#[test]
fn map_wraps_dispatched_action_and_keeps_external_call() {
    init_logging();
    let remote = Remote::default();

    let (plain_dispatch, plain) = capturing::<Inner>();
    fetch_effect(Inner::Fetched).run(Context::new(
        plain_dispatch,
        remote.clone(),
        Arc::new(BlockingSpawner),
    ));

    let (outer_dispatch, wrapped) = capturing::<Outer>();
    fetch_effect(Inner::Fetched)
        .map(Outer::Child)
        .run(Context::new(outer_dispatch, remote.clone(), Arc::new(BlockingSpawner)));

    assert_eq!(remote.calls.load(Ordering::SeqCst), 2);
    assert_eq!(*plain.lock().unwrap(), vec![Inner::Fetched(42)]);
    assert_eq!(*wrapped.lock().unwrap(), vec![Outer::Child(Inner::Fetched(42))]);
}

#[test]
fn mapped_effect_dispatches_after_async_boundary() {
    init_logging();
    let remote = Remote::default();
    let spawner = Arc::new(DeferredSpawner::default());
    let (dispatch, wrapped) = capturing::<Outer>();

    fetch_effect(Inner::Fetched)
        .map(Outer::Child)
        .run(Context::new(dispatch, remote.clone(), spawner.clone()));

    assert_eq!(spawner.pending(), 1);
    assert!(wrapped.lock().unwrap().is_empty());

    spawner.run_all();
    assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    assert_eq!(*wrapped.lock().unwrap(), vec![Outer::Child(Inner::Fetched(42))]);
}

#[test]
fn nested_maps_compose() {
    init_logging();
    let (dispatch, captured) = capturing::<String>();
    Effect::<u8, ()>::dispatch(3)
        .map(|n| u32::from(n) * 10)
        .map(|n| format!("#{n}"))
        .run(Context::new(dispatch, (), Arc::new(BlockingSpawner)));
    assert_eq!(*captured.lock().unwrap(), vec!["#30".to_string()]);
}
