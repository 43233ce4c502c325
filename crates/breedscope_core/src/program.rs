//! The dispatch/update loop.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use engine_logging::{engine_debug, engine_trace};

use crate::effect::{Context, Dispatch, Effect, Spawner};

type UpdateFn<S, A, Env> = dyn Fn(A, &Arc<S>) -> (Arc<S>, Vec<Effect<A, Env>>) + Send + Sync;
type Listener = Arc<dyn Fn() + Send + Sync>;

/// Owns the current state and serializes transitions.
///
/// Actions are queued and drained by whichever caller finds the queue idle, so
/// a dispatch issued from inside an effect (or from another thread) never
/// overlaps a transition in progress. It is picked up once the current
/// transition has run its effects and notified subscribers.
pub struct Program<S, A, Env> {
    shared: Arc<Shared<S, A, Env>>,
}

struct Shared<S, A, Env> {
    update: Box<UpdateFn<S, A, Env>>,
    env: Env,
    spawner: Arc<dyn Spawner>,
    core: Mutex<Core<S, A>>,
    listeners: Arc<Mutex<Listeners>>,
}

struct Core<S, A> {
    state: Arc<S>,
    queue: VecDeque<A>,
    draining: bool,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

impl<S, A, Env> Clone for Program<S, A, Env> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S, A, Env> Program<S, A, Env>
where
    S: Send + Sync + 'static,
    A: Send + 'static,
    Env: Clone + Send + Sync + 'static,
{
    /// Creates a program around `state`. Initial effects are not run here; pass
    /// them to [`Program::run_effects`] once subscribers are in place.
    pub fn new<U>(state: S, update: U, env: Env, spawner: Arc<dyn Spawner>) -> Self
    where
        U: Fn(A, &Arc<S>) -> (Arc<S>, Vec<Effect<A, Env>>) + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                update: Box::new(update),
                env,
                spawner,
                core: Mutex::new(Core {
                    state: Arc::new(state),
                    queue: VecDeque::new(),
                    draining: false,
                }),
                listeners: Arc::new(Mutex::new(Listeners::default())),
            }),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> Arc<S> {
        Arc::clone(&lock(&self.shared.core).state)
    }

    pub fn dispatch(&self, action: A) {
        {
            let mut core = lock(&self.shared.core);
            core.queue.push_back(action);
            if core.draining {
                engine_trace!("dispatch queued behind running transition");
                return;
            }
            core.draining = true;
        }
        self.drain();
    }

    /// A dispatch handle that does not keep the program alive.
    pub fn dispatcher(&self) -> Dispatch<A> {
        let weak: Weak<Shared<S, A, Env>> = Arc::downgrade(&self.shared);
        Dispatch::new(move |action| match weak.upgrade() {
            Some(shared) => Program { shared }.dispatch(action),
            None => engine_debug!("program dropped; action discarded"),
        })
    }

    /// Runs effects in order, exactly once each.
    pub fn run_effects(&self, effects: Vec<Effect<A, Env>>) {
        for effect in effects {
            engine_trace!("running effect {}", effect.label());
            let ctx = Context::new(
                self.dispatcher(),
                self.shared.env.clone(),
                Arc::clone(&self.shared.spawner),
            );
            effect.run(ctx);
        }
    }

    /// Registers `listener`, called after every state-changing transition.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let mut listeners = lock(&self.shared.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.shared.listeners),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared.listeners).entries.len()
    }

    fn drain(&self) {
        let _guard = DrainGuard {
            core: &self.shared.core,
        };
        loop {
            let (action, current) = {
                let mut core = lock(&self.shared.core);
                match core.queue.pop_front() {
                    Some(action) => (action, Arc::clone(&core.state)),
                    None => {
                        core.draining = false;
                        return;
                    }
                }
            };

            let (next, effects) = (self.shared.update)(action, &current);
            let changed = !Arc::ptr_eq(&next, &current);
            if changed {
                lock(&self.shared.core).state = next;
            } else {
                engine_debug!("no-op transition; {} effect(s)", effects.len());
            }

            self.run_effects(effects);

            if changed {
                self.notify();
            }
        }
    }

    fn notify(&self) {
        // Snapshot so listeners may (un)subscribe while being called.
        let round: Vec<Listener> = lock(&self.shared.listeners)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in round {
            listener();
        }
    }
}

/// Releases the drain role if a transition unwinds, so later dispatches still run.
struct DrainGuard<'a, S, A> {
    core: &'a Mutex<Core<S, A>>,
}

impl<S, A> Drop for DrainGuard<'_, S, A> {
    fn drop(&mut self) {
        // On a normal return the flag was cleared under the lock already and
        // another caller may own it by now.
        if std::thread::panicking() {
            lock(self.core).draining = false;
        }
    }
}

/// Token returned by [`Program::subscribe`].
#[derive(Debug)]
#[must_use = "dropping the token keeps the listener registered forever"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Removes exactly the registration this token was issued for.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            let mut listeners = lock(&listeners);
            if let Some(pos) = listeners.entries.iter().position(|(id, _)| *id == self.id) {
                listeners.entries.remove(pos);
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
