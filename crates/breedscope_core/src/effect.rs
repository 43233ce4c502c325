//! Deferred, dispatch-driving units of work.
//!
//! An [`Effect`] is returned from an update function next to the new state and
//! run exactly once by the [`Program`](crate::Program). It receives a
//! [`Context`] carrying the dispatch function, the program environment and a
//! [`Spawner`] for asynchronous work.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

/// Runs futures produced by effects. Implemented by the host (a tokio handle in
/// the application, a blocking executor in tests).
pub trait Spawner: Send + Sync {
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

/// Cloneable handle that feeds actions back into a program.
pub struct Dispatch<A> {
    send: Arc<dyn Fn(A) + Send + Sync>,
}

impl<A> Dispatch<A> {
    pub fn new(send: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self {
            send: Arc::new(send),
        }
    }

    pub fn send(&self, action: A) {
        (self.send)(action);
    }
}

impl<A> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self {
            send: Arc::clone(&self.send),
        }
    }
}

impl<A> fmt::Debug for Dispatch<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatch")
    }
}

/// Everything an effect body may touch while it runs.
pub struct Context<A, Env> {
    dispatch: Dispatch<A>,
    env: Env,
    spawner: Arc<dyn Spawner>,
}

impl<A, Env> Context<A, Env> {
    pub fn new(dispatch: Dispatch<A>, env: Env, spawner: Arc<dyn Spawner>) -> Self {
        Self {
            dispatch,
            env,
            spawner,
        }
    }

    pub fn dispatch(&self, action: A) {
        self.dispatch.send(action);
    }

    pub fn dispatcher(&self) -> Dispatch<A> {
        self.dispatch.clone()
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        self.spawner.spawn(Box::pin(task));
    }
}

/// A deferred computation parameterized by the action type it dispatches.
pub struct Effect<A, Env> {
    label: &'static str,
    run: Box<dyn FnOnce(Context<A, Env>) + Send>,
}

impl<A, Env> Effect<A, Env>
where
    A: 'static,
    Env: 'static,
{
    /// Wraps an arbitrary effect body. `label` is only used for logging and tests.
    pub fn new(label: &'static str, run: impl FnOnce(Context<A, Env>) + Send + 'static) -> Self {
        Self {
            label,
            run: Box::new(run),
        }
    }

    /// Dispatches `action` synchronously when run.
    pub fn dispatch(action: A) -> Self
    where
        A: Send,
    {
        Self::new("dispatch", move |ctx| ctx.dispatch(action))
    }

    /// Spawns the future built by `task` and dispatches the action it resolves to.
    ///
    /// The future must fold every outcome (success, domain failure, transport
    /// error) into exactly one action.
    pub fn perform<F, Fut>(label: &'static str, task: F) -> Self
    where
        A: Send,
        Env: Clone,
        F: FnOnce(Env) -> Fut + Send + 'static,
        Fut: Future<Output = A> + Send + 'static,
    {
        Self::new(label, move |ctx| {
            let dispatch = ctx.dispatcher();
            let future = task(ctx.env().clone());
            ctx.spawn(async move {
                dispatch.send(future.await);
            });
        })
    }

    /// Embeds this effect into an outer action space. The effect body runs
    /// unchanged; every action it dispatches passes through `transform` first.
    pub fn map<B, F>(self, transform: F) -> Effect<B, Env>
    where
        B: 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        let Self { label, run } = self;
        Effect {
            label,
            run: Box::new(move |ctx: Context<B, Env>| {
                let Context {
                    dispatch,
                    env,
                    spawner,
                } = ctx;
                let inner = Dispatch::new(move |action| dispatch.send(transform(action)));
                run(Context::new(inner, env, spawner));
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Consumes the effect and runs its body.
    pub fn run(self, ctx: Context<A, Env>) {
        (self.run)(ctx);
    }
}

impl<A, Env> fmt::Debug for Effect<A, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect").field("label", &self.label).finish()
    }
}
