//! One-time runtime load shared by every host.
//!
//! State machine: NotRequested -> Loading -> Ready | Failed. The first
//! request spawns the loader thread. Requests that arrive while loading
//! join a FIFO queue and are answered in arrival order when the load
//! settles; requests after that are answered immediately. The load never
//! runs twice, and a failure is sticky: every later request sees the same
//! error without a retry.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::errors::BootstrapError;
use crate::runtime::Runtime;

/// What a waiter receives once the load settles.
pub type LoadResult = Result<Arc<Runtime>, BootstrapError>;

type Waiter = Box<dyn FnOnce(LoadResult) + Send>;
type LoaderFn = Box<dyn FnOnce() -> Result<Runtime, BootstrapError> + Send>;

enum LoadState {
    NotRequested,
    Loading { waiters: Vec<Waiter> },
    Ready(Arc<Runtime>),
    Failed(BootstrapError),
}

struct BootstrapInner {
    state: LoadState,
    /// Consumed by the NotRequested -> Loading transition
    loader: Option<LoaderFn>,
    loads_started: u32,
}

/// Cloneable handle to the shared load.
#[derive(Clone)]
pub struct Bootstrap {
    inner: Arc<Mutex<BootstrapInner>>,
}

impl Bootstrap {
    /// Bootstrap backed by the built-in loader (grammar compilation plus
    /// theme parsing).
    pub fn new() -> Self {
        Self::with_loader(Runtime::load_builtin)
    }

    /// Bootstrap with a custom loader. The loader still runs at most once,
    /// on a background thread, on the first request.
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: FnOnce() -> Result<Runtime, BootstrapError> + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(BootstrapInner {
                state: LoadState::NotRequested,
                loader: Some(Box::new(loader)),
                loads_started: 0,
            })),
        }
    }

    /// Request the runtime; `waiter` is called exactly once with the
    /// result. Settled states answer on the calling thread before this
    /// returns; a load in flight answers from the loader thread, in
    /// request arrival order.
    pub fn request_with<F>(&self, waiter: F)
    where
        F: FnOnce(LoadResult) + Send + 'static,
    {
        let waiter: Waiter = Box::new(waiter);

        let settled: Option<(Waiter, LoadResult)> = {
            let mut inner = lock(&self.inner);
            match &mut inner.state {
                LoadState::NotRequested => match inner.loader.take() {
                    Some(loader) => {
                        inner.loads_started += 1;
                        inner.state = LoadState::Loading {
                            waiters: vec![waiter],
                        };

                        let shared = Arc::clone(&self.inner);
                        thread::spawn(move || {
                            tracing::info!("Runtime load started");
                            let result = loader().map(Arc::new);
                            settle(&shared, result);
                        });
                        None
                    }
                    None => {
                        let error = BootstrapError::LoaderFailed {
                            reason: "runtime loader already consumed".to_string(),
                        };
                        inner.state = LoadState::Failed(error.clone());
                        Some((waiter, Err(error)))
                    }
                },
                LoadState::Loading { waiters } => {
                    waiters.push(waiter);
                    None
                }
                LoadState::Ready(runtime) => Some((waiter, Ok(Arc::clone(runtime)))),
                LoadState::Failed(error) => Some((waiter, Err(error.clone()))),
            }
        };

        // Answer outside the lock so a waiter can re-enter the bootstrap
        if let Some((waiter, result)) = settled {
            waiter(result);
        }
    }

    /// Request the runtime with the result delivered on a channel. Hosts
    /// use this so the answer lands in their frame pump.
    pub fn request(&self, reply: Sender<LoadResult>) {
        self.request_with(move |result| {
            let _ = reply.send(result);
        });
    }

    /// True once the runtime loaded successfully.
    pub fn is_ready(&self) -> bool {
        matches!(lock(&self.inner).state, LoadState::Ready(_))
    }

    /// True once the load failed. Sticky.
    pub fn is_failed(&self) -> bool {
        matches!(lock(&self.inner).state, LoadState::Failed(_))
    }

    /// How many times the loader ran. Never exceeds one.
    pub fn load_count(&self) -> u32 {
        lock(&self.inner).loads_started
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}

fn settle(shared: &Mutex<BootstrapInner>, result: LoadResult) {
    let waiters = {
        let mut inner = lock(shared);
        let next = match &result {
            Ok(runtime) => LoadState::Ready(Arc::clone(runtime)),
            Err(error) => {
                tracing::error!("Runtime load failed: {}", error);
                LoadState::Failed(error.clone())
            }
        };
        match std::mem::replace(&mut inner.state, next) {
            LoadState::Loading { waiters } => waiters,
            _ => Vec::new(),
        }
    };

    if result.is_ok() {
        tracing::info!("Runtime ready, notifying {} waiters", waiters.len());
    }

    // FIFO: waiters hear about it in the order they asked
    for waiter in waiters {
        waiter(result.clone());
    }
}

fn lock(inner: &Mutex<BootstrapInner>) -> MutexGuard<'_, BootstrapInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
