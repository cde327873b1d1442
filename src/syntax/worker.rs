//! Background classification worker
//!
//! One worker thread per active host. Requests are fire-and-forget: the
//! host posts and keeps going, and finished batches surface on the next
//! frame pump. There is no debouncing and no coalescing; every request is
//! answered, and the version check on the host side sorts out which
//! answers still matter.
//!
//! Termination drops both channel ends without joining the thread. A
//! worker mid-classification finishes, fails to send, and exits; the
//! response disappears without a trace, which is exactly the contract.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::errors::WorkerError;
use crate::runtime::Runtime;

use super::classification::DocumentVersion;
use super::classifier::Classifier;
use super::protocol::{ClassifyRequest, ClassifyResponse};

/// Handle to one worker thread.
pub struct SyntaxChannel {
    request_tx: Option<Sender<ClassifyRequest>>,
    response_rx: Option<Receiver<ClassifyResponse>>,
}

impl SyntaxChannel {
    /// Spawn a worker classifying against the shared runtime.
    pub fn spawn(runtime: Arc<Runtime>) -> Self {
        let mut classifier = Classifier::new(runtime);
        Self::spawn_with(move |request| classifier.classify(request))
    }

    /// Spawn a worker with a custom classify function.
    pub fn spawn_with<F>(classify: F) -> Self
    where
        F: FnMut(&ClassifyRequest) -> ClassifyResponse + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();

        thread::spawn(move || worker_loop(request_rx, response_tx, classify));

        Self {
            request_tx: Some(request_tx),
            response_rx: Some(response_rx),
        }
    }

    /// Post a classification request and return immediately. Posting after
    /// termination drops the request silently.
    pub fn highlight(&self, code: String, title: String, version: DocumentVersion) {
        let Some(request_tx) = self.request_tx.as_ref() else {
            tracing::debug!("highlight after terminate, dropping request");
            return;
        };

        let request = ClassifyRequest {
            code,
            title,
            version,
        };
        if request_tx.send(request).is_err() {
            // Worker died; recoverable, the next activation gets a new one
            tracing::warn!("{}", WorkerError::ChannelClosed);
        }
    }

    /// Drain every finished response without blocking.
    pub fn drain(&self) -> Vec<ClassifyResponse> {
        let Some(response_rx) = self.response_rx.as_ref() else {
            return Vec::new();
        };

        let mut responses = Vec::new();
        loop {
            match response_rx.try_recv() {
                Ok(response) => responses.push(response),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        responses
    }

    /// Shut the worker down. Both channel ends drop, the thread exits on
    /// its own, and any in-flight response dies on the closed channel.
    /// Calling this again is a no-op.
    pub fn terminate(&mut self) {
        if self.request_tx.take().is_some() {
            tracing::debug!("classification worker terminated");
        }
        self.response_rx = None;
    }

    pub fn is_terminated(&self) -> bool {
        self.request_tx.is_none()
    }
}

fn worker_loop<F>(
    requests: Receiver<ClassifyRequest>,
    responses: Sender<ClassifyResponse>,
    mut classify: F,
) where
    F: FnMut(&ClassifyRequest) -> ClassifyResponse,
{
    while let Ok(request) = requests.recv() {
        tracing::debug!(
            "Classifying {} ({} bytes, version {})",
            request.title,
            request.code.len(),
            request.version
        );

        let response = classify(&request);

        if responses.send(response).is_err() {
            // Host terminated while we worked; the response just vanishes
            break;
        }
    }
    tracing::debug!("classification worker exiting");
}
