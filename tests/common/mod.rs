//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use berth::bootstrap::Bootstrap;
use berth::config::HostConfig;
use berth::errors::BootstrapError;
use berth::events::HostEvent;
use berth::host::EditorHost;
use berth::resize::ResizeBus;
use berth::runtime::Runtime;
use berth::shared::SharedEditor;
use berth::syntax::DocumentVersion;
use berth::widget::{CreateParams, TextWidget};

/// Everything a host needs, wired together.
pub struct Fixture {
    pub shared: SharedEditor,
    pub bootstrap: Bootstrap,
    pub resize: ResizeBus,
}

impl Fixture {
    /// Fixture on an empty runtime (no grammars, no themes). Loads
    /// instantly; lifecycle tests that never classify want this one.
    pub fn new() -> Self {
        Self::with_loader(|| Ok(Runtime::empty()))
    }

    /// Fixture on the full built-in runtime. Compiles grammars, so only
    /// classification tests pay for it.
    pub fn with_builtin_runtime() -> Self {
        Self::with_loader(Runtime::load_builtin)
    }

    /// Fixture with a custom loader.
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: FnOnce() -> Result<Runtime, BootstrapError> + Send + 'static,
    {
        Self {
            shared: SharedEditor::new(),
            bootstrap: Bootstrap::with_loader(loader),
            resize: ResizeBus::new(),
        }
    }

    /// Swap in a different shared slot (e.g. a counting factory).
    pub fn with_shared(mut self, shared: SharedEditor) -> Self {
        self.shared = shared;
        self
    }

    /// Swap in a different bootstrap (e.g. a gated one).
    pub fn with_bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// A host on this fixture's slot, bootstrap, and resize bus.
    pub fn host(&self) -> EditorHost {
        EditorHost::new(
            self.shared.clone(),
            self.bootstrap.clone(),
            self.resize.clone(),
        )
    }
}

/// Host config for a JavaScript document with no embedding delay, so the
/// initial classification fires on the first pump after mount.
pub fn test_config(value: &str) -> HostConfig {
    HostConfig {
        value: Some(value.to_string()),
        title: "a.js".to_string(),
        initial_highlight_delay: Duration::ZERO,
        ..HostConfig::default()
    }
}

/// Pump the host until `done` says stop or five seconds pass, collecting
/// every event drained along the way.
pub fn pump_until(
    host: &mut EditorHost,
    mut done: impl FnMut(&EditorHost, &[HostEvent]) -> bool,
) -> Vec<HostEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    loop {
        host.pump(Instant::now());
        events.extend(host.take_events());
        if done(host, &events) || Instant::now() >= deadline {
            return events;
        }
        thread::sleep(Duration::from_millis(1));
    }
}

/// Pump until the host mounts.
pub fn pump_until_active(host: &mut EditorHost) -> Vec<HostEvent> {
    pump_until(host, |host, _| host.is_active())
}

/// Pump until some drained event matches `pred`.
pub fn pump_until_event(
    host: &mut EditorHost,
    mut pred: impl FnMut(&HostEvent) -> bool,
) -> Vec<HostEvent> {
    pump_until(host, move |_, events| events.iter().any(|e| pred(e)))
}

/// Hand-operated gate that holds a loader until the test opens it.
pub struct LoaderGate {
    open: mpsc::Sender<()>,
}

impl LoaderGate {
    pub fn open(&self) {
        let _ = self.open.send(());
    }
}

/// Bootstrap whose load blocks until the returned gate opens.
pub fn gated_bootstrap() -> (Bootstrap, LoaderGate) {
    let (tx, rx) = mpsc::channel();
    let bootstrap = Bootstrap::with_loader(move || {
        let _ = rx.recv();
        Ok(Runtime::empty())
    });
    (bootstrap, LoaderGate { open: tx })
}

/// Like `gated_bootstrap`, but the load fails once the gate opens.
pub fn gated_failing_bootstrap(reason: &str) -> (Bootstrap, LoaderGate) {
    let reason = reason.to_string();
    let (tx, rx) = mpsc::channel();
    let bootstrap = Bootstrap::with_loader(move || {
        let _ = rx.recv();
        Err(BootstrapError::LoaderFailed { reason })
    });
    (bootstrap, LoaderGate { open: tx })
}

/// Shared slot whose factory logs every `CreateParams` it is handed.
pub fn counting_shared() -> (SharedEditor, Rc<RefCell<Vec<CreateParams>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let factory_log = Rc::clone(&log);
    let shared = SharedEditor::with_factory(Box::new(move |params| {
        factory_log.borrow_mut().push(params.clone());
        Box::new(TextWidget::new(params))
    }));
    (shared, log)
}

/// The texts carried by `ContentChanged` events, in order.
pub fn changed_texts(events: &[HostEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            HostEvent::ContentChanged { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// The (version, count) pairs carried by `DecorationsApplied` events.
pub fn applied_batches(events: &[HostEvent]) -> Vec<(DocumentVersion, usize)> {
    events
        .iter()
        .filter_map(|event| match event {
            HostEvent::DecorationsApplied { version, count } => Some((*version, *count)),
            _ => None,
        })
        .collect()
}
