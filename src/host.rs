//! The editor host: activation, shared-widget ownership, classification
//! scheduling, and the frame pump.
//!
//! A host is glue between one shell view and the process-wide widget. It
//! reserves the slot, mounts the widget into a container (creating it the
//! first time, adopting it after), runs a classification worker for the
//! life of the activation, and hands everything back on deactivation.
//!
//! Nothing here blocks. Results from the loader thread and the worker
//! thread land in channels, and `pump` applies them once per frame on the
//! shell's thread.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Instant;

use crate::bootstrap::{Bootstrap, LoadResult};
use crate::config::HostConfig;
use crate::container::Container;
use crate::decorations::{decorations_for_batch, Decoration};
use crate::errors::{BootstrapError, HostError, WorkerError};
use crate::events::{ChangeEvent, EditOrigin, HostEvent, TextEdit};
use crate::resize::{ResizeBus, ResizeSubscription};
use crate::runtime::Runtime;
use crate::shared::{Claim, HostId, SharedEditor};
use crate::syntax::{DocumentVersion, LanguageId, SyntaxChannel};
use crate::widget::{CreateParams, EditorWidget};

/// Callbacks around widget creation and adoption.
///
/// `will_mount` runs once the runtime is ready, before the widget is
/// created or adopted; registering shell themes here makes them available
/// for the first paint. `did_mount` runs after the surface is attached.
/// Both are synchronous and run while the widget is borrowed from the
/// slot, so they must not call back into the host.
#[derive(Default)]
pub struct MountHooks {
    pub will_mount: Option<Box<dyn FnMut(&Runtime)>>,
    pub did_mount: Option<Box<dyn FnMut(&mut dyn EditorWidget, &Runtime)>>,
}

/// Counters for what the host absorbed rather than surfaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    /// Requests posted to the worker
    pub requests_posted: u64,
    /// Batches that passed the version check and were applied
    pub batches_applied: u64,
    /// Responses discarded because their version was no longer current
    pub stale_responses: u64,
}

enum Phase {
    /// Not activated; owns nothing.
    Idle,
    /// Activation accepted while the runtime loads.
    Pending {
        config: HostConfig,
        container: Container,
        reply: Receiver<LoadResult>,
    },
    /// Mounted and live.
    Active(ActiveState),
}

struct ActiveState {
    config: HostConfig,
    container: Container,
    runtime: Arc<Runtime>,
    channel: SyntaxChannel,
    resize: ResizeSubscription,
    /// Deadline for the one delayed initial classification request
    initial_highlight_at: Option<Instant>,
}

/// Hosts one shell view on the shared editor widget.
pub struct EditorHost {
    id: HostId,
    shared: SharedEditor,
    bootstrap: Bootstrap,
    resize_bus: ResizeBus,
    hooks: MountHooks,
    phase: Phase,
    events: VecDeque<HostEvent>,
    stats: HostStats,
}

impl EditorHost {
    pub fn new(shared: SharedEditor, bootstrap: Bootstrap, resize_bus: ResizeBus) -> Self {
        let id = shared.allocate_host_id();
        Self {
            id,
            shared,
            bootstrap,
            resize_bus,
            hooks: MountHooks::default(),
            phase: Phase::Idle,
            events: VecDeque::new(),
            stats: HostStats::default(),
        }
    }

    /// Attach mount hooks. Builder-style, used before the first activate.
    pub fn with_hooks(mut self, hooks: MountHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Begin hosting into `container`.
    ///
    /// With the runtime already loaded the widget mounts before this
    /// returns. Otherwise the host goes pending and mounts during a later
    /// `pump` once the load settles. An already-settled bootstrap failure
    /// is returned here; a failure discovered later surfaces as a
    /// `BootstrapFailed` event.
    pub fn activate(&mut self, container: Container, config: HostConfig) -> Result<(), HostError> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(HostError::AlreadyActive);
        }
        self.shared.reserve(self.id)?;

        let (reply_tx, reply_rx) = mpsc::channel();
        self.bootstrap.request(reply_tx);

        // A settled bootstrap answers before request() returns
        match reply_rx.try_recv() {
            Ok(Ok(runtime)) => {
                self.mount(container, config, runtime);
                Ok(())
            }
            Ok(Err(error)) => {
                self.shared.release(self.id);
                Err(HostError::Bootstrap(error))
            }
            Err(TryRecvError::Empty) => {
                tracing::debug!("Host {} pending, runtime still loading", self.id.0);
                self.phase = Phase::Pending {
                    config,
                    container,
                    reply: reply_rx,
                };
                Ok(())
            }
            Err(TryRecvError::Disconnected) => {
                self.shared.release(self.id);
                Err(HostError::Bootstrap(loader_vanished()))
            }
        }
    }

    /// Release everything this activation holds: the surface detaches
    /// (the widget itself survives for the next host), the resize
    /// subscription drops, the worker terminates, the slot frees.
    /// Idempotent; a second call is a no-op.
    pub fn deactivate(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::Pending { .. } => {
                // The reply channel drops with the phase; a runtime that
                // arrives later goes unused
                self.shared.release(self.id);
                tracing::debug!("Host {} cancelled while pending", self.id.0);
            }
            Phase::Active(mut active) => {
                active.container.detach();
                active.channel.terminate();
                self.shared.release(self.id);
                tracing::info!("Host {} deactivated", self.id.0);
            }
        }
    }

    /// Drive one frame: finish a pending mount once the load settles,
    /// fire the delayed initial classification, apply finished batches
    /// (discarding stale ones by version), and forward resizes. Call once
    /// per frame with `Instant::now()`.
    pub fn pump(&mut self, now: Instant) {
        self.pump_bootstrap();
        self.pump_initial_highlight(now);
        self.pump_responses();
        self.pump_resize();
    }

    /// Apply a user edit: splice the buffer, notify the shell with the
    /// full new text, and request classification.
    pub fn edit(&mut self, at: usize, removed: usize, inserted: &str) -> Result<(), HostError> {
        self.mutate(EditOrigin::User, |widget| widget.splice(at, removed, inserted))
    }

    /// Push external content. No change notification goes out, but
    /// classification still runs so pushed text highlights like typed
    /// text. Setting the text the widget already has does nothing.
    pub fn set_value(&mut self, value: &str) -> Result<(), HostError> {
        if let Phase::Pending { config, .. } = &mut self.phase {
            // Lands when the mount completes
            config.value = Some(value.to_string());
            return Ok(());
        }
        if matches!(self.phase, Phase::Idle) {
            return Err(HostError::NotActive);
        }

        let unchanged = self
            .shared
            .with_widget(|widget| widget.text() == value)
            .unwrap_or(false);
        if unchanged {
            return Ok(());
        }

        self.mutate(EditOrigin::External, |widget| widget.set_text(value))
    }

    /// Retag the document language. The worker keeps routing by title, so
    /// this changes the model tag and nothing else.
    pub fn set_language(&mut self, language: LanguageId) -> Result<(), HostError> {
        match &mut self.phase {
            Phase::Idle => Err(HostError::NotActive),
            Phase::Pending { config, .. } => {
                config.language = language;
                Ok(())
            }
            Phase::Active(active) => {
                active.config.language = language;
                self.shared
                    .with_widget(|widget| widget.set_language(language));
                Ok(())
            }
        }
    }

    /// Apply a theme from the runtime registry.
    pub fn set_theme(&mut self, theme: &str) -> Result<(), HostError> {
        match &mut self.phase {
            Phase::Idle => Err(HostError::NotActive),
            Phase::Pending { config, .. } => {
                config.theme = theme.to_string();
                Ok(())
            }
            Phase::Active(active) => {
                if active.runtime.theme(theme).is_none() {
                    return Err(HostError::UnknownTheme(theme.to_string()));
                }
                active.config.theme = theme.to_string();
                self.shared.with_widget(|widget| widget.set_theme(theme));
                Ok(())
            }
        }
    }

    /// Drain queued events in arrival order.
    pub fn take_events(&mut self) -> Vec<HostEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    pub fn stats(&self) -> HostStats {
        self.stats
    }

    /// Full widget text.
    pub fn text(&self) -> Result<String, HostError> {
        self.require_active()?;
        self.shared
            .with_widget(|widget| widget.text())
            .ok_or(HostError::NotActive)
    }

    /// Current document version.
    pub fn version(&self) -> Result<DocumentVersion, HostError> {
        self.require_active()?;
        self.shared
            .with_widget(|widget| widget.version())
            .ok_or(HostError::NotActive)
    }

    /// Current decoration set.
    pub fn decorations(&self) -> Result<Vec<Decoration>, HostError> {
        self.require_active()?;
        self.shared
            .with_widget(|widget| widget.decorations().to_vec())
            .ok_or(HostError::NotActive)
    }

    /// Widget language tag.
    pub fn language(&self) -> Result<LanguageId, HostError> {
        self.require_active()?;
        self.shared
            .with_widget(|widget| widget.language())
            .ok_or(HostError::NotActive)
    }

    /// Widget theme id.
    pub fn theme(&self) -> Result<String, HostError> {
        self.require_active()?;
        self.shared
            .with_widget(|widget| widget.theme().to_string())
            .ok_or(HostError::NotActive)
    }

    fn require_active(&self) -> Result<(), HostError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(HostError::NotActive)
        }
    }

    fn mount(&mut self, container: Container, config: HostConfig, runtime: Arc<Runtime>) {
        if let Some(will_mount) = self.hooks.will_mount.as_mut() {
            will_mount(runtime.as_ref());
        }

        let claim = self.shared.claim(|surface| CreateParams {
            surface,
            value: config.value.clone().unwrap_or_default(),
            language: config.language,
            theme: config.theme.clone(),
            options: config.options.clone(),
        });

        match claim {
            Claim::Created => {
                tracing::info!("Host {} created the shared widget", self.id.0);
            }
            Claim::Adopted => {
                self.shared.with_widget(|widget| {
                    // Theme and language re-apply on every adoption;
                    // options never do
                    widget.set_theme(&config.theme);
                    widget.set_language(config.language);

                    if let Some(value) = config.value.as_deref() {
                        if widget.text() != value {
                            widget.set_text(value);
                        }
                    }
                });
                tracing::info!("Host {} adopted the shared widget", self.id.0);
            }
        }

        // Re-parent the surface into this activation's container
        if let Some(surface) = self.shared.with_widget(|widget| widget.surface()) {
            container.attach(surface);
        }

        if let Some(did_mount) = self.hooks.did_mount.as_mut() {
            self.shared
                .with_widget(|widget| did_mount(widget, runtime.as_ref()));
        }

        let channel = SyntaxChannel::spawn(Arc::clone(&runtime));
        let resize = self.resize_bus.subscribe();
        let initial_highlight_at = Some(Instant::now() + config.initial_highlight_delay);

        self.events.push_back(HostEvent::Mounted);
        self.phase = Phase::Active(ActiveState {
            config,
            container,
            runtime,
            channel,
            resize,
            initial_highlight_at,
        });
    }

    fn mutate(
        &mut self,
        origin: EditOrigin,
        apply: impl FnOnce(&mut dyn EditorWidget) -> TextEdit,
    ) -> Result<(), HostError> {
        let Phase::Active(active) = &mut self.phase else {
            return Err(HostError::NotActive);
        };

        let Some((edit, text, version)) = self.shared.with_widget(|widget| {
            let edit = apply(widget);
            (edit, widget.text(), widget.version())
        }) else {
            return Err(HostError::NotActive);
        };

        if origin.notifies() {
            self.events.push_back(HostEvent::ContentChanged {
                text: text.clone(),
                change: ChangeEvent { version, edit },
            });
        }

        request_classification(&mut self.stats, active, text, version);
        Ok(())
    }

    fn pump_bootstrap(&mut self) {
        if !matches!(self.phase, Phase::Pending { .. }) {
            return;
        }
        let Phase::Pending {
            config,
            container,
            reply,
        } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return;
        };

        match reply.try_recv() {
            Ok(Ok(runtime)) => self.mount(container, config, runtime),
            Ok(Err(error)) => self.bootstrap_failed(error),
            Err(TryRecvError::Empty) => {
                // Still loading; stay pending
                self.phase = Phase::Pending {
                    config,
                    container,
                    reply,
                };
            }
            Err(TryRecvError::Disconnected) => self.bootstrap_failed(loader_vanished()),
        }
    }

    fn bootstrap_failed(&mut self, error: BootstrapError) {
        tracing::error!("Host {} activation failed: {}", self.id.0, error);
        self.shared.release(self.id);
        self.events.push_back(HostEvent::BootstrapFailed(error));
    }

    fn pump_initial_highlight(&mut self, now: Instant) {
        let Phase::Active(active) = &mut self.phase else {
            return;
        };
        let Some(deadline) = active.initial_highlight_at else {
            return;
        };
        if now < deadline {
            return;
        }
        active.initial_highlight_at = None;

        let Some((text, version)) = self
            .shared
            .with_widget(|widget| (widget.text(), widget.version()))
        else {
            return;
        };
        request_classification(&mut self.stats, active, text, version);
    }

    fn pump_responses(&mut self) {
        let Phase::Active(active) = &mut self.phase else {
            return;
        };

        for response in active.channel.drain() {
            let Some(current) = self.shared.with_widget(|widget| widget.version()) else {
                continue;
            };

            if response.version != current {
                let error = WorkerError::StaleResponse {
                    response: response.version,
                    current,
                };
                tracing::debug!("Discarding {}", error);
                self.stats.stale_responses += 1;
                continue;
            }

            let count = response.classifications.len();
            let decorations = decorations_for_batch(&response.classifications);
            self.shared
                .with_widget(|widget| widget.set_decorations(decorations));
            self.stats.batches_applied += 1;

            tracing::debug!(
                "Applied {} decorations at version {}",
                count,
                response.version
            );
            self.events.push_back(HostEvent::DecorationsApplied {
                version: response.version,
                count,
            });
        }
    }

    fn pump_resize(&mut self) {
        let Phase::Active(active) = &mut self.phase else {
            return;
        };
        for size in active.resize.drain() {
            self.shared
                .with_widget(|widget| widget.layout(size.width, size.height));
        }
    }
}

impl Drop for EditorHost {
    fn drop(&mut self) {
        self.deactivate();
    }
}

fn request_classification(
    stats: &mut HostStats,
    active: &ActiveState,
    code: String,
    version: DocumentVersion,
) {
    let language = LanguageId::from_title(&active.config.title);
    if !language.has_classifier() {
        tracing::debug!(
            "No classifier for title '{}', skipping request",
            active.config.title
        );
        return;
    }

    active
        .channel
        .highlight(code, active.config.title.clone(), version);
    stats.requests_posted += 1;
}

fn loader_vanished() -> BootstrapError {
    BootstrapError::LoaderFailed {
        reason: "runtime loader exited without a result".to_string(),
    }
}
