//! Error taxonomy for the host, the classification channel, and the
//! one-time runtime bootstrap.
//!
//! Bootstrap failures are fatal: the failure sticks and every later
//! activation sees it. Channel faults are recoverable: they are logged
//! and absorbed where they occur, and never tear the host down.

use thiserror::Error;

use crate::syntax::DocumentVersion;

/// Failure of the one-time runtime load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    /// The loader did not produce a runtime. Sticky: every current and
    /// future waiter receives this same error.
    #[error("editor runtime failed to load: {reason}")]
    LoaderFailed { reason: String },
}

/// Recoverable faults on the classification channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    /// A send or receive hit a channel whose worker is gone.
    #[error("classification channel is closed")]
    ChannelClosed,

    /// A response arrived for a version the document has moved past.
    #[error("stale classification response: response version {response}, document version {current}")]
    StaleResponse {
        response: DocumentVersion,
        current: DocumentVersion,
    },
}

/// Errors surfaced through the host API.
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// Another host currently owns the shared widget slot.
    #[error("shared editor slot is owned by another host")]
    SlotOccupied,

    /// `activate` called on a host that is already active or pending.
    #[error("host is already active")]
    AlreadyActive,

    /// An operation that needs a mounted widget reached an idle host.
    #[error("host is not active")]
    NotActive,

    /// Theme id missing from the runtime registry.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
}
