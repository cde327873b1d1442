//! berth - embeddable code editor host
//!
//! This crate hosts a single shared editor widget across shell views:
//! one-time runtime bootstrap, widget creation and adoption, background
//! syntax classification over a worker channel, and version-checked
//! decoration application.

pub mod bootstrap;
pub mod config;
pub mod config_paths;
pub mod container;
pub mod decorations;
pub mod errors;
pub mod events;
pub mod host;
pub mod resize;
pub mod runtime;
pub mod shared;
pub mod syntax;
pub mod theme;
pub mod tracing;
pub mod widget;

// Re-export commonly used types
pub use bootstrap::Bootstrap;
pub use config::HostConfig;
pub use container::Container;
pub use errors::{BootstrapError, HostError, WorkerError};
pub use events::{ChangeEvent, EditOrigin, HostEvent, TextEdit};
pub use host::{EditorHost, HostStats, MountHooks};
pub use resize::{ResizeBus, Size};
pub use runtime::Runtime;
pub use shared::SharedEditor;
pub use syntax::{Classification, DocumentVersion, LanguageId};
pub use theme::Theme;
