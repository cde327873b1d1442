//! Syntax classification module
//!
//! Tree-sitter based classification over a worker channel:
//! - Language routing from document titles
//! - Background parsing in a worker thread, one per active host
//! - Versioned responses so stale batches can be discarded
//!
//! ## Architecture
//!
//! ```text
//! Content change → SyntaxChannel::highlight(code, title, version)
//!               → (worker thread: parse + query captures)
//!               → ClassifyResponse → host pump → version check
//!               → decorations replaced on the widget
//! ```

mod classification;
mod classifier;
mod languages;
mod protocol;
mod worker;

pub use classification::{kind_for_capture, Classification, DocumentVersion};
pub use classifier::Classifier;
pub use languages::LanguageId;
pub use protocol::{ClassifyRequest, ClassifyResponse};
pub use worker::SyntaxChannel;
