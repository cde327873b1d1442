//! Wire protocol between the host and the classification worker.
//!
//! Both messages are plain JSON-serializable structs so an out-of-process
//! worker speaks the same shapes as the in-process one.

use serde::{Deserialize, Serialize};

use super::classification::{Classification, DocumentVersion};

/// Request posted to the worker. One per highlight trigger, no coalescing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// Full document text at the time of the request
    pub code: String,
    /// Routing key: the grammar is picked from this title's extension
    pub title: String,
    /// Version the text was read at, echoed back in the response
    pub version: DocumentVersion,
}

/// Response the worker produces for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub classifications: Vec<Classification>,
    /// Version of the request this answers; checked before application
    pub version: DocumentVersion,
}
