//! Host event stream and edit origin tagging.
//!
//! Every content mutation carries an explicit origin. Whether the shell is
//! notified is a pure function of that tag: user edits notify, external
//! pushes do not. Both still schedule classification.

use crate::errors::BootstrapError;
use crate::syntax::DocumentVersion;

/// Who caused a content mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    /// Typed or edited through the host API on behalf of the user.
    User,
    /// Pushed by the embedding shell (initial value, reconciliation,
    /// programmatic set).
    External,
}

impl EditOrigin {
    /// Change notifications fire for user-origin edits only.
    pub fn notifies(self) -> bool {
        matches!(self, EditOrigin::User)
    }
}

/// A single content mutation, in char offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Char offset where the edit begins
    pub start: usize,
    /// Chars removed at `start`
    pub removed: usize,
    /// Chars inserted at `start`
    pub inserted: usize,
}

/// Descriptor attached to every change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Version the document reached with this change
    pub version: DocumentVersion,
    /// The edit that produced it
    pub edit: TextEdit,
}

/// Events the host queues for the shell, drained via `take_events`.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// The widget was created or adopted and its surface is attached.
    Mounted,

    /// A user-origin mutation changed the content. Carries the full new
    /// text so the shell never has to reconstruct it from deltas.
    ContentChanged { text: String, change: ChangeEvent },

    /// A classification batch passed the version check and replaced the
    /// widget's decoration set.
    DecorationsApplied {
        version: DocumentVersion,
        count: usize,
    },

    /// The one-time runtime load failed. The host is idle again and the
    /// failure is sticky.
    BootstrapFailed(BootstrapError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_user_edits_notify() {
        assert!(EditOrigin::User.notifies());
        assert!(!EditOrigin::External.notifies());
    }
}
