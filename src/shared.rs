//! The process-wide editor slot.
//!
//! At most one widget instance ever exists. The first activation builds it
//! through the injected factory; every later activation adopts the same
//! instance. Hosts reserve the slot before mounting and release it on
//! deactivation, so overlapping activations fail fast instead of fighting
//! over the widget.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::HostError;
use crate::widget::{CreateParams, EditorWidget, SurfaceId, TextWidget};

/// Builds the widget on first activation.
pub type WidgetFactory = Box<dyn FnMut(CreateParams) -> Box<dyn EditorWidget>>;

/// Host identity for slot ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostId(pub(crate) u64);

/// How a claim was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Claim {
    /// The factory ran; creation params were applied by construction.
    Created,
    /// An existing instance was handed over.
    Adopted,
}

struct Slot {
    factory: WidgetFactory,
    widget: Option<Box<dyn EditorWidget>>,
    owner: Option<HostId>,
    created: u32,
    next_host: u64,
    next_surface: u64,
}

/// Cloneable handle to the slot.
#[derive(Clone)]
pub struct SharedEditor {
    slot: Rc<RefCell<Slot>>,
}

impl SharedEditor {
    /// Slot that builds the built-in `TextWidget`.
    pub fn new() -> Self {
        Self::with_factory(Box::new(|params| Box::new(TextWidget::new(params))))
    }

    /// Slot with a custom widget factory.
    pub fn with_factory(factory: WidgetFactory) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                factory,
                widget: None,
                owner: None,
                created: 0,
                next_host: 1,
                next_surface: 1,
            })),
        }
    }

    pub(crate) fn allocate_host_id(&self) -> HostId {
        let mut slot = self.slot.borrow_mut();
        let id = HostId(slot.next_host);
        slot.next_host += 1;
        id
    }

    /// Reserve the slot for `host`. Re-reserving by the same host is fine;
    /// any other owner means the activation loses.
    pub(crate) fn reserve(&self, host: HostId) -> Result<(), HostError> {
        let mut slot = self.slot.borrow_mut();
        match slot.owner {
            Some(owner) if owner != host => Err(HostError::SlotOccupied),
            _ => {
                slot.owner = Some(host);
                Ok(())
            }
        }
    }

    /// Release ownership. The widget stays alive for the next host.
    pub(crate) fn release(&self, host: HostId) {
        let mut slot = self.slot.borrow_mut();
        if slot.owner == Some(host) {
            slot.owner = None;
        }
    }

    /// Create the widget or hand over the existing one. Callers hold the
    /// reservation, so this never contends.
    pub(crate) fn claim(&self, params: impl FnOnce(SurfaceId) -> CreateParams) -> Claim {
        let mut slot = self.slot.borrow_mut();
        if slot.widget.is_some() {
            return Claim::Adopted;
        }

        let surface = SurfaceId(slot.next_surface);
        slot.next_surface += 1;
        slot.created += 1;

        let widget = (slot.factory)(params(surface));
        slot.widget = Some(widget);
        Claim::Created
    }

    /// Run `f` against the widget, if it exists.
    pub(crate) fn with_widget<R>(&self, f: impl FnOnce(&mut dyn EditorWidget) -> R) -> Option<R> {
        let mut slot = self.slot.borrow_mut();
        slot.widget.as_mut().map(|widget| f(widget.as_mut()))
    }

    /// Total widget instances built by the factory. Stays at one for the
    /// life of the process no matter how many hosts come and go.
    pub fn widgets_created(&self) -> u32 {
        self.slot.borrow().created
    }

    /// Whether some host currently owns the slot.
    pub fn is_owned(&self) -> bool {
        self.slot.borrow().owner.is_some()
    }
}

impl Default for SharedEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::LanguageId;
    use crate::widget::WidgetOptions;

    fn params(surface: SurfaceId) -> CreateParams {
        CreateParams {
            surface,
            value: "hello".to_string(),
            language: LanguageId::JavaScript,
            theme: "dark".to_string(),
            options: WidgetOptions::new(),
        }
    }

    #[test]
    fn test_first_claim_creates_later_claims_adopt() {
        let shared = SharedEditor::new();
        let host = shared.allocate_host_id();

        shared.reserve(host).unwrap();
        assert_eq!(shared.claim(params), Claim::Created);
        assert_eq!(shared.widgets_created(), 1);
        shared.release(host);

        let next = shared.allocate_host_id();
        shared.reserve(next).unwrap();
        assert_eq!(shared.claim(params), Claim::Adopted);
        assert_eq!(shared.widgets_created(), 1);
        assert_eq!(
            shared.with_widget(|w| w.text()),
            Some("hello".to_string())
        );
    }

    #[test]
    fn test_reservation_excludes_other_hosts() {
        let shared = SharedEditor::new();
        let first = shared.allocate_host_id();
        let second = shared.allocate_host_id();

        shared.reserve(first).unwrap();
        assert!(matches!(
            shared.reserve(second),
            Err(HostError::SlotOccupied)
        ));

        // Same host re-reserving is not a conflict
        shared.reserve(first).unwrap();

        shared.release(first);
        shared.reserve(second).unwrap();
    }

    #[test]
    fn test_release_by_non_owner_is_ignored() {
        let shared = SharedEditor::new();
        let owner = shared.allocate_host_id();
        let other = shared.allocate_host_id();

        shared.reserve(owner).unwrap();
        shared.release(other);
        assert!(shared.is_owned());

        shared.release(owner);
        assert!(!shared.is_owned());
    }
}
