//! Shell-owned mount points for the widget surface.
//!
//! A container is a place in the shell's layout tree that can hold the
//! shared widget's surface. Handles clone cheaply and share one node, the
//! way a shell passes the same mount point to different parts of itself.

use std::cell::RefCell;
use std::rc::Rc;

use crate::widget::SurfaceId;

/// A mount point that can hold at most one surface.
#[derive(Debug, Clone, Default)]
pub struct Container {
    node: Rc<RefCell<Option<SurfaceId>>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a surface, replacing whatever was attached before.
    pub(crate) fn attach(&self, surface: SurfaceId) {
        *self.node.borrow_mut() = Some(surface);
    }

    /// Detach the current surface, if any.
    pub(crate) fn detach(&self) -> Option<SurfaceId> {
        self.node.borrow_mut().take()
    }

    /// The currently attached surface.
    pub fn attached(&self) -> Option<SurfaceId> {
        *self.node.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_detach() {
        let container = Container::new();
        assert_eq!(container.attached(), None);

        container.attach(SurfaceId(7));
        assert_eq!(container.attached(), Some(SurfaceId(7)));

        assert_eq!(container.detach(), Some(SurfaceId(7)));
        assert_eq!(container.attached(), None);
        assert_eq!(container.detach(), None);
    }

    #[test]
    fn test_clones_share_the_node() {
        let container = Container::new();
        let other = container.clone();

        container.attach(SurfaceId(1));
        assert_eq!(other.attached(), Some(SurfaceId(1)));
    }
}
