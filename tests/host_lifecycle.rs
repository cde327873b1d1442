//! Activation, adoption, and teardown of the shared widget.

mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use berth::container::Container;
use berth::decorations::Decoration;
use berth::errors::HostError;
use berth::events::TextEdit;
use berth::resize::Size;
use berth::shared::SharedEditor;
use berth::syntax::{DocumentVersion, LanguageId};
use berth::widget::{EditorWidget, SurfaceId, TextWidget};
use berth::HostEvent;

use common::*;

#[test]
fn test_remounting_reuses_the_single_widget() {
    let fixture = Fixture::new();

    let mut host_a = fixture.host();
    let container_a = Container::new();
    host_a
        .activate(container_a.clone(), test_config("let x=1;"))
        .unwrap();
    pump_until_active(&mut host_a);

    let surface = container_a.attached().unwrap();
    assert_eq!(fixture.shared.widgets_created(), 1);
    host_a.deactivate();

    // Second host adopts the same instance, surface and content intact
    let mut host_b = fixture.host();
    let container_b = Container::new();
    let mut config = test_config("");
    config.value = None;
    host_b.activate(container_b.clone(), config).unwrap();
    assert!(host_b.is_active());

    assert_eq!(fixture.shared.widgets_created(), 1);
    assert_eq!(container_b.attached(), Some(surface));
    assert_eq!(host_b.text().unwrap(), "let x=1;");
}

#[test]
fn test_overlapping_activation_is_rejected() {
    let fixture = Fixture::new();

    let mut host_a = fixture.host();
    host_a
        .activate(Container::new(), test_config("x"))
        .unwrap();
    pump_until_active(&mut host_a);

    assert!(matches!(
        host_a.activate(Container::new(), test_config("x")),
        Err(HostError::AlreadyActive)
    ));

    let mut host_b = fixture.host();
    assert!(matches!(
        host_b.activate(Container::new(), test_config("y")),
        Err(HostError::SlotOccupied)
    ));

    // The loser retries cleanly once the slot frees
    host_a.deactivate();
    host_b
        .activate(Container::new(), test_config("y"))
        .unwrap();
    assert!(host_b.is_active());
}

#[test]
fn test_value_before_mount_lands_without_notification() {
    let (bootstrap, gate) = gated_bootstrap();
    let fixture = Fixture::new().with_bootstrap(bootstrap);

    let mut host = fixture.host();
    host.activate(Container::new(), test_config("first"))
        .unwrap();
    assert!(host.is_pending());

    // Overrides the configured value while the runtime still loads
    host.set_value("second").unwrap();

    gate.open();
    let events = pump_until_active(&mut host);

    assert_eq!(host.text().unwrap(), "second");
    assert!(changed_texts(&events).is_empty());
}

#[test]
fn test_value_set_after_mount_lands_without_notification() {
    let fixture = Fixture::new();
    let mut host = fixture.host();
    host.activate(Container::new(), test_config("let x=1;"))
        .unwrap();
    pump_until_active(&mut host);
    host.take_events();

    host.set_value("pushed").unwrap();
    assert_eq!(host.text().unwrap(), "pushed");
    assert!(changed_texts(&host.take_events()).is_empty());

    // Setting the text the widget already has is a no-op
    let version = host.version().unwrap();
    host.set_value("pushed").unwrap();
    assert_eq!(host.version().unwrap(), version);
}

#[test]
fn test_user_edit_notifies_once_with_full_text() {
    let fixture = Fixture::new();
    let mut host = fixture.host();
    host.activate(Container::new(), test_config("let x=1;"))
        .unwrap();
    pump_until_active(&mut host);
    host.take_events();

    host.edit(6, 1, "2").unwrap();

    let changes: Vec<_> = host
        .take_events()
        .into_iter()
        .filter_map(|event| match event {
            HostEvent::ContentChanged { text, change } => Some((text, change)),
            _ => None,
        })
        .collect();

    assert_eq!(changes.len(), 1);
    let (text, change) = &changes[0];
    assert_eq!(text, "let x=2;");
    assert_eq!(change.version, DocumentVersion(1));
    assert_eq!(
        change.edit,
        TextEdit {
            start: 6,
            removed: 1,
            inserted: 1
        }
    );
}

#[test]
fn test_adoption_reapplies_theme_and_language_but_not_options() {
    let (shared, factory_log) = counting_shared();
    let fixture = Fixture::new().with_shared(shared);

    let mut host_a = fixture.host();
    let mut config_a = test_config("let x=1;");
    config_a
        .options
        .insert("tabSize".to_string(), serde_json::Value::from(8));
    host_a.activate(Container::new(), config_a).unwrap();
    pump_until_active(&mut host_a);
    host_a.deactivate();

    let mut host_b = fixture.host();
    let mut config_b = test_config("");
    config_b.value = None;
    config_b.theme = "light".to_string();
    config_b.language = LanguageId::Rust;
    config_b
        .options
        .insert("tabSize".to_string(), serde_json::Value::from(2));
    host_b.activate(Container::new(), config_b).unwrap();

    // The factory ran once, with the first host's options; the second
    // host's options went nowhere
    assert_eq!(factory_log.borrow().len(), 1);
    assert_eq!(factory_log.borrow()[0].options["tabSize"], 8);

    // Theme and language did re-apply
    assert_eq!(host_b.theme().unwrap(), "light");
    assert_eq!(host_b.language().unwrap(), LanguageId::Rust);
}

#[test]
fn test_deactivation_releases_the_resize_listener() {
    let fixture = Fixture::new();
    let mut host = fixture.host();
    host.activate(Container::new(), test_config("x")).unwrap();
    pump_until_active(&mut host);
    assert_eq!(fixture.resize.listener_count(), 1);

    host.deactivate();
    assert_eq!(fixture.resize.listener_count(), 0);

    // Publishing afterwards reaches nobody and changes nothing
    fixture.resize.publish(Size {
        width: 640,
        height: 480,
    });
    host.pump(Instant::now());
    assert!(host.take_events().is_empty());
}

#[test]
fn test_container_holds_the_surface_only_while_active() {
    let fixture = Fixture::new();
    let mut host = fixture.host();
    let container = Container::new();
    host.activate(container.clone(), test_config("x")).unwrap();
    pump_until_active(&mut host);
    assert!(container.attached().is_some());

    host.deactivate();
    assert_eq!(container.attached(), None);

    // Deactivating again changes nothing
    host.deactivate();
    assert_eq!(container.attached(), None);
}

#[test]
fn test_drop_releases_the_slot() {
    let fixture = Fixture::new();
    let mut host = fixture.host();
    host.activate(Container::new(), test_config("x")).unwrap();
    pump_until_active(&mut host);
    assert!(fixture.shared.is_owned());

    drop(host);
    assert!(!fixture.shared.is_owned());

    let mut next = fixture.host();
    next.activate(Container::new(), test_config("y")).unwrap();
    assert!(next.is_active());
}

#[test]
fn test_operations_require_activation() {
    let fixture = Fixture::new();
    let mut host = fixture.host();

    assert!(matches!(host.edit(0, 0, "x"), Err(HostError::NotActive)));
    assert!(matches!(host.set_value("x"), Err(HostError::NotActive)));
    assert!(matches!(
        host.set_language(LanguageId::Rust),
        Err(HostError::NotActive)
    ));
    assert!(matches!(
        host.set_theme("dark"),
        Err(HostError::NotActive)
    ));
    assert!(host.text().is_err());
    assert!(host.version().is_err());
}

/// Widget wrapper that records layout calls, standing in for a shell's
/// real embedded editor.
struct ProbeWidget {
    inner: TextWidget,
    layouts: Rc<RefCell<Vec<(u32, u32)>>>,
}

impl EditorWidget for ProbeWidget {
    fn surface(&self) -> SurfaceId {
        self.inner.surface()
    }
    fn text(&self) -> String {
        self.inner.text()
    }
    fn version(&self) -> DocumentVersion {
        self.inner.version()
    }
    fn set_text(&mut self, text: &str) -> TextEdit {
        self.inner.set_text(text)
    }
    fn splice(&mut self, at: usize, removed: usize, inserted: &str) -> TextEdit {
        self.inner.splice(at, removed, inserted)
    }
    fn set_language(&mut self, language: LanguageId) {
        self.inner.set_language(language)
    }
    fn language(&self) -> LanguageId {
        self.inner.language()
    }
    fn set_theme(&mut self, theme: &str) {
        self.inner.set_theme(theme)
    }
    fn theme(&self) -> &str {
        self.inner.theme()
    }
    fn set_decorations(&mut self, decorations: Vec<Decoration>) {
        self.inner.set_decorations(decorations)
    }
    fn decorations(&self) -> &[Decoration] {
        self.inner.decorations()
    }
    fn layout(&mut self, width: u32, height: u32) {
        self.layouts.borrow_mut().push((width, height));
        self.inner.layout(width, height);
    }
}

#[test]
fn test_resizes_reach_a_custom_widget() {
    let layouts = Rc::new(RefCell::new(Vec::new()));
    let factory_layouts = Rc::clone(&layouts);
    let shared = SharedEditor::with_factory(Box::new(move |params| {
        Box::new(ProbeWidget {
            inner: TextWidget::new(params),
            layouts: Rc::clone(&factory_layouts),
        })
    }));
    let fixture = Fixture::new().with_shared(shared);

    let mut host = fixture.host();
    host.activate(Container::new(), test_config("let x=1;"))
        .unwrap();
    pump_until_active(&mut host);

    fixture.resize.publish(Size {
        width: 800,
        height: 600,
    });
    host.pump(Instant::now());
    assert_eq!(*layouts.borrow(), vec![(800, 600)]);

    // Resizes after deactivation never reach the widget
    host.deactivate();
    fixture.resize.publish(Size {
        width: 1,
        height: 1,
    });
    host.pump(Instant::now());
    assert_eq!(*layouts.borrow(), vec![(800, 600)]);
}
