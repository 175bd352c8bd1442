use super::*;
use slactac_dom_memory::{Element, MemoryPage};
use slactac_protocols::{LabelDom, ViewportInfo};

const LABEL: &str = "p-channel_sidebar__name";

struct Fixture {
    page: Arc<MemoryPage>,
    general: Element,
    padded: Element,
    blank: Element,
    tiny: Element,
    picker: Picker<MemoryPage>,
}

fn fixture_on(host: &str) -> Fixture {
    let page = Arc::new(MemoryPage::new(
        host,
        ViewportInfo {
            width: 1000.0,
            height: 800.0,
        },
    ));
    let general = Element::new("span")
        .with_class(LABEL)
        .with_text("general")
        .with_rect(BoundingBox::new(10.0, 10.0, 200.0, 20.0));
    let padded = Element::new("span")
        .with_class(LABEL)
        .with_text(" general ")
        .with_rect(BoundingBox::new(10.0, 40.0, 200.0, 20.0));
    let blank = Element::new("span")
        .with_text("   ")
        .with_rect(BoundingBox::new(10.0, 70.0, 200.0, 20.0));
    let tiny = Element::new("i")
        .with_text("•")
        .with_rect(BoundingBox::new(300.0, 10.0, 2.0, 2.0));
    let list = Element::new("div")
        .with_class("p-channel_sidebar__list")
        .with_rect(BoundingBox::new(0.0, 0.0, 260.0, 600.0))
        .with_child(general.clone())
        .with_child(padded.clone())
        .with_child(blank.clone())
        .with_child(tiny.clone());
    page.append_child(&page.body(), list);

    let picker = Picker::new(page.clone(), PickerConfig::default());
    Fixture {
        page,
        general,
        padded,
        blank,
        tiny,
        picker,
    }
}

fn fixture() -> Fixture {
    fixture_on("app.slack.com")
}

#[test]
fn test_refuses_other_hosts() {
    let f = fixture_on("example.com");
    let err = f.picker.activate().unwrap_err();
    assert!(matches!(err, PickerError::UnsupportedHost(host) if host == "example.com"));
    assert!(!f.picker.is_active());
    assert!(f.page.overlays().is_empty());
}

#[test]
fn test_accepts_subdomain_of_target() {
    let f = fixture_on("acme.app.slack.com");
    assert!(matches!(f.picker.activate(), Ok(Activation::Started(_))));
}

#[test]
fn test_activate_is_idempotent() {
    let f = fixture();
    assert!(matches!(f.picker.activate(), Ok(Activation::Started(_))));
    assert!(matches!(f.picker.activate(), Ok(Activation::AlreadyActive)));
    assert_eq!(f.page.overlays().len(), 4);
    assert_eq!(f.page.listener_count(), 1);
    assert_eq!(f.page.cursor(), "crosshair");
}

#[test]
fn test_deactivate_restores_page() {
    let f = fixture();
    f.page.set_cursor("text");
    let _events = f.picker.activate().unwrap();

    assert!(f.picker.deactivate());
    assert!(!f.picker.deactivate());
    assert!(f.page.overlays().is_empty());
    assert_eq!(f.page.listener_count(), 0);
    assert_eq!(f.page.cursor(), "text");
}

#[test]
fn test_pointer_highlights_candidate_under_overlays() {
    let f = fixture();
    let _events = f.picker.activate().unwrap();

    assert!(f.picker.pointer_moved(50.0, 15.0));
    assert_eq!(f.picker.highlighted(), Some(f.general.clone()));

    // Same candidate again is not a change.
    assert!(!f.picker.pointer_moved(60.0, 20.0));

    let overlays = f.page.overlays();
    let top = overlays[0].rect();
    assert_eq!(top, BoundingBox::new(0.0, 0.0, 1000.0, 10.0));
}

#[test]
fn test_size_filter() {
    let f = fixture();
    let _events = f.picker.activate().unwrap();

    // Too small.
    f.picker.pointer_moved(301.0, 11.0);
    assert_eq!(f.picker.highlighted(), None);

    // Body spans the whole viewport.
    f.picker.pointer_moved(900.0, 700.0);
    assert_eq!(f.picker.highlighted(), None);
    assert!(f.page.overlays().iter().all(|o| o.rect().area() == 0.0));

    assert!(f.page.element_at(301.0, 11.0) == Some(f.tiny.clone()));
}

#[test]
fn test_click_without_highlight_is_no_pick() {
    let f = fixture();
    let _events = f.picker.activate().unwrap();

    assert_eq!(f.picker.clicked(), Some(PickOutcome::NoPick));
    assert!(!f.picker.is_active());
    assert!(f.page.overlays().is_empty());
    assert_eq!(f.picker.clicked(), None);
}

#[test]
fn test_click_picks_trimmed_text() {
    let f = fixture();
    let _events = f.picker.activate().unwrap();

    f.picker.pointer_moved(50.0, 45.0);
    assert_eq!(f.picker.highlighted(), Some(f.padded.clone()));
    assert_eq!(
        f.picker.clicked(),
        Some(PickOutcome::Picked("general".to_string()))
    );
    assert!(!f.picker.is_active());
    assert_eq!(f.page.cursor(), "auto");
}

#[test]
fn test_whitespace_text_is_no_pick() {
    let f = fixture();
    let _events = f.picker.activate().unwrap();

    f.picker.pointer_moved(50.0, 75.0);
    assert_eq!(f.picker.highlighted(), Some(f.blank.clone()));
    assert_eq!(f.picker.clicked(), Some(PickOutcome::NoPick));
}

#[test]
fn test_pointer_ignored_while_inactive() {
    let f = fixture();
    assert!(!f.picker.pointer_moved(50.0, 15.0));
    assert_eq!(f.picker.highlighted(), None);
    assert_eq!(f.page.text(&f.general), "general");
}
