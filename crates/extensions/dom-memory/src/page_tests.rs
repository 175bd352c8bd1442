use super::*;

const LABEL: &str = "p-channel_sidebar__name";

fn sidebar_page() -> (MemoryPage, Element, Element) {
    let page = MemoryPage::new("app.slack.com", ViewportInfo::default());
    let list = Element::new("div")
        .with_class("p-channel_sidebar__list")
        .with_rect(BoundingBox::new(0.0, 0.0, 260.0, 600.0));
    let general = Element::new("span")
        .with_class(LABEL)
        .with_text("general")
        .with_rect(BoundingBox::new(10.0, 10.0, 200.0, 20.0));
    list.attach(general.clone());
    page.body().attach(list.clone());
    (page, list, general)
}

#[test]
fn test_find_by_class_document_and_scope() {
    let (page, list, general) = sidebar_page();
    assert_eq!(page.first_by_class("p-channel_sidebar__list"), Some(list.clone()));
    assert_eq!(page.find_by_class(None, LABEL), vec![general.clone()]);
    assert_eq!(page.find_by_class(Some(&list), LABEL), vec![general.clone()]);
    // Scope itself is excluded.
    assert!(page.find_by_class(Some(&general), LABEL).is_empty());
}

#[test]
fn test_set_text_counts_writes_and_is_plain() {
    let (page, _, general) = sidebar_page();
    page.set_text(&general, "<b>bold</b>");
    assert_eq!(page.text(&general), "<b>bold</b>");
    assert!(general.children().is_empty());
    assert_eq!(page.text_writes(), 1);
}

#[test]
fn test_data_round_trip() {
    let (page, _, general) = sidebar_page();
    assert_eq!(page.data(&general, "slactacOrigin"), None);
    page.set_data(&general, "slactacOrigin", "general");
    assert_eq!(page.data(&general, "slactacOrigin").as_deref(), Some("general"));
}

#[tokio::test]
async fn test_observer_receives_one_batch_per_append() {
    let (page, list, _) = sidebar_page();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = page.observe(tx);

    let a = Element::new("span").with_class(LABEL).with_text("a");
    let b = Element::new("span").with_class(LABEL).with_text("b");
    page.append_children(&list, vec![a.clone(), b.clone()]);

    let batch = rx.recv().await.unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].target, list);
    assert_eq!(batch[0].added, vec![a, b]);

    page.disconnect(id);
    assert_eq!(page.observer_count(), 0);
    page.append_child(&list, Element::new("span"));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_remove_child_emits_removed_record() {
    let (page, list, general) = sidebar_page();
    let (tx, mut rx) = mpsc::unbounded_channel();
    page.observe(tx);

    assert!(page.remove_child(&list, &general));
    let batch = rx.recv().await.unwrap();
    assert_eq!(batch[0].removed, vec![general.clone()]);
    assert!(!page.remove_child(&list, &general));
}

#[test]
fn test_closed_observers_are_dropped() {
    let (page, list, _) = sidebar_page();
    let (tx, rx) = mpsc::unbounded_channel();
    page.observe(tx);
    drop(rx);
    page.append_child(&list, Element::new("span"));
    assert_eq!(page.observer_count(), 0);
}

#[test]
fn test_element_at_prefers_deepest_visible() {
    let (page, list, general) = sidebar_page();
    assert_eq!(page.element_at(20.0, 15.0), Some(general.clone()));
    assert_eq!(page.element_at(20.0, 300.0), Some(list.clone()));

    page.set_hidden(&general, true);
    assert_eq!(page.element_at(20.0, 15.0), Some(list));
}

#[test]
fn test_element_at_prefers_higher_z_index() {
    let (page, _, _) = sidebar_page();
    let overlay = page.create_overlay();
    page.place_overlay(&overlay, BoundingBox::new(0.0, 0.0, 50.0, 50.0));
    assert_eq!(page.element_at(20.0, 15.0), Some(overlay.clone()));
    assert_eq!(page.overlays(), vec![overlay.clone()]);

    page.remove_node(&overlay);
    assert!(page.overlays().is_empty());
}

#[test]
fn test_zero_area_elements_are_not_hit() {
    let (page, list, _) = sidebar_page();
    let empty = Element::new("span").with_rect(BoundingBox::new(5.0, 5.0, 0.0, 0.0));
    list.attach(empty);
    assert_eq!(page.element_at(5.0, 5.0), Some(list));
}

#[tokio::test]
async fn test_listener_intercepts_clicks() {
    let (page, _, _) = sidebar_page();
    assert!(page.click(1.0, 1.0));
    assert_eq!(page.page_clicks(), 1);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = page.listen_pointer(tx);
    page.move_pointer(3.0, 4.0);
    assert!(!page.click(3.0, 4.0));
    assert_eq!(page.page_clicks(), 1);
    assert_eq!(rx.recv().await, Some(PointerEvent::Move { x: 3.0, y: 4.0 }));
    assert_eq!(rx.recv().await, Some(PointerEvent::Click { x: 3.0, y: 4.0 }));

    page.unlisten_pointer(id);
    assert!(page.click(1.0, 1.0));
    assert_eq!(page.page_clicks(), 2);
}

#[test]
fn test_cursor_defaults_to_auto() {
    let (page, _, _) = sidebar_page();
    assert_eq!(page.cursor(), "auto");
    page.set_cursor("crosshair");
    assert_eq!(page.cursor(), "crosshair");
}
