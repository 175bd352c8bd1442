use super::*;

#[test]
fn test_bounding_box_contains() {
    let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
    assert!(bbox.contains(50.0, 40.0));
    assert!(bbox.contains(10.0, 20.0));
    assert!(!bbox.contains(0.0, 0.0));
    assert!(!bbox.contains(200.0, 40.0));
}

#[test]
fn test_bounding_box_edges() {
    let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
    assert_eq!(bbox.right(), 110.0);
    assert_eq!(bbox.bottom(), 70.0);
    assert_eq!(bbox.area(), 5000.0);
}

#[test]
fn test_bounding_box_normalized() {
    let bbox = BoundingBox::new(5.0, 5.0, -3.0, 2.0).normalized();
    assert_eq!(bbox.width, 0.0);
    assert_eq!(bbox.height, 2.0);
    assert_eq!(bbox.x, 5.0);
}

#[test]
fn test_viewport_default() {
    let viewport = ViewportInfo::default();
    assert_eq!(viewport.width, 1280.0);
    assert_eq!(viewport.height, 720.0);
}

#[test]
fn test_mutation_record_constructors() {
    let added = MutationRecord::added("list", vec!["a", "b"]);
    assert_eq!(added.added.len(), 2);
    assert!(added.removed.is_empty());

    let removed = MutationRecord::removed("list", vec!["a"]);
    assert!(removed.added.is_empty());
    assert_eq!(removed.removed, vec!["a"]);

    let text = MutationRecord::text("label");
    assert!(text.added.is_empty() && text.removed.is_empty());
}

#[test]
fn test_pointer_event_serialization() {
    let event = PointerEvent::Click { x: 1.0, y: 2.0 };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"click\""));

    let parsed: PointerEvent = serde_json::from_str(r#"{"type":"move","x":3.0,"y":4.0}"#).unwrap();
    assert_eq!(parsed, PointerEvent::Move { x: 3.0, y: 4.0 });
}
