//! Highlight geometry.

use slactac_protocols::{BoundingBox, ViewportInfo};

/// Four rectangles darkening everything but `target`: top, bottom, left
/// and right of it. Rectangles clipped away by the viewport collapse to
/// zero size.
pub fn cutout(target: BoundingBox, viewport: ViewportInfo) -> [BoundingBox; 4] {
    let top = target.y.max(0.0);
    let bottom = target.bottom().min(viewport.height);
    let left = target.x.max(0.0);
    let right = target.right().min(viewport.width);

    [
        BoundingBox::new(0.0, 0.0, viewport.width, top),
        BoundingBox::new(0.0, bottom, viewport.width, viewport.height - bottom),
        BoundingBox::new(0.0, top, left, bottom - top),
        BoundingBox::new(right, top, viewport.width - right, bottom - top),
    ]
    .map(BoundingBox::normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ViewportInfo {
        ViewportInfo {
            width: 1000.0,
            height: 800.0,
        }
    }

    #[test]
    fn test_cutout_surrounds_target() {
        let [top, bottom, left, right] = cutout(BoundingBox::new(100.0, 200.0, 300.0, 40.0), viewport());
        assert_eq!(top, BoundingBox::new(0.0, 0.0, 1000.0, 200.0));
        assert_eq!(bottom, BoundingBox::new(0.0, 240.0, 1000.0, 560.0));
        assert_eq!(left, BoundingBox::new(0.0, 200.0, 100.0, 40.0));
        assert_eq!(right, BoundingBox::new(400.0, 200.0, 600.0, 40.0));
    }

    #[test]
    fn test_cutout_covers_viewport_exactly() {
        let rects = cutout(BoundingBox::new(100.0, 200.0, 300.0, 40.0), viewport());
        let covered: f64 = rects.iter().map(BoundingBox::area).sum();
        assert_eq!(covered + 300.0 * 40.0, 1000.0 * 800.0);
    }

    #[test]
    fn test_cutout_clips_to_viewport() {
        let rects = cutout(BoundingBox::new(-10.0, 780.0, 50.0, 50.0), viewport());
        assert_eq!(rects[1].height, 0.0);
        assert_eq!(rects[2].width, 0.0);
        assert_eq!(rects[3].x, 40.0);
    }
}
