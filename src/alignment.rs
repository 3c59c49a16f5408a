//! Alignment engine: snapping and guide detection for a moving element.
//!
//! The X and Y axes are solved independently. For each other element five
//! relations are measured per axis, in this fixed order:
//!
//! | X axis          | Y axis          |
//! |-----------------|-----------------|
//! | left - left     | top - top       |
//! | center - center | center - center |
//! | right - right   | bottom - bottom |
//! | left - right    | top - bottom    |
//! | right - left    | bottom - top    |
//!
//! A relation closer than [`SNAP_THRESHOLD`] that beats the best snap so far
//! moves the element and places the guide. A relation closer than
//! [`GUIDE_THRESHOLD`] otherwise only shows a guide, and only if none is set yet
//! for that axis. Later relations at an equal distance never override earlier ones.

use crate::constants::{GUIDE_THRESHOLD, SNAP_THRESHOLD};
use crate::geometry::Bounds;
use crate::types::{Point, Size};
use serde::{Deserialize, Serialize};

/// Guide line coordinates to render. `None` means no guide on that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentGuides {
    /// y coordinate of a horizontal guide line
    pub horizontal: Option<f32>,
    /// x coordinate of a vertical guide line
    pub vertical: Option<f32>,
}

impl AlignmentGuides {
    /// Returns true when neither guide is set.
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }
}

/// Outcome of [`detect_alignment`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentResult {
    /// Top-left corner after snapping (unchanged per axis when nothing snapped)
    pub snap: Point,
    /// Guide lines to render
    pub guides: AlignmentGuides,
}

/// Running best snap and guide for one axis.
struct AxisSearch {
    snap: f32,
    snap_distance: f32,
    guide: Option<f32>,
    guide_distance: f32,
}

impl AxisSearch {
    fn new(candidate: f32) -> Self {
        Self {
            snap: candidate,
            snap_distance: SNAP_THRESHOLD,
            guide: None,
            guide_distance: GUIDE_THRESHOLD,
        }
    }

    /// Offers one relation: `distance` between the two edges, the coordinate the
    /// moving element would take if it snapped, and where the guide line goes.
    fn offer(&mut self, distance: f32, snapped: f32, line: f32) {
        if distance < self.snap_distance {
            self.snap_distance = distance;
            self.snap = snapped;
            self.guide = Some(line);
        } else if distance < self.guide_distance {
            self.guide_distance = distance;
            if self.guide.is_none() {
                self.guide = Some(line);
            }
        }
    }
}

/// Computes the snapped position and guide lines for an element of
/// `moving_size` tentatively placed at `candidate`.
///
/// `others` must not include the moving element. Ties are resolved by slice
/// order, so callers should pass a canonical ordering.
pub fn detect_alignment(moving_size: Size, candidate: Point, others: &[Bounds]) -> AlignmentResult {
    let moving = Bounds::from_position_size(candidate, moving_size);
    let half_w = moving_size.width / 2.0;
    let half_h = moving_size.height / 2.0;

    let mut x_axis = AxisSearch::new(candidate.x);
    let mut y_axis = AxisSearch::new(candidate.y);

    for other in others {
        x_axis.offer((moving.x - other.x).abs(), other.x, other.x);
        x_axis.offer(
            (moving.center_x - other.center_x).abs(),
            other.center_x - half_w,
            other.center_x,
        );
        x_axis.offer(
            (moving.right - other.right).abs(),
            other.right - moving_size.width,
            other.right,
        );
        x_axis.offer((moving.x - other.right).abs(), other.right, other.right);
        x_axis.offer(
            (moving.right - other.x).abs(),
            other.x - moving_size.width,
            other.x,
        );

        y_axis.offer((moving.y - other.y).abs(), other.y, other.y);
        y_axis.offer(
            (moving.center_y - other.center_y).abs(),
            other.center_y - half_h,
            other.center_y,
        );
        y_axis.offer(
            (moving.bottom - other.bottom).abs(),
            other.bottom - moving_size.height,
            other.bottom,
        );
        y_axis.offer((moving.y - other.bottom).abs(), other.bottom, other.bottom);
        y_axis.offer(
            (moving.bottom - other.y).abs(),
            other.y - moving_size.height,
            other.y,
        );
    }

    AlignmentResult {
        snap: Point::new(x_axis.snap, y_axis.snap),
        guides: AlignmentGuides {
            horizontal: y_axis.guide,
            vertical: x_axis.guide,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BUFFER_HEIGHT, BUFFER_WIDTH, WORKSTATION_HEIGHT, WORKSTATION_WIDTH};

    fn ws_size() -> Size {
        Size::new(WORKSTATION_WIDTH, WORKSTATION_HEIGHT)
    }

    fn ws_at(x: f32, y: f32) -> Bounds {
        Bounds::from_position_size(Point::new(x, y), ws_size())
    }

    fn buffer_at(x: f32, y: f32) -> Bounds {
        Bounds::from_position_size(Point::new(x, y), Size::new(BUFFER_WIDTH, BUFFER_HEIGHT))
    }

    #[test]
    fn test_no_others_keeps_candidate() {
        let result = detect_alignment(ws_size(), Point::new(33.0, 44.0), &[]);
        assert_eq!(result.snap, Point::new(33.0, 44.0));
        assert!(result.guides.is_empty());
    }

    #[test]
    fn test_far_element_does_not_snap() {
        let result = detect_alignment(ws_size(), Point::new(0.0, 0.0), &[ws_at(500.0, 500.0)]);
        assert_eq!(result.snap, Point::new(0.0, 0.0));
        assert!(result.guides.is_empty());
    }

    #[test]
    fn test_left_edge_within_threshold_snaps_exactly() {
        // 3px from the other left edge, far apart vertically.
        let result = detect_alignment(ws_size(), Point::new(203.0, 0.0), &[ws_at(200.0, 400.0)]);
        assert_eq!(result.snap.x, 200.0);
        assert_eq!(result.guides.vertical, Some(200.0));
        assert_eq!(result.snap.y, 0.0);
        assert_eq!(result.guides.horizontal, None);
    }

    #[test]
    fn test_top_edges_four_pixels_apart_snap() {
        // Element A dragged from (100,100) by (+50,+2) next to B at (150,98).
        let result = detect_alignment(ws_size(), Point::new(150.0, 102.0), &[buffer_at(150.0, 98.0)]);
        assert_eq!(result.snap, Point::new(150.0, 98.0));
        assert_eq!(result.guides.horizontal, Some(98.0));
    }

    #[test]
    fn test_center_alignment_between_different_sizes() {
        // Buffer center x = 100 + 35 = 135; workstation at 96 has center 136.
        let result = detect_alignment(ws_size(), Point::new(96.0, 0.0), &[buffer_at(100.0, 300.0)]);
        assert_eq!(result.snap.x, 135.0 - WORKSTATION_WIDTH / 2.0);
        assert_eq!(result.guides.vertical, Some(135.0));
    }

    #[test]
    fn test_touching_relation_snaps_to_opposite_edge() {
        // Moving left edge 2px right of the other's right edge (80).
        let result = detect_alignment(ws_size(), Point::new(82.0, 300.0), &[ws_at(0.0, 0.0)]);
        assert_eq!(result.snap.x, 80.0);
        assert_eq!(result.guides.vertical, Some(80.0));
    }

    #[test]
    fn test_right_to_left_relation() {
        // Moving right edge (x + 80) lands 3px before the other left edge at 300.
        let result = detect_alignment(ws_size(), Point::new(217.0, 500.0), &[ws_at(300.0, 0.0)]);
        assert_eq!(result.snap.x, 220.0);
        assert_eq!(result.guides.vertical, Some(300.0));
    }

    #[test]
    fn test_guide_only_between_thresholds() {
        // 7px away: guide but no snap.
        let result = detect_alignment(ws_size(), Point::new(207.0, 0.0), &[ws_at(200.0, 400.0)]);
        assert_eq!(result.snap.x, 207.0);
        assert_eq!(result.guides.vertical, Some(200.0));
    }

    #[test]
    fn test_closer_snap_overrides_earlier_snap() {
        let others = [ws_at(204.0, 400.0), ws_at(201.0, 600.0)];
        let result = detect_alignment(ws_size(), Point::new(200.0, 0.0), &others);
        assert_eq!(result.snap.x, 201.0);
        assert_eq!(result.guides.vertical, Some(201.0));
    }

    #[test]
    fn test_equal_distance_keeps_first() {
        let others = [ws_at(197.0, 400.0), ws_at(203.0, 600.0)];
        let result = detect_alignment(ws_size(), Point::new(200.0, 0.0), &others);
        assert_eq!(result.snap.x, 197.0);
    }

    #[test]
    fn test_guide_does_not_replace_existing_guide() {
        // First element offers a guide at 8px, the second a closer guide at 6px.
        let others = [ws_at(208.0, 400.0), ws_at(194.0, 600.0)];
        let result = detect_alignment(ws_size(), Point::new(200.0, 0.0), &others);
        assert_eq!(result.snap.x, 200.0);
        assert_eq!(result.guides.vertical, Some(208.0));
    }

    #[test]
    fn test_snap_replaces_guide_from_earlier_relation() {
        let others = [ws_at(208.0, 400.0), ws_at(202.0, 600.0)];
        let result = detect_alignment(ws_size(), Point::new(200.0, 0.0), &others);
        assert_eq!(result.snap.x, 202.0);
        assert_eq!(result.guides.vertical, Some(202.0));
    }

    #[test]
    fn test_axes_are_independent() {
        // Snaps on Y (top-top 2px) while X is far away.
        let result = detect_alignment(ws_size(), Point::new(0.0, 52.0), &[ws_at(400.0, 50.0)]);
        assert_eq!(result.snap, Point::new(0.0, 50.0));
        assert_eq!(result.guides.vertical, None);
        assert_eq!(result.guides.horizontal, Some(50.0));
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn size_strategy() -> impl Strategy<Value = Size> {
        prop_oneof![
            Just(Size::new(80.0, 60.0)),
            Just(Size::new(70.0, 50.0)),
            Just(Size::new(100.0, 60.0)),
        ]
    }

    /// Smallest distance over all ten relations between the two boxes, per axis.
    fn min_axis_distances(moving: &Bounds, other: &Bounds) -> (f32, f32) {
        let dx = [
            (moving.x - other.x).abs(),
            (moving.center_x - other.center_x).abs(),
            (moving.right - other.right).abs(),
            (moving.x - other.right).abs(),
            (moving.right - other.x).abs(),
        ];
        let dy = [
            (moving.y - other.y).abs(),
            (moving.center_y - other.center_y).abs(),
            (moving.bottom - other.bottom).abs(),
            (moving.y - other.bottom).abs(),
            (moving.bottom - other.y).abs(),
        ];
        (
            dx.iter().copied().fold(f32::INFINITY, f32::min),
            dy.iter().copied().fold(f32::INFINITY, f32::min),
        )
    }

    proptest! {
        #[test]
        fn unsnapped_axis_keeps_candidate(
            size in size_strategy(),
            other_size in size_strategy(),
            cx in 0.0f32..1000.0,
            cy in 0.0f32..1000.0,
            ox in 0.0f32..1000.0,
            oy in 0.0f32..1000.0,
        ) {
            let candidate = Point::new(cx, cy);
            let other = Bounds::from_position_size(Point::new(ox, oy), other_size);
            let moving = Bounds::from_position_size(candidate, size);
            let (min_dx, min_dy) = min_axis_distances(&moving, &other);

            let result = detect_alignment(size, candidate, &[other]);

            if min_dx >= SNAP_THRESHOLD {
                prop_assert_eq!(result.snap.x, candidate.x);
            }
            if min_dy >= SNAP_THRESHOLD {
                prop_assert_eq!(result.snap.y, candidate.y);
            }
            if min_dx >= GUIDE_THRESHOLD {
                prop_assert_eq!(result.guides.vertical, None);
            }
            if min_dy >= GUIDE_THRESHOLD {
                prop_assert_eq!(result.guides.horizontal, None);
            }
        }

        #[test]
        fn snap_moves_at_most_threshold(
            size in size_strategy(),
            cx in 0.0f32..1000.0,
            cy in 0.0f32..1000.0,
            ox in 0.0f32..1000.0,
            oy in 0.0f32..1000.0,
        ) {
            let candidate = Point::new(cx, cy);
            let other = Bounds::from_position_size(Point::new(ox, oy), Size::new(80.0, 60.0));
            let result = detect_alignment(size, candidate, &[other]);
            prop_assert!((result.snap.x - candidate.x).abs() < SNAP_THRESHOLD + 0.01);
            prop_assert!((result.snap.y - candidate.y).abs() < SNAP_THRESHOLD + 0.01);
        }
    }
}
