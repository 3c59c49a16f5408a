//! Geometry kernel: bounding boxes, edge-to-edge connector routing and hit testing.
//!
//! Every function here is pure and cheap enough to run on each pointer event.

use crate::constants::{
    ARROW_CLEARANCE, CONNECTION_HANDLE_OUTSET, CONNECTION_HANDLE_SIZE, DIRECTION_EPSILON,
};
use crate::types::{PlacedElement, Point, Size};
use serde::{Deserialize, Serialize};

/// Axis-aligned box of an element with its derived edges and center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Box width
    pub width: f32,
    /// Box height
    pub height: f32,
    /// Horizontal center
    pub center_x: f32,
    /// Vertical center
    pub center_y: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl Bounds {
    /// Derives all edges from a top-left corner and a size.
    pub fn from_position_size(position: Point, size: Size) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
            center_x: position.x + size.width / 2.0,
            center_y: position.y + size.height / 2.0,
            right: position.x + size.width,
            bottom: position.y + size.height,
        }
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Inclusive point-in-box test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right && point.y >= self.y && point.y <= self.bottom
    }
}

/// Bounding box of an element at its committed position.
pub fn bounds(element: &PlacedElement) -> Bounds {
    Bounds::from_position_size(element.position, element.size())
}

/// A connector segment running from one box edge to (just short of) another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeSegment {
    /// Start x on the source box boundary
    pub from_x: f32,
    /// Start y on the source box boundary
    pub from_y: f32,
    /// End x, pulled back from the target boundary by the arrow clearance
    pub to_x: f32,
    /// End y, pulled back from the target boundary by the arrow clearance
    pub to_y: f32,
}

impl EdgeSegment {
    /// Start point.
    pub fn from(&self) -> Point {
        Point::new(self.from_x, self.from_y)
    }

    /// End point.
    pub fn to(&self) -> Point {
        Point::new(self.to_x, self.to_y)
    }
}

/// Distance from a box center to its boundary along the unit direction `(nx, ny)`.
fn boundary_distance(bounds: &Bounds, nx: f32, ny: f32) -> f32 {
    let nx = if nx == 0.0 { DIRECTION_EPSILON } else { nx };
    let ny = if ny == 0.0 { DIRECTION_EPSILON } else { ny };
    let half_w = bounds.width / 2.0;
    let half_h = bounds.height / 2.0;
    (half_w / nx).abs().min((half_h / ny).abs())
}

/// Routes a connector along the ray between the two box centers.
///
/// The start point is where the ray leaves `from`; the end point is where it
/// enters `to`, moved back by [`ARROW_CLEARANCE`] so the arrowhead does not
/// overlap the target. Returns `None` when both centers coincide.
pub fn edge_intersection(from: &Bounds, to: &Bounds) -> Option<EdgeSegment> {
    let dx = to.center_x - from.center_x;
    let dy = to.center_y - from.center_y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 {
        return None;
    }

    let nx = dx / distance;
    let ny = dy / distance;

    let from_scale = boundary_distance(from, nx, ny);
    let to_scale = boundary_distance(to, nx, ny);

    Some(EdgeSegment {
        from_x: from.center_x + from_scale * nx,
        from_y: from.center_y + from_scale * ny,
        to_x: to.center_x - to_scale * nx - ARROW_CLEARANCE * nx,
        to_y: to.center_y - to_scale * ny - ARROW_CLEARANCE * ny,
    })
}

/// Which edge of a selected element a connector handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleSide {
    /// Left edge midpoint
    Left,
    /// Right edge midpoint
    Right,
}

impl HandleSide {
    /// Both sides, in drawing order.
    pub const BOTH: [HandleSide; 2] = [HandleSide::Left, HandleSide::Right];
}

/// Center of the connector handle on `side`, slightly outside the element edge.
pub fn handle_position(bounds: &Bounds, side: HandleSide) -> Point {
    match side {
        HandleSide::Left => Point::new(bounds.x - CONNECTION_HANDLE_OUTSET, bounds.center_y),
        HandleSide::Right => Point::new(bounds.right + CONNECTION_HANDLE_OUTSET, bounds.center_y),
    }
}

/// Returns true when `point` falls on the circular handle hit target.
pub fn handle_hit(bounds: &Bounds, side: HandleSide, point: Point) -> bool {
    let center = handle_position(bounds, side);
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    let radius = CONNECTION_HANDLE_SIZE / 2.0;
    dx * dx + dy * dy <= radius * radius
}

/// Shortest distance from `point` to the segment `a`-`b`.
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f32 {
    let (vx, vy) = (b.x - a.x, b.y - a.y);
    let (px, py) = (point.x - a.x, point.y - a.y);
    let len_sq = vx * vx + vy * vy;

    if len_sq < 0.0001 {
        return (px * px + py * py).sqrt();
    }

    let t = ((px * vx + py * vy) / len_sq).clamp(0.0, 1.0);
    let (cx, cy) = (a.x + vx * t, a.y + vy * t);
    ((point.x - cx).powi(2) + (point.y - cy).powi(2)).sqrt()
}
