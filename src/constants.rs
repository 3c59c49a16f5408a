//! Shared application-wide constants.
//! Centralizes tweakable values used by the geometry kernel, the alignment
//! engine and canvas rendering.

// Element dimensions
/// Workstation box width in canvas pixels.
pub const WORKSTATION_WIDTH: f32 = 80.0;
/// Workstation box height in canvas pixels.
pub const WORKSTATION_HEIGHT: f32 = 60.0;
/// Buffer box width in canvas pixels.
pub const BUFFER_WIDTH: f32 = 70.0;
/// Buffer box height in canvas pixels.
pub const BUFFER_HEIGHT: f32 = 50.0;
/// Routine step box width in canvas pixels.
pub const STEP_WIDTH: f32 = 100.0;
/// Routine step box height in canvas pixels.
pub const STEP_HEIGHT: f32 = 60.0;

// Alignment
/// Distance (pixels) under which a moving element is pulled onto an alignment.
pub const SNAP_THRESHOLD: f32 = 5.0;
/// Distance (pixels) under which a dashed guide line is shown without snapping.
pub const GUIDE_THRESHOLD: f32 = 10.0;

// Connector routing
/// Gap left between a connector end and its target box for the arrowhead.
pub const ARROW_CLEARANCE: f32 = 6.0;
/// Stand-in for a zero direction component when computing edge crossings.
pub const DIRECTION_EPSILON: f32 = 0.001;
/// Diameter of the connector handle hit target.
pub const CONNECTION_HANDLE_SIZE: f32 = 12.0;
/// How far the handle center sits outside the element edge.
pub const CONNECTION_HANDLE_OUTSET: f32 = 4.0;

// Strokes
/// Visible connector stroke width.
pub const LINE_WIDTH: f32 = 2.0;
/// Connector stroke width while selected.
pub const LINE_WIDTH_SELECTED: f32 = 3.0;
/// Invisible stroke width used for connector click targets.
pub const LINE_CLICK_AREA_WIDTH: f32 = 20.0;
/// Guide line stroke width.
pub const GUIDE_LINE_WIDTH: f32 = 1.0;
/// Dash and gap length for guide lines and link previews.
pub const DASH_LENGTH: f32 = 4.0;

// Canvas
/// Minimum canvas content width.
pub const CANVAS_MIN_WIDTH: f32 = 600.0;
/// Minimum canvas content height.
pub const CANVAS_MIN_HEIGHT: f32 = 400.0;
/// Padding added to the right/bottom of the furthest element.
pub const CANVAS_PADDING: f32 = 20.0;

// Defaults for new entities
/// Capacity given to a freshly placed workstation.
pub const DEFAULT_WORKSTATION_CAPACITY: u32 = 1;
/// Fixed processing time (seconds) given to a freshly placed workstation.
pub const DEFAULT_PROCESSING_TIME: f32 = 10.0;
/// Capacity given to a freshly placed buffer.
pub const DEFAULT_BUFFER_CAPACITY: u32 = 50;
/// Transport time (seconds) given to a freshly created transport path.
pub const DEFAULT_TRANSPORT_TIME: f32 = 1.0;

// Notifications
/// Maximum number of notifications kept for display.
pub const MAX_NOTIFICATIONS: usize = 20;

// Arrowheads
/// Half the width of a connector arrowhead base.
pub const ARROW_HALF_WIDTH: f32 = 4.0;
