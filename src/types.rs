//! Core data types for the layout and routine canvases.
//!
//! This module defines the positioned elements (workstations, buffers and
//! routine steps), the directed connectors between them, and the [`Graph`]
//! container that an editing session keeps in sync with the store.

use crate::constants;
use crate::geometry::{self, Bounds};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a placed element, assigned by the store.
pub type ElementId = Uuid;

/// Identifier of a connector, assigned by the store.
pub type ConnectorId = Uuid;

/// Identifier of a production line or routine.
pub type ScopeId = Uuid;

/// A point in canvas-local pixel coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamps both coordinates to be non-negative.
    pub fn clamp_non_negative(self) -> Point {
        Point::new(self.x.max(0.0), self.y.max(0.0))
    }

    /// Returns true when both coordinates are non-negative.
    pub fn is_on_canvas(self) -> bool {
        self.x >= 0.0 && self.y >= 0.0
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Size {
    /// Creates a size from its extents.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Half of the extents, used to center boxes on a point.
    pub fn half(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Workstation categories offered by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationType {
    /// Machining or other processing
    Processing,
    /// Assembly of parts
    Assembly,
    /// Quality inspection
    Inspection,
    /// Packaging
    Packaging,
    /// Storage
    Storage,
}

impl StationType {
    /// All station types in palette order.
    pub const ALL: [StationType; 5] = [
        StationType::Processing,
        StationType::Assembly,
        StationType::Inspection,
        StationType::Packaging,
        StationType::Storage,
    ];

    /// Human readable label, also used as the default name prefix.
    pub fn label(self) -> &'static str {
        match self {
            StationType::Processing => "Processing",
            StationType::Assembly => "Assembly",
            StationType::Inspection => "Inspection",
            StationType::Packaging => "Packaging",
            StationType::Storage => "Storage",
        }
    }
}

/// Processing time distribution of a workstation, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessingTime {
    /// Always the same duration
    Fixed {
        /// Duration in seconds
        value: f32,
    },
    /// Uniformly distributed between two bounds
    Uniform {
        /// Lower bound in seconds
        min: f32,
        /// Upper bound in seconds
        max: f32,
    },
    /// Normally distributed
    Normal {
        /// Mean in seconds
        mean: f32,
        /// Standard deviation in seconds
        std: f32,
    },
}

impl Default for ProcessingTime {
    fn default() -> Self {
        ProcessingTime::Fixed {
            value: constants::DEFAULT_PROCESSING_TIME,
        }
    }
}

/// The variant of a placed element together with its variant-specific attributes.
///
/// The variant alone decides the size of the element's box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    /// A workstation on a production line
    Workstation {
        /// Display name
        name: String,
        /// Category picked from the palette
        station_type: StationType,
        /// Number of parts processed in parallel
        capacity: u32,
        /// Processing time distribution
        processing_time: ProcessingTime,
    },
    /// A buffer between workstations
    Buffer {
        /// Display name
        name: String,
        /// Storage capacity
        capacity: u32,
    },
    /// A step of a process routine
    Step {
        /// Externally visible sequence number, unrelated to geometry
        step_id: u32,
        /// Operation performed at this step
        operation: String,
        /// Workstation the step is bound to, if any
        workstation_id: Option<ElementId>,
    },
}

impl ElementKind {
    /// Fixed box size of this variant.
    pub fn size(&self) -> Size {
        match self {
            ElementKind::Workstation { .. } => {
                Size::new(constants::WORKSTATION_WIDTH, constants::WORKSTATION_HEIGHT)
            }
            ElementKind::Buffer { .. } => {
                Size::new(constants::BUFFER_WIDTH, constants::BUFFER_HEIGHT)
            }
            ElementKind::Step { .. } => Size::new(constants::STEP_WIDTH, constants::STEP_HEIGHT),
        }
    }

    /// Short variant name used in logs and error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            ElementKind::Workstation { .. } => "workstation",
            ElementKind::Buffer { .. } => "buffer",
            ElementKind::Step { .. } => "step",
        }
    }

    /// Returns true when this variant lives on a routine canvas.
    pub fn is_step(&self) -> bool {
        matches!(self, ElementKind::Step { .. })
    }
}

/// A positioned, fixed-size box on a canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedElement {
    /// Stable identifier assigned by the store
    pub id: ElementId,
    /// Top-left corner in canvas coordinates
    pub position: Point,
    /// Variant and attributes
    pub kind: ElementKind,
}

impl PlacedElement {
    /// Creates an element with the given identity.
    pub fn new(id: ElementId, position: Point, kind: ElementKind) -> Self {
        Self { id, position, kind }
    }

    /// Size of the element's box.
    pub fn size(&self) -> Size {
        self.kind.size()
    }

    /// Bounding box of the element at its committed position.
    pub fn bounds(&self) -> Bounds {
        geometry::bounds(self)
    }
}

/// The variant of a connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConnectorKind {
    /// Material transport between workstations and buffers
    TransportPath {
        /// Transport duration in seconds
        transport_time: f32,
    },
    /// Ordering edge between two routine steps
    StepLink,
}

impl ConnectorKind {
    /// Default attributes of a new transport path.
    pub fn transport_path() -> Self {
        ConnectorKind::TransportPath {
            transport_time: constants::DEFAULT_TRANSPORT_TIME,
        }
    }

    /// Short variant name used in logs and error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            ConnectorKind::TransportPath { .. } => "transport path",
            ConnectorKind::StepLink => "step link",
        }
    }
}

/// A directed edge between two placed elements of the same graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    /// Stable identifier assigned by the store
    pub id: ConnectorId,
    /// Source element
    pub from: ElementId,
    /// Target element
    pub to: ElementId,
    /// Variant and attributes
    pub kind: ConnectorKind,
}

/// Which graph a set of elements and connectors belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphScope {
    /// Workstations, buffers and transport paths of a production line
    ProductionLine(ScopeId),
    /// Steps and step links of a process routine
    Routine(ScopeId),
}

impl GraphScope {
    /// Returns true when `kind` may be placed in this scope.
    pub fn accepts_element(&self, kind: &ElementKind) -> bool {
        match self {
            GraphScope::ProductionLine(_) => !kind.is_step(),
            GraphScope::Routine(_) => kind.is_step(),
        }
    }

    /// Returns true when `kind` may connect elements of this scope.
    pub fn accepts_connector(&self, kind: &ConnectorKind) -> bool {
        matches!(
            (self, kind),
            (GraphScope::ProductionLine(_), ConnectorKind::TransportPath { .. })
                | (GraphScope::Routine(_), ConnectorKind::StepLink)
        )
    }

    /// Connector variant created by gestures on this scope's canvas.
    pub fn default_connector(&self) -> ConnectorKind {
        match self {
            GraphScope::ProductionLine(_) => ConnectorKind::transport_path(),
            GraphScope::Routine(_) => ConnectorKind::StepLink,
        }
    }
}

/// The elements and connectors of one production line or one routine.
///
/// Element order is the order reported by the store (creation order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Scope this graph was loaded from
    pub scope: GraphScope,
    /// Placed elements, unique by id
    pub elements: Vec<PlacedElement>,
    /// Connectors between the elements
    pub connectors: Vec<Connector>,
}

impl Graph {
    /// Creates an empty graph for `scope`.
    pub fn new(scope: GraphScope) -> Self {
        Self {
            scope,
            elements: Vec::new(),
            connectors: Vec::new(),
        }
    }

    /// Looks up an element by id.
    pub fn element(&self, id: ElementId) -> Option<&PlacedElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Looks up a connector by id.
    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }

    /// Returns true when a connector `from -> to` already exists.
    pub fn has_connector(&self, from: ElementId, to: ElementId) -> bool {
        self.connectors.iter().any(|c| c.from == from && c.to == to)
    }

    /// First element (in graph order) whose bounds contain `point`.
    pub fn element_at(&self, point: Point) -> Option<&PlacedElement> {
        self.elements.iter().find(|e| e.bounds().contains(point))
    }

    /// Bounds of every element except `moving`, sorted by ascending id.
    ///
    /// The alignment engine resolves ties by evaluation order, so the order
    /// is canonicalized here instead of depending on store order.
    pub fn alignment_targets(&self, moving: ElementId) -> Vec<Bounds> {
        let mut others: Vec<&PlacedElement> =
            self.elements.iter().filter(|e| e.id != moving).collect();
        others.sort_by_key(|e| e.id);
        others.into_iter().map(PlacedElement::bounds).collect()
    }

    /// Number of workstations of the given type.
    pub fn count_stations(&self, station: StationType) -> usize {
        self.elements
            .iter()
            .filter(|e| {
                matches!(&e.kind, ElementKind::Workstation { station_type, .. } if *station_type == station)
            })
            .count()
    }

    /// Number of buffers.
    pub fn count_buffers(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e.kind, ElementKind::Buffer { .. }))
            .count()
    }

    /// Number of routine steps.
    pub fn count_steps(&self) -> usize {
        self.elements.iter().filter(|e| e.kind.is_step()).count()
    }

    /// Appends a freshly created element, replacing any stale copy with the same id.
    pub fn insert_element(&mut self, element: PlacedElement) {
        self.elements.retain(|e| e.id != element.id);
        self.elements.push(element);
    }

    /// Moves an element. Returns false if the element is unknown.
    pub fn set_position(&mut self, id: ElementId, position: Point) -> bool {
        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(element) => {
                element.position = position;
                true
            }
            None => false,
        }
    }

    /// Removes an element. Connectors that referenced it are kept and simply
    /// stop rendering.
    pub fn remove_element(&mut self, id: ElementId) -> Option<PlacedElement> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    /// Appends a freshly created connector.
    pub fn insert_connector(&mut self, connector: Connector) {
        self.connectors.retain(|c| c.id != connector.id);
        self.connectors.push(connector);
    }

    /// Removes a connector.
    pub fn remove_connector(&mut self, id: ConnectorId) -> Option<Connector> {
        let index = self.connectors.iter().position(|c| c.id == id)?;
        Some(self.connectors.remove(index))
    }

    /// Display name of an element (workstation/buffer name or step operation).
    pub fn element_name(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|e| match &e.kind {
            ElementKind::Workstation { name, .. } | ElementKind::Buffer { name, .. } => {
                name.as_str()
            }
            ElementKind::Step { operation, .. } => operation.as_str(),
        })
    }
}

/// What the user currently has selected on a canvas. At most one thing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing selected
    #[default]
    None,
    /// A placed element
    Element(ElementId),
    /// A connector
    Connector(ConnectorId),
}

impl Selection {
    /// The selected element, if the selection is an element.
    pub fn element(&self) -> Option<ElementId> {
        match self {
            Selection::Element(id) => Some(*id),
            _ => None,
        }
    }

    /// The selected connector, if the selection is a connector.
    pub fn connector(&self) -> Option<ConnectorId> {
        match self {
            Selection::Connector(id) => Some(*id),
            _ => None,
        }
    }
}
