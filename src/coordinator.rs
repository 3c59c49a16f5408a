//! Drag/drop coordinator: the per-canvas gesture state machines.
//!
//! Two machines share one [`DragCoordinator`]:
//!
//! - the drag machine, `Idle -> PaletteDragging | Repositioning | HandleDragging -> Idle`,
//!   driven by `begin_*`, [`hover`](DragCoordinator::hover),
//!   [`commit`](DragCoordinator::commit) and [`cancel`](DragCoordinator::cancel);
//! - the click-to-connect machine, driven by
//!   [`modifier_click`](DragCoordinator::modifier_click).
//!
//! The coordinator never talks to the store. A successful commit yields a
//! [`MutationIntent`] that the session turns into a store call.

use crate::alignment::{detect_alignment, AlignmentGuides};
use crate::constants;
use crate::geometry::HandleSide;
use crate::types::{
    ElementId, ElementKind, Graph, Point, ProcessingTime, Size, StationType,
};
use serde::{Deserialize, Serialize};

/// Something that can be dragged from the palette onto a canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaletteItem {
    /// A workstation of the given type
    Workstation(StationType),
    /// A buffer
    Buffer,
    /// A routine step performing `operation`
    Step {
        /// Operation name for the new step
        operation: String,
    },
}

impl PaletteItem {
    /// Palette entries offered on a production line canvas.
    pub fn layout_items() -> Vec<PaletteItem> {
        StationType::ALL
            .iter()
            .map(|t| PaletteItem::Workstation(*t))
            .chain(std::iter::once(PaletteItem::Buffer))
            .collect()
    }

    /// Size of the element this item creates.
    pub fn size(&self) -> Size {
        match self {
            PaletteItem::Workstation(_) => {
                Size::new(constants::WORKSTATION_WIDTH, constants::WORKSTATION_HEIGHT)
            }
            PaletteItem::Buffer => Size::new(constants::BUFFER_WIDTH, constants::BUFFER_HEIGHT),
            PaletteItem::Step { .. } => Size::new(constants::STEP_WIDTH, constants::STEP_HEIGHT),
        }
    }

    /// Text shown on the palette button.
    pub fn label(&self) -> String {
        match self {
            PaletteItem::Workstation(station_type) => station_type.label().to_string(),
            PaletteItem::Buffer => "Buffer".to_string(),
            PaletteItem::Step { operation } => format!("Step: {operation}"),
        }
    }

    /// Builds the attributes of a new element with default values.
    ///
    /// Names are numbered after the elements of the same kind already in `graph`,
    /// and steps get the next sequence number.
    pub fn instantiate(&self, graph: &Graph) -> ElementKind {
        match self {
            PaletteItem::Workstation(station_type) => ElementKind::Workstation {
                name: format!(
                    "{} {}",
                    station_type.label(),
                    graph.count_stations(*station_type) + 1
                ),
                station_type: *station_type,
                capacity: constants::DEFAULT_WORKSTATION_CAPACITY,
                processing_time: ProcessingTime::default(),
            },
            PaletteItem::Buffer => ElementKind::Buffer {
                name: format!("Buffer {}", graph.count_buffers() + 1),
                capacity: constants::DEFAULT_BUFFER_CAPACITY,
            },
            PaletteItem::Step { operation } => ElementKind::Step {
                step_id: u32::try_from(graph.count_steps() + 1).unwrap_or(u32::MAX),
                operation: operation.clone(),
                workstation_id: None,
            },
        }
    }
}

/// A mutation requested by a committed gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationIntent {
    /// Create a new element at `position`
    CreateElement {
        /// Attributes of the new element
        kind: ElementKind,
        /// Top-left corner, non-negative
        position: Point,
    },
    /// Move an existing element
    MoveElement {
        /// Element to move
        id: ElementId,
        /// New top-left corner, non-negative
        position: Point,
    },
    /// Connect two distinct elements
    CreateConnector {
        /// Source element
        from: ElementId,
        /// Target element
        to: ElementId,
    },
}

/// Maps client (window) pointer coordinates into canvas-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CanvasViewport {
    /// Client position of the visible canvas' top-left corner
    pub client_origin: Point,
    /// Current scroll offset of the canvas content
    pub scroll: Point,
}

impl CanvasViewport {
    /// Converts a client pointer position to canvas-local coordinates.
    pub fn to_canvas(&self, client: Point) -> Point {
        client - self.client_origin + self.scroll
    }

    /// Converts a canvas-local position back to client coordinates.
    pub fn to_client(&self, canvas: Point) -> Point {
        canvas + self.client_origin - self.scroll
    }
}

/// The drag gesture currently in progress on a canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    /// No drag in progress
    #[default]
    Idle,
    /// A palette item is being dragged towards the canvas
    PaletteDragging(PaletteItem),
    /// An element is being moved
    Repositioning {
        /// Element being moved
        id: ElementId,
        /// Committed position of the element when the drag started
        origin: Point,
        /// Pointer position when the drag started
        grab: Point,
    },
    /// A connector is being dragged out of a handle
    HandleDragging {
        /// Element owning the handle
        source: ElementId,
        /// Handle the drag started from
        side: HandleSide,
    },
}

/// Per-canvas gesture state.
///
/// All fields are transient. They are created when a gesture begins, updated on
/// hover and cleared on commit or cancel, whatever the outcome.
#[derive(Debug, Clone, Default)]
pub struct DragCoordinator {
    gesture: Gesture,
    guides: AlignmentGuides,
    tentative: Option<Point>,
    pointer: Option<Point>,
    pending_link_source: Option<ElementId>,
}

impl DragCoordinator {
    /// Creates an idle coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current drag gesture.
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Returns true while any drag gesture is active.
    pub fn is_busy(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Guide lines computed at the last hover tick.
    pub fn guides(&self) -> AlignmentGuides {
        self.guides
    }

    /// Unsnapped position of the element being moved, if any.
    pub fn tentative_position(&self) -> Option<Point> {
        self.tentative
    }

    /// Last canvas-local pointer position seen during a drag.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Element being moved, if a reposition drag is active.
    pub fn dragging_id(&self) -> Option<ElementId> {
        match self.gesture {
            Gesture::Repositioning { id, .. } => Some(id),
            _ => None,
        }
    }

    /// First element of a pending modifier-click connection.
    pub fn pending_link_source(&self) -> Option<ElementId> {
        self.pending_link_source
    }

    /// Starts dragging `item` from the palette. Ignored while another drag is active.
    pub fn begin_palette(&mut self, item: PaletteItem) -> bool {
        if self.is_busy() {
            return false;
        }
        log::debug!("palette drag started: {}", item.label());
        self.gesture = Gesture::PaletteDragging(item);
        true
    }

    /// Starts moving element `id`, grabbed at `pointer`.
    ///
    /// Ignored while another drag is active or when `id` is not in `graph`.
    pub fn begin_reposition(&mut self, id: ElementId, pointer: Point, graph: &Graph) -> bool {
        if self.is_busy() {
            return false;
        }
        let Some(element) = graph.element(id) else {
            return false;
        };
        log::debug!("reposition started for {id}");
        self.gesture = Gesture::Repositioning {
            id,
            origin: element.position,
            grab: pointer,
        };
        self.tentative = Some(element.position);
        self.pointer = Some(pointer);
        true
    }

    /// Starts dragging a connector out of `source`'s handle on `side`.
    ///
    /// Ignored while another drag is active or when `source` is not in `graph`.
    pub fn begin_link(&mut self, source: ElementId, side: HandleSide, graph: &Graph) -> bool {
        if self.is_busy() || graph.element(source).is_none() {
            return false;
        }
        log::debug!("link drag started from {source} ({side:?})");
        self.gesture = Gesture::HandleDragging { source, side };
        true
    }

    /// Updates transient state for the pointer at canvas-local `pointer`.
    ///
    /// While repositioning, guides are refreshed but the element is not snapped.
    pub fn hover(&mut self, pointer: Point, graph: &Graph) {
        match &self.gesture {
            Gesture::Idle => return,
            Gesture::PaletteDragging(_) | Gesture::HandleDragging { .. } => {}
            Gesture::Repositioning { id, origin, grab } => {
                let tentative = *origin + (pointer - *grab);
                if let Some(element) = graph.element(*id) {
                    let others = graph.alignment_targets(*id);
                    self.guides = detect_alignment(element.size(), tentative, &others).guides;
                }
                self.tentative = Some(tentative);
            }
        }
        self.pointer = Some(pointer);
    }

    /// Ends the active drag at canvas-local `pointer`.
    ///
    /// Transient state is cleared before anything else. Returns the mutation to
    /// commit, or `None` when the gesture does not amount to one.
    pub fn commit(&mut self, pointer: Point, graph: &Graph) -> Option<MutationIntent> {
        let gesture = std::mem::take(&mut self.gesture);
        self.clear_transient();

        match gesture {
            Gesture::Idle => None,
            Gesture::PaletteDragging(item) => {
                let position = (pointer - item.size().half()).clamp_non_negative();
                Some(MutationIntent::CreateElement {
                    kind: item.instantiate(graph),
                    position,
                })
            }
            Gesture::Repositioning { id, origin, grab } => {
                let element = graph.element(id)?;
                let tentative = origin + (pointer - grab);
                let others = graph.alignment_targets(id);
                let aligned = detect_alignment(element.size(), tentative, &others);
                Some(MutationIntent::MoveElement {
                    id,
                    position: aligned.snap.clamp_non_negative(),
                })
            }
            Gesture::HandleDragging { source, .. } => {
                let target = graph.element_at(pointer)?;
                if target.id == source {
                    log::debug!("link dropped back onto its source, ignoring");
                    return None;
                }
                Some(MutationIntent::CreateConnector {
                    from: source,
                    to: target.id,
                })
            }
        }
    }

    /// Abandons the active drag without emitting a mutation.
    pub fn cancel(&mut self) {
        if self.is_busy() {
            log::debug!("drag cancelled");
        }
        self.gesture = Gesture::Idle;
        self.clear_transient();
    }

    /// Handles a modifier-click on element `id`.
    ///
    /// The first click records `id` as the pending source. The second click
    /// always clears the pending source and yields a connection when the two
    /// ids differ.
    pub fn modifier_click(&mut self, id: ElementId) -> Option<MutationIntent> {
        match self.pending_link_source.take() {
            None => {
                self.pending_link_source = Some(id);
                None
            }
            Some(source) if source == id => None,
            Some(source) => Some(MutationIntent::CreateConnector { from: source, to: id }),
        }
    }

    /// Forgets a pending modifier-click source.
    pub fn clear_pending_link(&mut self) {
        self.pending_link_source = None;
    }

    fn clear_transient(&mut self) {
        self.guides = AlignmentGuides::default();
        self.tentative = None;
        self.pointer = None;
    }
}
