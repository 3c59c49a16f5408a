//! Canvas renderer: lays out everything a canvas shows for one frame.
//!
//! A [`Scene`] is derived from the committed graph plus the coordinator's
//! transient state and is rebuilt on every frame. Painting (egui) and
//! snapshot export (SVG) both consume the same scene, so neither has to know
//! about gestures or alignment.

use crate::constants::{
    self, ARROW_CLEARANCE, ARROW_HALF_WIDTH, LINE_CLICK_AREA_WIDTH, LINE_WIDTH,
    LINE_WIDTH_SELECTED,
};
use crate::coordinator::{DragCoordinator, Gesture};
use crate::geometry::{self, Bounds, EdgeSegment, HandleSide};
use crate::types::{ConnectorId, ElementId, ElementKind, Graph, PlacedElement, Point, Selection, Size};
use serde::{Deserialize, Serialize};

/// Canvas sizing rules, user configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// The canvas never gets narrower than this
    pub min_width: f32,
    /// The canvas never gets shorter than this
    pub min_height: f32,
    /// Space kept to the right of and below the furthest element
    pub padding: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_width: constants::CANVAS_MIN_WIDTH,
            min_height: constants::CANVAS_MIN_HEIGHT,
            padding: constants::CANVAS_PADDING,
        }
    }
}

/// Size of the canvas content: grows to fit every element, never below the minimum.
pub fn content_size(graph: &Graph, config: &CanvasConfig) -> Size {
    graph.elements.iter().map(PlacedElement::bounds).fold(
        Size::new(config.min_width, config.min_height),
        |size, b| {
            Size::new(
                size.width.max(b.right + config.padding),
                size.height.max(b.bottom + config.padding),
            )
        },
    )
}

/// Outline style of an element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderStyle {
    /// Continuous outline
    Solid,
    /// Dashed outline (buffers)
    Dashed,
}

/// A laid out element box.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBox {
    /// Element shown by this box
    pub id: ElementId,
    /// Box geometry
    pub bounds: Bounds,
    /// Main label
    pub label: String,
    /// Secondary label under the main one
    pub sublabel: String,
    /// Outline style
    pub border: BorderStyle,
    /// The element is the current selection
    pub selected: bool,
    /// The element is the pending source of a modifier-click connection
    pub connect_source: bool,
    /// The element is being moved; the box stays at its committed position
    pub dragging: bool,
    /// Connector handle anchors, only present while selected
    pub handles: Vec<(HandleSide, Point)>,
}

/// A laid out connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorPath {
    /// Connector shown by this path
    pub id: ConnectorId,
    /// Edge-to-edge segment
    pub segment: EdgeSegment,
    /// Visible stroke width
    pub width: f32,
    /// Width of the invisible click target
    pub hit_width: f32,
    /// The connector is the current selection
    pub selected: bool,
}

impl ConnectorPath {
    /// Arrowhead triangle: base at the segment end, tip on the target boundary.
    pub fn arrow_head(&self) -> [Point; 3] {
        let from = self.segment.from();
        let to = self.segment.to();
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length = (dx * dx + dy * dy).sqrt().max(f32::EPSILON);
        let (nx, ny) = (dx / length, dy / length);
        let tip = Point::new(to.x + nx * ARROW_CLEARANCE, to.y + ny * ARROW_CLEARANCE);
        [
            tip,
            Point::new(to.x - ny * ARROW_HALF_WIDTH, to.y + nx * ARROW_HALF_WIDTH),
            Point::new(to.x + ny * ARROW_HALF_WIDTH, to.y - nx * ARROW_HALF_WIDTH),
        ]
    }
}

/// A dashed alignment guide spanning the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    /// Start of the line
    pub from: Point,
    /// End of the line
    pub to: Point,
}

/// Everything a canvas draws for one frame, in canvas-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Size of the scrollable content
    pub content_size: Size,
    /// Element boxes in graph order (later boxes are drawn on top)
    pub boxes: Vec<ElementBox>,
    /// The element being moved, at its unsnapped tentative position
    pub ghost: Option<ElementBox>,
    /// Renderable connectors
    pub connectors: Vec<ConnectorPath>,
    /// Alignment guides of the active drag
    pub guides: Vec<GuideLine>,
    /// In-flight connection from a handle to the pointer
    pub link_preview: Option<(Point, Point)>,
}

impl Scene {
    /// Lays out `graph` with the transient state of `coordinator`.
    ///
    /// `stations` resolves the workstation names shown on step boxes; for a
    /// production line canvas it is the same graph.
    pub fn build(
        graph: &Graph,
        stations: &Graph,
        coordinator: &DragCoordinator,
        selection: Selection,
        config: &CanvasConfig,
    ) -> Scene {
        let content_size = content_size(graph, config);
        let dragging = coordinator.dragging_id();

        let boxes: Vec<ElementBox> = graph
            .elements
            .iter()
            .map(|element| {
                let selected = selection.element() == Some(element.id);
                let mut b = element_box(element, element.bounds(), stations);
                b.selected = selected;
                b.connect_source = coordinator.pending_link_source() == Some(element.id);
                b.dragging = dragging == Some(element.id);
                if selected && !b.dragging {
                    b.handles = HandleSide::BOTH
                        .iter()
                        .map(|side| (*side, geometry::handle_position(&b.bounds, *side)))
                        .collect();
                }
                b
            })
            .collect();

        let ghost = dragging.zip(coordinator.tentative_position()).and_then(|(id, at)| {
            let element = graph.element(id)?;
            let mut b = element_box(
                element,
                Bounds::from_position_size(at, element.size()),
                stations,
            );
            b.dragging = true;
            Some(b)
        });

        let connectors = graph
            .connectors
            .iter()
            .filter_map(|connector| {
                // Stale endpoints and coincident centers are not drawn.
                let from = graph.element(connector.from)?.bounds();
                let to = graph.element(connector.to)?.bounds();
                let segment = geometry::edge_intersection(&from, &to)?;
                let selected = selection.connector() == Some(connector.id);
                Some(ConnectorPath {
                    id: connector.id,
                    segment,
                    width: if selected { LINE_WIDTH_SELECTED } else { LINE_WIDTH },
                    hit_width: LINE_CLICK_AREA_WIDTH,
                    selected,
                })
            })
            .collect();

        let mut guides = Vec::new();
        if coordinator.is_busy() {
            let active = coordinator.guides();
            if let Some(y) = active.horizontal {
                guides.push(GuideLine {
                    from: Point::new(0.0, y),
                    to: Point::new(content_size.width, y),
                });
            }
            if let Some(x) = active.vertical {
                guides.push(GuideLine {
                    from: Point::new(x, 0.0),
                    to: Point::new(x, content_size.height),
                });
            }
        }

        let link_preview = match coordinator.gesture() {
            Gesture::HandleDragging { source, side } => graph
                .element(*source)
                .zip(coordinator.pointer())
                .map(|(element, pointer)| {
                    (geometry::handle_position(&element.bounds(), *side), pointer)
                }),
            _ => None,
        };

        Scene {
            content_size,
            boxes,
            ghost,
            connectors,
            guides,
            link_preview,
        }
    }

    /// Topmost element box containing `point`.
    pub fn hit_element(&self, point: Point) -> Option<ElementId> {
        self.boxes
            .iter()
            .rev()
            .find(|b| b.bounds.contains(point))
            .map(|b| b.id)
    }

    /// Handle under `point`, if any box currently shows handles.
    pub fn hit_handle(&self, point: Point) -> Option<(ElementId, HandleSide)> {
        self.boxes.iter().rev().find_map(|b| {
            b.handles
                .iter()
                .find(|(side, _)| geometry::handle_hit(&b.bounds, *side, point))
                .map(|(side, _)| (b.id, *side))
        })
    }

    /// Topmost connector whose click target contains `point`.
    pub fn hit_connector(&self, point: Point) -> Option<ConnectorId> {
        self.connectors
            .iter()
            .rev()
            .find(|c| {
                geometry::distance_to_segment(point, c.segment.from(), c.segment.to())
                    <= c.hit_width / 2.0
            })
            .map(|c| c.id)
    }
}

fn element_box(element: &PlacedElement, bounds: Bounds, stations: &Graph) -> ElementBox {
    let (label, sublabel, border) = match &element.kind {
        ElementKind::Workstation {
            name, station_type, ..
        } => (name.clone(), station_type.label().to_string(), BorderStyle::Solid),
        ElementKind::Buffer { name, capacity } => {
            (name.clone(), format!("Capacity {capacity}"), BorderStyle::Dashed)
        }
        ElementKind::Step {
            step_id,
            operation,
            workstation_id,
        } => {
            let station = workstation_id
                .and_then(|id| stations.element_name(id))
                .unwrap_or("Unassigned workstation");
            (
                format!("{step_id}. {operation}"),
                station.to_string(),
                BorderStyle::Solid,
            )
        }
    };
    ElementBox {
        id: element.id,
        bounds,
        label,
        sublabel,
        border,
        selected: false,
        connect_source: false,
        dragging: false,
        handles: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::PaletteItem;
    use crate::types::{Connector, ConnectorKind, GraphScope, StationType};
    use float_cmp::approx_eq;
    use uuid::Uuid;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn line() -> Graph {
        let mut graph = Graph::new(GraphScope::ProductionLine(id(100)));
        graph.insert_element(PlacedElement::new(
            id(1),
            Point::new(100.0, 100.0),
            PaletteItem::Workstation(StationType::Processing).instantiate(&graph),
        ));
        graph.insert_element(PlacedElement::new(
            id(2),
            Point::new(300.0, 100.0),
            PaletteItem::Buffer.instantiate(&graph),
        ));
        graph.insert_connector(Connector {
            id: id(10),
            from: id(1),
            to: id(2),
            kind: ConnectorKind::transport_path(),
        });
        graph
    }

    fn build(graph: &Graph, coordinator: &DragCoordinator, selection: Selection) -> Scene {
        Scene::build(graph, graph, coordinator, selection, &CanvasConfig::default())
    }

    #[test]
    fn test_content_size_has_minimum() {
        let graph = Graph::new(GraphScope::ProductionLine(id(1)));
        assert_eq!(content_size(&graph, &CanvasConfig::default()), Size::new(600.0, 400.0));
    }

    #[test]
    fn test_content_size_grows_with_elements() {
        let mut graph = line();
        graph.set_position(id(2), Point::new(700.0, 500.0));
        // Buffer is 70x50, plus 20 padding.
        assert_eq!(content_size(&graph, &CanvasConfig::default()), Size::new(790.0, 570.0));
    }

    #[test]
    fn test_connector_routed_edge_to_edge() {
        let graph = line();
        let scene = build(&graph, &DragCoordinator::new(), Selection::None);

        assert_eq!(scene.connectors.len(), 1);
        let path = scene.connectors[0];
        // Workstation center (140,130), buffer center (335,125).
        assert!(approx_eq!(f32, path.segment.from_x, 180.0, epsilon = 0.5));
        assert!(path.segment.to_x < 300.0);
        assert_eq!(path.width, LINE_WIDTH);
        assert_eq!(path.hit_width, LINE_CLICK_AREA_WIDTH);
    }

    #[test]
    fn test_selected_connector_is_wider() {
        let graph = line();
        let scene = build(&graph, &DragCoordinator::new(), Selection::Connector(id(10)));
        assert!(scene.connectors[0].selected);
        assert_eq!(scene.connectors[0].width, LINE_WIDTH_SELECTED);
    }

    #[test]
    fn test_stale_connector_is_skipped() {
        let mut graph = line();
        graph.remove_element(id(2));
        let scene = build(&graph, &DragCoordinator::new(), Selection::None);
        assert!(scene.connectors.is_empty());
        assert_eq!(graph.connectors.len(), 1);
    }

    #[test]
    fn test_handles_only_on_selected_element() {
        let graph = line();
        let scene = build(&graph, &DragCoordinator::new(), Selection::Element(id(1)));

        assert_eq!(scene.boxes[0].handles.len(), 2);
        assert!(scene.boxes[1].handles.is_empty());
        assert_eq!(scene.hit_handle(Point::new(96.0, 130.0)), Some((id(1), HandleSide::Left)));
        assert_eq!(scene.hit_handle(Point::new(186.0, 131.0)), Some((id(1), HandleSide::Right)));
    }

    #[test]
    fn test_buffer_box_is_dashed() {
        let graph = line();
        let scene = build(&graph, &DragCoordinator::new(), Selection::None);
        assert_eq!(scene.boxes[0].border, BorderStyle::Solid);
        assert_eq!(scene.boxes[1].border, BorderStyle::Dashed);
        assert_eq!(scene.boxes[1].sublabel, "Capacity 50");
    }

    #[test]
    fn test_guides_span_content_while_dragging() {
        let mut graph = line();
        graph.set_position(id(2), Point::new(300.0, 300.0));
        let mut coordinator = DragCoordinator::new();
        coordinator.begin_reposition(id(1), Point::new(110.0, 110.0), &graph);
        // Moves the workstation's left edge 3px from the buffer's left edge.
        coordinator.hover(Point::new(313.0, 110.0), &graph);

        let scene = build(&graph, &coordinator, Selection::None);

        assert_eq!(
            scene.guides,
            vec![GuideLine {
                from: Point::new(300.0, 0.0),
                to: Point::new(300.0, scene.content_size.height),
            }]
        );
        let ghost = scene.ghost.as_ref().unwrap();
        assert_eq!(ghost.bounds.x, 303.0);
        assert!(scene.boxes[0].dragging);
    }

    #[test]
    fn test_no_guides_when_idle() {
        let graph = line();
        let scene = build(&graph, &DragCoordinator::new(), Selection::None);
        assert!(scene.guides.is_empty());
        assert!(scene.ghost.is_none());
        assert!(scene.link_preview.is_none());
    }

    #[test]
    fn test_link_preview_follows_pointer() {
        let graph = line();
        let mut coordinator = DragCoordinator::new();
        coordinator.begin_link(id(1), HandleSide::Right, &graph);
        coordinator.hover(Point::new(250.0, 200.0), &graph);

        let scene = build(&graph, &coordinator, Selection::Element(id(1)));

        assert_eq!(
            scene.link_preview,
            Some((Point::new(184.0, 130.0), Point::new(250.0, 200.0)))
        );
    }

    #[test]
    fn test_hit_testing() {
        let graph = line();
        let scene = build(&graph, &DragCoordinator::new(), Selection::None);

        assert_eq!(scene.hit_element(Point::new(120.0, 120.0)), Some(id(1)));
        assert_eq!(scene.hit_element(Point::new(250.0, 20.0)), None);
        // Connector runs roughly along y = 128 between x = 180 and x = 294.
        assert_eq!(scene.hit_connector(Point::new(240.0, 135.0)), Some(id(10)));
        assert_eq!(scene.hit_connector(Point::new(240.0, 160.0)), None);
    }

    #[test]
    fn test_step_labels_use_bound_workstation() {
        let layout = line();
        let mut routine = Graph::new(GraphScope::Routine(id(200)));
        routine.insert_element(PlacedElement::new(
            id(20),
            Point::new(0.0, 0.0),
            ElementKind::Step {
                step_id: 1,
                operation: "Cutting".into(),
                workstation_id: Some(id(1)),
            },
        ));
        routine.insert_element(PlacedElement::new(
            id(21),
            Point::new(200.0, 0.0),
            ElementKind::Step {
                step_id: 2,
                operation: "Packing".into(),
                workstation_id: None,
            },
        ));

        let scene = Scene::build(
            &routine,
            &layout,
            &DragCoordinator::new(),
            Selection::None,
            &CanvasConfig::default(),
        );

        assert_eq!(scene.boxes[0].label, "1. Cutting");
        assert_eq!(scene.boxes[0].sublabel, "Processing 1");
        assert_eq!(scene.boxes[1].sublabel, "Unassigned workstation");
        assert_eq!(scene.boxes[0].bounds.width, constants::STEP_WIDTH);
    }

    #[test]
    fn test_arrow_head_tip_touches_target() {
        let graph = line();
        let scene = build(&graph, &DragCoordinator::new(), Selection::None);
        let [tip, _, _] = scene.connectors[0].arrow_head();
        let target = graph.element(id(2)).unwrap().bounds();
        assert!(approx_eq!(f32, tip.x, target.x, epsilon = 0.5));
    }
}
