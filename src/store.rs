//! Persistence boundary of the editor.
//!
//! The canvas core only ever talks to a [`LayoutStore`]. Identity of elements and
//! connectors is assigned here and never guessed by the caller.
//! [`InMemoryStore`] is the implementation used by the desktop app; its
//! contents are saved between runs as a JSON snapshot.

use crate::error::StoreError;
use crate::types::{
    Connector, ConnectorId, ConnectorKind, ElementId, ElementKind, GraphScope, PlacedElement,
    Point, ProcessingTime, StationType,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read and write operations the editor needs from a persistence backend.
///
/// Coordinates crossing this boundary are canvas-local and non-negative.
pub trait LayoutStore {
    /// All elements of `scope`, in creation order.
    fn list_elements(&self, scope: GraphScope) -> Result<Vec<PlacedElement>, StoreError>;

    /// All connectors of `scope`, in creation order.
    fn list_connectors(&self, scope: GraphScope) -> Result<Vec<Connector>, StoreError>;

    /// Creates an element and assigns its id.
    fn create_element(
        &mut self,
        scope: GraphScope,
        kind: ElementKind,
        position: Point,
    ) -> Result<PlacedElement, StoreError>;

    /// Moves an existing element.
    fn update_element_position(&mut self, id: ElementId, position: Point) -> Result<(), StoreError>;

    /// Creates a connector between two elements of `scope` and assigns its id.
    fn create_connector(
        &mut self,
        scope: GraphScope,
        from: ElementId,
        to: ElementId,
        kind: ConnectorKind,
    ) -> Result<Connector, StoreError>;

    /// Deletes an element. Connectors referencing it are left alone.
    fn delete_element(&mut self, id: ElementId) -> Result<(), StoreError>;

    /// Deletes a connector.
    fn delete_connector(&mut self, id: ConnectorId) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredElement {
    scope: GraphScope,
    element: PlacedElement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredConnector {
    scope: GraphScope,
    connector: Connector,
}

/// A [`LayoutStore`] kept entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryStore {
    scopes: Vec<GraphScope>,
    elements: Vec<StoredElement>,
    connectors: Vec<StoredConnector>,
}

impl InMemoryStore {
    /// Creates an empty store with no scopes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new, empty production line.
    pub fn create_production_line(&mut self) -> GraphScope {
        let scope = GraphScope::ProductionLine(Uuid::new_v4());
        self.scopes.push(scope);
        scope
    }

    /// Registers a new, empty routine.
    pub fn create_routine(&mut self) -> GraphScope {
        let scope = GraphScope::Routine(Uuid::new_v4());
        self.scopes.push(scope);
        scope
    }

    /// Known scopes, in registration order.
    pub fn scopes(&self) -> &[GraphScope] {
        &self.scopes
    }

    /// First registered production line, if any.
    pub fn first_production_line(&self) -> Option<GraphScope> {
        self.scopes
            .iter()
            .copied()
            .find(|s| matches!(s, GraphScope::ProductionLine(_)))
    }

    /// First registered routine, if any.
    pub fn first_routine(&self) -> Option<GraphScope> {
        self.scopes
            .iter()
            .copied()
            .find(|s| matches!(s, GraphScope::Routine(_)))
    }

    /// A store holding a small production line and a routine over its stations.
    pub fn with_demo() -> Result<Self, StoreError> {
        let mut store = Self::new();
        let line = store.create_production_line();
        let routine = store.create_routine();

        let station = |name: &str, station_type: StationType| ElementKind::Workstation {
            name: name.to_string(),
            station_type,
            capacity: 1,
            processing_time: ProcessingTime::default(),
        };

        let saw = store.create_element(
            line,
            station("Processing 1", StationType::Processing),
            Point::new(60.0, 120.0),
        )?;
        let buffer = store.create_element(
            line,
            ElementKind::Buffer {
                name: "Buffer 1".to_string(),
                capacity: 50,
            },
            Point::new(220.0, 125.0),
        )?;
        let assembly = store.create_element(
            line,
            station("Assembly 1", StationType::Assembly),
            Point::new(370.0, 120.0),
        )?;
        let inspection = store.create_element(
            line,
            station("Inspection 1", StationType::Inspection),
            Point::new(370.0, 260.0),
        )?;
        for (from, to) in [(&saw, &buffer), (&buffer, &assembly), (&assembly, &inspection)] {
            store.create_connector(line, from.id, to.id, ConnectorKind::transport_path())?;
        }

        let mut previous: Option<ElementId> = None;
        for (index, (operation, bound)) in [
            ("Cutting", &saw),
            ("Assembling", &assembly),
            ("Checking", &inspection),
        ]
        .into_iter()
        .enumerate()
        {
            let step = store.create_element(
                routine,
                ElementKind::Step {
                    step_id: index as u32 + 1,
                    operation: operation.to_string(),
                    workstation_id: Some(bound.id),
                },
                Point::new(60.0 + 160.0 * index as f32, 100.0),
            )?;
            if let Some(previous) = previous {
                store.create_connector(routine, previous, step.id, ConnectorKind::StepLink)?;
            }
            previous = Some(step.id);
        }

        Ok(store)
    }

    /// Serializes the whole store as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restores a store from [`InMemoryStore::to_json`] output.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    fn ensure_scope(&self, scope: GraphScope) -> Result<(), StoreError> {
        if self.scopes.contains(&scope) {
            Ok(())
        } else {
            Err(StoreError::UnknownScope(scope))
        }
    }

    fn ensure_on_canvas(position: Point) -> Result<(), StoreError> {
        if position.is_on_canvas() {
            Ok(())
        } else {
            Err(StoreError::NegativePosition {
                x: position.x,
                y: position.y,
            })
        }
    }

    fn scope_of(&self, id: ElementId) -> Option<GraphScope> {
        self.elements
            .iter()
            .find(|s| s.element.id == id)
            .map(|s| s.scope)
    }
}

impl LayoutStore for InMemoryStore {
    fn list_elements(&self, scope: GraphScope) -> Result<Vec<PlacedElement>, StoreError> {
        self.ensure_scope(scope)?;
        Ok(self
            .elements
            .iter()
            .filter(|s| s.scope == scope)
            .map(|s| s.element.clone())
            .collect())
    }

    fn list_connectors(&self, scope: GraphScope) -> Result<Vec<Connector>, StoreError> {
        self.ensure_scope(scope)?;
        Ok(self
            .connectors
            .iter()
            .filter(|s| s.scope == scope)
            .map(|s| s.connector.clone())
            .collect())
    }

    fn create_element(
        &mut self,
        scope: GraphScope,
        kind: ElementKind,
        position: Point,
    ) -> Result<PlacedElement, StoreError> {
        self.ensure_scope(scope)?;
        if !scope.accepts_element(&kind) {
            return Err(StoreError::ScopeMismatch {
                kind: kind.variant_name(),
                scope,
            });
        }
        Self::ensure_on_canvas(position)?;

        let element = PlacedElement::new(Uuid::new_v4(), position, kind);
        log::debug!(
            "created {} {} at ({}, {})",
            element.kind.variant_name(),
            element.id,
            position.x,
            position.y
        );
        self.elements.push(StoredElement {
            scope,
            element: element.clone(),
        });
        Ok(element)
    }

    fn update_element_position(&mut self, id: ElementId, position: Point) -> Result<(), StoreError> {
        Self::ensure_on_canvas(position)?;
        let stored = self
            .elements
            .iter_mut()
            .find(|s| s.element.id == id)
            .ok_or(StoreError::ElementNotFound(id))?;
        stored.element.position = position;
        Ok(())
    }

    fn create_connector(
        &mut self,
        scope: GraphScope,
        from: ElementId,
        to: ElementId,
        kind: ConnectorKind,
    ) -> Result<Connector, StoreError> {
        self.ensure_scope(scope)?;
        if !scope.accepts_connector(&kind) {
            return Err(StoreError::ScopeMismatch {
                kind: kind.variant_name(),
                scope,
            });
        }
        if from == to {
            return Err(StoreError::SelfConnection(from));
        }
        for id in [from, to] {
            if self.scope_of(id) != Some(scope) {
                return Err(StoreError::ElementNotFound(id));
            }
        }

        let connector = Connector {
            id: Uuid::new_v4(),
            from,
            to,
            kind,
        };
        log::debug!("created {} {from} -> {to}", connector.kind.variant_name());
        self.connectors.push(StoredConnector {
            scope,
            connector: connector.clone(),
        });
        Ok(connector)
    }

    fn delete_element(&mut self, id: ElementId) -> Result<(), StoreError> {
        let index = self
            .elements
            .iter()
            .position(|s| s.element.id == id)
            .ok_or(StoreError::ElementNotFound(id))?;
        self.elements.remove(index);
        Ok(())
    }

    fn delete_connector(&mut self, id: ConnectorId) -> Result<(), StoreError> {
        let index = self
            .connectors
            .iter()
            .position(|s| s.connector.id == id)
            .ok_or(StoreError::ConnectorNotFound(id))?;
        self.connectors.remove(index);
        Ok(())
    }
}
