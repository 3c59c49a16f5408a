//! Editing session: the single authoritative state of one canvas.
//!
//! An [`EditorSession`] owns the graph, the selection, the gesture coordinator
//! and the notification list. The graph only changes through the transition
//! functions below, and only after the store accepted the mutation.

use crate::constants::MAX_NOTIFICATIONS;
use crate::coordinator::{DragCoordinator, MutationIntent};
use crate::error::StoreError;
use crate::store::LayoutStore;
use crate::types::{ElementId, ElementKind, Graph, GraphScope, Point, Selection};
use serde::{Deserialize, Serialize};

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    /// A mutation was committed
    Success,
    /// A gesture was refused without contacting the store
    Warning,
    /// The store rejected a mutation
    Error,
}

/// A message shown to the user after a commit attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Human readable text
    pub message: String,
}

/// State of one canvas (a production line or a routine).
#[derive(Debug, Clone)]
pub struct EditorSession {
    graph: Graph,
    selection: Selection,
    coordinator: DragCoordinator,
    notifications: Vec<Notification>,
}

impl EditorSession {
    /// Creates a session with an empty graph for `scope`.
    pub fn new(scope: GraphScope) -> Self {
        Self {
            graph: Graph::new(scope),
            selection: Selection::None,
            coordinator: DragCoordinator::new(),
            notifications: Vec::new(),
        }
    }

    /// Creates a session and loads `scope` from `store`.
    pub fn load(scope: GraphScope, store: &dyn LayoutStore) -> Result<Self, StoreError> {
        let mut session = Self::new(scope);
        session.refresh(store)?;
        Ok(session)
    }

    /// Replaces the graph with the store's current contents.
    ///
    /// A selection that no longer resolves is dropped.
    pub fn refresh(&mut self, store: &dyn LayoutStore) -> Result<(), StoreError> {
        let scope = self.graph.scope;
        let elements = store.list_elements(scope)?;
        let connectors = store.list_connectors(scope)?;
        self.graph = Graph {
            scope,
            elements,
            connectors,
        };
        if !self.selection_exists(self.selection) {
            self.selection = Selection::None;
        }
        Ok(())
    }

    /// Current graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Gesture state of this canvas.
    pub fn coordinator(&self) -> &DragCoordinator {
        &self.coordinator
    }

    /// Notifications, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Removes the notification at `index`, if present.
    pub fn dismiss_notification(&mut self, index: usize) {
        if index < self.notifications.len() {
            self.notifications.remove(index);
        }
    }

    /// Selects an element or connector. Unknown ids clear the selection.
    pub fn select(&mut self, selection: Selection) {
        self.selection = if self.selection_exists(selection) {
            selection
        } else {
            Selection::None
        };
    }

    fn selection_exists(&self, selection: Selection) -> bool {
        match selection {
            Selection::None => true,
            Selection::Element(id) => self.graph.element(id).is_some(),
            Selection::Connector(id) => self.graph.connector(id).is_some(),
        }
    }

    /// Coordinator and graph together, for starting gestures.
    pub fn coordinator_mut(&mut self) -> (&mut DragCoordinator, &Graph) {
        (&mut self.coordinator, &self.graph)
    }

    /// Updates the active gesture with the canvas-local pointer.
    pub fn hover(&mut self, pointer: Point) {
        self.coordinator.hover(pointer, &self.graph);
    }

    /// Ends the active gesture at `pointer` and commits the resulting mutation.
    ///
    /// Returns true when the store accepted a mutation.
    pub fn commit_drag(&mut self, pointer: Point, store: &mut dyn LayoutStore) -> bool {
        let intent = self.coordinator.commit(pointer, &self.graph);
        match intent {
            Some(intent) => self.apply(intent, store),
            None => false,
        }
    }

    /// Abandons the active gesture.
    pub fn cancel_drag(&mut self) {
        self.coordinator.cancel();
    }

    /// Handles a modifier-click on element `id`, connecting on the second click.
    pub fn modifier_click(&mut self, id: ElementId, store: &mut dyn LayoutStore) -> bool {
        match self.coordinator.modifier_click(id) {
            Some(intent) => self.apply(intent, store),
            None => false,
        }
    }

    /// Commits `intent` to `store` and applies it to the graph on success.
    ///
    /// Failures are logged and turned into an error notification. The graph
    /// keeps its pre-commit state. Returns true when the store accepted the
    /// mutation.
    pub fn apply(&mut self, intent: MutationIntent, store: &mut dyn LayoutStore) -> bool {
        if let MutationIntent::CreateConnector { from, to } = &intent {
            if self.graph.has_connector(*from, *to) {
                log::debug!("connector {from} -> {to} already exists");
                self.notify(NotificationLevel::Warning, "Connection already exists");
                return false;
            }
        }

        match self.commit(intent, store) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("commit failed: {err}");
                self.notify(NotificationLevel::Error, format!("Could not save change: {err}"));
                false
            }
        }
    }

    fn commit(&mut self, intent: MutationIntent, store: &mut dyn LayoutStore) -> Result<(), StoreError> {
        let scope = self.graph.scope;
        match intent {
            MutationIntent::CreateElement { kind, position } => {
                let element = store.create_element(scope, kind, position)?;
                let message = match &element.kind {
                    ElementKind::Workstation { .. } => "Workstation added",
                    ElementKind::Buffer { .. } => "Buffer added",
                    ElementKind::Step { .. } => "Step added",
                };
                self.graph.insert_element(element);
                self.notify(NotificationLevel::Success, message);
            }
            MutationIntent::MoveElement { id, position } => {
                store.update_element_position(id, position)?;
                self.graph.set_position(id, position);
            }
            MutationIntent::CreateConnector { from, to } => {
                let connector = store.create_connector(scope, from, to, scope.default_connector())?;
                let message = match scope {
                    GraphScope::ProductionLine(_) => "Path created",
                    GraphScope::Routine(_) => "Step link created",
                };
                self.graph.insert_connector(connector);
                self.notify(NotificationLevel::Success, message);
            }
        }
        Ok(())
    }

    /// Deletes the selected element or connector and clears the selection.
    ///
    /// Connectors of a deleted element are kept and stop rendering.
    pub fn delete_selection(&mut self, store: &mut dyn LayoutStore) -> bool {
        let result = match self.selection {
            Selection::None => return false,
            Selection::Element(id) => store.delete_element(id).map(|()| {
                self.graph.remove_element(id);
                if self.coordinator.pending_link_source() == Some(id) {
                    self.coordinator.clear_pending_link();
                }
            }),
            Selection::Connector(id) => store.delete_connector(id).map(|()| {
                self.graph.remove_connector(id);
            }),
        };

        match result {
            Ok(()) => {
                self.selection = Selection::None;
                true
            }
            Err(err) => {
                log::warn!("delete failed: {err}");
                self.notify(NotificationLevel::Error, format!("Could not delete: {err}"));
                false
            }
        }
    }

    /// Appends a notification, dropping the oldest beyond the display limit.
    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            level,
            message: message.into(),
        });
        if self.notifications.len() > MAX_NOTIFICATIONS {
            let overflow = self.notifications.len() - MAX_NOTIFICATIONS;
            self.notifications.drain(..overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::PaletteItem;
    use crate::geometry::HandleSide;
    use crate::store::InMemoryStore;
    use crate::types::{Connector, ConnectorId, ConnectorKind, PlacedElement, StationType};
    use uuid::Uuid;

    /// Accepts reads, rejects every write.
    struct OfflineStore {
        inner: InMemoryStore,
    }

    impl LayoutStore for OfflineStore {
        fn list_elements(&self, scope: GraphScope) -> Result<Vec<PlacedElement>, StoreError> {
            self.inner.list_elements(scope)
        }

        fn list_connectors(&self, scope: GraphScope) -> Result<Vec<Connector>, StoreError> {
            self.inner.list_connectors(scope)
        }

        fn create_element(
            &mut self,
            _scope: GraphScope,
            _kind: ElementKind,
            _position: Point,
        ) -> Result<PlacedElement, StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        fn update_element_position(&mut self, _id: ElementId, _position: Point) -> Result<(), StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        fn create_connector(
            &mut self,
            _scope: GraphScope,
            _from: ElementId,
            _to: ElementId,
            _kind: ConnectorKind,
        ) -> Result<Connector, StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        fn delete_element(&mut self, _id: ElementId) -> Result<(), StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        fn delete_connector(&mut self, _id: ConnectorId) -> Result<(), StoreError> {
            Err(StoreError::Backend("offline".into()))
        }
    }

    fn line_with_two_stations() -> (InMemoryStore, EditorSession, ElementId, ElementId) {
        let mut store = InMemoryStore::new();
        let line = store.create_production_line();
        let mut session = EditorSession::load(line, &store).unwrap();

        session.apply(
            MutationIntent::CreateElement {
                kind: PaletteItem::Workstation(StationType::Processing).instantiate(session.graph()),
                position: Point::new(100.0, 100.0),
            },
            &mut store,
        );
        session.apply(
            MutationIntent::CreateElement {
                kind: PaletteItem::Buffer.instantiate(session.graph()),
                position: Point::new(300.0, 100.0),
            },
            &mut store,
        );
        let a = session.graph().elements[0].id;
        let b = session.graph().elements[1].id;
        (store, session, a, b)
    }

    #[test]
    fn test_create_element_appends_to_graph() {
        let (store, session, _, _) = line_with_two_stations();

        assert_eq!(session.graph().elements.len(), 2);
        assert_eq!(session.notifications().len(), 2);
        assert_eq!(session.notifications()[0].message, "Workstation added");
        assert_eq!(
            store.list_elements(session.graph().scope).unwrap(),
            session.graph().elements
        );
    }

    #[test]
    fn test_palette_drop_through_session() {
        let mut store = InMemoryStore::new();
        let line = store.create_production_line();
        let mut session = EditorSession::load(line, &store).unwrap();

        let (coordinator, _) = session.coordinator_mut();
        coordinator.begin_palette(PaletteItem::Workstation(StationType::Packaging));
        assert!(session.commit_drag(Point::new(140.0, 130.0), &mut store));

        let element = &session.graph().elements[0];
        assert_eq!(element.position, Point::new(100.0, 100.0));
        assert_eq!(session.graph().element_name(element.id), Some("Packaging 1"));
    }

    #[test]
    fn test_link_drag_creates_transport_path() {
        let (mut store, mut session, a, b) = line_with_two_stations();

        let (coordinator, graph) = session.coordinator_mut();
        assert!(coordinator.begin_link(a, HandleSide::Right, graph));
        assert!(session.commit_drag(Point::new(330.0, 120.0), &mut store));

        let connector = &session.graph().connectors[0];
        assert_eq!((connector.from, connector.to), (a, b));
        assert!(matches!(connector.kind, ConnectorKind::TransportPath { .. }));
    }

    #[test]
    fn test_duplicate_connector_is_refused() {
        let (mut store, mut session, a, b) = line_with_two_stations();
        let intent = MutationIntent::CreateConnector { from: a, to: b };

        assert!(session.apply(intent.clone(), &mut store));
        assert!(!session.apply(intent, &mut store));

        assert_eq!(session.graph().connectors.len(), 1);
        assert_eq!(store.list_connectors(session.graph().scope).unwrap().len(), 1);
        let last = session.notifications().last().unwrap();
        assert_eq!(last.level, NotificationLevel::Warning);
    }

    #[test]
    fn test_failed_commit_leaves_graph_unchanged() {
        let (store, session, a, _) = line_with_two_stations();
        let mut offline = OfflineStore { inner: store };
        let mut session = EditorSession::load(session.graph().scope, &offline).unwrap();
        let before = session.graph().clone();

        let (coordinator, graph) = session.coordinator_mut();
        coordinator.begin_reposition(a, Point::new(110.0, 110.0), graph);
        session.hover(Point::new(200.0, 200.0));

        assert!(!session.commit_drag(Point::new(200.0, 200.0), &mut offline));
        assert_eq!(session.graph(), &before);
        assert!(!session.coordinator().is_busy());
        assert!(session.coordinator().guides().is_empty());

        let last = session.notifications().last().unwrap();
        assert_eq!(last.level, NotificationLevel::Error);
        assert!(last.message.contains("offline"));
    }

    #[test]
    fn test_move_updates_store_and_graph() {
        let (mut store, mut session, a, _) = line_with_two_stations();

        assert!(session.apply(
            MutationIntent::MoveElement {
                id: a,
                position: Point::new(20.0, 30.0),
            },
            &mut store,
        ));
        let after_first = session.graph().clone();
        assert!(session.apply(
            MutationIntent::MoveElement {
                id: a,
                position: Point::new(20.0, 30.0),
            },
            &mut store,
        ));

        assert_eq!(session.graph(), &after_first);
        assert_eq!(
            session.graph().element(a).map(|e| e.position),
            Some(Point::new(20.0, 30.0))
        );
        assert_eq!(store.list_elements(session.graph().scope).unwrap(), session.graph().elements);
    }

    #[test]
    fn test_modifier_click_connects_pair() {
        let (mut store, mut session, a, b) = line_with_two_stations();

        assert!(!session.modifier_click(a, &mut store));
        assert!(session.modifier_click(b, &mut store));
        assert!(session.graph().has_connector(a, b));
        assert_eq!(session.coordinator().pending_link_source(), None);
    }

    #[test]
    fn test_delete_selected_element_keeps_connectors() {
        let (mut store, mut session, a, b) = line_with_two_stations();
        session.apply(MutationIntent::CreateConnector { from: a, to: b }, &mut store);

        session.select(Selection::Element(b));
        assert!(session.delete_selection(&mut store));

        assert_eq!(session.selection(), Selection::None);
        assert!(session.graph().element(b).is_none());
        assert_eq!(session.graph().connectors.len(), 1);
    }

    #[test]
    fn test_delete_selected_connector() {
        let (mut store, mut session, a, b) = line_with_two_stations();
        session.apply(MutationIntent::CreateConnector { from: a, to: b }, &mut store);
        let id = session.graph().connectors[0].id;

        session.select(Selection::Connector(id));
        assert!(session.delete_selection(&mut store));

        assert!(session.graph().connectors.is_empty());
        assert!(!session.delete_selection(&mut store));
    }

    #[test]
    fn test_select_unknown_clears_selection() {
        let (_, mut session, a, _) = line_with_two_stations();
        session.select(Selection::Element(a));
        session.select(Selection::Element(Uuid::from_u128(999)));
        assert_eq!(session.selection(), Selection::None);
    }

    #[test]
    fn test_notifications_are_capped() {
        let (mut store, mut session, a, b) = line_with_two_stations();
        session.apply(MutationIntent::CreateConnector { from: a, to: b }, &mut store);
        for _ in 0..(MAX_NOTIFICATIONS + 5) {
            session.apply(MutationIntent::CreateConnector { from: a, to: b }, &mut store);
        }
        assert_eq!(session.notifications().len(), MAX_NOTIFICATIONS);

        session.dismiss_notification(0);
        assert_eq!(session.notifications().len(), MAX_NOTIFICATIONS - 1);
    }

    #[test]
    fn test_refresh_picks_up_store_changes() {
        let (mut store, mut session, a, _) = line_with_two_stations();
        session.select(Selection::Element(a));
        store.delete_element(a).unwrap();

        session.refresh(&store).unwrap();

        assert_eq!(session.graph().elements.len(), 1);
        assert_eq!(session.selection(), Selection::None);
    }
}
