//! # Factory Layout Editor
//!
//! A visual editor for factory layouts. Workstations and buffers are placed on a
//! production line canvas and wired with directional transport paths; process
//! routines are edited on a second canvas as graphs of steps and step links.
//!
//! ## Features
//! - Palette drag and drop, element repositioning with alignment guides and snapping
//! - Connector creation from element handles or by Ctrl+clicking two elements
//! - Edge-to-edge connector routing between boxes of any size
//! - Selection and deletion of elements and connectors
//! - SVG and PNG snapshots of the visible canvas
//!
//! The canvas core (`geometry`, `alignment`, `coordinator`, `scene`) is pure and
//! independent of egui; [`EditorSession`] commits gestures to a [`LayoutStore`].

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod alignment;
pub mod constants;
pub mod coordinator;
pub mod error;
pub mod geometry;
pub mod scene;
pub mod session;
pub mod store;
pub mod types;
mod ui;

// Re-export public types and functions
pub use alignment::{detect_alignment, AlignmentGuides, AlignmentResult};
pub use coordinator::{CanvasViewport, DragCoordinator, Gesture, MutationIntent, PaletteItem};
pub use error::{ExportError, StoreError};
pub use geometry::{edge_intersection, Bounds, EdgeSegment, HandleSide};
pub use scene::{CanvasConfig, Scene};
pub use session::{EditorSession, Notification, NotificationLevel};
pub use store::{InMemoryStore, LayoutStore};
pub use types::*;
pub use ui::{scene_to_svg, CanvasTab, EditorApp, EditorSettings};

/// Runs the editor with default window settings.
///
/// The saved workspace is restored from eframe storage when present, otherwise
/// a small demo line and routine are loaded.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use factory_layout_editor::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Factory Layout Editor",
        options,
        Box::new(|cc| Ok(Box::new(ui::create_app(cc)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_app_loads_demo() {
        let app = EditorApp::default();
        assert_eq!(app.layout.graph().elements.len(), 4);
        assert_eq!(app.routine.graph().count_steps(), 3);
        assert!(!app.layout.coordinator().is_busy());
    }

    #[test]
    fn test_graph_scopes_are_separate() {
        let app = EditorApp::default();
        assert!(matches!(app.layout.graph().scope, GraphScope::ProductionLine(_)));
        assert!(matches!(app.routine.graph().scope, GraphScope::Routine(_)));
    }
}
