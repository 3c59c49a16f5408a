//! Application state structures.
//!
//! This module contains the main [`EditorApp`], the persisted
//! [`EditorSettings`] and the transient pointer state of the canvas.

use crate::coordinator::PaletteItem;
use crate::scene::CanvasConfig;
use crate::session::EditorSession;
use crate::store::InMemoryStore;
use crate::types::Point;
use eframe::egui;
use serde::{Deserialize, Serialize};

/// Which canvas is shown in the central panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasTab {
    /// Workstations, buffers and transport paths
    #[default]
    Layout,
    /// Steps and step links of the routine
    Routine,
}

/// User preferences kept between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Canvas sizing rules
    pub canvas: CanvasConfig,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Canvas shown on startup
    pub active_tab: CanvasTab,
    /// Scale factor applied to PNG snapshots
    pub png_scale: f32,
    /// Operation name given to steps dragged from the palette
    pub step_operation: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            dark_mode: true,
            active_tab: CanvasTab::Layout,
            png_scale: 2.0,
            step_operation: "Operation".to_string(),
        }
    }
}

/// Pointer bookkeeping for the canvas, never persisted.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// Canvas-local position of the last primary press on the canvas
    pub press_pos: Option<Point>,
    /// Client rectangle of the canvas content drawn last frame
    pub canvas_rect: Option<egui::Rect>,
}

/// Everything written to eframe storage.
#[derive(Serialize, Deserialize)]
struct SavedWorkspace {
    store: InMemoryStore,
    #[serde(default)]
    settings: EditorSettings,
}

/// The main application: the store, one session per canvas and the UI state.
///
/// This struct implements the `eframe::App` trait and handles all user interface
/// rendering and interaction logic.
pub struct EditorApp {
    /// Backing store shared by both canvases
    pub store: InMemoryStore,
    /// Production line canvas
    pub layout: EditorSession,
    /// Routine canvas
    pub routine: EditorSession,
    /// Persisted preferences
    pub settings: EditorSettings,
    /// Pointer state of the visible canvas
    pub interaction: InteractionState,
}

impl Default for EditorApp {
    fn default() -> Self {
        let store = InMemoryStore::with_demo().unwrap_or_else(|err| {
            log::error!("could not seed demo layout: {err}");
            InMemoryStore::new()
        });
        Self::with_store(store, EditorSettings::default())
    }
}

impl EditorApp {
    /// Builds the app on top of `store`, opening its first production line and
    /// first routine (both are created when missing).
    pub fn with_store(mut store: InMemoryStore, settings: EditorSettings) -> Self {
        let line = store
            .first_production_line()
            .unwrap_or_else(|| store.create_production_line());
        let routine = store
            .first_routine()
            .unwrap_or_else(|| store.create_routine());

        let layout = EditorSession::load(line, &store).unwrap_or_else(|err| {
            log::error!("could not load production line: {err}");
            EditorSession::new(line)
        });
        let routine = EditorSession::load(routine, &store).unwrap_or_else(|err| {
            log::error!("could not load routine: {err}");
            EditorSession::new(routine)
        });

        Self {
            store,
            layout,
            routine,
            settings,
            interaction: InteractionState::default(),
        }
    }

    /// Serializes the store and settings to JSON.
    ///
    /// # Returns
    ///
    /// A JSON string, or an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&SavedWorkspace {
            store: self.store.clone(),
            settings: self.settings.clone(),
        })
    }

    /// Restores an app from [`EditorApp::to_json`] output.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON string containing the saved workspace
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let saved: SavedWorkspace = serde_json::from_str(json)?;
        Ok(Self::with_store(saved.store, saved.settings))
    }

    /// Session of the visible canvas.
    pub fn active(&self) -> &EditorSession {
        match self.settings.active_tab {
            CanvasTab::Layout => &self.layout,
            CanvasTab::Routine => &self.routine,
        }
    }

    /// Session of the visible canvas together with the store it commits to.
    pub fn active_mut(&mut self) -> (&mut EditorSession, &mut InMemoryStore) {
        match self.settings.active_tab {
            CanvasTab::Layout => (&mut self.layout, &mut self.store),
            CanvasTab::Routine => (&mut self.routine, &mut self.store),
        }
    }

    /// Palette entries for the visible canvas.
    pub fn palette_items(&self) -> Vec<PaletteItem> {
        match self.settings.active_tab {
            CanvasTab::Layout => PaletteItem::layout_items(),
            CanvasTab::Routine => vec![PaletteItem::Step {
                operation: self.settings.step_operation.clone(),
            }],
        }
    }

    /// Switches the visible canvas, abandoning any gesture on the old one.
    pub fn switch_tab(&mut self, tab: CanvasTab) {
        if tab == self.settings.active_tab {
            return;
        }
        self.active_mut().0.cancel_drag();
        self.settings.active_tab = tab;
        self.interaction = InteractionState::default();
    }
}
