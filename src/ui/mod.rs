//! User interface of the layout editor.
//!
//! This module contains the main application struct, canvas interaction,
//! scene painting and snapshot export.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main EditorApp
//! - `canvas` - Pointer handling and the scrollable canvas
//! - `rendering` - Painting element boxes, connectors, guides and previews
//! - `export` - SVG and PNG snapshots

mod canvas;
mod export;
mod rendering;
mod state;

pub use export::scene_to_svg;
pub use state::{CanvasTab, EditorApp, EditorSettings};

use crate::coordinator::PaletteItem;
use crate::session::NotificationLevel;
use crate::types::Selection;
use eframe::egui;

/// Storage key of the saved workspace.
pub const STORAGE_KEY: &str = "factory_layout_workspace";

/// Number of notifications shown at the bottom of the window.
const VISIBLE_NOTIFICATIONS: usize = 4;

impl eframe::App for EditorApp {
    /// Persist the store and settings between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string(STORAGE_KEY, json),
            Err(err) => log::error!("failed to serialize workspace: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    /// * `_frame` - The eframe frame
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.settings.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_canvas_keys(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::left("palette_panel")
            .resizable(false)
            .default_width(160.0)
            .show(ctx, |ui| {
                self.draw_palette(ui);
            });

        egui::TopBottomPanel::bottom("notifications").show(ctx, |ui| {
            self.draw_notifications(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });
    }
}

impl EditorApp {
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut tab = self.settings.active_tab;
            ui.selectable_value(&mut tab, CanvasTab::Layout, "Production line");
            ui.selectable_value(&mut tab, CanvasTab::Routine, "Routine");
            self.switch_tab(tab);

            ui.separator();

            if ui.button("Export SVG").clicked() {
                self.export_svg();
            }
            #[cfg(not(target_arch = "wasm32"))]
            if ui.button("Export PNG").clicked() {
                self.export_png();
            }

            ui.separator();

            let (session, store) = self.active_mut();
            let has_selection = session.selection() != Selection::None;
            if ui
                .add_enabled(has_selection, egui::Button::new("Delete selection"))
                .clicked()
            {
                session.delete_selection(store);
            }

            ui.separator();
            ui.checkbox(&mut self.settings.dark_mode, "Dark mode");
        });
    }

    fn draw_palette(&mut self, ui: &mut egui::Ui) {
        ui.heading("Palette");
        ui.label("Drag onto the canvas");
        ui.add_space(6.0);

        if self.settings.active_tab == CanvasTab::Routine {
            ui.label("Operation");
            ui.text_edit_singleline(&mut self.settings.step_operation);
            ui.add_space(6.0);
        }

        for item in self.palette_items() {
            let response = ui.add(
                egui::Button::new(item.label())
                    .min_size(egui::vec2(140.0, 24.0))
                    .sense(egui::Sense::drag()),
            );
            if response.drag_started() {
                self.begin_palette_drag(item);
            }
        }

        ui.add_space(12.0);
        if let Some(source) = self.active().coordinator().pending_link_source() {
            let name = self.active().graph().element_name(source).unwrap_or("element");
            ui.label(format!("Connect mode: Ctrl+click a target for {name}"));
        } else {
            ui.weak("Ctrl+click two elements to connect them");
        }
    }

    /// Starts dragging `item` from the palette over the visible canvas.
    pub fn begin_palette_drag(&mut self, item: PaletteItem) -> bool {
        let (session, _) = self.active_mut();
        let (coordinator, _) = session.coordinator_mut();
        coordinator.begin_palette(item)
    }

    fn draw_notifications(&mut self, ui: &mut egui::Ui) {
        let (session, _) = self.active_mut();
        let count = session.notifications().len();
        let first = count.saturating_sub(VISIBLE_NOTIFICATIONS);
        let mut dismissed = None;

        ui.horizontal_wrapped(|ui| {
            for (index, notification) in session.notifications().iter().enumerate().skip(first) {
                let color = match notification.level {
                    NotificationLevel::Success => egui::Color32::from_rgb(80, 200, 120),
                    NotificationLevel::Warning => egui::Color32::from_rgb(230, 180, 60),
                    NotificationLevel::Error => egui::Color32::from_rgb(230, 80, 80),
                };
                ui.colored_label(color, &notification.message);
                if ui.small_button("x").clicked() {
                    dismissed = Some(index);
                }
                ui.separator();
            }
        });

        if let Some(index) = dismissed {
            session.dismiss_notification(index);
        }
    }
}

/// Creates the app, restoring the saved workspace when eframe storage has one.
pub fn create_app(cc: &eframe::CreationContext<'_>) -> EditorApp {
    cc.storage
        .and_then(|storage| storage.get_string(STORAGE_KEY))
        .and_then(|json| match EditorApp::from_json(&json) {
            Ok(app) => Some(app),
            Err(err) => {
                log::warn!("ignoring unreadable saved workspace: {err}");
                None
            }
        })
        .unwrap_or_default()
}
