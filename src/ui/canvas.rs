//! Canvas interaction: turns egui pointer input into coordinator gestures.
//!
//! The canvas reads raw pointer state instead of widget drag callbacks so that
//! a gesture can begin on a palette button and end over the canvas.

use super::state::EditorApp;
use crate::coordinator::{CanvasViewport, Gesture};
use crate::scene::Scene;
use crate::types::{Point, Selection};
use eframe::egui;

/// Pointer travel (points) below which a press and release count as a click.
const CLICK_TOLERANCE: f32 = 3.0;

/// Converts an egui position into the crate's point type.
pub(super) fn to_point(pos: egui::Pos2) -> Point {
    Point::new(pos.x, pos.y)
}

/// Converts a canvas-local point into an absolute egui position.
pub(super) fn to_screen(origin: egui::Pos2, point: Point) -> egui::Pos2 {
    egui::pos2(origin.x + point.x, origin.y + point.y)
}

impl EditorApp {
    /// Builds the scene of the visible canvas.
    pub fn active_scene(&self) -> Scene {
        let session = self.active();
        Scene::build(
            session.graph(),
            self.layout.graph(),
            session.coordinator(),
            session.selection(),
            &self.settings.canvas,
        )
    }

    /// Draws the visible canvas inside a scroll area and handles its pointer input.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI the canvas is placed in
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::both()
            .drag_to_scroll(false)
            .auto_shrink([false, false])
            .show_viewport(ui, |ui, viewport| {
                let scene = self.active_scene();
                let size = egui::vec2(scene.content_size.width, scene.content_size.height);
                let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());

                let viewport = CanvasViewport {
                    client_origin: to_point(response.rect.min + viewport.min.to_vec2()),
                    scroll: to_point(viewport.min),
                };
                self.interaction.canvas_rect = Some(response.rect);

                self.handle_canvas_pointer(ui, &response, &viewport, &scene);

                // Gestures above may have changed the graph or transient state.
                let scene = self.active_scene();
                self.paint_scene(&painter, response.rect.min, &scene);
            });
    }

    /// Dispatches press, move and release events of this frame.
    fn handle_canvas_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        viewport: &CanvasViewport,
        scene: &Scene,
    ) {
        let (pressed, down, released, pos, command) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos().or_else(|| i.pointer.latest_pos()),
                i.modifiers.command,
            )
        });
        let Some(pos) = pos else {
            return;
        };
        let over_canvas = response.rect.contains(pos) && ui.clip_rect().contains(pos);
        let local = viewport.to_canvas(to_point(pos));

        if pressed && over_canvas {
            self.on_canvas_press(local, command, scene);
        }

        if down && self.active().coordinator().is_busy() {
            self.active_mut().0.hover(local);
        }

        if released {
            self.on_pointer_release(local, over_canvas);
        }
    }

    /// Handles a primary press on the canvas at canvas-local `local`.
    fn on_canvas_press(&mut self, local: Point, command: bool, scene: &Scene) {
        self.interaction.press_pos = Some(local);
        let (session, store) = self.active_mut();

        if command {
            if let Some(id) = scene.hit_element(local) {
                session.select(Selection::Element(id));
                session.modifier_click(id, store);
            }
            return;
        }

        if let Some((id, side)) = scene.hit_handle(local) {
            let (coordinator, graph) = session.coordinator_mut();
            coordinator.begin_link(id, side, graph);
        } else if let Some(id) = scene.hit_element(local) {
            session.select(Selection::Element(id));
            let (coordinator, graph) = session.coordinator_mut();
            coordinator.begin_reposition(id, local, graph);
        } else if let Some(id) = scene.hit_connector(local) {
            session.select(Selection::Connector(id));
        } else {
            session.select(Selection::None);
        }
    }

    /// Ends the active gesture when the primary button is released.
    ///
    /// Releases outside the canvas cancel. A reposition released without
    /// moving is a plain click and commits nothing.
    fn on_pointer_release(&mut self, local: Point, over_canvas: bool) {
        let press_pos = self.interaction.press_pos.take();
        let (session, store) = self.active_mut();
        let clicked = match (session.coordinator().gesture(), press_pos) {
            (Gesture::Repositioning { .. }, Some(press)) => {
                let delta = local - press;
                delta.x.abs() <= CLICK_TOLERANCE && delta.y.abs() <= CLICK_TOLERANCE
            }
            _ => false,
        };

        if !session.coordinator().is_busy() {
            return;
        }
        if over_canvas && !clicked {
            session.commit_drag(local, store);
        } else {
            session.cancel_drag();
        }
    }

    /// Handles Delete/Backspace and Escape for the visible canvas.
    pub fn handle_canvas_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (delete, escape) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::Escape),
            )
        });
        let (session, store) = self.active_mut();
        if escape {
            session.cancel_drag();
            let (coordinator, _) = session.coordinator_mut();
            coordinator.clear_pending_link();
        }
        if delete && !session.coordinator().is_busy() {
            session.delete_selection(store);
        }
    }
}
