//! Canvas painting: turns a [`Scene`] into egui shapes.
//!
//! Layers are drawn back to front: background, connectors, boxes, the drag
//! ghost, guides and finally the in-flight link preview.

use super::canvas::to_screen;
use super::state::EditorApp;
use crate::constants::{CONNECTION_HANDLE_SIZE, DASH_LENGTH, GUIDE_LINE_WIDTH, LINE_WIDTH};
use crate::scene::{BorderStyle, ConnectorPath, ElementBox, Scene};
use eframe::egui;
use eframe::epaint::StrokeKind;

const BOX_CORNER_RADIUS: f32 = 4.0;

impl EditorApp {
    fn line_color(&self) -> egui::Color32 {
        if self.settings.dark_mode {
            egui::Color32::from_gray(200)
        } else {
            egui::Color32::from_gray(60)
        }
    }

    fn accent_color(&self) -> egui::Color32 {
        egui::Color32::from_rgb(100, 150, 255)
    }

    /// Renders a scene whose canvas-local origin sits at `origin` on screen.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `origin` - Screen position of canvas-local (0, 0)
    /// * `scene` - Layout to draw
    pub fn paint_scene(&self, painter: &egui::Painter, origin: egui::Pos2, scene: &Scene) {
        let content = egui::Rect::from_min_size(
            origin,
            egui::vec2(scene.content_size.width, scene.content_size.height),
        );
        let background = if self.settings.dark_mode {
            egui::Color32::from_gray(30)
        } else {
            egui::Color32::from_gray(248)
        };
        painter.rect_filled(content, 0.0, background);

        for connector in &scene.connectors {
            self.paint_connector(painter, origin, connector);
        }

        for element in &scene.boxes {
            self.paint_box(painter, origin, element);
        }

        if let Some(ghost) = &scene.ghost {
            self.paint_box(painter, origin, ghost);
        }

        let guide_stroke = egui::Stroke::new(GUIDE_LINE_WIDTH, egui::Color32::from_rgb(255, 80, 160));
        for guide in &scene.guides {
            painter.extend(egui::Shape::dashed_line(
                &[to_screen(origin, guide.from), to_screen(origin, guide.to)],
                guide_stroke,
                DASH_LENGTH,
                DASH_LENGTH,
            ));
        }

        if let Some((from, to)) = scene.link_preview {
            painter.extend(egui::Shape::dashed_line(
                &[to_screen(origin, from), to_screen(origin, to)],
                egui::Stroke::new(LINE_WIDTH, self.accent_color()),
                DASH_LENGTH,
                DASH_LENGTH,
            ));
        }
    }

    fn paint_connector(&self, painter: &egui::Painter, origin: egui::Pos2, connector: &ConnectorPath) {
        let color = if connector.selected {
            self.accent_color()
        } else {
            self.line_color()
        };
        let from = to_screen(origin, connector.segment.from());
        let to = to_screen(origin, connector.segment.to());
        painter.line_segment([from, to], egui::Stroke::new(connector.width, color));

        let arrow = connector
            .arrow_head()
            .iter()
            .map(|p| to_screen(origin, *p))
            .collect();
        painter.add(egui::Shape::convex_polygon(arrow, color, egui::Stroke::NONE));
    }

    fn paint_box(&self, painter: &egui::Painter, origin: egui::Pos2, element: &ElementBox) {
        let b = &element.bounds;
        let rect = egui::Rect::from_min_size(
            egui::pos2(origin.x + b.x, origin.y + b.y),
            egui::vec2(b.width, b.height),
        );

        let (mut fill, text_color) = if self.settings.dark_mode {
            (egui::Color32::from_rgb(45, 55, 72), egui::Color32::WHITE)
        } else {
            (egui::Color32::from_rgb(226, 236, 250), egui::Color32::BLACK)
        };
        if element.dragging {
            fill = fill.gamma_multiply(0.5);
        }
        painter.rect_filled(rect, BOX_CORNER_RADIUS, fill);

        let (stroke_width, stroke_color) = if element.connect_source {
            (3.0, egui::Color32::from_rgb(80, 200, 120))
        } else if element.selected {
            (3.0, self.accent_color())
        } else {
            (1.5, self.line_color())
        };
        let stroke = egui::Stroke::new(stroke_width, stroke_color);
        match element.border {
            BorderStyle::Solid => {
                painter.rect_stroke(rect, BOX_CORNER_RADIUS, stroke, StrokeKind::Inside);
            }
            BorderStyle::Dashed => {
                let outline = [
                    rect.left_top(),
                    rect.right_top(),
                    rect.right_bottom(),
                    rect.left_bottom(),
                    rect.left_top(),
                ];
                painter.extend(egui::Shape::dashed_line(&outline, stroke, DASH_LENGTH, DASH_LENGTH));
            }
        }

        painter.text(
            rect.center() - egui::vec2(0.0, 8.0),
            egui::Align2::CENTER_CENTER,
            &element.label,
            egui::FontId::proportional(12.0),
            text_color,
        );
        painter.text(
            rect.center() + egui::vec2(0.0, 10.0),
            egui::Align2::CENTER_CENTER,
            &element.sublabel,
            egui::FontId::proportional(10.0),
            text_color.gamma_multiply(0.7),
        );

        for (_, anchor) in &element.handles {
            painter.circle(
                to_screen(origin, *anchor),
                CONNECTION_HANDLE_SIZE / 2.0,
                self.accent_color(),
                egui::Stroke::new(1.0, egui::Color32::WHITE),
            );
        }
    }
}
