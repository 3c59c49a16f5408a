//! Snapshot export: render the visible canvas to SVG and PNG.
//!
//! Notes:
//! - Only committed state is exported. Guides, drag ghosts and link previews
//!   are left out.
//! - PNG export rasterizes the SVG document and is available on native targets only.

use super::state::EditorApp;
use crate::error::ExportError;
use crate::scene::{BorderStyle, Scene};
use crate::session::NotificationLevel;
use std::fmt::Write as _;
use std::path::Path;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

/// Builds a standalone SVG document of `scene`.
pub fn scene_to_svg(scene: &Scene) -> String {
    let width = scene.content_size.width.ceil();
    let height = scene.content_size.height.ceil();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    );
    let _ = writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"#ffffff\" />"
    );

    let _ = writeln!(out, "<g stroke=\"#333333\" fill=\"none\">");
    for connector in &scene.connectors {
        let s = connector.segment;
        let _ = writeln!(
            out,
            "  <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke-width=\"{:.1}\" />",
            s.from_x, s.from_y, s.to_x, s.to_y, connector.width
        );
    }
    let _ = writeln!(out, "</g>");

    let _ = writeln!(out, "<g fill=\"#333333\">");
    for connector in &scene.connectors {
        let [tip, left, right] = connector.arrow_head();
        let _ = writeln!(
            out,
            "  <polygon points=\"{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}\" />",
            tip.x, tip.y, left.x, left.y, right.x, right.y
        );
    }
    let _ = writeln!(out, "</g>");

    for element in &scene.boxes {
        let b = &element.bounds;
        let dash = match element.border {
            BorderStyle::Solid => "",
            BorderStyle::Dashed => " stroke-dasharray=\"4 4\"",
        };
        let _ = writeln!(
            out,
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"4\" ry=\"4\" fill=\"#e2ecfa\" stroke=\"#333333\" stroke-width=\"1.5\"{dash} />",
            b.x, b.y, b.width, b.height
        );
        let _ = writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" fill=\"#000\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>",
            b.center_x,
            b.center_y - 8.0,
            escape_xml(&element.label)
        );
        let _ = writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" fill=\"#555\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>",
            b.center_x,
            b.center_y + 10.0,
            escape_xml(&element.sublabel)
        );
    }

    let _ = writeln!(out, "</svg>");
    out
}

/// Rasterizes an SVG document at `scale`.
#[cfg(not(target_arch = "wasm32"))]
pub fn render_png(svg: &str, scale: f32) -> Result<tiny_skia::Pixmap, ExportError> {
    let mut opt = usvg::Options::default();
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    opt.fontdb = Arc::new(db);

    let tree = usvg::Tree::from_data(svg.as_bytes(), &opt)
        .map_err(|e| ExportError::Svg(e.to_string()))?;

    let scale = scale.clamp(0.25, 8.0);
    let size = tree.size();
    let width = (size.width() * scale).round().max(1.0) as u32;
    let height = (size.height() * scale).round().max(1.0) as u32;

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(ExportError::Pixmap { width, height })?;
    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Writes the SVG snapshot of `scene` to `path`.
pub fn write_svg(scene: &Scene, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, scene_to_svg(scene))?;
    Ok(())
}

/// Writes a PNG snapshot of `scene` to `path`.
#[cfg(not(target_arch = "wasm32"))]
pub fn write_png(scene: &Scene, scale: f32, path: &Path) -> Result<(), ExportError> {
    let pixmap = render_png(&scene_to_svg(scene), scale)?;
    let bytes = pixmap
        .encode_png()
        .map_err(|e| ExportError::Png(e.to_string()))?;
    std::fs::write(path, bytes)?;
    Ok(())
}

impl EditorApp {
    /// Asks for a file name and saves the visible canvas as SVG.
    pub fn export_svg(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .set_file_name("layout.svg")
            .save_file()
        else {
            return;
        };
        let result = write_svg(&self.active_scene(), &path);
        self.report_export(result, &path);
    }

    /// Asks for a file name and saves the visible canvas as PNG.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn export_png(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name("layout.png")
            .save_file()
        else {
            return;
        };
        let result = write_png(&self.active_scene(), self.settings.png_scale, &path);
        self.report_export(result, &path);
    }

    fn report_export(&mut self, result: Result<(), ExportError>, path: &Path) {
        let (session, _) = self.active_mut();
        match result {
            Ok(()) => {
                log::info!("snapshot written to {}", path.display());
                session.notify(NotificationLevel::Success, "Snapshot exported");
            }
            Err(err) => {
                log::error!("snapshot export failed: {err}");
                session.notify(NotificationLevel::Error, format!("Export failed: {err}"));
            }
        }
    }
}

fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}
