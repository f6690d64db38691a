// src/gui/components/world_map.rs
//
// Point map: plain equirectangular projection, one dot per plotted row.
// Dot color follows the country, dot size the score. Hover shows the nearest
// university.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use crate::{data::View, entity::Coordinates};

const MAP_H: f32 = 280.0;
const MIN_R: f32 = 2.0;
const MAX_R: f32 = 7.5;
const HOVER_PX: f32 = 8.0;

/// Qualitative palette, cycled when there are more countries than colors.
const PALETTE: [Color32; 10] = [
    Color32::from_rgb(0x63, 0x6E, 0xFA),
    Color32::from_rgb(0xEF, 0x55, 0x3B),
    Color32::from_rgb(0x00, 0xCC, 0x96),
    Color32::from_rgb(0xAB, 0x63, 0xFA),
    Color32::from_rgb(0xFF, 0xA1, 0x5A),
    Color32::from_rgb(0x19, 0xD3, 0xF3),
    Color32::from_rgb(0xFF, 0x66, 0x92),
    Color32::from_rgb(0xB6, 0xE8, 0x80),
    Color32::from_rgb(0xFF, 0x97, 0xFF),
    Color32::from_rgb(0xFE, 0xCB, 0x52),
];

fn country_color(ix: usize) -> Color32 { PALETTE[ix % PALETTE.len()] }

fn radius(weight: f64) -> f32 { MIN_R + (MAX_R - MIN_R) * weight.clamp(0.0, 1.0) as f32 }

fn project(c: Coordinates, rect: Rect) -> Pos2 {
    let x = rect.left() + rect.width() * ((c.lon + 180.0) / 360.0) as f32;
    let y = rect.top() + rect.height() * ((90.0 - c.lat) / 180.0) as f32;
    Pos2::new(x, y)
}

pub fn draw(ui: &mut egui::Ui, view: &View<'_>) {
    let points = view.map_points();
    ui.strong(format!("Map ({} of {} rows plotted)", points.len(), view.len()));

    // Keep 2:1 so the projection isn't stretched.
    let w = ui.available_width().min(MAP_H * 2.0);
    let (resp, painter) = ui.allocate_painter(Vec2::new(w, w / 2.0), Sense::hover());
    let rect = resp.rect;

    let visuals = ui.visuals();
    painter.rect_filled(rect, 2.0, visuals.extreme_bg_color);
    let grid = Stroke::new(0.5, visuals.weak_text_color().linear_multiply(0.4));
    for lon in (-150..=150).step_by(30) {
        let x = project(Coordinates::new(0.0, lon as f64), rect).x;
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], grid);
    }
    for lat in (-60..=60).step_by(30) {
        let y = project(Coordinates::new(lat as f64, 0.0), rect).y;
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], grid);
    }

    let rim = Stroke::new(0.5, visuals.extreme_bg_color);
    let mut nearest: Option<(f32, usize)> = None;
    let hover = resp.hover_pos();

    for (i, p) in points.iter().enumerate() {
        let pos = project(p.coords, rect);
        let r = radius(p.weight);
        painter.circle(pos, r, country_color(p.country_ix).gamma_multiply(0.85), rim);
        if let Some(h) = hover {
            let d = h.distance(pos);
            if d <= HOVER_PX.max(r) && nearest.is_none_or(|(best, _)| d < best) {
                nearest = Some((d, i));
            }
        }
    }

    if points.is_empty() {
        painter.text(rect.center(), Align2::CENTER_CENTER, "Nothing to plot", FontId::proportional(13.0), visuals.weak_text_color());
    }

    if let Some((_, i)) = nearest {
        let p = &points[i];
        let e = p.entity;
        resp.on_hover_text(format!(
            "#{} {}\n{} · score {}\n{}",
            e.rank(),
            e.name(),
            e.country(),
            e.score(),
            p.coords
        ));
    }
}
