// src/gui/components/charts.rs
//
// Two small painter-drawn charts over the filtered view: universities per
// country (top N, horizontal bars) and the score histogram.

use eframe::egui::{self, Align2, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use crate::data::View;

const CHART_H: f32 = 220.0;

pub fn top_countries(ui: &mut egui::Ui, view: &View<'_>, n: usize) {
    ui.strong(format!("Top {n} countries"));
    let rows = view.top_countries(n);
    let (resp, painter) = ui.allocate_painter(Vec2::new(ui.available_width(), CHART_H), Sense::hover());
    let rect = resp.rect;

    let Some(peak) = rows.iter().map(|(_, c)| *c).max() else {
        painter.text(rect.center(), Align2::CENTER_CENTER, "No rows", FontId::proportional(13.0), ui.visuals().weak_text_color());
        return;
    };

    let label_w = 120.0_f32.min(rect.width() * 0.4);
    let count_w = 36.0;
    let bar_area = (rect.width() - label_w - count_w).max(1.0);
    let slot = rect.height() / n.max(1) as f32;
    let fill = ui.visuals().selection.bg_fill;
    let text = ui.visuals().text_color();
    let font = FontId::proportional(12.0);

    for (i, (country, count)) in rows.iter().enumerate() {
        let y = rect.top() + slot * i as f32;
        let mid = y + slot * 0.5;
        painter.text(Pos2::new(rect.left() + label_w - 6.0, mid), Align2::RIGHT_CENTER, country, font.clone(), text);

        let w = bar_area * (*count as f32 / peak as f32);
        let bar = Rect::from_min_size(
            Pos2::new(rect.left() + label_w, y + slot * 0.15),
            Vec2::new(w.max(1.0), slot * 0.7),
        );
        // fainter for fewer rows
        let shade = 0.35 + 0.65 * (*count as f32 / peak as f32);
        painter.rect_filled(bar, 2.0, fill.gamma_multiply(shade));
        painter.text(Pos2::new(bar.right() + 4.0, mid), Align2::LEFT_CENTER, count.to_string(), font.clone(), text);
    }
}

pub fn histogram(ui: &mut egui::Ui, view: &View<'_>, bins: usize) {
    ui.strong("Score distribution");
    let (resp, painter) = ui.allocate_painter(Vec2::new(ui.available_width(), CHART_H), Sense::hover());
    let rect = resp.rect;

    let Some(h) = view.histogram(bins) else {
        painter.text(rect.center(), Align2::CENTER_CENTER, "No rows", FontId::proportional(13.0), ui.visuals().weak_text_color());
        return;
    };

    let axis_h = 16.0;
    let plot = Rect::from_min_max(rect.min, Pos2::new(rect.right(), rect.bottom() - axis_h));
    let peak = h.counts.iter().copied().max().unwrap_or(0).max(1);
    let slot = plot.width() / h.counts.len() as f32;
    let fill = ui.visuals().selection.bg_fill;
    let text = ui.visuals().text_color();
    let font = FontId::proportional(11.0);

    let mut hovered = None;
    for (i, &count) in h.counts.iter().enumerate() {
        let bar_h = plot.height() * (count as f32 / peak as f32);
        let x = plot.left() + slot * i as f32;
        let bar = Rect::from_min_max(Pos2::new(x + 1.0, plot.bottom() - bar_h), Pos2::new(x + slot - 1.0, plot.bottom()));
        painter.rect_filled(bar, 1.0, fill);

        let column = Rect::from_min_max(Pos2::new(x, plot.top()), Pos2::new(x + slot, plot.bottom()));
        if resp.hover_pos().is_some_and(|p| column.contains(p)) {
            hovered = Some((i, count));
        }
    }

    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        Stroke::new(1.0, ui.visuals().weak_text_color()),
    );
    painter.text(Pos2::new(plot.left(), rect.bottom()), Align2::LEFT_BOTTOM, format!("{:.1}", h.min), font.clone(), text);
    painter.text(Pos2::new(plot.right(), rect.bottom()), Align2::RIGHT_BOTTOM, format!("{:.1}", h.max), font, text);

    if let Some((i, count)) = hovered {
        let (lo, hi) = h.bin_range(i);
        resp.on_hover_text(format!("{lo:.2} – {hi:.2}: {count}"));
    }
}
