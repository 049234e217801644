//! Chart Plotter Module
//! Draws category distributions as bar charts using egui_plot.

use crate::data::{percentage_label, Distribution};
use egui::epaint::TextShape;
use egui::{Align2, Color32, FontId, RichText, Sense, Shape};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, Text};
use std::f32::consts::FRAC_PI_4;

/// Brand palette, cycled by bar position.
pub const BRAND_COLORS: [Color32; 3] = [
    Color32::from_rgb(0x73, 0xb2, 0x7d), // Green
    Color32::from_rgb(0xf1, 0xad, 0x72), // Orange
    Color32::from_rgb(0xd3, 0x10, 0x48), // Crimson
];

const BAR_WIDTH: f64 = 0.6;
const PLOT_HEIGHT: f32 = 320.0;
const AXIS_LABEL_SIZE: f32 = 12.0;
const MAX_LABEL_CHARS: usize = 32;

/// Y-axis title.
pub const Y_AXIS_TITLE: &str = "Numero di partecipanti";

/// Draws bar charts for category distributions.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Bar color for the bar at `index`.
    pub fn bar_color(index: usize) -> Color32 {
        BRAND_COLORS[index % BRAND_COLORS.len()]
    }

    /// Shorten very long category values for the rotated axis labels.
    pub fn axis_label(value: &str) -> String {
        if value.chars().count() <= MAX_LABEL_CHARS {
            value.to_string()
        } else {
            let head: String = value.chars().take(MAX_LABEL_CHARS - 1).collect();
            format!("{}…", head)
        }
    }

    /// Upper plot bound, leaving room for the percentage labels.
    fn y_headroom(max_count: usize) -> f64 {
        (max_count as f64 * 1.15).ceil().max(max_count as f64 + 0.5)
    }

    /// Draw the titled bar chart: bars, percentage labels, rotated x labels.
    pub fn draw_bar_chart(ui: &mut egui::Ui, distribution: &Distribution) {
        let entries = &distribution.entries;
        let max_count = entries.iter().map(|e| e.count).max().unwrap_or(0);

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(distribution.title()).size(16.0).strong());
        });
        ui.add_space(4.0);

        let bars: Vec<Bar> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Bar::new(i as f64, entry.count as f64)
                    .width(BAR_WIDTH)
                    .fill(Self::bar_color(i))
                    .name(&entry.value)
            })
            .collect();

        let n = entries.len() as f64;
        let plot = Plot::new(format!("bar_chart_{}", distribution.column))
            .height(PLOT_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_x(false)
            .include_x(-0.5)
            .include_x(n - 0.5)
            .include_y(0.0)
            .include_y(Self::y_headroom(max_count))
            .y_axis_label(Y_AXIS_TITLE)
            // Category names are drawn rotated below the plot instead
            .x_axis_formatter(|_mark, _range| String::new());

        let response = plot.show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));

            for (i, entry) in entries.iter().enumerate() {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(i as f64, entry.count as f64),
                        RichText::new(percentage_label(entry.percentage)).size(11.0),
                    )
                    .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });

        Self::draw_rotated_labels(ui, distribution, |i| {
            response
                .transform
                .position_from_point(&PlotPoint::new(i as f64, 0.0))
                .x
        });

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&distribution.column).size(AXIS_LABEL_SIZE));
        });
    }

    /// Category names under the bars, rotated 45° and ending at their tick.
    fn draw_rotated_labels(
        ui: &mut egui::Ui,
        distribution: &Distribution,
        tick_x: impl Fn(usize) -> f32,
    ) {
        let color = ui.visuals().text_color();
        let galleys: Vec<_> = distribution
            .entries
            .iter()
            .map(|entry| {
                ui.painter().layout_no_wrap(
                    Self::axis_label(&entry.value),
                    FontId::proportional(AXIS_LABEL_SIZE),
                    color,
                )
            })
            .collect();

        let (sin, cos) = FRAC_PI_4.sin_cos();
        let longest = galleys.iter().map(|g| g.size().x).fold(0.0_f32, f32::max);
        let line_height = galleys.first().map(|g| g.size().y).unwrap_or(AXIS_LABEL_SIZE);
        let area_height = longest * sin + line_height * cos + 6.0;

        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(ui.available_width(), area_height), Sense::hover());
        let painter = ui.painter();

        for (i, galley) in galleys.into_iter().enumerate() {
            let width = galley.size().x;
            // Text runs up-right at -45° so that it ends under the bar center
            let pos = egui::pos2(
                tick_x(i) - width * cos - line_height * sin * 0.5,
                rect.top() + 4.0 + width * sin,
            );
            painter.add(Shape::Text(
                TextShape::new(pos, galley, color).with_angle(-FRAC_PI_4),
            ));
        }
    }

    /// Value / Numero / Percentuale table for the collapsible detail view.
    pub fn draw_detail_table(ui: &mut egui::Ui, distribution: &Distribution) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("detail_{}", distribution.column)))
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new(&distribution.column).strong().size(12.0));
                        ui.label(RichText::new("Numero").strong().size(12.0));
                        ui.label(RichText::new("Percentuale").strong().size(12.0));
                        ui.end_row();

                        for entry in &distribution.entries {
                            ui.label(RichText::new(&entry.value).size(12.0));
                            ui.label(RichText::new(entry.count.to_string()).size(12.0));
                            ui.label(RichText::new(format!("{:.1}", entry.percentage)).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
