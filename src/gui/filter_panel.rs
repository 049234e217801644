//! Filter Panel Widget
//! Collapsible per-column filter controls.

use crate::data::{ColumnFilter, FilterState, RangeFilter, SelectFilter};
use egui::{CollapsingHeader, RichText, ScrollArea, Slider};

/// Header of the collapsible panel.
pub const PANEL_TITLE: &str = "Imposta filtri per le colonne";

pub struct FilterPanel;

impl FilterPanel {
    /// `N righe su M` line under the filters.
    pub fn row_summary(shown_rows: usize, total_rows: usize) -> String {
        format!("{} righe su {}", shown_rows, total_rows)
    }

    pub fn show_row_summary(ui: &mut egui::Ui, summary: &str) {
        ui.add_space(4.0);
        ui.label(RichText::new(summary).size(12.0).strong());
    }

    /// Draw all filter controls. Returns true when any control changed.
    pub fn show(ui: &mut egui::Ui, state: &mut FilterState) -> bool {
        let mut changed = false;

        CollapsingHeader::new(PANEL_TITLE)
            .default_open(false)
            .show(ui, |ui| {
                if state.filters().is_empty() {
                    ui.label(RichText::new("Nessuna colonna filtrabile").italics());
                    return;
                }

                if ui.small_button("Reimposta filtri").clicked() {
                    state.reset();
                    changed = true;
                }
                ui.add_space(6.0);

                for filter in state.filters_mut() {
                    let id = filter.column().to_string();
                    changed |= ui
                        .push_id(id, |ui| match filter {
                            ColumnFilter::Range(range) => Self::draw_range(ui, range),
                            ColumnFilter::Select(select) => Self::draw_select(ui, select),
                        })
                        .inner;
                    ui.add_space(6.0);
                    ui.separator();
                }
            });

        changed
    }

    fn draw_range(ui: &mut egui::Ui, filter: &mut RangeFilter) -> bool {
        ui.label(RichText::new(filter.label()).strong());

        let bounds = filter.min..=filter.max;
        let mut low = filter.low();
        let mut high = filter.high();
        let low_changed = ui.add(Slider::new(&mut low, bounds.clone()).text("da")).changed();
        let high_changed = ui.add(Slider::new(&mut high, bounds).text("a")).changed();

        if low_changed {
            filter.set_low(low);
        }
        if high_changed {
            filter.set_high(high);
        }
        low_changed || high_changed
    }

    fn draw_select(ui: &mut egui::Ui, filter: &mut SelectFilter) -> bool {
        let mut changed = false;
        ui.label(RichText::new(filter.label()).strong());

        ui.horizontal(|ui| {
            if ui.small_button("Seleziona tutti").clicked() {
                filter.select_all();
                changed = true;
            }
            if ui.small_button("Deseleziona tutti").clicked() {
                filter.clear();
                changed = true;
            }
        });

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("options")
                    .max_height(140.0)
                    .show(ui, |ui| {
                        for (option, selected) in filter.options.iter().zip(filter.selected.iter_mut()) {
                            changed |= ui.checkbox(selected, option.as_str()).changed();
                        }
                    });
            });

        changed
    }
}
