//! Chart Viewer Widget
//! Profiling chart section: one card per category, or a banner when the
//! category cannot be charted.

use crate::charts::ChartPlotter;
use crate::data::{CategoryOutcome, Distribution};
use crate::gui::banner;
use crate::session::Session;
use egui::{Color32, RichText};

const CARD_SPACING: f32 = 15.0;
const CARD_BORDER: Color32 = Color32::from_rgb(0x73, 0xb2, 0x7d);

/// Heading of the chart section.
pub const SECTION_TITLE: &str = "Analisi grafica dei partecipanti";

/// Vertical list of chart cards.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    /// Draw every charted category of the session, then the organization note.
    pub fn show(&self, ui: &mut egui::Ui, session: &Session) {
        ui.heading(SECTION_TITLE);
        ui.add_space(8.0);

        for outcome in session.categories() {
            // Missing columns get no heading, only the warning
            if !matches!(outcome, CategoryOutcome::Missing { .. }) {
                ui.label(RichText::new(outcome.column()).size(18.0).strong());
            }

            match outcome.distribution() {
                Some(distribution) => Self::draw_chart_card(ui, distribution),
                None => {
                    if let Some(notice) = outcome.notice() {
                        banner::show(ui, &notice);
                    }
                }
            }
            ui.add_space(CARD_SPACING);
        }

        if let Some(note) = session.organization_note() {
            banner::show(ui, note);
        }
    }

    /// Draw a single chart card with its collapsible detail table.
    fn draw_chart_card(ui: &mut egui::Ui, distribution: &Distribution) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, CARD_BORDER))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ChartPlotter::draw_bar_chart(ui, distribution);
            });

        ui.add_space(6.0);
        egui::CollapsingHeader::new(distribution.detail_title())
            .id_salt(format!("detail_header_{}", distribution.column))
            .default_open(false)
            .show(ui, |ui| {
                ChartPlotter::draw_detail_table(ui, distribution);
            });
    }
}
