//! Control Panel Widget
//! Left side panel with the file upload and the filter controls.

use crate::gui::FilterPanel;
use crate::session::Session;
use egui::{Color32, RichText};

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub file_name: Option<String>,
    pub status: String,
    pub status_is_error: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            file_name: None,
            status: "Nessun file caricato".to_string(),
            status_is_error: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str, is_error: bool) {
        self.status = status.to_string();
        self.status_is_error = is_error;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, session: Option<&mut Session>) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Partecipanti")
                    .size(22.0)
                    .color(Color32::from_rgb(0x73, 0xb2, 0x7d)),
            );
            ui.label(
                RichText::new("Festival dell'Innovazione Agroalimentare")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Upload Section =====
        ui.label(RichText::new("📁 File Excel").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .file_name
                        .clone()
                        .unwrap_or_else(|| "Nessun file selezionato".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.file_name.is_some() {
                            ui.visuals().strong_text_color()
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Sfoglia").clicked() {
                            action = ControlPanelAction::BrowseExcel;
                        }
                    });
                });
            });
        ui.add_space(4.0);
        ui.label(
            RichText::new("Scegli un file Excel (.xlsx o .xls) o trascinalo nella finestra")
                .size(11.0)
                .color(Color32::GRAY),
        );

        ui.add_space(5.0);
        let status_color = if self.status_is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🔧 Filtri").size(14.0).strong());
        ui.add_space(5.0);

        match session {
            Some(session) => {
                if FilterPanel::show(ui, &mut session.filters) {
                    action = ControlPanelAction::FiltersChanged;
                }
            }
            None => {
                ui.label(RichText::new("Carica un file per impostare i filtri").italics());
            }
        }

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseExcel,
    FiltersChanged,
}
