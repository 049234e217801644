//! Participant Dashboard Main Application
//! Side panel with upload and filters, central page with charts and table.

use crate::config::DashboardConfig;
use crate::data::SUPPORTED_EXTENSIONS;
use crate::gui::table_view::SECTION_TITLE as TABLE_TITLE;
use crate::gui::{banner, ChartViewer, ControlPanel, ControlPanelAction, FilterPanel, TableView};
use crate::notice::Notice;
use crate::session::Session;
use egui::{ScrollArea, SidePanel};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    table_view: TableView,

    // Current upload; replaced on every new file
    session: Option<Session>,
    load_error: Option<Notice>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self::from_config(config)
    }

    fn from_config(config: DashboardConfig) -> Self {
        Self {
            config,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            table_view: TableView::new(),
            session: None,
            load_error: None,
        }
    }

    /// Handle Excel file selection through the native dialog.
    fn handle_browse_excel(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel", &SUPPORTED_EXTENSIONS)
            .pick_file()
        {
            info!(path = %path.display(), "File selected");
            self.load_file(&path);
        }
    }

    /// Load the first file dropped onto the window, if any.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Option<PathBuf> =
            ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));

        if let Some(path) = dropped {
            info!(path = %path.display(), "File dropped");
            self.load_file(&path);
        }
    }

    /// Parse a spreadsheet and replace the current session.
    ///
    /// On failure the previous session is discarded too, so no stale table
    /// stays on screen.
    fn load_file(&mut self, path: &Path) {
        self.session = None;
        self.table_view.clear();
        self.control_panel.file_name = path.file_name().map(|n| n.to_string_lossy().to_string());

        match Session::open(path, &self.config) {
            Ok(session) => {
                self.control_panel.set_status(
                    &format!(
                        "Caricate {} righe, {} colonne",
                        session.table().height(),
                        session.table().width()
                    ),
                    false,
                );
                self.load_error = None;
                self.session = Some(session);
                self.refresh_table();
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load spreadsheet");
                self.control_panel.set_status(&format!("Errore: {}", e), true);
                self.load_error = Some(Notice::parse_failed(&e.to_string()));
            }
        }
    }

    /// Recompute the filtered table from the uploaded one.
    fn refresh_table(&mut self) {
        let Some(session) = &self.session else {
            self.table_view.clear();
            return;
        };

        let result = session
            .filtered_table()
            .map_err(|e| e.to_string())
            .and_then(|df| self.table_view.refresh(&df).map_err(|e| e.to_string()));

        match result {
            Ok(()) => debug!(rows = self.table_view.row_count(), "Filtered table refreshed"),
            Err(e) => {
                error!(error = %e, "Failed to filter table");
                self.control_panel.set_status(&format!("Errore: {}", e), true);
            }
        }
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::BrowseExcel => self.handle_browse_excel(),
            ControlPanelAction::FiltersChanged => self.refresh_table(),
            ControlPanelAction::None => {}
        }
    }

    /// Rows currently shown over rows uploaded.
    fn row_summary(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|session| FilterPanel::row_summary(self.table_view.row_count(), session.table().height()))
    }

    fn show_page(&self, ui: &mut egui::Ui) {
        ui.heading(self.config.page_title.as_str());
        ui.label(self.config.intro.as_str());
        ui.add_space(10.0);

        if let Some(notice) = &self.load_error {
            banner::show(ui, notice);
            return;
        }

        let Some(session) = &self.session else {
            banner::show(ui, &Notice::upload_prompt());
            return;
        };

        banner::show(ui, &Notice::upload_succeeded());
        ui.add_space(10.0);

        self.chart_viewer.show(ui, session);

        ui.add_space(10.0);
        ui.heading(TABLE_TITLE);
        self.table_view.show(ui);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(380.0)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.session.as_mut());
                    self.handle_action(action);

                    // Drawn after the refresh so the count matches this frame's table
                    if let Some(summary) = self.row_summary() {
                        FilterPanel::show_row_summary(ui, &summary);
                    }
                });
            });

        // Central panel - charts and table
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .id_salt("page")
                .auto_shrink([false, false])
                .show(ui, |ui| self.show_page(ui));
        });
    }
}
