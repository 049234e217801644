//! GUI module - User interface components

mod app;
mod banner;
mod chart_viewer;
mod control_panel;
mod filter_panel;
mod table_view;

pub use app::DashboardApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use filter_panel::FilterPanel;
pub use table_view::TableView;
