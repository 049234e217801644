//! Dashboard Configuration
//! Fixed texts and survey columns the dashboard looks for.

/// Page and window title.
pub const PAGE_TITLE: &str =
    "Dashboard personale - Partecipanti alla mia sessione del Festival dell'Innovazione Agroalimentare";

/// Intro line shown under the title.
pub const INTRO_TEXT: &str =
    "Carica un file Excel con i dati dei partecipanti per visualizzare grafici e una tabella filtrabile.";

/// Free-text column with too many distinct values to chart.
pub const ORGANIZATION_COLUMN: &str = "Organizzazione presso cui lavori o studi";

/// All profiling categories of the questionnaire, in display order.
pub const PROFILING_CATEGORIES: [&str; 6] = [
    "Occupazione",
    "Tipologia di organizzazione presso cui lavori",
    ORGANIZATION_COLUMN,
    "Seniority",
    "Area aziendale",
    "Settore produttivo",
];

/// Dashboard settings handed to the app and to every session.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub page_title: String,
    pub intro: String,
    pub profiling_categories: Vec<String>,
    pub organization_column: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_title: PAGE_TITLE.to_string(),
            intro: INTRO_TEXT.to_string(),
            profiling_categories: PROFILING_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            organization_column: ORGANIZATION_COLUMN.to_string(),
            window_size: [1400.0, 900.0],
            min_window_size: [1000.0, 650.0],
        }
    }
}

impl DashboardConfig {
    /// Profiling categories that get a bar chart (all but the organization column).
    pub fn chart_categories(&self) -> Vec<String> {
        self.profiling_categories
            .iter()
            .filter(|c| **c != self.organization_column)
            .cloned()
            .collect()
    }
}
