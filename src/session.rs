//! Dashboard Session
//! The uploaded table together with everything derived from it.

use crate::config::DashboardConfig;
use crate::data::{CategoryOutcome, DataLoader, DistributionError, FilterError, FilterState, LoaderError};
use crate::notice::Notice;
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Distribution(#[from] DistributionError),
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// State of one upload: replaced wholesale by the next upload.
pub struct Session {
    pub file_name: String,
    table: DataFrame,
    categories: Vec<CategoryOutcome>,
    organization_note: Option<Notice>,
    pub filters: FilterState,
}

impl Session {
    /// Load a spreadsheet from disk and build the session for it.
    pub fn open(path: &Path, config: &DashboardConfig) -> Result<Self, SessionError> {
        let table = DataLoader::load_excel(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(file_name, table, config)
    }

    /// Derive chart outcomes and default filters for an uploaded table.
    pub fn new(
        file_name: impl Into<String>,
        table: DataFrame,
        config: &DashboardConfig,
    ) -> Result<Self, SessionError> {
        let categories = config
            .chart_categories()
            .iter()
            .map(|column| CategoryOutcome::analyze(&table, column))
            .collect::<Result<Vec<_>, _>>()?;

        let organization_note = table
            .get_column_names()
            .iter()
            .any(|name| name.as_str() == config.organization_column)
            .then(|| {
                Notice::info(format!(
                    "La colonna '{}' non viene visualizzata come grafico perché contiene troppi valori diversi. \
                     Puoi comunque analizzarla nella tabella completa qui sotto.",
                    config.organization_column
                ))
            });

        let filters = FilterState::build(&table)?;

        let session = Self {
            file_name: file_name.into(),
            table,
            categories,
            organization_note,
            filters,
        };
        info!(
            file = %session.file_name,
            rows = session.table.height(),
            charts = session.chart_count(),
            filters = session.filters.filters().len(),
            "Session ready"
        );
        Ok(session)
    }

    /// The uploaded table, untouched.
    pub fn table(&self) -> &DataFrame {
        &self.table
    }

    /// One outcome per charted category, in configured order.
    pub fn categories(&self) -> &[CategoryOutcome] {
        &self.categories
    }

    pub fn chart_count(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.distribution().is_some())
            .count()
    }

    /// Note explaining why the organization column is not charted.
    pub fn organization_note(&self) -> Option<&Notice> {
        self.organization_note.as_ref()
    }

    /// Recompute the filtered table from the uploaded one.
    pub fn filtered_table(&self) -> Result<DataFrame, FilterError> {
        self.filters.apply(&self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ColumnFilter;
    use crate::notice::NoticeLevel;

    fn survey() -> DataFrame {
        df!(
            "Occupazione" => ["Studente", "Dipendente", "Dipendente"],
            "Tipologia di organizzazione presso cui lavori" => ["Università", "Azienda", "Azienda"],
            "Organizzazione presso cui lavori o studi" => ["UniBo", "Coop", "Barilla"],
            "Seniority" => [Some("Junior"), Some("Junior"), None],
            "Settore produttivo" => [None::<&str>, None, None],
            "Età" => [20i64, 25, 30]
        )
        .unwrap()
    }

    #[test]
    fn missing_category_is_skipped_while_others_render() {
        let session = Session::new("partecipanti.xlsx", survey(), &DashboardConfig::default()).unwrap();

        let columns: Vec<&str> = session.categories().iter().map(|c| c.column()).collect();
        assert_eq!(
            columns,
            vec![
                "Occupazione",
                "Tipologia di organizzazione presso cui lavori",
                "Seniority",
                "Area aziendale",
                "Settore produttivo",
            ]
        );
        assert!(matches!(session.categories()[3], CategoryOutcome::Missing { .. }));
        assert!(matches!(session.categories()[4], CategoryOutcome::Empty { .. }));
        assert_eq!(session.chart_count(), 3);
    }

    #[test]
    fn organization_note_explains_missing_chart() {
        let session = Session::new("partecipanti.xlsx", survey(), &DashboardConfig::default()).unwrap();

        let note = session.organization_note().unwrap();
        assert_eq!(note.level, NoticeLevel::Info);
        assert!(note
            .message
            .starts_with("La colonna 'Organizzazione presso cui lavori o studi' non viene visualizzata"));
        assert!(note.message.ends_with("nella tabella completa qui sotto."));
    }

    #[test]
    fn organization_note_only_when_column_present() {
        let df = df!("Seniority" => ["Junior"]).unwrap();
        let session = Session::new("a.xlsx", df, &DashboardConfig::default()).unwrap();

        assert!(session.organization_note().is_none());
        assert_eq!(session.chart_count(), 1);
    }

    #[test]
    fn organization_column_is_never_charted() {
        let session = Session::new("a.xlsx", survey(), &DashboardConfig::default()).unwrap();

        assert!(!session
            .categories()
            .iter()
            .any(|c| c.column() == "Organizzazione presso cui lavori o studi"));
    }

    #[test]
    fn filtered_table_starts_equal_to_upload() {
        let session = Session::new("a.xlsx", survey(), &DashboardConfig::default()).unwrap();

        let filtered = session.filtered_table().unwrap();
        assert!(filtered.equals_missing(session.table()));
    }

    #[test]
    fn filter_changes_recompute_from_upload() {
        let mut session = Session::new("a.xlsx", survey(), &DashboardConfig::default()).unwrap();
        if let Some(ColumnFilter::Range(f)) = session.filters.get_mut("Età") {
            f.set_range(22.0, 30.0);
        }

        assert_eq!(session.filtered_table().unwrap().height(), 2);
        assert_eq!(session.table().height(), 3);
    }

    #[test]
    fn custom_categories_are_honoured() {
        let config = DashboardConfig {
            profiling_categories: vec!["Età".to_string()],
            ..DashboardConfig::default()
        };
        let session = Session::new("a.xlsx", survey(), &config).unwrap();

        assert_eq!(session.categories().len(), 1);
        let dist = session.categories()[0].distribution().unwrap();
        assert_eq!(dist.entries.len(), 3);
    }

    #[test]
    fn unsupported_upload_fails_with_cause() {
        let err = Session::open(Path::new("partecipanti.csv"), &DashboardConfig::default())
            .err()
            .unwrap();

        let banner = Notice::parse_failed(&err.to_string());
        assert_eq!(banner.level, NoticeLevel::Error);
        assert!(banner.message.starts_with("Errore nella lettura del file: unsupported file type"));
        assert!(banner.message.ends_with("Assicurati che sia un file Excel valido."));
    }
}
