//! Category Distribution Module
//! Value counts and percentages for the profiling columns.

use crate::notice::Notice;
use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum DistributionError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One distinct value of a category.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionEntry {
    pub value: String,
    pub count: usize,
    /// Share of the non-missing total, rounded to one decimal.
    pub percentage: f64,
}

/// Count/percentage breakdown of a column, ordered by descending count.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub column: String,
    pub total: usize,
    pub entries: Vec<DistributionEntry>,
}

impl Distribution {
    /// Count the non-missing values of a column (cast to text).
    ///
    /// Values with the same count keep the order in which they first appear.
    pub fn from_column(column: &Column) -> Result<Self, DistributionError> {
        let as_text = column.cast(&DataType::String)?;
        let values = as_text.as_materialized_series().str()?;

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in values.into_iter().flatten() {
            match counts.get_mut(value) {
                Some(count) => *count += 1,
                None => {
                    order.push(value.to_string());
                    counts.insert(value.to_string(), 1);
                }
            }
        }

        let total: usize = counts.values().sum();
        let mut entries: Vec<DistributionEntry> = order
            .into_iter()
            .map(|value| {
                let count = counts.get(&value).copied().unwrap_or(0);
                DistributionEntry {
                    percentage: round_one_decimal(count as f64 / total as f64 * 100.0),
                    value,
                    count,
                }
            })
            .collect();
        // Stable sort keeps first-appearance order for ties
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(Self {
            column: column.name().to_string(),
            total,
            entries,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chart title.
    pub fn title(&self) -> String {
        format!("Distribuzione di {}", self.column)
    }

    /// Header of the collapsible detail table.
    pub fn detail_title(&self) -> String {
        format!("Dettaglio valori per '{}'", self.column)
    }
}

/// Label drawn above a bar, e.g. `66.7%`.
pub fn percentage_label(percentage: f64) -> String {
    format!("{:.1}%", percentage)
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// What the chart section shows for one charted category.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOutcome {
    /// The column is not in the uploaded table.
    Missing { column: String },
    /// The column has no value left after dropping missing ones.
    Empty { column: String },
    /// The column can be charted.
    Ready(Distribution),
}

impl CategoryOutcome {
    /// Inspect one category column of the uploaded table.
    pub fn analyze(df: &DataFrame, column: &str) -> Result<Self, DistributionError> {
        let Ok(series) = df.column(column) else {
            warn!(column, "Profiling column missing from upload");
            return Ok(Self::Missing {
                column: column.to_string(),
            });
        };

        let distribution = Distribution::from_column(series)?;
        if distribution.is_empty() {
            info!(column, "Profiling column has no values");
            return Ok(Self::Empty {
                column: column.to_string(),
            });
        }

        Ok(Self::Ready(distribution))
    }

    pub fn column(&self) -> &str {
        match self {
            Self::Missing { column } | Self::Empty { column } => column,
            Self::Ready(distribution) => &distribution.column,
        }
    }

    /// Banner replacing the chart, if the category cannot be charted.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Missing { column } => Some(Notice::warning(format!(
                "La colonna '{}' non è presente nel file caricato.",
                column
            ))),
            Self::Empty { column } => Some(Notice::info(format!(
                "Nessun dato disponibile per '{}' dopo aver rimosso i valori mancanti.",
                column
            ))),
            Self::Ready(_) => None,
        }
    }

    pub fn distribution(&self) -> Option<&Distribution> {
        match self {
            Self::Ready(distribution) => Some(distribution),
            _ => None,
        }
    }
}
