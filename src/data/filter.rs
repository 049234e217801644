//! Table Filter Module
//! Per-column range / multi-select filters combined by conjunction.

use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Whether a column gets a numeric range control.
pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Closed interval filter on a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    pub column: String,
    pub min: f64,
    pub max: f64,
    low: f64,
    high: f64,
}

impl RangeFilter {
    pub fn new(column: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            column: column.into(),
            min,
            max,
            low: min,
            high: max,
        }
    }

    pub fn label(&self) -> String {
        format!("Intervallo per '{}'", self.column)
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Move the lower end; the upper end follows if crossed.
    pub fn set_low(&mut self, low: f64) {
        self.low = low.clamp(self.min, self.max);
        if self.high < self.low {
            self.high = self.low;
        }
    }

    /// Move the upper end; the lower end follows if crossed.
    pub fn set_high(&mut self, high: f64) {
        self.high = high.clamp(self.min, self.max);
        if self.low > self.high {
            self.low = self.high;
        }
    }

    pub fn set_range(&mut self, low: f64, high: f64) {
        self.set_low(low);
        self.set_high(high);
    }

    /// A full-range filter excludes nothing.
    pub fn is_active(&self) -> bool {
        self.low > self.min || self.high < self.max
    }

    pub fn reset(&mut self) {
        self.set_range(self.min, self.max);
    }

    fn and_mask(&self, df: &DataFrame, mask: &mut [bool]) -> Result<(), FilterError> {
        let floats = df.column(&self.column)?.cast(&DataType::Float64)?;
        let values = floats.as_materialized_series().f64()?;

        for (keep, value) in mask.iter_mut().zip(values.into_iter()) {
            *keep &= value.is_some_and(|v| v >= self.low && v <= self.high);
        }
        Ok(())
    }
}

/// Multi-select filter on the text-cast values of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectFilter {
    pub column: String,
    /// Sorted distinct values.
    pub options: Vec<String>,
    /// One flag per option.
    pub selected: Vec<bool>,
}

impl SelectFilter {
    /// All options start selected.
    pub fn new(column: impl Into<String>, options: Vec<String>) -> Self {
        let selected = vec![true; options.len()];
        Self {
            column: column.into(),
            options,
            selected,
        }
    }

    pub fn label(&self) -> String {
        format!("Valori per '{}'", self.column)
    }

    pub fn select_all(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = true);
    }

    pub fn clear(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = false);
    }

    pub fn selected_values(&self) -> Vec<&str> {
        self.options
            .iter()
            .zip(self.selected.iter())
            .filter(|(_, &selected)| selected)
            .map(|(option, _)| option.as_str())
            .collect()
    }

    /// Selecting every value, or none at all, excludes nothing.
    pub fn is_active(&self) -> bool {
        let count = self.selected.iter().filter(|&&s| s).count();
        count > 0 && count < self.options.len()
    }

    fn and_mask(&self, df: &DataFrame, mask: &mut [bool]) -> Result<(), FilterError> {
        let text = df.column(&self.column)?.cast(&DataType::String)?;
        let values = text.as_materialized_series().str()?;
        let wanted: HashSet<&str> = self.selected_values().into_iter().collect();

        for (keep, value) in mask.iter_mut().zip(values.into_iter()) {
            *keep &= value.is_some_and(|v| wanted.contains(v));
        }
        Ok(())
    }
}

/// Filter control for a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    Range(RangeFilter),
    Select(SelectFilter),
}

impl ColumnFilter {
    /// Build the default filter for a column, if it gets one.
    ///
    /// All-null numeric columns and columns without any value get no filter.
    pub fn for_column(column: &Column) -> Result<Option<Self>, FilterError> {
        let name = column.name().to_string();

        if is_numeric(column.dtype()) {
            let floats = column.cast(&DataType::Float64)?;
            let values = floats.as_materialized_series().f64()?;
            return Ok(match (values.min(), values.max()) {
                (Some(min), Some(max)) => Some(Self::Range(RangeFilter::new(name, min, max))),
                _ => None,
            });
        }

        let text = column.cast(&DataType::String)?;
        let options: BTreeSet<&str> = text
            .as_materialized_series()
            .str()?
            .into_iter()
            .flatten()
            .collect();
        if options.is_empty() {
            return Ok(None);
        }

        let options = options.into_iter().map(|o| o.to_string()).collect();
        Ok(Some(Self::Select(SelectFilter::new(name, options))))
    }

    pub fn column(&self) -> &str {
        match self {
            Self::Range(f) => &f.column,
            Self::Select(f) => &f.column,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Self::Range(f) => f.is_active(),
            Self::Select(f) => f.is_active(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::Range(f) => f.reset(),
            Self::Select(f) => f.select_all(),
        }
    }

    fn and_mask(&self, df: &DataFrame, mask: &mut [bool]) -> Result<(), FilterError> {
        match self {
            Self::Range(f) => f.and_mask(df, mask),
            Self::Select(f) => f.and_mask(df, mask),
        }
    }
}

/// Filter controls for every filterable column of the uploaded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    filters: Vec<ColumnFilter>,
}

impl FilterState {
    /// Default filters (full ranges, everything selected) in column order.
    pub fn build(df: &DataFrame) -> Result<Self, FilterError> {
        let mut filters = Vec::new();
        for column in df.get_columns() {
            match ColumnFilter::for_column(column)? {
                Some(filter) => filters.push(filter),
                None => debug!(column = %column.name(), "No filter for column"),
            }
        }
        Ok(Self { filters })
    }

    pub fn filters(&self) -> &[ColumnFilter] {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut [ColumnFilter] {
        &mut self.filters
    }

    pub fn active_count(&self) -> usize {
        self.filters.iter().filter(|f| f.is_active()).count()
    }

    pub fn reset(&mut self) {
        self.filters.iter_mut().for_each(ColumnFilter::reset);
    }

    /// Rows of `df` passing every active filter, in their original order.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame, FilterError> {
        let active: Vec<&ColumnFilter> = self.filters.iter().filter(|f| f.is_active()).collect();
        if active.is_empty() {
            return Ok(df.clone());
        }

        let mut mask = vec![true; df.height()];
        for filter in active {
            filter.and_mask(df, &mut mask)?;
        }

        let mask = BooleanChunked::from_slice("mask".into(), &mask);
        let filtered = df.filter(&mask)?;
        debug!(
            rows = filtered.height(),
            total = df.height(),
            active = self.active_count(),
            "Applied filters"
        );
        Ok(filtered)
    }
}

#[cfg(test)]
impl FilterState {
    pub fn get(&self, column: &str) -> Option<&ColumnFilter> {
        self.filters.iter().find(|f| f.column() == column)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut ColumnFilter> {
        self.filters.iter_mut().find(|f| f.column() == column)
    }
}
