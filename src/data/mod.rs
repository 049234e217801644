//! Data module - Excel loading, category distributions and table filters

mod distribution;
mod filter;
mod loader;

pub use distribution::{percentage_label, CategoryOutcome, Distribution, DistributionError};
pub use filter::{ColumnFilter, FilterError, FilterState, RangeFilter, SelectFilter};
pub use loader::{DataLoader, LoaderError, SUPPORTED_EXTENSIONS};
