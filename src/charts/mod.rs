//! Charts module - Bar chart rendering

mod plotter;

pub use plotter::ChartPlotter;
