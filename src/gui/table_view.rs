//! Table View Widget
//! Full-width scrollable view of the filtered table, rows laid out lazily.

use egui::{Label, RichText, ScrollArea};
use polars::prelude::*;

const ROW_HEIGHT: f32 = 22.0;
const TABLE_HEIGHT: f32 = 480.0;
const CHAR_WIDTH: f32 = 7.5;
const MIN_COLUMN_WIDTH: f32 = 60.0;
const MAX_COLUMN_CHARS: usize = 40;

/// Heading of the table section.
pub const SECTION_TITLE: &str = "Tabella completa con filtri";

/// Text snapshot of the filtered table.
#[derive(Default)]
pub struct TableView {
    headers: Vec<String>,
    /// Cell text per column; missing values are empty strings.
    columns: Vec<Vec<String>>,
    widths: Vec<f32>,
    row_count: usize,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Rebuild the text snapshot from a (filtered) DataFrame.
    pub fn refresh(&mut self, df: &DataFrame) -> PolarsResult<()> {
        let mut headers = Vec::with_capacity(df.width());
        let mut columns = Vec::with_capacity(df.width());
        let mut widths = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let text = column.cast(&DataType::String)?;
            let cells: Vec<String> = text
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|v| v.unwrap_or_default().to_string())
                .collect();

            let name = column.name().to_string();
            let longest = cells
                .iter()
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_CHARS);

            widths.push((longest as f32 * CHAR_WIDTH + 16.0).max(MIN_COLUMN_WIDTH));
            headers.push(name);
            columns.push(cells);
        }

        self.headers = headers;
        self.columns = columns;
        self.widths = widths;
        self.row_count = df.height();
        Ok(())
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new(format!(
                "{} righe × {} colonne",
                self.row_count,
                self.headers.len()
            ))
            .size(11.0),
        );
        ui.add_space(4.0);

        ScrollArea::horizontal()
            .id_salt("table_horizontal")
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        for (header, width) in self.headers.iter().zip(&self.widths) {
                            ui.add_sized(
                                [*width, ROW_HEIGHT],
                                Label::new(RichText::new(header).strong()).truncate(),
                            );
                        }
                    });
                    ui.separator();

                    ScrollArea::vertical()
                        .id_salt("table_vertical")
                        .max_height(TABLE_HEIGHT)
                        .auto_shrink([false, true])
                        .show_rows(ui, ROW_HEIGHT, self.row_count, |ui, row_range| {
                            for row in row_range {
                                ui.horizontal(|ui| {
                                    for (cells, width) in self.columns.iter().zip(&self.widths) {
                                        let text = cells.get(row).map(String::as_str).unwrap_or("");
                                        ui.add_sized(
                                            [*width, ROW_HEIGHT],
                                            Label::new(text).truncate(),
                                        );
                                    }
                                });
                            }
                        });
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_renders_missing_values_as_empty() {
        let df = df!(
            "Nome" => [Some("Anna"), None],
            "Età" => [Some(20i64), None]
        )
        .unwrap();

        let mut view = TableView::new();
        view.refresh(&df).unwrap();

        assert_eq!(view.row_count(), 2);
        assert_eq!(view.headers, vec!["Nome", "Età"]);
        assert_eq!(view.columns[0], vec!["Anna", ""]);
        assert_eq!(view.columns[1], vec!["20", ""]);
    }

    #[test]
    fn column_widths_are_bounded() {
        let long = "x".repeat(200);
        let df = df!("A" => ["a"], "Lunga" => [long.as_str()]).unwrap();

        let mut view = TableView::new();
        view.refresh(&df).unwrap();

        assert_eq!(view.widths[0], MIN_COLUMN_WIDTH);
        assert_eq!(view.widths[1], MAX_COLUMN_CHARS as f32 * CHAR_WIDTH + 16.0);
    }

    #[test]
    fn clear_drops_the_snapshot() {
        let df = df!("A" => [1i64, 2, 3]).unwrap();
        let mut view = TableView::new();
        view.refresh(&df).unwrap();

        view.clear();
        assert_eq!(view.row_count(), 0);
        assert!(view.headers.is_empty());
    }
}
