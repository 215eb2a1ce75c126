use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::domain::entities::dataset::{infer_columns, Column, Row, Value};
use crate::domain::entities::sort::SortState;

/// What a cell shows, independent of the markup used to draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Empty,
    Text(String),
    Check(bool),
}

impl CellContent {
    pub fn raw(value: &Value) -> Self {
        match value {
            Value::Null => CellContent::Empty,
            other => CellContent::Text(other.to_string()),
        }
    }
}

type RenderFn = dyn Fn(&Value, &Row) -> CellContent;

#[derive(Clone, Default)]
pub enum ColumnRenderer {
    #[default]
    Identity,
    Custom(Rc<RenderFn>),
}

impl ColumnRenderer {
    pub fn custom<F>(render: F) -> Self
    where
        F: Fn(&Value, &Row) -> CellContent + 'static,
    {
        ColumnRenderer::Custom(Rc::new(render))
    }

    /// Read-only check mark; anything but `true` shows unchecked.
    pub fn checkbox() -> Self {
        Self::custom(|value, _| CellContent::Check(value.as_bool().unwrap_or(false)))
    }

    pub fn render(&self, value: &Value, row: &Row) -> CellContent {
        match self {
            ColumnRenderer::Identity => CellContent::raw(value),
            ColumnRenderer::Custom(render) => render(value, row),
        }
    }
}

impl fmt::Debug for ColumnRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRenderer::Identity => f.write_str("Identity"),
            ColumnRenderer::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for ColumnRenderer {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ColumnRenderer::Identity, ColumnRenderer::Identity) => true,
            (ColumnRenderer::Custom(a), ColumnRenderer::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Per-column renderer overrides. Unlisted columns render their raw value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RendererMap {
    renderers: HashMap<String, ColumnRenderer>,
}

impl RendererMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, renderer: ColumnRenderer) -> Self {
        self.renderers.insert(column.into(), renderer);
        self
    }

    pub fn resolve(&self, column: &str) -> ColumnRenderer {
        self.renderers.get(column).cloned().unwrap_or_default()
    }

    pub fn render_cell(&self, column: &Column, row: &Row) -> CellContent {
        let value = row.get(&column.key).unwrap_or(&Value::Null);
        self.resolve(&column.key).render(value, row)
    }
}

/// A header cell: the key a click sorts by and the text shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub text: String,
}

pub fn header_cells(columns: &[Column], sort: &SortState) -> Vec<HeaderCell> {
    columns
        .iter()
        .map(|column| HeaderCell {
            key: column.key.clone(),
            text: format!("{} {}", column.label, sort.glyph_for(&column.key).symbol()),
        })
        .collect()
}

/// The projected table a grid draws.
#[derive(Debug, Clone, PartialEq)]
pub enum TableModel {
    Loading,
    Empty,
    Table {
        columns: Vec<Column>,
        cells: Vec<Vec<CellContent>>,
    },
}

impl TableModel {
    pub fn build(rows: &[Row], is_loading: bool, renderers: &RendererMap) -> Self {
        if is_loading {
            return TableModel::Loading;
        }
        if rows.is_empty() {
            return TableModel::Empty;
        }

        let columns = infer_columns(rows);
        let cells = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| renderers.render_cell(column, row))
                    .collect()
            })
            .collect();

        TableModel::Table { columns, cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<Row> {
        let mut first = Row::new();
        first.insert("id".to_string(), Value::from(1));
        first.insert("Valid".to_string(), Value::from(true));
        first.insert("Name".to_string(), Value::Null);

        let mut second = Row::new();
        second.insert("id".to_string(), Value::from(2));
        second.insert("Valid".to_string(), Value::from(false));
        second.insert("Name".to_string(), Value::from("Bea"));

        vec![first, second]
    }

    #[test]
    fn loading_wins_over_everything() {
        let model = TableModel::build(&sample_rows(), true, &RendererMap::new());
        assert_eq!(model, TableModel::Loading);

        let model = TableModel::build(&[], true, &RendererMap::new());
        assert_eq!(model, TableModel::Loading);
    }

    #[test]
    fn empty_rows_produce_empty_state() {
        assert_eq!(
            TableModel::build(&[], false, &RendererMap::new()),
            TableModel::Empty
        );
    }

    #[test]
    fn unregistered_columns_show_raw_values() {
        let TableModel::Table { columns, cells } =
            TableModel::build(&sample_rows(), false, &RendererMap::new())
        else {
            panic!("expected a table");
        };

        assert_eq!(columns.len(), 3);
        assert_eq!(
            cells[0],
            vec![
                CellContent::Text("1".to_string()),
                CellContent::Text("true".to_string()),
                CellContent::Empty,
            ]
        );
    }

    #[test]
    fn registered_renderers_replace_cell_content() {
        let renderers = RendererMap::new()
            .with("Valid", ColumnRenderer::checkbox())
            .with(
                "Name",
                ColumnRenderer::custom(|value, row| {
                    CellContent::Text(format!("{}#{}", value, row["id"]))
                }),
            );

        let TableModel::Table { cells, .. } =
            TableModel::build(&sample_rows(), false, &renderers)
        else {
            panic!("expected a table");
        };

        assert_eq!(cells[0][1], CellContent::Check(true));
        assert_eq!(cells[1][1], CellContent::Check(false));
        assert_eq!(cells[0][2], CellContent::Text("#1".to_string()));
        assert_eq!(cells[1][2], CellContent::Text("Bea#2".to_string()));
    }

    #[test]
    fn resolve_defaults_to_identity() {
        let checkbox = ColumnRenderer::checkbox();
        let renderers = RendererMap::new().with("Valid", checkbox.clone());

        assert_eq!(renderers.resolve("Valid"), checkbox);
        assert_eq!(renderers.resolve("other"), ColumnRenderer::Identity);
    }

    #[test]
    fn checkbox_treats_non_boolean_values_as_unchecked() {
        let row = Row::new();
        let checkbox = ColumnRenderer::checkbox();

        assert_eq!(checkbox.render(&Value::from(true), &row), CellContent::Check(true));
        assert_eq!(checkbox.render(&Value::Null, &row), CellContent::Check(false));
        assert_eq!(checkbox.render(&Value::from("yes"), &row), CellContent::Check(false));
    }

    #[test]
    fn header_cells_sort_by_column_key_and_mark_active_column() {
        let columns = infer_columns(&sample_rows());
        let mut sort = SortState::default();
        sort.on_sort("Valid");
        sort.on_sort("Valid");

        let headers = header_cells(&columns, &sort);

        let keys: Vec<&str> = headers.iter().map(|cell| cell.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "Valid", "Name"]);
        assert_eq!(headers[0].text, "Id ↕");
        assert_eq!(headers[1].text, "Valid ▼");
        assert_eq!(headers[2].text, "Name ↕");
    }
}
