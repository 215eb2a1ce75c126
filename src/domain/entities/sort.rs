use std::cmp::Ordering;

use crate::domain::entities::dataset::{Row, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

pub const DEFAULT_SORT_FIELD: &str = "id";

impl Default for SortState {
    fn default() -> Self {
        Self::ascending(DEFAULT_SORT_FIELD)
    }
}

/// Header indicator for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortGlyph {
    Neutral,
    Ascending,
    Descending,
}

impl SortGlyph {
    pub fn symbol(self) -> &'static str {
        match self {
            SortGlyph::Neutral => "↕",
            SortGlyph::Ascending => "▲",
            SortGlyph::Descending => "▼",
        }
    }
}

impl SortState {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Header click. The active field flips direction, any other field
    /// becomes active in ascending order. Resetting the page is the caller's
    /// job (see `GridState::apply`).
    pub fn on_sort(&mut self, field: &str) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field.to_string();
            self.direction = SortDirection::Asc;
        }
    }

    pub fn glyph_for(&self, field: &str) -> SortGlyph {
        if self.field != field {
            return SortGlyph::Neutral;
        }
        match self.direction {
            SortDirection::Asc => SortGlyph::Ascending,
            SortDirection::Desc => SortGlyph::Descending,
        }
    }

    /// Order specifier understood by the record endpoint.
    pub fn order_specifier(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.field.clone(),
            SortDirection::Desc => format!("-{}", self.field),
        }
    }

    /// Compares two rows on the active field. Nulls (and missing keys) go
    /// last regardless of direction.
    pub fn compare_rows(&self, a: &Row, b: &Row) -> Ordering {
        compare_values(
            a.get(&self.field).unwrap_or(&Value::Null),
            b.get(&self.field).unwrap_or(&Value::Null),
            self.direction,
        )
    }

    pub fn sort_rows(&self, rows: &mut [Row]) {
        rows.sort_by(|a, b| self.compare_rows(a, b));
    }
}

pub fn compare_values(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    match (a.is_null(), b.is_null()) {
        (true, _) => Ordering::Greater,
        (_, true) => Ordering::Less,
        _ => {
            let ordering = a.natural_cmp(b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}
