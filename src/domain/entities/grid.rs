use crate::domain::entities::dataset::{Dataset, PageQuery, Row};
use crate::domain::entities::page::PageState;
use crate::domain::entities::sort::SortState;

/// Sort and page state of one grid. All changes go through `apply` so that
/// sorting always returns to the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridState {
    pub sort: SortState,
    pub page: PageState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridAction {
    Sort(String),
    GoToPage(u32),
    SetPageSize(u32),
}

impl GridState {
    pub fn new(sort: SortState, page_size: u32) -> Self {
        Self {
            sort,
            page: PageState::with_page_size(page_size),
        }
    }

    pub fn apply(&mut self, action: GridAction, total_count: u64) {
        match action {
            GridAction::Sort(field) => {
                self.sort.on_sort(&field);
                self.page.page = 1;
            }
            GridAction::GoToPage(page) => self.page.go_to(page, total_count),
            GridAction::SetPageSize(page_size) => self.page.set_page_size(page_size),
        }
    }

    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page.page,
            page_size: self.page.page_size,
            order: self.sort.order_specifier(),
        }
    }

    /// Sorts the full in-memory dataset and cuts out the current page. The
    /// returned dataset keeps the full row count as its total.
    pub fn local_slice(&self, dataset: &Dataset) -> Dataset {
        let mut sorted: Vec<Row> = dataset.rows.clone();
        self.sort.sort_rows(&mut sorted);

        let rows = sorted
            .into_iter()
            .skip(self.page.offset())
            .take(self.page.page_size as usize)
            .collect();

        Dataset::page(rows, dataset.rows.len() as u64)
    }
}
