use dioxus::prelude::*;

use crate::domain::entities::dataset::Row;
use crate::domain::entities::page::{NavTarget, PageWindow, PAGE_SIZE_OPTIONS};
use crate::domain::entities::sort::SortState;
use crate::domain::entities::table::{header_cells, CellContent, HeaderCell, RendererMap, TableModel};

const HEADER_CELL_STYLE: &str = "padding: 8px 16px; text-align: left; font-weight: 500; color: #6b7280; cursor: pointer; user-select: none; white-space: nowrap;";
const BODY_CELL_STYLE: &str = "padding: 8px 16px; border-top: 1px solid #e5e7eb;";

fn render_cell(cell: &CellContent) -> Element {
    match cell {
        CellContent::Empty => rsx! {},
        CellContent::Text(text) => rsx! { "{text}" },
        CellContent::Check(checked) => rsx! {
            input {
                r#type: "checkbox",
                checked: *checked,
                disabled: true,
                style: "width: 16px; height: 16px; accent-color: #2563eb;",
            }
        },
    }
}

/// Table over `rows` with click-to-sort headers. The navigation bar is only
/// drawn when `pagination` is given.
#[component]
pub fn DataGrid(
    rows: Vec<Row>,
    is_loading: bool,
    sort: SortState,
    on_sort: EventHandler<String>,
    pagination: Option<PageWindow>,
    on_page_change: EventHandler<u32>,
    on_page_size_change: EventHandler<u32>,
    renderers: Option<RendererMap>,
) -> Element {
    let renderers = renderers.unwrap_or_default();

    let (columns, cells) = match TableModel::build(&rows, is_loading, &renderers) {
        TableModel::Loading => return rsx! { div { "Loading..." } },
        TableModel::Empty => return rsx! { div { "No data available" } },
        TableModel::Table { columns, cells } => (columns, cells),
    };

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 16px;",
            div {
                style: "border: 1px solid #e5e7eb; border-radius: 6px; overflow-x: auto;",
                table {
                    style: "border-collapse: collapse; width: 100%;",
                    thead {
                        tr {
                            {header_cells(&columns, &sort).into_iter().map(|cell| {
                                let HeaderCell { key, text } = cell;
                                let sort_key = key.clone();
                                rsx!(
                                    th {
                                        key: "{key}",
                                        style: HEADER_CELL_STYLE,
                                        onclick: move |_| on_sort.call(sort_key.clone()),
                                        "{text}"
                                    }
                                )
                            })}
                        }
                    }
                    tbody {
                        {cells.iter().enumerate().map(|(row_idx, row_cells)| rsx!(
                            tr {
                                key: "{row_idx}",
                                {row_cells.iter().map(|cell| rsx!(
                                    td { style: BODY_CELL_STYLE, {render_cell(cell)} }
                                ))}
                            }
                        ))}
                    }
                }
            }

            {pagination.map(|window| rsx! {
                PaginationBar {
                    window,
                    on_page_change,
                    on_page_size_change,
                }
            })}
        }
    }
}

#[component]
pub fn PaginationBar(
    window: PageWindow,
    on_page_change: EventHandler<u32>,
    on_page_size_change: EventHandler<u32>,
) -> Element {
    let summary = window.summary();
    let page = window.page;
    let total_pages = window.total_pages;
    let page_size = window.page_size;
    let controls = [
        (NavTarget::First, "«", "Go to first page"),
        (NavTarget::Previous, "‹", "Go to previous page"),
        (NavTarget::Next, "›", "Go to next page"),
        (NavTarget::Last, "»", "Go to last page"),
    ];

    rsx! {
        div {
            style: "display: flex; align-items: center; justify-content: space-between; gap: 16px;",
            p { style: "font-size: 14px; color: #6b7280;", "{summary}" }
            div {
                style: "display: flex; align-items: center; gap: 16px;",
                select {
                    value: "{page_size}",
                    onchange: move |event| {
                        if let Ok(size) = event.value().parse::<u32>() {
                            on_page_size_change.call(size);
                        }
                    },
                    {PAGE_SIZE_OPTIONS.iter().map(|size| rsx!(
                        option { key: "{size}", value: "{size}", selected: *size == page_size, "{size} / page" }
                    ))}
                }
                span { style: "font-size: 14px; font-weight: 500;", "Page {page} of {total_pages}" }
                div {
                    style: "display: flex; gap: 8px;",
                    {controls.into_iter().map(|(target, glyph, title)| {
                        let next_page = window.resolve(target);
                        rsx!(
                            button {
                                key: "{title}",
                                title: title,
                                style: "width: 32px; height: 32px; border: 1px solid #d1d5db; border-radius: 6px; background: #fff;",
                                disabled: next_page.is_none(),
                                onclick: move |_| {
                                    if let Some(target_page) = next_page {
                                        on_page_change.call(target_page);
                                    }
                                },
                                "{glyph}"
                            }
                        )
                    })}
                }
            }
        }
    }
}
