use std::sync::Arc;

use anyhow::Result;
use dioxus::prelude::*;
use rfd::FileDialog;

use crate::config::AppConfig;
use crate::domain::entities::dataset::{ValidationStats, VALID_COLUMN};
use crate::domain::entities::grid::{GridAction, GridState};
use crate::domain::entities::sort::SortState;
use crate::domain::entities::table::{ColumnRenderer, RendererMap};
use crate::infra::export::csv::{export_rows_to_path, DEFAULT_EXPORT_FILE_NAME};
use crate::infra::http::client::ApiClient;
use crate::platform::desktop::log_task::start_log_stream;
use crate::ui::components::data_grid::DataGrid;
use crate::ui::components::log_panel::LogPanel;
use crate::ui::state::app_state::{ActiveView, AppState, PetitionState, ResultsTab, Step};
use crate::usecase::ports::remote::UploadKind;
use crate::usecase::services::petition_service::PetitionService;
use crate::usecase::services::query_service::QueryService;

const NAV_BUTTON_STYLE: &str = "border: 1px solid #bbb; background: #fff; padding: 4px 12px; border-radius: 6px; cursor: pointer;";
const NAV_BUTTON_ACTIVE_STYLE: &str = "border: 1px solid #2563eb; background: #eef4ff; padding: 4px 12px; border-radius: 6px; cursor: pointer;";

/// Backend collaborators shared by every view.
#[derive(Clone)]
pub struct AppServices {
    pub config: AppConfig,
    pub client: Arc<ApiClient>,
    pub queries: Arc<QueryService>,
    pub petitions: Arc<PetitionService>,
}

impl AppServices {
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let client = Arc::new(ApiClient::new(&config)?);
        Ok(Self {
            queries: Arc::new(QueryService::new(client.clone())),
            petitions: Arc::new(PetitionService::new(client.clone())),
            client,
            config,
        })
    }
}

fn pick_file(kind: UploadKind) -> Option<std::path::PathBuf> {
    FileDialog::new()
        .add_filter(kind.filter_label(), &[kind.extension()])
        .pick_file()
}

#[component]
pub fn App() -> Element {
    let app_state = AppState::new();
    use_context_provider(|| app_state);
    let AppState {
        mut active_view,
        busy,
        status,
    } = app_state;

    let nav_style = |view: ActiveView| {
        if active_view() == view {
            NAV_BUTTON_ACTIVE_STYLE
        } else {
            NAV_BUTTON_STYLE
        }
    };

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 0 16px;",
            nav {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap; padding: 8px 0;",
                button {
                    style: nav_style(ActiveView::VoterRecords),
                    disabled: busy(),
                    onclick: move |_| active_view.set(ActiveView::VoterRecords),
                    "Voter Records"
                }
                button {
                    style: nav_style(ActiveView::Petition),
                    disabled: busy(),
                    onclick: move |_| active_view.set(ActiveView::Petition),
                    "Petition"
                }
                span { " {status}" }
            }

            match active_view() {
                ActiveView::VoterRecords => rsx! { VoterRecordsView {} },
                ActiveView::Petition => rsx! { PetitionView {} },
            }
        }
    }
}

#[component]
fn VoterRecordsView() -> Element {
    let services = use_context::<AppServices>();
    let AppState {
        mut busy,
        mut status,
        ..
    } = use_context::<AppState>();
    let page_size = services.config.page_size;
    let mut grid = use_signal(move || GridState::new(SortState::default(), page_size));

    let queries = services.queries.clone();
    let mut page = use_resource(move || {
        let queries = queries.clone();
        let state = grid();
        async move {
            let result = queries.load_page(&state).await;
            if let Err(err) = &result {
                tracing::error!(error = %err, "failed to load voter records");
            }
            result
        }
    });

    let (rows, total_count, is_loading, load_error) = match &*page.read() {
        Some(Ok(dataset)) => (dataset.rows.clone(), dataset.total_count, false, None),
        Some(Err(err)) => (
            Vec::new(),
            0,
            false,
            Some(format!("Failed to load voter records: {err}")),
        ),
        None => (Vec::new(), 0, true, None),
    };
    let window = grid.read().page.window(total_count);
    let sort = grid.read().sort.clone();

    let petitions = services.petitions.clone();
    let queries = services.queries.clone();
    let on_upload = move |_| {
        if busy() {
            return;
        }
        let Some(path) = pick_file(UploadKind::VoterRecords) else {
            status.set("Upload cancelled".to_string());
            return;
        };

        busy.set(true);
        status.set(format!("Uploading {}", path.display()));
        let petitions = petitions.clone();
        let queries = queries.clone();
        spawn(async move {
            match petitions.upload(UploadKind::VoterRecords, &path).await {
                Ok(()) => {
                    queries.invalidate_count();
                    grid.write().apply(GridAction::GoToPage(1), 0);
                    page.restart();
                    status.set(format!("Uploaded {}", path.display()));
                }
                Err(err) => status.set(format!("Upload failed: {err}")),
            }
            busy.set(false);
        });
    };

    rsx! {
        div {
            style: "text-align: left; display: flex; flex-direction: column; gap: 12px;",
            div {
                button { disabled: busy(), onclick: on_upload, "Upload voter records (.csv)" }
            }
            if let Some(message) = load_error {
                p { style: "color: #dc2626;", "{message}" }
            }
            DataGrid {
                rows,
                is_loading,
                sort,
                on_sort: move |field: String| grid.write().apply(GridAction::Sort(field), total_count),
                pagination: Some(window),
                on_page_change: move |target: u32| grid.write().apply(GridAction::GoToPage(target), total_count),
                on_page_size_change: move |size: u32| grid.write().apply(GridAction::SetPageSize(size), total_count),
            }
        }
    }
}

#[component]
fn PetitionView() -> Element {
    let services = use_context::<AppServices>();
    let AppState {
        mut busy,
        mut status,
        ..
    } = use_context::<AppState>();
    let PetitionState {
        mut step,
        mut uploaded_file,
        mut processing,
        mut results,
        mut grid,
        mut tab,
        mut logs,
    } = PetitionState::new(services.config.page_size);

    let petitions = services.petitions.clone();
    let on_choose_pdf = move |_| {
        let Some(path) = pick_file(UploadKind::PetitionSignatures) else {
            return;
        };
        busy.set(true);
        status.set(format!("Uploading {}", path.display()));
        let petitions = petitions.clone();
        spawn(async move {
            match petitions.upload(UploadKind::PetitionSignatures, &path).await {
                Ok(()) => {
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    status.set(format!("Uploaded {name}"));
                    uploaded_file.set(Some(name));
                }
                Err(err) => status.set(format!("Upload failed: {err}")),
            }
            busy.set(false);
        });
    };

    let client = services.client.clone();
    let petitions = services.petitions.clone();
    let page_size = services.config.page_size;
    let on_process = move |_| {
        if processing() {
            return;
        }
        processing.set(true);
        busy.set(true);
        start_log_stream(client.clone(), logs);
        step.set(Step::Process);
        status.set("Processing files".to_string());

        let petitions = petitions.clone();
        spawn(async move {
            match petitions.process().await {
                Ok(dataset) => {
                    status.set(format!("Matched {} records", dataset.rows.len()));
                    results.set(Some(dataset));
                    grid.set(GridState::new(SortState::default(), page_size));
                    tab.set(ResultsTab::Table);
                    step.set(Step::Results);
                }
                Err(err) => {
                    status.set(format!("Processing failed: {err}"));
                    step.set(Step::Upload);
                }
            }
            logs.write().stop();
            processing.set(false);
            busy.set(false);
        });
    };

    let on_export = move |_| {
        let Some(dataset) = results() else {
            return;
        };
        let Some(path) = FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(DEFAULT_EXPORT_FILE_NAME)
            .save_file()
        else {
            return;
        };
        match export_rows_to_path(&dataset.rows, &path) {
            Ok(count) => status.set(format!("Exported {count} rows to {}", path.display())),
            Err(err) => status.set(format!("Export failed: {err:#}")),
        }
    };

    let petitions = services.petitions.clone();
    let on_start_over = move |_| {
        logs.write().stop();
        results.set(None);
        uploaded_file.set(None);
        step.set(Step::Upload);
        let petitions = petitions.clone();
        spawn(async move {
            if let Err(err) = petitions.start_over().await {
                tracing::warn!(error = %err, "failed to clear uploaded files");
            }
        });
    };

    let current_step = step();

    rsx! {
        div {
            style: "max-width: 1100px; margin: 0 auto; text-align: left;",
            StepIndicator { current: current_step }

            match current_step {
                Step::Upload => rsx! {
                    div {
                        style: "text-align: center; display: flex; flex-direction: column; gap: 16px; align-items: center;",
                        p { "Upload your files to begin the validation process." }
                        h4 { "Ballot Signatures" }
                        p {
                            "Upload your PDF file containing ballot pages with signatures. "
                            "Ensure the signature sections include the printed name and address of the voter."
                        }
                        button { disabled: busy(), onclick: on_choose_pdf, "Choose PDF file" }
                        if let Some(name) = uploaded_file() {
                            span { "Selected: {name}" }
                        }
                        button {
                            style: "width: 50%; padding: 8px; background: #dc2626; color: #fff; border: none; border-radius: 6px;",
                            disabled: processing() || busy(),
                            onclick: on_process,
                            if processing() { "Processing" } else { "Process Files" }
                        }
                    }
                },
                Step::Process => {
                    let percent = logs.read().progress();
                    let entries = logs.read().entries().to_vec();
                    let connected = logs.read().is_connected();
                    let connection_status = logs.read().status_label();
                    rsx! {
                        div {
                            style: "text-align: center; padding: 32px 0;",
                            progress { style: "width: 100%;", max: "100", value: "{percent}" }
                            p { style: "font-size: 18px;", "Processing your files... {percent}%" }
                            LogPanel { entries, connected, connection_status }
                        }
                    }
                }
                Step::Results => {
                    let dataset = results().unwrap_or_default();
                    let stats = ValidationStats::from_rows(&dataset.rows);
                    let slice = grid.read().local_slice(&dataset);
                    let total_count = slice.total_count;
                    let window = grid.read().page.window(total_count);
                    let sort = grid.read().sort.clone();
                    let renderers = RendererMap::new().with(VALID_COLUMN, ColumnRenderer::checkbox());
                    let tab_style = |target: ResultsTab| {
                        if tab() == target {
                            NAV_BUTTON_ACTIVE_STYLE
                        } else {
                            NAV_BUTTON_STYLE
                        }
                    };
                    let table_tab_style = tab_style(ResultsTab::Table);
                    let stats_tab_style = tab_style(ResultsTab::Statistics);
                    rsx! {
                        div {
                            style: "margin: 20px 0; display: flex; flex-direction: column; gap: 16px;",
                            h3 { "Results" }
                            div {
                                style: "display: flex; gap: 8px; align-items: center;",
                                button {
                                    style: table_tab_style,
                                    onclick: move |_| tab.set(ResultsTab::Table),
                                    "Data Table"
                                }
                                button {
                                    style: stats_tab_style,
                                    onclick: move |_| tab.set(ResultsTab::Statistics),
                                    "Statistics"
                                }
                                button {
                                    style: NAV_BUTTON_STYLE,
                                    disabled: dataset.is_empty(),
                                    onclick: on_export,
                                    "Export CSV"
                                }
                                button { style: NAV_BUTTON_STYLE, onclick: on_start_over, "Start Over" }
                            }
                            match tab() {
                                ResultsTab::Table => rsx! {
                                    DataGrid {
                                        rows: slice.rows,
                                        is_loading: processing(),
                                        sort,
                                        on_sort: move |field: String| grid.write().apply(GridAction::Sort(field), total_count),
                                        pagination: Some(window),
                                        on_page_change: move |target: u32| grid.write().apply(GridAction::GoToPage(target), total_count),
                                        on_page_size_change: move |size: u32| grid.write().apply(GridAction::SetPageSize(size), total_count),
                                        renderers,
                                    }
                                },
                                ResultsTab::Statistics => rsx! { StatisticsCard { stats } },
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StepIndicator(current: Step) -> Element {
    rsx! {
        div {
            style: "display: flex; align-items: center; justify-content: center; gap: 48px; margin-bottom: 32px;",
            {Step::ALL.iter().map(|step| {
                let (background, color) = if *step == current {
                    ("#2563eb", "#fff")
                } else if current.index() > step.index() {
                    ("#16a34a", "#fff")
                } else {
                    ("#e5e7eb", "#4b5563")
                };
                let marker = if current.index() > step.index() {
                    "✓".to_string()
                } else {
                    (step.index() + 1).to_string()
                };
                let label = step.label();
                rsx!(
                    div {
                        key: "{label}",
                        style: "display: flex; flex-direction: column; align-items: center;",
                        div {
                            style: "width: 32px; height: 32px; border-radius: 50%; display: flex; align-items: center; justify-content: center; background: {background}; color: {color};",
                            "{marker}"
                        }
                        span { style: "font-size: 14px; margin-top: 8px;", "{label}" }
                    }
                )
            })}
        }
    }
}

#[component]
fn StatisticsCard(stats: ValidationStats) -> Element {
    let ValidationStats {
        total,
        valid,
        invalid,
    } = stats;

    rsx! {
        div {
            style: "padding: 24px; border: 1px solid #e5e7eb; border-radius: 8px; max-width: 420px; margin: 0 auto;",
            h4 { style: "font-size: 18px; font-weight: 600; margin-bottom: 16px;", "Statistics" }
            div {
                style: "display: flex; justify-content: space-between;",
                span { "Total Voter Records:" }
                strong { "{total}" }
            }
            div {
                style: "display: flex; justify-content: space-between; color: #16a34a;",
                span { "Valid Matches:" }
                strong { "{valid}" }
            }
            div {
                style: "display: flex; justify-content: space-between; color: #dc2626;",
                span { "Invalid Matches:" }
                strong { "{invalid}" }
            }
        }
    }
}
