use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::dataset::Dataset;
use crate::domain::entities::grid::GridState;
use crate::platform::desktop::log_task::TaskConnection;
use crate::usecase::services::progress_log::ProgressLogReducer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    VoterRecords,
    Petition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Upload,
    Process,
    Results,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Upload, Step::Process, Step::Results];

    pub fn label(self) -> &'static str {
        match self {
            Step::Upload => "Upload Files",
            Step::Process => "Process Files",
            Step::Results => "View Results",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Step::Upload => 0,
            Step::Process => 1,
            Step::Results => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsTab {
    Table,
    Statistics,
}

/// Shell-wide state, provided as context by `App`.
#[derive(Clone, Copy)]
pub struct AppState {
    pub active_view: Signal<ActiveView>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            active_view: use_signal(|| ActiveView::VoterRecords),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}

pub struct PetitionState {
    pub step: Signal<Step>,
    pub uploaded_file: Signal<Option<String>>,
    pub processing: Signal<bool>,
    pub results: Signal<Option<Dataset>>,
    pub grid: Signal<GridState>,
    pub tab: Signal<ResultsTab>,
    pub logs: Signal<ProgressLogReducer<TaskConnection>>,
}

impl PetitionState {
    pub fn new(page_size: u32) -> Self {
        Self {
            step: use_signal(|| Step::Upload),
            uploaded_file: use_signal(|| None::<String>),
            processing: use_signal(|| false),
            results: use_signal(|| None::<Dataset>),
            grid: use_signal(move || GridState::new(Default::default(), page_size)),
            tab: use_signal(|| ResultsTab::Table),
            logs: use_signal(ProgressLogReducer::new),
        }
    }
}
