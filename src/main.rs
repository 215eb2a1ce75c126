mod app;
mod config;
mod logging;

mod domain {
    pub mod entities {
        pub mod dataset;
        pub mod grid;
        pub mod log;
        pub mod page;
        pub mod sort;
        pub mod table;
    }
}

mod usecase {
    pub mod ports {
        pub mod remote;
        pub mod stream;
    }
    pub mod services {
        pub mod petition_service;
        pub mod progress_log;
        pub mod query_service;
    }
}

mod infra {
    pub mod export {
        pub mod csv;
    }
    pub mod http {
        pub mod client;
        pub mod sse;
    }
}

mod platform {
    pub mod desktop {
        pub mod log_task;
    }
}

mod ui {
    pub mod components {
        pub mod data_grid;
        pub mod log_panel;
    }
    pub mod state {
        pub mod app_state;
    }
}


use crate::app::{App, AppServices};
use crate::config::{default_log_dir, default_webview_data_dir, AppConfig};
use crate::logging::LoggingConfig;

fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load config, using defaults: {err:#}");
            AppConfig::default()
        }
    };

    let log_dir = match default_log_dir() {
        Ok(dir) => Some(dir),
        Err(err) => {
            eprintln!("file logging disabled: {err:#}");
            None
        }
    };
    if let Err(err) = logging::init(LoggingConfig {
        log_dir,
        default_filter: config.log_filter.clone(),
    }) {
        eprintln!("failed to initialize logging: {err:#}");
    }

    let webview_data_dir = match default_webview_data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            tracing::error!(error = %err, "failed to resolve webview data directory");
            return;
        }
    };

    tracing::info!(backend = %config.backend_url, "starting petition viewer");
    let services = match AppServices::from_config(config) {
        Ok(services) => services,
        Err(err) => {
            tracing::error!(error = %err, "failed to build backend client");
            return;
        }
    };

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Petition Viewer"))
                .with_data_directory(webview_data_dir),
        )
        .with_context(services)
        .launch(App);
}
