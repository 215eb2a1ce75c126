use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::entities::page::DEFAULT_PAGE_SIZE;

pub const BACKEND_URL_ENV: &str = "PETITION_BACKEND_URL";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000/api".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 30,
            log_filter: "info,petition_viewer=debug".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `config.json` from the user's config directory (defaults when
    /// absent), then applies environment overrides.
    pub fn load() -> Result<Self> {
        let config = match config_file_path() {
            Ok(path) => Self::load_from(&path)?,
            Err(err) => {
                tracing::warn!(error = %err, "no config directory, using defaults");
                Self::default()
            }
        };
        Ok(config.with_env_override(std::env::var(BACKEND_URL_ENV).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        Ok(config.normalized())
    }

    pub fn with_env_override(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url.filter(|url| !url.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        self
    }

    fn normalized(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        self
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("org", "petition", "petition-viewer")
        .ok_or_else(|| anyhow!("unable to resolve application directories"))
}

pub fn config_file_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
}

pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().to_path_buf())
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create dir: {}", dir.display()))?;
    Ok(dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_dir(data_dir()?.join("webview2"))
}

pub fn default_log_dir() -> Result<PathBuf> {
    ensure_dir(data_dir()?.join("logs"))
}
