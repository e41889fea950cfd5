use crate::errors::BoardError;
use crate::runtime::FileSystem;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub payload_file: Option<PathBuf>,
    pub interval_seconds: Option<u64>,
    pub link_base: Option<String>,
    pub once: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub dashboard: DashboardConfig,
    pub poller: PollerConfig,
    pub banner: BannerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardConfig {
    pub projects: Vec<String>,
    pub link_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval_seconds: u64,
    pub drop_stale: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BannerConfig {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    pub pass_log: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dashboard: DashboardConfig {
                projects: Vec::new(),
                link_base: "http://localhost:8080/dashboard".to_string(),
            },
            poller: PollerConfig {
                interval_seconds: 5,
                drop_stale: true,
            },
            banner: BannerConfig {
                message: "Lost contact with the build server".to_string(),
            },
            logging: LoggingConfig { pass_log: None },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialAppConfig {
    dashboard: Option<PartialDashboardConfig>,
    poller: Option<PartialPollerConfig>,
    banner: Option<PartialBannerConfig>,
    logging: Option<PartialLoggingConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialDashboardConfig {
    projects: Option<Vec<String>>,
    link_base: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialPollerConfig {
    interval_seconds: Option<u64>,
    drop_stale: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialBannerConfig {
    message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialLoggingConfig {
    pass_log: Option<PathBuf>,
}

pub fn load_config(
    overrides: &CliOverrides,
    fs: &dyn FileSystem,
) -> Result<AppConfig, BoardError> {
    let mut cfg = AppConfig::default();

    if let Some(path) = &overrides.config_path {
        let file_contents = fs.read_to_string(path)?;
        let partial: PartialAppConfig = toml::from_str(&file_contents)
            .map_err(|e| BoardError::ConfigParse(e.to_string()))?;
        merge_partial_config(&mut cfg, partial);
    }

    apply_cli_overrides(&mut cfg, overrides);
    validate_config(&cfg)?;
    Ok(cfg)
}

fn merge_partial_config(cfg: &mut AppConfig, partial: PartialAppConfig) {
    if let Some(dashboard) = partial.dashboard {
        if let Some(projects) = dashboard.projects {
            cfg.dashboard.projects = projects;
        }
        if let Some(link_base) = dashboard.link_base {
            cfg.dashboard.link_base = link_base;
        }
    }

    if let Some(poller) = partial.poller {
        if let Some(interval_seconds) = poller.interval_seconds {
            cfg.poller.interval_seconds = interval_seconds;
        }
        if let Some(drop_stale) = poller.drop_stale {
            cfg.poller.drop_stale = drop_stale;
        }
    }

    if let Some(banner) = partial.banner {
        if let Some(message) = banner.message {
            cfg.banner.message = message;
        }
    }

    if let Some(logging) = partial.logging {
        if let Some(pass_log) = logging.pass_log {
            cfg.logging.pass_log = Some(pass_log);
        }
    }
}

fn apply_cli_overrides(cfg: &mut AppConfig, overrides: &CliOverrides) {
    if let Some(interval_seconds) = overrides.interval_seconds {
        cfg.poller.interval_seconds = interval_seconds;
    }
    if let Some(link_base) = &overrides.link_base {
        cfg.dashboard.link_base = link_base.clone();
    }
}

fn validate_config(cfg: &AppConfig) -> Result<(), BoardError> {
    if cfg.poller.interval_seconds == 0 {
        return Err(BoardError::InvalidConfig(
            "poller.interval_seconds must be at least 1".to_string(),
        ));
    }
    if cfg.dashboard.link_base.is_empty() {
        return Err(BoardError::InvalidConfig(
            "dashboard.link_base must not be empty".to_string(),
        ));
    }
    for project in &cfg.dashboard.projects {
        if project.is_empty() {
            return Err(BoardError::InvalidConfig(
                "dashboard.projects entries must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
