use std::path::PathBuf;

pub const LOG_ENV: &str = "SCHOOLD_LOG";
pub const WORKSPACE_ENV: &str = "SCHOOLD_WORKSPACE";
pub const ROLE_ENV: &str = "SCHOOLD_ROLE";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Startup settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_filter: String,
    /// Opened before the first request when set.
    pub workspace: Option<PathBuf>,
    /// Session role used until one is stored in the workspace.
    pub role: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            log_filter: get(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            workspace: get(WORKSPACE_ENV).map(PathBuf::from),
            role: get(ROLE_ENV),
        }
    }
}
