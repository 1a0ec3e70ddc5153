use std::collections::HashMap;
use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

use crate::actions::RoleSource;
use crate::db;
use crate::modal::FormModal;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    /// Mounted modals by id.
    pub modals: HashMap<String, FormModal>,
    /// Session role; a role stored in the workspace takes precedence.
    pub role: Option<String>,
}

impl AppState {
    pub fn new(role: Option<String>) -> Self {
        Self {
            workspace: None,
            db: None,
            modals: HashMap::new(),
            role,
        }
    }

    /// Opens (or creates) the record store under `path` and makes it current.
    pub fn open_workspace(&mut self, path: PathBuf) -> anyhow::Result<()> {
        let conn = db::open_db(&path)?;
        tracing::info!(workspace = %path.display(), "workspace opened");
        self.workspace = Some(path);
        self.db = Some(conn);
        Ok(())
    }
}

impl RoleSource for AppState {
    fn current_role(&self) -> anyhow::Result<Option<String>> {
        // A stored null is a cleared role and still wins over the startup role.
        if let Some(conn) = self.db.as_ref() {
            if let Some(stored) = db::stored_role(conn)? {
                return Ok(stored);
            }
        }
        Ok(self.role.clone())
    }
}
