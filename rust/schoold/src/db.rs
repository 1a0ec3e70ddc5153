use crate::actions::{ActionResult, MutationActions, RelatedDataProvider, RoleSource};
use crate::forms::related_keys;
use crate::kinds::{EntityKind, RecordId};
use crate::related::{item_label, list_kind, RelatedData, RelatedItem};
use crate::schema::Payload;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("schoold.sqlite3");
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS records(
            kind TEXT NOT NULL,
            id TEXT NOT NULL,
            payload TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY(kind, id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings(
            key TEXT PRIMARY KEY,
            value_json TEXT NOT NULL
        )",
        [],
    )?;

    Ok(conn)
}

fn now_ts() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

/// Passwords belong to the account provider and are never written here.
fn stored_payload(payload: &Value) -> String {
    let mut payload = payload.clone();
    if let Some(obj) = payload.as_object_mut() {
        obj.remove("password");
    }
    payload.to_string()
}

fn next_int_id(conn: &Connection, kind: EntityKind) -> anyhow::Result<i64> {
    let max: Option<i64> = conn.query_row(
        "SELECT MAX(CAST(id AS INTEGER)) FROM records WHERE kind = ?",
        [kind.as_str()],
        |r| r.get(0),
    )?;
    Ok(max.unwrap_or(0) + 1)
}

pub fn insert_record(conn: &Connection, kind: EntityKind, payload: &Value) -> anyhow::Result<RecordId> {
    let id = if kind.uses_string_ids() {
        RecordId::Str(Uuid::new_v4().to_string())
    } else {
        RecordId::Int(next_int_id(conn, kind)?)
    };
    let ts = now_ts();
    conn.execute(
        "INSERT INTO records(kind, id, payload, created_at, updated_at) VALUES(?, ?, ?, ?, ?)",
        (kind.as_str(), id.to_string(), stored_payload(payload), &ts, &ts),
    )?;
    Ok(id)
}

pub fn update_record(
    conn: &Connection,
    kind: EntityKind,
    id: &RecordId,
    payload: &Value,
) -> anyhow::Result<bool> {
    let changed = conn.execute(
        "UPDATE records SET payload = ?, updated_at = ? WHERE kind = ? AND id = ?",
        (stored_payload(payload), now_ts(), kind.as_str(), id.to_string()),
    )?;
    Ok(changed > 0)
}

pub fn delete_record(conn: &Connection, kind: EntityKind, id: &RecordId) -> anyhow::Result<bool> {
    let changed = conn.execute(
        "DELETE FROM records WHERE kind = ? AND id = ?",
        (kind.as_str(), id.to_string()),
    )?;
    Ok(changed > 0)
}

pub fn get_record(conn: &Connection, kind: EntityKind, id: &RecordId) -> anyhow::Result<Option<Value>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT payload FROM records WHERE kind = ? AND id = ?",
            (kind.as_str(), id.to_string()),
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(s) => Ok(Some(serde_json::from_str(&s)?)),
        None => Ok(None),
    }
}

pub fn list_records(conn: &Connection, kind: EntityKind) -> anyhow::Result<Vec<(RecordId, Value)>> {
    let mut stmt =
        conn.prepare("SELECT id, payload FROM records WHERE kind = ? ORDER BY created_at, rowid")?;
    let rows = stmt
        .query_map([kind.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = Vec::with_capacity(rows.len());
    for (id, payload) in rows {
        let Some(id) = RecordId::for_kind(kind, &Value::String(id)) else {
            continue;
        };
        out.push((id, serde_json::from_str(&payload)?));
    }
    Ok(out)
}

pub fn settings_get_json(conn: &Connection, key: &str) -> anyhow::Result<Option<Value>> {
    let raw: Option<String> = conn
        .query_row("SELECT value_json FROM settings WHERE key = ?", [key], |r| {
            r.get(0)
        })
        .optional()?;
    match raw {
        Some(s) => Ok(Some(serde_json::from_str(&s)?)),
        None => Ok(None),
    }
}

pub fn settings_set_json(conn: &Connection, key: &str, value: &Value) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value_json) VALUES(?, ?)
         ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json",
        (key, value.to_string()),
    )?;
    Ok(())
}

pub const ROLE_KEY: &str = "session.role";
pub const GRADES_KEY: &str = "related.grades";

/// The role saved in the workspace. `Some(None)` is a role that was cleared;
/// `None` means nothing was ever stored.
pub fn stored_role(conn: &Connection) -> anyhow::Result<Option<Option<String>>> {
    Ok(settings_get_json(conn, ROLE_KEY)?.map(|v| v.as_str().map(str::to_string)))
}

/// Record-store backing for the form core's collaborators.
pub struct Store<'a> {
    conn: &'a Connection,
}

impl<'a> Store<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn report(&self, what: &str, kind: EntityKind, res: anyhow::Result<bool>) -> ActionResult {
        match res {
            Ok(true) => ActionResult::ok(),
            Ok(false) => {
                tracing::warn!(%kind, what, "record not found");
                ActionResult::failed()
            }
            Err(e) => {
                tracing::warn!(%kind, what, error = %e, "record store failed");
                ActionResult::failed()
            }
        }
    }

    fn grades(&self) -> Vec<RelatedItem> {
        let configured = settings_get_json(self.conn, GRADES_KEY)
            .ok()
            .flatten()
            .and_then(|v| RelatedData::from_json(&serde_json::json!({ "grades": v })).ok())
            .and_then(|d| d.get("grades").map(<[RelatedItem]>::to_vec));
        configured.unwrap_or_else(|| {
            (1..=12)
                .map(|level| RelatedItem {
                    id: RecordId::Int(level),
                    label: level.to_string(),
                })
                .collect()
        })
    }
}

impl MutationActions for Store<'_> {
    fn create(&mut self, kind: EntityKind, payload: &Payload) -> ActionResult {
        let res = insert_record(self.conn, kind, &payload.to_json()).map(|id| {
            tracing::info!(%kind, %id, "record created");
            true
        });
        self.report("create", kind, res)
    }

    fn update(&mut self, kind: EntityKind, id: &RecordId, payload: &Payload) -> ActionResult {
        let res = update_record(self.conn, kind, id, &payload.to_json());
        self.report("update", kind, res)
    }

    fn delete(&mut self, kind: EntityKind, id: &RecordId) -> ActionResult {
        let res = delete_record(self.conn, kind, id);
        self.report("delete", kind, res)
    }
}

impl RelatedDataProvider for Store<'_> {
    fn related_data(&self, kind: EntityKind) -> RelatedData {
        let mut data = RelatedData::default();
        for key in related_keys(kind) {
            if key == "grades" {
                data.insert(key, self.grades());
                continue;
            }
            let Some(list) = list_kind(key) else {
                continue;
            };
            match list_records(self.conn, list) {
                Ok(rows) => data.insert(
                    key,
                    rows.into_iter()
                        .map(|(id, payload)| RelatedItem {
                            label: item_label(&payload).unwrap_or_else(|| id.to_string()),
                            id,
                        })
                        .collect(),
                ),
                Err(e) => tracing::warn!(key, error = %e, "could not load related list"),
            }
        }
        data
    }
}

impl RoleSource for Store<'_> {
    fn current_role(&self) -> anyhow::Result<Option<String>> {
        Ok(stored_role(self.conn)?.flatten())
    }
}
