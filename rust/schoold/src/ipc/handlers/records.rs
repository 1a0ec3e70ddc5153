use crate::db;
use crate::ipc::helpers::{db_conn, reply, required_kind, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::{json, Value};

fn records_list(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let kind = required_kind(params)?;
    let conn = db_conn(&state.db)?;
    let rows = db::list_records(conn, kind)?;
    let records: Vec<Value> = rows
        .into_iter()
        .map(|(id, mut payload)| {
            if let Some(obj) = payload.as_object_mut() {
                obj.insert("id".to_string(), id.to_json());
            }
            payload
        })
        .collect();
    Ok(json!({ "table": kind, "records": records }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "records.list" => Some(reply(&req.id, records_list(state, &req.params))),
        _ => None,
    }
}
