use crate::calendar::{calendar_view, EventItem};
use crate::db;
use crate::ipc::helpers::{db_conn, reply, to_json, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::kinds::EntityKind;
use serde_json::Value;

fn calendar(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let date = match params.get("date") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => return Err(HandlerErr::bad_params("date must be a string")),
    };
    let conn = db_conn(&state.db)?;
    let events = db::list_records(conn, EntityKind::Event)?
        .into_iter()
        .filter_map(|(id, payload)| EventItem::from_record(id, &payload))
        .collect();
    let today = chrono::Local::now().date_naive();
    to_json(&calendar_view(date, today, events))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "calendar.view" => Some(reply(&req.id, calendar(state, &req.params))),
        _ => None,
    }
}
