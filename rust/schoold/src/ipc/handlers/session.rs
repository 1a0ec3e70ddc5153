use crate::db;
use crate::ipc::helpers::{reply, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::session::{current_role, visible_menu, Role};
use serde_json::{json, Value};

fn role_get(state: &AppState) -> Result<Value, HandlerErr> {
    Ok(json!({ "role": current_role(state) }))
}

fn role_set(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let role = match params.get("role") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(
            Role::parse(s).ok_or_else(|| HandlerErr::bad_params(format!("unknown role: {s}")))?,
        ),
        Some(_) => return Err(HandlerErr::bad_params("role must be a string or null")),
    };
    let raw = role.map(|r| json!(r)).unwrap_or(Value::Null);
    if let Some(conn) = state.db.as_ref() {
        db::settings_set_json(conn, db::ROLE_KEY, &raw)?;
    }
    state.role = raw.as_str().map(str::to_string);
    Ok(json!({ "role": role }))
}

fn nav_menu(state: &AppState) -> Result<Value, HandlerErr> {
    let role = current_role(state);
    Ok(json!({
        "role": role,
        "sections": visible_menu(role),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "session.role.get" => role_get(state),
        "session.role.set" => role_set(state, &req.params),
        "nav.menu" => nav_menu(state),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
