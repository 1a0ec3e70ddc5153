use crate::actions::{ActionResult, EffectLog, RelatedDataProvider};
use crate::db::{self, Store};
use crate::ipc::helpers::{
    db_conn, optional_bool, reply, required_kind, required_str, to_json, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::kinds::{EntityKind, FormMode, RecordId};
use crate::modal::{FormModal, Outcome};
use crate::related::RelatedData;
use crate::session::{can_manage, current_role};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

fn find<'a>(
    modals: &'a mut HashMap<String, FormModal>,
    params: &Value,
) -> Result<&'a mut FormModal, HandlerErr> {
    let id = required_str(params, "modalId")?;
    modals
        .get_mut(id)
        .ok_or_else(|| HandlerErr::new("not_found", format!("no mounted modal {id}")))
}

fn record_id_param(params: &Value, kind: EntityKind) -> Result<Option<RecordId>, HandlerErr> {
    match params.get("id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => RecordId::for_kind(kind, v)
            .map(Some)
            .ok_or_else(|| HandlerErr::bad_params(format!("invalid id for {kind}"))),
    }
}

fn mount(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let kind = required_kind(params)?;
    let mode_raw = required_str(params, "type")?;
    let mode = FormMode::parse(mode_raw)
        .ok_or_else(|| HandlerErr::bad_params(format!("unknown type: {mode_raw}")))?;
    let record_id = record_id_param(params, kind)?;

    let existing = match params.get("data") {
        None | Some(Value::Null) => match (mode, record_id.as_ref(), state.db.as_ref()) {
            (FormMode::Update, Some(id), Some(conn)) => db::get_record(conn, kind, id)?
                .and_then(|v| v.as_object().cloned()),
            _ => None,
        },
        Some(Value::Object(m)) => Some(m.clone()),
        Some(_) => return Err(HandlerErr::bad_params("data must be an object")),
    };

    let related = match params.get("relatedData") {
        None | Some(Value::Null) => state
            .db
            .as_ref()
            .map(|conn| Store::new(conn).related_data(kind))
            .unwrap_or_default(),
        Some(v) => RelatedData::from_json(v).map_err(HandlerErr::bad_params)?,
    };

    let allowed = can_manage(current_role(&*state), kind);
    let modal_id = Uuid::new_v4().to_string();
    state.modals.insert(
        modal_id.clone(),
        FormModal::new(kind, mode, record_id, existing, related),
    );
    tracing::info!(%kind, mode = mode.as_str(), modal = %modal_id, "modal mounted");

    Ok(json!({
        "modalId": modal_id,
        "entity": kind,
        "mode": mode,
        "state": "closed",
        "allowed": allowed,
    }))
}

fn describe(modal: &FormModal) -> Result<Value, HandlerErr> {
    Ok(json!({
        "entity": modal.kind(),
        "mode": modal.mode(),
        "open": modal.is_open(),
        "pending": modal.pending(),
        "view": to_json(&modal.view())?,
    }))
}

fn outcome_result(outcome: Outcome, effects: EffectLog, modal: &FormModal) -> Result<Value, HandlerErr> {
    let mut out = to_json(&outcome)?;
    out["effects"] = to_json(&effects)?;
    out["view"] = to_json(&modal.view())?;
    out["pending"] = json!(modal.pending());
    Ok(out)
}

fn values_param(params: &Value) -> Result<Map<String, Value>, HandlerErr> {
    match params.get("values") {
        Some(Value::Object(m)) => Ok(m.clone()),
        Some(_) => Err(HandlerErr::bad_params("values must be an object")),
        None => Err(HandlerErr::bad_params("missing values")),
    }
}

fn submit(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let values = values_param(params)?;
    let deferred = optional_bool(params, "deferred")?;
    if deferred {
        let modal = find(&mut state.modals, params)?;
        let outcome = modal.begin_submit(values)?;
        return outcome_result(outcome, EffectLog::default(), modal);
    }

    let conn = db_conn(&state.db)?;
    let modal = find(&mut state.modals, params)?;
    let mut effects = EffectLog::default();
    let outcome = modal.submit(values, &mut Store::new(conn), &mut effects)?;
    outcome_result(outcome, effects, modal)
}

fn confirm_delete(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let deferred = optional_bool(params, "deferred")?;
    if deferred {
        let modal = find(&mut state.modals, params)?;
        let outcome = modal.begin_delete()?;
        return outcome_result(outcome, EffectLog::default(), modal);
    }

    let conn = db_conn(&state.db)?;
    let modal = find(&mut state.modals, params)?;
    let mut effects = EffectLog::default();
    let outcome = modal.confirm_delete(&mut Store::new(conn), &mut effects)?;
    outcome_result(outcome, effects, modal)
}

fn settle(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let ticket = required_str(params, "ticket")?;
    let result = match params.get("success") {
        Some(Value::Bool(true)) => ActionResult::ok(),
        Some(Value::Bool(false)) => ActionResult::failed(),
        _ => return Err(HandlerErr::bad_params("success must be a boolean")),
    };
    let modal = find(&mut state.modals, params)?;
    let mut effects = EffectLog::default();
    let outcome = modal.settle(ticket, result, &mut effects)?;
    outcome_result(outcome, effects, modal)
}

fn open(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let modal = find(&mut state.modals, params)?;
    modal.open();
    describe(modal)
}

fn view(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let modal = find(&mut state.modals, params)?;
    describe(modal)
}

fn dismiss(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let modal = find(&mut state.modals, params)?;
    modal.dismiss();
    describe(modal)
}

fn unmount(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let id = required_str(params, "modalId")?;
    match state.modals.remove(id) {
        Some(_) => Ok(json!({ "unmounted": id })),
        None => Err(HandlerErr::new("not_found", format!("no mounted modal {id}"))),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "modal.mount" => mount(state, &req.params),
        "modal.open" => open(state, &req.params),
        "modal.view" => view(state, &req.params),
        "modal.dismiss" => dismiss(state, &req.params),
        "modal.submit" => submit(state, &req.params),
        "modal.confirmDelete" => confirm_delete(state, &req.params),
        "modal.settle" => settle(state, &req.params),
        "modal.unmount" => unmount(state, &req.params),
        _ => return None,
    };
    Some(reply(&req.id, result))
}
