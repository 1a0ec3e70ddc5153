mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, spawn_sidecar};

fn exam_values() -> serde_json::Value {
    json!({
        "title": "Final",
        "startTime": "2026-06-01T09:00",
        "endTime": "2026-06-01T11:00",
        "lessonId": "12"
    })
}

#[test]
fn deferred_submit_hands_out_one_ticket_at_a_time() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let mounted = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "modal.mount",
        json!({
            "table": "exam",
            "type": "create",
            "relatedData": { "lessons": [{ "id": 12, "name": "Algebra", "subject": { "name": "Math" } }] }
        }),
    );
    let modal_id = mounted["modalId"].as_str().expect("modalId").to_string();

    let code = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "modal.submit",
        json!({ "modalId": modal_id, "values": exam_values(), "deferred": true }),
    );
    assert_eq!(code, "modal_closed");

    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "modal.open",
        json!({ "modalId": modal_id }),
    );
    let lesson_options = opened["view"]["content"]["sections"][0]["fields"]
        .as_array()
        .and_then(|fields| fields.iter().find(|f| f["name"] == json!("lessonId")))
        .map(|f| f["options"].clone())
        .expect("lesson selector");
    assert_eq!(lesson_options[1]["label"], json!("Algebra (Math)"));

    let first = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "modal.submit",
        json!({ "modalId": modal_id, "values": exam_values(), "deferred": true }),
    );
    assert_eq!(first["status"], json!("pending"));
    assert_eq!(first["pending"], json!(true));
    assert_eq!(first["mutation"]["action"], json!("create"));
    assert_eq!(first["mutation"]["kind"], json!("exam"));
    assert_eq!(first["mutation"]["payload"]["lessonId"], json!(12));
    assert_eq!(first["view"]["content"]["submitLabel"], json!("Loading..."));
    assert_eq!(first["view"]["content"]["submitDisabled"], json!(true));
    let ticket = first["ticket"].as_str().expect("ticket").to_string();

    let second = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "modal.submit",
        json!({ "modalId": modal_id, "values": exam_values(), "deferred": true }),
    );
    assert_eq!(second["status"], json!("busy"));
    assert!(second.get("ticket").is_none());

    let failed = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "modal.settle",
        json!({ "modalId": modal_id, "ticket": ticket, "success": false }),
    );
    assert_eq!(failed["status"], json!("failed"));
    assert_eq!(failed["effects"]["refresh"], json!(0));
    assert_eq!(
        failed["view"]["content"]["errorMessage"],
        json!("Something went wrong!")
    );
    assert_eq!(failed["view"]["content"]["submitLabel"], json!("Create"));

    let code = request_err(
        &mut stdin,
        &mut reader,
        "7",
        "modal.settle",
        json!({ "modalId": modal_id, "ticket": ticket, "success": true }),
    );
    assert_eq!(code, "unknown_ticket");

    let retry = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "modal.submit",
        json!({ "modalId": modal_id, "values": exam_values(), "deferred": true }),
    );
    assert_eq!(retry["status"], json!("pending"));
    let retry_ticket = retry["ticket"].as_str().expect("ticket").to_string();
    assert_ne!(retry_ticket, ticket);

    let done = request_ok(
        &mut stdin,
        &mut reader,
        "9",
        "modal.settle",
        json!({ "modalId": modal_id, "ticket": retry_ticket, "success": true }),
    );
    assert_eq!(done["status"], json!("succeeded"));
    assert_eq!(done["effects"]["refresh"], json!(1));
    assert_eq!(
        done["effects"]["notices"][0]["message"],
        json!("Exam has been created!")
    );
    assert_eq!(done["view"], json!({ "state": "closed" }));
}

#[test]
fn settle_after_dismiss_is_ignored() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let mounted = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "modal.mount",
        json!({ "table": "exam", "type": "create" }),
    );
    let modal_id = mounted["modalId"].as_str().expect("modalId").to_string();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "modal.open",
        json!({ "modalId": modal_id }),
    );
    let pending = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "modal.submit",
        json!({ "modalId": modal_id, "values": exam_values(), "deferred": true }),
    );
    let ticket = pending["ticket"].as_str().expect("ticket").to_string();

    let dismissed = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "modal.dismiss",
        json!({ "modalId": modal_id }),
    );
    assert_eq!(dismissed["view"], json!({ "state": "closed" }));
    assert_eq!(dismissed["open"], json!(false));
    assert_eq!(dismissed["pending"], json!(false));

    let late = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "modal.settle",
        json!({ "modalId": modal_id, "ticket": ticket, "success": true }),
    );
    assert_eq!(late["status"], json!("ignored"));
    assert_eq!(late["effects"], json!({ "refresh": 0, "notices": [] }));
    assert_eq!(late["view"], json!({ "state": "closed" }));
}

#[test]
fn placeholder_and_missing_record_views() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let mounted = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "modal.mount",
        json!({ "table": "parent", "type": "create" }),
    );
    let parent_modal = mounted["modalId"].as_str().expect("modalId").to_string();
    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "modal.open",
        json!({ "modalId": parent_modal }),
    );
    assert_eq!(
        opened["view"]["content"],
        json!({
            "kind": "notImplemented",
            "title": "Add New Parent",
            "message": "Add form for \"parent\" is not yet implemented.",
            "hint": "Please contact the development team to add this form."
        })
    );
    let code = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "modal.submit",
        json!({ "modalId": parent_modal, "values": {}, "deferred": true }),
    );
    assert_eq!(code, "bad_state");

    let mounted = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "modal.mount",
        json!({ "table": "class", "type": "delete" }),
    );
    let delete_modal = mounted["modalId"].as_str().expect("modalId").to_string();
    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "modal.open",
        json!({ "modalId": delete_modal }),
    );
    assert_eq!(
        opened["view"]["content"],
        json!({ "kind": "notFound", "message": "Form not found!" })
    );

    // Immediate mode needs the record store.
    let mounted = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "modal.mount",
        json!({ "table": "exam", "type": "create" }),
    );
    let exam_modal = mounted["modalId"].as_str().expect("modalId").to_string();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "modal.open",
        json!({ "modalId": exam_modal }),
    );
    let code = request_err(
        &mut stdin,
        &mut reader,
        "8",
        "modal.submit",
        json!({ "modalId": exam_modal, "values": exam_values() }),
    );
    assert_eq!(code, "no_workspace");
    let view = request_ok(
        &mut stdin,
        &mut reader,
        "9",
        "modal.view",
        json!({ "modalId": exam_modal }),
    );
    assert_eq!(view["view"]["content"]["submitDisabled"], json!(false));
    assert_eq!(view["entity"], json!("exam"));
    assert_eq!(view["mode"], json!("create"));
    assert_eq!(view["open"], json!(true));
}
