mod test_support;

use serde_json::{json, Value};
use std::io::BufReader;
use std::process::{ChildStdin, ChildStdout};
use test_support::{request_ok, spawn_sidecar, temp_dir};

struct Sidecar {
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    next: u32,
}

impl Sidecar {
    fn call(&mut self, method: &str, params: Value) -> Value {
        self.next += 1;
        let id = self.next.to_string();
        request_ok(&mut self.stdin, &mut self.reader, &id, method, params)
    }

    fn mount_open(&mut self, params: Value) -> (String, Value) {
        let mounted = self.call("modal.mount", params);
        assert_eq!(mounted["state"], json!("closed"));
        let modal_id = mounted["modalId"].as_str().expect("modalId").to_string();
        let opened = self.call("modal.open", json!({ "modalId": modal_id }));
        (modal_id, opened["view"].clone())
    }

    fn records(&mut self, table: &str) -> Vec<Value> {
        self.call("records.list", json!({ "table": table }))["records"]
            .as_array()
            .cloned()
            .expect("records array")
    }
}

fn field<'a>(view: &'a Value, name: &str) -> &'a Value {
    view["content"]["sections"]
        .as_array()
        .into_iter()
        .flatten()
        .flat_map(|s| s["fields"].as_array().into_iter().flatten())
        .find(|f| f["name"] == json!(name))
        .unwrap_or_else(|| panic!("field {name} in {view}"))
}

#[test]
fn event_create_update_delete_through_the_store() {
    let workspace = temp_dir("schoold-modal-lifecycle");
    let (_child, stdin, reader) = spawn_sidecar();
    let mut sc = Sidecar {
        stdin,
        reader,
        next: 0,
    };
    sc.call(
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    // A class to pick from.
    let (class_modal, _) = sc.mount_open(json!({ "table": "class", "type": "create" }));
    let created = sc.call(
        "modal.submit",
        json!({
            "modalId": class_modal,
            "values": { "name": "1A", "capacity": "30", "gradeId": "1" }
        }),
    );
    assert_eq!(created["status"], json!("succeeded"));
    assert_eq!(created["effects"]["refresh"], json!(1));
    assert_eq!(
        created["effects"]["notices"],
        json!([{ "level": "success", "message": "Class has been created!" }])
    );
    assert_eq!(created["view"], json!({ "state": "closed" }));

    // Selector is filled from stored classes.
    let (event_modal, view) = sc.mount_open(json!({ "table": "event", "type": "create" }));
    assert_eq!(view["content"]["kind"], json!("form"));
    assert_eq!(view["content"]["title"], json!("Create a new event"));
    assert_eq!(
        field(&view, "classId")["options"],
        json!([
            { "value": "", "label": "Select a class" },
            { "value": "1", "label": "1A" }
        ])
    );

    // Missing title: field error, no write.
    let invalid = sc.call(
        "modal.submit",
        json!({
            "modalId": event_modal,
            "values": {
                "title": "",
                "description": "Museum",
                "startTime": "2026-03-03T08:00",
                "endTime": "2026-03-03T16:00",
                "classId": ""
            }
        }),
    );
    assert_eq!(invalid["status"], json!("invalid"));
    assert_eq!(invalid["errors"]["title"]["message"], json!("Required"));
    assert_eq!(invalid["effects"]["refresh"], json!(0));
    assert_eq!(field(&invalid["view"], "title")["error"], json!("Required"));
    assert!(sc.records("event").is_empty());

    let ok = sc.call(
        "modal.submit",
        json!({
            "modalId": event_modal,
            "values": {
                "title": "Trip",
                "description": "Museum",
                "startTime": "2026-03-03T08:00",
                "endTime": "2026-03-03T16:00",
                "classId": ""
            }
        }),
    );
    assert_eq!(ok["status"], json!("succeeded"));
    let events = sc.records("event");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], json!("Trip"));
    assert!(events[0].get("classId").is_none());
    let event_id = events[0]["id"].clone();

    // Update is prefilled from the stored record.
    let (update_modal, view) =
        sc.mount_open(json!({ "table": "event", "type": "update", "id": event_id }));
    assert_eq!(view["content"]["title"], json!("Update the event"));
    assert_eq!(field(&view, "title")["value"], json!("Trip"));
    assert_eq!(field(&view, "startTime")["value"], json!("2026-03-03T08:00"));
    let updated = sc.call(
        "modal.submit",
        json!({
            "modalId": update_modal,
            "values": {
                "title": "Museum trip",
                "description": "Museum",
                "startTime": "2026-03-03T08:00",
                "endTime": "2026-03-03T16:00",
                "classId": "1"
            }
        }),
    );
    assert_eq!(updated["status"], json!("succeeded"));
    assert_eq!(
        updated["effects"]["notices"][0]["message"],
        json!("Event has been updated!")
    );
    let events = sc.records("event");
    assert_eq!(events[0]["title"], json!("Museum trip"));
    assert_eq!(events[0]["classId"], json!(1));

    // Delete asks first, then removes exactly that record.
    let (delete_modal, view) =
        sc.mount_open(json!({ "table": "event", "type": "delete", "id": event_id }));
    assert_eq!(view["content"]["kind"], json!("confirmDelete"));
    assert_eq!(
        view["content"]["message"],
        json!("All data will be lost. Are you sure you want to delete this event?")
    );
    let deleted = sc.call("modal.confirmDelete", json!({ "modalId": delete_modal }));
    assert_eq!(deleted["status"], json!("succeeded"));
    assert_eq!(deleted["effects"]["refresh"], json!(1));
    assert!(sc.records("event").is_empty());
    assert_eq!(sc.records("class").len(), 1);

    let unmounted = sc.call("modal.unmount", json!({ "modalId": delete_modal }));
    assert_eq!(unmounted["unmounted"], json!(delete_modal));
}

#[test]
fn deleting_a_missing_record_fails_and_stays_open() {
    let workspace = temp_dir("schoold-modal-missing");
    let (_child, stdin, reader) = spawn_sidecar();
    let mut sc = Sidecar {
        stdin,
        reader,
        next: 0,
    };
    sc.call(
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let (modal, _) = sc.mount_open(json!({ "table": "lesson", "type": "delete", "id": 41 }));
    let failed = sc.call("modal.confirmDelete", json!({ "modalId": modal }));
    assert_eq!(failed["status"], json!("failed"));
    assert_eq!(failed["effects"]["refresh"], json!(0));
    assert_eq!(
        failed["effects"]["notices"],
        json!([{ "level": "error", "message": "Something went wrong!" }])
    );
    assert_eq!(failed["view"]["state"], json!("open"));
    assert_eq!(
        failed["view"]["content"]["errorMessage"],
        json!("Something went wrong!")
    );
}
