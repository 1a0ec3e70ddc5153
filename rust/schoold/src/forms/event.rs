use super::{EntityForm, FieldSpec, InputType, Section};
use crate::kinds::{EntityKind, FormMode};
use crate::schema::{self, FieldErrors, Payload};
use serde_json::{Map, Value};

const FIELDS: [FieldSpec; 6] = [
    FieldSpec::text("title", "Event Title"),
    FieldSpec::input("description", "Description", InputType::Textarea),
    FieldSpec::input("startTime", "Start Time", InputType::DateTimeLocal),
    FieldSpec::input("endTime", "End Time", InputType::DateTimeLocal),
    FieldSpec::related("classId", "Class (Optional)", "classes", Some("Select a class")),
    FieldSpec::hidden_id(),
];

static SECTIONS: [Section; 1] = [Section {
    heading: None,
    fields: &FIELDS,
}];

pub struct EventForm;

impl EntityForm for EventForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Event
    }

    fn sections(&self) -> &'static [Section] {
        &SECTIONS
    }

    fn parse(&self, _mode: FormMode, raw: &Map<String, Value>) -> Result<Payload, FieldErrors> {
        schema::parse_event(raw).map(Payload::Event)
    }
}
