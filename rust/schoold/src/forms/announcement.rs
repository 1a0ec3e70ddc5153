use super::{EntityForm, FieldSpec, InputType, Section};
use crate::kinds::{EntityKind, FormMode};
use crate::schema::{self, FieldErrors, Payload};
use serde_json::{Map, Value};

const FIELDS: [FieldSpec; 5] = [
    FieldSpec::text("title", "Announcement Title"),
    FieldSpec::input("description", "Description", InputType::Textarea),
    FieldSpec::input("date", "Date", InputType::DateTimeLocal),
    FieldSpec::related("classId", "Class (Optional)", "classes", Some("Select a class")),
    FieldSpec::hidden_id(),
];

static SECTIONS: [Section; 1] = [Section {
    heading: None,
    fields: &FIELDS,
}];

pub struct AnnouncementForm;

impl EntityForm for AnnouncementForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Announcement
    }

    fn sections(&self) -> &'static [Section] {
        &SECTIONS
    }

    fn parse(&self, _mode: FormMode, raw: &Map<String, Value>) -> Result<Payload, FieldErrors> {
        schema::parse_announcement(raw).map(Payload::Announcement)
    }
}
