use super::{EntityForm, FieldSpec, InputType, Section};
use crate::kinds::{EntityKind, FormMode};
use crate::schema::{self, FieldErrors, Payload};
use serde_json::{Map, Value};

const FIELDS: [FieldSpec; 5] = [
    FieldSpec::text("title", "Assignment Title"),
    FieldSpec::input("startDate", "Start Date", InputType::DateTimeLocal),
    FieldSpec::input("dueDate", "Due Date", InputType::DateTimeLocal),
    FieldSpec::related("lessonId", "Lesson", "lessons", Some("Select a lesson")),
    FieldSpec::hidden_id(),
];

static SECTIONS: [Section; 1] = [Section {
    heading: None,
    fields: &FIELDS,
}];

pub struct AssignmentForm;

impl EntityForm for AssignmentForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Assignment
    }

    fn sections(&self) -> &'static [Section] {
        &SECTIONS
    }

    fn parse(&self, _mode: FormMode, raw: &Map<String, Value>) -> Result<Payload, FieldErrors> {
        schema::parse_assignment(raw).map(Payload::Assignment)
    }
}
