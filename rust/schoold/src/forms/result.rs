use super::{EntityForm, FieldSpec, InputType, Section};
use crate::kinds::{EntityKind, FormMode};
use crate::schema::{self, FieldErrors, Payload};
use serde_json::{Map, Value};

const FIELDS: [FieldSpec; 5] = [
    FieldSpec::input("score", "Score", InputType::Number),
    FieldSpec::related("studentId", "Student", "students", Some("Select a student")),
    FieldSpec::related("examId", "Exam", "exams", Some("Select an exam")),
    FieldSpec::related(
        "assignmentId",
        "Assignment (Optional)",
        "assignments",
        Some("Select an assignment"),
    ),
    FieldSpec::hidden_id(),
];

static SECTIONS: [Section; 1] = [Section {
    heading: None,
    fields: &FIELDS,
}];

pub struct ResultForm;

impl EntityForm for ResultForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Result
    }

    fn sections(&self) -> &'static [Section] {
        &SECTIONS
    }

    fn parse(&self, _mode: FormMode, raw: &Map<String, Value>) -> Result<Payload, FieldErrors> {
        schema::parse_result(raw).map(Payload::Result)
    }
}
