use super::{EntityForm, FieldSpec, InputType, Section};
use crate::kinds::{EntityKind, FormMode};
use crate::schema::{self, FieldErrors, Payload};
use serde_json::{Map, Value};

const FIELDS: [FieldSpec; 5] = [
    FieldSpec::text("title", "Exam title"),
    FieldSpec::input("startTime", "Start Date", InputType::DateTimeLocal),
    FieldSpec::input("endTime", "End Date", InputType::DateTimeLocal),
    FieldSpec::hidden_id(),
    FieldSpec::related("lessonId", "Lesson", "lessons", Some("Select a lesson")),
];

static SECTIONS: [Section; 1] = [Section {
    heading: None,
    fields: &FIELDS,
}];

pub struct ExamForm;

impl EntityForm for ExamForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Exam
    }

    fn sections(&self) -> &'static [Section] {
        &SECTIONS
    }

    fn parse(&self, _mode: FormMode, raw: &Map<String, Value>) -> Result<Payload, FieldErrors> {
        schema::parse_exam(raw).map(Payload::Exam)
    }
}
