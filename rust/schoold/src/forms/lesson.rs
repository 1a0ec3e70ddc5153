use super::{EntityForm, FieldSpec, InputType, Section};
use crate::kinds::{EntityKind, FormMode};
use crate::schema::{self, FieldErrors, Payload};
use serde_json::{Map, Value};

const DAY_OPTIONS: [(&str, &str); 5] = [
    ("MONDAY", "Monday"),
    ("TUESDAY", "Tuesday"),
    ("WEDNESDAY", "Wednesday"),
    ("THURSDAY", "Thursday"),
    ("FRIDAY", "Friday"),
];

const FIELDS: [FieldSpec; 8] = [
    FieldSpec::text("name", "Lesson Name"),
    FieldSpec::fixed("day", "Day", &DAY_OPTIONS, Some("Select a day")),
    FieldSpec::input("startTime", "Start Time", InputType::DateTimeLocal),
    FieldSpec::input("endTime", "End Time", InputType::DateTimeLocal),
    FieldSpec::related("subjectId", "Subject", "subjects", Some("Select a subject")),
    FieldSpec::related("classId", "Class", "classes", Some("Select a class")),
    FieldSpec::related("teacherId", "Teacher", "teachers", Some("Select a teacher")),
    FieldSpec::hidden_id(),
];

static SECTIONS: [Section; 1] = [Section {
    heading: None,
    fields: &FIELDS,
}];

pub struct LessonForm;

impl EntityForm for LessonForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Lesson
    }

    fn sections(&self) -> &'static [Section] {
        &SECTIONS
    }

    fn parse(&self, _mode: FormMode, raw: &Map<String, Value>) -> Result<Payload, FieldErrors> {
        schema::parse_lesson(raw).map(Payload::Lesson)
    }
}
