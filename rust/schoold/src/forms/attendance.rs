use super::{EntityForm, FieldSpec, InputType, Section};
use crate::kinds::{EntityKind, FormMode};
use crate::schema::{self, FieldErrors, Payload};
use serde_json::{Map, Value};

const PRESENT_OPTIONS: [(&str, &str); 2] = [("true", "Present"), ("false", "Absent")];

const FIELDS: [FieldSpec; 5] = [
    FieldSpec::input("date", "Date", InputType::DateTimeLocal),
    FieldSpec::fixed("present", "Attendance", &PRESENT_OPTIONS, Some("Select attendance")),
    FieldSpec::related("studentId", "Student", "students", Some("Select a student")),
    FieldSpec::related("lessonId", "Lesson", "lessons", Some("Select a lesson")),
    FieldSpec::hidden_id(),
];

static SECTIONS: [Section; 1] = [Section {
    heading: None,
    fields: &FIELDS,
}];

pub struct AttendanceForm;

impl EntityForm for AttendanceForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Attendance
    }

    fn sections(&self) -> &'static [Section] {
        &SECTIONS
    }

    fn parse(&self, _mode: FormMode, raw: &Map<String, Value>) -> Result<Payload, FieldErrors> {
        schema::parse_attendance(raw).map(Payload::Attendance)
    }

    fn title(&self, mode: FormMode) -> String {
        match mode {
            FormMode::Update => "Update the attendance record".to_string(),
            _ => "Create a new attendance record".to_string(),
        }
    }
}
