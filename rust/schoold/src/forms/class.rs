use super::{EntityForm, FieldSpec, InputType, Section};
use crate::kinds::{EntityKind, FormMode};
use crate::schema::{self, FieldErrors, Payload};
use serde_json::{Map, Value};

const FIELDS: [FieldSpec; 5] = [
    FieldSpec::text("name", "Class name"),
    FieldSpec::input("capacity", "Capacity", InputType::Number),
    FieldSpec::hidden_id(),
    FieldSpec::related("supervisorId", "Supervisor (Optional)", "teachers", Some("No supervisor")),
    FieldSpec::related("gradeId", "Grade", "grades", Some("Select a grade")),
];

static SECTIONS: [Section; 1] = [Section {
    heading: None,
    fields: &FIELDS,
}];

pub struct ClassForm;

impl EntityForm for ClassForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Class
    }

    fn sections(&self) -> &'static [Section] {
        &SECTIONS
    }

    fn parse(&self, _mode: FormMode, raw: &Map<String, Value>) -> Result<Payload, FieldErrors> {
        schema::parse_class(raw).map(Payload::Class)
    }
}
