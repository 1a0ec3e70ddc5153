use super::teacher::{ACCOUNT_FIELDS, SEX_OPTIONS};
use super::{EntityForm, FieldSpec, InputType, Section};
use crate::kinds::{EntityKind, FormMode};
use crate::schema::{self, FieldErrors, Payload};
use serde_json::{Map, Value};

const PERSONAL_FIELDS: [FieldSpec; 11] = [
    FieldSpec::text("name", "First Name"),
    FieldSpec::text("surname", "Last Name"),
    FieldSpec::text("phone", "Phone"),
    FieldSpec::text("address", "Address"),
    FieldSpec::text("bloodType", "Blood Type"),
    FieldSpec::input("birthday", "Birthday", InputType::Date),
    FieldSpec::related("parentId", "Parent", "parents", Some("Select a parent")),
    FieldSpec::hidden_id(),
    FieldSpec::fixed("sex", "Sex", &SEX_OPTIONS, None),
    FieldSpec::related("gradeId", "Grade", "grades", Some("Select a grade")),
    FieldSpec::related("classId", "Class", "classes", Some("Select a class")),
];

static SECTIONS: [Section; 2] = [
    Section {
        heading: Some("Authentication Information"),
        fields: &ACCOUNT_FIELDS,
    },
    Section {
        heading: Some("Personal Information"),
        fields: &PERSONAL_FIELDS,
    },
];

pub struct StudentForm;

impl EntityForm for StudentForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Student
    }

    fn sections(&self) -> &'static [Section] {
        &SECTIONS
    }

    fn parse(&self, mode: FormMode, raw: &Map<String, Value>) -> Result<Payload, FieldErrors> {
        schema::parse_student(raw, mode).map(Payload::Student)
    }
}
