use super::{EntityForm, FieldSpec, InputType, Section};
use crate::kinds::{EntityKind, FormMode};
use crate::schema::{self, FieldErrors, Payload};
use serde_json::{Map, Value};

pub(super) const SEX_OPTIONS: [(&str, &str); 2] = [("MALE", "Male"), ("FEMALE", "Female")];

pub(super) const ACCOUNT_FIELDS: [FieldSpec; 3] = [
    FieldSpec::text("username", "Username"),
    FieldSpec::text("email", "Email"),
    FieldSpec::input("password", "Password", InputType::Password),
];

const PERSONAL_FIELDS: [FieldSpec; 9] = [
    FieldSpec::text("name", "First Name"),
    FieldSpec::text("surname", "Last Name"),
    FieldSpec::text("phone", "Phone"),
    FieldSpec::text("address", "Address"),
    FieldSpec::text("bloodType", "Blood Type"),
    FieldSpec::input("birthday", "Birthday", InputType::Date),
    FieldSpec::hidden_id(),
    FieldSpec::fixed("sex", "Sex", &SEX_OPTIONS, None),
    FieldSpec::related("subjects", "Subjects", "subjects", None).multiple(),
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

pub struct TeacherForm;

impl EntityForm for TeacherForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Teacher
    }

    fn sections(&self) -> &'static [Section] {
        &SECTIONS
    }

    fn parse(&self, mode: FormMode, raw: &Map<String, Value>) -> Result<Payload, FieldErrors> {
        schema::parse_teacher(raw, mode).map(Payload::Teacher)
    }
}
