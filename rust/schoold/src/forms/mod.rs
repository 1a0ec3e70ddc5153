//! Entity forms: field layout, selectors and the schema each one submits through.

mod announcement;
mod assignment;
mod attendance;
mod class;
mod event;
mod exam;
mod lesson;
mod result;
mod student;
mod teacher;

use crate::kinds::{EntityKind, FormMode};
use crate::related::RelatedData;
use crate::schema::{parse_date, parse_datetime, FieldErrors, Payload};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputType {
    Text,
    Password,
    Textarea,
    Number,
    Date,
    #[serde(rename = "datetime-local")]
    DateTimeLocal,
    Hidden,
    Select,
}

#[derive(Debug, Clone, Copy)]
pub enum Choices {
    None,
    /// Fixed enumeration: `(value, label)` pairs.
    Fixed(&'static [(&'static str, &'static str)]),
    /// Populated from a related-data list.
    Related(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputType,
    pub choices: Choices,
    /// Leading empty option, e.g. "Select a class".
    pub placeholder: Option<&'static str>,
    pub multiple: bool,
    pub update_only: bool,
}

impl FieldSpec {
    pub const fn input(name: &'static str, label: &'static str, input: InputType) -> Self {
        Self {
            name,
            label,
            input,
            choices: Choices::None,
            placeholder: None,
            multiple: false,
            update_only: false,
        }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::input(name, label, InputType::Text)
    }

    pub const fn fixed(
        name: &'static str,
        label: &'static str,
        choices: &'static [(&'static str, &'static str)],
        placeholder: Option<&'static str>,
    ) -> Self {
        Self {
            choices: Choices::Fixed(choices),
            placeholder,
            ..Self::input(name, label, InputType::Select)
        }
    }

    pub const fn related(
        name: &'static str,
        label: &'static str,
        list: &'static str,
        placeholder: Option<&'static str>,
    ) -> Self {
        Self {
            choices: Choices::Related(list),
            placeholder,
            ..Self::input(name, label, InputType::Select)
        }
    }

    pub const fn multiple(self) -> Self {
        Self {
            multiple: true,
            ..self
        }
    }

    /// Hidden record id carried through update forms.
    pub const fn hidden_id() -> Self {
        Self {
            update_only: true,
            ..Self::input("id", "Id", InputType::Hidden)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub heading: Option<&'static str>,
    pub fields: &'static [FieldSpec],
}

pub trait EntityForm: Sync {
    fn kind(&self) -> EntityKind;

    fn sections(&self) -> &'static [Section];

    fn parse(&self, mode: FormMode, raw: &Map<String, Value>) -> Result<Payload, FieldErrors>;

    fn title(&self, mode: FormMode) -> String {
        match mode {
            FormMode::Update => format!("Update the {}", self.kind()),
            _ => format!("Create a new {}", self.kind()),
        }
    }
}

/// Form registered for `kind`; `None` means the modal shows its placeholder.
pub fn form_for(kind: EntityKind) -> Option<&'static dyn EntityForm> {
    match kind {
        EntityKind::Teacher => Some(&teacher::TeacherForm),
        EntityKind::Student => Some(&student::StudentForm),
        EntityKind::Class => Some(&class::ClassForm),
        EntityKind::Lesson => Some(&lesson::LessonForm),
        EntityKind::Exam => Some(&exam::ExamForm),
        EntityKind::Assignment => Some(&assignment::AssignmentForm),
        EntityKind::Result => Some(&result::ResultForm),
        EntityKind::Attendance => Some(&attendance::AttendanceForm),
        EntityKind::Event => Some(&event::EventForm),
        EntityKind::Announcement => Some(&announcement::AnnouncementForm),
        EntityKind::Parent | EntityKind::Subject => None,
    }
}

/// Reference lists a kind's selectors read from.
pub fn related_keys(kind: EntityKind) -> Vec<&'static str> {
    let Some(form) = form_for(kind) else {
        return Vec::new();
    };
    let mut keys = Vec::new();
    for section in form.sections() {
        for field in section.fields {
            if let Choices::Related(key) = field.choices {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
    }
    keys
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
}

/// One labeled input as the front end draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputType,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionView>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub multiple: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<&'static str>,
    pub fields: Vec<FieldView>,
}

pub fn render_sections(
    form: &dyn EntityForm,
    mode: FormMode,
    values: &Map<String, Value>,
    errors: &FieldErrors,
    related: &RelatedData,
) -> Vec<SectionView> {
    form.sections()
        .iter()
        .map(|section| SectionView {
            heading: section.heading,
            fields: section
                .fields
                .iter()
                .filter(|f| !f.update_only || mode == FormMode::Update)
                .map(|f| render_field(f, values, errors, related))
                .collect(),
        })
        .collect()
}

fn render_field(
    spec: &FieldSpec,
    values: &Map<String, Value>,
    errors: &FieldErrors,
    related: &RelatedData,
) -> FieldView {
    let mut options = Vec::new();
    if let Some(placeholder) = spec.placeholder {
        options.push(OptionView {
            value: String::new(),
            label: placeholder.to_string(),
        });
    }
    match spec.choices {
        Choices::None => {}
        Choices::Fixed(pairs) => options.extend(pairs.iter().map(|(value, label)| OptionView {
            value: value.to_string(),
            label: label.to_string(),
        })),
        Choices::Related(key) => options.extend(related.get(key).unwrap_or_default().iter().map(
            |item| OptionView {
                value: item.id.to_string(),
                label: item.label.clone(),
            },
        )),
    }
    FieldView {
        name: spec.name,
        label: spec.label,
        input: spec.input,
        value: display_value(spec, values.get(spec.name)),
        error: errors.get(spec.name).map(|e| e.message.clone()),
        options,
        multiple: spec.multiple,
    }
}

/// Shapes a stored or submitted value the way the input expects it.
fn display_value(spec: &FieldSpec, v: Option<&Value>) -> Value {
    let Some(v) = v.filter(|v| !v.is_null()) else {
        return if spec.multiple {
            Value::Array(Vec::new())
        } else {
            Value::String(String::new())
        };
    };
    match (spec.input, v) {
        (InputType::Date, Value::String(s)) => parse_date(s)
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or_else(|| v.clone()),
        (InputType::DateTimeLocal, Value::String(s)) => parse_datetime(s)
            .map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M").to_string()))
            .unwrap_or_else(|| v.clone()),
        (InputType::Select, Value::Array(items)) => {
            Value::Array(items.iter().map(|i| Value::String(scalar_text(i))).collect())
        }
        (InputType::Select | InputType::Hidden, other) => Value::String(scalar_text(other)),
        _ => v.clone(),
    }
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parent_and_subject_have_no_form() {
        for kind in EntityKind::ALL {
            let registered = form_for(kind).is_some();
            let expected = !matches!(kind, EntityKind::Parent | EntityKind::Subject);
            assert_eq!(registered, expected, "{kind}");
            if let Some(form) = form_for(kind) {
                assert_eq!(form.kind(), kind);
            }
        }
    }

    #[test]
    fn every_layout_field_is_read_by_its_schema() {
        // A value for every visible field except the hidden id must clear that
        // field's error: layout and schema name the same fields.
        for kind in EntityKind::ALL {
            let Some(form) = form_for(kind) else { continue };
            let empty = Map::new();
            let errors = match form.parse(FormMode::Create, &empty) {
                Ok(_) => FieldErrors::default(),
                Err(e) => e,
            };
            for field in errors.fields() {
                let in_layout = form
                    .sections()
                    .iter()
                    .flat_map(|s| s.fields.iter())
                    .any(|f| f.name == field);
                assert!(in_layout, "{kind}: schema field {field} has no input");
            }
        }
    }

    #[test]
    fn related_keys_are_collected_once() {
        assert_eq!(related_keys(EntityKind::Event), vec!["classes"]);
        assert_eq!(
            related_keys(EntityKind::Lesson),
            vec!["subjects", "classes", "teachers"]
        );
        assert!(related_keys(EntityKind::Parent).is_empty());
    }

    #[test]
    fn dates_are_shaped_for_inputs() {
        let birthday = FieldSpec::input("birthday", "Birthday", InputType::Date);
        assert_eq!(
            display_value(&birthday, Some(&json!("1980-04-12T00:00:00Z"))),
            json!("1980-04-12")
        );
        let start = FieldSpec::input("startTime", "Start Time", InputType::DateTimeLocal);
        assert_eq!(
            display_value(&start, Some(&json!("2026-05-01T09:00:00"))),
            json!("2026-05-01T09:00")
        );
        let present = FieldSpec::fixed("present", "Attendance", &[], None);
        assert_eq!(display_value(&present, Some(&json!(false))), json!("false"));
    }
}
