use crate::kinds::{EntityKind, RecordId};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One selectable reference: the value posted back and the text shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedItem {
    pub id: RecordId,
    pub label: String,
}

/// Reference lists keyed by plural name (`classes`, `subjects`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RelatedData(BTreeMap<String, Vec<RelatedItem>>);

impl RelatedData {
    pub fn get(&self, key: &str) -> Option<&[RelatedItem]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn insert(&mut self, key: impl Into<String>, items: Vec<RelatedItem>) {
        self.0.insert(key.into(), items);
    }

    /// Parses caller-supplied lists. Each item needs an `id`; the label comes
    /// from `label`, `name surname`, `name (subject.name)`, `name` or `title`.
    pub fn from_json(v: &Value) -> Result<Self, String> {
        let Some(obj) = v.as_object() else {
            return Err("relatedData must be an object".to_string());
        };
        let mut out = Self::default();
        for (key, list) in obj {
            let Some(arr) = list.as_array() else {
                return Err(format!("relatedData.{key} must be an array"));
            };
            let mut items = Vec::with_capacity(arr.len());
            for (i, item) in arr.iter().enumerate() {
                let id = item
                    .get("id")
                    .and_then(RecordId::from_json)
                    .ok_or_else(|| format!("relatedData.{key}[{i}] is missing id"))?;
                items.push(RelatedItem {
                    label: item_label(item).unwrap_or_else(|| id.to_string()),
                    id,
                });
            }
            out.insert(key.clone(), items);
        }
        Ok(out)
    }
}

/// Kind whose records populate a reference list, if any.
pub fn list_kind(key: &str) -> Option<EntityKind> {
    match key {
        "teachers" => Some(EntityKind::Teacher),
        "students" => Some(EntityKind::Student),
        "parents" => Some(EntityKind::Parent),
        "subjects" => Some(EntityKind::Subject),
        "classes" => Some(EntityKind::Class),
        "lessons" => Some(EntityKind::Lesson),
        "exams" => Some(EntityKind::Exam),
        "assignments" => Some(EntityKind::Assignment),
        _ => None,
    }
}

pub fn item_label(item: &Value) -> Option<String> {
    let s = |k: &str| {
        item.get(k)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };
    if let Some(label) = s("label") {
        return Some(label.to_string());
    }
    if let (Some(name), Some(surname)) = (s("name"), s("surname")) {
        return Some(format!("{name} {surname}"));
    }
    let subject = item
        .get("subject")
        .and_then(|v| v.get("name"))
        .and_then(|v| v.as_str());
    if let (Some(name), Some(subject)) = (s("name"), subject) {
        return Some(format!("{name} ({subject})"));
    }
    s("name").or_else(|| s("title")).map(str::to_string)
}
