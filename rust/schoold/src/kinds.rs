use serde::{Deserialize, Serialize};
use std::fmt;

/// Every domain object type the form system knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Teacher,
    Student,
    Parent,
    Subject,
    Class,
    Lesson,
    Exam,
    Assignment,
    Result,
    Attendance,
    Event,
    Announcement,
}

impl EntityKind {
    pub const ALL: [EntityKind; 12] = [
        EntityKind::Teacher,
        EntityKind::Student,
        EntityKind::Parent,
        EntityKind::Subject,
        EntityKind::Class,
        EntityKind::Lesson,
        EntityKind::Exam,
        EntityKind::Assignment,
        EntityKind::Result,
        EntityKind::Attendance,
        EntityKind::Event,
        EntityKind::Announcement,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Parent => "parent",
            Self::Subject => "subject",
            Self::Class => "class",
            Self::Lesson => "lesson",
            Self::Exam => "exam",
            Self::Assignment => "assignment",
            Self::Result => "result",
            Self::Attendance => "attendance",
            Self::Event => "event",
            Self::Announcement => "announcement",
        }
    }

    /// "Teacher", "Announcement", ... for titles and notices.
    pub fn display_name(self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    /// People are keyed by opaque string ids, everything else by integers.
    pub fn uses_string_ids(self) -> bool {
        matches!(self, Self::Teacher | Self::Student | Self::Parent)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Update,
    Delete,
}

impl FormMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Past tense used in acknowledgements: "created", "updated", "deleted".
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

/// Identifier of a stored record. Integer for most kinds, string for people.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl RecordId {
    pub fn from_json(v: &serde_json::Value) -> Option<Self> {
        match v {
            serde_json::Value::Number(n) => n.as_i64().map(Self::Int),
            serde_json::Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(Self::Str(s.to_string()))
                }
            }
            _ => None,
        }
    }

    /// Normalizes an id for `kind`: integer kinds accept numeric strings.
    pub fn for_kind(kind: EntityKind, v: &serde_json::Value) -> Option<Self> {
        let id = Self::from_json(v)?;
        if kind.uses_string_ids() {
            return Some(Self::Str(id.to_string()));
        }
        match id {
            Self::Int(n) => Some(Self::Int(n)),
            Self::Str(s) => s.parse::<i64>().ok().map(Self::Int),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Int(n) => serde_json::Value::from(*n),
            Self::Str(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_names_round_trip_through_parse() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("Teacher"), None);
        assert_eq!(EntityKind::parse("grade"), None);
    }

    #[test]
    fn display_name_capitalizes() {
        assert_eq!(EntityKind::Announcement.display_name(), "Announcement");
        assert_eq!(EntityKind::Class.display_name(), "Class");
    }

    #[test]
    fn record_ids_follow_kind_id_style() {
        assert_eq!(
            RecordId::for_kind(EntityKind::Event, &json!("12")),
            Some(RecordId::Int(12))
        );
        assert_eq!(RecordId::for_kind(EntityKind::Event, &json!("abc")), None);
        assert_eq!(
            RecordId::for_kind(EntityKind::Teacher, &json!(7)),
            Some(RecordId::Str("7".into()))
        );
        assert_eq!(RecordId::for_kind(EntityKind::Teacher, &json!("  ")), None);
    }
}
