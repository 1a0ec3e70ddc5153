//! Field-level validation shared by every entity schema.
//!
//! A schema reads a raw field map (what a browser form posts: mostly strings,
//! sometimes numbers, booleans or arrays) through [`Fields`], which coerces
//! values into typed Rust values and records at most one error per field.
//! Nothing here mutates the raw map.

mod entities;

pub use entities::*;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Required,
    InvalidType,
    InvalidValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub code: ErrorCode,
    pub message: String,
}

/// Validation failures keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, FieldError>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn single(field: &str, code: ErrorCode, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.insert_first(field, code, message.into());
        errors
    }

    fn insert_first(&mut self, field: &str, code: ErrorCode, message: String) {
        self.0
            .entry(field.to_string())
            .or_insert(FieldError { code, message });
    }
}

/// Cursor over one raw submission. Required getters return a placeholder
/// value when the field is missing or malformed; the error recorded alongside
/// makes [`Fields::finish`] fail, so placeholders never reach a payload.
pub struct Fields<'a> {
    raw: &'a Map<String, Value>,
    errors: FieldErrors,
    read: BTreeSet<&'static str>,
}

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

impl<'a> Fields<'a> {
    pub fn new(raw: &'a Map<String, Value>) -> Self {
        Self {
            raw,
            errors: FieldErrors::default(),
            read: BTreeSet::new(),
        }
    }

    /// Looks up a field; `null`, empty and whitespace-only strings count as absent.
    fn present(&mut self, name: &'static str) -> Option<&'a Value> {
        self.read.insert(name);
        let raw: &'a Map<String, Value> = self.raw;
        match raw.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::Array(a)) if a.is_empty() => None,
            Some(v) => Some(v),
        }
    }

    pub fn reject(&mut self, name: &str, code: ErrorCode, message: impl Into<String>) {
        self.errors.insert_first(name, code, message.into());
    }

    fn missing(&mut self, name: &str) {
        self.reject(name, ErrorCode::Required, "Required");
    }

    /// True when none of `names` has recorded an error.
    pub fn valid(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.errors.get(n).is_none())
    }

    pub fn optional_text(&mut self, name: &'static str) -> Option<String> {
        let v = self.present(name)?;
        match v.as_str() {
            Some(s) => Some(s.trim().to_string()),
            None => {
                self.reject(name, ErrorCode::InvalidType, "Expected text");
                None
            }
        }
    }

    pub fn required_text(&mut self, name: &'static str) -> String {
        if self.raw.get(name).map(|v| !v.is_string() && !v.is_null()) == Some(true) {
            self.read.insert(name);
            self.reject(name, ErrorCode::InvalidType, "Expected text");
            return String::new();
        }
        match self.optional_text(name) {
            Some(s) => s,
            None => {
                self.missing(name);
                String::new()
            }
        }
    }

    pub fn required_text_len(&mut self, name: &'static str, min: usize, max: usize) -> String {
        let s = self.required_text(name);
        let n = s.chars().count();
        if self.valid(&[name]) {
            if n < min {
                self.reject(
                    name,
                    ErrorCode::InvalidValue,
                    format!("Must be at least {min} characters long!"),
                );
            } else if n > max {
                self.reject(
                    name,
                    ErrorCode::InvalidValue,
                    format!("Must be at most {max} characters long!"),
                );
            }
        }
        s
    }

    pub fn optional_email(&mut self, name: &'static str) -> Option<String> {
        let s = self.optional_text(name)?;
        if is_plausible_email(&s) {
            Some(s)
        } else {
            self.reject(name, ErrorCode::InvalidValue, "Invalid email address!");
            None
        }
    }

    fn number(&mut self, name: &'static str) -> Option<f64> {
        let v = self.present(name)?;
        let parsed = match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
            _ => None,
        };
        if parsed.is_none() {
            self.reject(name, ErrorCode::InvalidType, "Expected a number");
        }
        parsed
    }

    pub fn optional_int(&mut self, name: &'static str) -> Option<i64> {
        let x = self.number(name)?;
        if x.fract() != 0.0 || x < i64::MIN as f64 || x > i64::MAX as f64 {
            self.reject(name, ErrorCode::InvalidValue, "Expected a whole number");
            return None;
        }
        Some(x as i64)
    }

    pub fn required_int(&mut self, name: &'static str) -> i64 {
        let present = self.raw.get(name).is_some_and(|v| !is_blank(v));
        match self.optional_int(name) {
            Some(n) => n,
            None => {
                if !present {
                    self.missing(name);
                }
                0
            }
        }
    }

    pub fn required_int_min(&mut self, name: &'static str, min: i64) -> i64 {
        let n = self.required_int(name);
        if self.valid(&[name]) && n < min {
            self.reject(
                name,
                ErrorCode::InvalidValue,
                format!("Must be at least {min}"),
            );
        }
        n
    }

    pub fn required_number_range(&mut self, name: &'static str, min: f64, max: f64) -> f64 {
        let present = self.raw.get(name).is_some_and(|v| !is_blank(v));
        let Some(x) = self.number(name) else {
            if !present {
                self.missing(name);
            }
            return 0.0;
        };
        if x < min || x > max {
            self.reject(
                name,
                ErrorCode::InvalidValue,
                format!("Must be between {min} and {max}"),
            );
        }
        x
    }

    /// Reference to a person record (string id). Numbers are accepted and stringified.
    pub fn optional_ref(&mut self, name: &'static str) -> Option<String> {
        let v = self.present(name)?;
        match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => {
                self.reject(name, ErrorCode::InvalidType, "Expected an identifier");
                None
            }
        }
    }

    pub fn required_ref(&mut self, name: &'static str) -> String {
        let present = self.raw.get(name).is_some_and(|v| !is_blank(v));
        match self.optional_ref(name) {
            Some(s) => s,
            None => {
                if !present {
                    self.missing(name);
                }
                String::new()
            }
        }
    }

    /// Multi-select of integer ids; a single scalar is treated as a one-item list.
    pub fn optional_int_list(&mut self, name: &'static str) -> Vec<i64> {
        let Some(v) = self.present(name) else {
            return Vec::new();
        };
        let items: Vec<&Value> = match v {
            Value::Array(a) => a.iter().collect(),
            other => vec![other],
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let parsed = match item {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            match parsed {
                Some(id) if !out.contains(&id) => out.push(id),
                Some(_) => {}
                None => {
                    self.reject(name, ErrorCode::InvalidType, "Expected a list of identifiers");
                    return Vec::new();
                }
            }
        }
        out
    }

    pub fn required_choice(&mut self, name: &'static str, choices: &[&str]) -> String {
        let s = self.required_text(name);
        if self.valid(&[name]) && !choices.contains(&s.as_str()) {
            self.reject(
                name,
                ErrorCode::InvalidValue,
                format!("Expected one of: {}", choices.join(", ")),
            );
        }
        s
    }

    pub fn required_bool(&mut self, name: &'static str) -> bool {
        let Some(v) = self.present(name) else {
            self.missing(name);
            return false;
        };
        match v {
            Value::Bool(b) => *b,
            Value::String(s) if s.trim() == "true" => true,
            Value::String(s) if s.trim() == "false" => false,
            Value::String(_) => {
                self.reject(name, ErrorCode::InvalidValue, "Expected true or false");
                false
            }
            _ => {
                self.reject(name, ErrorCode::InvalidType, "Expected true or false");
                false
            }
        }
    }

    pub fn required_datetime(&mut self, name: &'static str) -> NaiveDateTime {
        let present = self.raw.get(name).is_some_and(|v| !is_blank(v));
        let Some(v) = self.present(name) else {
            if !present {
                self.missing(name);
            }
            return NaiveDateTime::default();
        };
        let Some(s) = v.as_str() else {
            self.reject(name, ErrorCode::InvalidType, "Expected a date and time");
            return NaiveDateTime::default();
        };
        match parse_datetime(s) {
            Some(dt) => dt,
            None => {
                self.reject(name, ErrorCode::InvalidValue, "Invalid date");
                NaiveDateTime::default()
            }
        }
    }

    pub fn required_date(&mut self, name: &'static str) -> NaiveDate {
        let Some(v) = self.present(name) else {
            self.missing(name);
            return NaiveDate::default();
        };
        let Some(s) = v.as_str() else {
            self.reject(name, ErrorCode::InvalidType, "Expected a date");
            return NaiveDate::default();
        };
        match parse_date(s) {
            Some(d) => d,
            None => {
                self.reject(name, ErrorCode::InvalidValue, "Invalid date");
                NaiveDate::default()
            }
        }
    }

    /// Requires `later` to be strictly after `earlier` when both parsed.
    pub fn ordered(
        &mut self,
        earlier_name: &str,
        earlier: NaiveDateTime,
        later_name: &str,
        later: NaiveDateTime,
        message: &str,
    ) {
        if self.valid(&[earlier_name, later_name]) && later <= earlier {
            self.reject(later_name, ErrorCode::InvalidValue, message);
        }
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        let dropped: Vec<&str> = self
            .raw
            .keys()
            .map(String::as_str)
            .filter(|k| *k != "id" && !self.read.iter().any(|r| r == k))
            .collect();
        if !dropped.is_empty() {
            tracing::debug!(?dropped, "ignoring fields without a schema entry");
        }
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

fn is_plausible_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Accepts datetime-local (`2026-03-02T08:30`), seconds precision, and RFC 3339.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn required_text_distinguishes_missing_from_wrong_type() {
        let input = raw(json!({ "a": "  ", "b": 5, "c": " ok " }));
        let mut f = Fields::new(&input);
        assert_eq!(f.required_text("a"), "");
        assert_eq!(f.required_text("b"), "");
        assert_eq!(f.required_text("c"), "ok");
        let errors = f.finish().expect_err("errors");
        assert_eq!(errors.get("a").map(|e| e.code), Some(ErrorCode::Required));
        assert_eq!(errors.get("b").map(|e| e.code), Some(ErrorCode::InvalidType));
        assert!(errors.get("c").is_none());
    }

    #[test]
    fn numbers_coerce_from_strings() {
        let input = raw(json!({ "n": "42", "x": "4.5", "bad": "four", "frac": "1.5" }));
        let mut f = Fields::new(&input);
        assert_eq!(f.required_int("n"), 42);
        assert_eq!(f.required_number_range("x", 0.0, 10.0), 4.5);
        f.required_int("bad");
        f.required_int("frac");
        let errors = f.finish().expect_err("errors");
        assert_eq!(errors.get("bad").map(|e| e.code), Some(ErrorCode::InvalidType));
        assert_eq!(errors.get("frac").map(|e| e.code), Some(ErrorCode::InvalidValue));
        assert_eq!(errors.fields().count(), 2);
    }

    #[test]
    fn datetimes_accept_browser_and_rfc3339_shapes() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 2)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .expect("valid datetime");
        assert_eq!(parse_datetime("2026-03-02T08:30"), Some(expected));
        assert_eq!(parse_datetime("2026-03-02T08:30:00"), Some(expected));
        assert_eq!(parse_datetime("2026-03-02T08:30:00Z"), Some(expected));
        assert_eq!(parse_datetime("2026-13-02T08:30"), None);
        assert_eq!(parse_datetime("yesterday"), None);
    }

    #[test]
    fn malformed_datetime_is_invalid_value_not_required() {
        let input = raw(json!({ "when": "2026-02-30T10:00" }));
        let mut f = Fields::new(&input);
        f.required_datetime("when");
        let errors = f.finish().expect_err("errors");
        assert_eq!(errors.get("when").map(|e| e.code), Some(ErrorCode::InvalidValue));
    }

    #[test]
    fn first_error_per_field_wins() {
        let input = raw(json!({}));
        let mut f = Fields::new(&input);
        f.required_text("title");
        f.reject("title", ErrorCode::InvalidValue, "later");
        let errors = f.finish().expect_err("errors");
        assert_eq!(errors.get("title").map(|e| e.message.as_str()), Some("Required"));
    }

    #[test]
    fn validation_does_not_touch_input() {
        let input = raw(json!({ "title": "  padded  ", "extra": 1 }));
        let before = input.clone();
        let mut f = Fields::new(&input);
        let _ = f.required_text("title");
        let _ = f.finish();
        assert_eq!(input, before);
    }

    #[test]
    fn email_check_is_shape_only() {
        assert!(is_plausible_email("a.b@school.edu"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("no-at.example.com"));
        assert!(!is_plausible_email("a b@c.d"));
    }
}
