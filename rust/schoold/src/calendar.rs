use crate::kinds::RecordId;
use crate::schema::{parse_date, parse_datetime};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventItem {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl EventItem {
    /// Builds a list row from a stored event payload; rows without a
    /// parseable start time are skipped.
    pub fn from_record(id: RecordId, payload: &Value) -> Option<Self> {
        let text = |k: &str| payload.get(k).and_then(|v| v.as_str()).unwrap_or("");
        let start_time = parse_datetime(text("startTime"))?;
        let end_time = parse_datetime(text("endTime")).unwrap_or(start_time);
        Some(Self {
            id,
            title: text("title").to_string(),
            description: text("description").to_string(),
            start_time,
            end_time,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    /// Day the calendar highlights.
    pub date: NaiveDate,
    /// Whether `events` is limited to `date`.
    pub filtered: bool,
    pub events: Vec<EventItem>,
}

/// Renders from the date parameter alone; nothing is remembered between calls.
pub fn calendar_view(date_param: Option<&str>, today: NaiveDate, events: Vec<EventItem>) -> CalendarView {
    let filter = date_param
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| {
            let parsed = parse_date(s);
            if parsed.is_none() {
                tracing::warn!(date = s, "ignoring unparseable calendar date");
            }
            parsed
        });

    let mut events: Vec<EventItem> = match filter {
        Some(day) => events
            .into_iter()
            .filter(|e| e.start_time.date() == day)
            .collect(),
        None => events,
    };
    events.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));

    CalendarView {
        date: filter.unwrap_or(today),
        filtered: filter.is_some(),
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn events() -> Vec<EventItem> {
        [
            (1, "Assembly", "2026-03-02T09:00"),
            (2, "Sports day", "2026-03-03T08:00"),
            (3, "Breakfast club", "2026-03-02T07:30"),
        ]
        .into_iter()
        .filter_map(|(id, title, start)| {
            EventItem::from_record(
                RecordId::Int(id),
                &json!({ "title": title, "description": "", "startTime": start }),
            )
        })
        .collect()
    }

    #[test]
    fn date_filters_and_orders_events() {
        let view = calendar_view(Some("2026-03-02"), day(2026, 1, 1), events());
        assert!(view.filtered);
        assert_eq!(view.date, day(2026, 3, 2));
        let titles: Vec<&str> = view.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Breakfast club", "Assembly"]);
    }

    #[test]
    fn missing_date_lists_everything() {
        let view = calendar_view(None, day(2026, 1, 1), events());
        assert!(!view.filtered);
        assert_eq!(view.date, day(2026, 1, 1));
        assert_eq!(view.events.len(), 3);
    }

    #[test]
    fn garbage_date_is_treated_as_absent() {
        let view = calendar_view(Some("not-a-date"), day(2026, 1, 1), events());
        assert!(!view.filtered);
        assert_eq!(view.events.len(), 3);
    }

    #[test]
    fn records_without_start_are_skipped() {
        assert!(EventItem::from_record(RecordId::Int(1), &json!({ "title": "x" })).is_none());
    }
}
