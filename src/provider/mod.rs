pub mod datetime;
mod error;
pub mod source;

pub use datetime::{days_of_month, parse_event_date, MonthKey};
pub use error::{Error, ErrorKind};
pub use source::{deliver, load, spawn_load, DataSource};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeMap;

pub type Result<T> = std::result::Result<T, Error>;

/// An event record exactly as it appears in the fetched document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawEvent {
    pub date: String,
    pub title: String,
}

/// The fetched document: month keys mapped to their event records.
pub type RawDataset = BTreeMap<String, Vec<RawEvent>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    date: NaiveDate,
    title: String,
}

impl CalendarEvent {
    pub fn new(date: NaiveDate, title: String) -> Self {
        CalendarEvent { date, title }
    }

    pub fn date(&self) -> &NaiveDate {
        &self.date
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Validates one record against the month it is stored under.
pub fn validate_event(month: &MonthKey, raw: &RawEvent) -> Result<CalendarEvent> {
    let date = parse_event_date(&raw.date)
        .map_err(|err| err.with_msg(&format!("'{}' (event '{}')", raw.date, raw.title)))?;

    if !month.contains(&date) {
        return Err(Error::new(
            ErrorKind::DateOutsideMonth,
            &format!("event '{}' on {} is stored under {}", raw.title, date, month),
        ));
    }

    Ok(CalendarEvent::new(date, raw.title.clone()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarDataset {
    months: BTreeMap<MonthKey, Vec<CalendarEvent>>,
}

/// Result of ingesting a document: everything valid, plus what was dropped.
#[derive(Debug, Default)]
pub struct Ingested {
    pub dataset: CalendarDataset,
    pub rejected: Vec<Error>,
}

impl CalendarDataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Converts the raw document into typed months and events.
    ///
    /// Buckets with an invalid key and events whose date is malformed or
    /// outside their bucket's month are dropped and reported.
    pub fn ingest(raw: RawDataset) -> Ingested {
        let mut rejected = Vec::new();
        let mut months = BTreeMap::new();

        for (key, records) in raw {
            let month = match key.parse::<MonthKey>() {
                Ok(month) => month,
                Err(err) => {
                    log::warn!("Dropping {} event(s): {}", records.len(), err);
                    rejected.push(err);
                    continue;
                }
            };

            let events = records
                .iter()
                .map(|record| validate_event(&month, record))
                .inspect(|res| {
                    if let Err(err) = res {
                        log::warn!("Dropping event: {}", err)
                    }
                })
                .filter_map(|res| res.map_err(|err| rejected.push(err)).ok())
                .collect();

            months.insert(month, events);
        }

        Ingested {
            dataset: CalendarDataset { months },
            rejected,
        }
    }

    pub fn from_json(document: &str) -> Result<Self> {
        let raw: RawDataset = serde_json::from_str(document)?;
        Ok(Self::ingest(raw).dataset)
    }

    /// Month keys in chronological order.
    pub fn months(&self) -> impl Iterator<Item = &MonthKey> {
        self.months.keys()
    }

    pub fn events_of_month(&self, month: &MonthKey) -> Option<&[CalendarEvent]> {
        self.months.get(month).map(Vec::as_slice)
    }

    pub fn contains_month(&self, month: &MonthKey) -> bool {
        self.months.contains_key(month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, title: &str) -> RawEvent {
        RawEvent {
            date: date.to_owned(),
            title: title.to_owned(),
        }
    }

    #[test]
    fn ingest_keeps_valid_events_in_order() {
        let mut doc = RawDataset::new();
        doc.insert(
            "2025-01".to_owned(),
            vec![raw("2025-01-20", "B"), raw("2025-01-15", "A")],
        );
        doc.insert("2025-03".to_owned(), vec![]);

        let Ingested { dataset, rejected } = CalendarDataset::ingest(doc);
        assert!(rejected.is_empty());

        let jan: MonthKey = "2025-01".parse().unwrap();
        let titles: Vec<&str> = dataset
            .events_of_month(&jan)
            .unwrap()
            .iter()
            .map(CalendarEvent::title)
            .collect();
        assert_eq!(titles, ["B", "A"]);

        let months: Vec<String> = dataset.months().map(ToString::to_string).collect();
        assert_eq!(months, ["2025-01", "2025-03"]);
    }

    #[test]
    fn ingest_drops_invalid_records() {
        let mut doc = RawDataset::new();
        doc.insert(
            "2025-01".to_owned(),
            vec![
                raw("2025-01-xx", "malformed"),
                raw("2025-02-01", "wrong month"),
                raw("2025-01-31", "kept"),
            ],
        );
        doc.insert("January".to_owned(), vec![raw("2025-01-02", "bad key")]);

        let Ingested { dataset, rejected } = CalendarDataset::ingest(doc);
        assert_eq!(rejected.len(), 3);
        assert!(rejected
            .iter()
            .any(|e| matches!(e.kind, ErrorKind::DateOutsideMonth)));
        assert!(rejected
            .iter()
            .any(|e| matches!(e.kind, ErrorKind::MonthKeyParse)));

        let jan: MonthKey = "2025-01".parse().unwrap();
        let events = dataset.events_of_month(&jan).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title(), "kept");
        assert_eq!(events[0].day(), 31);
        assert_eq!(dataset.months().count(), 1);
    }

    #[test]
    fn from_json_document() {
        let dataset = CalendarDataset::from_json(
            r#"{"2025-01": [{"date": "2025-01-15", "title": "A"}],
                "2025-03": [{"date": "2025-03-02", "title": "B"}]}"#,
        )
        .unwrap();

        assert_eq!(dataset.months().count(), 2);
        assert!(dataset.contains_month(&"2025-03".parse().unwrap()));
        assert!(!dataset.contains_month(&"2025-02".parse().unwrap()));

        let err = CalendarDataset::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DocumentParse));
    }
}
