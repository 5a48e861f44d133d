use super::dates::{canonicalize_date, format_date_to_iso, is_date_range, parse_date_range};
use super::dto::RawRecord;
use super::model::{EventProps, NormalizedEvent, PRICE_FALLBACK, TIME_FALLBACK};
use itertools::Itertools;
use serde::Deserialize;
use serde_either::SingleOrVec;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, error, warn};

pub const DEFAULT_REFERENCE_YEAR: i32 = 2024;

/// Scraped dates carry no year, so every event is placed in `reference_year`
#[derive(Debug, Clone, Copy)]
pub struct EventNormalizer {
    pub reference_year: i32,
}

impl Default for EventNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_YEAR)
    }
}

impl EventNormalizer {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /**
       Flattens the scraped records into one event per calendar day, keeping their order.
       Anything other than a JSON array yields no events
    */
    pub fn prepare_events(&self, data: &Value) -> Vec<NormalizedEvent> {
        match parse_records(data) {
            Some(records) => self.prepare_records(&records),
            None => Vec::new(),
        }
    }

    pub fn prepare_records(&self, records: &[RawRecord]) -> Vec<NormalizedEvent> {
        let events: Vec<NormalizedEvent> = records
            .iter()
            .flat_map(|record| self.expand(record))
            .collect();

        debug!(
            "Prepared {} events from {} records",
            events.len(),
            records.len()
        );

        events
    }

    fn expand(&self, record: &RawRecord) -> Vec<NormalizedEvent> {
        let date = canonicalize_date(&record.date);

        // A range that yields no days (reversed, or with a day that doesn't exist) yields no events
        if is_date_range(&date) {
            return parse_date_range(&date, self.reference_year)
                .iter()
                .map(|day| create_event(record, day))
                .collect();
        }

        match format_date_to_iso(&date, self.reference_year) {
            Ok(day) => vec![create_event(record, &day)],
            Err(err) => {
                warn!("Skipping '{}': {}", record.title, err);
                Vec::new()
            }
        }
    }
}

/// Same as [`EventNormalizer::prepare_events`] with the default reference year
pub fn prepare_events(data: &Value) -> Vec<NormalizedEvent> {
    EventNormalizer::default().prepare_events(data)
}

/// Reads the records of a scraped dataset. `None` when the payload isn't an array
pub fn parse_records(data: &Value) -> Option<Vec<RawRecord>> {
    let Value::Array(values) = data else {
        error!("Expected a list of events, got: {}", data);
        return None;
    };

    Some(
        values
            .iter()
            .filter_map(|value| match RawRecord::deserialize(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!("Ignoring malformed record {}: {}", value, err);
                    None
                }
            })
            .collect(),
    )
}

pub fn create_event(record: &RawRecord, start: &str) -> NormalizedEvent {
    let price = match &record.price {
        Some(SingleOrVec::Vec(prices)) => prices.iter().join(", "),
        Some(SingleOrVec::Single(price)) => price.to_string(),
        None => PRICE_FALLBACK.to_string(),
    };

    NormalizedEvent {
        title: record.title.to_string(),
        start: start.to_string(),
        description: record
            .groq_description
            .as_ref()
            .or(record.description.as_ref())
            .cloned()
            .unwrap_or_default(),
        location: record.location.to_string(),
        address: record.address.clone().unwrap_or_default(),
        props: EventProps {
            price,
            time: record
                .time
                .clone()
                .unwrap_or_else(|| TIME_FALLBACK.to_string()),
        },
    }
}

/// Appends the records of `new` that aren't already in `existing` (same title, date and venue)
pub fn merge_records(existing: Vec<RawRecord>, new: Vec<RawRecord>) -> Vec<RawRecord> {
    let mut seen: HashSet<(String, String, String)> = existing
        .iter()
        .map(owned_identity)
        .collect();

    let unique_new = new
        .into_iter()
        .filter(|record| seen.insert(owned_identity(record)))
        .collect::<Vec<RawRecord>>();

    debug!(
        "{} new records merged into {} existing ones",
        unique_new.len(),
        existing.len()
    );

    existing.into_iter().chain(unique_new).collect()
}

fn owned_identity(record: &RawRecord) -> (String, String, String) {
    let (title, date, location) = record.identity();
    (title.to_string(), date.to_string(), location.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(date: &str) -> Value {
        json!({
            "Titolo evento": "Chigiana Summer Academy",
            "Descrizione di Virgilio.it": "Concerti dei maestri dell'Accademia.",
            "Data": date,
            "Luogo": "Palazzo Chigi Saracini",
        })
    }

    #[test_log::test]
    fn should_create_one_event_per_day_of_range() {
        let events = prepare_events(&json!([record("Dal 1/3 al 3/3")]));

        let starts: Vec<&str> = events.iter().map(|e| e.start.as_str()).collect();
        assert_eq!(starts, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
        assert!(events.iter().all(|e| e.title == "Chigiana Summer Academy"));
    }

    #[test_log::test]
    fn should_create_single_event_for_single_date() {
        let events = prepare_events(&json!([record("5/7")]));

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, "2024-07-05");
    }

    #[test_log::test]
    fn should_use_reference_year() {
        let events = EventNormalizer::new(2025).prepare_events(&json!([record("5/7")]));

        assert_eq!(events[0].start, "2025-07-05");
    }

    #[test_log::test]
    fn should_keep_input_order() {
        let events = prepare_events(&json!([record("9/9"), record("Dal 1/1 al 2/1"), record("3/3")]));

        let starts: Vec<&str> = events.iter().map(|e| e.start.as_str()).collect();
        assert_eq!(
            starts,
            vec!["2024-09-09", "2024-01-01", "2024-01-02", "2024-03-03"]
        );
    }

    #[test_log::test]
    fn when_range_is_reversed_should_create_no_events() {
        assert!(prepare_events(&json!([record("Dal 10/5 al 5/5")])).is_empty());
    }

    #[test_log::test]
    fn when_data_is_not_a_list_should_create_no_events() {
        assert!(prepare_events(&json!({"Titolo evento": "x"})).is_empty());
        assert!(prepare_events(&json!("eventi")).is_empty());
        assert!(prepare_events(&Value::Null).is_empty());
    }

    #[test_log::test]
    fn should_expand_dates_with_month_names() {
        let events = prepare_events(&json!([record("Dal 30 Nov Al 1 Dic"), record("12 Gen")]));

        let starts: Vec<&str> = events.iter().map(|e| e.start.as_str()).collect();
        assert_eq!(starts, vec!["2024-11-30", "2024-12-01", "2024-01-12"]);
    }

    #[test_log::test]
    fn should_skip_records_with_unreadable_dates() {
        let events = prepare_events(&json!([record("N/A"), record("5/7"), 42]));

        assert_eq!(events.len(), 1);
    }

    #[test_log::test]
    fn should_skip_records_with_days_that_do_not_exist() {
        let events = prepare_events(&json!([record("31/2"), record("0/13"), record("Dal 30/2 al 3/3")]));

        assert!(events.is_empty(), "{:?}", events);
    }

    #[test_log::test]
    fn when_range_crosses_year_boundary_should_create_no_events() {
        // The reversed range must not fall back to reading "Dal 30/12 al 2/1" as a single date
        let events = prepare_events(&json!([record("Dal 30/12 al 2/1")]));

        assert!(events.is_empty(), "{:?}", events);
    }

    #[test_log::test]
    fn should_join_price_list() {
        let mut raw = record("5/7");
        raw["Prezzo"] = json!(["10€", "15€"]);

        assert_eq!(prepare_events(&json!([raw]))[0].props.price, "10€, 15€");
    }

    #[test_log::test]
    fn should_apply_fallbacks() {
        let event = &prepare_events(&json!([record("5/7")]))[0];

        assert_eq!(event.props.price, "Non disponibile");
        assert_eq!(event.props.time, "Orario non specificato");
        assert_eq!(event.address, "");
        assert_eq!(event.description, "Concerti dei maestri dell'Accademia.");
    }

    #[test_log::test]
    fn should_prefer_groq_description() {
        let mut raw = record("5/7");
        raw["Descrizione Groq"] = json!("Una serata di musica da camera.");

        assert_eq!(
            prepare_events(&json!([raw]))[0].description,
            "Una serata di musica da camera."
        );
    }

    #[test_log::test]
    fn should_merge_only_unseen_records() {
        let existing = vec![RawRecord {
            title: "Palio".to_string(),
            date: "2/7".to_string(),
            location: "Piazza del Campo".to_string(),
            ..Default::default()
        }];
        let new = vec![
            existing[0].clone(),
            RawRecord {
                title: "Palio".to_string(),
                date: "16/8".to_string(),
                location: "Piazza del Campo".to_string(),
                ..Default::default()
            },
        ];

        let merged = merge_records(existing, new);

        let dates: Vec<&str> = merged.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2/7", "16/8"]);
    }
}
