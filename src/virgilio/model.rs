use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const PRICE_FALLBACK: &str = "Non disponibile";
pub const TIME_FALLBACK: &str = "Orario non specificato";

/// A single calendar day of a scraped event, in the shape the calendar widget consumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub title: String,
    /// `YYYY-MM-DD`
    pub start: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "extendedProps", default)]
    pub props: EventProps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventProps {
    pub price: String,
    pub time: String,
}

impl Default for EventProps {
    fn default() -> Self {
        Self {
            price: PRICE_FALLBACK.to_string(),
            time: TIME_FALLBACK.to_string(),
        }
    }
}

impl NormalizedEvent {
    /// Text shown inside the calendar cell, below the bold title
    pub fn summary(&self) -> String {
        format!("{} - {}", self.props.time, self.props.price)
    }

    /// One-shot notification shown when the event is selected
    pub fn details(&self) -> EventDetails<'_> {
        EventDetails(self)
    }
}

pub struct EventDetails<'a>(&'a NormalizedEvent);

impl Display for EventDetails<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Descrizione: {}\nLuogo: {}\nIndirizzo: {}",
            self.0.description, self.0.location, self.0.address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> NormalizedEvent {
        NormalizedEvent {
            title: "Palio di Siena".to_string(),
            start: "2024-07-02".to_string(),
            description: "La corsa in Piazza del Campo.".to_string(),
            location: "Piazza del Campo".to_string(),
            address: "".to_string(),
            props: EventProps {
                price: "Gratuito".to_string(),
                time: "19:15".to_string(),
            },
        }
    }

    #[test_log::test]
    fn should_serialize_with_calendar_field_names() {
        let json = serde_json::to_value(sample_event()).unwrap();

        assert_eq!(json["start"], "2024-07-02");
        assert_eq!(json["extendedProps"]["price"], "Gratuito");
        assert_eq!(json["extendedProps"]["time"], "19:15");
    }

    #[test_log::test]
    fn should_fill_fallbacks_when_props_are_missing() {
        let event = serde_json::from_str::<NormalizedEvent>(
            r#"{"title": "Mostra", "start": "2024-05-01"}"#,
        )
        .unwrap();

        assert_eq!(event.props.price, PRICE_FALLBACK);
        assert_eq!(event.props.time, TIME_FALLBACK);
        assert_eq!(event.address, "");
    }

    #[test_log::test]
    fn should_render_summary_and_details() {
        let event = sample_event();

        assert_eq!(event.summary(), "19:15 - Gratuito");
        assert_eq!(
            event.details().to_string(),
            "Descrizione: La corsa in Piazza del Campo.\nLuogo: Piazza del Campo\nIndirizzo: "
        );
    }
}
