use super::dto::RawRecord;
use super::model::NormalizedEvent;
use super::normalizer::parse_records;
use lazy_static::lazy_static;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

lazy_static! {
    static ref REST_CLIENT: Client = Client::new();
}

#[derive(Debug, Error)]
pub enum EventsError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{reason}")]
    Status { status: StatusCode, reason: String },
    #[error("couldn't read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("expected a list of events")]
    NotASequence,
}

/// What the refresh endpoint answered with
#[derive(Debug)]
pub enum RefreshPayload {
    /// Objects already in calendar shape (they carry a `start` field)
    Normalized(Vec<NormalizedEvent>),
    /// Records as scraped, still to be normalized
    Raw(Vec<RawRecord>),
}

impl RefreshPayload {
    pub fn from_value(value: Value) -> Result<Self, EventsError> {
        let Value::Array(items) = &value else {
            return Err(EventsError::NotASequence);
        };

        let normalized = !items.is_empty()
            && items
                .iter()
                .all(|item| item.get("start").is_some_and(Value::is_string));

        if normalized {
            info!("Refresh answered with {} calendar events", items.len());
            Ok(Self::Normalized(serde_json::from_value(value)?))
        } else {
            info!("Refresh answered with {} scraped records", items.len());
            parse_records(&value)
                .map(Self::Raw)
                .ok_or(EventsError::NotASequence)
        }
    }
}

pub struct EventsAPI;

impl EventsAPI {
    /**
    Loads the scraped dataset.
    * location: either an http(s) URL or a path to a local JSON file
    */
    #[tracing::instrument]
    pub async fn get_dataset(location: &str) -> Result<Value, EventsError> {
        let json_response = if is_url(location) {
            let response = REST_CLIENT.get(location).send().await?;

            check_status(response.status())?;
            response.text().await?
        } else {
            tokio::fs::read_to_string(location).await?
        };

        serde_json::from_str::<Value>(&json_response).map_err(|e| {
            error!("Dataset parse failed: {:?}", e);
            EventsError::from(e)
        })
    }

    /// Asks the scraper service to scrape again and return the new dataset
    #[tracing::instrument]
    pub async fn trigger_refresh(refresh_url: &str) -> Result<RefreshPayload, EventsError> {
        info!("Requesting a new scrape");

        let response = REST_CLIENT
            .post(refresh_url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        check_status(response.status())?;

        let json_response = response.text().await?;
        let value = serde_json::from_str::<Value>(&json_response)?;

        RefreshPayload::from_value(value)
    }
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn check_status(status: StatusCode) -> Result<(), EventsError> {
    if status.is_success() {
        return Ok(());
    }

    let reason = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string());

    warn!("Server answered {}", status);

    Err(EventsError::Status { status, reason })
}
