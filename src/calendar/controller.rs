use super::filter::filter_by_title;
use super::progress::{self, ProgressIndicator};
use super::view::CalendarView;
use crate::virgilio::api::{EventsAPI, EventsError, RefreshPayload};
use crate::virgilio::dto::RawRecord;
use crate::virgilio::model::NormalizedEvent;
use crate::virgilio::normalizer::{merge_records, parse_records, EventNormalizer};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

const LOAD_ERROR_PREFIX: &str = "Si è verificato un errore durante il caricamento degli eventi";

/// How scraped records coming back from a refresh combine with the ones already loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum RefreshMode {
    #[default]
    Replace,
    /// Only merges with records that were loaded as scraped records. Events that came
    /// back already normalized keep no records, so merging after them starts from scratch
    Merge,
}

/// Owns the loaded events and keeps the view in sync with them and with the current filter
pub struct CalendarController<V: CalendarView> {
    view: V,
    normalizer: EventNormalizer,
    records: Vec<RawRecord>,
    events: Vec<NormalizedEvent>,
    filter: String,
}

impl<V: CalendarView> CalendarController<V> {
    pub fn new(view: V, normalizer: EventNormalizer) -> Self {
        Self {
            view,
            normalizer,
            records: Vec::new(),
            events: Vec::new(),
            filter: String::new(),
        }
    }

    /// Sets the initial filter without rendering anything yet
    pub fn with_filter(mut self, term: &str) -> Self {
        self.filter = term.to_string();
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn events(&self) -> &[NormalizedEvent] {
        &self.events
    }

    pub fn visible_events(&self) -> Vec<NormalizedEvent> {
        filter_by_title(&self.events, &self.filter)
    }

    /**
       Fetches the dataset and renders it.
       Fetch failures are shown to the user, a payload that isn't a list is only logged
    */
    #[instrument(skip(self))]
    pub async fn initialize(&mut self, dataset: &str) -> Result<(), EventsError> {
        let data = match EventsAPI::get_dataset(dataset).await {
            Ok(data) => data,
            Err(err) => {
                error!("Failed loading events: {}", err);
                self.view.alert(&format!(
                    "{}: Errore nel caricamento degli eventi: {}",
                    LOAD_ERROR_PREFIX, err
                ));
                return Err(err);
            }
        };

        self.load(&data)
    }

    /// Replaces every loaded event with the ones in `data`
    pub fn load(&mut self, data: &Value) -> Result<(), EventsError> {
        let records = parse_records(data).ok_or(EventsError::NotASequence)?;

        self.records = records;
        self.events = self.normalizer.prepare_records(&self.records);

        info!("Loaded {} events", self.events.len());

        self.render();
        Ok(())
    }

    pub fn apply_filter(&mut self, term: &str) {
        self.filter = term.to_string();
        self.render();
    }

    /// Shows the details of the `index`-th visible event
    pub fn select_event(&mut self, index: usize) -> Option<NormalizedEvent> {
        let event = self.visible_events().into_iter().nth(index)?;

        self.view.notify(&event.details().to_string());

        Some(event)
    }

    /**
       Asks for a new scrape and swaps the events for its result.
       The returned handle finishes when the progress bar is hidden, which doesn't depend on the request
    */
    #[instrument(skip(self, indicator))]
    pub async fn refresh(
        &mut self,
        refresh_url: &str,
        mode: RefreshMode,
        indicator: Arc<dyn ProgressIndicator>,
        visible_window: Duration,
    ) -> JoinHandle<()> {
        let progress = progress::start(indicator, visible_window);

        match EventsAPI::trigger_refresh(refresh_url).await {
            Ok(payload) => self.apply_refresh(payload, mode),
            Err(err) => error!("Error updating events: {}", err),
        }

        progress
    }

    pub fn apply_refresh(&mut self, payload: RefreshPayload, mode: RefreshMode) {
        match payload {
            RefreshPayload::Normalized(events) => {
                self.records.clear();
                self.events = events;
            }
            RefreshPayload::Raw(records) => {
                self.records = match mode {
                    RefreshMode::Replace => records,
                    RefreshMode::Merge => merge_records(std::mem::take(&mut self.records), records),
                };
                self.events = self.normalizer.prepare_records(&self.records);
            }
        }

        info!("Refreshed to {} events", self.events.len());

        self.render();
    }

    fn render(&mut self) {
        let visible = self.visible_events();
        self.view.render(&visible);
    }
}
