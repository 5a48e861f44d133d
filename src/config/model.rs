use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Path or URL of the scraped dataset
    pub dataset: String,
    pub refresh_url: String,
    pub reference_year: i32,
    pub progress_window: Duration,
}
