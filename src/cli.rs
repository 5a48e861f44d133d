use crate::calendar::controller::RefreshMode;
use chrono::NaiveDate;
use clap::Parser;

/// Scraped Virgilio.it events on a month calendar
#[derive(Debug, Parser)]
#[command(name = "calendario-eventi")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dataset to load: a local JSON file or an http(s) URL
    #[arg(long, short)]
    pub dataset: Option<String>,

    /// Only show events whose title contains this text (case insensitive)
    #[arg(long, short, default_value = "")]
    pub filter: String,

    /// Month to show, as YYYY-MM. Defaults to the month of the first event
    #[arg(long, short, value_parser = parse_month)]
    pub month: Option<NaiveDate>,

    /// Print the events as JSON instead of drawing the calendar
    #[arg(long)]
    pub json: bool,

    /// Show the details of the N-th shown event (starting at 0)
    #[arg(long)]
    pub select: Option<usize>,

    /// Ask the scraper service for a new scrape after loading
    #[arg(long)]
    pub refresh: bool,

    /// What to do with scraped records returned by a refresh: replace or merge
    #[arg(long, default_value = "replace")]
    pub refresh_mode: RefreshMode,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,
}

pub fn parse_month(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a YYYY-MM month", value))
}
