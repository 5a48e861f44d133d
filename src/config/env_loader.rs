use crate::calendar::progress::DEFAULT_VISIBLE_WINDOW;
use crate::config::model::Config;
use crate::virgilio::normalizer::DEFAULT_REFERENCE_YEAR;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATASET: &str = "Eventi_Virgilio.it_selenium.json";
pub const DEFAULT_REFRESH_URL: &str = "http://127.0.0.1:5000/update-events";

pub fn load_config() -> Config {
    let dataset = load_string_config("EVENTS_DATASET", DEFAULT_DATASET);
    let refresh_url = load_string_config("EVENTS_REFRESH_URL", DEFAULT_REFRESH_URL);
    let reference_year = load_number_config::<i32>("EVENTS_REFERENCE_YEAR", "a year")
        .unwrap_or(DEFAULT_REFERENCE_YEAR);
    let progress_window = load_number_config::<u64>("PROGRESS_VISIBLE_SECS", "a number of seconds")
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_VISIBLE_WINDOW);

    Config {
        dataset,
        refresh_url,
        reference_year,
        progress_window,
    }
}

fn load_string_config(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn load_number_config<T: FromStr>(name: &str, expected: &str) -> Option<T> {
    let value = env::var(name).ok()?;

    Some(
        value
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("Invalid config '{}'. Expected {}.", name, expected)),
    )
}
