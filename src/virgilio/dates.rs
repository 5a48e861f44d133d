use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

lazy_static! {
    static ref DATE_RANGE: Regex =
        Regex::new(r"Dal (\d{1,2})/(\d{1,2}) al (\d{1,2})/(\d{1,2})").unwrap();
    static ref MONTH_NAME_DATE: Regex = Regex::new(r"^(\d{1,2}) (\w{3})$").unwrap();
    static ref MONTH_NAME_RANGE: Regex =
        Regex::new(r"^Dal (\d{1,2}) (\w{3}) [Aa]l (\d{1,2}) (\w{3})").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

const ISO_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("'{0}' is not a day/month date")]
    Malformed(String),
    #[error("'{date}' doesn't exist in {year}")]
    NoSuchDay { date: String, year: i32 },
}

/// Month abbreviations as printed on Virgilio.it event pages
#[derive(strum::EnumString, strum::IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItalianMonth {
    Gen = 1,
    Feb,
    Mar,
    Apr,
    Mag,
    Giu,
    Lug,
    Ago,
    Set,
    Ott,
    Nov,
    Dic,
}

impl ItalianMonth {
    pub fn number(self) -> u32 {
        self as u32
    }
}

/**
   Rewrites dates with month abbreviations into the numeric form:
   "12 Nov" becomes "12/11", "Dal 1 Nov Al 3 Dic" becomes "Dal 1/11 al 3/12".
   Anything else is returned untouched.
*/
pub fn canonicalize_date(text: &str) -> Cow<'_, str> {
    let collapsed = WHITESPACE.replace_all(text.trim(), " ");

    if let Some(captures) = MONTH_NAME_DATE.captures(&collapsed) {
        if let Some(date) = day_month(&captures[1], &captures[2]) {
            return Cow::Owned(date);
        }
    } else if let Some(captures) = MONTH_NAME_RANGE.captures(&collapsed) {
        if let (Some(start), Some(end)) = (
            day_month(&captures[1], &captures[2]),
            day_month(&captures[3], &captures[4]),
        ) {
            return Cow::Owned(format!("Dal {} al {}", start, end));
        }
    }

    Cow::Borrowed(text)
}

fn day_month(day: &str, month: &str) -> Option<String> {
    let day: u32 = day.parse().ok()?;
    let month = ItalianMonth::from_str(month).ok()?;

    Some(format!("{}/{:02}", day, month.number()))
}

pub fn is_date_range(text: &str) -> bool {
    DATE_RANGE.is_match(text)
}

/**
   Expands "Dal D/M al D/M" into every day of the inclusive range.
   Returns an empty list when the text isn't a range, or when the range ends before it starts
*/
pub fn parse_date_range(text: &str, year: i32) -> Vec<String> {
    let Some(captures) = DATE_RANGE.captures(text) else {
        return Vec::new();
    };

    let number = |index: usize| captures[index].parse::<u32>().unwrap_or_default();

    let start = NaiveDate::from_ymd_opt(year, number(2), number(1));
    let end = NaiveDate::from_ymd_opt(year, number(4), number(3));

    match (start, end) {
        (Some(start), Some(end)) => start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|day| day.format(ISO_FORMAT).to_string())
            .collect(),
        _ => {
            warn!("Range '{}' has a day that doesn't exist in {}", text, year);
            Vec::new()
        }
    }
}

/// Turns "D/M" into "YYYY-MM-DD". A trailing year component, if any, is ignored
pub fn format_date_to_iso(date: &str, year: i32) -> Result<String, DateError> {
    let malformed = || DateError::Malformed(date.to_string());

    let mut parts = date.split('/').map(str::trim);
    let day: u32 = parts
        .next()
        .and_then(|day| day.parse().ok())
        .ok_or_else(malformed)?;
    let month: u32 = parts
        .next()
        .and_then(|month| month.parse().ok())
        .ok_or_else(malformed)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .map(|day| day.format(ISO_FORMAT).to_string())
        .ok_or_else(|| DateError::NoSuchDay {
            date: date.to_string(),
            year,
        })
}
