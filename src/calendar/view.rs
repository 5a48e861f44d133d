use crate::virgilio::model::NormalizedEvent;
use chrono::{Datelike, Months, NaiveDate};
use itertools::Itertools;
use std::io::Write;
use tracing::{trace, warn};

const ITALIAN_MONTHS: [&str; 12] = [
    "Gennaio",
    "Febbraio",
    "Marzo",
    "Aprile",
    "Maggio",
    "Giugno",
    "Luglio",
    "Agosto",
    "Settembre",
    "Ottobre",
    "Novembre",
    "Dicembre",
];

const WEEKDAYS: &str = "Lun Mar Mer Gio Ven Sab Dom";

/// Where the calendar ends up. Every call to `render` replaces what was shown before
pub trait CalendarView {
    fn render(&mut self, events: &[NormalizedEvent]);

    /// Blocking, user visible error
    fn alert(&mut self, message: &str);

    /// One-shot message, e.g. the details of a selected event
    fn notify(&mut self, message: &str);
}

pub fn month_to_italian_display(date: NaiveDate) -> String {
    format!("{} {}", ITALIAN_MONTHS[date.month0() as usize], date.year())
}

pub fn parse_start(event: &NormalizedEvent) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&event.start, "%Y-%m-%d").ok()
}

/// Month grid on a terminal, one month at a time
pub struct TerminalCalendar<W: Write> {
    out: W,
    month: Option<NaiveDate>,
}

impl<W: Write> TerminalCalendar<W> {
    /// `month`: any day of the month to show; defaults to the month of the first event
    pub fn new(out: W, month: Option<NaiveDate>) -> Self {
        Self {
            out,
            month: month.and_then(|day| day.with_day(1)),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(err) = self.out.write_all(text.as_bytes()) {
            warn!("Couldn't write calendar: {}", err);
        }
    }

    fn draw(&self, first: NaiveDate, events: &[NormalizedEvent]) -> String {
        let next_month = first + Months::new(1);
        let days_in_month = next_month.signed_duration_since(first).num_days() as u32;
        let by_day = events
            .iter()
            .filter_map(|event| parse_start(event).map(|day| (day, event)))
            .filter(|(day, _)| *day >= first && *day < next_month)
            .into_group_map_by(|(day, _)| day.day());

        let mut grid = format!("{:^27}\n{}\n", month_to_italian_display(first), WEEKDAYS);
        let offset = first.weekday().num_days_from_monday() as usize;
        grid.push_str(&"    ".repeat(offset));

        for day in 1..=days_in_month {
            let marker = if by_day.contains_key(&day) { '*' } else { ' ' };
            grid.push_str(&format!("{:>2}{} ", day, marker));

            if (offset + day as usize) % 7 == 0 {
                grid.push('\n');
            }
        }
        grid.push_str("\n\n");

        for day in by_day.keys().sorted() {
            for (_, event) in &by_day[day] {
                grid.push_str(&format!(
                    "{:>2}  \x1b[1m{}\x1b[0m\n    {}\n",
                    day,
                    event.title,
                    event.summary()
                ));
            }
        }

        grid
    }
}

impl<W: Write> CalendarView for TerminalCalendar<W> {
    fn render(&mut self, events: &[NormalizedEvent]) {
        trace!("Rendering {} events", events.len());

        let first = self
            .month
            .or_else(|| events.iter().find_map(parse_start))
            .and_then(|day| day.with_day(1));

        match first {
            Some(first) => {
                let grid = self.draw(first, events);
                self.write(&grid);
            }
            None => self.write("Nessun evento\n"),
        }
    }

    fn alert(&mut self, message: &str) {
        self.write(&format!("\x1b[31m{}\x1b[0m\n", message));
    }

    fn notify(&mut self, message: &str) {
        self.write(&format!("{}\n", message));
    }
}

/// Prints the events in the JSON shape web calendar widgets take as an event source
pub struct JsonCalendar<W: Write> {
    out: W,
}

impl<W: Write> JsonCalendar<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> CalendarView for JsonCalendar<W> {
    fn render(&mut self, events: &[NormalizedEvent]) {
        if let Err(err) = serde_json::to_writer_pretty(&mut self.out, events) {
            warn!("Couldn't write events: {}", err);
        }
        if let Err(err) = writeln!(self.out) {
            warn!("Couldn't write events: {}", err);
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}
