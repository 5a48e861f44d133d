use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Delay before the bar jumps to full width, so the empty state is visible
pub const FILL_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_VISIBLE_WINDOW: Duration = Duration::from_secs(10);

/// Purely cosmetic loading bar. It never reflects real request progress
pub trait ProgressIndicator: Send + Sync {
    fn show(&self);
    fn set_width(&self, percent: u8);
    fn hide(&self);
}

/**
   Shows the bar empty, fills it after [`FILL_DELAY`] and hides it once `visible_window`
   has passed since the start, whatever happened to the request meanwhile
*/
pub fn start(indicator: Arc<dyn ProgressIndicator>, visible_window: Duration) -> JoinHandle<()> {
    indicator.set_width(0);
    indicator.show();

    tokio::spawn(async move {
        tokio::time::sleep(FILL_DELAY).await;
        indicator.set_width(100);

        tokio::time::sleep(visible_window.saturating_sub(FILL_DELAY)).await;
        indicator.set_width(0);
        indicator.hide();

        trace!("Progress bar hidden");
    })
}

pub struct TerminalProgress;

impl TerminalProgress {
    const WIDTH: usize = 30;

    fn print(&self, text: &str) {
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "\r{}", text);
        let _ = stderr.flush();
    }
}

impl ProgressIndicator for TerminalProgress {
    fn show(&self) {
        self.print("Aggiornamento eventi ");
    }

    fn set_width(&self, percent: u8) {
        let filled = Self::WIDTH * usize::from(percent.min(100)) / 100;

        self.print(&format!(
            "Aggiornamento eventi [{}{}] {:>3}%",
            "#".repeat(filled),
            " ".repeat(Self::WIDTH - filled),
            percent
        ));
    }

    fn hide(&self) {
        self.print(&format!("{}\r", " ".repeat(Self::WIDTH + 30)));
    }
}
