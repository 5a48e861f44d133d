use crate::virgilio::model::NormalizedEvent;

/// Events whose title contains `term`, ignoring case. An empty term keeps everything
pub fn filter_by_title(events: &[NormalizedEvent], term: &str) -> Vec<NormalizedEvent> {
    let term = term.to_lowercase();

    events
        .iter()
        .filter(|event| event.title.to_lowercase().contains(&term))
        .cloned()
        .collect()
}
