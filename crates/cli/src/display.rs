// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text rendering of journey state and timeline entries.

use chrono::DateTime;
use trek_core::{CardKind, JourneyState, Phase, Progress, Route, TimelineCard, Unavailable};

/// Maximum characters of card text shown on one timeline line.
const SUMMARY_WIDTH: usize = 60;

/// Format epoch milliseconds as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_time(ms: i64) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => ms.to_string(),
    }
}

/// Format a span of milliseconds as `1h 02m`, `3m 05s` or `12s`.
///
/// Negative spans render as `0s`.
pub fn format_duration(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {:02}m", h, m)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Format metres, switching to kilometres from 1 km.
pub fn format_distance(metres: f64) -> String {
    if metres >= 1000.0 {
        format!("{:.1} km", metres / 1000.0)
    } else {
        format!("{:.0} m", metres)
    }
}

/// Human sentence for a journey that cannot be placed.
pub fn unavailable_message(reason: Unavailable) -> &'static str {
    match reason {
        Unavailable::NoStops => "no stops published yet",
        Unavailable::NotDeparted => "the journey has not departed yet",
        Unavailable::Finished => "the journey is over",
        Unavailable::NotSynced => "not synced with the server",
    }
}

fn stop_name(route: &Route, index: usize) -> String {
    route.get(index).map(|s| s.name().to_string()).unwrap_or_else(|| format!("#{}", index))
}

/// Multi-line summary of a progress query.
pub fn format_progress(progress: &Progress, route: &Route, now: i64) -> Vec<String> {
    match progress {
        Progress::Ready(state) => format_state(state, route, now),
        Progress::Unavailable(reason) => vec![unavailable_message(*reason).to_string()],
    }
}

fn format_state(state: &JourneyState, route: &Route, now: i64) -> Vec<String> {
    let mut lines = Vec::new();

    match (state.phase, state.stopover) {
        (Phase::AtStop, Some(index)) => {
            let mut line = format!("At {}", stop_name(route, index));
            if let Some(stop) = route.get(index) {
                let leaving = format_duration(stop.departure.saturating_sub(now));
                line.push_str(&format!(", leaving in {}", leaving));
            }
            lines.push(line);
        }
        _ => {
            let mut line = format!(
                "Flying {} -> {}",
                stop_name(route, state.prev),
                stop_name(route, state.next)
            );
            if let Some(next) = route.get(state.next) {
                let arriving = format_duration(next.arrival.saturating_sub(now));
                line.push_str(&format!(", arriving in {}", arriving));
            }
            lines.push(line);
        }
    }

    lines.push(format!(
        "  position:   {:.4},{:.4} heading {:.0}°",
        state.position.lat, state.position.lng, state.heading
    ));
    lines.push(format!("  presents:   {}", state.presents_delivered));
    lines.push(format!("  travelled:  {}", format_distance(state.distance_travelled)));
    if let Some(distance) = state.distance_to_user {
        lines.push(format!("  from you:   {}", format_distance(distance)));
    }
    if let Some(arrival) = state.user_arrival {
        lines.push(format!("  your stop:  {}", format_time(arrival)));
    }
    lines
}

/// Short human text for what a card shows.
pub fn card_summary(card: &TimelineCard, route: &Route) -> String {
    if let Some(stop_ref) = &card.stop {
        return match card.resolve_stop(route) {
            Some(stop) => match &stop.region {
                Some(region) => format!("{}, {}", stop.name(), region),
                None => stop.name().to_string(),
            },
            None => stop_ref.id.clone(),
        };
    }
    let Some(raw) = &card.card else {
        return String::new();
    };
    let text = match card.kind {
        CardKind::Video => raw.youtube_id.as_deref(),
        CardKind::Photo => raw.image_url.as_deref(),
        CardKind::Update => raw.status.as_deref(),
        CardKind::Facts => raw.did_you_know.as_deref(),
        CardKind::Game => raw.game.as_deref(),
        CardKind::City | CardKind::Plain => raw.status.as_deref(),
    };
    truncate(text.unwrap_or_default(), SUMMARY_WIDTH)
}

/// One timeline line: time, kind and summary.
pub fn format_card(card: &TimelineCard, route: &Route) -> String {
    let summary = card_summary(card, route);
    let line = format!("{}  {:<6}  {}", format_time(card.timestamp), card.kind.as_str(), summary);
    line.trim_end().to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
