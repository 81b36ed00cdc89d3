use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Success,
    Error,
}

/// A transient, already-localized message for the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Holds at most one message; a newer message replaces the old one and restarts its timer.
#[derive(Clone, Debug)]
pub struct StatusLine {
    duration: Duration,
    shown: Option<(StatusMessage, Instant)>,
}

impl StatusLine {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            shown: None,
        }
    }

    pub fn show(&mut self, kind: StatusKind, text: &str, now: Instant) -> StatusMessage {
        let msg = StatusMessage {
            kind,
            text: text.to_owned(),
        };
        self.shown = Some((msg.clone(), now));
        msg
    }

    /// The visible message at `now`, if it has not yet been dismissed.
    pub fn current(&self, now: Instant) -> Option<&StatusMessage> {
        self.shown
            .as_ref()
            .filter(|(_, at)| now.saturating_duration_since(*at) < self.duration)
            .map(|(msg, _)| msg)
    }

    pub fn dismiss_expired(&mut self, now: Instant) {
        if self.current(now).is_none() {
            self.shown = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/status.rs"]
mod tests;
