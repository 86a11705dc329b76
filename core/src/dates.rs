//! Randomized mediation windows.
//!
//! Every submission gets a fresh window a few days in the future:
//!   end   = now + end_delta days
//!   start = end + start_delta days
//! with both deltas drawn from [1, 10]. The start therefore always lands
//! after the end, matching what the remote form has historically accepted.

use crate::{rng::RunRng, template::CaseTemplate};
use chrono::{Duration, Local, NaiveDateTime};

pub const WINDOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const MIN_DELTA_DAYS: u64 = 1;
pub const MAX_DELTA_DAYS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end:   NaiveDateTime,
}

impl DateWindow {
    pub fn start_str(&self) -> String {
        self.start.format(WINDOW_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(WINDOW_FORMAT).to_string()
    }
}

/// Draw a window relative to `now`, keeping now's time of day.
pub fn random_window(now: NaiveDateTime, rng: &mut RunRng) -> DateWindow {
    let start_delta = rng.range_inclusive(MIN_DELTA_DAYS, MAX_DELTA_DAYS) as i64;
    let end_delta = rng.range_inclusive(MIN_DELTA_DAYS, MAX_DELTA_DAYS) as i64;
    let end = now + Duration::days(end_delta);
    DateWindow {
        start: end + Duration::days(start_delta),
        end,
    }
}

pub struct DateInjector {
    rng:   RunRng,
    drawn: u64,
}

impl DateInjector {
    pub fn new(rng: RunRng) -> Self {
        Self { rng, drawn: 0 }
    }

    /// Number of windows injected so far.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Overwrite the template's window using the current local time.
    pub fn inject(&mut self, template: &mut CaseTemplate) -> DateWindow {
        self.inject_at(template, Local::now().naive_local())
    }

    pub fn inject_at(&mut self, template: &mut CaseTemplate, now: NaiveDateTime) -> DateWindow {
        let window = random_window(now, &mut self.rng);
        self.drawn += 1;
        template.set_window(window.start_str(), window.end_str());
        log::debug!("Mediation window: {} -> {}", template.start_time, template.end_time);
        window
    }
}
