//! Drink-window classification.
//!
//! A drink window is an inclusive year range during which a bottle is at its
//! best. [`classify`] turns a window and the current year into a
//! [`DrinkState`]; [`label`] renders it for display.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Earliest year accepted when a drink year is stored
pub const MIN_YEAR: i32 = 1900;

/// Latest year accepted when a drink year is stored
pub const MAX_YEAR: i32 = 2100;

/// Inclusive year range; either bound may be absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkWindow {
    #[serde(default)]
    pub from: Option<i32>,
    #[serde(default)]
    pub to: Option<i32>,
}

impl DrinkWindow {
    pub fn new(from: Option<i32>, to: Option<i32>) -> Self {
        Self { from, to }
    }

    /// Both bounds set and `from > to`
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }

    /// Bounds clamped to [`MIN_YEAR`]..=[`MAX_YEAR`]
    pub fn clamped(&self) -> Self {
        Self {
            from: self.from.map(clamp_year),
            to: self.to.map(clamp_year),
        }
    }

    pub fn classify(&self, current_year: i32) -> DrinkState {
        classify(*self, current_year)
    }
}

/// Readiness of a bottle in a given year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkState {
    NoWindow,
    TooEarly,
    Expired,
    ReadyNow,
}

/// Badge color family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Warn,
    Bad,
    Good,
}

impl DrinkState {
    /// Short badge text for listings
    pub fn badge(&self) -> &'static str {
        match self {
            DrinkState::NoWindow => "no window",
            DrinkState::TooEarly => "too early",
            DrinkState::Expired => "expired",
            DrinkState::ReadyNow => "drink now",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            DrinkState::NoWindow => Tone::Neutral,
            DrinkState::TooEarly => Tone::Warn,
            DrinkState::Expired => Tone::Bad,
            DrinkState::ReadyNow => Tone::Good,
        }
    }
}

/// Classify a window against the current year.
///
/// Rules are checked in order; a window whose `from` is still ahead is
/// `TooEarly` even when `to` has already passed.
pub fn classify(window: DrinkWindow, current_year: i32) -> DrinkState {
    match (window.from, window.to) {
        (None, None) => DrinkState::NoWindow,
        (Some(from), _) if current_year < from => DrinkState::TooEarly,
        (_, Some(to)) if current_year > to => DrinkState::Expired,
        _ => DrinkState::ReadyNow,
    }
}

/// Detail-view label for a state and its window
pub fn label(state: DrinkState, window: DrinkWindow) -> String {
    match (state, window.from, window.to) {
        (DrinkState::NoWindow, _, _) => "no drink window set".to_string(),
        (DrinkState::TooEarly, Some(from), _) => format!("too early (from {})", from),
        (DrinkState::Expired, _, Some(to)) => format!("expired (to {})", to),
        (DrinkState::ReadyNow, Some(from), Some(to)) => format!("ready now ({}–{})", from, to),
        (DrinkState::ReadyNow, Some(from), None) => format!("ready now (from {})", from),
        (DrinkState::ReadyNow, None, Some(to)) => format!("ready now (to {})", to),
        (state, _, _) => state.badge().to_string(),
    }
}

/// Everything a listing needs to render a drink badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkStatus {
    pub state: DrinkState,
    pub label: String,
    pub badge: String,
    pub tone: Tone,
}

impl DrinkStatus {
    pub fn of(window: DrinkWindow, current_year: i32) -> Self {
        let state = classify(window, current_year);
        Self {
            state,
            label: label(state, window),
            badge: state.badge().to_string(),
            tone: state.tone(),
        }
    }
}

/// Clamp a stored year to [`MIN_YEAR`]..=[`MAX_YEAR`]
pub fn clamp_year(year: i32) -> i32 {
    year.clamp(MIN_YEAR, MAX_YEAR)
}

/// Parse user input into a storable year; blank or unparsable input is unset
pub fn parse_year(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().map(clamp_year)
}

/// Current calendar year in local time
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
