//! Individual time-series samples.

use crate::{DrowsinessScale, EXCESSIVE_SCREEN_HOURS, HEALTHY_BLINK_RATE};

/// A single blink-rate reading.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlinkSample {
    /// Wall-clock label (`HH:MM`).
    pub timestamp: String,

    /// Blinks per minute.
    pub value: f64,

    /// Whether the rate is within the healthy range.
    pub is_healthy: bool,
}

impl BlinkSample {
    /// Create a sample, deriving the health flag from the value.
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
            is_healthy: value >= HEALTHY_BLINK_RATE,
        }
    }
}

/// A single drowsiness reading.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrowsinessSample {
    /// Wall-clock label (`HH:MM`).
    pub timestamp: String,

    /// Drowsiness level, expressed on the sample's scale.
    pub value: f64,

    /// Whether the level crosses the drowsy threshold of its scale.
    pub is_drowsy: bool,
}

impl DrowsinessSample {
    /// Create a sample, deriving the drowsy flag from the value and its scale.
    pub fn new(timestamp: impl Into<String>, value: f64, scale: DrowsinessScale) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
            is_drowsy: value >= scale.drowsy_threshold(),
        }
    }
}

/// Screen usage for one calendar day.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenTimeSample {
    /// Abbreviated weekday (`Mon`, `Tue`, ...).
    pub day: String,

    /// Hours spent in front of a screen.
    pub hours: f64,

    /// Whether the day exceeds the recommended screen time.
    pub is_excessive: bool,
}

impl ScreenTimeSample {
    /// Create a sample, deriving the excessive flag from the hours.
    pub fn new(day: impl Into<String>, hours: f64) -> Self {
        Self {
            day: day.into(),
            hours,
            is_excessive: hours > EXCESSIVE_SCREEN_HOURS,
        }
    }
}

/// Cumulative screen time of the running session.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionScreenTime {
    /// Whole hours.
    pub hours: u64,

    /// Remaining whole minutes (`0..60`).
    pub minutes: u64,

    /// Unrounded total in minutes.
    pub total_minutes: f64,
}

impl SessionScreenTime {
    /// Split a minute total into hours and minutes.
    pub fn from_minutes(total_minutes: f64) -> Self {
        let total = total_minutes.max(0.0);
        let whole = total.floor() as u64;
        Self {
            hours: whole / 60,
            minutes: whole % 60,
            total_minutes: total,
        }
    }
}

/// Screen-time payload as returned by the API.
///
/// Daily history and session totals have different shapes, so the report
/// serializes as whichever one the generator keeps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ScreenTimeReport {
    /// One entry per day, oldest first.
    Daily(Vec<ScreenTimeSample>),
    /// Running total since the process started.
    Session(SessionScreenTime),
}
