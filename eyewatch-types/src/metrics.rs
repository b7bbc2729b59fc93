//! Snapshot of the most recent readings.

use core::fmt;

/// Unit in which a drowsiness level is expressed.
///
/// Percent levels live in `[0, 100]`, fraction levels in `[0, 1]`. The scale
/// always travels with the value so consumers never have to guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DrowsinessScale {
    Percent,
    Fraction,
}

impl DrowsinessScale {
    /// Upper bound of the scale.
    pub const fn max(&self) -> f64 {
        match self {
            DrowsinessScale::Percent => 100.0,
            DrowsinessScale::Fraction => 1.0,
        }
    }

    /// Level at or above which a reading counts as drowsy.
    pub const fn drowsy_threshold(&self) -> f64 {
        match self {
            DrowsinessScale::Percent => 60.0,
            DrowsinessScale::Fraction => 0.6,
        }
    }

    /// Clamp a raw level into `[0, max]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(0.0, self.max())
    }

    /// Convert a level on this scale to a percentage.
    pub fn to_percent(&self, value: f64) -> f64 {
        match self {
            DrowsinessScale::Percent => value,
            DrowsinessScale::Fraction => value * 100.0,
        }
    }
}

/// Screen-time figure carried by [`CurrentMetrics`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum ScreenTimeSummary {
    /// Derived from a week of per-day history.
    Weekly {
        avg_daily_hours: f64,
        total_weekly_hours: f64,
    },
    /// Accumulated since the process started.
    Session {
        hours: u64,
        minutes: u64,
        total_minutes: f64,
    },
}

/// A single measurable quantity of [`CurrentMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    BlinkRate,
    Drowsiness,
    AverageDailyScreenHours,
    SessionScreenMinutes,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::BlinkRate => "blink_rate",
            Metric::Drowsiness => "drowsiness",
            Metric::AverageDailyScreenHours => "avg_daily_screen_hours",
            Metric::SessionScreenMinutes => "session_screen_minutes",
        };
        f.write_str(name)
    }
}

/// Derived, ephemeral view of the latest readings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrentMetrics {
    /// Latest blink rate (blinks per minute).
    pub blink_rate: f64,

    /// Health flag of the latest blink sample.
    pub is_healthy_blink: bool,

    /// Latest drowsiness level.
    pub drowsiness: f64,

    /// Scale of `drowsiness`.
    pub drowsiness_scale: DrowsinessScale,

    /// Drowsy flag of the latest drowsiness sample.
    pub is_drowsy: bool,

    /// Screen-time figure.
    pub screen_time: ScreenTimeSummary,
}

impl CurrentMetrics {
    /// Value of a single metric, if this snapshot carries it.
    ///
    /// Weekly and session screen time are mutually exclusive, so exactly one of
    /// the two screen-time metrics is `None`.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match (metric, self.screen_time) {
            (Metric::BlinkRate, _) => Some(self.blink_rate),
            (Metric::Drowsiness, _) => Some(self.drowsiness),
            (Metric::AverageDailyScreenHours, ScreenTimeSummary::Weekly { avg_daily_hours, .. }) => {
                Some(avg_daily_hours)
            }
            (Metric::SessionScreenMinutes, ScreenTimeSummary::Session { total_minutes, .. }) => {
                Some(total_minutes)
            }
            _ => None,
        }
    }

    /// Drowsiness as a percentage regardless of scale.
    pub fn drowsiness_percent(&self) -> f64 {
        self.drowsiness_scale.to_percent(self.drowsiness)
    }
}
