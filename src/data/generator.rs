//! Synthetic eye-health telemetry.
//!
//! The generator owns one history per signal and produces samples from
//! bounded uniform draws. Two modes are supported:
//!
//! - [`GeneratorMode::Daily`]: a day of hourly blink/drowsiness samples and a
//!   week of daily screen time, generated once at construction. Reads never
//!   change it.
//! - [`GeneratorMode::Rolling`]: fixed-size windows of per-minute samples.
//!   Every read of a signal appends a fresh sample and evicts the oldest one.
//!   Screen time accumulates across reads.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike, Weekday};
use eyewatch_types::{
    BlinkSample, CurrentMetrics, DrowsinessSample, DrowsinessScale, Insight, ScreenTimeReport,
    ScreenTimeSample, ScreenTimeSummary, SessionScreenTime,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::history::HistoryBuffer;
use super::insight;
use crate::config::GeneratorSettings;

/// Hourly samples kept by the daily snapshot.
const DAILY_HOURS: i64 = 24;

/// Days of screen-time history kept by the daily snapshot.
const WEEK_DAYS: i64 = 7;

/// Integer blink rates drawn in rolling mode.
const ROLLING_BLINK_RANGE: RangeInclusive<u32> = 10..=25;

/// Upper bound (exclusive) of rolling-mode drowsiness draws.
const ROLLING_DROWSINESS_MAX: f64 = 0.75;

/// Half-width of the daily drowsiness draw around its base level.
const DROWSINESS_SPREAD: f64 = 15.0;

/// Which history shape the generator keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorMode {
    /// Day/week snapshot generated at start-up.
    #[default]
    Daily,
    /// Per-minute windows that advance on every read.
    Rolling,
}

impl GeneratorMode {
    /// Unit used for drowsiness levels in this mode.
    pub fn drowsiness_scale(&self) -> DrowsinessScale {
        match self {
            GeneratorMode::Daily => DrowsinessScale::Percent,
            GeneratorMode::Rolling => DrowsinessScale::Fraction,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorMode::Daily => "daily",
            GeneratorMode::Rolling => "rolling",
        }
    }
}

impl fmt::Display for GeneratorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(GeneratorMode::Daily),
            "rolling" => Ok(GeneratorMode::Rolling),
            other => Err(format!(
                "unknown generator mode '{}' (expected 'daily' or 'rolling')",
                other
            )),
        }
    }
}

/// Blink-rate draw range for a given hour. Evenings are lower to mimic fatigue.
pub fn blink_range(hour: u32) -> RangeInclusive<f64> {
    if hour >= 18 {
        8.0..=15.0
    } else {
        10.0..=25.0
    }
}

/// Base drowsiness level (percent) for a given hour.
///
/// Highest at night and early morning, raised again in the post-lunch dip.
pub fn drowsiness_base(hour: u32) -> f64 {
    if hour >= 22 || hour <= 5 {
        60.0
    } else if (14..=16).contains(&hour) {
        50.0
    } else {
        20.0
    }
}

/// Screen-time draw range (hours) for a given weekday. Weekends run longer.
pub fn screen_time_range(weekday: Weekday) -> RangeInclusive<f64> {
    match weekday {
        Weekday::Sat | Weekday::Sun => 3.0..=10.0,
        _ => 2.0..=8.0,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn time_label(at: NaiveDateTime) -> String {
    at.format("%H:%M").to_string()
}

#[derive(Debug)]
enum ScreenTime {
    Daily(HistoryBuffer<ScreenTimeSample>),
    Session {
        total_minutes: f64,
        last_update: NaiveDateTime,
    },
}

/// Current metrics together with the insights derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub metrics: CurrentMetrics,
    pub insights: Vec<Insight>,
}

/// Stateful source of synthetic samples.
#[derive(Debug)]
pub struct MetricsGenerator {
    mode: GeneratorMode,
    rng: StdRng,
    clock: Arc<dyn Clock>,
    blink: HistoryBuffer<BlinkSample>,
    drowsiness: HistoryBuffer<DrowsinessSample>,
    screen: ScreenTime,
}

impl MetricsGenerator {
    /// Create a generator and pre-populate its histories.
    ///
    /// `window` is the capacity of the rolling-mode histories; the daily
    /// snapshot ignores it.
    pub fn new(mode: GeneratorMode, window: usize, rng: StdRng, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let (blink, drowsiness, screen) = match mode {
            GeneratorMode::Daily => (
                HistoryBuffer::unbounded(),
                HistoryBuffer::unbounded(),
                ScreenTime::Daily(HistoryBuffer::unbounded()),
            ),
            GeneratorMode::Rolling => (
                HistoryBuffer::bounded(window),
                HistoryBuffer::bounded(window),
                ScreenTime::Session {
                    total_minutes: 0.0,
                    last_update: now,
                },
            ),
        };

        let mut generator = Self {
            mode,
            rng,
            clock,
            blink,
            drowsiness,
            screen,
        };
        match mode {
            GeneratorMode::Daily => generator.fill_daily(now),
            GeneratorMode::Rolling => generator.fill_rolling(now, window),
        }
        generator
    }

    /// Create a generator from configuration, seeding the RNG if requested.
    pub fn from_settings(settings: &GeneratorSettings, clock: Arc<dyn Clock>) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(settings.mode, settings.window, rng, clock)
    }

    pub fn mode(&self) -> GeneratorMode {
        self.mode
    }

    /// Blink history as returned by the API.
    ///
    /// In rolling mode a fresh sample is appended first.
    pub fn blink_data(&mut self) -> Vec<BlinkSample> {
        if self.mode == GeneratorMode::Rolling {
            let now = self.clock.now();
            self.push_rolling_blink(now);
        }
        self.blink.to_vec()
    }

    /// Drowsiness history as returned by the API.
    ///
    /// In rolling mode a fresh sample is appended first.
    pub fn drowsiness_data(&mut self) -> Vec<DrowsinessSample> {
        if self.mode == GeneratorMode::Rolling {
            let now = self.clock.now();
            self.push_rolling_drowsiness(now);
        }
        self.drowsiness.to_vec()
    }

    /// Screen time as returned by the API.
    ///
    /// In rolling mode this advances the session counter by the wall time
    /// elapsed since the previous read, at most one minute per read.
    pub fn screen_time(&mut self) -> ScreenTimeReport {
        let now = self.clock.now();
        match &mut self.screen {
            ScreenTime::Daily(days) => ScreenTimeReport::Daily(days.to_vec()),
            ScreenTime::Session {
                total_minutes,
                last_update,
            } => {
                let elapsed = (now - *last_update).num_milliseconds() as f64 / 60_000.0;
                *last_update = now;
                *total_minutes += elapsed.clamp(0.0, 1.0);
                ScreenTimeReport::Session(SessionScreenTime::from_minutes(*total_minutes))
            }
        }
    }

    /// Snapshot of the latest readings.
    ///
    /// Empty histories read as zero. In rolling mode this counts as a
    /// screen-time read.
    pub fn current_metrics(&mut self) -> CurrentMetrics {
        let scale = self.mode.drowsiness_scale();
        let (blink_rate, is_healthy_blink) =
            self.blink.latest().map_or((0.0, false), |s| (s.value, s.is_healthy));
        let (drowsiness, is_drowsy) =
            self.drowsiness.latest().map_or((0.0, false), |s| (s.value, s.is_drowsy));

        let screen_time = match self.screen_time() {
            ScreenTimeReport::Daily(days) => {
                let total: f64 = days.iter().map(|d| d.hours).sum();
                let avg = if days.is_empty() {
                    0.0
                } else {
                    total / days.len() as f64
                };
                ScreenTimeSummary::Weekly {
                    avg_daily_hours: round1(avg),
                    total_weekly_hours: round1(total),
                }
            }
            ScreenTimeReport::Session(session) => ScreenTimeSummary::Session {
                hours: session.hours,
                minutes: session.minutes,
                total_minutes: session.total_minutes,
            },
        };

        CurrentMetrics {
            blink_rate,
            is_healthy_blink,
            drowsiness,
            drowsiness_scale: scale,
            is_drowsy,
            screen_time,
        }
    }

    /// Current metrics and the insights they trigger under this mode's rules.
    pub fn dashboard(&mut self) -> Dashboard {
        let metrics = self.current_metrics();
        let insights = insight::evaluate(insight::rules_for(self.mode), &metrics);
        Dashboard { metrics, insights }
    }

    /// Read-only view of the blink history.
    pub fn blink_history(&self) -> &HistoryBuffer<BlinkSample> {
        &self.blink
    }

    /// Read-only view of the drowsiness history.
    pub fn drowsiness_history(&self) -> &HistoryBuffer<DrowsinessSample> {
        &self.drowsiness
    }

    /// Per-day screen time, if this generator keeps one.
    pub fn screen_history(&self) -> Option<&HistoryBuffer<ScreenTimeSample>> {
        match &self.screen {
            ScreenTime::Daily(days) => Some(days),
            ScreenTime::Session { .. } => None,
        }
    }

    fn fill_daily(&mut self, now: NaiveDateTime) {
        let scale = DrowsinessScale::Percent;

        for i in 0..DAILY_HOURS {
            let at = now - TimeDelta::hours(DAILY_HOURS - i);
            let hour = at.hour();

            let blink_rate = round1(self.rng.gen_range(blink_range(hour)));
            self.blink.push(BlinkSample::new(time_label(at), blink_rate));

            let base = drowsiness_base(hour);
            let level = self
                .rng
                .gen_range((base - DROWSINESS_SPREAD)..=(base + DROWSINESS_SPREAD));
            let level = scale.clamp(round1(level));
            self.drowsiness
                .push(DrowsinessSample::new(time_label(at), level, scale));
        }

        if let ScreenTime::Daily(days) = &mut self.screen {
            for i in 0..WEEK_DAYS {
                let day = now - TimeDelta::days(WEEK_DAYS - 1 - i);
                let hours = round1(self.rng.gen_range(screen_time_range(day.weekday())));
                days.push(ScreenTimeSample::new(day.format("%a").to_string(), hours));
            }
        }
    }

    fn fill_rolling(&mut self, now: NaiveDateTime, window: usize) {
        for i in (1..=window as i64).rev() {
            let at = now - TimeDelta::minutes(i);
            self.push_rolling_blink(at);
            self.push_rolling_drowsiness(at);
        }
    }

    fn push_rolling_blink(&mut self, at: NaiveDateTime) {
        let blink_rate = self.rng.gen_range(ROLLING_BLINK_RANGE) as f64;
        self.blink.push(BlinkSample::new(time_label(at), blink_rate));
    }

    fn push_rolling_drowsiness(&mut self, at: NaiveDateTime) {
        let scale = DrowsinessScale::Fraction;
        let level = scale.clamp(self.rng.gen_range(0.0..ROLLING_DROWSINESS_MAX));
        self.drowsiness
            .push(DrowsinessSample::new(time_label(at), level, scale));
    }
}
