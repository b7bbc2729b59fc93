//! Threshold rules that turn current metrics into insights.
//!
//! A rule set is an ordered table. Evaluation walks the whole table and keeps
//! every rule whose band contains its metric's value, so output order is
//! declaration order and no rule can hide another. Rules for the same metric
//! are written as disjoint bands.

use std::ops::{Bound, RangeBounds};

use eyewatch_types::{CurrentMetrics, Insight, Metric, Severity};
use tracing::trace;

use super::generator::GeneratorMode;

/// Placeholder replaced by the metric value (one decimal) when rendering.
const VALUE_PLACEHOLDER: &str = "{value}";

/// A range of metric values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower: Bound<f64>,
    pub upper: Bound<f64>,
}

impl Band {
    /// `value < limit`
    pub const fn below(limit: f64) -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Excluded(limit),
        }
    }

    /// `value > limit`
    pub const fn above(limit: f64) -> Self {
        Self {
            lower: Bound::Excluded(limit),
            upper: Bound::Unbounded,
        }
    }

    /// `value >= limit`
    pub const fn at_least(limit: f64) -> Self {
        Self {
            lower: Bound::Included(limit),
            upper: Bound::Unbounded,
        }
    }

    /// Arbitrary bounds.
    pub const fn new(lower: Bound<f64>, upper: Bound<f64>) -> Self {
        Self { lower, upper }
    }
}

impl RangeBounds<f64> for Band {
    fn start_bound(&self) -> Bound<&f64> {
        self.lower.as_ref()
    }

    fn end_bound(&self) -> Bound<&f64> {
        self.upper.as_ref()
    }
}

/// One threshold rule: when `metric` falls in `band`, emit `message` at `severity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsightRule {
    pub metric: Metric,
    pub band: Band,
    pub severity: Severity,
    pub message: &'static str,
}

impl InsightRule {
    /// Apply the rule to a snapshot.
    ///
    /// Returns `None` when the metric is absent or outside the band.
    pub fn apply(&self, metrics: &CurrentMetrics) -> Option<Insight> {
        let value = metrics.value(self.metric)?;
        if !self.band.contains(&value) {
            return None;
        }
        trace!(metric = %self.metric, value, severity = %self.severity, "Insight rule matched");
        let message = if self.message.contains(VALUE_PLACEHOLDER) {
            self.message
                .replace(VALUE_PLACEHOLDER, &format!("{:.1}", value))
        } else {
            self.message.to_string()
        };
        Some(Insight::new(self.severity, message))
    }
}

/// Evaluate a rule table against a snapshot.
pub fn evaluate(rules: &[InsightRule], metrics: &CurrentMetrics) -> Vec<Insight> {
    rules.iter().filter_map(|rule| rule.apply(metrics)).collect()
}

/// The rule table matching a generator mode's units.
pub fn rules_for(mode: GeneratorMode) -> &'static [InsightRule] {
    match mode {
        GeneratorMode::Daily => DAILY_RULES,
        GeneratorMode::Rolling => ROLLING_RULES,
    }
}

/// Rules for the daily snapshot (percent drowsiness, weekly screen time).
pub const DAILY_RULES: &[InsightRule] = &[
    InsightRule {
        metric: Metric::BlinkRate,
        band: Band::below(12.0),
        severity: Severity::Warning,
        message: "Your blink rate is very low. This may cause dry eyes and discomfort.",
    },
    InsightRule {
        metric: Metric::BlinkRate,
        band: Band::new(Bound::Included(12.0), Bound::Excluded(15.0)),
        severity: Severity::Info,
        message: "Your blink rate is slightly below the healthy range. Try to blink more often.",
    },
    InsightRule {
        metric: Metric::BlinkRate,
        band: Band::above(25.0),
        severity: Severity::Info,
        message: "Your blink rate is unusually high. This may indicate eye irritation.",
    },
    InsightRule {
        metric: Metric::BlinkRate,
        band: Band::new(Bound::Included(15.0), Bound::Included(25.0)),
        severity: Severity::Success,
        message: "Your blink rate is within the healthy range. Keep it up!",
    },
    InsightRule {
        metric: Metric::Drowsiness,
        band: Band::at_least(70.0),
        severity: Severity::Danger,
        message: "High drowsiness detected! Take a break immediately.",
    },
    InsightRule {
        metric: Metric::Drowsiness,
        band: Band::new(Bound::Included(50.0), Bound::Excluded(70.0)),
        severity: Severity::Warning,
        message: "Moderate drowsiness detected. Consider taking a short break.",
    },
    InsightRule {
        metric: Metric::AverageDailyScreenHours,
        band: Band::above(6.0),
        severity: Severity::Warning,
        message: "Your daily screen time ({value} hours) is higher than recommended.",
    },
];

/// Rules for the rolling window (fraction drowsiness, session screen time).
pub const ROLLING_RULES: &[InsightRule] = &[
    InsightRule {
        metric: Metric::BlinkRate,
        band: Band::below(12.0),
        severity: Severity::Warning,
        message: "Your blink rate is below normal levels. Consider taking a break and doing eye exercises.",
    },
    InsightRule {
        metric: Metric::BlinkRate,
        band: Band::above(20.0),
        severity: Severity::Info,
        message: "Your blink rate is good, indicating your eyes are well-hydrated.",
    },
    InsightRule {
        metric: Metric::BlinkRate,
        band: Band::new(Bound::Included(12.0), Bound::Included(20.0)),
        severity: Severity::Info,
        message: "Your blink rate is within normal range.",
    },
    InsightRule {
        metric: Metric::Drowsiness,
        band: Band::above(0.6),
        severity: Severity::Warning,
        message: "High drowsiness detected. Consider taking a break or getting some rest.",
    },
    InsightRule {
        metric: Metric::Drowsiness,
        band: Band::new(Bound::Excluded(0.3), Bound::Included(0.6)),
        severity: Severity::Info,
        message: "Moderate drowsiness detected. Consider short break to refresh your eyes.",
    },
    InsightRule {
        metric: Metric::SessionScreenMinutes,
        band: Band::above(120.0),
        severity: Severity::Warning,
        message: "You have been using the screen for over 2 hours. Consider a 20-minute break.",
    },
    InsightRule {
        metric: Metric::SessionScreenMinutes,
        band: Band::new(Bound::Excluded(60.0), Bound::Included(120.0)),
        severity: Severity::Info,
        message: "You have been using the screen for over an hour. Consider a short break.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use eyewatch_types::{DrowsinessScale, ScreenTimeSummary};
    use pretty_assertions::assert_eq;

    fn daily(blink_rate: f64, drowsiness: f64, avg_daily_hours: f64) -> CurrentMetrics {
        CurrentMetrics {
            blink_rate,
            is_healthy_blink: blink_rate >= 15.0,
            drowsiness,
            drowsiness_scale: DrowsinessScale::Percent,
            is_drowsy: drowsiness >= 60.0,
            screen_time: ScreenTimeSummary::Weekly {
                avg_daily_hours,
                total_weekly_hours: avg_daily_hours * 7.0,
            },
        }
    }

    fn rolling(blink_rate: f64, drowsiness: f64, total_minutes: f64) -> CurrentMetrics {
        CurrentMetrics {
            blink_rate,
            is_healthy_blink: blink_rate >= 15.0,
            drowsiness,
            drowsiness_scale: DrowsinessScale::Fraction,
            is_drowsy: drowsiness >= 0.6,
            screen_time: ScreenTimeSummary::Session {
                hours: (total_minutes / 60.0) as u64,
                minutes: (total_minutes % 60.0) as u64,
                total_minutes,
            },
        }
    }

    fn severities(insights: &[Insight]) -> Vec<Severity> {
        insights.iter().map(|i| i.severity).collect()
    }

    #[test]
    fn band_bounds_are_respected() {
        let band = Band::new(Bound::Included(12.0), Bound::Excluded(15.0));
        assert!(band.contains(&12.0));
        assert!(band.contains(&14.99));
        assert!(!band.contains(&15.0));
        assert!(Band::below(12.0).contains(&-1.0));
        assert!(!Band::above(25.0).contains(&25.0));
        assert!(Band::at_least(70.0).contains(&70.0));
    }

    #[test]
    fn daily_blink_bands_are_exhaustive_and_disjoint() {
        for tenths in 0..400 {
            let value = tenths as f64 / 10.0;
            let blink_insights = evaluate(DAILY_RULES, &daily(value, 0.0, 0.0));
            assert_eq!(blink_insights.len(), 1, "blink rate {}", value);
        }
    }

    #[test]
    fn healthy_day_yields_single_success() {
        let insights = evaluate(DAILY_RULES, &daily(18.0, 30.0, 4.0));
        assert_eq!(
            insights,
            vec![Insight::new(
                Severity::Success,
                "Your blink rate is within the healthy range. Keep it up!"
            )]
        );
    }

    #[test]
    fn bad_day_reports_every_metric_in_declaration_order() {
        let insights = evaluate(DAILY_RULES, &daily(9.5, 72.0, 7.3));
        assert_eq!(
            severities(&insights),
            vec![Severity::Warning, Severity::Danger, Severity::Warning]
        );
        assert_eq!(
            insights[2].message,
            "Your daily screen time (7.3 hours) is higher than recommended."
        );
    }

    #[test]
    fn daily_boundaries_match_thresholds() {
        assert_eq!(severities(&evaluate(DAILY_RULES, &daily(12.0, 0.0, 0.0))), vec![Severity::Info]);
        assert_eq!(severities(&evaluate(DAILY_RULES, &daily(15.0, 0.0, 0.0))), vec![Severity::Success]);
        assert_eq!(severities(&evaluate(DAILY_RULES, &daily(25.0, 0.0, 0.0))), vec![Severity::Success]);
        assert_eq!(severities(&evaluate(DAILY_RULES, &daily(25.1, 0.0, 0.0))), vec![Severity::Info]);

        let moderate = evaluate(DAILY_RULES, &daily(18.0, 50.0, 6.0));
        assert_eq!(severities(&moderate), vec![Severity::Success, Severity::Warning]);
    }

    #[test]
    fn evaluation_is_pure() {
        let metrics = daily(11.0, 65.0, 6.5);
        let first = evaluate(DAILY_RULES, &metrics);
        let second = evaluate(DAILY_RULES, &metrics);
        assert_eq!(first, second);
    }

    #[test]
    fn rolling_rules_use_fraction_and_session_minutes() {
        let insights = evaluate(ROLLING_RULES, &rolling(22.0, 0.45, 95.0));
        assert_eq!(
            insights,
            vec![
                Insight::new(
                    Severity::Info,
                    "Your blink rate is good, indicating your eyes are well-hydrated."
                ),
                Insight::new(
                    Severity::Info,
                    "Moderate drowsiness detected. Consider short break to refresh your eyes."
                ),
                Insight::new(
                    Severity::Info,
                    "You have been using the screen for over an hour. Consider a short break."
                ),
            ]
        );
    }

    #[test]
    fn rolling_boundaries_match_thresholds() {
        assert_eq!(severities(&evaluate(ROLLING_RULES, &rolling(20.0, 0.3, 60.0))), vec![Severity::Info]);
        let heavy = evaluate(ROLLING_RULES, &rolling(10.0, 0.61, 121.0));
        assert_eq!(
            severities(&heavy),
            vec![Severity::Warning, Severity::Warning, Severity::Warning]
        );
    }

    #[test]
    fn rules_for_absent_metrics_never_fire() {
        // Weekly screen time is not part of a session snapshot and vice versa.
        let session = rolling(18.0, 0.0, 500.0);
        assert!(evaluate(DAILY_RULES, &session)
            .iter()
            .all(|i| !i.message.contains("daily screen time")));

        let weekly = daily(18.0, 0.0, 9.0);
        assert!(evaluate(ROLLING_RULES, &weekly)
            .iter()
            .all(|i| !i.message.contains("using the screen")));
    }

    #[test]
    fn rules_for_selects_table_by_mode() {
        assert_eq!(rules_for(GeneratorMode::Daily).len(), DAILY_RULES.len());
        assert_eq!(rules_for(GeneratorMode::Rolling)[0], ROLLING_RULES[0]);
    }
}
