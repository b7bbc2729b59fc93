//! Server-rendered HTML pages.
//!
//! Pages are plain strings built with `format!`. Every value that comes from
//! generated data goes through [`escape`].

use std::fmt::Write;

use eyewatch_types::{
    BlinkSample, CurrentMetrics, DrowsinessSample, DrowsinessScale, Insight, ScreenTimeReport,
    ScreenTimeSummary,
};

use crate::config::Settings;
use crate::data::{Dashboard, GeneratorMode};
use crate::notify::Notification;
use crate::watcher::WatcherState;

/// A navigable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    LiveTracking,
    Reports,
    Analytics,
    Settings,
    EyeExercises,
    AdvancedFeatures,
}

impl Page {
    /// Pages in navigation order.
    pub const NAV: [Page; 7] = [
        Page::Home,
        Page::LiveTracking,
        Page::Reports,
        Page::Analytics,
        Page::EyeExercises,
        Page::AdvancedFeatures,
        Page::Settings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::LiveTracking => "/live-tracking",
            Page::Reports => "/reports",
            Page::Analytics => "/analytics",
            Page::Settings => "/settings",
            Page::EyeExercises => "/eye-exercises",
            Page::AdvancedFeatures => "/advanced-features",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Dashboard",
            Page::LiveTracking => "Live Tracking",
            Page::Reports => "Reports",
            Page::Analytics => "Analytics",
            Page::Settings => "Settings",
            Page::EyeExercises => "Eye Exercises",
            Page::AdvancedFeatures => "Advanced Features",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::NAV.into_iter().find(|page| page.path() == path)
    }
}

/// Escape text for HTML element and attribute content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(page: Page, body: &str) -> String {
    let mut nav = String::new();
    for item in Page::NAV {
        let class = if item == page { " class=\"active\"" } else { "" };
        let _ = write!(
            nav,
            "<li><a href=\"{}\"{}>{}</a></li>",
            item.path(),
            class,
            item.title()
        );
    }

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | Eye Health Monitor</title>\n\
         </head>\n\
         <body>\n\
         <nav><ul>{nav}</ul></nav>\n\
         <main>\n<h1>{title}</h1>\n{body}</main>\n\
         </body>\n\
         </html>\n",
        title = page.title(),
        nav = nav,
        body = body,
    )
}

fn metric_cards(metrics: &CurrentMetrics) -> String {
    let blink_status = if metrics.is_healthy_blink {
        "healthy"
    } else {
        "low"
    };
    let drowsy_status = if metrics.is_drowsy { "drowsy" } else { "alert" };

    let mut cards = String::from("<section class=\"metrics\">\n");
    let _ = writeln!(
        cards,
        "<div class=\"card\" id=\"blink-rate\"><h2>Blink Rate</h2>\
         <p class=\"value\">{:.1} blinks/min</p><p class=\"status {s}\">{s}</p></div>",
        metrics.blink_rate,
        s = blink_status,
    );
    let _ = writeln!(
        cards,
        "<div class=\"card\" id=\"drowsiness\"><h2>Drowsiness</h2>\
         <p class=\"value\">{:.0}%</p><p class=\"status {s}\">{s}</p></div>",
        metrics.drowsiness_percent(),
        s = drowsy_status,
    );
    let screen = match &metrics.screen_time {
        ScreenTimeSummary::Weekly {
            avg_daily_hours,
            total_weekly_hours,
        } => format!(
            "{:.1} h/day average, {:.1} h this week",
            avg_daily_hours, total_weekly_hours
        ),
        ScreenTimeSummary::Session { hours, minutes, .. } => {
            format!("{}h {}m this session", hours, minutes)
        }
    };
    let _ = writeln!(
        cards,
        "<div class=\"card\" id=\"screen-time\"><h2>Screen Time</h2>\
         <p class=\"value\">{}</p></div>",
        screen
    );
    cards.push_str("</section>\n");
    cards
}

fn insight_list(insights: &[Insight]) -> String {
    if insights.is_empty() {
        return "<p class=\"insights-empty\">No insights right now.</p>\n".to_string();
    }

    let mut list = String::from("<ul class=\"insights\">\n");
    for insight in insights {
        let _ = writeln!(
            list,
            "<li class=\"insight {}\">{}</li>",
            insight.severity.as_str(),
            escape(&insight.message)
        );
    }
    list.push_str("</ul>\n");
    list
}

/// Dashboard with current metrics and insights.
pub fn home(dashboard: &Dashboard) -> String {
    let body = format!(
        "{}<h2>Insights</h2>\n{}",
        metric_cards(&dashboard.metrics),
        insight_list(&dashboard.insights)
    );
    layout(Page::Home, &body)
}

/// Analytics view of the same data, with the raw figures spelled out.
pub fn analytics(dashboard: &Dashboard, mode: GeneratorMode) -> String {
    let metrics = &dashboard.metrics;
    let mut body = metric_cards(metrics);

    body.push_str("<h2>Details</h2>\n<table class=\"details\">\n");
    let _ = writeln!(body, "<tr><th>Data mode</th><td>{}</td></tr>", mode);
    let _ = writeln!(
        body,
        "<tr><th>Drowsiness (raw)</th><td>{} ({})</td></tr>",
        metrics.drowsiness,
        match metrics.drowsiness_scale {
            DrowsinessScale::Percent => "percent",
            DrowsinessScale::Fraction => "fraction",
        }
    );
    let _ = writeln!(
        body,
        "<tr><th>Healthy blink rate</th><td>{}</td></tr>",
        metrics.is_healthy_blink
    );
    body.push_str("</table>\n<h2>Health Insights</h2>\n");
    body.push_str(&insight_list(&dashboard.insights));

    layout(Page::Analytics, &body)
}

/// History tables.
pub fn reports(
    blink: &[BlinkSample],
    drowsiness: &[DrowsinessSample],
    screen_time: &ScreenTimeReport,
) -> String {
    let mut body = String::from("<h2>Blink Rate</h2>\n<table id=\"blink-history\">\n");
    body.push_str("<tr><th>Time</th><th>Blinks/min</th><th>Healthy</th></tr>\n");
    for sample in blink {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&sample.timestamp),
            sample.value,
            if sample.is_healthy { "yes" } else { "no" }
        );
    }
    body.push_str("</table>\n");

    body.push_str("<h2>Drowsiness</h2>\n<table id=\"drowsiness-history\">\n");
    body.push_str("<tr><th>Time</th><th>Level</th><th>Drowsy</th></tr>\n");
    for sample in drowsiness {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&sample.timestamp),
            sample.value,
            if sample.is_drowsy { "yes" } else { "no" }
        );
    }
    body.push_str("</table>\n");

    body.push_str("<h2>Screen Time</h2>\n");
    match screen_time {
        ScreenTimeReport::Daily(days) => {
            body.push_str("<table id=\"screen-time-history\">\n");
            body.push_str("<tr><th>Day</th><th>Hours</th><th>Excessive</th></tr>\n");
            for day in days {
                let _ = writeln!(
                    body,
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape(&day.day),
                    day.hours,
                    if day.is_excessive { "yes" } else { "no" }
                );
            }
            body.push_str("</table>\n");
        }
        ScreenTimeReport::Session(session) => {
            let _ = writeln!(
                body,
                "<p id=\"screen-time-session\">{}h {}m this session</p>",
                session.hours, session.minutes
            );
        }
    }

    layout(Page::Reports, &body)
}

/// Webcam tracking page. Detection runs in the browser from the cascade files.
pub fn live_tracking() -> String {
    let body = "<p>Allow camera access to track blinks and drowsiness in real time. \
                Video never leaves your browser.</p>\n\
                <video id=\"camera\" autoplay muted playsinline></video>\n\
                <canvas id=\"overlay\"></canvas>\n\
                <ul class=\"models\">\n\
                <li><a href=\"/models/haarcascade_frontalface_alt2.xml\">Face model</a></li>\n\
                <li><a href=\"/models/haarcascade_eye.xml\">Eye model</a></li>\n\
                </ul>\n";
    layout(Page::LiveTracking, body)
}

/// Current configuration, watcher state and recent notifications.
pub fn settings(
    settings: &Settings,
    mode: GeneratorMode,
    watcher: WatcherState,
    notifications: &[Notification],
) -> String {
    let mut body = String::from("<table class=\"settings\">\n");
    let _ = writeln!(body, "<tr><th>Data mode</th><td>{}</td></tr>", mode);
    let _ = writeln!(
        body,
        "<tr><th>Background processing</th><td id=\"watcher-state\">{}</td></tr>",
        match watcher {
            WatcherState::Running => "running",
            WatcherState::Stopping => "stopping",
            WatcherState::Stopped => "stopped",
        }
    );
    let _ = writeln!(
        body,
        "<tr><th>Check interval</th><td>{} s</td></tr>",
        settings.watcher.interval_secs
    );
    body.push_str("</table>\n");
    body.push_str(
        "<p>Toggle background processing with <code>POST /api/toggle-background</code> \
         and a body of <code>{\"enabled\": true}</code>.</p>\n",
    );

    body.push_str("<h2>Recent Notifications</h2>\n");
    if notifications.is_empty() {
        body.push_str("<p>None yet.</p>\n");
    } else {
        body.push_str("<ul class=\"notifications\">\n");
        for n in notifications.iter().rev() {
            let _ = writeln!(
                body,
                "<li><time>{}</time> <strong>{}</strong> {}</li>",
                escape(&n.timestamp),
                escape(&n.title),
                escape(&n.message)
            );
        }
        body.push_str("</ul>\n");
    }

    layout(Page::Settings, &body)
}

/// Guided exercises.
pub fn eye_exercises() -> String {
    let body = "<ol class=\"exercises\">\n\
                <li><h2>20-20-20 Rule</h2><p>Every 20 minutes, look at something \
                20 feet away for 20 seconds.</p></li>\n\
                <li><h2>Palming</h2><p>Rub your palms together and cup them over \
                closed eyes for 30 seconds.</p></li>\n\
                <li><h2>Focus Shifting</h2><p>Alternate focus between a near and a \
                far object ten times.</p></li>\n\
                <li><h2>Blinking Exercise</h2><p>Blink rapidly for 10 seconds, then \
                close your eyes and relax for 20 seconds.</p></li>\n\
                <li><h2>Figure Eight</h2><p>Trace an imaginary figure eight with \
                your eyes for 30 seconds in each direction.</p></li>\n\
                </ol>\n";
    layout(Page::EyeExercises, body)
}

/// Overview of features beyond the basic dashboard.
pub fn advanced_features() -> String {
    let body = "<ul class=\"features\">\n\
                <li><h2>Background Monitoring</h2><p>Periodic checks raise a \
                notification when blink rate drops or drowsiness rises.</p></li>\n\
                <li><h2>Rolling Metrics</h2><p>Minute-by-minute windows with a \
                running session screen-time counter.</p></li>\n\
                <li><h2>In-Browser Detection</h2><p>Face and eye cascades are \
                served for client-side tracking.</p></li>\n\
                </ul>\n";
    layout(Page::AdvancedFeatures, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyewatch_types::{ScreenTimeSample, Severity};

    fn dashboard() -> Dashboard {
        Dashboard {
            metrics: CurrentMetrics {
                blink_rate: 9.5,
                is_healthy_blink: false,
                drowsiness: 0.7,
                drowsiness_scale: DrowsinessScale::Fraction,
                is_drowsy: true,
                screen_time: ScreenTimeSummary::Session {
                    hours: 1,
                    minutes: 5,
                    total_minutes: 65.0,
                },
            },
            insights: vec![Insight::new(Severity::Danger, "Blink <more> often")],
        }
    }

    #[test]
    fn escape_replaces_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn every_nav_page_round_trips_its_path() {
        for page in Page::NAV {
            assert_eq!(Page::from_path(page.path()), Some(page));
        }
        assert_eq!(Page::from_path("/nope"), None);
    }

    #[test]
    fn home_shows_metrics_and_escaped_insights() {
        let html = home(&dashboard());
        assert!(html.contains("9.5 blinks/min"));
        assert!(html.contains("70%"));
        assert!(html.contains("1h 5m this session"));
        assert!(html.contains("insight danger"));
        assert!(html.contains("Blink &lt;more&gt; often"));
        assert!(html.contains("<a href=\"/\" class=\"active\">Dashboard</a>"));
    }

    #[test]
    fn reports_render_daily_screen_time_table() {
        let blink = vec![BlinkSample::new("09:00", 16.0)];
        let drowsiness = vec![DrowsinessSample::new("09:00", 20.0, DrowsinessScale::Percent)];
        let screen = ScreenTimeReport::Daily(vec![ScreenTimeSample::new("Mon", 7.5)]);

        let html = reports(&blink, &drowsiness, &screen);
        assert!(html.contains("<tr><td>09:00</td><td>16</td><td>yes</td></tr>"));
        assert!(html.contains("<tr><td>09:00</td><td>20</td><td>no</td></tr>"));
        assert!(html.contains("<tr><td>Mon</td><td>7.5</td><td>yes</td></tr>"));
    }

    #[test]
    fn settings_list_newest_notification_first() {
        let notifications = vec![
            Notification {
                timestamp: "10:00:00".to_string(),
                title: "first".to_string(),
                message: "m".to_string(),
                source: crate::notify::NotificationSource::Api,
            },
            Notification {
                timestamp: "10:00:10".to_string(),
                title: "second".to_string(),
                message: "m".to_string(),
                source: crate::notify::NotificationSource::Watcher,
            },
        ];

        let html = settings(
            &Settings::default(),
            GeneratorMode::Daily,
            WatcherState::Running,
            &notifications,
        );
        assert!(html.contains("<td id=\"watcher-state\">running</td>"));
        let first = html.find("first").unwrap();
        let second = html.find("second").unwrap();
        assert!(second < first);
    }
}
