//! # eyewatch
//!
//! A simulated eye-health dashboard served over HTTP.
//!
//! The service fabricates blink-rate, drowsiness and screen-time telemetry,
//! derives health insights from it with fixed threshold rules, and exposes
//! both as HTML pages and JSON endpoints. An optional background watcher
//! re-checks the metrics on a timer and logs a notification when they look
//! unhealthy.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           server                             │
//! │  hyper accept loop ──▶ router::dispatch ──▶ pages | JSON     │
//! │                              │                               │
//! │                              ▼                               │
//! │  ┌──────────────────────── App ───────────────────────────┐  │
//! │  │ SharedGenerator ◀──┐   Notifier ◀──┐   AssetStore      │  │
//! │  │  (data)            └── Watcher ────┘   (cascade XML)   │  │
//! │  └─────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: Sample generation ([`MetricsGenerator`]), bounded history and
//!   the insight rule tables
//! - **[`watcher`]**: The background toggle loop ([`Watcher`])
//! - **[`notify`]**: Would-be user notifications ([`Notifier`])
//! - **[`server`]**: HTTP routing, HTML pages and static assets
//! - **[`config`]**: Layered [`Settings`]
//!
//! ## Modes
//!
//! - **Daily**: a fixed 24-hour snapshot shaped by hour of day and weekday,
//!   drowsiness in percent
//! - **Rolling**: 60-minute windows that grow on every read and a running
//!   session screen-time counter, drowsiness as a fraction
//!
//! ## Usage
//!
//! ```bash
//! eyewatch --port 8080 --mode rolling
//! ```
//!
//! ### As a library
//!
//! ```
//! use eyewatch::{GeneratorMode, Settings};
//! use eyewatch::data::{ManualClock, MetricsGenerator};
//! use chrono::NaiveDate;
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::sync::Arc;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let mut generator = MetricsGenerator::new(
//!     GeneratorMode::Daily,
//!     60,
//!     StdRng::seed_from_u64(1),
//!     Arc::new(ManualClock::new(now)),
//! );
//!
//! let dashboard = generator.dashboard();
//! assert!(!dashboard.insights.is_empty());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod notify;
pub mod server;
pub mod watcher;

pub use app::App;
pub use config::Settings;
pub use data::{Dashboard, GeneratorMode, MetricsGenerator, SharedGenerator};
pub use error::ApiError;
pub use notify::{Notification, NotificationSource, Notifier};
pub use watcher::{Toggle, Watcher, WatcherState};
