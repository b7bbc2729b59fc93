//! Mock telemetry generation and insight derivation.
//!
//! ## Submodules
//!
//! - [`clock`]: Wall-clock seam ([`Clock`], [`SystemClock`], [`ManualClock`])
//! - [`generator`]: The stateful sample generator ([`MetricsGenerator`])
//! - [`history`]: Ordered sample storage with optional FIFO capacity ([`HistoryBuffer`])
//! - [`insight`]: Threshold rule tables and their evaluation
//!
//! ## Data Flow
//!
//! ```text
//! MetricsGenerator (random draws shaped by hour/weekday)
//!        │
//!        ├──▶ HistoryBuffer<BlinkSample | DrowsinessSample | ScreenTimeSample>
//!        │
//!        ▼
//! current_metrics() ──▶ CurrentMetrics
//!        │
//!        ▼
//! insight::evaluate(rules_for(mode)) ──▶ Vec<Insight>
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

pub mod clock;
pub mod generator;
pub mod history;
pub mod insight;

pub use clock::{Clock, ManualClock, SystemClock};
pub use generator::{Dashboard, GeneratorMode, MetricsGenerator};
pub use history::HistoryBuffer;
pub use insight::{Band, InsightRule};

/// Generator shared between request handlers and the background watcher.
///
/// Hold the lock for a single read or update and never across an `.await`.
pub type SharedGenerator = Arc<Mutex<MetricsGenerator>>;
