//! Background eye-health watcher.
//!
//! When enabled, a single tokio task re-reads the current metrics on a fixed
//! interval and raises a would-be notification when they look unhealthy.
//! Stopping goes through a `watch` channel handed to the task at spawn time.
//! The task waits on that channel alongside its timer, so it exits as soon as
//! the stop is sent rather than at the next tick. Nobody joins it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eyewatch_types::CurrentMetrics;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::data::SharedGenerator;
use crate::notify::{NotificationSource, Notifier};

/// Blink rate below which the watcher raises an alert.
pub const LOW_BLINK_ALERT: f64 = 10.0;

/// Observable watcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WatcherState {
    Running,
    /// Stop was requested but the task has not exited yet.
    Stopping,
    Stopped,
}

impl WatcherState {
    pub fn is_active(&self) -> bool {
        matches!(self, WatcherState::Running)
    }
}

/// What a toggle request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Started,
    AlreadyRunning,
    Stopping,
    AlreadyStopped,
}

impl Toggle {
    pub fn message(&self) -> &'static str {
        match self {
            Toggle::Started => "Background processing enabled",
            Toggle::AlreadyRunning => "Background processing already enabled",
            Toggle::Stopping => "Background processing disabled",
            Toggle::AlreadyStopped => "Background processing already disabled",
        }
    }
}

/// An alert derived from current metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: &'static str,
}

/// Alerts the watcher raises for a snapshot.
pub fn alerts_for(metrics: &CurrentMetrics) -> Vec<Alert> {
    let mut alerts = Vec::new();
    if metrics.blink_rate < LOW_BLINK_ALERT {
        alerts.push(Alert {
            title: "Low blink rate",
            message: "Low blink rate detected! Remember to blink and rest your eyes.",
        });
    }
    if metrics.is_drowsy {
        alerts.push(Alert {
            title: "Drowsiness detected",
            message: "You seem drowsy. Consider taking a break.",
        });
    }
    alerts
}

#[derive(Debug)]
struct WatchTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl WatchTask {
    fn state(&self) -> WatcherState {
        if self.handle.is_finished() {
            WatcherState::Stopped
        } else if *self.stop_tx.borrow() {
            WatcherState::Stopping
        } else {
            WatcherState::Running
        }
    }
}

/// Owner of the (at most one) background watch task.
#[derive(Debug)]
pub struct Watcher {
    generator: SharedGenerator,
    notifier: Arc<Notifier>,
    interval: Duration,
    task: Mutex<Option<WatchTask>>,
    launches: AtomicUsize,
}

impl Watcher {
    pub fn new(generator: SharedGenerator, notifier: Arc<Notifier>, interval: Duration) -> Self {
        Self {
            generator,
            notifier,
            interval,
            task: Mutex::new(None),
            launches: AtomicUsize::new(0),
        }
    }

    /// Current state.
    pub fn state(&self) -> WatcherState {
        self.task
            .lock()
            .as_ref()
            .map_or(WatcherState::Stopped, WatchTask::state)
    }

    /// Number of tasks spawned so far.
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::Relaxed)
    }

    /// Start or stop the watcher.
    pub fn set_enabled(&self, enabled: bool) -> Toggle {
        if enabled {
            self.start()
        } else {
            self.stop()
        }
    }

    /// Spawn the watch task unless one is already running.
    ///
    /// A task that was asked to stop but has not exited yet is aborted first,
    /// so at most one task is ever live. Must be called within a tokio runtime.
    pub fn start(&self) -> Toggle {
        let mut task = self.task.lock();

        if let Some(existing) = task.as_ref() {
            match existing.state() {
                WatcherState::Running => return Toggle::AlreadyRunning,
                WatcherState::Stopping => existing.handle.abort(),
                WatcherState::Stopped => {}
            }
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_watch_loop(
            self.generator.clone(),
            self.notifier.clone(),
            self.interval,
            stop_rx,
        ));
        *task = Some(WatchTask { stop_tx, handle });
        self.launches.fetch_add(1, Ordering::Relaxed);

        info!(interval = ?self.interval, "Background eye tracking watcher starting");
        Toggle::Started
    }

    /// Ask the running task to stop. Returns without waiting for it.
    pub fn stop(&self) -> Toggle {
        let task = self.task.lock();
        match task.as_ref() {
            Some(existing) if existing.state() == WatcherState::Running => {
                let _ = existing.stop_tx.send(true);
                info!("Background eye tracking watcher stopping");
                Toggle::Stopping
            }
            _ => Toggle::AlreadyStopped,
        }
    }
}

async fn run_watch_loop(
    generator: SharedGenerator,
    notifier: Arc<Notifier>,
    interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    info!("Background eye tracking watcher started");
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => check_once(&generator, &notifier),
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!("Background eye tracking watcher stopped");
}

fn check_once(generator: &SharedGenerator, notifier: &Notifier) {
    let metrics = generator.lock().current_metrics();
    debug!(
        blink_rate = metrics.blink_rate,
        drowsiness = metrics.drowsiness,
        "Background watcher checking eye health"
    );

    for alert in alerts_for(&metrics) {
        notifier.send(alert.title, alert.message, NotificationSource::Watcher);
    }
}
