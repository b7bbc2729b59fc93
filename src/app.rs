//! Shared application state.
//!
//! One [`App`] is built at start-up and shared by every connection task. It
//! owns the generator, the notification log, the background watcher and the
//! asset store.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Settings;
use crate::data::{Clock, GeneratorMode, MetricsGenerator, SharedGenerator, SystemClock};
use crate::notify::Notifier;
use crate::server::assets::AssetStore;
use crate::watcher::Watcher;

/// Everything a request handler can reach.
#[derive(Debug)]
pub struct App {
    settings: Settings,
    generator: SharedGenerator,
    notifier: Arc<Notifier>,
    watcher: Watcher,
    assets: AssetStore,
}

impl App {
    /// Build the application state on the system clock.
    pub fn new(settings: Settings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Build the application state on a custom clock.
    pub fn with_clock(settings: Settings, clock: Arc<dyn Clock>) -> Self {
        let generator = MetricsGenerator::from_settings(&settings.generator, clock);
        Self::with_generator(settings, generator)
    }

    /// Build the application state around an existing generator.
    ///
    /// The generator's own mode wins over `settings.generator.mode`.
    pub fn with_generator(settings: Settings, generator: MetricsGenerator) -> Self {
        let generator: SharedGenerator = Arc::new(Mutex::new(generator));
        let notifier = Arc::new(Notifier::new(settings.watcher.notification_log));
        let watcher = Watcher::new(
            generator.clone(),
            notifier.clone(),
            settings.watcher.interval(),
        );
        let assets = AssetStore::new(settings.assets.dir.clone());

        Self {
            settings,
            generator,
            notifier,
            watcher,
            assets,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn generator(&self) -> &SharedGenerator {
        &self.generator
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn watcher(&self) -> &Watcher {
        &self.watcher
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Mode the generator runs in.
    pub fn mode(&self) -> GeneratorMode {
        self.generator.lock().mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ManualClock;
    use crate::watcher::WatcherState;
    use chrono::NaiveDate;

    fn clock() -> Arc<ManualClock> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Arc::new(ManualClock::new(start))
    }

    #[test]
    fn mode_comes_from_settings() {
        let mut settings = Settings::default();
        settings.generator.mode = GeneratorMode::Rolling;
        settings.generator.seed = Some(3);

        let app = App::with_clock(settings, clock());
        assert_eq!(app.mode(), GeneratorMode::Rolling);
        assert_eq!(app.generator().lock().blink_history().len(), 60);
    }

    #[test]
    fn watcher_starts_stopped_with_empty_log() {
        let app = App::with_clock(Settings::default(), clock());
        assert_eq!(app.watcher().state(), WatcherState::Stopped);
        assert!(app.notifier().recent().is_empty());
    }
}
