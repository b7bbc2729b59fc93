//! Layered runtime configuration.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `EYEWATCH_<SECTION>__<KEY>` environment variables
//! 4. the bare `PORT` and `DEBUG` variables used by hosting platforms (`DEBUG`
//!    is on only for `1`, `true`, `yes` or `on`)
//!
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [generator]
//! mode = "rolling"
//! window = 60
//!
//! [watcher]
//! interval_secs = 10
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use config::{Config, Environment, File, Map};
use serde::Deserialize;

use crate::data::generator::GeneratorMode;
use crate::data::history::DEFAULT_WINDOW;

/// Prefix of namespaced environment variables.
pub const ENV_PREFIX: &str = "EYEWATCH";

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub generator: GeneratorSettings,
    pub watcher: WatcherSettings,
    pub assets: AssetSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Enables debug-level logging.
    pub debug: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
        }
    }
}

impl ServerSettings {
    /// `host:port` string suitable for binding.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Mock data generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub mode: GeneratorMode,
    /// Capacity of the rolling-mode windows.
    pub window: usize,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            mode: GeneratorMode::Daily,
            window: DEFAULT_WINDOW,
            seed: None,
        }
    }
}

/// Background watcher settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WatcherSettings {
    /// Seconds between two checks.
    pub interval_secs: u64,
    /// Number of notifications kept for `GET /api/notifications`.
    pub notification_log: usize,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            notification_log: 50,
        }
    }
}

impl WatcherSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Static asset settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory holding the cascade XML files.
    pub dir: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("static/models"),
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let vars: Map<String, String> = env::vars().collect();
        Self::from_sources(path, &vars)
    }

    /// Load settings from defaults and a file only, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_sources(Some(path), &Map::new())
    }

    /// Load settings from defaults, an optional file and the given variables.
    pub fn from_sources(path: Option<&Path>, vars: &Map<String, String>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let debug = vars.get("DEBUG").map(|value| parse_flag(value));

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .set_override_option("server.port", vars.get("PORT").cloned())?
            .set_override_option("server.debug", debug)?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.generator.window == 0 {
            bail!("generator.window must be at least 1");
        }
        if self.watcher.interval_secs == 0 {
            bail!("watcher.interval_secs must be at least 1");
        }
        if self.watcher.notification_log == 0 {
            bail!("watcher.notification_log must be at least 1");
        }
        Ok(())
    }
}

/// Lenient boolean for bare platform variables. Anything unrecognised is off.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_listen_on_port_5000() {
        let settings = Settings::default();
        assert_eq!(settings.server.listen_addr(), "0.0.0.0:5000");
        assert!(!settings.server.debug);
        assert_eq!(settings.generator.mode, GeneratorMode::Daily);
        assert_eq!(settings.generator.window, 60);
        assert_eq!(settings.watcher.interval(), Duration::from_secs(10));
        assert_eq!(settings.assets.dir, PathBuf::from("static/models"));
    }

    #[test]
    fn file_overrides_only_given_keys() {
        let file = write_config(
            r#"
            [server]
            port = 8080

            [generator]
            mode = "rolling"
            seed = 7
            "#,
        );

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.generator.mode, GeneratorMode::Rolling);
        assert_eq!(settings.generator.seed, Some(7));
        assert_eq!(settings.generator.window, 60);
    }

    #[test]
    fn zero_window_is_rejected() {
        let file = write_config("[generator]\nwindow = 0\n");
        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("generator.window"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut settings = Settings::default();
        settings.watcher.interval_secs = 0;
        assert!(settings.validate().is_err());
    }

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_sources(
            None,
            &vars(&[
                ("PORT", "8081"),
                ("DEBUG", "False"),
                ("EYEWATCH_GENERATOR__MODE", "rolling"),
                ("EYEWATCH_WATCHER__INTERVAL_SECS", "3"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.server.port, 8081);
        assert!(!settings.server.debug);
        assert_eq!(settings.generator.mode, GeneratorMode::Rolling);
        assert_eq!(settings.watcher.interval_secs, 3);
    }

    #[test]
    fn environment_wins_over_file() {
        let file = write_config("[server]\nport = 8080\nhost = \"127.0.0.1\"\n");
        let settings =
            Settings::from_sources(Some(file.path()), &vars(&[("PORT", "9000")])).unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    #[test]
    fn debug_variable_is_read_leniently() {
        for (value, expected) in [
            ("*", false),
            ("", false),
            ("False", false),
            ("TRUE", true),
            ("1", true),
            ("on", true),
        ] {
            let settings = Settings::from_sources(None, &vars(&[("DEBUG", value)])).unwrap();
            assert_eq!(settings.server.debug, expected, "DEBUG={:?}", value);
        }
    }

    #[test]
    fn unknown_mode_fails_to_load() {
        let file = write_config("[generator]\nmode = \"hourly\"\n");
        assert!(Settings::from_file(file.path()).is_err());
    }
}
