use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::provider::{DataSource, Error, ErrorKind, MonthKey, Result};

const CONFIG_PATH_ENV_VAR: &str = "ALMANAC_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("almanac").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".almanac.toml"));
    }

    locations
}

/// Loads the file at `path` if given, otherwise the first config found in the
/// default locations. Without any config file the defaults are used.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => Config::from_file(&location),
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    pub title: String,
    pub loading: String,
    pub no_data: String,
    pub no_events: String,
    pub today: String,
    pub month_events: String,
    pub collapse_hint: String,
    pub weekdays: [String; 7],
    pub month_format: String,
    pub day_suffix: String,
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            title: "Calendar".to_owned(),
            loading: "Loading...".to_owned(),
            no_data: "No calendar data available".to_owned(),
            no_events: "No events on this day".to_owned(),
            today: "today".to_owned(),
            month_events: "Events this month".to_owned(),
            collapse_hint: "press enter to collapse".to_owned(),
            weekdays: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"].map(str::to_owned),
            month_format: "{year}-{month:02}".to_owned(),
            day_suffix: String::new(),
        }
    }
}

impl Labels {
    /// Renders `month_format`. Supported placeholders are `{year}`, `{month}`,
    /// `{month:02}` and `{name}` (English month name).
    pub fn month_label(&self, month: &MonthKey) -> String {
        self.month_format
            .replace("{year}", &month.year().to_string())
            .replace("{month:02}", &format!("{:02}", month.month_number()))
            .replace("{month}", &month.month_number().to_string())
            .replace("{name}", month.month().name())
    }

    pub fn day_label(&self, day: u32) -> String {
        format!("{}{}", day, self.day_suffix)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source: Option<DataSource>,
    pub tick_rate_ms: u64,
    pub fetch_timeout_secs: u64,
    pub preview_events: usize,
    pub labels: Labels,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            source: None,
            tick_rate_ms: 500,
            fetch_timeout_secs: 10,
            preview_events: 2,
            labels: Labels::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|err| {
            Error::new(
                ErrorKind::ConfigParse,
                &format!("could not read '{}': {}", path.display(), err),
            )
        })?;

        log::info!("Using config file '{}'", path.display());
        Config::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Config> {
        Ok(toml::from_str(content)?)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_content() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.source, None);
        assert_eq!(config.tick_rate(), Duration::from_millis(500));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.preview_events, 2);
        assert_eq!(config.labels.weekdays[0], "Sun");
    }

    #[test]
    fn parse_full_config() {
        let config = Config::from_toml(
            r#"
            source = "https://school.example/data/calendar.json"
            preview_events = 3

            [labels]
            title = "行事曆"
            month_format = "{year}年{month}月"
            day_suffix = "日"
            weekdays = ["日", "一", "二", "三", "四", "五", "六"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.source,
            Some(DataSource::Http(
                "https://school.example/data/calendar.json".to_owned()
            ))
        );
        assert_eq!(config.preview_events, 3);
        assert_eq!(config.labels.title, "行事曆");
        // Unset labels keep their defaults
        assert_eq!(config.labels.loading, "Loading...");

        let jan = "2025-01".parse().unwrap();
        assert_eq!(config.labels.month_label(&jan), "2025年1月");
        assert_eq!(config.labels.day_label(15), "15日");
    }

    #[test]
    fn reject_unknown_keys() {
        let err = Config::from_toml("colour = \"blue\"").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
    }

    #[test]
    fn month_label_placeholders() {
        let labels = Labels::default();
        let month = "2025-03".parse().unwrap();
        assert_eq!(labels.month_label(&month), "2025-03");

        let labels = Labels {
            month_format: "{name} {year}".to_owned(),
            ..Labels::default()
        };
        assert_eq!(labels.month_label(&month), "March 2025");
    }

    #[test]
    fn load_explicit_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "source = \"data/calendar.json\"").unwrap();

        let config = load_suitable_config(Some(file.path())).unwrap();
        assert_eq!(
            config.source,
            Some(DataSource::File(PathBuf::from("data/calendar.json")))
        );

        assert!(load_suitable_config(Some(Path::new("/nonexistent/almanac.toml"))).is_err());
    }
}
