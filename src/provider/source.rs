use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use super::{CalendarDataset, Ingested, RawDataset, Result};
use crate::events::Event;

/// Where the month-keyed event document is read from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DataSource {
    File(PathBuf),
    Http(String),
}

impl From<String> for DataSource {
    fn from(s: String) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            DataSource::Http(s)
        } else {
            DataSource::File(PathBuf::from(s))
        }
    }
}

impl From<&Path> for DataSource {
    fn from(path: &Path) -> Self {
        DataSource::from(path.to_string_lossy().into_owned())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Http(url) => f.write_str(url),
        }
    }
}

fn fetch_document(source: &DataSource, timeout: Duration) -> Result<String> {
    match source {
        DataSource::File(path) => Ok(fs::read_to_string(path)?),
        DataSource::Http(url) => {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()?;

            Ok(client.get(url).send()?.error_for_status()?.text()?)
        }
    }
}

/// Reads and validates the document. Dropped records are logged during
/// ingestion; only transport and document errors fail the load.
pub fn load(source: &DataSource, timeout: Duration) -> Result<CalendarDataset> {
    log::info!("Loading calendar from '{}'", source);

    let document = fetch_document(source, timeout)?;
    let raw: RawDataset = serde_json::from_str(&document)?;

    let Ingested { dataset, rejected } = CalendarDataset::ingest(raw);
    if !rejected.is_empty() {
        log::warn!(
            "{} record(s) of '{}' were rejected during validation",
            rejected.len(),
            source
        );
    }

    Ok(dataset)
}

/// Hands a load result to the event loop. Returns whether it was delivered.
pub fn deliver(event_sink: &mpsc::Sender<Event>, result: Result<CalendarDataset>) -> bool {
    let delivered = event_sink.send(Event::Loaded(result)).is_ok();
    if !delivered {
        log::debug!("Event loop closed before calendar finished loading");
    }
    delivered
}

/// Loads on a worker thread and delivers the result as [`Event::Loaded`].
pub fn spawn_load(
    source: DataSource,
    timeout: Duration,
    event_sink: mpsc::Sender<Event>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("almanac-loader".to_owned())
        .spawn(move || {
            deliver(&event_sink, load(&source, timeout));
        })
}
