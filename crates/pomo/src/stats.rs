//! Completed work intervals per calendar day
//!
//! The record is a flat JSON object mapping `DD.MM.YYYY` to a count, stored
//! in `stats.json`. Every completion is a full load-increment-save cycle and
//! each save replaces the file atomically (write to a sibling temp file, then
//! rename). Two processes saving at once resolve as last writer wins.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::PomoError;
use pomo_core::format::{date_key, parse_date_key};

/// Date key -> completed work intervals that day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsRecord {
    days: BTreeMap<String, u32>,
}

impl StatsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed work interval on the day of `now`
    pub fn record_completion<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        self.increment(now.date_naive());
    }

    pub fn increment(&mut self, date: NaiveDate) {
        let count = self.days.entry(date_key(date)).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.days.get(&date_key(date)).copied().unwrap_or(0)
    }

    pub fn total_over(&self, dates: &[NaiveDate]) -> u32 {
        dates.iter().map(|d| self.count_on(*d)).sum()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.days.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u32)> for StatsRecord {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

/// Receives one call per fully completed work interval
pub trait CompletionRecorder {
    fn record_completion(&mut self, now: DateTime<chrono::Local>) -> Result<()>;
}

/// Stats persisted as a JSON file
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    /// Open the store, writing an empty record if the file is absent
    pub fn open(path: &Path) -> Result<Self> {
        let store = Self {
            path: path.to_path_buf(),
        };

        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create stats directory: {}", parent.display())
                })?;
            }
            debug!("Bootstrapping stats at {}", path.display());
            store.save(&StatsRecord::new())?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record, failing on I/O or malformed content
    pub fn try_load(&self) -> Result<StatsRecord, PomoError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| PomoError::StatsIo(format!("{}: {}", self.path.display(), e)))?;
        let record: StatsRecord = serde_json::from_str(&content)
            .map_err(|e| PomoError::StatsIo(format!("{}: {}", self.path.display(), e)))?;

        if let Some(bad) = record.days.keys().find(|k| parse_date_key(k).is_none()) {
            return Err(PomoError::StatsIo(format!(
                "{}: \"{}\" is not a DD.MM.YYYY date",
                self.path.display(),
                bad
            )));
        }
        Ok(record)
    }

    /// Read the record, treating any failure as an empty one
    pub fn load(&self) -> StatsRecord {
        self.try_load().unwrap_or_else(|e| {
            warn!("{}; starting from empty stats", e);
            StatsRecord::new()
        })
    }

    /// Replace the persisted record in one rename
    pub fn save(&self, record: &StatsRecord) -> Result<()> {
        let content =
            serde_json::to_string_pretty(record).context("Failed to serialize stats")?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .map_err(|e| PomoError::StatsIo(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| PomoError::StatsIo(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }

    /// Load, count one completion for `now`, and save.
    ///
    /// An unreadable file is left untouched and reported as `StatsIo`.
    pub fn record_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<StatsRecord> {
        let mut record = self.try_load()?;
        record.record_completion(now);
        self.save(&record)?;
        Ok(record)
    }
}

impl CompletionRecorder for StatsStore {
    fn record_completion(&mut self, now: DateTime<chrono::Local>) -> Result<()> {
        self.record_at(&now).map(|_| ())
    }
}
