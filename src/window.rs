// Rolling lookback window anchored to "now" in the report timezone, plus dated output paths.

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, MAX_LOOKBACK_HOURS};

const LABEL_FORMAT: &str = "%d-%m-%Y";
const FILE_STEM: &str = "Daily_Utilization";

/// The window every metric query and chart covers. `label` is the end date, used in titles and file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub label: String,
}

impl TimeWindow {
    /// `lookback_hours` is capped at [`MAX_LOOKBACK_HOURS`], the longest span config accepts.
    pub fn ending_at(end: DateTime<Tz>, lookback_hours: u32) -> Self {
        let hours = lookback_hours.min(MAX_LOOKBACK_HOURS);
        let start = end - TimeDelta::hours(i64::from(hours));
        let label = end.format(LABEL_FORMAT).to_string();
        Self { start, end, label }
    }

    pub fn now(tz: Tz, lookback_hours: u32) -> Self {
        Self::ending_at(Utc::now().with_timezone(&tz), lookback_hours)
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::now(config.timezone(), config.window.lookback_hours)
    }

    pub fn start_epoch_secs(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_epoch_secs(&self) -> i64 {
        self.end.timestamp()
    }
}

/// Dated output locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub document: PathBuf,
    /// Reserved by directory convention; nothing writes to it.
    pub spreadsheet: PathBuf,
}

impl ReportPaths {
    pub fn new(output_dir: &Path, window: &TimeWindow) -> Self {
        Self {
            document: output_dir
                .join("pdf")
                .join(format!("{}_{}.pdf", FILE_STEM, window.label)),
            spreadsheet: output_dir
                .join("excel")
                .join(format!("{}_{}.xlsx", FILE_STEM, window.label)),
        }
    }

    /// Parent directories of both outputs, for creation before the run.
    pub fn directories(&self) -> Vec<&Path> {
        [&self.document, &self.spreadsheet]
            .into_iter()
            .filter_map(|p| p.parent())
            .collect()
    }
}
