// Report configuration: region, time window and output locations.

use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// CloudWatch keeps hourly data for 455 days.
pub const MAX_LOOKBACK_HOURS: u32 = 455 * 24;
/// GetMetricStatistics rejects queries that would return more datapoints than this.
pub const MAX_DATAPOINTS_PER_QUERY: u64 = 1440;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
        }
    }
}

fn default_region() -> String {
    "ap-south-1".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    /// IANA timezone the report day is anchored to.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
    /// CloudWatch statistic period, in seconds.
    #[serde(default = "default_period_secs")]
    pub period_secs: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            lookback_hours: default_lookback_hours(),
            period_secs: default_period_secs(),
        }
    }
}

fn default_timezone() -> String {
    "Asia/Kolkata".into()
}

fn default_lookback_hours() -> u32 {
    24
}

fn default_period_secs() -> u32 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Chart PNGs are cached here during a run and removed afterwards.
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
    #[serde(default = "default_font_dir")]
    pub font_dir: PathBuf,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            image_dir: default_image_dir(),
            font_dir: default_font_dir(),
            font_family: default_font_family(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_font_dir() -> PathBuf {
    PathBuf::from("fonts")
}

fn default_font_family() -> String {
    "LiberationSans".into()
}

fn default_chart_width() -> u32 {
    1200
}

fn default_chart_height() -> u32 {
    350
}

impl AppConfig {
    /// Loads `CONFIG_FILE` (or `config.toml`). A missing default file means built-in defaults;
    /// a missing file named explicitly through `CONFIG_FILE` is an error.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from_path(Path::new(&path)),
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_path(Path::new(DEFAULT_CONFIG_FILE))
            }
            Err(_) => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.aws.region.is_empty(), "aws.region must be non-empty");
        anyhow::ensure!(
            self.window.timezone.parse::<chrono_tz::Tz>().is_ok(),
            "window.timezone must be an IANA timezone name, got {:?}",
            self.window.timezone
        );
        anyhow::ensure!(
            self.window.lookback_hours > 0 && self.window.lookback_hours <= MAX_LOOKBACK_HOURS,
            "window.lookback_hours must be in 1..={}, got {}",
            MAX_LOOKBACK_HOURS,
            self.window.lookback_hours
        );
        anyhow::ensure!(
            self.window.period_secs >= 60
                && self.window.period_secs % 60 == 0
                && i32::try_from(self.window.period_secs).is_ok(),
            "window.period_secs must be a positive multiple of 60, got {}",
            self.window.period_secs
        );
        let datapoints =
            u64::from(self.window.lookback_hours) * 3600 / u64::from(self.window.period_secs);
        anyhow::ensure!(
            datapoints <= MAX_DATAPOINTS_PER_QUERY,
            "window.lookback_hours / window.period_secs asks for {} datapoints per metric, \
             at most {} allowed; raise window.period_secs",
            datapoints,
            MAX_DATAPOINTS_PER_QUERY
        );
        anyhow::ensure!(
            !self.report.output_dir.as_os_str().is_empty(),
            "report.output_dir must be non-empty"
        );
        anyhow::ensure!(
            !self.report.image_dir.as_os_str().is_empty(),
            "report.image_dir must be non-empty"
        );
        anyhow::ensure!(
            !self.report.font_family.is_empty(),
            "report.font_family must be non-empty"
        );
        anyhow::ensure!(
            self.report.chart_width > 0,
            "report.chart_width must be > 0, got {}",
            self.report.chart_width
        );
        anyhow::ensure!(
            self.report.chart_height > 0,
            "report.chart_height must be > 0, got {}",
            self.report.chart_height
        );
        Ok(())
    }

    /// Configured timezone. Validated at load time; falls back to UTC for hand-built configs.
    pub fn timezone(&self) -> chrono_tz::Tz {
        self.window.timezone.parse().unwrap_or(chrono_tz::Tz::UTC)
    }
}
