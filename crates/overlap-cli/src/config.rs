//! Settings resolution: command-line flags over config file over defaults.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use overlap_engine::{CompareOptions, Mode, WindowFormatter};
use serde::Deserialize;

pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Comparison mode as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Pairwise,
    Aggregate,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Pairwise => Mode::Pairwise,
            ModeArg::Aggregate => Mode::Aggregate,
        }
    }
}

/// Contents of a `--config` TOML file. Every key is optional.
///
/// ```toml
/// mode = "aggregate"
/// duration_minutes = 60
/// interval_minutes = 15
/// timezone = "Europe/London"
/// format = "json"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub mode: Option<Mode>,
    pub duration_minutes: Option<i64>,
    pub interval_minutes: Option<i64>,
    pub timezone: Option<String>,
    pub format: Option<Format>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Default)]
pub struct Overrides {
    pub mode: Option<ModeArg>,
    pub duration_minutes: Option<i64>,
    pub interval_minutes: Option<i64>,
    pub timezone: Option<String>,
    pub format: Option<Format>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub options: CompareOptions,
    pub formatter: WindowFormatter,
    pub format: Format,
}

impl Settings {
    /// IANA name of the rendering timezone.
    pub fn timezone(&self) -> &'static str {
        self.formatter.timezone().name()
    }

    pub fn resolve(file: FileConfig, flags: Overrides) -> Result<Self> {
        let defaults = CompareOptions::default();

        let mode = flags
            .mode
            .map(Mode::from)
            .or(file.mode)
            .unwrap_or(defaults.mode);
        let interval_seconds = flags
            .interval_minutes
            .or(file.interval_minutes)
            .map_or(defaults.interval_seconds, minutes);
        let duration_seconds = flags
            .duration_minutes
            .or(file.duration_minutes)
            .map_or(defaults.duration_seconds, minutes);

        let options = CompareOptions {
            mode,
            interval_seconds,
            duration_seconds,
        };
        options.validate().context("Invalid meeting window settings")?;

        let timezone = flags
            .timezone
            .or(file.timezone)
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let formatter = WindowFormatter::new(&timezone)?;

        Ok(Self {
            options,
            formatter,
            format: flags.format.or(file.format).unwrap_or_default(),
        })
    }
}

fn minutes(value: i64) -> i64 {
    value.saturating_mul(60)
}
