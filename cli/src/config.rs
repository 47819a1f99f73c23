// SPDX-License-Identifier: GPL-3.0-only

use std::fs;
use std::io;
use std::path::Path;

use kbdx::stopwatch::DEFAULT_TEMPLATE;
use kbdx::time::{Format, FormatFlags, Unit};
use log::LevelFilter;
use serde::{de::Error as _, Deserialize, Deserializer};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/kbdx.toml";

pub const DEFAULT_ELEMENTS: usize = 3;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    #[serde(deserialize_with = "deserialize_log_level")]
    pub level: LevelFilter,
    #[serde(default)]
    pub time: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            time: false,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    #[serde(default = "default_elements")]
    pub elements: usize,
    #[serde(default)]
    pub long: bool,
    #[serde(default)]
    pub zeros: bool,
    #[serde(default = "default_min")]
    #[serde(deserialize_with = "deserialize_unit")]
    pub min: Unit,
    #[serde(default = "default_max")]
    #[serde(deserialize_with = "deserialize_unit")]
    pub max: Unit,
    #[serde(default)]
    pub pre_unit: Option<Box<str>>,
    #[serde(default)]
    pub separator: Option<Box<str>>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            elements: default_elements(),
            long: false,
            zeros: false,
            min: default_min(),
            max: default_max(),
            pre_unit: None,
            separator: None,
        }
    }
}

impl FormatConfig {
    /// Builds format options borrowing the configured strings.
    pub fn to_format(&self) -> Format<'_> {
        let mut flags = FormatFlags::empty();
        flags.set(FormatFlags::SHORT, !self.long);
        flags.set(FormatFlags::SHOW_EMPTY, self.zeros);
        let mut fmt = Format::new()
            .min(self.min)
            .max(self.max)
            .flags(flags)
            .max_elements(match self.elements {
                0 => None,
                n => Some(n),
            });
        if let Some(s) = &self.pre_unit {
            fmt = fmt.pre_unit(s);
        }
        if let Some(s) = &self.separator {
            fmt = fmt.separator(s);
        }
        fmt
    }
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "default_template")]
    pub template: Box<str>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
        }
    }
}

fn default_log_level() -> LevelFilter {
    LevelFilter::Warn
}

fn default_elements() -> usize {
    DEFAULT_ELEMENTS
}

fn default_min() -> Unit {
    Unit::MIN
}

fn default_max() -> Unit {
    Unit::MAX
}

fn default_template() -> Box<str> {
    Box::from(DEFAULT_TEMPLATE)
}

fn deserialize_log_level<'de, D>(de: D) -> Result<LevelFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let s = <&str>::deserialize(de)?;
    parse_log_level(s).ok_or_else(|| D::Error::custom(format!("Invalid log level: \"{}\"", s)))
}

fn deserialize_unit<'de, D>(de: D) -> Result<Unit, D::Error>
where
    D: Deserializer<'de>,
{
    let s = <&str>::deserialize(de)?;
    s.parse().map_err(D::Error::custom)
}

pub fn parse_log_level(s: &str) -> Option<LevelFilter> {
    use LevelFilter as E;

    let level_filter = match s {
        _ if s.is_empty() => return None,
        _ if "off".starts_with(s) => E::Off,
        _ if "error".starts_with(s) => E::Error,
        _ if "warn".starts_with(s) => E::Warn,
        _ if "info".starts_with(s) => E::Info,
        _ if "debug".starts_with(s) => E::Debug,
        _ if "trace".starts_with(s) => E::Trace,
        _ => match s.parse::<u8>() {
            Ok(0) => E::Off,
            Ok(1) => E::Error,
            Ok(2) => E::Warn,
            Ok(3) => E::Info,
            Ok(4) => E::Debug,
            Ok(5) => E::Trace,
            _ => return None,
        },
    };
    Some(level_filter)
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
    let data = fs::read(path)?;
    Ok(toml::de::from_slice(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels() {
        assert_eq!(parse_log_level("w"), Some(LevelFilter::Warn));
        assert_eq!(parse_log_level("trace"), Some(LevelFilter::Trace));
        assert_eq!(parse_log_level("3"), Some(LevelFilter::Info));
        assert_eq!(parse_log_level("6"), None);
        assert_eq!(parse_log_level("warning"), None);
        assert_eq!(parse_log_level(""), None);
    }

    #[test]
    fn empty() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.log.level, LevelFilter::Warn);
        assert!(!cfg.log.time);
        assert_eq!(cfg.format.elements, DEFAULT_ELEMENTS);
        assert_eq!(&*cfg.report.template, DEFAULT_TEMPLATE);
        let fmt = cfg.format.to_format();
        assert_eq!(fmt.format(68_603).unwrap(), "1m 8s 603ms");
        assert_eq!(fmt.format(3_668_603).unwrap(), "1h 1m 8s");
    }

    #[test]
    fn sections() {
        let cfg: Config = toml::from_str(
            r#"
            [log]
            level = "debug"
            time = true

            [format]
            elements = 0
            long = true
            zeros = true
            min = "s"
            max = "hours"
            separator = " and "

            [report]
            template = "%A%..%B%: %C%"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.log.level, LevelFilter::Debug);
        assert!(cfg.log.time);
        assert_eq!(cfg.format.min, Unit::Second);
        assert_eq!(cfg.format.max, Unit::Hour);
        assert_eq!(&*cfg.report.template, "%A%..%B%: %C%");
        let fmt = cfg.format.to_format();
        assert_eq!(
            fmt.format(3_601_000).unwrap(),
            "1 hour and 0 minutes and 1 second"
        );
    }

    #[test]
    fn invalid() {
        assert!(toml::from_str::<Config>("[log]\nlevel = \"loud\"").is_err());
        assert!(toml::from_str::<Config>("[format]\nmin = \"weeks\"").is_err());
        assert!(toml::from_str::<Config>("[format]\ncolor = true").is_err());
        assert!(toml::from_str::<Config>("[server]").is_err());
    }
}
