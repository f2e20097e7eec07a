//! Handles the configuration of mviz.
//!
//! this module is responsible for parsing the Mviz.toml file, and layering environment
//! variables and cli arguments on top of it.

use config::{Config, ConfigError, Environment, File};
use mviz_analysis::BarCount;
use serde::Deserialize;

use std::{path::PathBuf, str::FromStr};

use crate::errors::SettingsError;

pub static DEFAULT_CONFIG: &str = include_str!("../Mviz.toml");

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// General Settings
    #[serde(default)]
    pub general: GeneralSettings,
    /// Settings for the bar visualization.
    #[serde(default)]
    pub bars: BarSettings,
    /// Settings for what gets written out.
    #[serde(default)]
    pub output: OutputSettings,
}

impl Settings {
    /// Load settings from the config file, environment variables, and CLI arguments.
    ///
    /// The config file is located at the path specified by the `--config` flag.
    ///
    /// The environment variables are prefixed with `MVIZ_`, sections and keys are separated by `__`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the config file is not found or if the config file is
    /// invalid.
    #[inline]
    pub fn init(
        config: PathBuf,
        log_level: Option<log::LevelFilter>,
        num_bars: Option<BarCount>,
    ) -> Result<Self, ConfigError> {
        Self::init_with_env(config, Self::environment(), log_level, num_bars)
    }

    /// The `MVIZ_` environment variable source.
    fn environment() -> Environment {
        Environment::with_prefix("MVIZ")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn init_with_env(
        config: PathBuf,
        environment: Environment,
        log_level: Option<log::LevelFilter>,
        num_bars: Option<BarCount>,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(config))
            .add_source(environment)
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Some(log_level) = log_level {
            settings.general.log_level = log_level;
        }

        if let Some(num_bars) = num_bars {
            settings.bars.num_bars = num_bars;
        }

        Ok(settings)
    }

    /// Get the (default) path to the config file.
    /// If the config file does not exist at this path, it will be created with the default config.
    ///
    /// See [`crate::get_config_dir`] for more information about where this default path is located.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system config directory (e.g., `~/.config` on linux) could not be found,
    /// or if the config file was missing and could not be created.
    #[inline]
    pub fn get_config_path() -> Result<PathBuf, SettingsError> {
        let config_dir = crate::get_config_dir()?;
        Ok(Self::ensure_config_file(&config_dir)?)
    }

    /// Make sure `Mviz.toml` exists in `config_dir`, writing the default config if it doesn't.
    ///
    /// # Errors
    ///
    /// Fails if the directory or the file can't be created.
    #[inline]
    pub fn ensure_config_file(config_dir: &std::path::Path) -> Result<PathBuf, std::io::Error> {
        // if the config directory does not exist, create it
        if !config_dir.exists() {
            std::fs::create_dir_all(config_dir)?;
        }
        let config_file = config_dir.join("Mviz.toml");

        if !config_file.exists() {
            log::debug!("Writing default config to {}", config_file.display());
            std::fs::write(&config_file, DEFAULT_CONFIG)?;
        }

        Ok(config_file)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GeneralSettings {
    /// What level of logging to use.
    /// Default is "info".
    #[serde(default = "default_log_level")]
    #[serde(deserialize_with = "de_log_level")]
    pub log_level: log::LevelFilter,
}

fn de_log_level<'de, D>(deserializer: D) -> Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(log::LevelFilter::from_str(&s).unwrap_or_else(|_| default_log_level()))
}

const fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

impl Default for GeneralSettings {
    #[inline]
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct BarSettings {
    /// How many bars to extract from the chromagram.
    /// Must be positive.
    /// Default is 32.
    #[serde(default)]
    #[serde(deserialize_with = "de_num_bars")]
    pub num_bars: BarCount,
}

fn de_num_bars<'de, D>(deserializer: D) -> Result<BarCount, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let n = i64::deserialize(deserializer)?;
    BarCount::try_from(n).map_err(serde::de::Error::custom)
}

impl Default for BarSettings {
    #[inline]
    fn default() -> Self {
        Self {
            num_bars: BarCount::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A plain JSON document.
    #[default]
    Json,
    /// A script defining the `audioData` constant.
    Js,
}

#[derive(Clone, Copy, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct OutputSettings {
    /// Either "json" or "js".
    #[serde(default)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde::de::IntoDeserializer;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, contents).unwrap();
        (temp_dir, config_path)
    }

    #[rstest]
    #[case("debug", log::LevelFilter::Debug)]
    #[case("TRACE", log::LevelFilter::Trace)]
    #[case("off", log::LevelFilter::Off)]
    #[case("loud", log::LevelFilter::Info)]
    fn test_de_log_level(#[case] input: &str, #[case] expected: log::LevelFilter) {
        let deserializer: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
            input.into_deserializer();
        assert_eq!(de_log_level(deserializer).unwrap(), expected);
    }

    #[rstest]
    #[case(1)]
    #[case(32)]
    #[case(512)]
    fn test_de_num_bars(#[case] input: i64) {
        let deserializer: serde::de::value::I64Deserializer<serde::de::value::Error> =
            input.into_deserializer();
        assert_eq!(
            de_num_bars(deserializer).unwrap(),
            BarCount::try_from(input).unwrap()
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn test_de_num_bars_rejects_non_positive(#[case] input: i64) {
        let deserializer: serde::de::value::I64Deserializer<serde::de::value::Error> =
            input.into_deserializer();
        assert!(de_num_bars(deserializer).is_err());
    }

    #[test]
    fn test_init_config() {
        let (_temp_dir, config_path) = write_config(
            r#"
[general]
log_level = "debug"

[bars]
num_bars = 48

[output]
format = "js"
            "#,
        );

        let expected = Settings {
            general: GeneralSettings {
                log_level: log::LevelFilter::Debug,
            },
            bars: BarSettings {
                num_bars: BarCount::try_from(48_usize).unwrap(),
            },
            output: OutputSettings {
                format: OutputFormat::Js,
            },
        };

        let settings = Settings::init(config_path, None, None).unwrap();

        assert_eq!(settings, expected);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let (_temp_dir, config_path) = write_config(
            r#"
[bars]
num_bars = 16
            "#,
        );

        let settings = Settings::init(config_path, None, None).unwrap();

        assert_eq!(settings.general, GeneralSettings::default());
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert_eq!(settings.bars.num_bars.get(), 16);
    }

    #[test]
    fn test_cli_overrides() {
        let (_temp_dir, config_path) = write_config(DEFAULT_CONFIG);

        let settings = Settings::init(
            config_path,
            Some(log::LevelFilter::Warn),
            Some(BarCount::try_from(8_usize).unwrap()),
        )
        .unwrap();

        assert_eq!(settings.general.log_level, log::LevelFilter::Warn);
        assert_eq!(settings.bars.num_bars.get(), 8);
    }

    fn env_vars(vars: &[(&str, &str)]) -> Environment {
        Settings::environment().source(Some(
            vars.iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        ))
    }

    #[test]
    fn test_env_overrides_config_file() {
        let (_temp_dir, config_path) = write_config(DEFAULT_CONFIG);
        let env = env_vars(&[
            ("MVIZ_GENERAL__LOG_LEVEL", "warn"),
            ("MVIZ_BARS__NUM_BARS", "48"),
            ("MVIZ_OUTPUT__FORMAT", "js"),
            ("OTHER_BARS__NUM_BARS", "3"),
        ]);

        let settings = Settings::init_with_env(config_path, env, None, None).unwrap();

        assert_eq!(
            settings,
            Settings {
                general: GeneralSettings {
                    log_level: log::LevelFilter::Warn,
                },
                bars: BarSettings {
                    num_bars: BarCount::try_from(48_usize).unwrap(),
                },
                output: OutputSettings {
                    format: OutputFormat::Js,
                },
            }
        );
    }

    #[test]
    fn test_cli_overrides_env() {
        let (_temp_dir, config_path) = write_config("[bars]\nnum_bars = 16\n");
        let env = env_vars(&[
            ("MVIZ_GENERAL__LOG_LEVEL", "warn"),
            ("MVIZ_BARS__NUM_BARS", "48"),
        ]);

        let settings = Settings::init_with_env(
            config_path,
            env,
            Some(log::LevelFilter::Trace),
            Some(BarCount::try_from(8_usize).unwrap()),
        )
        .unwrap();

        assert_eq!(settings.general.log_level, log::LevelFilter::Trace);
        assert_eq!(settings.bars.num_bars.get(), 8);
    }

    #[test]
    fn test_env_num_bars_validated() {
        let (_temp_dir, config_path) = write_config(DEFAULT_CONFIG);
        let env = env_vars(&[("MVIZ_BARS__NUM_BARS", "-5")]);

        let settings = Settings::init_with_env(config_path, env, None, None);

        assert!(settings.is_err(), "{settings:?}");
    }

    #[rstest]
    #[case::zero("[bars]\nnum_bars = 0\n")]
    #[case::negative("[bars]\nnum_bars = -5\n")]
    #[case::bad_format("[output]\nformat = \"yaml\"\n")]
    fn test_invalid_config_rejected(#[case] contents: &str) {
        let (_temp_dir, config_path) = write_config(contents);

        let settings = Settings::init(config_path, None, None);

        assert!(settings.is_err(), "{settings:?}");
    }

    #[test]
    fn test_missing_config_file_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings = Settings::init(temp_dir.path().join("nope.toml"), None, None);
        assert!(settings.is_err());
    }

    #[test]
    fn test_default_config_works() {
        let (_temp_dir, config_path) = write_config(DEFAULT_CONFIG);

        let settings = Settings::init(config_path, None, None);

        assert!(settings.is_ok(), "Error: {:?}", settings.err());
        assert_eq!(settings.unwrap(), Settings::default());
    }

    #[test]
    fn test_ensure_config_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_dir = temp_dir.path().join("nested").join("mviz");

        let config_file = Settings::ensure_config_file(&config_dir).unwrap();
        assert_eq!(config_file, config_dir.join("Mviz.toml"));
        assert_eq!(std::fs::read_to_string(&config_file).unwrap(), DEFAULT_CONFIG);

        // an existing file is left alone
        std::fs::write(&config_file, "[bars]\nnum_bars = 4\n").unwrap();
        Settings::ensure_config_file(&config_dir).unwrap();
        assert_eq!(
            std::fs::read_to_string(&config_file).unwrap(),
            "[bars]\nnum_bars = 4\n"
        );
    }
}
