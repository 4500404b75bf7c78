// GlucosePlotter - platform/config.rs
//
// Optional config.toml loading with startup validation.
//
// A config file is only read when the user names one with --config; without
// it every setting comes from `util::constants`. Read and TOML syntax
// failures are fatal because the file was asked for explicitly. Individual
// out-of-range values are reported as warnings and fall back to defaults.

use crate::core::chart::ChartConfig;
use crate::util::constants;
use crate::util::error::ConfigError;
use std::path::Path;

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[chart]` section.
    pub chart: ChartSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[chart]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ChartSection {
    /// Canvas width in pixels.
    pub width: Option<u32>,
    /// Canvas height in pixels.
    pub height: Option<u32>,
    /// Annotation anchor as a fraction of the mean glucose value.
    pub annotation_mean_fraction: Option<f64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub chart: ChartConfig,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

/// Load and validate the config file at `path`.
///
/// Returns the validated config and a list of non-fatal warnings.
pub fn load_config(path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (config, warnings) = parse_config(&content, path)?;

    tracing::info!(path = %path.display(), warnings = warnings.len(), "Loaded config");
    Ok((config, warnings))
}

/// Parse and validate config text. `path` is used for error context only.
pub fn parse_config(content: &str, path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(validate(raw))
}

/// Validate each field against named constants, accumulating all warnings.
fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Chart: width --
    if let Some(width) = raw.chart.width {
        if (constants::MIN_CANVAS_WIDTH..=constants::MAX_CANVAS_WIDTH).contains(&width) {
            config.chart.width = width;
        } else {
            warnings.push(format!(
                "[chart] width = {width} is out of range ({}-{}). Using default ({}).",
                constants::MIN_CANVAS_WIDTH,
                constants::MAX_CANVAS_WIDTH,
                constants::DEFAULT_CANVAS_WIDTH,
            ));
        }
    }

    // -- Chart: height --
    if let Some(height) = raw.chart.height {
        if (constants::MIN_CANVAS_HEIGHT..=constants::MAX_CANVAS_HEIGHT).contains(&height) {
            config.chart.height = height;
        } else {
            warnings.push(format!(
                "[chart] height = {height} is out of range ({}-{}). Using default ({}).",
                constants::MIN_CANVAS_HEIGHT,
                constants::MAX_CANVAS_HEIGHT,
                constants::DEFAULT_CANVAS_HEIGHT,
            ));
        }
    }

    // -- Chart: annotation_mean_fraction --
    if let Some(fraction) = raw.chart.annotation_mean_fraction {
        if (constants::MIN_ANNOTATION_MEAN_FRACTION..=constants::MAX_ANNOTATION_MEAN_FRACTION)
            .contains(&fraction)
        {
            config.chart.annotation_mean_fraction = fraction;
        } else {
            warnings.push(format!(
                "[chart] annotation_mean_fraction = {fraction} is out of range ({}-{}). \
                 Using default ({:.4}).",
                constants::MIN_ANNOTATION_MEAN_FRACTION,
                constants::MAX_ANNOTATION_MEAN_FRACTION,
                constants::DEFAULT_ANNOTATION_MEAN_FRACTION,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> (AppConfig, Vec<String>) {
        parse_config(content, &PathBuf::from("config.toml")).unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let (config, warnings) = parse("");
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_values_are_applied() {
        let (config, warnings) = parse(
            r#"
[chart]
width = 2000
height = 600
annotation_mean_fraction = 1.0

[logging]
level = "DEBUG"
"#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.chart.width, 2000);
        assert_eq!(config.chart.height, 600);
        assert_eq!(config.chart.annotation_mean_fraction, 1.0);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_warn_and_keep_defaults() {
        let (config, warnings) = parse(
            r#"
[chart]
width = 10
height = 100000
annotation_mean_fraction = -1.0

[logging]
level = "loud"
"#,
        );
        assert_eq!(warnings.len(), 4, "{warnings:?}");
        assert_eq!(config, AppConfig::default());
        assert!(warnings[0].contains("[chart] width"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (config, warnings) = parse("[chart]\ntheme = \"dark\"\n[extra]\nkey = 1\n");
        assert!(warnings.is_empty());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let err = parse_config("[chart\nwidth = ", &PathBuf::from("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse { .. }));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chart]\nheight = 800\n").unwrap();
        let (config, _) = load_config(&path).unwrap();
        assert_eq!(config.chart.height, 800);
        assert_eq!(config.chart.width, constants::DEFAULT_CANVAS_WIDTH);
    }

    #[test]
    fn test_shipped_example_config_is_clean() {
        let (config, warnings) = parse(include_str!("../../config.example.toml"));
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.chart.width, constants::DEFAULT_CANVAS_WIDTH);
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }
}
