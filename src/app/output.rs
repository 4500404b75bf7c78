// GlucosePlotter - app/output.rs
//
// Default output path resolution.
//
// Without --output-file the chart lands next to the input, named after it
// with the last four characters (normally ".csv") replaced by a local-clock
// stamp: `data.csv` -> `data_1601261430.png`.

use crate::util::constants;
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Default chart path for `input`, stamped with `now`.
pub fn default_output_path(input: &Path, now: NaiveDateTime) -> PathBuf {
    let input = input.to_string_lossy();
    let char_count = input.chars().count();
    let keep = char_count.saturating_sub(constants::INPUT_EXTENSION_LEN);
    let stem_end = input
        .char_indices()
        .nth(keep)
        .map_or(input.len(), |(idx, _)| idx);

    PathBuf::from(format!(
        "{}_{}.{}",
        &input[..stem_end],
        now.format(constants::OUTPUT_STAMP_FORMAT),
        constants::OUTPUT_EXTENSION
    ))
}

/// Resolve the output path: an explicit path wins, otherwise the default
/// stamped with the current local time.
pub fn resolve_output_path(input: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input, Local::now().naive_local()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use regex::Regex;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 16)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_default_output_path_replaces_extension() {
        let path = default_output_path(Path::new("data.csv"), now());
        assert_eq!(path, PathBuf::from("data_1601261430.png"));
    }

    #[test]
    fn test_default_output_path_keeps_directories() {
        let path = default_output_path(Path::new("exports/jan/data.txt"), now());
        assert_eq!(path, PathBuf::from("exports/jan/data_1601261430.png"));
    }

    #[test]
    fn test_default_output_path_short_input() {
        let path = default_output_path(Path::new("abc"), now());
        assert_eq!(path, PathBuf::from("_1601261430.png"));
    }

    #[test]
    fn test_default_output_path_multibyte_name() {
        let path = default_output_path(Path::new("glukóz.csv"), now());
        assert_eq!(path, PathBuf::from("glukóz_1601261430.png"));
    }

    #[test]
    fn test_resolve_uses_clock_when_not_given() {
        let path = resolve_output_path(Path::new("data.csv"), None);
        let re = Regex::new(r"^data_\d{10}\.png$").unwrap();
        assert!(re.is_match(&path.to_string_lossy()), "{}", path.display());
    }

    #[test]
    fn test_resolve_prefers_explicit_path() {
        let path = resolve_output_path(Path::new("data.csv"), Some(Path::new("out/chart.png")));
        assert_eq!(path, PathBuf::from("out/chart.png"));
    }
}
