// GlucosePlotter - core/parser.rs
//
// Record extraction and type conversion for glucose-monitor exports.
// Core layer: accepts the file body as a string, never touches the
// filesystem directly.
//
// Extraction is deliberately loose: anything that does not match one of the
// two record patterns is skipped without a diagnostic. Conversion is strict:
// a record that matched but carries an impossible date is a hard error.

use crate::core::model::{GlucoseData, IngestionEvent, Measurement, RawRecord, RawRecords};
use crate::util::constants;
use crate::util::error::ParseError;
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

/// Compiled record patterns, built once per process.
struct Patterns {
    measurement: Regex,
    ingestion: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        // Both patterns are compile-time constants exercised by the unit
        // tests below, so a mistake shows up as a failing test.
        fn re(pat: &str) -> Regex {
            Regex::new(pat).expect("record pattern: invalid regex")
        }
        Patterns {
            measurement: re(constants::MEASUREMENT_PATTERN),
            ingestion: re(constants::INGESTION_PATTERN),
        }
    })
}

/// Maps byte offsets to 1-based line numbers for offsets visited in
/// ascending order.
struct LineCounter<'a> {
    content: &'a str,
    offset: usize,
    line: u64,
}

impl<'a> LineCounter<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content,
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, offset: usize) -> u64 {
        let newlines = self.content.as_bytes()[self.offset..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.line += newlines as u64;
        self.offset = offset;
        self.line
    }
}

/// Collect every non-overlapping match of `re` in `content`, in order.
fn collect_matches<'a>(re: &Regex, content: &'a str) -> Vec<RawRecord<'a>> {
    let mut lines = LineCounter::new(content);
    re.captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let timestamp = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            Some(RawRecord {
                timestamp,
                value,
                line_number: lines.line_at(whole.start()),
            })
        })
        .collect()
}

/// Extract the raw measurement and ingestion records from a file body.
///
/// Both output sequences keep input order. Noise, headers and records on
/// other channels are ignored.
pub fn extract_records(content: &str) -> RawRecords<'_> {
    let patterns = patterns();
    let records = RawRecords {
        measurements: collect_matches(&patterns.measurement, content),
        ingestions: collect_matches(&patterns.ingestion, content),
    };

    tracing::debug!(
        measurements = records.measurements.len(),
        ingestions = records.ingestions.len(),
        bytes = content.len(),
        "Records extracted"
    );

    records
}

/// Parse a captured timestamp with the fixed export format.
pub fn parse_timestamp(raw: &str, line_number: u64) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(raw, constants::RECORD_TIMESTAMP_FORMAT).map_err(|source| {
        ParseError::TimestampParse {
            line_number,
            raw_timestamp: raw.to_string(),
            format: constants::RECORD_TIMESTAMP_FORMAT,
            source,
        }
    })
}

fn parse_value(raw: &str, line_number: u64) -> Result<f64, ParseError> {
    raw.parse::<f64>().map_err(|source| ParseError::ValueParse {
        line_number,
        raw_value: raw.to_string(),
        source,
    })
}

/// Convert one raw record into its timestamp and numeric value.
pub fn convert_record(record: &RawRecord<'_>) -> Result<(NaiveDateTime, f64), ParseError> {
    let timestamp = parse_timestamp(record.timestamp, record.line_number)?;
    let value = parse_value(record.value, record.line_number)?;
    Ok((timestamp, value))
}

/// Convert extracted records into typed series, preserving input order.
///
/// Fails on the first record whose text matched a pattern but does not
/// convert.
pub fn convert_records(raw: &RawRecords<'_>) -> Result<GlucoseData, ParseError> {
    let measurements = raw
        .measurements
        .iter()
        .map(|r| convert_record(r).map(|(timestamp, value)| Measurement { timestamp, value }))
        .collect::<Result<Vec<_>, _>>()?;

    let ingestions = raw
        .ingestions
        .iter()
        .map(|r| convert_record(r).map(|(timestamp, amount)| IngestionEvent { timestamp, amount }))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GlucoseData {
        measurements,
        ingestions,
    })
}

/// Extract and convert a whole file body. Output is in input order.
pub fn parse_content(content: &str) -> Result<GlucoseData, ParseError> {
    let data = convert_records(&extract_records(content))?;

    tracing::debug!(
        measurements = data.measurements.len(),
        ingestions = data.ingestions.len(),
        "Parsing complete"
    );

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_extract_counts_with_noise() {
        let content = "Glucose export\n\
                       Device,Serial,Timestamp,Type,Hist,Scan,Carbs\n\
                       01-01-2024 08:00,0,,5.5\n\
                       random noise line\n\
                       01-01-2024 08:15,1,,,6.1\n\
                       01-01-2024 08:30,5,,,,40\n\
                       01-01-2024 08:35,6,,note\n\
                       \n\
                       01-01-2024 09:00,0,,6.2\n\
                       01-01-2024 12:00,5,,75\n";

        let raw = extract_records(content);
        assert_eq!(raw.measurements.len(), 3);
        assert_eq!(raw.ingestions.len(), 2);

        assert_eq!(raw.measurements[0].timestamp, "01-01-2024 08:00");
        assert_eq!(raw.measurements[0].value, "5.5");
        assert_eq!(raw.measurements[1].value, "6.1");
        assert_eq!(raw.measurements[2].value, "6.2");
        assert_eq!(raw.ingestions[0].value, "40");
        assert_eq!(raw.ingestions[1].timestamp, "01-01-2024 12:00");
        assert_eq!(raw.ingestions[1].value, "75");
    }

    #[test]
    fn test_extract_records_line_numbers() {
        let content = "header\n01-01-2024 08:00,0,,5.5\nnoise\n01-01-2024 08:30,5,,40\n";
        let raw = extract_records(content);
        assert_eq!(raw.measurements[0].line_number, 2);
        assert_eq!(raw.ingestions[0].line_number, 4);
    }

    #[test]
    fn test_extract_rejects_other_channels() {
        // Channel 10 must not be read as channel 1, and an integer reading on
        // channel 0 is not a measurement.
        let content = "01-01-2024 08:00,10,,5.5\n\
                       01-01-2024 08:00,2,,5.5\n\
                       01-01-2024 08:00,0,,5\n\
                       01-01-2024 08:00,55,,40\n";
        let raw = extract_records(content);
        assert!(raw.measurements.is_empty(), "{:?}", raw.measurements);
        assert!(raw.ingestions.is_empty(), "{:?}", raw.ingestions);
    }

    #[test]
    fn test_extract_requires_at_least_one_comma_before_value() {
        let raw = extract_records("01-01-2024 08:00,05.5\n");
        assert!(raw.measurements.is_empty());
    }

    #[test]
    fn test_extract_empty_content() {
        let raw = extract_records("");
        assert!(raw.measurements.is_empty());
        assert!(raw.ingestions.is_empty());
        let data = parse_content("").unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_parse_content_converts_in_input_order() {
        let content = "01-01-2024 08:00,0,,5.5\n\
                       01-01-2024 09:00,0,,6.2\n\
                       01-01-2024 07:00,0,,4.9\n";
        let data = parse_content(content).unwrap();
        let values: Vec<f64> = data.measurements.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![5.5, 6.2, 4.9]);
        assert_eq!(data.measurements[2].timestamp, at(1, 7, 0));
    }

    #[test]
    fn test_parse_ingestion_amount_is_float() {
        let data = parse_content("02-01-2024 08:30,5,,40\n").unwrap();
        assert_eq!(data.ingestions.len(), 1);
        assert_eq!(data.ingestions[0].timestamp, at(2, 8, 30));
        assert_eq!(data.ingestions[0].amount, 40.0);
    }

    #[test]
    fn test_parse_timestamp_accepts_unpadded_fields() {
        let ts = parse_timestamp("1-1-2024 8:05", 1).unwrap();
        assert_eq!(ts, at(1, 8, 5));
    }

    #[test]
    fn test_invalid_timestamp_is_fatal() {
        let content = "01-01-2024 08:00,0,,5.5\n32-13-2024 08:00,0,,5.6\n";
        let err = parse_content(content).unwrap_err();
        match err {
            ParseError::TimestampParse {
                line_number,
                raw_timestamp,
                ..
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(raw_timestamp, "32-13-2024 08:00");
            }
            other => panic!("expected TimestampParse, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_ingestion_timestamp_is_fatal() {
        let err = parse_content("01-01-2024 25:00,5,,40\n").unwrap_err();
        assert!(matches!(err, ParseError::TimestampParse { .. }), "{err:?}");
    }

    #[test]
    fn test_convert_record_value_error() {
        let record = RawRecord {
            timestamp: "01-01-2024 08:00",
            value: "not-a-number",
            line_number: 3,
        };
        let err = convert_record(&record).unwrap_err();
        assert!(matches!(err, ParseError::ValueParse { line_number: 3, .. }));
    }
}
