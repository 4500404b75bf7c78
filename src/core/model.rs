// GlucosePlotter - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// rendering dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::NaiveDateTime;

// =============================================================================
// Raw extraction output
// =============================================================================

/// One pattern match, still as text borrowed from the source body.
///
/// `value` holds the glucose reading for measurements and the gram amount
/// for ingestion events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub timestamp: &'a str,
    pub value: &'a str,
    /// 1-based line on which the match starts.
    pub line_number: u64,
}

/// Both record streams of a source body, in input order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawRecords<'a> {
    pub measurements: Vec<RawRecord<'a>>,
    pub ingestions: Vec<RawRecord<'a>>,
}

// =============================================================================
// Typed records
// =============================================================================

/// A single glucose reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub timestamp: NaiveDateTime,
    /// Glucose level in the unit of the source file (mmol/l in practice).
    pub value: f64,
}

/// A single recorded carbohydrate intake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestionEvent {
    pub timestamp: NaiveDateTime,
    /// Carbohydrates in grams.
    pub amount: f64,
}

impl IngestionEvent {
    /// Annotation text drawn next to the event's marker, e.g. `"40 g"`.
    pub fn label(&self) -> String {
        format!("{} g", self.amount)
    }
}

/// Anything that sits on the chart's time axis.
pub trait Timestamped {
    fn timestamp(&self) -> NaiveDateTime;
}

impl Timestamped for Measurement {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl Timestamped for IngestionEvent {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// Everything read from one export file.
///
/// Collections are in input order straight out of the parser and in
/// chronological order once passed through `timeline::sort_data`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GlucoseData {
    pub measurements: Vec<Measurement>,
    pub ingestions: Vec<IngestionEvent>,
}

impl GlucoseData {
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty() && self.ingestions.is_empty()
    }
}
