// GlucosePlotter - core/chart.rs
//
// Chart geometry: axis ranges, ticks, the glucose line and the ingestion
// overlay, laid out in canvas pixels and serialised as an SVG document.
//
// Core layer: no I/O. Rasterisation lives in `core::export`.
//
// Pixel space has its origin at the top-left corner of the canvas; the plot
// area is the canvas minus the fixed margins from `util::constants`.

use crate::core::model::GlucoseData;
use crate::core::timeline;
use crate::util::constants;
use chrono::{Duration, NaiveDateTime, Timelike};
use std::fmt;

/// Rendering parameters that may be overridden from config.toml.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Annotation anchor height as a fraction of the mean glucose value.
    pub annotation_mean_fraction: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: constants::DEFAULT_CANVAS_WIDTH,
            height: constants::DEFAULT_CANVAS_HEIGHT,
            annotation_mean_fraction: constants::DEFAULT_ANNOTATION_MEAN_FRACTION,
        }
    }
}

/// Rectangle of the canvas the data is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    fn for_canvas(width: u32, height: u32) -> Self {
        let left = constants::MARGIN_LEFT;
        let top = constants::MARGIN_TOP;
        // Keep at least one pixel of plot area on tiny canvases.
        let right = (f64::from(width) - constants::MARGIN_RIGHT).max(left + 1.0);
        let bottom = (f64::from(height) - constants::MARGIN_BOTTOM).max(top + 1.0);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// One labelled tick; `position` is in canvas pixels along its axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// A vertical ingestion marker with its annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub timestamp: NaiveDateTime,
    /// Canvas x of the dashed line.
    pub x: f64,
    /// Annotation text, e.g. `"40 g"`.
    pub label: String,
    /// Canvas position of the annotation text anchor.
    pub label_x: f64,
    pub label_y: f64,
}

/// A fully laid-out chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub width: u32,
    pub height: u32,
    pub area: PlotArea,
    /// Visible time window.
    pub x_range: (NaiveDateTime, NaiveDateTime),
    /// Visible glucose window.
    pub y_range: (f64, f64),
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    /// Glucose line vertices in canvas pixels, in chronological order.
    pub points: Vec<(f64, f64)>,
    /// Ingestion overlay; empty when the overlay is off.
    pub markers: Vec<Marker>,
}

impl Chart {
    /// Lay out `data` on a canvas described by `config`.
    ///
    /// `data` must already be chronologically sorted; the line is drawn in
    /// slice order. When `overlay_ingestions` is false the ingestion series
    /// is ignored entirely, including for the x range.
    pub fn build(data: &GlucoseData, overlay_ingestions: bool, config: &ChartConfig) -> Self {
        let area = PlotArea::for_canvas(config.width, config.height);

        let measurement_span = timeline::time_span(&data.measurements);
        let ingestion_span = if overlay_ingestions {
            timeline::time_span(&data.ingestions)
        } else {
            None
        };
        let x_range = x_range_for(merge_spans(measurement_span, ingestion_span));
        let y_range = y_range_for(timeline::value_range(&data.measurements));

        let mut chart = Self {
            width: config.width,
            height: config.height,
            area,
            x_range,
            y_range,
            x_ticks: Vec::new(),
            y_ticks: Vec::new(),
            points: Vec::new(),
            markers: Vec::new(),
        };

        chart.x_ticks = hourly_ticks(x_range)
            .into_iter()
            .map(|ts| Tick {
                position: chart.x_for(ts),
                label: ts.format(constants::X_TICK_LABEL_FORMAT).to_string(),
            })
            .collect();

        chart.y_ticks = value_ticks(y_range)
            .into_iter()
            .map(|(value, label)| Tick {
                position: chart.y_for(value),
                label,
            })
            .collect();

        chart.points = data
            .measurements
            .iter()
            .map(|m| (chart.x_for(m.timestamp), chart.y_for(m.value)))
            .collect();

        if overlay_ingestions {
            let anchor_value = timeline::mean_value(&data.measurements)
                .map(|mean| mean * config.annotation_mean_fraction)
                .unwrap_or((y_range.0 + y_range.1) / 2.0)
                .clamp(y_range.0, y_range.1);
            let (dx, dy) = constants::ANNOTATION_OFFSET_PT;
            // Labels stay inside the frame, clear of the tick-label band.
            let note_font = constants::ANNOTATION_FONT_PT * constants::PX_PER_POINT;
            let label_y = (chart.y_for(anchor_value) - dy * constants::PX_PER_POINT)
                .clamp(area.top + note_font, area.bottom);

            chart.markers = data
                .ingestions
                .iter()
                .map(|event| {
                    let x = chart.x_for(event.timestamp);
                    Marker {
                        timestamp: event.timestamp,
                        x,
                        label: event.label(),
                        label_x: x + dx * constants::PX_PER_POINT,
                        label_y,
                    }
                })
                .collect();
        }

        tracing::debug!(
            width = chart.width,
            height = chart.height,
            points = chart.points.len(),
            markers = chart.markers.len(),
            x_ticks = chart.x_ticks.len(),
            y_ticks = chart.y_ticks.len(),
            "Chart laid out"
        );

        chart
    }

    /// Canvas x of a timestamp.
    pub fn x_for(&self, ts: NaiveDateTime) -> f64 {
        let (lo, hi) = self.x_range;
        let span = (hi - lo).num_milliseconds() as f64;
        let offset = (ts - lo).num_milliseconds() as f64;
        self.area.left + offset / span * self.area.width()
    }

    /// Canvas y of a glucose value (larger values sit higher).
    pub fn y_for(&self, value: f64) -> f64 {
        let (lo, hi) = self.y_range;
        self.area.bottom - (value - lo) / (hi - lo) * self.area.height()
    }
}

fn merge_spans(
    a: Option<(NaiveDateTime, NaiveDateTime)>,
    b: Option<(NaiveDateTime, NaiveDateTime)>,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    match (a, b) {
        (Some((a_lo, a_hi)), Some((b_lo, b_hi))) => Some((a_lo.min(b_lo), a_hi.max(b_hi))),
        (span, None) | (None, span) => span,
    }
}

/// Visible time window for a data span: padded, never zero-width.
fn x_range_for(span: Option<(NaiveDateTime, NaiveDateTime)>) -> (NaiveDateTime, NaiveDateTime) {
    match span {
        None => {
            // Nothing to show: one day starting at the Unix epoch.
            let start = NaiveDateTime::default();
            (start, start + Duration::days(1))
        }
        Some((lo, hi)) if lo == hi => {
            let pad = Duration::minutes(constants::DEGENERATE_X_PAD_MINUTES);
            (lo - pad, hi + pad)
        }
        Some((lo, hi)) => {
            let span_ms = (hi - lo).num_milliseconds() as f64;
            let pad = Duration::milliseconds((span_ms * constants::AXIS_MARGIN_FRACTION) as i64);
            (lo - pad, hi + pad)
        }
    }
}

/// Visible glucose window for a value range: padded, never zero-height.
fn y_range_for(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        None => (0.0, 1.0),
        Some((lo, hi)) if hi - lo <= f64::EPSILON => {
            (lo - constants::DEGENERATE_Y_PAD, hi + constants::DEGENERATE_Y_PAD)
        }
        Some((lo, hi)) => {
            let pad = (hi - lo) * constants::AXIS_MARGIN_FRACTION;
            (lo - pad, hi + pad)
        }
    }
}

/// Whole-hour instants inside `range`, one hour apart unless that would
/// exceed `MAX_X_TICKS`, in which case the step is widened to whole hours.
fn hourly_ticks((lo, hi): (NaiveDateTime, NaiveDateTime)) -> Vec<NaiveDateTime> {
    let Some(floor) = lo
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
    else {
        return Vec::new();
    };
    let first = if floor < lo {
        floor + Duration::hours(1)
    } else {
        floor
    };
    if first > hi {
        return Vec::new();
    }

    let hours = (hi - first).num_hours() + 1;
    let max_ticks = constants::MAX_X_TICKS as i64;
    let step_hours = ((hours + max_ticks - 1) / max_ticks).max(1);
    let step = Duration::hours(step_hours);

    let mut ticks = Vec::new();
    let mut t = first;
    while t <= hi {
        ticks.push(t);
        t += step;
    }
    ticks
}

/// "Nice" y tick values (1, 2 or 5 times a power of ten apart) with labels
/// carrying just enough decimals for the step.
fn value_ticks((lo, hi): (f64, f64)) -> Vec<(f64, String)> {
    let span = hi - lo;
    if !(span.is_finite() && span > 0.0) {
        return Vec::new();
    }

    let raw_step = span / constants::Y_TICK_TARGET as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalised = raw_step / magnitude;
    let nice = if normalised <= 1.0 {
        1.0
    } else if normalised <= 2.0 {
        2.0
    } else if normalised <= 5.0 {
        5.0
    } else {
        10.0
    };
    let step = nice * magnitude;
    let decimals = (-step.log10().floor()).max(0.0) as usize;

    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last)
        .map(|i| {
            let value = i as f64 * step;
            (value, format!("{value:.decimals$}"))
        })
        .collect()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Serialises the chart as a standalone SVG document.
impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.area;
        let tick_font = constants::TICK_FONT_PT * constants::PX_PER_POINT;
        let title_font = constants::AXIS_TITLE_FONT_PT * constants::PX_PER_POINT;
        let note_font = constants::ANNOTATION_FONT_PT * constants::PX_PER_POINT;

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        )?;
        writeln!(
            f,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            self.width,
            self.height,
            constants::BACKGROUND_COLOUR
        )?;

        // Grid
        writeln!(
            f,
            r#"<g id="grid" stroke="{}" stroke-width="{}">"#,
            constants::GRID_COLOUR,
            constants::GRID_STROKE_WIDTH
        )?;
        for tick in &self.x_ticks {
            writeln!(
                f,
                r#"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}"/>"#,
                a.top,
                a.bottom,
                x = tick.position
            )?;
        }
        for tick in &self.y_ticks {
            writeln!(
                f,
                r#"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}"/>"#,
                a.left,
                a.right,
                y = tick.position
            )?;
        }
        writeln!(f, "</g>")?;

        // Glucose series, clipped to the plot area.
        writeln!(
            f,
            r#"<clipPath id="plot-area"><rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/></clipPath>"#,
            a.left,
            a.top,
            a.width(),
            a.height()
        )?;
        if self.points.len() >= 2 {
            write!(
                f,
                r#"<polyline id="glucose" clip-path="url(#plot-area)" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round" points=""#,
                constants::SERIES_COLOUR,
                constants::SERIES_STROKE_WIDTH
            )?;
            for (i, (x, y)) in self.points.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{x:.1},{y:.1}")?;
            }
            writeln!(f, r#""/>"#)?;
        }

        // Ingestion overlay
        if !self.markers.is_empty() {
            writeln!(f, r#"<g id="ingestions">"#)?;
            for marker in &self.markers {
                writeln!(
                    f,
                    r#"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="{}" stroke-width="{}" stroke-dasharray="{}"/>"#,
                    a.top,
                    a.bottom,
                    constants::MARKER_COLOUR,
                    constants::MARKER_STROKE_WIDTH,
                    constants::MARKER_DASH,
                    x = marker.x
                )?;
                writeln!(
                    f,
                    r#"<text x="{:.1}" y="{:.1}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="middle">{}</text>"#,
                    marker.label_x,
                    marker.label_y,
                    constants::FONT_FAMILY,
                    note_font,
                    constants::TEXT_COLOUR,
                    escape_xml(&marker.label)
                )?;
            }
            writeln!(f, "</g>")?;
        }

        // Axes frame
        writeln!(
            f,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{}" stroke-width="1"/>"#,
            a.left,
            a.top,
            a.width(),
            a.height(),
            constants::AXIS_COLOUR
        )?;

        // Tick labels
        writeln!(
            f,
            r#"<g id="tick-labels" font-family="{}" font-size="{:.1}" fill="{}">"#,
            constants::FONT_FAMILY,
            tick_font,
            constants::TEXT_COLOUR
        )?;
        let label_y = a.bottom + tick_font;
        for tick in &self.x_ticks {
            writeln!(
                f,
                r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" transform="rotate(-{} {x:.1} {y:.1})">{}</text>"#,
                constants::X_LABEL_ROTATION_DEG,
                escape_xml(&tick.label),
                x = tick.position,
                y = label_y
            )?;
        }
        for tick in &self.y_ticks {
            writeln!(
                f,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
                a.left - tick_font * 0.5,
                tick.position + tick_font * 0.35,
                escape_xml(&tick.label)
            )?;
        }
        writeln!(f, "</g>")?;

        // Axis titles
        writeln!(
            f,
            r#"<text x="{:.1}" y="{:.1}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="middle">{}</text>"#,
            a.left + a.width() / 2.0,
            f64::from(self.height) - title_font * 0.5,
            constants::FONT_FAMILY,
            title_font,
            constants::TEXT_COLOUR,
            escape_xml(constants::X_AXIS_TITLE)
        )?;
        let (tx, ty) = (title_font, a.top + a.height() / 2.0);
        writeln!(
            f,
            r#"<text x="{tx:.1}" y="{ty:.1}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="middle" transform="rotate(-90 {tx:.1} {ty:.1})">{}</text>"#,
            constants::FONT_FAMILY,
            title_font,
            constants::TEXT_COLOUR,
            escape_xml(constants::Y_AXIS_TITLE)
        )?;

        writeln!(f, "</svg>")
    }
}
