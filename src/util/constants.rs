// GlucosePlotter - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "GlucosePlotter";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Record extraction
// =============================================================================

/// Glucose reading: `<timestamp>,<0|1>,<commas>,<decimal value>`.
pub const MEASUREMENT_PATTERN: &str = r"(\d+-\d+-\d+ \d+:\d+),[01],+(\d+\.\d+)";

/// Carbohydrate intake: `<timestamp>,5,<commas>,<integer grams>`.
pub const INGESTION_PATTERN: &str = r"(\d+-\d+-\d+ \d+:\d+),5,+(\d+)";

/// chrono format of the timestamp captured by both record patterns.
pub const RECORD_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M";

// =============================================================================
// Output naming
// =============================================================================

/// Local-clock stamp appended to the default output file name (10 digits).
pub const OUTPUT_STAMP_FORMAT: &str = "%d%m%y%H%M";

/// Number of trailing characters stripped from the input path when deriving
/// the default output name (the length of ".csv").
pub const INPUT_EXTENSION_LEN: usize = 4;

/// Extension of the rendered chart.
pub const OUTPUT_EXTENSION: &str = "png";

// =============================================================================
// Canvas
// =============================================================================

/// Default canvas width in pixels (40 in at 100 dpi).
pub const DEFAULT_CANVAS_WIDTH: u32 = 4_000;

/// Default canvas height in pixels (10 in at 100 dpi).
pub const DEFAULT_CANVAS_HEIGHT: u32 = 1_000;

/// Smallest configurable canvas width. Below this the rotated tick labels
/// overlap the axis title.
pub const MIN_CANVAS_WIDTH: u32 = 320;

/// Largest configurable canvas width (keeps the RGBA buffer under ~512 MiB).
pub const MAX_CANVAS_WIDTH: u32 = 16_000;

/// Smallest configurable canvas height.
pub const MIN_CANVAS_HEIGHT: u32 = 240;

/// Largest configurable canvas height.
pub const MAX_CANVAS_HEIGHT: u32 = 8_000;

/// Points-to-pixels factor at the 100 dpi the canvas is sized for.
pub const PX_PER_POINT: f64 = 100.0 / 72.0;

// =============================================================================
// Chart layout (pixels)
// =============================================================================

/// Space left of the plot area for y tick labels and the y title.
pub const MARGIN_LEFT: f64 = 110.0;

/// Space right of the plot area.
pub const MARGIN_RIGHT: f64 = 30.0;

/// Space above the plot area.
pub const MARGIN_TOP: f64 = 30.0;

/// Space below the plot area for rotated x tick labels and the x title.
pub const MARGIN_BOTTOM: f64 = 150.0;

/// Fractional padding added on both sides of each axis' data range.
pub const AXIS_MARGIN_FRACTION: f64 = 0.05;

/// Half-width of the x window around a single timestamp (minutes).
pub const DEGENERATE_X_PAD_MINUTES: i64 = 30;

/// Half-height of the y window around a constant value.
pub const DEGENERATE_Y_PAD: f64 = 0.5;

/// Target number of y ticks when choosing a "nice" step.
pub const Y_TICK_TARGET: usize = 8;

/// Upper bound on x ticks. Longer spans widen the step to whole hours.
pub const MAX_X_TICKS: usize = 200;

/// Rotation applied to x tick labels (degrees, counter-clockwise).
pub const X_LABEL_ROTATION_DEG: f64 = 30.0;

/// chrono format of the x tick labels.
pub const X_TICK_LABEL_FORMAT: &str = "%d-%m %H:%M";

/// Tick label font size in points.
pub const TICK_FONT_PT: f64 = 10.0;

/// Axis title font size in points.
pub const AXIS_TITLE_FONT_PT: f64 = 12.0;

/// Ingestion annotation font size in points.
pub const ANNOTATION_FONT_PT: f64 = 20.0;

/// Annotation offset from its anchor, in points (right, up).
pub const ANNOTATION_OFFSET_PT: (f64, f64) = (40.0, 10.0);

/// Default anchor height of ingestion annotations as a fraction of the
/// mean glucose value.
pub const DEFAULT_ANNOTATION_MEAN_FRACTION: f64 = 5.0 / 6.0;

/// Configurable range of the annotation anchor fraction.
pub const MIN_ANNOTATION_MEAN_FRACTION: f64 = 0.0;
pub const MAX_ANNOTATION_MEAN_FRACTION: f64 = 2.0;

/// Horizontal axis title.
pub const X_AXIS_TITLE: &str = "Time";

/// Vertical axis title.
pub const Y_AXIS_TITLE: &str = "glucose mmol/l";

// =============================================================================
// Chart colours and strokes
// =============================================================================

pub const BACKGROUND_COLOUR: &str = "#ffffff";
pub const AXIS_COLOUR: &str = "#000000";
pub const GRID_COLOUR: &str = "#808080";
pub const SERIES_COLOUR: &str = "#1f77b4";
pub const MARKER_COLOUR: &str = "#ff0000";
pub const TEXT_COLOUR: &str = "#000000";

pub const GRID_STROKE_WIDTH: f64 = 1.0;
pub const SERIES_STROKE_WIDTH: f64 = 2.0;
pub const MARKER_STROKE_WIDTH: f64 = 2.0;

/// SVG dash pattern for ingestion markers.
pub const MARKER_DASH: &str = "10 6";

/// Font family requested by the SVG scene.
pub const FONT_FAMILY: &str = "sans-serif";

/// Installed families tried, in order, as the concrete `sans-serif` face.
pub const PREFERRED_SANS_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
    "Segoe UI",
];

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Progress messages go to stdout, so diagnostics stay
/// quiet unless asked for.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Accepted values of `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
