// GlucosePlotter - app/pipeline.rs
//
// The read -> extract -> convert -> sort -> render pipeline.
//
// Everything here is a plain function of its inputs: no globals, no process
// exit, no stdout. The binary wraps these calls with argument handling and
// user-facing messages; tests call them directly.

use crate::core::chart::{Chart, ChartConfig};
use crate::core::export;
use crate::core::model::GlucoseData;
use crate::core::{parser, timeline};
use crate::platform::fs;
use crate::util::error::{ExportError, GlucosePlotError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Everything needed for one chart.
#[derive(Debug, Clone)]
pub struct PlotRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Draw ingestion markers and annotations.
    pub overlay_ingestions: bool,
    pub chart: ChartConfig,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotSummary {
    pub measurements: usize,
    pub ingestions: usize,
    pub output: PathBuf,
}

/// Read and parse an export file into chronologically sorted series.
///
/// The file is read in full and closed before parsing starts.
pub fn load(input: &Path) -> Result<GlucoseData> {
    let content = fs::read_file_lossy(input).map_err(|source| GlucosePlotError::Io {
        path: input.to_path_buf(),
        operation: "read",
        source,
    })?;

    let data = timeline::sort_data(parser::parse_content(&content)?);

    tracing::info!(
        file = %input.display(),
        measurements = data.measurements.len(),
        ingestions = data.ingestions.len(),
        "Export loaded"
    );

    Ok(data)
}

/// Render sorted `data` to a PNG at `output`.
///
/// The output file is created, written and closed within this call.
pub fn render(
    data: &GlucoseData,
    overlay_ingestions: bool,
    config: &ChartConfig,
    output: &Path,
) -> Result<()> {
    let chart = Chart::build(data, overlay_ingestions, config);

    let io_error = |source| {
        GlucosePlotError::from(ExportError::Io {
            path: output.to_path_buf(),
            source,
        })
    };

    let mut writer = fs::create_output(output).map_err(io_error)?;
    export::export_png(&chart, &mut writer, output)?;
    writer.flush().map_err(io_error)?;

    tracing::info!(
        path = %output.display(),
        markers = chart.markers.len(),
        "Chart written"
    );

    Ok(())
}

/// Run the whole pipeline for one request.
///
/// This is the library entry point. The binary calls [`load`] and
/// [`render`] separately so it can print its progress lines between them.
pub fn run(request: &PlotRequest) -> Result<PlotSummary> {
    let data = load(&request.input)?;
    render(
        &data,
        request.overlay_ingestions,
        &request.chart,
        &request.output,
    )?;

    Ok(PlotSummary {
        measurements: data.measurements.len(),
        ingestions: data.ingestions.len(),
        output: request.output.clone(),
    })
}
