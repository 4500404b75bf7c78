// GlucosePlotter - core/export.rs
//
// PNG export of a laid-out chart.
// Core layer: writes to any Write trait object; the app layer owns the file.
//
// The chart's SVG scene is parsed by usvg, rasterised by resvg onto a
// tiny-skia pixmap and encoded by the `image` crate's PNG encoder.

use crate::core::chart::Chart;
use crate::util::constants;
use crate::util::error::ExportError;
use image::ImageEncoder;
use resvg::{tiny_skia, usvg};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// System fonts, loaded once per process.
///
/// The generic `sans-serif` family is pointed at the first preferred face
/// that is actually installed; fontdb's built-in default ("Arial") is
/// missing on most Linux systems and text would otherwise be dropped.
fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();

            let installed = constants::PREFERRED_SANS_FAMILIES.iter().find(|family| {
                db.faces()
                    .any(|face| face.families.iter().any(|(name, _)| name.as_str() == **family))
            });
            match installed {
                Some(family) => db.set_sans_serif_family(*family),
                None => tracing::warn!(
                    faces = db.len(),
                    "No preferred sans-serif font installed; chart text may be missing"
                ),
            }

            tracing::debug!(faces = db.len(), "System fonts loaded");
            Arc::new(db)
        })
        .clone()
}

/// Rasterise an SVG document onto a `width` x `height` pixmap.
pub fn rasterize(svg: &str, width: u32, height: u32) -> Result<tiny_skia::Pixmap, ExportError> {
    let options = usvg::Options {
        fontdb: font_database(),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| ExportError::Render {
        reason: format!("invalid SVG scene: {e}"),
    })?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| ExportError::Render {
        reason: format!("cannot allocate a {width}x{height} canvas"),
    })?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Render `chart` and write it to `writer` as a PNG image.
///
/// `export_path` is used for error context only.
pub fn export_png<W: Write>(chart: &Chart, writer: W, export_path: &Path) -> Result<(), ExportError> {
    let svg = chart.to_string();
    let pixmap = rasterize(&svg, chart.width, chart.height)?;

    // The scene paints an opaque background, so tiny-skia's premultiplied
    // RGBA is identical to straight RGBA here.
    image::codecs::png::PngEncoder::new(writer)
        .write_image(
            pixmap.data(),
            pixmap.width(),
            pixmap.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|source| ExportError::Encode {
            path: export_path.to_path_buf(),
            source,
        })?;

    tracing::debug!(
        path = %export_path.display(),
        width = chart.width,
        height = chart.height,
        "Chart exported"
    );

    Ok(())
}
