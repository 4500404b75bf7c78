// GlucosePlotter - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every failure the pipeline can hit is fatal; these types exist so the
// top-level caller can report the full causal chain and pick an exit code.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all GlucosePlotter operations.
/// Errors are categorised by the pipeline stage that produced them.
#[derive(Debug)]
pub enum GlucosePlotError {
    /// A record matched a pattern but its fields could not be converted.
    Parse(ParseError),

    /// The chart could not be rendered or written.
    Export(ExportError),

    /// An explicitly requested config file could not be loaded.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for GlucosePlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for GlucosePlotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// A record matched an extraction pattern but failed strict conversion.
#[derive(Debug)]
pub enum ParseError {
    /// The captured timestamp is not a valid `format` date-time
    /// (e.g. day 32 or month 13).
    TimestampParse {
        line_number: u64,
        raw_timestamp: String,
        format: &'static str,
        source: chrono::ParseError,
    },

    /// The captured value is not a valid floating-point number.
    ValueParse {
        line_number: u64,
        raw_value: String,
        source: std::num::ParseFloatError,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimestampParse {
                line_number,
                raw_timestamp,
                format,
                source,
            } => write!(
                f,
                "line {line_number}: cannot parse timestamp \
                 '{raw_timestamp}' with format '{format}': {source}"
            ),
            Self::ValueParse {
                line_number,
                raw_value,
                source,
            } => write!(
                f,
                "line {line_number}: cannot parse value '{raw_value}': {source}"
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TimestampParse { source, .. } => Some(source),
            Self::ValueParse { source, .. } => Some(source),
        }
    }
}

impl From<ParseError> for GlucosePlotError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors raised while turning a chart into a PNG file.
#[derive(Debug)]
pub enum ExportError {
    /// The SVG scene was rejected or the canvas could not be allocated.
    Render { reason: String },

    /// PNG encoding or writing through the encoder failed.
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The output file could not be created or flushed.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render { reason } => write!(f, "Chart rendering failed: {reason}"),
            Self::Encode { path, source } => {
                write!(f, "PNG encoding error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Render { .. } => None,
        }
    }
}

impl From<ExportError> for GlucosePlotError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for GlucosePlotError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for GlucosePlotter results.
pub type Result<T> = std::result::Result<T, GlucosePlotError>;

/// Render an error and its `source()` chain as one line, outermost first.
///
/// Used by the binary for the final fatal diagnostic.
pub fn display_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut parent = out.clone();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        // Most variants already embed their direct source in Display.
        if !parent.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        parent = text;
        current = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn timestamp_error() -> ParseError {
        let source = chrono::NaiveDateTime::parse_from_str("32-01-2024 08:00", "%d-%m-%Y %H:%M")
            .unwrap_err();
        ParseError::TimestampParse {
            line_number: 7,
            raw_timestamp: "32-01-2024 08:00".to_string(),
            format: "%d-%m-%Y %H:%M",
            source,
        }
    }

    #[test]
    fn test_parse_error_display_names_line_and_text() {
        let msg = timestamp_error().to_string();
        assert!(msg.contains("line 7"), "{msg}");
        assert!(msg.contains("32-01-2024 08:00"), "{msg}");
    }

    #[test]
    fn test_top_level_error_keeps_source_chain() {
        let err: GlucosePlotError = timestamp_error().into();
        assert!(matches!(err, GlucosePlotError::Parse(_)));
        let parse = err.source().expect("parse error source");
        assert!(parse.source().is_some(), "chrono error should be chained");
    }

    #[test]
    fn test_display_chain_does_not_repeat_sources() {
        let err = GlucosePlotError::Io {
            path: PathBuf::from("missing.csv"),
            operation: "read",
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let chain = display_chain(&err);
        assert_eq!(chain.matches("no such file").count(), 1, "{chain}");
        assert!(chain.contains("missing.csv"));
    }

    #[derive(Debug)]
    struct Layer {
        msg: &'static str,
        source: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.msg)
        }
    }

    impl std::error::Error for Layer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.source.as_deref().map(|e| e as _)
        }
    }

    #[test]
    fn test_display_chain_keeps_cause_seen_only_higher_up() {
        let err = Layer {
            msg: "write failed: disk full",
            source: Some(Box::new(Layer {
                msg: "retry exhausted",
                source: Some(Box::new(Layer {
                    msg: "disk full",
                    source: None,
                })),
            })),
        };
        assert_eq!(
            display_chain(&err),
            "write failed: disk full: retry exhausted: disk full"
        );
    }
}
