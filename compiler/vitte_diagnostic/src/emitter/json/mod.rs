//! JSON Emitter
//!
//! Machine-readable output. Field order is part of the format: tools diff
//! the output byte-for-byte, so the structs below declare fields in the
//! order they are written.

use std::io::Write;

use serde::{Deserialize, Serialize};
use vitte_ir::Span;

use crate::source_map::SourceMap;
use crate::{Diagnostic, LabelStyle, Severity};

use super::{DiagnosticEmitter, EmitError, EmitOptions, Location};

/// Serialized form of one diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    pub location: JsonLocation,
    pub labels: Vec<JsonLabel>,
    pub notes: Vec<String>,
}

/// Primary location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonLocation {
    pub path: String,
    pub file_id: u32,
    pub span: JsonSpan,
    pub line: u32,
    pub col: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSpan {
    pub lo: u32,
    pub hi: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonLabel {
    pub kind: LabelStyle,
    pub path: String,
    pub file_id: u32,
    pub lo: u32,
    pub hi: u32,
    pub line: u32,
    pub col: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JsonDiagnostic {
    /// Resolve paths and positions of `diagnostic` through `sources`.
    ///
    /// Unknown files get an empty path.
    pub fn new(diagnostic: &Diagnostic, sources: &SourceMap) -> Self {
        let primary = diagnostic.primary_span();
        let (path, line, col) = resolve(sources, primary);
        JsonDiagnostic {
            severity: diagnostic.severity,
            code: diagnostic.code.as_str().to_owned(),
            message: diagnostic.message.clone(),
            help: diagnostic.help().map(str::to_owned),
            location: JsonLocation {
                path,
                file_id: primary.file_id,
                span: JsonSpan {
                    lo: primary.start,
                    hi: primary.end,
                },
                line,
                col,
            },
            labels: diagnostic
                .labels()
                .iter()
                .map(|label| {
                    let (path, line, col) = resolve(sources, label.span);
                    JsonLabel {
                        kind: label.style,
                        path,
                        file_id: label.span.file_id,
                        lo: label.span.start,
                        hi: label.span.end,
                        line,
                        col,
                        message: label.message.clone(),
                    }
                })
                .collect(),
            notes: diagnostic.notes().to_vec(),
        }
    }
}

fn resolve(sources: &SourceMap, span: Span) -> (String, u32, u32) {
    let location = Location::resolve(sources, span);
    (
        location.path_or("").to_owned(),
        location.line_col.line,
        location.line_col.col,
    )
}

/// Output layout.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum JsonFormat {
    /// One compact object per line.
    Lines,
    /// A single compact array.
    Array,
    /// A single indented array.
    PrettyArray,
}

impl JsonFormat {
    pub fn from_options(options: &EmitOptions) -> Self {
        if options.json_pretty {
            JsonFormat::PrettyArray
        } else if options.json_one_per_line {
            JsonFormat::Lines
        } else {
            JsonFormat::Array
        }
    }
}

/// JSON emitter for machine-readable output.
///
/// In the array formats nothing is written until [`JsonEmitter::finish`].
pub struct JsonEmitter<'s, W: Write> {
    writer: W,
    sources: &'s SourceMap,
    format: JsonFormat,
    pending: Vec<JsonDiagnostic>,
}

impl<'s, W: Write> JsonEmitter<'s, W> {
    pub fn new(writer: W, sources: &'s SourceMap, format: JsonFormat) -> Self {
        JsonEmitter {
            writer,
            sources,
            format,
            pending: Vec::new(),
        }
    }

    /// Write any buffered array and flush.
    pub fn finish(&mut self) -> Result<(), EmitError> {
        match self.format {
            JsonFormat::Lines => {}
            JsonFormat::Array => {
                serde_json::to_writer(&mut self.writer, &self.pending)?;
                writeln!(self.writer)?;
            }
            JsonFormat::PrettyArray => {
                serde_json::to_writer_pretty(&mut self.writer, &self.pending)?;
                writeln!(self.writer)?;
            }
        }
        self.pending.clear();
        self.flush()
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) -> Result<(), EmitError> {
        let json = JsonDiagnostic::new(diagnostic, self.sources);
        match self.format {
            JsonFormat::Lines => {
                serde_json::to_writer(&mut self.writer, &json)?;
                writeln!(self.writer)?;
            }
            JsonFormat::Array | JsonFormat::PrettyArray => self.pending.push(json),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), EmitError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
