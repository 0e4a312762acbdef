//! Diagnostic Emitters
//!
//! Renders a [`DiagnosticBag`] against a [`SourceMap`]:
//! - Human: `path:line:col: severity[CODE]: message`, a source snippet with
//!   `^`/`-` underlines, then `help:` and `note:` lines
//! - JSON: one compact object per line, or a (pretty) array
//!
//! Output is deterministic: the same bag and sources always produce the
//! same bytes.

mod human;
mod json;

pub use human::HumanEmitter;
pub use json::{JsonDiagnostic, JsonEmitter, JsonFormat, JsonLabel, JsonLocation, JsonSpan};

use std::io::Write;

use vitte_ir::Span;

use crate::source_map::{LineCol, SourceFile, SourceMap};
use crate::{DiagCode, Diagnostic, DiagnosticBag, Severity};

/// Path printed when a span's file is not in the source map.
pub const UNKNOWN_PATH: &str = "<input>";

/// Failure while emitting.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("failed to write diagnostics: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize diagnostic: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{severity} diagnostic uses code {code} from the other severity range")]
    SeverityMismatch { code: DiagCode, severity: Severity },
}

/// Knobs shared by both renderers.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct EmitOptions {
    /// Lines shown above and below the primary line.
    pub context_lines: usize,
    /// Order by (file, offset) instead of insertion order.
    pub sort_by_location: bool,
    /// Pretty-printed JSON array.
    pub json_pretty: bool,
    /// JSON Lines (ignored when `json_pretty` is set).
    pub json_one_per_line: bool,
    /// Fail instead of warning when a severity contradicts its code.
    pub strict_severity: bool,
    /// Emit at most this many diagnostics.
    pub max_diagnostics: Option<usize>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            context_lines: 2,
            sort_by_location: false,
            json_pretty: false,
            json_one_per_line: true,
            strict_severity: false,
            max_diagnostics: None,
        }
    }
}

/// Trait for emitting diagnostics in various formats.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic) -> Result<(), EmitError>;

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) -> Result<(), EmitError> {
        for diag in diagnostics {
            self.emit(diag)?;
        }
        Ok(())
    }

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), EmitError>;

    /// Emit a summary of errors/warnings.
    fn emit_summary(&mut self, _error_count: usize, _warning_count: usize) -> Result<(), EmitError> {
        Ok(())
    }
}

/// Render `bag` as human-readable text.
pub fn emit_human<W: Write>(
    writer: W,
    sources: &SourceMap,
    bag: &DiagnosticBag,
    options: &EmitOptions,
) -> Result<(), EmitError> {
    let selected = select(bag, options)?;
    let mut emitter = HumanEmitter::new(writer, sources).with_context_lines(options.context_lines);
    for diagnostic in selected {
        emitter.emit(diagnostic)?;
    }
    emitter.flush()
}

/// Render `bag` as JSON.
pub fn emit_json<W: Write>(
    writer: W,
    sources: &SourceMap,
    bag: &DiagnosticBag,
    options: &EmitOptions,
) -> Result<(), EmitError> {
    let selected = select(bag, options)?;
    let mut emitter = JsonEmitter::new(writer, sources, JsonFormat::from_options(options));
    for diagnostic in selected {
        emitter.emit(diagnostic)?;
    }
    emitter.finish()
}

/// One `"CODE: message (path:line)"` line per diagnostic, in bag order.
pub fn format(bag: &DiagnosticBag, sources: &SourceMap) -> Vec<String> {
    bag.iter()
        .map(|diagnostic| {
            let location = Location::resolve(sources, diagnostic.primary_span());
            format!(
                "{}: {} ({}:{})",
                diagnostic.code,
                diagnostic.message,
                location.path_or(UNKNOWN_PATH),
                location.line_col.line
            )
        })
        .collect()
}

/// Apply ordering, the count limit, and the severity check.
fn select<'a>(
    bag: &'a DiagnosticBag,
    options: &EmitOptions,
) -> Result<Vec<&'a Diagnostic>, EmitError> {
    let mut selected = if options.sort_by_location {
        bag.sorted_by_location()
    } else {
        bag.iter().collect()
    };
    if let Some(max) = options.max_diagnostics {
        selected.truncate(max);
    }
    for diagnostic in &selected {
        if diagnostic.severity_matches_code() {
            continue;
        }
        if options.strict_severity {
            return Err(EmitError::SeverityMismatch {
                code: diagnostic.code,
                severity: diagnostic.severity,
            });
        }
        tracing::warn!(
            code = %diagnostic.code,
            severity = %diagnostic.severity,
            "diagnostic severity disagrees with its code range"
        );
    }
    Ok(selected)
}

/// A span's file and 1-based start position.
///
/// Unknown files fall back to the span's own line/col.
pub(crate) struct Location<'a> {
    pub file: Option<&'a SourceFile>,
    pub line_col: LineCol,
}

impl<'a> Location<'a> {
    pub fn resolve(sources: &'a SourceMap, span: Span) -> Self {
        let file = sources.get(span.file_id);
        let line_col = match file {
            Some(file) => file.line_col(span.start as usize),
            None => LineCol {
                line: span.line,
                col: span.col,
            },
        };
        Location { file, line_col }
    }

    pub fn path_or(&self, fallback: &'a str) -> &'a str {
        match self.file {
            Some(file) if !file.path().is_empty() => file.path(),
            _ => fallback,
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
