//! Human-readable emitter.
//!
//! ```text
//! demo.vit:2:7: error[E0103]: unterminated string literal
//! --> demo.vit:2:7
//! 1 | fn main()
//! 2 |   say "oops
//!   |       ^ string starts here
//! help: close the string with `"`
//! ```

use std::io::Write;
use std::ops::Range;

use crate::source_map::{SourceFile, SourceMap};
use crate::{Diagnostic, LabelStyle};

use super::{DiagnosticEmitter, EmitError, Location, UNKNOWN_PATH};

/// Human emitter with source snippets.
pub struct HumanEmitter<'s, W: Write> {
    writer: W,
    sources: &'s SourceMap,
    context_lines: usize,
    emitted: usize,
}

impl<'s, W: Write> HumanEmitter<'s, W> {
    pub fn new(writer: W, sources: &'s SourceMap) -> Self {
        HumanEmitter {
            writer,
            sources,
            context_lines: 2,
            emitted: 0,
        }
    }

    /// Lines shown above and below the primary line.
    #[must_use]
    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    fn emit_snippet(&mut self, file: &SourceFile, diagnostic: &Diagnostic) -> Result<(), EmitError> {
        let primary = diagnostic.primary_span();
        let primary_lo = primary.start as usize;
        let primary_hi = primary.end as usize;
        let primary_line = file.line_index(primary_lo);

        let first = primary_line.saturating_sub(self.context_lines);
        let last = (primary_line + self.context_lines + 1).min(file.line_count());
        let width = decimal_width(last);

        for line in first..last {
            let (Some(range), Some(text)) = (file.line_range(line), file.line_text(line)) else {
                continue;
            };
            writeln!(self.writer, "{:>width$} | {text}", line + 1)?;

            if line == primary_line {
                let (indent, len) = underline(file, &range, primary_lo, primary_hi);
                write!(self.writer, "{:width$} | {}{}", "", " ".repeat(indent), "^".repeat(len))?;
                if let Some(message) = &diagnostic.primary().message {
                    write!(self.writer, " {message}")?;
                }
                writeln!(self.writer)?;
            }

            for label in diagnostic.labels() {
                if label.style != LabelStyle::Secondary || label.span.file_id != primary.file_id {
                    continue;
                }
                let lo = label.span.start as usize;
                let hi = label.span.end as usize;
                if !(lo < range.end && range.start < hi) {
                    continue;
                }
                let (indent, len) = underline(file, &range, lo, hi);
                write!(self.writer, "{:width$} | {}{}", "", " ".repeat(indent), "-".repeat(len))?;
                if let Some(message) = &label.message {
                    write!(self.writer, " {message}")?;
                }
                writeln!(self.writer)?;
            }
        }
        Ok(())
    }

    fn emit_trailer(&mut self, diagnostic: &Diagnostic) -> Result<(), EmitError> {
        if let Some(help) = diagnostic.help() {
            writeln!(self.writer, "help: {help}")?;
        }
        for note in diagnostic.notes() {
            writeln!(self.writer, "note: {note}")?;
        }
        Ok(())
    }
}

impl<W: Write> DiagnosticEmitter for HumanEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) -> Result<(), EmitError> {
        if self.emitted > 0 {
            writeln!(self.writer)?;
        }
        self.emitted += 1;

        let location = Location::resolve(self.sources, diagnostic.primary_span());
        let path = location.path_or(UNKNOWN_PATH);
        let pos = location.line_col;
        writeln!(
            self.writer,
            "{path}:{}:{}: {}[{}]: {}",
            pos.line, pos.col, diagnostic.severity, diagnostic.code, diagnostic.message
        )?;

        if let Some(file) = location.file {
            writeln!(self.writer, "--> {path}:{}:{}", pos.line, pos.col)?;
            self.emit_snippet(file, diagnostic)?;
        }
        self.emit_trailer(diagnostic)
    }

    fn flush(&mut self) -> Result<(), EmitError> {
        self.writer.flush()?;
        Ok(())
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) -> Result<(), EmitError> {
        if error_count == 0 && warning_count == 0 {
            return Ok(());
        }
        writeln!(
            self.writer,
            "\n{error_count} error{}, {warning_count} warning{} emitted",
            plural(error_count),
            plural(warning_count)
        )?;
        Ok(())
    }
}

/// Indent and width, in display columns, of an underline for `lo..hi`
/// clipped to `line`. The width is never zero.
fn underline(file: &SourceFile, line: &Range<usize>, lo: usize, hi: usize) -> (usize, usize) {
    let lo = lo.clamp(line.start, line.end);
    let hi = hi.max(lo).min(line.end);
    let indent = file.columns(line.start..lo);
    (indent, file.columns(lo..hi).max(1))
}

fn decimal_width(mut n: usize) -> usize {
    let mut width = 1;
    while n >= 10 {
        width += 1;
        n /= 10;
    }
    width
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
