//! The `vittec` check harness: read one file, run the pipeline, render
//! its diagnostics.

use std::io::Write;

use vitte_diagnostic::{
    emit_human, emit_json, DiagCode, Diagnostic, DiagnosticBag, DiagnosticEmitter, EmitError,
    EmitOptions, HumanEmitter, SourceMap,
};
use vitte_ir::Span;

use crate::context::{CompileContext, PipelineConfig};
use crate::pipeline::run_default_pipeline;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Harness settings from the command line.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct CheckOptions {
    pub format: OutputFormat,
    pub context_lines: usize,
    pub trace: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        let config = PipelineConfig::default();
        CheckOptions {
            format: OutputFormat::Human,
            context_lines: config.context_lines,
            trace: config.trace,
        }
    }
}

impl CheckOptions {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            trace: self.trace,
            context_lines: self.context_lines,
        }
    }
}

/// Parse harness arguments (program name excluded) into options and the
/// file to check.
pub fn parse_args(args: &[String]) -> Result<(CheckOptions, String), String> {
    let mut options = CheckOptions::default();
    let mut path = None;

    for arg in args {
        if let Some(format) = arg.strip_prefix("--format=") {
            options.format = match format {
                "human" => OutputFormat::Human,
                "json" => OutputFormat::Json,
                other => return Err(format!("unknown format `{other}` (expected human or json)")),
            };
        } else if let Some(lines) = arg.strip_prefix("--context=") {
            options.context_lines = lines
                .parse()
                .map_err(|_| format!("invalid context line count `{lines}`"))?;
        } else if arg == "--trace" {
            options.trace = true;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option `{arg}`"));
        } else if path.is_some() {
            return Err(format!("unexpected extra argument `{arg}`"));
        } else {
            path = Some(arg.clone());
        }
    }

    let path = path.ok_or_else(|| "missing file path".to_owned())?;
    Ok((options, path))
}

/// Check one file, writing its diagnostics to `out`.
///
/// Returns whether the pipeline succeeded. Only rendering failures are
/// errors; an unreadable file is reported as `E0701`.
pub fn check_file<W: Write>(path: &str, options: &CheckOptions, out: &mut W) -> Result<bool, EmitError> {
    let source = match std::fs::read(path) {
        Ok(source) => source,
        Err(err) => {
            tracing::debug!(path, error = %err, "read failed");
            let mut bag = DiagnosticBag::new();
            bag.push(
                Diagnostic::error(DiagCode::E0701, Span::DUMMY, format!("failed to open `{path}`"))
                    .with_note(err.to_string()),
            );
            let emit_options = EmitOptions {
                context_lines: options.context_lines,
                ..EmitOptions::default()
            };
            render(out, &SourceMap::new(), &bag, &emit_options, options.format)?;
            return Ok(false);
        }
    };

    let mut ctx: CompileContext = CompileContext::new(path, source, options.pipeline_config());
    let ok = run_default_pipeline(&mut ctx);
    render(
        out,
        ctx.sources(),
        ctx.diagnostics(),
        &ctx.emit_options(),
        options.format,
    )?;
    Ok(ok)
}

fn render<W: Write>(
    out: &mut W,
    sources: &SourceMap,
    bag: &DiagnosticBag,
    emit_options: &EmitOptions,
    format: OutputFormat,
) -> Result<(), EmitError> {
    match format {
        OutputFormat::Human => {
            emit_human(&mut *out, sources, bag, emit_options)?;
            let mut summary = HumanEmitter::new(&mut *out, sources);
            summary.emit_summary(bag.error_count(), bag.warning_count())?;
            summary.flush()
        }
        OutputFormat::Json => emit_json(out, sources, bag, emit_options),
    }
}
