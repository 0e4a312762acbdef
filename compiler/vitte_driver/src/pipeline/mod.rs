//! Pass pipeline.
//!
//! Passes run in a fixed order over one [`CompileContext`]:
//!
//! ```text
//! lex_smoke -> parse -> desugar -> hir_build -> ir_build -> ir_validate
//! ```
//!
//! The first failing pass stops the run. A failed run always leaves at
//! least one error in the context's bag: when a pass fails without
//! reporting, the pipeline reports for it.

use std::fmt;
use std::time::{Duration, Instant};

use vitte_diagnostic::{DiagCode, Diagnostic};
use vitte_ir::{Span, TreeError};
use vitte_lexer::Lexer;

use crate::context::CompileContext;
use crate::lowering::{Lowering, SkeletonLowering};
use crate::parser::{ParseInput, Parser, StructureParser};

/// Pipeline stages, in run order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PassName {
    LexSmoke,
    Parse,
    Desugar,
    HirBuild,
    IrBuild,
    IrValidate,
}

impl PassName {
    pub const ALL: [PassName; 6] = [
        PassName::LexSmoke,
        PassName::Parse,
        PassName::Desugar,
        PassName::HirBuild,
        PassName::IrBuild,
        PassName::IrValidate,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PassName::LexSmoke => "lex_smoke",
            PassName::Parse => "parse",
            PassName::Desugar => "desugar",
            PassName::HirBuild => "hir_build",
            PassName::IrBuild => "ir_build",
            PassName::IrValidate => "ir_validate",
        }
    }
}

impl fmt::Display for PassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a pass failed.
#[derive(Debug, thiserror::Error)]
pub enum PassError {
    /// Diagnostics explaining the failure are in the bag.
    #[error("pass reported errors")]
    Reported,
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// An earlier pass left its output slot empty.
    #[error("missing {0} from an earlier pass")]
    MissingInput(&'static str),
}

impl PassError {
    /// Storage ran out (ids, symbols, or node slots).
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, PassError::Tree(TreeError::TooManyNodes | TreeError::Id(_)))
    }
}

/// Wall time of one pass.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PassTiming {
    pub pass: PassName,
    pub elapsed: Duration,
    pub ok: bool,
}

impl PassTiming {
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Outcome of one pipeline run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// One entry per pass that ran, in order.
    pub timings: Vec<PassTiming>,
    /// The pass that stopped the run.
    pub failed: Option<PassName>,
}

impl PipelineReport {
    pub fn succeeded(&self) -> bool {
        self.failed.is_none()
    }

    pub fn total(&self) -> Duration {
        self.timings.iter().map(|t| t.elapsed).sum()
    }

    /// Names of the passes that ran.
    pub fn passes_run(&self) -> Vec<PassName> {
        self.timings.iter().map(|t| t.pass).collect()
    }
}

/// The pass list bound to its parser and lowering collaborators.
pub struct Pipeline<P, L> {
    parser: P,
    lowering: L,
}

impl<P: Parser, L: Lowering> Pipeline<P, L> {
    pub fn new(parser: P, lowering: L) -> Self {
        Pipeline { parser, lowering }
    }

    /// Run every pass in order, stopping at the first failure.
    pub fn run(&mut self, ctx: &mut CompileContext<L::Hir, L::Ir>) -> PipelineReport {
        let mut report = PipelineReport::default();
        let _span = tracing::info_span!("pipeline", file_id = ctx.file_id).entered();

        for pass in PassName::ALL {
            let errors_before = ctx.diagnostics.error_count();
            let started = Instant::now();
            let result = self.run_pass(pass, ctx);
            let timing = PassTiming {
                pass,
                elapsed: started.elapsed(),
                ok: result.is_ok(),
            };
            report.timings.push(timing);

            tracing::debug!(
                pass = pass.as_str(),
                elapsed_ms = timing.millis(),
                ok = timing.ok,
                "pass finished"
            );
            if ctx.config.trace {
                eprintln!(
                    "[pass] {pass} : {} ({:.3} ms)",
                    if timing.ok { "OK" } else { "FAIL" },
                    timing.millis()
                );
            }

            if let Err(err) = result {
                report_failure(ctx, pass, &err, errors_before);
                report.failed = Some(pass);
                tracing::info!(failed_at = pass.as_str(), error = %err, "pipeline stopped");
                if ctx.config.trace {
                    eprintln!("[pipeline] failed at {pass}");
                }
                break;
            }
        }
        report
    }

    fn run_pass(
        &mut self,
        pass: PassName,
        ctx: &mut CompileContext<L::Hir, L::Ir>,
    ) -> Result<(), PassError> {
        match pass {
            PassName::LexSmoke => lex_smoke(ctx),
            PassName::Parse => {
                let input = ParseInput {
                    source: &ctx.source,
                    file_id: ctx.file_id,
                };
                let root = self.parser.parse(input, &mut ctx.ast, &mut ctx.diagnostics)?;
                ctx.root = Some(root);
                Ok(())
            }
            // Surface sugar is not expanded yet.
            PassName::Desugar => Ok(()),
            PassName::HirBuild => {
                let root = ctx.root.ok_or(PassError::MissingInput("AST root"))?;
                let hir = self.lowering.build_hir(&ctx.ast, root, &mut ctx.diagnostics)?;
                ctx.hir = Some(hir);
                Ok(())
            }
            PassName::IrBuild => {
                let hir = ctx.hir.as_ref().ok_or(PassError::MissingInput("HIR"))?;
                let ir = self.lowering.build_ir(hir, &mut ctx.diagnostics)?;
                ctx.ir = Some(ir);
                Ok(())
            }
            PassName::IrValidate => {
                let ir = ctx.ir.as_ref().ok_or(PassError::MissingInput("IR"))?;
                self.lowering.validate_ir(ir, &mut ctx.diagnostics)
            }
        }
    }
}

/// Lex the whole unit once; any lexical error fails the pass.
fn lex_smoke<H, I>(ctx: &mut CompileContext<H, I>) -> Result<(), PassError> {
    let errors_before = ctx.diagnostics.error_count();
    let mut lexer = Lexer::new(&ctx.source, ctx.file_id);
    let mut count = 0usize;
    while !lexer.next_token(&mut ctx.diagnostics).is_eof() {
        count += 1;
    }
    tracing::debug!(tokens = count, "lexed");
    if ctx.diagnostics.error_count() > errors_before {
        Err(PassError::Reported)
    } else {
        Ok(())
    }
}

/// Make sure a failed pass left an error behind.
fn report_failure<H, I>(
    ctx: &mut CompileContext<H, I>,
    pass: PassName,
    err: &PassError,
    errors_before: usize,
) {
    let unit_span = Span::new(ctx.file_id, 0, 0);
    if err.is_exhaustion() {
        ctx.diagnostics.push(
            Diagnostic::from_code(DiagCode::E0902, unit_span)
                .with_note(format!("while running `{pass}`: {err}")),
        );
    } else if ctx.diagnostics.error_count() == errors_before {
        ctx.diagnostics.push(
            Diagnostic::from_code(DiagCode::E0901, unit_span)
                .with_note(format!("pass `{pass}` failed: {err}")),
        );
    }
}

/// Run the pipeline with the built-in structure parser and skeleton lowering.
pub fn run_default_pipeline(ctx: &mut CompileContext) -> bool {
    Pipeline::new(StructureParser::new(), SkeletonLowering::new())
        .run(ctx)
        .succeeded()
}
