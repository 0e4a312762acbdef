//! Vitte driver.
//!
//! Runs one compilation unit through the front-end passes:
//!
//! ```text
//! lex_smoke -> parse -> desugar -> hir_build -> ir_build -> ir_validate
//! ```
//!
//! The parser and lowering stages are seams ([`Parser`], [`Lowering`]);
//! [`StructureParser`] and [`SkeletonLowering`] are the built-in
//! implementations used by [`run_default_pipeline`] and the `vittec`
//! harness.

pub mod check;
mod context;
mod lowering;
mod parser;
mod pipeline;
mod tracing_setup;

pub use context::{CompileContext, PipelineConfig};
pub use lowering::{HirItem, HirItemKind, IrOp, Lowering, SkeletonHir, SkeletonIr, SkeletonLowering};
pub use parser::{ParseInput, Parser, StructureParser};
pub use pipeline::{run_default_pipeline, PassError, PassName, PassTiming, Pipeline, PipelineReport};
pub use tracing_setup::init_tracing;
