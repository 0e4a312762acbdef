//! Shared state threaded through the passes of one compilation unit.

use vitte_diagnostic::{DiagnosticBag, EmitOptions, SourceMap};
use vitte_ir::{AstTree, NodeIdx};

use crate::lowering::{SkeletonHir, SkeletonIr};

/// Pipeline switches.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PipelineConfig {
    /// Write `[pass]` lines to stderr.
    pub trace: bool,
    /// Snippet context for human output.
    pub context_lines: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            trace: false,
            context_lines: 2,
        }
    }
}

impl PipelineConfig {
    /// Defaults, with `trace` taken from `VITTE_TRACE`.
    pub fn from_env() -> Self {
        PipelineConfig {
            trace: std::env::var("VITTE_TRACE").is_ok_and(|v| is_truthy(&v)),
            ..PipelineConfig::default()
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// One source file and everything the passes produce from it.
///
/// `H` and `I` are the HIR and IR types of the lowering in use.
pub struct CompileContext<H = SkeletonHir, I = SkeletonIr> {
    pub(crate) source: Vec<u8>,
    pub(crate) file_id: u32,
    pub(crate) sources: SourceMap,
    pub(crate) ast: AstTree,
    pub(crate) root: Option<NodeIdx>,
    pub(crate) hir: Option<H>,
    pub(crate) ir: Option<I>,
    pub(crate) diagnostics: DiagnosticBag,
    pub(crate) config: PipelineConfig,
}

impl<H, I> CompileContext<H, I> {
    /// Register `source` under `path` and start an empty unit.
    pub fn new(path: impl Into<String>, source: impl Into<Vec<u8>>, config: PipelineConfig) -> Self {
        let source = source.into();
        let mut sources = SourceMap::new();
        let file_id = sources.add_file_bytes(path, source.as_slice());
        CompileContext {
            source,
            file_id,
            sources,
            ast: AstTree::new(),
            root: None,
            hir: None,
            ir: None,
            diagnostics: DiagnosticBag::new(),
            config,
        }
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn file_id(&self) -> u32 {
        self.file_id
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn ast(&self) -> &AstTree {
        &self.ast
    }

    /// Root node, once `parse` has succeeded.
    pub fn root(&self) -> Option<NodeIdx> {
        self.root
    }

    pub fn hir(&self) -> Option<&H> {
        self.hir.as_ref()
    }

    pub fn ir(&self) -> Option<&I> {
        self.ir.as_ref()
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    /// Emission options matching this unit's configuration.
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            context_lines: self.config.context_lines,
            ..EmitOptions::default()
        }
    }
}
