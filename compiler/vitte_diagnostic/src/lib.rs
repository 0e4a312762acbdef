//! Diagnostics for the Vitte front-end.
//!
//! Every diagnostic carries:
//! - a stable code ([`DiagCode`]) for searchability
//! - a severity and a one-line message (what went wrong)
//! - a primary label (where it went wrong)
//! - optional secondary labels, notes and a help line
//!
//! Producers push into a [`DiagnosticBag`]; a front-end run ends by handing
//! the bag and the [`SourceMap`] to [`emit_human`] or [`emit_json`].
//!
//! ```text
//! let mut bag = DiagnosticBag::new();
//! bag.push(Diagnostic::from_code(DiagCode::E0103, span));
//! emit_human(std::io::stderr(), &sources, &bag, &EmitOptions::default())?;
//! ```

mod bag;
mod code;
mod diagnostic;
pub mod emitter;
pub mod source_map;

pub use bag::DiagnosticBag;
pub use code::{is_error, DiagCode};
pub use diagnostic::{Diagnostic, Label, LabelStyle, Severity};
pub use emitter::{
    emit_human, emit_json, format, DiagnosticEmitter, EmitError, EmitOptions, HumanEmitter,
    JsonEmitter, JsonFormat,
};
pub use source_map::{LineCol, SourceFile, SourceMap};
