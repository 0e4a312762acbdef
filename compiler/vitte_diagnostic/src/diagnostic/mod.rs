//! Core diagnostic types.
//!
//! A [`Diagnostic`] always starts with its primary [`Label`], created at
//! construction. Further labels are secondary; [`Diagnostic::add_label`]
//! refuses a second primary. Labels and notes are append-only.

use std::fmt;

use serde::{Deserialize, Serialize};
use vitte_ir::Span;

use crate::DiagCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a label.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// Where the problem is. Rendered with `^`.
    Primary,
    /// Related location. Rendered with `-`.
    Secondary,
}

/// A span with optional explanatory text.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub style: LabelStyle,
    pub span: Span,
    pub message: Option<String>,
}

impl Label {
    #[inline]
    pub fn is_primary(&self) -> bool {
        self.style == LabelStyle::Primary
    }
}

/// A compiler diagnostic.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagCode,
    pub message: String,
    labels: Vec<Label>,
    notes: Vec<String>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic whose primary label covers `primary_span`.
    pub fn new(
        severity: Severity,
        code: DiagCode,
        primary_span: Span,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            severity,
            code,
            message: message.into(),
            labels: vec![Label {
                style: LabelStyle::Primary,
                span: primary_span,
                message: None,
            }],
            notes: Vec::new(),
            help: None,
        }
    }

    /// Error diagnostic.
    #[cold]
    pub fn error(code: DiagCode, span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, span, message)
    }

    /// Warning diagnostic.
    #[cold]
    pub fn warning(code: DiagCode, span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, span, message)
    }

    /// Diagnostic with the code's registered message; severity follows the code range.
    #[cold]
    pub fn from_code(code: DiagCode, span: Span) -> Self {
        let severity = if code.is_error() {
            Severity::Error
        } else {
            Severity::Warning
        };
        Self::new(severity, code, span, code.default_message())
    }

    /// Append a label.
    ///
    /// Returns `false` (and adds nothing) if `style` is primary: the primary
    /// label is set once, at construction.
    pub fn add_label(&mut self, style: LabelStyle, span: Span, message: Option<&str>) -> bool {
        self.push_label(style, span, message.map(str::to_owned))
    }

    fn push_label(&mut self, style: LabelStyle, span: Span, message: Option<String>) -> bool {
        if style == LabelStyle::Primary {
            return false;
        }
        self.labels.push(Label {
            style,
            span,
            message,
        });
        true
    }

    /// Append a free-text note.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Set (or replace) the help line.
    pub fn set_help(&mut self, help: impl Into<String>) {
        self.help = Some(help.into());
    }

    /// Set the text shown next to the primary label.
    pub fn set_primary_message(&mut self, message: impl Into<String>) {
        if let Some(primary) = self.labels.first_mut() {
            primary.message = Some(message.into());
        }
    }

    /// Builder form of [`Diagnostic::set_primary_message`].
    #[must_use]
    pub fn with_primary_message(mut self, message: impl Into<String>) -> Self {
        self.set_primary_message(message);
        self
    }

    /// Builder form of a secondary [`Diagnostic::add_label`].
    #[must_use]
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.push_label(LabelStyle::Secondary, span, Some(message.into()));
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.add_note(note);
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.set_help(help);
        self
    }

    /// The primary label (always present).
    pub fn primary(&self) -> &Label {
        &self.labels[0]
    }

    /// Span of the primary label.
    pub fn primary_span(&self) -> Span {
        self.primary().span
    }

    /// All labels, primary first.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Whether the severity and the code's numeric range agree.
    pub fn severity_matches_code(&self) -> bool {
        self.is_error() == self.code.is_error()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}
