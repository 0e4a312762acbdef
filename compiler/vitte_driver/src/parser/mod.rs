//! Parser seam and the built-in structure parser.
//!
//! [`StructureParser`] recovers only the layout of a unit:
//!
//! - `Block` nodes for block keywords (`fn`, `scn`, `prog`, `program`,
//!   `service`, `kernel`, `driver`, `tool`, `pipeline`, `scenario`, `when`,
//!   `loop`) whose header has no `{`, closed by `.end`;
//! - `Phrase` nodes for `set`, `say`, `do` and `ret`, running to the end of
//!   the line, a `;`, a closing bracket, or `.end`;
//! - `Group` nodes for `( )`, `[ ]` and `{ }`;
//! - `Token` leaves for everything else.
//!
//! Parsing stops at the first structural error.

use std::borrow::Cow;

use vitte_diagnostic::{DiagCode, Diagnostic, DiagnosticBag};
use vitte_ir::{AstTree, NodeIdx, NodeKind, Span, TreeError};
use vitte_lexer::{tokenize, Token, TokenKind};

use crate::pipeline::PassError;

/// What a parser reads.
#[derive(Copy, Clone, Debug)]
pub struct ParseInput<'a> {
    pub source: &'a [u8],
    pub file_id: u32,
}

/// Builds an AST for one unit.
///
/// On `Err(PassError::Reported)` the implementation has pushed at least one
/// error into `diagnostics`.
pub trait Parser {
    fn parse(
        &mut self,
        input: ParseInput<'_>,
        ast: &mut AstTree,
        diagnostics: &mut DiagnosticBag,
    ) -> Result<NodeIdx, PassError>;
}

/// Layout-only parser for Vitte sources.
#[derive(Copy, Clone, Debug, Default)]
pub struct StructureParser;

impl StructureParser {
    pub fn new() -> Self {
        StructureParser
    }
}

impl Parser for StructureParser {
    fn parse(
        &mut self,
        input: ParseInput<'_>,
        ast: &mut AstTree,
        diagnostics: &mut DiagnosticBag,
    ) -> Result<NodeIdx, PassError> {
        let errors_before = diagnostics.error_count();
        let tokens = tokenize(input.source, input.file_id, diagnostics);
        if diagnostics.error_count() > errors_before {
            return Err(PassError::Reported);
        }

        match Builder::build(input.source, input.file_id, &tokens, ast) {
            Ok(root) => {
                tracing::debug!(nodes = ast.live_count(), "parsed structure");
                Ok(root)
            }
            Err(Stop::Diagnostic(diagnostic)) => {
                diagnostics.push(*diagnostic);
                Err(PassError::Reported)
            }
            Err(Stop::Tree(err)) => Err(PassError::Tree(err)),
        }
    }
}

enum Stop {
    Diagnostic(Box<Diagnostic>),
    Tree(TreeError),
}

impl From<TreeError> for Stop {
    fn from(err: TreeError) -> Self {
        Stop::Tree(err)
    }
}

impl From<Diagnostic> for Stop {
    fn from(diagnostic: Diagnostic) -> Self {
        Stop::Diagnostic(Box::new(diagnostic))
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum FrameKind {
    Module,
    /// Opened by the keyword.
    Block(TokenKind),
    /// Opened by the bracket.
    Group(TokenKind),
    Phrase,
}

#[derive(Copy, Clone, Debug)]
struct Frame {
    node: NodeIdx,
    kind: FrameKind,
    opener: Span,
}

struct Builder<'s, 't> {
    source: &'s [u8],
    file_id: u32,
    tokens: &'t [Token<'s>],
    ast: &'t mut AstTree,
    /// Bottom frame; never popped.
    module: Frame,
    stack: Vec<Frame>,
    /// End of the last token consumed.
    prev_end: u32,
}

impl<'s, 't> Builder<'s, 't> {
    fn build(
        source: &'s [u8],
        file_id: u32,
        tokens: &'t [Token<'s>],
        ast: &'t mut AstTree,
    ) -> Result<NodeIdx, Stop> {
        #[expect(clippy::cast_possible_truncation, reason = "lexer caps sources at u32::MAX bytes")]
        let len = source.len().min(u32::MAX as usize) as u32;
        let root = ast.new_node(NodeKind::Module, Span::new(file_id, 0, len))?;
        ast.push_root(root)?;
        let mut builder = Builder {
            source,
            file_id,
            tokens,
            ast,
            module: Frame {
                node: root,
                kind: FrameKind::Module,
                opener: Span::new(file_id, 0, 0),
            },
            stack: Vec::new(),
            prev_end: 0,
        };
        builder.walk()?;
        Ok(root)
    }

    fn walk(&mut self) -> Result<(), Stop> {
        let tokens = self.tokens;
        for (index, token) in tokens.iter().enumerate() {
            if token.is_eof() {
                self.finish()?;
                break;
            }
            if self.starts_line(token.span) {
                self.close_phrase()?;
            }
            match token.kind {
                TokenKind::DotEnd => {
                    self.close_phrase()?;
                    self.close_block(token.span)?;
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    self.open(NodeKind::Group, FrameKind::Group(token.kind), token.span)?;
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    self.close_phrase()?;
                    self.close_group(token.kind, token.span)?;
                }
                TokenKind::Semi => {
                    self.leaf(token)?;
                    self.prev_end = token.span.end;
                    self.close_phrase()?;
                }
                kind if is_block_keyword(kind) && !self.has_brace_header(index) => {
                    self.close_phrase()?;
                    let node = self.open(NodeKind::Block, FrameKind::Block(kind), token.span)?;
                    self.ast.set_text(node, kind.as_str())?;
                    if let Some(name) = tokens.get(index + 1).filter(|t| t.kind == TokenKind::Ident) {
                        self.ast.set_aux_text(node, lossy(name.text).into_owned())?;
                    }
                }
                kind if is_phrase_keyword(kind) => {
                    self.close_phrase()?;
                    let node = self.open(NodeKind::Phrase, FrameKind::Phrase, token.span)?;
                    self.ast.set_text(node, kind.as_str())?;
                }
                _ => self.leaf(token)?,
            }
            self.prev_end = token.span.end;
        }
        Ok(())
    }

    fn top(&self) -> Frame {
        self.stack.last().copied().unwrap_or(self.module)
    }

    fn starts_line(&self, span: Span) -> bool {
        self.source
            .get(self.prev_end as usize..span.start as usize)
            .is_some_and(|gap| gap.contains(&b'\n'))
    }

    /// Whether the header after a block keyword opens a `{` body instead.
    fn has_brace_header(&self, keyword: usize) -> bool {
        let mut depth = 0usize;
        let mut line_end = self.tokens[keyword].span.end;
        for token in &self.tokens[keyword + 1..] {
            let same_line = self
                .source
                .get(line_end as usize..token.span.start as usize)
                .is_some_and(|gap| !gap.contains(&b'\n'));
            if token.is_eof() || !same_line {
                return false;
            }
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::LBrace if depth == 0 => return true,
                _ => {}
            }
            line_end = token.span.end;
        }
        false
    }

    fn open(&mut self, kind: NodeKind, frame: FrameKind, span: Span) -> Result<NodeIdx, Stop> {
        let node = self.ast.new_node(kind, span)?;
        self.ast.append_child(self.top().node, node)?;
        self.stack.push(Frame {
            node,
            kind: frame,
            opener: span,
        });
        Ok(node)
    }

    fn leaf(&mut self, token: &Token<'_>) -> Result<(), Stop> {
        let node = self.ast.new_node(NodeKind::Token, token.span)?;
        self.ast.set_text(node, &lossy(token.text))?;
        self.ast.append_child(self.top().node, node)?;
        Ok(())
    }

    fn close_phrase(&mut self) -> Result<(), Stop> {
        let frame = self.top();
        if frame.kind == FrameKind::Phrase {
            self.stack.pop();
            let span = Span::new(self.file_id, frame.opener.start, self.prev_end);
            self.ast.set_span(frame.node, span)?;
        }
        Ok(())
    }

    fn close_block(&mut self, end: Span) -> Result<(), Stop> {
        let frame = self.top();
        match frame.kind {
            FrameKind::Block(_) => {
                self.stack.pop();
                let span = Span::new(self.file_id, frame.opener.start, end.end);
                self.ast.set_span(frame.node, span)?;
                Ok(())
            }
            FrameKind::Group(open) => Err(Diagnostic::error(
                DiagCode::E0203,
                end,
                format!("mismatched terminator: `.end` inside unclosed `{}`", open.as_str()),
            )
            .with_primary_message("expected a closing delimiter first")
            .with_secondary_label(frame.opener, "opened here")
            .into()),
            FrameKind::Module | FrameKind::Phrase => Err(Diagnostic::error(
                DiagCode::E0203,
                end,
                "mismatched terminator: `.end` has no open block",
            )
            .with_primary_message("nothing to close")
            .into()),
        }
    }

    fn close_group(&mut self, close: TokenKind, span: Span) -> Result<(), Stop> {
        let frame = self.top();
        match frame.kind {
            FrameKind::Group(open) if closer_for(open) == close => {
                self.stack.pop();
                let full = Span::new(self.file_id, frame.opener.start, span.end);
                self.ast.set_span(frame.node, full)?;
                Ok(())
            }
            FrameKind::Group(open) => Err(Diagnostic::error(
                DiagCode::E0209,
                span,
                "mismatched delimiter",
            )
            .with_primary_message(format!("expected `{}`", closer_for(open).as_str()))
            .with_secondary_label(frame.opener, format!("unclosed `{}`", open.as_str()))
            .into()),
            FrameKind::Block(keyword) => Err(Diagnostic::error(
                DiagCode::E0209,
                span,
                "mismatched delimiter",
            )
            .with_primary_message(format!("unexpected `{}`", close.as_str()))
            .with_secondary_label(frame.opener, format!("`{}` block is still open", keyword.as_str()))
            .into()),
            FrameKind::Module | FrameKind::Phrase => Err(Diagnostic::error(
                DiagCode::E0209,
                span,
                format!("unexpected closing delimiter `{}`", close.as_str()),
            )
            .with_primary_message("no matching opener")
            .into()),
        }
    }

    fn finish(&mut self) -> Result<(), Stop> {
        self.close_phrase()?;
        let frame = self.top();
        match frame.kind {
            FrameKind::Block(keyword) => Err(Diagnostic::from_code(DiagCode::E0208, frame.opener)
                .with_primary_message(format!("`{}` block opened here", keyword.as_str()))
                .with_help("close the block with `.end`")
                .into()),
            FrameKind::Group(open) => Err(Diagnostic::error(
                DiagCode::E0209,
                frame.opener,
                format!("unclosed delimiter `{}`", open.as_str()),
            )
            .with_primary_message(format!("expected `{}` before end of file", closer_for(open).as_str()))
            .into()),
            FrameKind::Module | FrameKind::Phrase => Ok(()),
        }
    }
}

fn lossy(text: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(text)
}

fn closer_for(open: TokenKind) -> TokenKind {
    match open {
        TokenKind::LBracket => TokenKind::RBracket,
        TokenKind::LBrace => TokenKind::RBrace,
        _ => TokenKind::RParen,
    }
}

fn is_block_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Fn
            | TokenKind::Scn
            | TokenKind::Prog
            | TokenKind::Program
            | TokenKind::Service
            | TokenKind::Kernel
            | TokenKind::Driver
            | TokenKind::Tool
            | TokenKind::Pipeline
            | TokenKind::Scenario
            | TokenKind::When
            | TokenKind::Loop
    )
}

fn is_phrase_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Set | TokenKind::Say | TokenKind::Do | TokenKind::Ret
    )
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
