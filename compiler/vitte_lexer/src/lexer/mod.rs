//! Token scanner.
//!
//! [`Lexer::next_token`] skips whitespace and comments, then produces one
//! token. Lexing stops at the first error: the offending input is reported
//! to the [`DiagnosticBag`] and every later call returns [`TokenKind::Eof`].
//!
//! Spans carry file id and byte offsets only (line/col stay `0`); the
//! emitter resolves positions through the source map.

use vitte_diagnostic::{DiagCode, Diagnostic, DiagnosticBag};
use vitte_ir::Span;

use crate::cursor::Cursor;
use crate::keywords;
use crate::{Token, TokenKind};

/// Single-file scanner.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    file_id: u32,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a [u8], file_id: u32) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            file_id,
            done: false,
        }
    }

    /// Whether EOF has been returned (or an error ended lexing).
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Current byte offset.
    pub fn offset(&self) -> u32 {
        self.cursor.pos()
    }

    /// Scan the next token. Errors go to `diagnostics`.
    pub fn next_token(&mut self, diagnostics: &mut DiagnosticBag) -> Token<'a> {
        if self.done {
            return self.eof();
        }
        self.skip_trivia();
        if self.cursor.is_eof() {
            self.done = true;
            return self.eof();
        }

        let start = self.cursor.pos();
        let kind = match self.cursor.current() {
            b'.' if self.at_dot_end() => {
                self.cursor.advance_n(4);
                TokenKind::DotEnd
            }
            b'"' => {
                if !self.scan_string() {
                    return self.fail(
                        diagnostics,
                        Diagnostic::from_code(DiagCode::E0103, self.span(start, start + 1))
                            .with_primary_message("string starts here")
                            .with_help("close the string with `\"`"),
                    );
                }
                TokenKind::Str
            }
            b'0'..=b'9' => self.scan_number(),
            b if is_ident_start(b) => {
                self.cursor.eat_while(is_ident_continue);
                keywords::lookup(self.cursor.slice_from(start)).unwrap_or(TokenKind::Ident)
            }
            b => {
                if let Some(kind) = TokenKind::punct(b) {
                    self.cursor.advance();
                    kind
                } else {
                    self.cursor.advance();
                    return self.fail(
                        diagnostics,
                        Diagnostic::error(
                            DiagCode::E0101,
                            self.span(start, start + 1),
                            invalid_char_message(b),
                        ),
                    );
                }
            }
        };

        let end = self.cursor.pos();
        Token {
            kind,
            span: self.span(start, end),
            text: self.cursor.slice(start, end),
        }
    }

    fn span(&self, start: u32, end: u32) -> Span {
        Span::new(self.file_id, start, end)
    }

    fn eof(&self) -> Token<'a> {
        let end = self.cursor.len();
        Token {
            kind: TokenKind::Eof,
            span: self.span(end, end),
            text: &[],
        }
    }

    #[cold]
    fn fail(&mut self, diagnostics: &mut DiagnosticBag, diagnostic: Diagnostic) -> Token<'a> {
        tracing::debug!(
            code = %diagnostic.code,
            offset = diagnostic.primary_span().start,
            "lexing stopped"
        );
        diagnostics.push(diagnostic);
        self.done = true;
        self.eof()
    }

    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat_while(is_whitespace);
            match self.cursor.current() {
                b'#' => self.cursor.eat_until_newline_or_eof(),
                b'/' if self.cursor.peek() == b'/' => self.cursor.eat_until_newline_or_eof(),
                _ => break,
            }
        }
    }

    /// `.end` not followed by an identifier byte.
    fn at_dot_end(&self) -> bool {
        self.cursor.starts_with(b".end") && !is_ident_continue(self.cursor.peek_n(4))
    }

    /// Consume a string literal; `false` if it runs to the end of input.
    fn scan_string(&mut self) -> bool {
        self.cursor.advance();
        loop {
            match self.cursor.skip_to_string_delim() {
                Some(b'"') => {
                    self.cursor.advance();
                    return true;
                }
                Some(_) => {
                    // Backslash: skip it and the escaped byte.
                    self.cursor.advance_n(2);
                }
                None => return false,
            }
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        self.cursor.eat_while(is_digit_or_separator);
        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.eat_while(is_digit_or_separator);
            TokenKind::Float
        } else {
            TokenKind::Int
        }
    }
}

/// Lex all of `source`. The result always ends with one EOF token.
pub fn tokenize<'a>(source: &'a [u8], file_id: u32, diagnostics: &mut DiagnosticBag) -> Vec<Token<'a>> {
    let mut lexer = Lexer::new(source, file_id);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token(diagnostics);
        tokens.push(token);
        if token.is_eof() {
            break;
        }
    }
    tracing::trace!(file_id, count = tokens.len(), "tokenized");
    tokens
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0B | 0x0C)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_digit_or_separator(b: u8) -> bool {
    b.is_ascii_digit() || b == b'_'
}

fn invalid_char_message(b: u8) -> String {
    if b.is_ascii_graphic() {
        format!("invalid character `{}`", b as char)
    } else {
        format!("invalid byte 0x{b:02X}")
    }
}
