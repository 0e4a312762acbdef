//! Token model.

use std::fmt;

use vitte_ir::Span;

/// Kind of a lexed token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals and names
    Ident,
    Int,
    Float,
    Str,

    /// `.end` block terminator
    DotEnd,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Dot,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    Lt,
    Gt,
    Bang,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Question,

    // Keywords
    And,
    Or,
    Not,
    Mod,
    Use,
    Type,
    Field,
    Fn,
    Scn,
    Prog,
    Set,
    Say,
    Do,
    Ret,
    When,
    Else,
    Loop,
    From,
    To,
    Step,
    As,
    In,
    Program,
    Service,
    Kernel,
    Driver,
    Tool,
    Pipeline,
    Scenario,
    True,
    False,
    Nil,

    Eof,
}

impl TokenKind {
    /// Single-byte punctuation.
    pub fn punct(byte: u8) -> Option<TokenKind> {
        Some(match byte {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semi,
            b'.' => TokenKind::Dot,
            b':' => TokenKind::Colon,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'=' => TokenKind::Eq,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b'!' => TokenKind::Bang,
            b'&' => TokenKind::Amp,
            b'|' => TokenKind::Pipe,
            b'^' => TokenKind::Caret,
            b'~' => TokenKind::Tilde,
            b'?' => TokenKind::Question,
            _ => return None,
        })
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::Mod
                | TokenKind::Use
                | TokenKind::Type
                | TokenKind::Field
                | TokenKind::Fn
                | TokenKind::Scn
                | TokenKind::Prog
                | TokenKind::Set
                | TokenKind::Say
                | TokenKind::Do
                | TokenKind::Ret
                | TokenKind::When
                | TokenKind::Else
                | TokenKind::Loop
                | TokenKind::From
                | TokenKind::To
                | TokenKind::Step
                | TokenKind::As
                | TokenKind::In
                | TokenKind::Program
                | TokenKind::Service
                | TokenKind::Kernel
                | TokenKind::Driver
                | TokenKind::Tool
                | TokenKind::Pipeline
                | TokenKind::Scenario
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
        )
    }

    /// Source text for fixed tokens, a description for the rest.
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::Str => "string literal",
            TokenKind::DotEnd => ".end",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Eq => "=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Bang => "!",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Question => "?",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::Mod => "mod",
            TokenKind::Use => "use",
            TokenKind::Type => "type",
            TokenKind::Field => "field",
            TokenKind::Fn => "fn",
            TokenKind::Scn => "scn",
            TokenKind::Prog => "prog",
            TokenKind::Set => "set",
            TokenKind::Say => "say",
            TokenKind::Do => "do",
            TokenKind::Ret => "ret",
            TokenKind::When => "when",
            TokenKind::Else => "else",
            TokenKind::Loop => "loop",
            TokenKind::From => "from",
            TokenKind::To => "to",
            TokenKind::Step => "step",
            TokenKind::As => "as",
            TokenKind::In => "in",
            TokenKind::Program => "program",
            TokenKind::Service => "service",
            TokenKind::Kernel => "kernel",
            TokenKind::Driver => "driver",
            TokenKind::Tool => "tool",
            TokenKind::Pipeline => "pipeline",
            TokenKind::Scenario => "scenario",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Nil => "nil",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token borrowing its text from the source buffer.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub span: Span,
    pub text: &'a [u8],
}

impl<'a> Token<'a> {
    /// Text as UTF-8, if it is.
    pub fn text_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.text).ok()
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}
