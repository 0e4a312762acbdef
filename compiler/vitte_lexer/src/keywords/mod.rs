//! Reserved keyword table.
//!
//! Lookup buckets by length first (keywords are 2-8 bytes), then matches
//! the keywords of that length. Everything else is an identifier.

use crate::TokenKind;

/// Keyword kind for `text`, or `None` for a plain identifier.
#[inline]
pub fn lookup(text: &[u8]) -> Option<TokenKind> {
    if !(2..=8).contains(&text.len()) {
        return None;
    }

    match text.len() {
        2 => match text {
            b"or" => Some(TokenKind::Or),
            b"fn" => Some(TokenKind::Fn),
            b"do" => Some(TokenKind::Do),
            b"to" => Some(TokenKind::To),
            b"as" => Some(TokenKind::As),
            b"in" => Some(TokenKind::In),
            _ => None,
        },
        3 => match text {
            b"and" => Some(TokenKind::And),
            b"not" => Some(TokenKind::Not),
            b"mod" => Some(TokenKind::Mod),
            b"use" => Some(TokenKind::Use),
            b"scn" => Some(TokenKind::Scn),
            b"set" => Some(TokenKind::Set),
            b"say" => Some(TokenKind::Say),
            b"ret" => Some(TokenKind::Ret),
            b"nil" => Some(TokenKind::Nil),
            _ => None,
        },
        4 => match text {
            b"type" => Some(TokenKind::Type),
            b"prog" => Some(TokenKind::Prog),
            b"when" => Some(TokenKind::When),
            b"else" => Some(TokenKind::Else),
            b"loop" => Some(TokenKind::Loop),
            b"from" => Some(TokenKind::From),
            b"step" => Some(TokenKind::Step),
            b"tool" => Some(TokenKind::Tool),
            b"true" => Some(TokenKind::True),
            _ => None,
        },
        5 => match text {
            b"field" => Some(TokenKind::Field),
            b"false" => Some(TokenKind::False),
            _ => None,
        },
        6 => match text {
            b"kernel" => Some(TokenKind::Kernel),
            b"driver" => Some(TokenKind::Driver),
            _ => None,
        },
        7 => match text {
            b"program" => Some(TokenKind::Program),
            b"service" => Some(TokenKind::Service),
            _ => None,
        },
        8 => match text {
            b"pipeline" => Some(TokenKind::Pipeline),
            b"scenario" => Some(TokenKind::Scenario),
            _ => None,
        },
        _ => None,
    }
}
