//! Vitte lexer.
//!
//! Turns source bytes into [`Token`]s that borrow their text from the
//! input. Whitespace and comments (`# ...`, `// ...`) are skipped; `.end`
//! is its own token. The first lexical error is reported as a diagnostic
//! and ends the token stream.

mod cursor;
pub mod keywords;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};
