//! Stable diagnostic code registry.
//!
//! Codes are a wire contract: tools match on the number (`E0103`) or the
//! name (`LEX_UNTERMINATED_STRING`), so a shipped code is never renumbered
//! or reused. New codes are appended to their family.
//!
//! Families by number:
//! - 1xx: lexer
//! - 2xx: parser
//! - 3xx: name resolution and semantic checks
//! - 4xx: types
//! - 5xx: IR
//! - 6xx: codegen and link
//! - 7xx: I/O, configuration, toolchain
//! - 9xx: internal
//! - 1000 and up: warnings

use std::fmt;

macro_rules! diag_codes {
    ($(
        $(#[$doc:meta])*
        $variant:ident = $number:literal, $name:literal, $message:literal;
    )*) => {
        /// Registered diagnostic code.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
        pub enum DiagCode {
            $(
                $(#[$doc])*
                $variant,
            )*
        }

        impl DiagCode {
            /// Every registered code, in numeric order.
            pub const ALL: &[DiagCode] = &[$(DiagCode::$variant),*];

            /// Numeric value.
            pub const fn number(self) -> u16 {
                match self {
                    $(DiagCode::$variant => $number,)*
                }
            }

            /// Display form, e.g. `"E0103"`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(DiagCode::$variant => stringify!($variant),)*
                }
            }

            /// Symbolic name, e.g. `"LEX_UNTERMINATED_STRING"`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(DiagCode::$variant => $name,)*
                }
            }

            /// Message used when the reporter has nothing more specific.
            pub const fn default_message(self) -> &'static str {
                match self {
                    $(DiagCode::$variant => $message,)*
                }
            }
        }
    };
}

diag_codes! {
    // Lexer (1xx)
    /// Byte that starts no token
    E0101 = 101, "LEX_INVALID_CHAR", "invalid character";
    /// Malformed UTF-8 sequence
    E0102 = 102, "LEX_INVALID_UTF8", "invalid UTF-8 sequence";
    /// String literal without closing quote
    E0103 = 103, "LEX_UNTERMINATED_STRING", "unterminated string literal";
    /// Unknown escape sequence
    E0104 = 104, "LEX_INVALID_ESCAPE", "invalid escape sequence";
    /// Malformed numeric literal
    E0105 = 105, "LEX_INVALID_NUMBER", "invalid numeric literal";
    /// Integer literal out of range
    E0106 = 106, "LEX_OVERFLOW_INT", "integer literal overflow";
    /// Float literal out of range
    E0107 = 107, "LEX_OVERFLOW_FLOAT", "float literal overflow";
    /// NUL byte in source text
    E0108 = 108, "LEX_NUL_IN_SOURCE", "NUL byte in source";
    /// Input ended inside a token
    E0109 = 109, "LEX_UNEXPECTED_EOF", "unexpected end of file";

    // Parser (2xx)
    /// Token not valid here
    E0201 = 201, "PARSE_UNEXPECTED_TOKEN", "unexpected token";
    /// A specific token was required
    E0202 = 202, "PARSE_EXPECTED_TOKEN", "expected token";
    /// `.end` with no open block, or closing the wrong kind of block
    E0203 = 203, "PARSE_MISMATCHED_TERMINATOR", "mismatched terminator";
    /// Identifier required
    E0204 = 204, "PARSE_EXPECTED_IDENT", "expected identifier";
    /// Type required
    E0205 = 205, "PARSE_EXPECTED_TYPE", "expected type";
    /// Expression required
    E0206 = 206, "PARSE_EXPECTED_EXPR", "expected expression";
    /// Statement required
    E0207 = 207, "PARSE_EXPECTED_STMT", "expected statement";
    /// Block still open at end of input
    E0208 = 208, "PARSE_UNCLOSED_BLOCK", "expected block terminator";
    /// Closing bracket does not match the opening one
    E0209 = 209, "PARSE_MISMATCHED_DELIM", "mismatched delimiter";
    /// Nesting too deep
    E0210 = 210, "PARSE_RECURSION_LIMIT", "parser recursion limit exceeded";

    // Resolution and semantic checks (3xx)
    /// Name not found
    E0301 = 301, "SEMA_UNDEFINED_NAME", "undefined name";
    /// Name defined twice in one scope
    E0302 = 302, "SEMA_REDEFINED_NAME", "redefined name";
    /// Left side cannot be assigned
    E0303 = 303, "SEMA_INVALID_ASSIGN_TARGET", "invalid assignment target";
    /// `break` outside a loop
    E0304 = 304, "SEMA_INVALID_BREAK", "break outside loop";
    /// `continue` outside a loop
    E0305 = 305, "SEMA_INVALID_CONTINUE", "continue outside loop";
    /// `ret` outside a function
    E0306 = 306, "SEMA_RETURN_OUTSIDE_FN", "return outside function";
    /// Assignment to a constant
    E0307 = 307, "SEMA_CONST_ASSIGN", "cannot assign to const";
    /// Several candidates match
    E0308 = 308, "RESOLVE_AMBIGUOUS", "ambiguous resolution";
    /// Item not visible here
    E0309 = 309, "RESOLVE_PRIVATE_ITEM", "access to private item";
    /// Resolution depends on itself
    E0310 = 310, "RESOLVE_CYCLE", "resolution cycle";

    // Types (4xx)
    /// Types do not agree
    E0401 = 401, "TYPE_MISMATCH", "type mismatch";
    /// Inference had no answer
    E0402 = 402, "TYPE_CANNOT_INFER", "cannot infer type";
    /// Type name not found
    E0403 = 403, "TYPE_UNKNOWN", "unknown type";
    /// Wrong number of type arguments
    E0404 = 404, "TYPE_ARITY_MISMATCH", "type arity mismatch";

    // IR (5xx)
    /// IR failed validation
    E0501 = 501, "IR_INVALID", "invalid IR";
    /// Construct not lowered yet
    E0502 = 502, "IR_UNSUPPORTED", "unsupported IR feature";

    // Codegen and link (6xx)
    /// Target not supported
    E0601 = 601, "CG_UNSUPPORTED_TARGET", "unsupported target";
    /// Backend invariant broken
    E0602 = 602, "CG_INTERNAL_ASSERT", "codegen internal assertion";
    /// Linker failed
    E0603 = 603, "LINK_FAILED", "link failed";

    // I/O, configuration, toolchain (7xx)
    /// Path could not be opened
    E0701 = 701, "IO_OPEN_FAILED", "failed to open path";
    /// Read failed
    E0702 = 702, "IO_READ_FAILED", "failed to read";
    /// Write failed
    E0703 = 703, "IO_WRITE_FAILED", "failed to write";
    /// Path exceeds platform limit
    E0704 = 704, "IO_PATH_TOO_LONG", "path too long";
    /// Configuration is malformed
    E0711 = 711, "CFG_INVALID", "invalid configuration";
    /// Configuration lacks a required field
    E0712 = 712, "CFG_MISSING_FIELD", "missing configuration field";
    /// External tool not found
    E0721 = 721, "TC_MISSING_TOOL", "missing tool";
    /// External tool output unusable
    E0722 = 722, "TC_BAD_TOOL_OUTPUT", "tool produced invalid output";

    // Internal (9xx)
    /// A pass failed without reporting why
    E0901 = 901, "INTERNAL_PASS_FAILED", "internal error: pass failed without a diagnostic";
    /// Arena or table storage exhausted
    E0902 = 902, "INTERNAL_OUT_OF_MEMORY", "out of memory";
    /// Code path believed unreachable
    E0903 = 903, "INTERNAL_UNREACHABLE", "internal unreachable";

    // Warnings (1000+)
    /// Tokens left after a complete parse
    W1001 = 1001, "PARSE_TRAILING_TOKENS", "trailing tokens after parse";
    /// Statement can never run
    W1002 = 1002, "SEMA_UNREACHABLE", "unreachable code";
}

/// Whether a numeric code lies in the error range (1 through 999).
///
/// This is a range check only; a [`Diagnostic`](crate::Diagnostic) carries
/// its own severity, which is what emission trusts.
pub const fn is_error(number: u16) -> bool {
    matches!(number, 1..=999)
}

impl DiagCode {
    /// Whether this code lies in the error range.
    pub const fn is_error(self) -> bool {
        is_error(self.number())
    }

    /// Look up a code by number.
    pub fn from_number(number: u16) -> Option<DiagCode> {
        Self::ALL.iter().find(|c| c.number() == number).copied()
    }

    /// Look up a code by symbolic name.
    pub fn from_name(name: &str) -> Option<DiagCode> {
        Self::ALL.iter().find(|c| c.name() == name).copied()
    }
}

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a code string like `"E0103"` (case-insensitive).
impl std::str::FromStr for DiagCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
