//! Byte cursor over the source buffer.
//!
//! Reads past the end return `0`, so lookahead needs no bounds checks at
//! call sites. Interior NUL bytes are told apart from the end by comparing
//! the position against the length; [`Cursor::is_eof`] does this.

/// Copyable cursor; copying it is a cheap snapshot.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    src: &'a [u8],
    pos: u32,
}

impl<'a> Cursor<'a> {
    /// Cursor at offset 0.
    ///
    /// Offsets are `u32`; input beyond `u32::MAX` bytes is not visible.
    pub fn new(src: &'a [u8]) -> Self {
        let visible = src.len().min(u32::MAX as usize);
        Cursor {
            src: &src[..visible],
            pos: 0,
        }
    }

    /// Byte at the cursor, or `0` at the end.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos as usize)
    }

    /// Byte one ahead of the cursor.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.peek_n(1)
    }

    /// Byte `n` ahead of the cursor.
    #[inline]
    pub fn peek_n(&self, n: usize) -> u8 {
        self.byte_at(self.pos as usize + n)
    }

    #[inline]
    fn byte_at(&self, index: usize) -> u8 {
        self.src.get(index).copied().unwrap_or(0)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.advance_n(1);
    }

    /// Advance by `n` bytes, stopping at the end.
    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos = self.pos.saturating_add(n).min(self.len());
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.len()
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "src is capped at u32::MAX bytes in new()"
    )]
    #[inline]
    pub fn len(&self) -> u32 {
        self.src.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    /// Source bytes in `start..end`.
    pub fn slice(&self, start: u32, end: u32) -> &'a [u8] {
        let end = (end as usize).min(self.src.len());
        let start = (start as usize).min(end);
        &self.src[start..end]
    }

    /// Source bytes from `start` to the cursor.
    pub fn slice_from(&self, start: u32) -> &'a [u8] {
        self.slice(start, self.pos)
    }

    /// Whether the source continues with `prefix` at the cursor.
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.src
            .get(self.pos as usize..)
            .is_some_and(|rest| rest.starts_with(prefix))
    }

    /// Advance while `pred` holds for the current byte.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance to the next `\n` (not consumed) or the end.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "offset < remaining.len() <= u32::MAX"
    )]
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.src[self.pos as usize..];
        match memchr::memchr(b'\n', remaining) {
            Some(offset) => self.pos += offset as u32,
            None => self.pos = self.len(),
        }
    }

    /// Advance to the next `"` or `\` inside a string body.
    ///
    /// Returns the byte found, or `None` at the end.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "offset < remaining.len() <= u32::MAX"
    )]
    pub fn skip_to_string_delim(&mut self) -> Option<u8> {
        let remaining = &self.src[self.pos as usize..];
        if let Some(offset) = memchr::memchr2(b'"', b'\\', remaining) {
            self.pos += offset as u32;
            Some(self.current())
        } else {
            self.pos = self.len();
            None
        }
    }
}

#[cfg(test)]
mod tests;
