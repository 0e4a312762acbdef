//! Source files and offset-to-position lookup.
//!
//! File ids are 1-based; `0` is reserved for "no file" to match
//! [`Span::is_valid`](vitte_ir::Span::is_valid).
//!
//! Files keep their raw bytes so that span offsets, which the lexer counts
//! in bytes of the original input, index the same text the line table was
//! built from. Text is decoded only for display, one line at a time.

use std::borrow::Cow;
use std::ops::Range;

/// 1-based line and column. Columns count UTF-8 code points.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// One registered source file with its line index.
#[derive(Clone, Debug)]
pub struct SourceFile {
    id: u32,
    path: String,
    bytes: Vec<u8>,
    /// Byte offset of the first byte of each line.
    line_starts: Vec<usize>,
}

impl SourceFile {
    fn new(id: u32, path: String, bytes: Vec<u8>) -> Self {
        let mut line_starts = vec![0];
        for (i, &byte) in bytes.iter().enumerate() {
            // No entry for the empty "line" after a trailing newline.
            if byte == b'\n' && i + 1 < bytes.len() {
                line_starts.push(i + 1);
            }
        }
        SourceFile {
            id,
            path,
            bytes,
            line_starts,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Contents exactly as registered.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 0-based line containing `offset` (clamped to the end of the text).
    pub fn line_index(&self, offset: usize) -> usize {
        let offset = offset.min(self.bytes.len());
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// Position of `offset`.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.bytes.len());
        let line = self.line_index(offset);
        let start = self.line_starts[line];
        let col = self.columns(start..offset);
        LineCol {
            line: to_u32(line + 1),
            col: to_u32(col + 1),
        }
    }

    /// Byte range of a 0-based line, without its `\n` or `\r\n`.
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let start = *self.line_starts.get(line)?;
        let mut end = self
            .line_starts
            .get(line + 1)
            .map_or(self.bytes.len(), |next| next - 1);
        let bytes = &self.bytes;
        if end > start && bytes.get(end - 1) == Some(&b'\n') {
            end -= 1;
        }
        if end > start && bytes.get(end - 1) == Some(&b'\r') {
            end -= 1;
        }
        Some(start..end)
    }

    /// Text of a 0-based line, without its line terminator.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD, one per malformed sequence.
    pub fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        let range = self.line_range(line)?;
        self.bytes.get(range).map(String::from_utf8_lossy)
    }

    /// Display columns taken by `range`: one per code point or stray byte.
    pub fn columns(&self, range: Range<usize>) -> usize {
        let end = range.end.min(self.bytes.len());
        let start = range.start.min(end);
        self.bytes.get(start..end).map_or(0, count_code_points)
    }
}

/// All files of a compilation session.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its id.
    pub fn add_file(&mut self, path: impl Into<String>, text: impl Into<String>) -> u32 {
        self.add_file_bytes(path, text.into().into_bytes())
    }

    /// Register a file from raw bytes. Offsets keep indexing these bytes
    /// even when they are not valid UTF-8.
    pub fn add_file_bytes(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> u32 {
        let id = to_u32(self.files.len() + 1);
        self.files.push(SourceFile::new(id, path.into(), bytes.into()));
        id
    }

    pub fn get(&self, file_id: u32) -> Option<&SourceFile> {
        let index = usize::try_from(file_id).ok()?.checked_sub(1)?;
        self.files.get(index)
    }

    /// Path of a file, or `""` when unknown.
    pub fn path(&self, file_id: u32) -> &str {
        self.get(file_id).map_or("", SourceFile::path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn count_code_points(bytes: &[u8]) -> usize {
    String::from_utf8_lossy(bytes).chars().count()
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
