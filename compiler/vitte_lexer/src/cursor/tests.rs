use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_navigation() {
    let mut cursor = Cursor::new(b"abc");
    assert_eq!(cursor.current(), b'a');
    assert_eq!(cursor.peek(), b'b');
    assert_eq!(cursor.peek_n(2), b'c');
    assert_eq!(cursor.peek_n(3), 0);
    cursor.advance();
    assert_eq!((cursor.pos(), cursor.current()), (1, b'b'));
    cursor.advance_n(10);
    assert!(cursor.is_eof());
    assert_eq!(cursor.pos(), 3);
    assert_eq!(cursor.current(), 0);
}

#[test]
fn test_interior_nul_is_not_eof() {
    let mut cursor = Cursor::new(b"a\0b");
    cursor.advance();
    assert_eq!(cursor.current(), 0);
    assert!(!cursor.is_eof());
}

#[test]
fn test_slices() {
    let mut cursor = Cursor::new(b"hello world");
    cursor.eat_while(|b| b.is_ascii_alphabetic());
    assert_eq!(cursor.slice_from(0), b"hello");
    assert_eq!(cursor.slice(6, 11), b"world");
    assert_eq!(cursor.slice(6, 99), b"world");
    assert!(cursor.starts_with(b" wor"));
    assert!(!cursor.starts_with(b" world!"));
}

#[test]
fn test_comment_skip() {
    let mut cursor = Cursor::new(b"# note\nx");
    cursor.eat_until_newline_or_eof();
    assert_eq!(cursor.pos(), 6);
    assert_eq!(cursor.current(), b'\n');

    let mut tail = Cursor::new(b"// no newline");
    tail.eat_until_newline_or_eof();
    assert!(tail.is_eof());
}

#[test]
fn test_string_delims() {
    let mut cursor = Cursor::new(br#"ab\"c"d"#);
    assert_eq!(cursor.skip_to_string_delim(), Some(b'\\'));
    assert_eq!(cursor.pos(), 2);
    cursor.advance_n(2);
    assert_eq!(cursor.skip_to_string_delim(), Some(b'"'));
    assert_eq!(cursor.pos(), 5);
    cursor.advance();
    assert_eq!(cursor.skip_to_string_delim(), None);
    assert!(cursor.is_eof());
}
