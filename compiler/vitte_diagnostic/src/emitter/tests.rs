use super::*;
use pretty_assertions::assert_eq;

fn setup() -> (SourceMap, DiagnosticBag) {
    let mut sources = SourceMap::new();
    let file = sources.add_file("t.vit", "say 1\nsay \"x\n");
    let mut bag = DiagnosticBag::new();
    bag.push(Diagnostic::from_code(DiagCode::E0103, Span::new(file, 10, 11)));
    bag.push(Diagnostic::error(DiagCode::E0201, Span::new(file, 0, 3), "unexpected token"));
    (sources, bag)
}

#[test]
fn test_default_options() {
    let options = EmitOptions::default();
    assert_eq!(options.context_lines, 2);
    assert!(options.json_one_per_line);
    assert!(!options.json_pretty);
    assert!(!options.sort_by_location);
    assert!(!options.strict_severity);
    assert_eq!(options.max_diagnostics, None);
}

#[test]
fn test_format_lines() {
    let (sources, mut bag) = setup();
    bag.push(Diagnostic::error(DiagCode::E0701, Span::DUMMY, "failed to open path"));
    assert_eq!(
        format(&bag, &sources),
        vec![
            "E0103: unterminated string literal (t.vit:2)",
            "E0201: unexpected token (t.vit:1)",
            "E0701: failed to open path (<input>:0)",
        ]
    );
}

#[test]
fn test_sort_and_limit() {
    let (sources, bag) = setup();
    let options = EmitOptions {
        sort_by_location: true,
        max_diagnostics: Some(1),
        ..EmitOptions::default()
    };
    let mut out = Vec::new();
    emit_json(&mut out, &sources, &bag, &options).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains("\"code\":\"E0201\""));
}

#[test]
fn test_every_diagnostic_is_rendered_by_default() {
    let (sources, bag) = setup();
    let mut out = Vec::new();
    emit_human(&mut out, &sources, &bag, &EmitOptions::default()).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches(": error[").count(), 2);
    // Insertion order is kept.
    assert!(text.find("E0103").unwrap() < text.find("E0201").unwrap());
}

#[test]
fn test_severity_mismatch_is_lenient_by_default() {
    let (sources, mut bag) = setup();
    bag.push(Diagnostic::warning(DiagCode::E0101, Span::DUMMY, "odd"));
    let mut out = Vec::new();
    emit_human(&mut out, &sources, &bag, &EmitOptions::default()).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("warning[E0101]: odd"));
}

#[test]
fn test_severity_mismatch_fails_in_strict_mode() {
    let (sources, mut bag) = setup();
    bag.push(Diagnostic::error(DiagCode::W1002, Span::DUMMY, "odd"));
    let options = EmitOptions {
        strict_severity: true,
        ..EmitOptions::default()
    };
    let mut out = Vec::new();
    let err = emit_json(&mut out, &sources, &bag, &options).unwrap_err();
    assert!(matches!(
        err,
        EmitError::SeverityMismatch {
            code: DiagCode::W1002,
            severity: Severity::Error
        }
    ));
    // Nothing is written when the check fails.
    assert!(out.is_empty());
}

#[test]
fn test_output_is_deterministic() {
    let (sources, bag) = setup();
    let render = || {
        let mut human = Vec::new();
        let mut json = Vec::new();
        emit_human(&mut human, &sources, &bag, &EmitOptions::default()).unwrap();
        emit_json(&mut json, &sources, &bag, &EmitOptions::default()).unwrap();
        (human, json)
    };
    assert_eq!(render(), render());
}
