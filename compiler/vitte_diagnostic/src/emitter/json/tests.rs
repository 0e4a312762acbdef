use super::*;
use crate::DiagCode;
use pretty_assertions::assert_eq;

fn sample(sources: &mut SourceMap) -> Diagnostic {
    let file = sources.add_file("m.vit", "set x = 1\nset x = 2\n");
    Diagnostic::error(DiagCode::E0302, Span::new(file, 14, 15), "redefined name")
        .with_secondary_label(Span::new(file, 4, 5), "first defined here")
        .with_help("rename it")
        .with_note("names are unique")
}

fn render(sources: &SourceMap, diagnostics: &[Diagnostic], format: JsonFormat) -> String {
    let mut output = Vec::new();
    let mut emitter = JsonEmitter::new(&mut output, sources, format);
    emitter.emit_all(diagnostics).unwrap();
    emitter.finish().unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_json_lines_field_order() {
    let mut sources = SourceMap::new();
    let diag = sample(&mut sources);
    let expected = concat!(
        r#"{"severity":"error","code":"E0302","message":"redefined name","help":"rename it","#,
        r#""location":{"path":"m.vit","file_id":1,"span":{"lo":14,"hi":15},"line":2,"col":5},"#,
        r#""labels":[{"kind":"primary","path":"m.vit","file_id":1,"lo":14,"hi":15,"line":2,"col":5},"#,
        r#"{"kind":"secondary","path":"m.vit","file_id":1,"lo":4,"hi":5,"line":1,"col":5,"message":"first defined here"}],"#,
        r#""notes":["names are unique"]}"#,
        "\n"
    );
    assert_eq!(render(&sources, &[diag], JsonFormat::Lines), expected);
}

#[test]
fn test_optional_fields_are_omitted() {
    let sources = SourceMap::new();
    let diag = Diagnostic::warning(DiagCode::W1001, Span::DUMMY, "trailing tokens after parse");
    let expected = concat!(
        r#"{"severity":"warning","code":"W1001","message":"trailing tokens after parse","#,
        r#""location":{"path":"","file_id":0,"span":{"lo":0,"hi":0},"line":0,"col":0},"#,
        r#""labels":[{"kind":"primary","path":"","file_id":0,"lo":0,"hi":0,"line":0,"col":0}],"#,
        r#""notes":[]}"#,
        "\n"
    );
    assert_eq!(render(&sources, &[diag], JsonFormat::Lines), expected);
}

#[test]
fn test_parses_back_to_same_data() {
    let mut sources = SourceMap::new();
    let diag = sample(&mut sources);
    let text = render(&sources, std::slice::from_ref(&diag), JsonFormat::Lines);
    let parsed: JsonDiagnostic = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(parsed, JsonDiagnostic::new(&diag, &sources));
    assert_eq!(parsed.labels[1].message.as_deref(), Some("first defined here"));
    assert_eq!(parsed.labels[0].message, None);
}

#[test]
fn test_array_formats() {
    let mut sources = SourceMap::new();
    let diag = sample(&mut sources);
    let diags = [diag.clone(), diag];

    let compact = render(&sources, &diags, JsonFormat::Array);
    assert!(compact.starts_with("[{\"severity\""));
    assert_eq!(compact.lines().count(), 1);

    let pretty = render(&sources, &diags, JsonFormat::PrettyArray);
    assert!(pretty.starts_with("[\n  {\n    \"severity\": \"error\""));
    let parsed: Vec<JsonDiagnostic> = serde_json::from_str(&pretty).unwrap();
    let reparsed: Vec<JsonDiagnostic> = serde_json::from_str(&compact).unwrap();
    assert_eq!(parsed, reparsed);
    assert_eq!(parsed.len(), 2);
}

#[test]
fn test_empty_array_is_still_written() {
    let sources = SourceMap::new();
    assert_eq!(render(&sources, &[], JsonFormat::Array), "[]\n");
    assert_eq!(render(&sources, &[], JsonFormat::Lines), "");
}

#[test]
fn test_format_from_options() {
    let mut options = EmitOptions::default();
    assert_eq!(JsonFormat::from_options(&options), JsonFormat::Lines);
    options.json_one_per_line = false;
    assert_eq!(JsonFormat::from_options(&options), JsonFormat::Array);
    options.json_pretty = true;
    options.json_one_per_line = true;
    assert_eq!(JsonFormat::from_options(&options), JsonFormat::PrettyArray);
}

#[test]
fn test_strings_are_escaped() {
    let sources = SourceMap::new();
    let diag = Diagnostic::error(DiagCode::E0101, Span::DUMMY, "bad \"\u{1}\"\n");
    let out = render(&sources, &[diag], JsonFormat::Lines);
    assert!(out.contains(r#""message":"bad \"\u0001\"\n""#), "{out}");
}
