//! Symbol resolution and the unified diagnostics over the bundled samples

use renpy_parser::renpy::analysis::DEFAULT_BUILTINS;
use renpy_parser::renpy::diagnostics::DiagnosticSeverity;
use renpy_parser::renpy::scoping::SymbolKind;
use renpy_parser::renpy::testing::Sample;

#[test]
fn the_question_binds_in_definition_order() {
    let analysis = Sample::TheQuestion.analyze();
    assert!(analysis.resolve_errors.is_empty(), "{:?}", analysis.resolve_errors);

    let defined: Vec<(&str, SymbolKind)> = analysis
        .symbols
        .symbols()
        .iter()
        .filter(|symbol| !symbol.is_builtin())
        .map(|symbol| (symbol.name.as_str(), symbol.kind))
        .collect();
    assert_eq!(
        defined,
        vec![
            ("s", SymbolKind::Variable),
            ("config.window_title", SymbolKind::Variable),
            ("book", SymbolKind::Variable),
            ("start", SymbolKind::Function),
            ("rig", SymbolKind::Function),
            ("amount", SymbolKind::Variable),
            ("choice", SymbolKind::Function),
            ("rightaway", SymbolKind::Function),
            ("later", SymbolKind::Function),
        ]
    );
    assert_eq!(
        analysis.symbols.symbols().len(),
        DEFAULT_BUILTINS.len() + defined.len()
    );
    // global plus one scope per label
    assert_eq!(analysis.symbols.scopes().len(), 6);
}

#[test]
fn the_question_links_uses_to_labels() {
    let analysis = Sample::TheQuestion.analyze();
    let references = |name: &str| -> Vec<usize> {
        analysis
            .symbols
            .symbols()
            .iter()
            .find(|symbol| symbol.name == name)
            .map(|symbol| symbol.references.iter().map(|r| r.start.line).collect())
            .unwrap_or_default()
    };
    assert_eq!(references("rig"), vec![11]);
    assert_eq!(references("choice"), vec![13]);
    assert_eq!(references("rightaway"), vec![22]);
    assert_eq!(references("later"), vec![24]);
    assert_eq!(references("book"), vec![29]);
    assert!(references("start").is_empty());
}

#[test]
fn the_question_navigation() {
    let analysis = Sample::TheQuestion.analyze();
    // `jump choice` on line 14
    let position = analysis.position(13, 10).expect("position");
    let definition = analysis.definition_at(position).expect("definition");
    assert_eq!((definition.start.line, definition.start.column), (19, 6));

    let all = analysis.references_at(position, true);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], definition);
    assert_eq!(analysis.references_at(position, false).len(), 1);
}

#[test]
fn parameter_lives_in_label_scope() {
    let analysis = Sample::TheQuestion.analyze();
    let amount = analysis
        .symbols
        .symbols()
        .iter()
        .find(|symbol| symbol.name == "amount")
        .expect("amount");
    assert_ne!(amount.scope, analysis.symbols.global());
    let scope = analysis.symbols.scope(amount.scope).expect("scope");
    assert_eq!(scope.parent, Some(analysis.symbols.global()));
    assert_eq!(scope.range.start.line, 15);
}

#[test]
fn broken_sample_reports_every_stage_in_order() {
    let analysis = Sample::Broken.analyze();
    let diagnostics = analysis.diagnostics();
    let summary: Vec<(usize, Option<&str>)> = diagnostics
        .iter()
        .map(|diagnostic| (diagnostic.range.start.line, diagnostic.code.as_deref()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, Some("unexpected-token")),
            (2, Some("unresolved-reference")),
            (3, Some("unexpected-token")),
            (4, Some("unexpected-end-of-line")),
            (6, Some("duplicate-symbol")),
            (7, Some("unterminated-string")),
        ]
    );
    assert!(analysis.has_errors());

    let warnings: Vec<_> = diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity == DiagnosticSeverity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("nowhere"));
}

#[test]
fn broken_sample_keeps_first_duplicate() {
    let analysis = Sample::Broken.analyze();
    let dup = analysis
        .symbols
        .symbols()
        .iter()
        .find(|symbol| symbol.name == "dup")
        .expect("dup");
    assert_eq!(dup.definition.map(|range| range.start.line), Some(5));
    // the recursive call inside `start` still resolves
    let start = analysis
        .symbols
        .symbols()
        .iter()
        .find(|symbol| symbol.name == "start")
        .expect("start");
    assert_eq!(start.references.len(), 1);
}
