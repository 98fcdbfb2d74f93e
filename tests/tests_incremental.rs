//! Incremental/full equivalence over scripted edit sequences, for both
//! built-in grammars and for every input chunking.

mod helpers;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use sprig::{Arithmetic, Document, Json, TextInput};

use helpers::{grammar, parse_and_verify, scratch_parse};

/// Drive one document through a scripted edit sequence, verifying the
/// incremental tree against a from-scratch parse after every step.
fn run_script(grammar_name: &str, chunk_size: usize, initial: &str, edits: &[(usize, usize, &str)]) {
    let grammar = grammar(grammar_name);
    let input = TextInput::with_chunk_size(initial, chunk_size);
    let mut doc = Document::new(Arc::clone(&grammar), Box::new(input));
    doc.parse();

    for &(position, deleted, inserted) in edits {
        doc.edit(position, deleted, inserted).expect("scripted edit in bounds");
        parse_and_verify(&mut doc);
    }

    // Unwind the whole session; the original tree must come back.
    let original = scratch_parse(Arc::clone(&grammar), initial);
    for _ in edits {
        doc.undo().expect("recorded edit to undo");
        parse_and_verify(&mut doc);
    }
    assert_eq!(doc.text(), initial);
    assert_eq!(doc.parse().serialize(), original);
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(usize::MAX)]
fn arithmetic_insertions_match_scratch_for_every_chunking(#[case] chunk_size: usize) {
    run_script(
        "arithmetic",
        chunk_size,
        "12+(34*5)",
        &[
            (1, 0, "9"),
            (0, 0, "("),
            (10, 0, ")+7"),
            (5, 2, ""),
        ],
    );
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(usize::MAX)]
fn json_edits_match_scratch_for_every_chunking(#[case] chunk_size: usize) {
    run_script(
        "json",
        chunk_size,
        r#"{"a": 1, "b": [true, null]}"#,
        &[
            (7, 1, "42"),
            (1, 0, " "),
            (17, 0, "false, "),
            (0, 1, ""),
        ],
    );
}

#[test]
fn appending_at_the_very_end_extends_the_last_token() {
    let mut doc = Document::with_text(Arc::new(Arithmetic), "1+2");
    doc.parse();
    doc.edit(3, 0, "3").expect("in bounds");
    assert_eq!(doc.text(), "1+23");
    // "2" and "3" must merge into one number even though no node overlapped
    // the insertion point.
    assert_eq!(parse_and_verify(&mut doc), "(expr (num) (op) (num))");
}

#[test]
fn insertion_at_a_token_boundary_merges_with_the_preceding_token() {
    let mut doc = Document::with_text(Arc::new(Arithmetic), "1+2");
    doc.parse();
    doc.edit(1, 0, "3").expect("in bounds");
    assert_eq!(doc.text(), "13+2");
    assert_eq!(parse_and_verify(&mut doc), "(expr (num) (op) (num))");
}

#[test]
fn deleting_a_separator_merges_neighbouring_tokens() {
    let mut doc = Document::with_text(Arc::new(Arithmetic), "12+34");
    doc.parse();
    doc.edit(2, 1, "").expect("in bounds");
    assert_eq!(doc.text(), "1234");
    assert_eq!(parse_and_verify(&mut doc), "(expr (num))");
}

#[test]
fn deletion_spanning_several_siblings() {
    let mut doc = Document::with_text(Arc::new(Arithmetic), "1+2+3+4");
    doc.parse();
    doc.edit(1, 4, "").expect("in bounds");
    assert_eq!(doc.text(), "1+4");
    assert_eq!(parse_and_verify(&mut doc), "(expr (num) (op) (num))");
}

#[test]
fn unbalancing_and_rebalancing_groups() {
    let mut doc = Document::with_text(Arc::new(Arithmetic), "(1)(2)");
    doc.parse();
    doc.edit(2, 1, "").expect("in bounds");
    assert_eq!(doc.text(), "(1(2)");
    parse_and_verify(&mut doc);
    doc.undo().expect("undo");
    assert_eq!(doc.text(), "(1)(2)");
    assert_eq!(
        parse_and_verify(&mut doc),
        "(expr (group (expr (num))) (group (expr (num))))"
    );
}

#[test]
fn editing_one_value_deep_inside_a_json_document() {
    let text = r#"{"users": [{"name": "ada", "id": 1}, {"name": "bob", "id": 2}]}"#;
    let mut doc = Document::with_text(Arc::new(Json), text);
    doc.parse();
    let offset = text.find('1').expect("id value present");
    doc.edit(offset, 1, "1000").expect("in bounds");
    parse_and_verify(&mut doc);
}

#[test]
fn closing_an_unterminated_string_rewrites_the_error_span() {
    let mut doc = Document::with_text(Arc::new(Json), r#"["a, 1]"#);
    doc.parse();
    // The unterminated string swallows everything to end of input; closing
    // it reshapes the whole tail of the tree.
    doc.edit(3, 0, "\"").expect("in bounds");
    assert_eq!(doc.text(), r#"["a", 1]"#);
    assert_eq!(
        parse_and_verify(&mut doc),
        "(document (array (string) (number)))"
    );
}

#[test]
fn deleting_a_brace_reshapes_the_document() {
    let mut doc = Document::with_text(Arc::new(Json), r#"{"a": {"b": 2}}"#);
    doc.parse();
    let offset = doc.text().rfind('}').expect("closing brace");
    doc.edit(offset, 1, "").expect("in bounds");
    parse_and_verify(&mut doc);
    doc.undo().expect("undo");
    parse_and_verify(&mut doc);
}

#[test]
fn growing_a_document_from_empty() {
    let mut doc = Document::with_text(Arc::new(Json), "");
    assert_eq!(doc.parse().serialize(), "(document)");
    for (i, ch) in r#"{"k": [1]}"#.char_indices() {
        doc.edit(i, 0, &ch.to_string()).expect("append");
        parse_and_verify(&mut doc);
    }
    assert_eq!(
        doc.parse().serialize(),
        "(document (object (pair (string) (array (number)))))"
    );
}

#[test]
fn keyword_grown_from_a_fragment() {
    let mut doc = Document::with_text(Arc::new(Json), "[tru]");
    doc.parse();
    doc.edit(4, 0, "e").expect("in bounds");
    assert_eq!(doc.text(), "[true]");
    assert_eq!(parse_and_verify(&mut doc), "(document (array (true)))");
}

#[test]
fn whitespace_only_edits_still_match_scratch() {
    let mut doc = Document::with_text(Arc::new(Arithmetic), "1 + 2");
    doc.parse();
    doc.edit(1, 1, "\n\n").expect("in bounds");
    assert_eq!(doc.text(), "1\n\n+ 2");
    assert_eq!(parse_and_verify(&mut doc), "(expr (num) (op) (num))");
}
