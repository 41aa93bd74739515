//! Tests for the character-level lexer

use pretty_assertions::assert_eq;
use sprig::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .expect("tokenize failed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn texts(source: &str) -> Vec<String> {
    tokenize(source)
        .expect("tokenize failed")
        .into_iter()
        .map(|t| t.text)
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Token Kinds
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_call_shape() {
    assert_eq!(
        kinds("(+ (num 2) 3)"),
        vec![
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Number,
            TokenKind::CloseParen,
            TokenKind::Number,
            TokenKind::CloseParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_empty_source_is_just_eof() {
    let tokens = tokenize("").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].offset, 0);
}

#[test]
fn test_eof_offset_is_source_length() {
    let source = "(a b)";
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens.last().map(|t| t.offset), Some(source.len()));
}

#[test]
fn test_identifiers_may_contain_symbols() {
    assert_eq!(
        texts("#nth str:fmt <= - -x"),
        vec!["#nth", "str:fmt", "<=", "-", "-x", ""]
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Strings
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_string_keeps_whitespace_and_parens() {
    let tokens = tokenize("\"a (b) ~c\"").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "a (b) ~c");
    assert_eq!(tokens[0].offset, 0);
}

#[test]
fn test_escaped_quote_does_not_close_string() {
    let tokens = tokenize(r#""say \"hi\"""#).unwrap();
    assert_eq!(tokens[0].text, r#"say \"hi\""#);
    assert_eq!(tokens.len(), 2);
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("(print \"abc").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.offset, 7);
    assert!(err.is_incomplete());
}

// ═══════════════════════════════════════════════════════════════════════
// Numbers
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_number_forms() {
    assert_eq!(texts("12 -3 -.5 .25 7."), vec!["12", "-3", "-.5", ".25", "7.", ""]);
    assert_eq!(
        kinds(".25"),
        vec![TokenKind::Identifier, TokenKind::Eof],
        "a leading dot without a minus is not a number"
    );
}

#[test]
fn test_number_closed_by_paren() {
    assert_eq!(texts("(1)"), vec!["(", "1", ")", ""]);
}

#[test]
fn test_second_decimal_point() {
    let err = tokenize("1.2.3").unwrap_err();
    assert!(matches!(
        err.kind,
        LexErrorKind::MultipleDecimalPoints { .. }
    ));
    assert!(!err.is_incomplete());
}

#[test]
fn test_letter_glued_to_number() {
    let err = tokenize("12ab").unwrap_err();
    assert_eq!(
        err.kind,
        LexErrorKind::MalformedNumber {
            text: "12".to_string(),
            found: 'a'
        }
    );
    assert_eq!(err.offset, 2);
}

// ═══════════════════════════════════════════════════════════════════════
// Comments
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_line_comment_runs_to_newline() {
    assert_eq!(texts("a ~ comment (\nb"), vec!["a", "b", ""]);
}

#[test]
fn test_comment_at_end_of_input() {
    assert_eq!(texts("a ~ trailing"), vec!["a", ""]);
}

#[test]
fn test_multiline_comment() {
    assert_eq!(texts("a { one\ntwo ( } b"), vec!["a", "b", ""]);
}

#[test]
fn test_unterminated_multiline_comment() {
    let err = tokenize("a { never closed").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
    assert!(err.is_incomplete());
}

#[test]
fn test_tilde_inside_identifier_is_not_a_comment() {
    assert_eq!(texts("a~b"), vec!["a~b", ""]);
}
