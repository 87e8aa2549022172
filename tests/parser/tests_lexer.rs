//! Token scanner behavior through the public API.

use calc::parser::{Lexer, SyntaxKind, tokenize};
use rstest::rstest;

fn kinds(input: &str) -> Vec<SyntaxKind> {
    tokenize(input).tokens.iter().map(|t| t.kind).collect()
}

// =============================================================================
// TOKEN KINDS
// =============================================================================

#[rstest]
#[case("42", SyntaxKind::NUMBER)]
#[case("3.14", SyntaxKind::NUMBER)]
#[case(".5", SyntaxKind::NUMBER)]
#[case("1e3", SyntaxKind::NUMBER)]
#[case("\"text\"", SyntaxKind::STRING)]
#[case("'text'", SyntaxKind::STRING)]
#[case("#2024-01-01#", SyntaxKind::DATE)]
#[case("[Order Date]", SyntaxKind::FIELD_REF)]
#[case("my_var", SyntaxKind::IDENT)]
#[case("<>", SyntaxKind::NEQ)]
#[case("!=", SyntaxKind::NEQ)]
#[case(">=", SyntaxKind::GT_EQ)]
#[case("@", SyntaxKind::UNEXPECTED)]
fn test_single_token_kind(#[case] input: &str, #[case] expected: SyntaxKind) {
    assert_eq!(kinds(input), vec![expected, SyntaxKind::EOF]);
}

#[rstest]
#[case("fixed", SyntaxKind::FIXED_KW)]
#[case("Include", SyntaxKind::INCLUDE_KW)]
#[case("EXCLUDE", SyntaxKind::EXCLUDE_KW)]
#[case("elseif", SyntaxKind::ELSEIF_KW)]
#[case("Null", SyntaxKind::NULL_KW)]
#[case("when", SyntaxKind::WHEN_KW)]
fn test_keywords_any_case(#[case] input: &str, #[case] expected: SyntaxKind) {
    assert_eq!(kinds(input), vec![expected, SyntaxKind::EOF]);
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(kinds("IFNULL"), vec![SyntaxKind::IDENT, SyntaxKind::EOF]);
    assert_eq!(kinds("ending"), vec![SyntaxKind::IDENT, SyntaxKind::EOF]);
}

#[test]
fn test_commas_inside_strings_and_fields_stay_inside() {
    assert_eq!(
        kinds("\"a, b\", [c, d]"),
        vec![
            SyntaxKind::STRING,
            SyntaxKind::COMMA,
            SyntaxKind::FIELD_REF,
            SyntaxKind::EOF
        ]
    );
}

// =============================================================================
// TERMINATION
// =============================================================================

#[rstest]
#[case("")]
#[case("   \n\t")]
#[case("// only a comment")]
#[case("IF [A] THEN")]
#[case("\"unterminated")]
#[case("/* open")]
#[case("}}}{{{)))(((")]
fn test_exactly_one_eof(#[case] input: &str) {
    let tokens = tokenize(input).tokens;
    let eofs = tokens.iter().filter(|t| t.kind == SyntaxKind::EOF).count();
    assert_eq!(eofs, 1);
    assert_eq!(tokens.last().map(|t| t.kind), Some(SyntaxKind::EOF));
}

#[test]
fn test_lexer_is_restartable() {
    let lexer = Lexer::new("SUM([Sales]) + 1");
    let first: Vec<_> = lexer.clone().collect();
    let second: Vec<_> = lexer.collect();
    assert_eq!(first, second);
}

#[test]
fn test_no_bytes_dropped() {
    let input = "IF [A] @ THEN ~ 1 END";
    let scanned = tokenize(input);
    let covered: usize = scanned
        .tokens
        .iter()
        .map(|t| t.text.len())
        .sum::<usize>()
        + scanned
            .comments
            .iter()
            .map(|r| usize::from(r.len()))
            .sum::<usize>();
    let non_space = input.chars().filter(|c| !c.is_whitespace()).count();
    assert_eq!(covered, non_space);
}

// =============================================================================
// POSITIONS
// =============================================================================

#[test]
fn test_columns_count_chars_not_bytes() {
    let tokens = tokenize("\"héllo\" + [X]").tokens;
    assert_eq!(tokens[1].column, 8);
    assert_eq!(tokens[2].column, 10);
}

#[test]
fn test_unterminated_field_stops_at_line_end() {
    let tokens = tokenize("[Sales\n+ 1").tokens;
    assert_eq!(tokens[0].kind, SyntaxKind::UNEXPECTED);
    assert_eq!(tokens[0].text, "[Sales");
    assert_eq!(tokens[1].kind, SyntaxKind::PLUS);
    assert_eq!(tokens[1].line, 1);
}
