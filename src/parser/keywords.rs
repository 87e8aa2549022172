//! Keyword table for the calculation language.
//!
//! Keywords are matched case-insensitively: `if`, `If` and `IF` are the same
//! token. Everything else that looks like a word is an identifier.

use super::syntax_kind::SyntaxKind;

/// All reserved words, uppercase, with their token kind.
pub const KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("IF", SyntaxKind::IF_KW),
    ("THEN", SyntaxKind::THEN_KW),
    ("ELSE", SyntaxKind::ELSE_KW),
    ("ELSEIF", SyntaxKind::ELSEIF_KW),
    ("END", SyntaxKind::END_KW),
    ("CASE", SyntaxKind::CASE_KW),
    ("WHEN", SyntaxKind::WHEN_KW),
    ("AND", SyntaxKind::AND_KW),
    ("OR", SyntaxKind::OR_KW),
    ("NOT", SyntaxKind::NOT_KW),
    ("IN", SyntaxKind::IN_KW),
    ("FIXED", SyntaxKind::FIXED_KW),
    ("INCLUDE", SyntaxKind::INCLUDE_KW),
    ("EXCLUDE", SyntaxKind::EXCLUDE_KW),
    ("TRUE", SyntaxKind::TRUE_KW),
    ("FALSE", SyntaxKind::FALSE_KW),
    ("NULL", SyntaxKind::NULL_KW),
];

/// Look up a word in the keyword table, ignoring ASCII case.
pub fn keyword_kind(word: &str) -> Option<SyntaxKind> {
    KEYWORDS
        .iter()
        .find(|(kw, _)| kw.eq_ignore_ascii_case(word))
        .map(|&(_, kind)| kind)
}

/// Uppercase spelling of a keyword kind.
pub fn keyword_text(kind: SyntaxKind) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .find(|&&(_, k)| k == kind)
        .map(|&(kw, _)| kw)
}
