//! Syntax kinds for calculation tokens
//!
//! This enum defines every token kind the scanner can produce. Trivia kinds
//! (whitespace, comments) never leave the lexer; they are listed so the
//! logos-generated tokens have a home before filtering.

/// All token kinds in the calculation language
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (consumed by the lexer, recorded as ranges)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,     // SUM, my_name
    NUMBER,    // 42, 3.14, .5, 1e3
    STRING,    // "hello" or 'hello'
    DATE,      // #2024-01-01#
    FIELD_REF, // [Sales]

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN, // (
    R_PAREN, // )
    L_BRACE, // {
    R_BRACE, // }
    COMMA,   // ,
    COLON,   // :
    DOT,     // .

    // =========================================================================
    // OPERATORS
    // =========================================================================
    PLUS,    // +
    MINUS,   // -
    STAR,    // *
    SLASH,   // /
    PERCENT, // %
    CARET,   // ^
    EQ,      // =
    EQ_EQ,   // ==
    NEQ,     // != or <>
    LT,      // <
    LT_EQ,   // <=
    GT,      // >
    GT_EQ,   // >=

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    IF_KW,
    THEN_KW,
    ELSE_KW,
    ELSEIF_KW,
    END_KW,
    CASE_KW,
    WHEN_KW,
    AND_KW,
    OR_KW,
    NOT_KW,
    IN_KW,
    FIXED_KW,
    INCLUDE_KW,
    EXCLUDE_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    /// Unrecognized character, or an unterminated string/field/comment
    UNEXPECTED,
    EOF,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::IF_KW as u16) && (self as u16) <= (Self::NULL_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_PAREN as u16) && (self as u16) <= (Self::DOT as u16)
    }

    /// Check if this is an operator
    pub fn is_operator(self) -> bool {
        (self as u16) >= (Self::PLUS as u16) && (self as u16) <= (Self::GT_EQ as u16)
    }

    /// Check if this is a comparison operator
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::EQ | Self::EQ_EQ | Self::NEQ | Self::LT | Self::LT_EQ | Self::GT | Self::GT_EQ
        )
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::NUMBER
                | Self::STRING
                | Self::DATE
                | Self::TRUE_KW
                | Self::FALSE_KW
                | Self::NULL_KW
        )
    }

    /// IF and CASE open a block that END closes
    pub fn is_block_open(self) -> bool {
        matches!(self, Self::IF_KW | Self::CASE_KW)
    }

    /// THEN, ELSEIF, ELSE and WHEN start a branch of the enclosing block
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Self::THEN_KW | Self::ELSEIF_KW | Self::ELSE_KW | Self::WHEN_KW
        )
    }

    /// FIXED, INCLUDE and EXCLUDE introduce a level-of-detail expression
    pub fn is_lod(self) -> bool {
        matches!(self, Self::FIXED_KW | Self::INCLUDE_KW | Self::EXCLUDE_KW)
    }

    /// Logical operators spelled as keywords
    pub fn is_logical(self) -> bool {
        matches!(
            self,
            Self::AND_KW | Self::OR_KW | Self::NOT_KW | Self::IN_KW
        )
    }
}
