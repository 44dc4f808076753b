//! Token types for the lexer.
//!
//! Every token keeps the raw source text it was lexed from alongside the
//! decoded payload in its [`TokenKind`]. Keywords are matched exactly against a
//! fixed table; anything keyword-shaped that is not in the table is kept as
//! [`TokenKind::Reserved`] so the parser can report it by name.

use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A location in source text.
///
/// Byte offsets are used for slicing, line and column for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    /// 1-indexed.
    pub line: u32,
    /// 1-indexed, counted in characters.
    pub column: u32,
}

impl Span {
    /// Span used when there is no meaningful source position.
    pub const ZERO: Span = Span {
        start: 0,
        end: 0,
        line: 1,
        column: 1,
    };

    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// A reserved word recognised by the lexer.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// Every keyword, in table order.
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant,)*];

            /// The exact source spelling of this keyword.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Keyword::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    Module => "module",
    I32 => "i32",
    I64 => "i64",
    F32 => "f32",
    F64 => "f64",
    Funcref => "funcref",
    Externref => "externref",
    Func => "func",
    Extern => "extern",
    Local => "local",
    Param => "param",
    Result => "result",
    Call => "call",
    CallIndirect => "call_indirect",
    Import => "import",
    Export => "export",
    Table => "table",
    Memory => "memory",
    Global => "global",
    Elem => "elem",
    Data => "data",
    Type => "type",
    Mut => "mut",
    LocalGet => "local.get",
    LocalSet => "local.set",
    LocalTee => "local.tee",
    GlobalGet => "global.get",
    GlobalSet => "global.set",
    If => "if",
    Else => "else",
    End => "end",
    Block => "block",
    Loop => "loop",
    Br => "br",
    BrIf => "br_if",
    Return => "return",
    Nop => "nop",
    Drop => "drop",
    I32Const => "i32.const",
    I64Const => "i64.const",
    F32Const => "f32.const",
    F64Const => "f64.const",
    I32Add => "i32.add",
    I32Sub => "i32.sub",
    I32And => "i32.and",
    I32Or => "i32.or",
    I32Eqz => "i32.eqz",
    I32Eq => "i32.eq",
    I32LtS => "i32.lt_s",
    I32GtU => "i32.gt_u",
    I32GeS => "i32.ge_s",
}

static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> =
    Lazy::new(|| Keyword::ALL.iter().map(|kw| (kw.as_str(), *kw)).collect());

impl Keyword {
    /// Exact-match lookup in the keyword table.
    pub fn lookup(text: &str) -> Option<Keyword> {
        KEYWORDS.get(text).copied()
    }

    /// Whether this keyword names a value type.
    pub fn is_valtype(self) -> bool {
        matches!(self, Keyword::I32 | Keyword::I64 | Keyword::F32 | Keyword::F64)
    }

    /// Whether this keyword may appear as an instruction in a function body.
    ///
    /// `if`, `else` and `end` are excluded: they only appear as part of a
    /// structured instruction's syntax, never on their own.
    pub fn is_instruction(self) -> bool {
        use Keyword::*;
        matches!(
            self,
            LocalGet
                | LocalSet
                | LocalTee
                | GlobalGet
                | GlobalSet
                | Call
                | CallIndirect
                | Block
                | Loop
                | Br
                | BrIf
                | Return
                | Nop
                | Drop
                | I32Const
                | I64Const
                | F32Const
                | F64Const
                | I32Add
                | I32Sub
                | I32And
                | I32Or
                | I32Eqz
                | I32Eq
                | I32LtS
                | I32GtU
                | I32GeS
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Keyword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The kind of token, with its decoded payload where it has one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum TokenKind {
    LeftParen,
    RightParen,
    /// String literal with the `\"` escape resolved.
    String(String),
    /// Integer literal with underscores removed.
    Integer(i64),
    /// Identifier; the stored name excludes the leading `$`.
    Id(String),
    Keyword(Keyword),
    /// A keyword-shaped word that is not in the keyword table.
    Reserved(String),
    /// End of input. Always the last token of a successful lex.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::String(s) => write!(f, "string {:?}", s),
            TokenKind::Integer(n) => write!(f, "integer {}", n),
            TokenKind::Id(name) => write!(f, "${}", name),
            TokenKind::Keyword(kw) => write!(f, "'{}'", kw),
            TokenKind::Reserved(word) => write!(f, "'{}'", word),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// The decoded payload of a token, borrowed from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'t> {
    String(&'t str),
    Integer(i64),
    Id(&'t str),
    Keyword(Keyword),
    Reserved(&'t str),
}

/// A lexical token: its kind, the raw source text, and where it was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// The token's decoded payload. Parentheses and end of input have none.
    ///
    /// ```
    /// use watrun::wat::{Lexer, Literal};
    ///
    /// let tokens = Lexer::tokenise("(local.get $n)").unwrap();
    /// assert_eq!(tokens[0].literal(), None);
    /// assert_eq!(tokens[2].literal(), Some(Literal::Id("n")));
    /// ```
    pub fn literal(&self) -> Option<Literal<'_>> {
        match &self.kind {
            TokenKind::String(s) => Some(Literal::String(s)),
            TokenKind::Integer(n) => Some(Literal::Integer(*n)),
            TokenKind::Id(name) => Some(Literal::Id(name)),
            TokenKind::Keyword(kw) => Some(Literal::Keyword(*kw)),
            TokenKind::Reserved(word) => Some(Literal::Reserved(word)),
            TokenKind::LeftParen | TokenKind::RightParen | TokenKind::Eof => None,
        }
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}
